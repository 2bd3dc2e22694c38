//! Black-box tests for the direct-mapped software TLB.
//!
//! `Tlb` is reachable from outside the crate (`core::units::mmu::tlb::Tlb`)
//! even though `Mmu` only exposes it internally, so these tests exercise it
//! directly rather than through `Mmu::mmu_op`.

use proptest::prelude::*;
use rvsim_mmu::common::Access;
use rvsim_mmu::core::units::mmu::tlb::Tlb;

const PAGE: u64 = 4096;

fn ptr_for(tag: u64) -> *mut u8 {
    ((tag + 1) * PAGE) as *mut u8
}

#[test]
fn fresh_tlb_misses_every_access_class() {
    let tlb = Tlb::new(16);
    assert!(tlb.lookup(0, Access::Read).is_none());
    assert!(tlb.lookup(0, Access::Write).is_none());
    assert!(tlb.lookup(0, Access::Exec).is_none());
    assert!(tlb.lookup(5 * PAGE, Access::Read).is_none());
}

#[test]
fn write_insert_also_serves_reads_but_not_execute() {
    let mut tlb = Tlb::new(16);
    let vaddr = 3 * PAGE + 0x40;
    tlb.put(vaddr, ptr_for(3), Access::Write);

    assert!(tlb.lookup(vaddr, Access::Read).is_some());
    assert!(tlb.lookup(vaddr, Access::Write).is_some());
    assert!(tlb.lookup(vaddr, Access::Exec).is_none());
}

#[test]
fn read_insert_does_not_serve_writes() {
    let mut tlb = Tlb::new(16);
    let vaddr = 3 * PAGE + 0x40;
    tlb.put(vaddr, ptr_for(3), Access::Read);

    assert!(tlb.lookup(vaddr, Access::Read).is_some());
    assert!(tlb.lookup(vaddr, Access::Write).is_none());
    assert!(tlb.lookup(vaddr, Access::Exec).is_none());
}

#[test]
fn execute_insert_serves_only_execute() {
    let mut tlb = Tlb::new(16);
    let vaddr = 3 * PAGE + 0x40;
    tlb.put(vaddr, ptr_for(3), Access::Exec);

    assert!(tlb.lookup(vaddr, Access::Exec).is_some());
    assert!(tlb.lookup(vaddr, Access::Read).is_none());
    assert!(tlb.lookup(vaddr, Access::Write).is_none());
}

#[test]
fn host_pointer_is_reconstructed_from_the_page_offset() {
    let mut tlb = Tlb::new(16);
    let base = ptr_for(5);
    let vaddr = 5 * PAGE + 0x123;

    tlb.put(vaddr, base, Access::Read);
    let resolved = tlb.lookup(vaddr, Access::Read).unwrap();
    assert_eq!(resolved as usize, base as usize + 0x123);
}

#[test]
fn flush_all_clears_every_slot_including_vpn_zero() {
    let mut tlb = Tlb::new(16);
    tlb.put(0, ptr_for(0), Access::Read);
    tlb.put(9 * PAGE, ptr_for(9), Access::Write);

    tlb.flush_all();

    assert!(tlb.lookup(0, Access::Read).is_none());
    assert!(tlb.lookup(9 * PAGE, Access::Write).is_none());
}

#[test]
fn flush_page_only_invalidates_its_own_slot() {
    let mut tlb = Tlb::new(16);
    let a = 1 * PAGE;
    let b = 2 * PAGE;
    tlb.put(a, ptr_for(1), Access::Read);
    tlb.put(b, ptr_for(2), Access::Read);

    tlb.flush_page(a);

    assert!(tlb.lookup(a, Access::Read).is_none());
    assert!(tlb.lookup(b, Access::Read).is_some());
}

#[test]
fn aliasing_vpns_evict_each_other() {
    let size = 16u64;
    let mut tlb = Tlb::new(size as usize);
    let first = 0;
    let second = size * PAGE;

    tlb.put(first, ptr_for(0), Access::Read);
    tlb.put(second, ptr_for(size), Access::Read);

    assert!(tlb.lookup(second, Access::Read).is_some());
    assert!(tlb.lookup(first, Access::Read).is_none());
}

proptest! {
    /// Whatever access class a page was inserted under, lookups honor the
    /// R/W/X hierarchy (W implies R, X implies only X) regardless of vaddr
    /// or which of several disjoint VPNs it lands in.
    #[test]
    fn permission_hierarchy_holds_for_arbitrary_insertions(
        vpn in 0u64..1_000_000,
        offset in 0u64..PAGE,
        which in 0u8..3,
    ) {
        let mut tlb = Tlb::new(64);
        let vaddr = vpn * PAGE + offset;
        let access = match which {
            0 => Access::Read,
            1 => Access::Write,
            _ => Access::Exec,
        };
        tlb.put(vaddr, ptr_for(vpn), access);

        match access {
            Access::Read => {
                prop_assert!(tlb.lookup(vaddr, Access::Read).is_some());
            }
            Access::Write => {
                prop_assert!(tlb.lookup(vaddr, Access::Read).is_some());
                prop_assert!(tlb.lookup(vaddr, Access::Write).is_some());
            }
            Access::Exec => {
                prop_assert!(tlb.lookup(vaddr, Access::Exec).is_some());
                prop_assert!(tlb.lookup(vaddr, Access::Read).is_none());
            }
        }
    }
}
