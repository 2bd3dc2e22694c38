//! Page-table walker for Sv32 and the Sv39/Sv48/Sv57 family.
//!
//! Sv32 is a fixed two-level, 4-byte-PTE, 34-bit-physical-address scheme.
//! Sv39/Sv48/Sv57 share everything but their level count (3/4/5): 9-bit VPN
//! fields, 8-byte PTEs, and a 56-bit physical address, so they're driven by
//! one generic walk parameterized on level count.
//!
//! Permission is decided purely by `pte & access != 0`; there is no U-bit or
//! SUM check here; those belong to a privilege layer this core does not
//! implement, and the effective access passed in already folds MPRV/MXR
//! substitution in (see [`resolve`](super::resolve)).

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::common::access::Access;
use crate::common::addr::{PhysAddr, VirtAddr};
use crate::common::constants::{
    PAGE_SHIFT, PTE_A, PTE_PPN_SHIFT, PTE_R, PTE_W, PTE_X, SV32_LEVELS, SV32_PTE_SIZE,
    SV32_VPN_BITS, SV64_PTE_SIZE, SV64_VPN_BITS, bit_mask,
};
use crate::common::error::WalkFault;
use crate::soc::space::PhysAddrSpace;

#[derive(Clone, Copy)]
struct Pte(u64);

impl Pte {
    const fn valid(self) -> bool {
        self.0 & 1 != 0
    }

    /// W set without R: reserved regardless of X, per the privileged spec.
    const fn reserved(self) -> bool {
        self.0 & PTE_W != 0 && self.0 & PTE_R == 0
    }

    const fn is_pointer(self) -> bool {
        self.0 & (PTE_R | PTE_W | PTE_X) == 0
    }

    const fn ppn(self) -> u64 {
        self.0 >> PTE_PPN_SHIFT
    }

    /// `mxr` widens a read check to also accept execute-only leaves.
    const fn permits(self, access: Access, mxr: bool) -> bool {
        let mask = if mxr && matches!(access, Access::Read) {
            access.bits() | PTE_X
        } else {
            access.bits()
        };
        self.0 & mask != 0
    }
}

/// Reads a PTE at `pte_addr`. `None` means the address doesn't land in RAM,
/// which the caller reports as an access fault rather than a page fault —
/// the page table itself is misconfigured, not the mapping it describes.
fn read_pte(space: &PhysAddrSpace, pte_addr: PhysAddr, pte_size: u64) -> Option<u64> {
    let ptr = space.phys_translate(pte_addr)?;
    if pte_size == 4 {
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 4) };
        Some(u64::from(u32::from_le_bytes(bytes.try_into().unwrap())))
    } else {
        let bytes = unsafe { std::slice::from_raw_parts(ptr, 8) };
        Some(u64::from_le_bytes(bytes.try_into().unwrap()))
    }
}

const fn bit_off_for(level: u32, vpn_bits: u32) -> u32 {
    PAGE_SHIFT as u32 + level * vpn_bits
}

/// Shared walk for any level count / VPN width / PTE size.
fn walk(
    space: &PhysAddrSpace,
    vaddr: u64,
    access: Access,
    mxr: bool,
    root_ppn: u64,
    levels: u32,
    vpn_bits: u32,
    pte_size: u64,
) -> Result<PhysAddr, WalkFault> {
    let vpn_mask = bit_mask(vpn_bits);
    let mut ppn = root_ppn;

    for level in (0..levels).rev() {
        let bit_off = bit_off_for(level, vpn_bits);
        let vpn_i = (vaddr >> bit_off) & vpn_mask;
        let pte_addr = PhysAddr::new((ppn << PAGE_SHIFT) + vpn_i * pte_size);

        let raw = read_pte(space, pte_addr, pte_size).ok_or(WalkFault::AccessFault)?;
        let pte = Pte(raw);

        if !pte.valid() || pte.reserved() {
            return Err(WalkFault::PageFault);
        }

        if pte.is_pointer() {
            if level == 0 {
                return Err(WalkFault::PageFault);
            }
            ppn = pte.ppn();
            continue;
        }

        if level > 0 {
            let low_mask = bit_mask(level * vpn_bits);
            if pte.ppn() & low_mask != 0 {
                return Err(WalkFault::PageFault);
            }
        }

        if !pte.permits(access, mxr) {
            return Err(WalkFault::PageFault);
        }

        let set_bits = PTE_A | ((access.bits() & PTE_W) << 5);
        if raw & set_bits != set_bits {
            write_access_dirty(space, pte_addr, pte_size, raw, raw | set_bits);
        }

        let offset_mask = bit_mask(bit_off);
        let paddr = (pte.ppn() << PAGE_SHIFT) | (vaddr & offset_mask);
        return Ok(PhysAddr::new(paddr));
    }

    Err(WalkFault::PageFault)
}

/// Sets A (and D, for a write) on the PTE at `pte_addr` via a single
/// compare-and-swap against `observed_raw`, the PTE word the walk actually
/// read. A/D are monotonic set-only bits, so a lost race means another hart
/// already set them (or more) first, and the walker's own upgrade can be
/// dropped rather than retried. Comparing against a freshly reloaded value
/// instead would turn this into an unconditional store and could clobber a
/// concurrent D-bit set.
fn write_access_dirty(
    space: &PhysAddrSpace,
    pte_addr: PhysAddr,
    pte_size: u64,
    observed_raw: u64,
    new_raw: u64,
) {
    let Some(ptr) = space.phys_translate(pte_addr) else {
        return;
    };
    if pte_size == 4 {
        let atomic = unsafe { &*ptr.cast::<AtomicU32>() };
        let _ = atomic.compare_exchange(
            observed_raw as u32,
            new_raw as u32,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    } else {
        let atomic = unsafe { &*ptr.cast::<AtomicU64>() };
        let _ =
            atomic.compare_exchange(observed_raw, new_raw, Ordering::Relaxed, Ordering::Relaxed);
    }
}

/// Walks an Sv32 (two-level, 4-byte PTE) page table.
pub fn walk_sv32(
    space: &PhysAddrSpace,
    vaddr: VirtAddr,
    access: Access,
    mxr: bool,
    root: PhysAddr,
) -> Result<PhysAddr, WalkFault> {
    let root_ppn = root.val() >> PAGE_SHIFT;
    walk(
        space,
        vaddr.val(),
        access,
        mxr,
        root_ppn,
        SV32_LEVELS,
        SV32_VPN_BITS,
        SV32_PTE_SIZE as u64,
    )
}

/// Walks an Sv39/Sv48/Sv57 page table. `levels` selects which (3/4/5).
pub fn walk_sv64(
    space: &PhysAddrSpace,
    vaddr: VirtAddr,
    access: Access,
    mxr: bool,
    root: PhysAddr,
    levels: u32,
) -> Result<PhysAddr, WalkFault> {
    let top_bit_off = bit_off_for(levels - 1, SV64_VPN_BITS);
    let top_bits = top_bit_off + SV64_VPN_BITS;
    if !is_canonical(vaddr.val(), top_bits) {
        return Err(WalkFault::PageFault);
    }

    let root_ppn = root.val() >> PAGE_SHIFT;
    walk(
        space,
        vaddr.val(),
        access,
        mxr,
        root_ppn,
        levels,
        SV64_VPN_BITS,
        SV64_PTE_SIZE as u64,
    )
}

/// Checks that `vaddr`'s bits at and above `top_bits - 1` are a sign
/// extension of bit `top_bits - 1`, as Sv39/48/57 require.
fn is_canonical(vaddr: u64, top_bits: u32) -> bool {
    let shifted = (vaddr as i64) >> (top_bits - 1);
    shifted == 0 || shifted == -1
}
