//! Software TLB: a direct-mapped, per-hart cache of VPN to host pointer.
//!
//! Unlike a conventional valid-bit TLB, each entry carries three independent
//! tag fields — one per access class (`r`, `w`, `e`) — so a single entry can
//! answer "is this VPN readable", "...writable", and "...executable"
//! independently, encoding the natural RISC-V permission hierarchy (W
//! implies R; X implies neither) without a separate permission bitmask.
//!
//! Misses are encoded without a `valid` flag: a tag equal to the looked-up
//! VPN is a hit, anything else is a miss. Invalidation writes `VPN - 1` into
//! a tag — a value that can never equal `VPN` again — rather than clearing a
//! flag, which lets one write invalidate exactly one access class.

use crate::common::access::Access;
use crate::common::constants::{PAGE_PNMASK, PAGE_SHIFT};

#[derive(Clone, Copy)]
struct TlbEntry {
    /// Tag for read accesses: holds a VPN, or `VPN - 1` when invalidated.
    r: u64,
    /// Tag for write accesses.
    w: u64,
    /// Tag for execute accesses.
    e: u64,
    /// `host_base - (vaddr & PAGE_PNMASK)` for the cached page; adding the
    /// full virtual address back reconstructs a host pointer without a
    /// separate page-offset mask.
    ptr: usize,
}

impl Default for TlbEntry {
    fn default() -> Self {
        Self { r: 0, w: 0, e: 0, ptr: 0 }
    }
}

/// A direct-mapped, per-hart software TLB with `N` entries (`N` a power of
/// two, rounded up if not).
pub struct Tlb {
    entries: Vec<TlbEntry>,
    mask: usize,
}

impl Tlb {
    /// Creates a freshly flushed TLB with at least `size` entries.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1).next_power_of_two();
        let mut tlb = Self {
            entries: vec![TlbEntry::default(); size],
            mask: size - 1,
        };
        tlb.flush_all();
        tlb
    }

    const fn slot(&self, vpn: u64) -> usize {
        (vpn as usize) & self.mask
    }

    /// Zeroes every tag, then poisons slot 0 so a lookup of VPN 0 — whose
    /// zeroed tag would otherwise equal a zeroed slot — also misses.
    pub fn flush_all(&mut self) {
        for entry in &mut self.entries {
            *entry = TlbEntry::default();
        }
        let zero_slot = &mut self.entries[0];
        zero_slot.r = u64::MAX;
        zero_slot.w = u64::MAX;
        zero_slot.e = u64::MAX;
    }

    /// Invalidates the slot covering `vaddr` for all three access classes.
    pub fn flush_page(&mut self, vaddr: u64) {
        let vpn = vaddr >> PAGE_SHIFT;
        let idx = self.slot(vpn);
        let entry = &mut self.entries[idx];
        entry.r = vpn.wrapping_sub(1);
        entry.w = vpn.wrapping_sub(1);
        entry.e = vpn.wrapping_sub(1);
    }

    /// Caches a translation for `op`. `host_ptr` must be the host pointer
    /// `phys_translate` returned for `paddr`'s page.
    ///
    /// Only the tag(s) compatible with `op` are set to `vpn`; any other tag
    /// that doesn't already hold `vpn` is invalidated, so a stale cached
    /// permission from a previous occupant of this slot can never outlive
    /// this insert.
    pub fn put(&mut self, vaddr: u64, host_ptr: *mut u8, op: Access) {
        let vpn = vaddr >> PAGE_SHIFT;
        let idx = self.slot(vpn);
        let entry = &mut self.entries[idx];

        match op {
            Access::Read => {
                entry.r = vpn;
                if entry.w != vpn {
                    entry.w = vpn.wrapping_sub(1);
                }
                if entry.e != vpn {
                    entry.e = vpn.wrapping_sub(1);
                }
            }
            Access::Write => {
                entry.r = vpn;
                entry.w = vpn;
                if entry.e != vpn {
                    entry.e = vpn.wrapping_sub(1);
                }
            }
            Access::Exec => {
                if entry.r != vpn {
                    entry.r = vpn.wrapping_sub(1);
                }
                if entry.w != vpn {
                    entry.w = vpn.wrapping_sub(1);
                }
                entry.e = vpn;
            }
        }

        entry.ptr = (host_ptr as usize).wrapping_sub((vaddr & PAGE_PNMASK) as usize);
    }

    /// Returns a host pointer for `vaddr` if `op` is cached for it, else
    /// `None`.
    ///
    /// # Safety
    /// The returned pointer is only valid to dereference for as long as the
    /// backing RAM region it was derived from is alive, and for exactly the
    /// byte range implied by the caller's own access size (this TLB performs
    /// no bounds checking beyond the page the entry was inserted for).
    #[must_use]
    pub fn lookup(&self, vaddr: u64, op: Access) -> Option<*mut u8> {
        let vpn = vaddr >> PAGE_SHIFT;
        let idx = self.slot(vpn);
        let entry = &self.entries[idx];

        let tag = match op {
            Access::Read => entry.r,
            Access::Write => entry.w,
            Access::Exec => entry.e,
        };

        if tag == vpn {
            Some(entry.ptr.wrapping_add(vaddr as usize) as *mut u8)
        } else {
            None
        }
    }
}
