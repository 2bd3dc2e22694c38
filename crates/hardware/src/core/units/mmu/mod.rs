//! Memory management unit: the TLB, the page-table walker, the MMIO access
//! engine, and the dispatcher that ties them to a hart's view of the
//! physical address space.
//!
//! This is the full virtual-memory translation core for one hart: bare,
//! Sv32, Sv39, Sv48, and Sv57 addressing, a software TLB, and MMIO size
//! normalization. The instruction pipeline, the CSR file, and the trap
//! vector that drive it are external collaborators reached only through
//! [`HartContext`] and [`TrapSink`].

/// The MMIO access engine: size normalization and alignment fixup.
pub mod mmio;

/// The Sv32 and Sv39/Sv48/Sv57 page-table walkers.
pub mod ptw;

/// The software TLB.
pub mod tlb;

use tracing::trace;

use crate::common::access::Access;
use crate::common::addr::{PhysAddr, VirtAddr};
use crate::common::constants::PAGE_SIZE;
use crate::common::error::{Trap, WalkFault};
use crate::core::arch::context::{HartContext, SatpMode};
use crate::core::arch::mode::PrivilegeMode;
use crate::soc::space::PhysAddrSpace;

use self::tlb::Tlb;

/// Where a fault is reported. The trap vector itself — picking a handler,
/// updating `mcause`/`mtval`/`mepc` — is owned outside this crate; this
/// trait is the single seam `mmu_op` calls into when translation or the
/// backing access fails.
pub trait TrapSink {
    fn raise(&mut self, trap: Trap);
}

/// Notifies the JIT trace cache that translated code covering `[paddr,
/// paddr + size)` may be stale. A no-op implementation is a conforming one;
/// this crate has no JIT of its own to invalidate.
pub trait JitInvalidate {
    fn invalidate(&mut self, vaddr: u64, paddr: u64, size: usize) {
        let _ = (vaddr, paddr, size);
    }
}

/// A JIT invalidation hook that does nothing.
pub struct NoJit;
impl JitInvalidate for NoJit {}

/// Per-hart memory management unit: owns the TLB, holds no other state.
/// Everything else it needs — privilege, `satp`, the physical address
/// space — is borrowed per call.
pub struct Mmu {
    tlb: Tlb,
}

impl Mmu {
    #[must_use]
    pub fn new(tlb_size: usize) -> Self {
        Self { tlb: Tlb::new(tlb_size) }
    }

    /// Invalidates every cached translation. Must be called for a
    /// `SFENCE.VMA` with no operands, on the issuing hart only.
    pub fn tlb_flush_all(&mut self) {
        self.tlb.flush_all();
    }

    /// Invalidates the cached translation covering `vaddr`. Must be called
    /// for a `SFENCE.VMA` with a virtual-address operand, on the issuing
    /// hart only.
    pub fn tlb_flush_page(&mut self, vaddr: VirtAddr) {
        self.tlb.flush_page(vaddr.val());
    }

    /// Performs one memory access of `size` bytes at `vaddr`, translating,
    /// splitting across a page boundary if needed, and routing to RAM or an
    /// MMIO device. Returns `true` on success; on failure, raises exactly
    /// one trap via `sink` and returns `false`.
    ///
    /// `buffer` is read from for a `Write` access and written to for a
    /// `Read`/`Exec` access, matching the guest's point of view: `Write`
    /// means the guest is storing `buffer`'s contents into memory.
    pub fn mmu_op(
        &mut self,
        ctx: &HartContext,
        space: &mut PhysAddrSpace,
        vaddr: VirtAddr,
        buffer: &mut [u8],
        access: Access,
        sink: &mut dyn TrapSink,
        jit: &mut dyn JitInvalidate,
    ) -> bool {
        self.mmu_op_inner(ctx, space, vaddr, vaddr, buffer, access, sink, jit)
    }

    /// Inner recursion for cross-page splitting. `tval` is the address
    /// reported on trap: always the top-level call's `vaddr`, never the
    /// sub-range `cur` being serviced by this recursive step.
    fn mmu_op_inner(
        &mut self,
        ctx: &HartContext,
        space: &mut PhysAddrSpace,
        tval: VirtAddr,
        cur: VirtAddr,
        buffer: &mut [u8],
        access: Access,
        sink: &mut dyn TrapSink,
        jit: &mut dyn JitInvalidate,
    ) -> bool {
        let page_remaining = PAGE_SIZE - cur.page_offset();
        if (buffer.len() as u64) > page_remaining {
            let split = page_remaining as usize;
            let (first, second) = buffer.split_at_mut(split);
            let first_ok =
                self.mmu_op_inner(ctx, space, tval, cur, first, access, sink, jit);
            if !first_ok {
                return false;
            }
            let second_addr = VirtAddr::new(cur.val() + split as u64);
            return self.mmu_op_inner(ctx, space, tval, second_addr, second, access, sink, jit);
        }

        self.single_page_op(ctx, space, tval, cur, buffer, access, sink, jit)
    }

    fn single_page_op(
        &mut self,
        ctx: &HartContext,
        space: &mut PhysAddrSpace,
        tval: VirtAddr,
        cur: VirtAddr,
        buffer: &mut [u8],
        access: Access,
        sink: &mut dyn TrapSink,
        jit: &mut dyn JitInvalidate,
    ) -> bool {
        // The TLB fast path is skipped for writes: it caches only a host
        // pointer, not the physical address a write must hand to `jit`, and
        // every write needs a fresh `jit.invalidate` call (see the full
        // translate path below) regardless of whether the mapping itself is
        // already cached.
        if !matches!(access, Access::Write) {
            if let Some(host_ptr) = self.tlb.lookup(cur.val(), access) {
                commit_ram(host_ptr, buffer, access);
                return true;
            }
        }

        let paddr = match translate(ctx, space, cur, access) {
            Ok(paddr) => paddr,
            Err(fault) => {
                sink.raise(access_fault_for(fault, access, tval.val()));
                return false;
            }
        };

        if let Some(host_ptr) = space.phys_translate(paddr) {
            self.tlb.put(cur.val(), host_ptr, access);
            if matches!(access, Access::Write) {
                jit.invalidate(cur.val(), paddr.val(), buffer.len());
            }
            commit_ram(host_ptr, buffer, access);
            return true;
        }

        if let Some(device) = space.mmio_lookup_mut(paddr) {
            let offset = paddr.val() - device.begin().val();
            match access {
                Access::Write => mmio::write(device, offset, buffer),
                Access::Read | Access::Exec => mmio::read(device, offset, buffer),
            }
            trace!(vaddr = %cur, paddr = %paddr, "mmio access");
            return true;
        }

        sink.raise(access_fault(access, tval.val()));
        false
    }
}

fn commit_ram(host_ptr: *mut u8, buffer: &mut [u8], access: Access) {
    let len = buffer.len();
    if matches!(access, Access::Write) {
        unsafe { std::ptr::copy_nonoverlapping(buffer.as_ptr(), host_ptr, len) };
    } else {
        unsafe { std::ptr::copy_nonoverlapping(host_ptr, buffer.as_mut_ptr(), len) };
    }
}

fn access_fault(access: Access, tval: u64) -> Trap {
    match access {
        Access::Read => Trap::LoadAccessFault(tval),
        Access::Write => Trap::StoreAccessFault(tval),
        Access::Exec => Trap::InstructionAccessFault(tval),
    }
}

fn page_fault(access: Access, tval: u64) -> Trap {
    match access {
        Access::Read => Trap::LoadPageFault(tval),
        Access::Write => Trap::StorePageFault(tval),
        Access::Exec => Trap::InstructionPageFault(tval),
    }
}

fn access_fault_for(fault: WalkFault, access: Access, tval: u64) -> Trap {
    match fault {
        WalkFault::AccessFault => access_fault(access, tval),
        WalkFault::PageFault => page_fault(access, tval),
    }
}

/// Computes the effective privilege mode for `access`: `MPRV` substitutes
/// `MPP` for every access except instruction fetch, which always uses the
/// hart's actual current privilege.
#[must_use]
pub fn effective_privilege(ctx: &HartContext, access: Access) -> PrivilegeMode {
    if ctx.status.mprv() && !matches!(access, Access::Exec) {
        ctx.status.mpp()
    } else {
        ctx.priv_mode
    }
}

/// Translates `vaddr` under `ctx`, bypassing paging for an effective
/// Machine-mode privilege or a `Bare` `satp`, and otherwise walking the
/// page table selected by `satp_mode`.
fn translate(
    ctx: &HartContext,
    space: &PhysAddrSpace,
    vaddr: VirtAddr,
    access: Access,
) -> Result<PhysAddr, WalkFault> {
    if effective_privilege(ctx, access) == PrivilegeMode::Machine {
        return Ok(PhysAddr::new(vaddr.val()));
    }
    if ctx.satp_mode == SatpMode::Bare {
        return Ok(PhysAddr::new(vaddr.val()));
    }

    let mxr = ctx.status.mxr();
    match ctx.satp_mode {
        SatpMode::Bare => unreachable!("handled above"),
        SatpMode::Sv32 => ptw::walk_sv32(space, vaddr, access, mxr, ctx.root_page_table),
        SatpMode::Sv39 | SatpMode::Sv48 | SatpMode::Sv57 => {
            ptw::walk_sv64(space, vaddr, access, mxr, ctx.root_page_table, ctx.satp_mode.levels())
        }
    }
}
