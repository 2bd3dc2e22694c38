//! The MMIO device contract.
//!
//! A device declares the physical window it answers to and the operation
//! sizes it is willing to service directly; anything outside that window is
//! normalized by [`mmio`](crate::core::units::mmu::mmio) before the device
//! ever sees it. Device implementations themselves (UART, PLIC, ...) are
//! external collaborators — this crate only defines the interface the MMIO
//! access engine and registry dispatch through.

use crate::common::addr::PhysAddr;

/// A memory-mapped I/O device attached to the physical address space.
///
/// `[begin, end]` is inclusive on both ends. `min_op_size` and
/// `max_op_size` must both be powers of two with `max_op_size >=
/// min_op_size`; the MMIO access engine guarantees `read`/`write` are only
/// ever called with a size in that range at a `min_op_size`-aligned offset.
pub trait MmioDevice: Send + Sync {
    /// First physical address this device answers to.
    fn begin(&self) -> PhysAddr;
    /// Last physical address this device answers to (inclusive).
    fn end(&self) -> PhysAddr;
    /// Smallest access size this device's callback accepts directly.
    fn min_op_size(&self) -> u8;
    /// Largest access size this device's callback accepts directly.
    fn max_op_size(&self) -> u8;

    /// Services a read of `dst.len()` bytes at `offset` from `begin`.
    fn read(&mut self, dst: &mut [u8], offset: u64);

    /// Services a write of `src.len()` bytes at `offset` from `begin`.
    ///
    /// Read-only devices may leave this as a no-op.
    fn write(&mut self, src: &[u8], offset: u64) {
        let _ = (src, offset);
    }

    /// Whether `pa` falls within this device's window.
    fn contains(&self, pa: PhysAddr) -> bool {
        pa.val() >= self.begin().val() && pa.val() <= self.end().val()
    }
}
