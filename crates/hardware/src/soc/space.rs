//! Physical address space: RAM plus an MMIO device registry.
//!
//! Two lookups are exposed, matching the pair every translation or MMIO
//! access ultimately bottoms out in: `phys_translate` for RAM (O(1), a
//! bounds check and pointer add) and `mmio_lookup` for everything else
//! (O(log n), a binary search over non-overlapping device windows).

use crate::common::addr::PhysAddr;
use crate::soc::memory::buffer::RamRegion;
use crate::soc::traits::MmioDevice;

/// The physical address space a hart's MMU translates into: one RAM region
/// plus a sorted registry of MMIO devices.
pub struct PhysAddrSpace {
    ram: RamRegion,
    /// Sorted by `begin`; windows must not overlap, enforced at registration.
    devices: Vec<Box<dyn MmioDevice>>,
}

impl PhysAddrSpace {
    /// Creates an address space backed by `ram` with no MMIO devices
    /// registered yet.
    #[must_use]
    pub fn new(ram: RamRegion) -> Self {
        Self { ram, devices: Vec::new() }
    }

    /// Registers an MMIO device. Panics if its window overlaps an
    /// already-registered device; this is a configuration error, not a
    /// runtime fault, so it is caught at setup time rather than threaded
    /// through every lookup.
    pub fn register_mmio(&mut self, device: Box<dyn MmioDevice>) {
        let begin = device.begin().val();
        let end = device.end().val();
        let overlaps = self
            .devices
            .iter()
            .any(|d| begin <= d.end().val() && end >= d.begin().val());
        assert!(!overlaps, "MMIO device window overlaps an existing device");

        let idx = self.devices.partition_point(|d| d.begin().val() < begin);
        self.devices.insert(idx, device);
    }

    /// Translates a physical address to a host pointer into RAM, or `None`
    /// if `pa` does not fall within the RAM region.
    #[must_use]
    pub fn phys_translate(&self, pa: PhysAddr) -> Option<*mut u8> {
        self.ram.translate(pa)
    }

    /// Finds the MMIO device whose window contains `pa`, if any.
    #[must_use]
    pub fn mmio_lookup(&self, pa: PhysAddr) -> Option<&dyn MmioDevice> {
        let addr = pa.val();
        let idx = self.devices.partition_point(|d| d.begin().val() <= addr);
        idx.checked_sub(1)
            .map(|i| self.devices[i].as_ref())
            .filter(|d| d.contains(pa))
    }

    /// Finds the MMIO device whose window contains `pa`, mutably.
    #[must_use]
    pub fn mmio_lookup_mut(&mut self, pa: PhysAddr) -> Option<&mut (dyn MmioDevice + 'static)> {
        let addr = pa.val();
        let idx = self.devices.partition_point(|d| d.begin().val() <= addr);
        let i = idx.checked_sub(1)?;
        if self.devices[i].contains(pa) {
            Some(self.devices[i].as_mut())
        } else {
            None
        }
    }

    /// Direct access to the RAM region, e.g. for loading an image before
    /// the first hart starts.
    #[must_use]
    pub fn ram(&self) -> &RamRegion {
        &self.ram
    }

    /// Mutable direct access to the RAM region.
    pub fn ram_mut(&mut self) -> &mut RamRegion {
        &mut self.ram
    }
}
