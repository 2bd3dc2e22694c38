//! Configuration for assembling the physical address space this crate's
//! MMU translates into.
//!
//! Scoped to exactly what this crate owns: RAM geometry and TLB size. The
//! rest of a system's configuration (devices, pipeline, cache, CLI) lives
//! with whatever external crate assembles a full machine around this one.

use serde::Deserialize;

mod defaults {
    /// Base physical address of main RAM (2 GiB).
    pub const RAM_BASE: u64 = 0x8000_0000;

    /// Total size of main RAM (128 MiB).
    pub const RAM_SIZE: usize = 128 * 1024 * 1024;

    /// TLB entry count. Rounded up to a power of two if not already one.
    pub const TLB_SIZE: usize = 256;
}

/// Configuration for a hart's [`Mmu`](crate::core::units::mmu::Mmu) and the
/// [`PhysAddrSpace`](crate::soc::PhysAddrSpace) it translates into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MmuConfig {
    /// Base physical address of main RAM. Must be page-aligned.
    #[serde(default = "MmuConfig::default_ram_base")]
    pub ram_base: u64,

    /// Size of main RAM in bytes. Must be page-aligned and nonzero.
    #[serde(default = "MmuConfig::default_ram_size")]
    pub ram_size: usize,

    /// Number of TLB entries per hart.
    #[serde(default = "MmuConfig::default_tlb_size")]
    pub tlb_size: usize,
}

impl MmuConfig {
    const fn default_ram_base() -> u64 {
        defaults::RAM_BASE
    }

    const fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    const fn default_tlb_size() -> usize {
        defaults::TLB_SIZE
    }
}

impl Default for MmuConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
            tlb_size: defaults::TLB_SIZE,
        }
    }
}
