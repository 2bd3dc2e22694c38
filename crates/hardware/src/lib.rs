//! Virtual-memory translation core for a RISC-V hart.
//!
//! This crate implements:
//! 1. **Common:** Address newtypes, page geometry and PTE/CSR bit constants,
//!    the access classification, and the trap/fault types.
//! 2. **Core:** The architectural context an MMU reads from the CSR file
//!    (`core::arch`) and the MMU itself — TLB, page-table walker, MMIO
//!    access engine, and dispatcher (`core::units::mmu`).
//! 3. **SoC:** The physical address space an MMU translates into: a RAM
//!    region plus an MMIO device registry.
//! 4. **Config:** RAM geometry and TLB sizing for assembling the above.
//!
//! The instruction pipeline, decoder, register files, CSR file, trap
//! vector, MMIO device implementations, and JIT trace cache are external
//! collaborators; this crate only defines the narrow interfaces
//! (`HartContext`, `TrapSink`, `JitInvalidate`, `MmioDevice`) it needs from
//! them.

/// Address newtypes, page geometry and bit-layout constants, access
/// classification, and trap/fault types.
pub mod common;
/// RAM geometry and TLB sizing.
pub mod config;
/// Per-hart architectural context and the memory management unit.
pub mod core;
/// The physical address space: RAM plus the MMIO device registry.
pub mod soc;

pub use crate::common::{Access, PhysAddr, Trap, VirtAddr, WalkFault};
pub use crate::config::MmuConfig;
pub use crate::core::arch::{HartContext, SatpMode, StatusFlags};
pub use crate::core::units::mmu::{JitInvalidate, Mmu, NoJit, TrapSink};
pub use crate::soc::{MmioDevice, PhysAddrSpace};
