//! Hart-local architectural state and execution units.
//!
//! This crate implements only the memory-management slice of a hart: the
//! architectural context the MMU reads (`arch`) and the MMU itself
//! (`units::mmu`). The instruction pipeline, decoder, and register files
//! that would normally live here are external collaborators.

/// Architecture-specific components consumed by the MMU (privilege modes,
/// translation context).
pub mod arch;

/// Execution units. Presently just the memory management unit.
pub mod units;
