//! Execution units.
//!
//! The ALU, FPU, branch unit, cache, and prefetcher that would normally
//! live alongside the MMU here are external to this crate's scope.

/// Memory management unit: TLB, page-table walker, and the dispatcher that
/// ties them to the physical address space.
pub mod mmu;
