//! Trap representation and page-walk fault classification.
//!
//! The MMU core never bubbles faults up as `Result` values to the executor;
//! per the trap-vector contract (owned externally) a fault is reported by
//! calling [`TrapSink::raise`](crate::core::units::mmu::TrapSink) and the
//! dispatcher returns `false`. `Trap` exists so that call can carry a typed,
//! displayable cause instead of a bare `u64`.

use thiserror::Error;

use super::constants::{
    CAUSE_INSTR_FETCH_FAULT, CAUSE_INSTR_PAGEFAULT, CAUSE_LOAD_FAULT, CAUSE_LOAD_PAGEFAULT,
    CAUSE_STORE_FAULT, CAUSE_STORE_PAGEFAULT,
};

/// Synchronous exceptions the virtual-memory core can raise.
///
/// Discriminant values match the RISC-V privileged specification's `mcause`/
/// `scause` encoding (see [`Trap::cause`]); the trap vector and CSR file that
/// consume them are owned outside this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    /// Instruction fetch landed on a physical address backed by neither RAM
    /// nor a device. `tval` is the faulting virtual address.
    #[error("instruction access fault at {0:#x}")]
    InstructionAccessFault(u64),

    /// Load landed on a physical address backed by neither RAM nor a device.
    #[error("load access fault at {0:#x}")]
    LoadAccessFault(u64),

    /// Store landed on a physical address backed by neither RAM nor a device.
    #[error("store access fault at {0:#x}")]
    StoreAccessFault(u64),

    /// The page-walker found no valid, sufficiently-permissioned leaf for an
    /// instruction fetch.
    #[error("instruction page fault at {0:#x}")]
    InstructionPageFault(u64),

    /// The page-walker found no valid, sufficiently-permissioned leaf for a
    /// load.
    #[error("load page fault at {0:#x}")]
    LoadPageFault(u64),

    /// The page-walker found no valid, sufficiently-permissioned leaf for a
    /// store.
    #[error("store page fault at {0:#x}")]
    StorePageFault(u64),
}

impl Trap {
    /// The numeric `mcause`/`scause` value for this trap, per the RISC-V
    /// privileged specification.
    #[must_use]
    pub const fn cause(self) -> u64 {
        match self {
            Self::InstructionAccessFault(_) => CAUSE_INSTR_FETCH_FAULT,
            Self::LoadAccessFault(_) => CAUSE_LOAD_FAULT,
            Self::StoreAccessFault(_) => CAUSE_STORE_FAULT,
            Self::InstructionPageFault(_) => CAUSE_INSTR_PAGEFAULT,
            Self::LoadPageFault(_) => CAUSE_LOAD_PAGEFAULT,
            Self::StorePageFault(_) => CAUSE_STORE_PAGEFAULT,
        }
    }

    /// The `tval` value to report alongside this trap: always the original
    /// virtual address passed to the dispatcher, never a split sub-range.
    #[must_use]
    pub const fn tval(self) -> u64 {
        match self {
            Self::InstructionAccessFault(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAccessFault(v)
            | Self::InstructionPageFault(v)
            | Self::LoadPageFault(v)
            | Self::StorePageFault(v) => v,
        }
    }
}

/// Outcome of a page-table walk, distinguishing a missing/invalid leaf from
/// a PTE load that landed outside of RAM. The original RVVM walker conflates
/// both into a single `false`; the dispatcher needs the distinction to pick
/// between a page fault and an access fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFault {
    /// No valid, permission-satisfying leaf was found.
    PageFault,
    /// A PTE load landed on a physical address with no RAM backing.
    AccessFault,
}
