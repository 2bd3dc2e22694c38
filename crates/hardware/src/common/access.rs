//! Memory access classification.
//!
//! Access is a one-hot bitmask aligned with the PTE `R`/`W`/`X` bit
//! positions so a leaf permission check is a single `pte & access`.

use super::constants::{PTE_R, PTE_W, PTE_X};

/// Classifies a memory operation for permission checks and fault selection.
///
/// The discriminants deliberately match the PTE `R`(1)/`W`(2)/`X`(3) bit
/// positions: `pte.raw() & access.bits() != 0` is the leaf permission test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum Access {
    /// Data read (load). Matches PTE bit 1.
    Read = PTE_R,
    /// Data write (store). Matches PTE bit 2.
    Write = PTE_W,
    /// Instruction fetch. Matches PTE bit 3.
    Exec = PTE_X,
}

impl Access {
    #[must_use]
    pub const fn bits(self) -> u64 {
        self as u64
    }

    /// The trap cause to raise when translation succeeds but the resulting
    /// physical address is backed by neither RAM nor a device.
    #[must_use]
    pub const fn access_fault_cause(self) -> u64 {
        match self {
            Self::Read => super::constants::CAUSE_LOAD_FAULT,
            Self::Write => super::constants::CAUSE_STORE_FAULT,
            Self::Exec => super::constants::CAUSE_INSTR_FETCH_FAULT,
        }
    }

    /// The trap cause to raise when the page-walker finds no valid leaf.
    #[must_use]
    pub const fn page_fault_cause(self) -> u64 {
        match self {
            Self::Read => super::constants::CAUSE_LOAD_PAGEFAULT,
            Self::Write => super::constants::CAUSE_STORE_PAGEFAULT,
            Self::Exec => super::constants::CAUSE_INSTR_PAGEFAULT,
        }
    }
}
