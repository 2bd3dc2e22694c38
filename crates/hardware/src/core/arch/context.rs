//! Translation context consumed from the hart/CSR file.
//!
//! The CSR file itself is owned outside this crate; `HartContext` is the
//! narrow, read-only view the MMU needs on every translation: current
//! privilege, the `status` bits that affect effective privilege/access
//! (`MPRV`, `MXR`, `MPP`), and the active paging mode with its page-table
//! root.

use crate::common::constants::{
    MSTATUS_MPP_MASK, MSTATUS_MPP_SHIFT, MSTATUS_MPRV, MSTATUS_MXR, SATP_MODE_BARE,
    SATP_MODE_SV32, SATP_MODE_SV39, SATP_MODE_SV48, SATP_MODE_SV57,
};
use crate::common::PhysAddr;

use super::mode::PrivilegeMode;

/// The paging mode selected by `satp`, tagging which page-walker shape
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatpMode {
    /// No translation; physical address equals virtual address.
    Bare,
    /// 2-level, 4-byte PTEs, 10-bit VPN fields, 34-bit physical addresses.
    Sv32,
    /// 3-level, 8-byte PTEs, 9-bit VPN fields, 56-bit physical addresses.
    Sv39,
    /// 4-level Sv64 family member.
    Sv48,
    /// 5-level Sv64 family member.
    Sv57,
}

impl SatpMode {
    /// Decodes the `satp`/`mmu_mode` selector field. `satp` is WARL: modes
    /// outside this set must have been rejected at CSR-write time by the
    /// (externally owned) CSR file, so there is no "unknown" variant here.
    #[must_use]
    pub const fn decode(raw: u64) -> Option<Self> {
        match raw {
            SATP_MODE_BARE => Some(Self::Bare),
            SATP_MODE_SV32 => Some(Self::Sv32),
            SATP_MODE_SV39 => Some(Self::Sv39),
            SATP_MODE_SV48 => Some(Self::Sv48),
            SATP_MODE_SV57 => Some(Self::Sv57),
            _ => None,
        }
    }

    /// Number of page-table levels, meaningless for `Bare`.
    #[must_use]
    pub const fn levels(self) -> u32 {
        match self {
            Self::Bare => 0,
            Self::Sv32 => crate::common::constants::SV32_LEVELS,
            Self::Sv39 => crate::common::constants::SV39_LEVELS,
            Self::Sv48 => crate::common::constants::SV48_LEVELS,
            Self::Sv57 => crate::common::constants::SV57_LEVELS,
        }
    }
}

/// The subset of `mstatus` the translation path reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags(pub u64);

impl StatusFlags {
    #[must_use]
    pub const fn mprv(self) -> bool {
        self.0 & MSTATUS_MPRV != 0
    }

    #[must_use]
    pub const fn mxr(self) -> bool {
        self.0 & MSTATUS_MXR != 0
    }

    /// The privilege mode recorded in `MPP`, used as the effective privilege
    /// for data accesses while `MPRV` is set.
    #[must_use]
    pub fn mpp(self) -> PrivilegeMode {
        let raw = ((self.0 & MSTATUS_MPP_MASK) >> MSTATUS_MPP_SHIFT) as u8;
        PrivilegeMode::from_u8(raw)
    }
}

/// Per-hart translation context: everything the MMU needs from the CSR file
/// to resolve one virtual address, aside from the TLB it owns itself.
#[derive(Debug, Clone, Copy)]
pub struct HartContext {
    pub priv_mode: PrivilegeMode,
    pub status: StatusFlags,
    pub satp_mode: SatpMode,
    pub root_page_table: PhysAddr,
}

impl HartContext {
    #[must_use]
    pub const fn new(
        priv_mode: PrivilegeMode,
        status: StatusFlags,
        satp_mode: SatpMode,
        root_page_table: PhysAddr,
    ) -> Self {
        Self {
            priv_mode,
            status,
            satp_mode,
            root_page_table,
        }
    }
}
