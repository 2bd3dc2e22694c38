//! # Address Arithmetic Tests
//!
//! This module contains unit tests for the `VirtAddr` and `PhysAddr` types.
//! It verifies the correctness of address construction, value retrieval,
//! page offset/VPN calculations, and comparison logic.

use rvsim_mmu::{PhysAddr, VirtAddr};

/// Tests the creation of a [`VirtAddr`] and verifies that the stored value
/// can be retrieved correctly.
#[test]
fn virt_addr_new_and_val() {
    let va = VirtAddr::new(0x8000_1234);
    assert_eq!(va.val(), 0x8000_1234);
}

/// Tests that a virtual address can be initialized to zero.
#[test]
fn virt_addr_zero() {
    let va = VirtAddr::new(0);
    assert_eq!(va.val(), 0);
}

/// Verifies that a [`VirtAddr`] can be initialized with the maximum `u64` value.
#[test]
fn virt_addr_max() {
    let va = VirtAddr::new(u64::MAX);
    assert_eq!(va.val(), u64::MAX);
}

/// Tests that a page-aligned virtual address results in a page offset of zero.
#[test]
fn virt_addr_page_offset_aligned() {
    let va = VirtAddr::new(0x8000_0000);
    assert_eq!(va.page_offset(), 0);
}

/// Tests that `page_offset` correctly extracts a non-zero offset from a virtual address.
#[test]
fn virt_addr_page_offset_nonzero() {
    let va = VirtAddr::new(0x8000_0ABC);
    assert_eq!(va.page_offset(), 0xABC);
}

/// Tests that `page_offset` only considers the lower 12 bits, even for large addresses.
#[test]
fn virt_addr_page_offset_only_lower_12_bits() {
    let va = VirtAddr::new(0xFFFF_FFFF_FFFF_FFFF);
    assert_eq!(va.page_offset(), 0xFFF);
}

/// Tests that `vpn` is the address shifted right by the page shift, with no
/// masking of the upper bits.
#[test]
fn virt_addr_vpn_is_the_page_shifted_address() {
    let va = VirtAddr::new(0x0040_3ABC);
    assert_eq!(va.vpn(), 0x0040_3ABC >> 12);
}

/// Verifies the implementation of equality and ordering for virtual addresses.
#[test]
fn virt_addr_equality_and_ordering() {
    assert_eq!(VirtAddr::new(42), VirtAddr::new(42));
    assert!(VirtAddr::new(100) < VirtAddr::new(200));
}

/// Verifies basic construction and value retrieval for physical addresses.
#[test]
fn phys_addr_new_and_val() {
    let pa = PhysAddr::new(0x8000_0000);
    assert_eq!(pa.val(), 0x8000_0000);
}

/// Verifies that a physical address can represent the maximum 64-bit value.
#[test]
fn phys_addr_max() {
    let pa = PhysAddr::new(u64::MAX);
    assert_eq!(pa.val(), u64::MAX);
}

/// Tests that `page_aligned` clears the in-page offset bits.
#[test]
fn phys_addr_page_aligned_drops_the_offset() {
    let pa = PhysAddr::new(0x8020_1234);
    assert_eq!(pa.page_aligned(), 0x8020_1000);
}

/// Verifies the implementation of equality and ordering for physical addresses.
#[test]
fn phys_addr_equality_and_ordering() {
    assert_eq!(PhysAddr::new(1000), PhysAddr::new(1000));
    assert_ne!(PhysAddr::new(1000), PhysAddr::new(1001));
    assert!(PhysAddr::new(0x1000) < PhysAddr::new(0x2000));
}

/// Verifies that virtual and physical addresses are distinct types even when
/// holding the same underlying value.
#[test]
fn virt_and_phys_same_value_not_interchangeable() {
    let v = VirtAddr::new(0x1234);
    let p = PhysAddr::new(0x1234);
    assert_eq!(v.val(), p.val());
}

/// Verifies the `Display` formatting used in trace logging.
#[test]
fn addresses_format_as_lowercase_hex() {
    assert_eq!(format!("{}", VirtAddr::new(0xABCD)), "0xabcd");
    assert_eq!(format!("{}", PhysAddr::new(0xABCD)), "0xabcd");
}
