//! A mocked `MmioDevice` for black-box dispatcher tests.
//!
//! `contains` is left off the mocked method list entirely, which makes
//! `mockall` fall back to the trait's default body (driven by the mocked
//! `begin`/`end`), so tests never need to stub it separately.

use rvsim_mmu::common::addr::PhysAddr;
use rvsim_mmu::soc::traits::MmioDevice;

mockall::mock! {
    pub Device {}

    impl MmioDevice for Device {
        fn begin(&self) -> PhysAddr;
        fn end(&self) -> PhysAddr;
        fn min_op_size(&self) -> u8;
        fn max_op_size(&self) -> u8;
        fn read(&mut self, dst: &mut [u8], offset: u64);
        fn write(&mut self, src: &[u8], offset: u64);
    }
}
