/// A `mockall`-generated `MmioDevice`.
pub mod device;
