//! MMIO access engine.
//!
//! A device only has to implement `read`/`write` for sizes in
//! `[min_op_size, max_op_size]` at a `min_op_size`-aligned offset. Everything
//! else funnels through here: oversized accesses are split in half and
//! recursed on, undersized or misaligned ones are serviced by reading (or
//! read-modifying-writing) an aligned chunk and slicing the caller's bytes
//! out of it.

use crate::soc::traits::MmioDevice;

/// Largest chunk the scratch buffer can hold; generous for the access
/// widths (1/2/4/8 bytes) real devices declare.
const SCRATCH_LEN: usize = 16;

fn aligned_chunk(min: u64, offset: u64, len: u64) -> (u64, u64) {
    let mut chunk = min.max(1);
    let mut aligned = offset & !(chunk - 1);
    while aligned + chunk < offset + len {
        chunk *= 2;
        aligned = offset & !(chunk - 1);
    }
    debug_assert!(chunk as usize <= SCRATCH_LEN, "MMIO chunk exceeds scratch buffer");
    (aligned, chunk)
}

/// Services a read of `dst.len()` bytes at `offset`, normalizing size and
/// alignment as needed.
pub fn read(device: &mut dyn MmioDevice, offset: u64, dst: &mut [u8]) {
    let min = u64::from(device.min_op_size());
    let max = u64::from(device.max_op_size());
    let len = dst.len() as u64;

    if len > max {
        let half = dst.len() / 2;
        let (lo, hi) = dst.split_at_mut(half);
        read(device, offset, lo);
        read(device, offset + half as u64, hi);
        return;
    }

    if len < min || offset % min != 0 {
        let (aligned, chunk) = aligned_chunk(min, offset, len);
        let mut buf = [0u8; SCRATCH_LEN];
        device.read(&mut buf[..chunk as usize], aligned);
        let start = (offset - aligned) as usize;
        dst.copy_from_slice(&buf[start..start + dst.len()]);
        return;
    }

    device.read(dst, offset);
}

/// Services a write of `src.len()` bytes at `offset`, normalizing size and
/// alignment as needed. A misaligned or undersized write is a
/// read-modify-write of the aligned chunk that contains it.
pub fn write(device: &mut dyn MmioDevice, offset: u64, src: &[u8]) {
    let min = u64::from(device.min_op_size());
    let max = u64::from(device.max_op_size());
    let len = src.len() as u64;

    if len > max {
        let half = src.len() / 2;
        let (lo, hi) = src.split_at(half);
        write(device, offset, lo);
        write(device, offset + half as u64, hi);
        return;
    }

    if len < min || offset % min != 0 {
        let (aligned, chunk) = aligned_chunk(min, offset, len);
        let mut buf = [0u8; SCRATCH_LEN];
        device.read(&mut buf[..chunk as usize], aligned);
        let start = (offset - aligned) as usize;
        buf[start..start + src.len()].copy_from_slice(src);
        device.write(&buf[..chunk as usize], aligned);
        return;
    }

    device.write(src, offset);
}
