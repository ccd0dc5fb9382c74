//! C ABI surface for callers that cannot reach the SDK's globals.
//!
//! With the `export-symbols` feature the functions below are exported under
//! their plain C names. Without it they keep Rust's mangled names so that a
//! host process keeps using its C library's own `posix_memalign`.

use std::ptr;

use libc::{c_int, c_void, size_t};

use crate::{
  memalign::AlignedAllocator,
  peripheral::{self, I2cInst, PeripheralHandle, PioHw, SpiInst, UartInst},
};

/// Allocates `size` bytes aligned to `alignment` and stores the address in `*memptr`.
///
/// Returns `0` on success, `EINVAL` when `alignment` is not a power of two
/// multiple of the pointer width, `ENOMEM` when the allocation fails. On
/// failure `*memptr` is left untouched. The block is released with `free()`.
///
/// # Safety
///
/// `memptr` must be valid for a pointer-sized write.
#[cfg_attr(
  all(feature = "export-symbols", any(target_os = "linux", target_os = "android")),
  unsafe(no_mangle)
)]
pub unsafe extern "C" fn posix_memalign(
  memptr: *mut *mut c_void,
  alignment: size_t,
  size: size_t,
) -> c_int {
  match AlignedAllocator::host().allocate_aligned(alignment, size) {
    Ok(block) => {
      unsafe { *memptr = block.into_raw() as *mut c_void };
      0
    }
    Err(err) => err.errno(),
  }
}

fn raw<T>(handle: Option<PeripheralHandle<T>>) -> *mut T {
  handle.map_or(ptr::null_mut(), |handle| handle.as_ptr())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_uart0() -> *mut UartInst {
  raw(peripheral::uart0())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_uart1() -> *mut UartInst {
  raw(peripheral::uart1())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_spi0() -> *mut SpiInst {
  raw(peripheral::spi0())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_spi1() -> *mut SpiInst {
  raw(peripheral::spi1())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_i2c0() -> *mut I2cInst {
  raw(peripheral::i2c0())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_i2c1() -> *mut I2cInst {
  raw(peripheral::i2c1())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_pio0() -> *mut PioHw {
  raw(peripheral::pio0())
}

#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_pio1() -> *mut PioHw {
  raw(peripheral::pio1())
}

/// Null on chips with two PIO blocks.
#[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
pub extern "C" fn get_pio2() -> *mut PioHw {
  raw(peripheral::pio2())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    align::POINTER_WIDTH,
    config::TARGET_CHIP,
    peripheral::{Chip, Peripheral},
  };

  const SENTINEL: *mut c_void = 0xDEAD_BEE0usize as *mut c_void;

  #[test]
  fn test_posix_memalign_success() {
    let mut out: *mut c_void = ptr::null_mut();

    unsafe {
      assert_eq!(posix_memalign(&mut out, 16, 256), 0);
      assert!(!out.is_null());
      assert_eq!(out as usize % 16, 0);

      libc::free(out);
    }
  }

  #[test]
  fn test_posix_memalign_einval_leaves_output() {
    let mut out = SENTINEL;

    unsafe {
      assert_eq!(posix_memalign(&mut out, POINTER_WIDTH + 1, 64), libc::EINVAL);
      assert_eq!(out, SENTINEL);

      assert_eq!(posix_memalign(&mut out, POINTER_WIDTH * 3, 64), libc::EINVAL);
      assert_eq!(out, SENTINEL);
    }
  }

  #[test]
  fn test_posix_memalign_enomem_leaves_output() {
    let mut out = SENTINEL;

    unsafe {
      assert_eq!(posix_memalign(&mut out, 64, usize::MAX / 2 + 1), libc::ENOMEM);
      assert_eq!(out, SENTINEL);
    }
  }

  #[test]
  fn test_posix_memalign_pointer_width_zero_size() {
    let mut out = SENTINEL;

    unsafe {
      let rc = posix_memalign(&mut out, POINTER_WIDTH, 0);
      assert_ne!(rc, libc::EINVAL);

      if rc == 0 {
        libc::free(out);
      } else {
        assert_eq!(out, SENTINEL);
      }
    }
  }

  #[test]
  fn test_getters() {
    let addr = |peripheral| TARGET_CHIP.base_address(peripheral).unwrap_or(0);

    assert_eq!(get_uart0() as usize, addr(Peripheral::Uart0));
    assert_eq!(get_uart1() as usize, addr(Peripheral::Uart1));
    assert_eq!(get_spi0() as usize, addr(Peripheral::Spi0));
    assert_eq!(get_spi1() as usize, addr(Peripheral::Spi1));
    assert_eq!(get_i2c0() as usize, addr(Peripheral::I2c0));
    assert_eq!(get_i2c1() as usize, addr(Peripheral::I2c1));
    assert_eq!(get_pio0() as usize, addr(Peripheral::Pio0));
    assert_eq!(get_pio1() as usize, addr(Peripheral::Pio1));
    assert_eq!(get_pio2() as usize, addr(Peripheral::Pio2));

    if TARGET_CHIP == Chip::Rp2040 {
      assert!(get_pio2().is_null());
    }
  }
}
