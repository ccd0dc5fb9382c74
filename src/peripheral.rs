//! Read-only registry of the chip's fixed peripheral instances.
//!
//! A handle is only an address. The register blocks belong to the device,
//! so nothing here allocates, copies, writes or dereferences them.

use std::{fmt, marker::PhantomData, ptr::NonNull};

use crate::config::TARGET_CHIP;

/// UART register block, `uart_inst_t` in the SDK.
#[repr(C)]
pub struct UartInst {
  _private: [u8; 0],
}

/// SPI register block, `spi_inst_t` in the SDK.
#[repr(C)]
pub struct SpiInst {
  _private: [u8; 0],
}

/// I2C register block, `i2c_inst_t` in the SDK.
#[repr(C)]
pub struct I2cInst {
  _private: [u8; 0],
}

/// PIO register block, `pio_hw_t` in the SDK.
#[repr(C)]
pub struct PioHw {
  _private: [u8; 0],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chip {
  Rp2040,
  Rp2350,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeripheralFamily {
  Uart,
  Spi,
  I2c,
  Pio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Peripheral {
  Uart0,
  Uart1,
  Spi0,
  Spi1,
  I2c0,
  I2c1,
  Pio0,
  Pio1,
  Pio2,
}

impl Peripheral {
  pub const ALL: [Peripheral; 9] = [
    Peripheral::Uart0,
    Peripheral::Uart1,
    Peripheral::Spi0,
    Peripheral::Spi1,
    Peripheral::I2c0,
    Peripheral::I2c1,
    Peripheral::Pio0,
    Peripheral::Pio1,
    Peripheral::Pio2,
  ];

  pub const fn family(self) -> PeripheralFamily {
    match self {
      Peripheral::Uart0 | Peripheral::Uart1 => PeripheralFamily::Uart,
      Peripheral::Spi0 | Peripheral::Spi1 => PeripheralFamily::Spi,
      Peripheral::I2c0 | Peripheral::I2c1 => PeripheralFamily::I2c,
      Peripheral::Pio0 | Peripheral::Pio1 | Peripheral::Pio2 => PeripheralFamily::Pio,
    }
  }

  /// Instance number within the family.
  pub const fn index(self) -> u8 {
    match self {
      Peripheral::Uart0 | Peripheral::Spi0 | Peripheral::I2c0 | Peripheral::Pio0 => 0,
      Peripheral::Uart1 | Peripheral::Spi1 | Peripheral::I2c1 | Peripheral::Pio1 => 1,
      Peripheral::Pio2 => 2,
    }
  }
}

impl fmt::Display for Peripheral {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let family = match self.family() {
      PeripheralFamily::Uart => "uart",
      PeripheralFamily::Spi => "spi",
      PeripheralFamily::I2c => "i2c",
      PeripheralFamily::Pio => "pio",
    };
    write!(f, "{}{}", family, self.index())
  }
}

impl Chip {
  /// Register block base address from the chip datasheet, `None` when the
  /// chip has no such instance.
  pub const fn base_address(
    self,
    peripheral: Peripheral,
  ) -> Option<usize> {
    match self {
      Chip::Rp2040 => match peripheral {
        Peripheral::Uart0 => Some(0x4003_4000),
        Peripheral::Uart1 => Some(0x4003_8000),
        Peripheral::Spi0 => Some(0x4003_c000),
        Peripheral::Spi1 => Some(0x4004_0000),
        Peripheral::I2c0 => Some(0x4004_4000),
        Peripheral::I2c1 => Some(0x4004_8000),
        Peripheral::Pio0 => Some(0x5020_0000),
        Peripheral::Pio1 => Some(0x5030_0000),
        Peripheral::Pio2 => None,
      },
      Chip::Rp2350 => match peripheral {
        Peripheral::Uart0 => Some(0x4007_0000),
        Peripheral::Uart1 => Some(0x4007_8000),
        Peripheral::Spi0 => Some(0x4008_0000),
        Peripheral::Spi1 => Some(0x4008_8000),
        Peripheral::I2c0 => Some(0x4009_0000),
        Peripheral::I2c1 => Some(0x4009_8000),
        Peripheral::Pio0 => Some(0x5020_0000),
        Peripheral::Pio1 => Some(0x5030_0000),
        Peripheral::Pio2 => Some(0x5040_0000),
      },
    }
  }
}

/// Address of a fixed peripheral instance.
pub struct PeripheralHandle<T> {
  ptr: NonNull<T>,
  _marker: PhantomData<*mut T>,
}

impl<T> PeripheralHandle<T> {
  fn at(addr: usize) -> Option<Self> {
    NonNull::new(addr as *mut T).map(|ptr| Self {
      ptr,
      _marker: PhantomData,
    })
  }

  pub fn as_ptr(&self) -> *mut T {
    self.ptr.as_ptr()
  }

  pub fn addr(&self) -> usize {
    self.ptr.as_ptr() as usize
  }
}

impl<T> Clone for PeripheralHandle<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for PeripheralHandle<T> {}

impl<T> PartialEq for PeripheralHandle<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.ptr == other.ptr
  }
}

impl<T> Eq for PeripheralHandle<T> {}

impl<T> fmt::Debug for PeripheralHandle<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "PeripheralHandle({:#010x})", self.addr())
  }
}

fn lookup<T>(peripheral: Peripheral) -> Option<PeripheralHandle<T>> {
  TARGET_CHIP.base_address(peripheral).and_then(PeripheralHandle::at)
}

pub fn uart0() -> Option<PeripheralHandle<UartInst>> {
  lookup(Peripheral::Uart0)
}

pub fn uart1() -> Option<PeripheralHandle<UartInst>> {
  lookup(Peripheral::Uart1)
}

pub fn spi0() -> Option<PeripheralHandle<SpiInst>> {
  lookup(Peripheral::Spi0)
}

pub fn spi1() -> Option<PeripheralHandle<SpiInst>> {
  lookup(Peripheral::Spi1)
}

pub fn i2c0() -> Option<PeripheralHandle<I2cInst>> {
  lookup(Peripheral::I2c0)
}

pub fn i2c1() -> Option<PeripheralHandle<I2cInst>> {
  lookup(Peripheral::I2c1)
}

pub fn pio0() -> Option<PeripheralHandle<PioHw>> {
  lookup(Peripheral::Pio0)
}

pub fn pio1() -> Option<PeripheralHandle<PioHw>> {
  lookup(Peripheral::Pio1)
}

/// Present on RP2350 only.
pub fn pio2() -> Option<PeripheralHandle<PioHw>> {
  lookup(Peripheral::Pio2)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rp2040_table() {
    assert_eq!(Chip::Rp2040.base_address(Peripheral::Uart0), Some(0x4003_4000));
    assert_eq!(Chip::Rp2040.base_address(Peripheral::I2c1), Some(0x4004_8000));
    assert_eq!(Chip::Rp2040.base_address(Peripheral::Pio1), Some(0x5030_0000));
    assert_eq!(Chip::Rp2040.base_address(Peripheral::Pio2), None);
  }

  #[test]
  fn test_rp2350_has_every_instance() {
    for peripheral in Peripheral::ALL {
      assert!(Chip::Rp2350.base_address(peripheral).is_some(), "{peripheral}");
    }
    assert_eq!(Chip::Rp2350.base_address(Peripheral::Pio2), Some(0x5040_0000));
  }

  #[test]
  fn test_getters_match_table() {
    let expect = |peripheral| TARGET_CHIP.base_address(peripheral);

    assert_eq!(uart0().map(|h| h.addr()), expect(Peripheral::Uart0));
    assert_eq!(uart1().map(|h| h.addr()), expect(Peripheral::Uart1));
    assert_eq!(spi0().map(|h| h.addr()), expect(Peripheral::Spi0));
    assert_eq!(spi1().map(|h| h.addr()), expect(Peripheral::Spi1));
    assert_eq!(i2c0().map(|h| h.addr()), expect(Peripheral::I2c0));
    assert_eq!(i2c1().map(|h| h.addr()), expect(Peripheral::I2c1));
    assert_eq!(pio0().map(|h| h.addr()), expect(Peripheral::Pio0));
    assert_eq!(pio1().map(|h| h.addr()), expect(Peripheral::Pio1));
    assert_eq!(pio2().map(|h| h.addr()), expect(Peripheral::Pio2));
  }

  #[test]
  fn test_getters_are_stable() {
    assert_eq!(uart0(), uart0());
    assert_eq!(pio0(), pio0());
    assert_ne!(uart0(), uart1());
  }

  #[test]
  fn test_families_and_names() {
    assert_eq!(Peripheral::Spi1.family(), PeripheralFamily::Spi);
    assert_eq!(Peripheral::Pio2.index(), 2);
    assert_eq!(Peripheral::I2c0.to_string(), "i2c0");
    assert_eq!(Peripheral::Uart1.to_string(), "uart1");
  }
}
