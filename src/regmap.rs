//! Register access layer
//!
//! Everything above this module talks to the controller through [`Regmap`],
//! a byte wide register map that may sit on MMIO, I2C or a test double.

use core::ptr::NonNull;

use tock_registers::fields::FieldValue;
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{LocalRegisterCopy, RegisterLongName};

use crate::error::{Error, Result};
use crate::registers::HDMI_MAX_REGISTER;

/// Byte wide register map
pub trait Regmap {
    /// Read one register
    fn read(&mut self, reg: u32) -> Result<u8>;

    /// Write one register
    fn write(&mut self, reg: u32, val: u8) -> Result<()>;

    /// Read-modify-write the bits in `mask`, skipping the write when nothing changes
    fn update_bits(&mut self, reg: u32, mask: u8, val: u8) -> Result<()> {
        let cur = self.read(reg)?;
        let new = (cur & !mask) | (val & mask);
        if new == cur {
            return Ok(());
        }
        self.write(reg, new)
    }
}

impl<R: Regmap + ?Sized> Regmap for &mut R {
    fn read(&mut self, reg: u32) -> Result<u8> {
        (**self).read(reg)
    }

    fn write(&mut self, reg: u32, val: u8) -> Result<()> {
        (**self).write(reg, val)
    }

    fn update_bits(&mut self, reg: u32, mask: u8, val: u8) -> Result<()> {
        (**self).update_bits(reg, mask, val)
    }
}

/// Field level helpers over any [`Regmap`]
pub trait RegmapExt: Regmap {
    /// Write `data` into the field described by `shift` and `mask`
    fn mask_write(&mut self, data: u8, reg: u32, shift: u8, mask: u8) -> Result<()> {
        self.update_bits(reg, mask, (data << shift) & mask)
    }

    /// Read a register into a local copy for field decoding
    fn read_local<T: RegisterLongName>(&mut self, reg: u32) -> Result<LocalRegisterCopy<u8, T>> {
        Ok(LocalRegisterCopy::new(self.read(reg)?))
    }

    /// Read, apply `field`, write back
    fn modify<T: RegisterLongName>(&mut self, reg: u32, field: FieldValue<u8, T>) -> Result<()> {
        let mut val = self.read_local::<T>(reg)?;
        val.modify(field);
        self.write(reg, val.get())
    }

    /// Write `field` with every other bit cleared
    fn write_field<T: RegisterLongName>(&mut self, reg: u32, field: FieldValue<u8, T>) -> Result<()> {
        let mut val: LocalRegisterCopy<u8, T> = LocalRegisterCopy::new(0);
        val.write(field);
        self.write(reg, val.get())
    }
}

impl<R: Regmap + ?Sized> RegmapExt for R {}

/// Regmap wrapper that bounds retries on bus errors
///
/// Every access is attempted at most `attempts` times; the last bus error is
/// then handed to the caller. Other errors are returned immediately.
pub struct HdmiRegs<R> {
    map: R,
    attempts: u32,
}

impl<R: Regmap> HdmiRegs<R> {
    /// Wrap `map`
    pub fn new(map: R, attempts: u32) -> Self {
        Self {
            map,
            attempts: attempts.max(1),
        }
    }

    /// Borrow the wrapped map
    pub fn inner(&self) -> &R {
        &self.map
    }

    /// Mutably borrow the wrapped map
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.map
    }

    /// Unwrap
    pub fn into_inner(self) -> R {
        self.map
    }

    fn retry<T>(&mut self, reg: u32, mut op: impl FnMut(&mut R) -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match op(&mut self.map) {
                Err(Error::Bus { .. }) if attempt < self.attempts => {
                    log::warn!(
                        "hdmi: bus error at {:#06x}, attempt {}/{}",
                        reg,
                        attempt,
                        self.attempts
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl<R: Regmap> Regmap for HdmiRegs<R> {
    fn read(&mut self, reg: u32) -> Result<u8> {
        self.retry(reg, |map| map.read(reg))
    }

    fn write(&mut self, reg: u32, val: u8) -> Result<()> {
        self.retry(reg, |map| map.write(reg, val))
    }
}

/// Width of one register slot on the MMIO bus
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegIoWidth {
    /// Registers packed one per byte
    Byte = 1,
    /// Registers on 32 bit boundaries
    Word = 4,
}

/// MMIO register window
pub struct MmioRegmap {
    base: NonNull<u8>,
    width: RegIoWidth,
}

// SAFETY: the window is owned by one controller instance and all accesses
// go through `&mut self`.
unsafe impl Send for MmioRegmap {}

impl MmioRegmap {
    /// Create a window over the controller registers
    ///
    /// ## Safety
    ///
    /// - `base` must be aligned for `width` and map the whole controller
    ///   register file (`(HDMI_MAX_REGISTER + 1) * width` bytes).
    /// - The mapping must stay valid while the window exists.
    pub unsafe fn new(base: *mut u8, width: RegIoWidth) -> Result<MmioRegmap> {
        let base = NonNull::new(base).ok_or(Error::InvalidArgs)?;
        Ok(MmioRegmap { base, width })
    }

    fn check(reg: u32) -> Result<()> {
        if reg > HDMI_MAX_REGISTER {
            return Err(Error::InvalidArgs);
        }
        Ok(())
    }

    fn byte(&self, reg: u32) -> &ReadWrite<u8> {
        // SAFETY: `reg` is bounds checked and the window covers the
        // register file as promised by the caller of `new`.
        unsafe { &*(self.base.as_ptr().add(reg as usize) as *const ReadWrite<u8>) }
    }

    fn word(&self, reg: u32) -> &ReadWrite<u32> {
        // SAFETY: as for `byte`, with the 4 byte stride the caller promised.
        unsafe { &*(self.base.as_ptr().add(reg as usize * 4) as *const ReadWrite<u32>) }
    }
}

impl Regmap for MmioRegmap {
    fn read(&mut self, reg: u32) -> Result<u8> {
        Self::check(reg)?;
        Ok(match self.width {
            RegIoWidth::Byte => self.byte(reg).get(),
            RegIoWidth::Word => self.word(reg).get() as u8,
        })
    }

    fn write(&mut self, reg: u32, val: u8) -> Result<()> {
        Self::check(reg)?;
        match self.width {
            RegIoWidth::Byte => self.byte(reg).set(val),
            RegIoWidth::Word => self.word(reg).set(val.into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{HDMI_PHY_CONF0, PHY_CONF0};

    struct Flaky {
        fail_left: u32,
        value: u8,
        reads: u32,
    }

    impl Regmap for Flaky {
        fn read(&mut self, reg: u32) -> Result<u8> {
            self.reads += 1;
            if self.fail_left > 0 {
                self.fail_left -= 1;
                return Err(Error::Bus { reg });
            }
            Ok(self.value)
        }

        fn write(&mut self, _reg: u32, val: u8) -> Result<()> {
            self.value = val;
            Ok(())
        }
    }

    #[test]
    fn retries_until_success() {
        let mut regs = HdmiRegs::new(Flaky { fail_left: 2, value: 0x5a, reads: 0 }, 3);
        assert_eq!(regs.read(0x10).unwrap(), 0x5a);
        assert_eq!(regs.inner().reads, 3);
    }

    #[test]
    fn bus_error_surfaces_after_attempts() {
        let mut regs = HdmiRegs::new(Flaky { fail_left: 5, value: 0, reads: 0 }, 3);
        assert_eq!(regs.read(0x10), Err(Error::Bus { reg: 0x10 }));
        assert_eq!(regs.inner().reads, 3);
    }

    #[test]
    fn field_helpers() {
        let mut map = Flaky { fail_left: 0, value: 0x00, reads: 0 };
        map.modify(HDMI_PHY_CONF0, PHY_CONF0::GEN2_PDDQ::SET).unwrap();
        assert_eq!(map.value, 0x10);
        map.mask_write(1, HDMI_PHY_CONF0, 3, 0x08).unwrap();
        assert_eq!(map.value, 0x18);
        map.write_field(HDMI_PHY_CONF0, PHY_CONF0::PDZ::SET).unwrap();
        assert_eq!(map.value, 0x80);
        let local = map.read_local::<PHY_CONF0::Register>(HDMI_PHY_CONF0).unwrap();
        assert!(local.is_set(PHY_CONF0::PDZ));
    }

    #[test]
    fn mmio_byte_window() {
        let mut backing = [0u8; (HDMI_MAX_REGISTER + 1) as usize];
        let mut map = unsafe { MmioRegmap::new(backing.as_mut_ptr(), RegIoWidth::Byte) }.unwrap();
        map.write(0x3000, 0xa5).unwrap();
        assert_eq!(map.read(0x3000).unwrap(), 0xa5);
        assert_eq!(map.read(HDMI_MAX_REGISTER + 1), Err(Error::InvalidArgs));
    }
}
