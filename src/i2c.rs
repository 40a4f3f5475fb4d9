//! I2C device glue
//!
//! Drivers are registered explicitly with an [`I2cRegistry`] owned by the
//! host application. Matching follows the usual order: OF compatible string
//! first, then the I2C id table.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::error::{Error, Result};
use crate::regmap::Regmap;

/// Entry of an I2C id table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct I2cDeviceId {
    pub name: &'static str,
    pub driver_data: usize,
}

/// Entry of an OF match table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OfDeviceId {
    pub compatible: &'static str,
}

/// A device on an I2C bus
pub struct I2cClient<B> {
    pub bus: B,
    /// 7 bit slave address
    pub addr: u8,
    /// Device name as listed in the id table
    pub name: &'static str,
    /// OF compatible string, if described by firmware
    pub compatible: Option<&'static str>,
}

/// Driver for devices on an I2C bus
pub trait I2cDriver<B> {
    fn name(&self) -> &'static str;

    fn id_table(&self) -> &'static [I2cDeviceId];

    fn of_match_table(&self) -> &'static [OfDeviceId] {
        &[]
    }

    /// Bind to `client`; `id` is the matching id table entry, if matched by name
    fn probe(&self, client: I2cClient<B>, id: Option<&I2cDeviceId>) -> Result<()>;

    /// Unbind from the device at `addr`
    fn remove(&self, addr: u8) -> Result<()>;
}

/// Fixed capacity driver registry
pub struct I2cRegistry<'a, B, const N: usize> {
    drivers: [Option<&'a dyn I2cDriver<B>>; N],
}

impl<'a, B, const N: usize> I2cRegistry<'a, B, N> {
    pub const fn new() -> Self {
        Self { drivers: [None; N] }
    }

    /// Add `driver`; names must be unique
    pub fn register(&mut self, driver: &'a dyn I2cDriver<B>) -> Result<()> {
        if self.find(driver.name()).is_some() {
            log::error!("i2c: driver {} already registered", driver.name());
            return Err(Error::InvalidArgs);
        }
        let slot = self
            .drivers
            .iter_mut()
            .find(|d| d.is_none())
            .ok_or(Error::InvalidArgs)?;
        *slot = Some(driver);
        log::debug!("i2c: registered driver {}", driver.name());
        Ok(())
    }

    /// Remove the driver called `name`
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let idx = self.find(name).ok_or(Error::NoDevice)?;
        self.drivers[idx] = None;
        log::debug!("i2c: unregistered driver {}", name);
        Ok(())
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.drivers
            .iter()
            .position(|d| d.map_or(false, |d| d.name() == name))
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        self.drivers.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Driver for a device called `name` with an optional OF `compatible`
    pub fn match_device(
        &self,
        name: &str,
        compatible: Option<&str>,
    ) -> Option<(&'a dyn I2cDriver<B>, Option<&'static I2cDeviceId>)> {
        let drivers = self.drivers.iter().flatten();

        if let Some(compat) = compatible {
            for drv in drivers.clone() {
                if drv.of_match_table().iter().any(|of| of.compatible == compat) {
                    let id = drv.id_table().iter().find(|id| id.name == name);
                    return Some((*drv, id));
                }
            }
        }

        for drv in drivers {
            if let Some(id) = drv.id_table().iter().find(|id| id.name == name) {
                return Some((*drv, Some(id)));
            }
        }
        None
    }

    /// Match `client` and hand it to the driver
    pub fn probe(&self, client: I2cClient<B>) -> Result<&'a dyn I2cDriver<B>> {
        let (drv, id) = self.match_device(client.name, client.compatible).ok_or_else(|| {
            log::debug!("i2c: no driver for {}", client.name);
            Error::NoDevice
        })?;
        drv.probe(client, id)?;
        Ok(drv)
    }
}

impl<'a, B, const N: usize> Default for I2cRegistry<'a, B, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Register map with 16 bit addresses and 8 bit values on an I2C device
pub struct I2cRegmap<B> {
    bus: B,
    addr: u8,
    max_register: u16,
}

impl<B, E> I2cRegmap<B>
where
    B: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(bus: B, addr: u8, max_register: u16) -> Self {
        Self {
            bus,
            addr,
            max_register,
        }
    }

    pub fn max_register(&self) -> u16 {
        self.max_register
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    fn check(&self, reg: u32) -> Result<u16> {
        u16::try_from(reg)
            .ok()
            .filter(|r| *r <= self.max_register)
            .ok_or(Error::InvalidArgs)
    }
}

impl<B, E> Regmap for I2cRegmap<B>
where
    B: Write<Error = E> + WriteRead<Error = E>,
{
    fn read(&mut self, reg: u32) -> Result<u8> {
        let r = self.check(reg)?;
        let mut val = [0u8; 1];
        self.bus
            .write_read(self.addr, &r.to_be_bytes(), &mut val)
            .map_err(|_| Error::Bus { reg })?;
        Ok(val[0])
    }

    fn write(&mut self, reg: u32, val: u8) -> Result<()> {
        let r = self.check(reg)?.to_be_bytes();
        self.bus
            .write(self.addr, &[r[0], r[1], val])
            .map_err(|_| Error::Bus { reg })
    }
}
