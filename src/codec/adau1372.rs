//! ADAU1372 I2C glue
//!
//! Only the bus side lives here. Codec setup is done by an
//! [`Adau1372Probe`] implementation supplied by the host.

use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::error::Result;
use crate::i2c::{I2cClient, I2cDeviceId, I2cDriver, I2cRegmap, OfDeviceId};

/// Highest ADAU1372 register
pub const ADAU1372_MAX_REGISTER: u16 = 0x6b;

pub const ADAU1372_I2C_IDS: &[I2cDeviceId] = &[I2cDeviceId {
    name: "adau1372",
    driver_data: 0,
}];

pub const ADAU1372_DT_IDS: &[OfDeviceId] = &[OfDeviceId {
    compatible: "adi,adau1372",
}];

/// Bus independent part of the codec driver
pub trait Adau1372Probe<B> {
    /// Set up the codec behind `regmap`
    fn probe(&self, regmap: I2cRegmap<B>) -> Result<()>;
}

/// I2C driver for the ADAU1372
pub struct Adau1372I2c<P> {
    codec: P,
}

impl<P> Adau1372I2c<P> {
    pub const fn new(codec: P) -> Self {
        Self { codec }
    }
}

impl<B, E, P> I2cDriver<B> for Adau1372I2c<P>
where
    B: Write<Error = E> + WriteRead<Error = E>,
    P: Adau1372Probe<B>,
{
    fn name(&self) -> &'static str {
        "adau1372"
    }

    fn id_table(&self) -> &'static [I2cDeviceId] {
        ADAU1372_I2C_IDS
    }

    fn of_match_table(&self) -> &'static [OfDeviceId] {
        ADAU1372_DT_IDS
    }

    fn probe(&self, client: I2cClient<B>, _id: Option<&I2cDeviceId>) -> Result<()> {
        log::info!("adau1372: probe at {:#04x}", client.addr);
        let regmap = I2cRegmap::new(client.bus, client.addr, ADAU1372_MAX_REGISTER);
        self.codec.probe(regmap)
    }

    fn remove(&self, _addr: u8) -> Result<()> {
        Ok(())
    }
}
