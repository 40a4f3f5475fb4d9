//! PHY abstraction and the DesignWare PHY control helpers
//!
//! A PHY is driven through [`PhyOps`]. The built-in [`SynopsysPhy`] covers the
//! DWC PHYs reached through the controller's PHY I2C master; vendor PHYs supply
//! their own implementation through the platform data.

use tock_registers::LocalRegisterCopy;

use crate::common::config::DwHdmiConfig;
use crate::common::ConnectorStatus;
use crate::error::{Error, Result};
use crate::mode::{DisplayInfo, DisplayMode};
use crate::negotiate::Negotiated;
use crate::regmap::{Regmap, RegmapExt};
use crate::registers::*;

pub mod synopsys;
pub mod tables;

pub use synopsys::SynopsysPhy;

/// What the PHY is being initialised for
pub struct PhyContext<'c> {
    /// Sink capabilities
    pub display: &'c DisplayInfo,
    /// Mode being set
    pub mode: &'c DisplayMode,
    /// Negotiated formats and clocks
    pub negotiated: &'c Negotiated,
    /// Driver tunables
    pub config: &'c DwHdmiConfig,
}

/// PHY callbacks
///
/// HPD handling defaults to the controller's own PHY interrupt block, which
/// most vendor PHYs keep using.
pub trait PhyOps {
    /// Name used in log messages
    fn name(&self) -> &str {
        "vendor PHY"
    }

    /// Power up and configure the PHY for `ctx`
    fn init(&self, regs: &mut dyn Regmap, ctx: &PhyContext<'_>) -> Result<()>;

    /// Power down the PHY
    fn disable(&self, regs: &mut dyn Regmap) -> Result<()>;

    /// Sample the hot plug detect line
    fn read_hpd(&self, regs: &mut dyn Regmap) -> Result<ConnectorStatus> {
        phy_read_hpd(regs)
    }

    /// Update HPD / RX sense interrupt masking
    fn update_hpd(&self, regs: &mut dyn Regmap, force: bool, disabled: bool, rxsense: bool) -> Result<()> {
        phy_update_hpd(regs, force, disabled, rxsense)
    }

    /// Configure HPD interrupts at probe time
    fn setup_hpd(&self, regs: &mut dyn Regmap) -> Result<()> {
        phy_setup_hpd(regs)
    }
}

/// Write access to the PHY's internal registers through the PHY I2C master
pub struct PhyI2c<'r> {
    regs: &'r mut dyn Regmap,
    polls: u32,
}

impl<'r> PhyI2c<'r> {
    /// Wrap the controller regmap, polling at most `polls` times for completion
    pub fn new(regs: &'r mut dyn Regmap, polls: u32) -> Self {
        Self { regs, polls }
    }

    /// Write one 16 bit PHY register
    pub fn write(&mut self, data: u16, addr: u8) -> Result<()> {
        phy_i2c_write(self.regs, data, addr, self.polls)
    }
}

fn phy_test_clear(regs: &mut dyn Regmap, clear: bool) -> Result<()> {
    regs.modify(HDMI_PHY_TST0, PHY_TST0::TESTCLR.val(clear.into()))
}

/// Select the I2C slave address of the PHY behind the PHY I2C master
pub fn phy_i2c_set_addr(regs: &mut dyn Regmap, address: u8) -> Result<()> {
    phy_test_clear(regs, true)?;
    regs.write(HDMI_PHY_I2CM_SLAVE_ADDR, address)?;
    phy_test_clear(regs, false)
}

fn phy_wait_i2c_done(regs: &mut dyn Regmap, polls: u32) -> Result<()> {
    for _ in 0..polls {
        let stat = regs.read_local::<IH_I2CMPHY_STAT0::Register>(HDMI_IH_I2CMPHY_STAT0)?;
        if stat.get() == 0 {
            continue;
        }
        // write one to clear
        regs.write(HDMI_IH_I2CMPHY_STAT0, stat.get())?;
        if stat.is_set(IH_I2CMPHY_STAT0::I2CMPHYERROR) {
            return Err(Error::Bus {
                reg: HDMI_PHY_I2CM_OPERATION_ADDR,
            });
        }
        return Ok(());
    }
    Err(Error::Timeout)
}

/// Write one 16 bit PHY register through the PHY I2C master
pub fn phy_i2c_write(regs: &mut dyn Regmap, data: u16, addr: u8, polls: u32) -> Result<()> {
    regs.write(HDMI_IH_I2CMPHY_STAT0, 0xff)?;
    regs.write(HDMI_PHY_I2CM_ADDRESS_ADDR, addr)?;
    regs.write(HDMI_PHY_I2CM_DATAO_1_ADDR, (data >> 8) as u8)?;
    regs.write(HDMI_PHY_I2CM_DATAO_0_ADDR, data as u8)?;
    regs.write_field(HDMI_PHY_I2CM_OPERATION_ADDR, PHY_I2CM_OPERATION::WRITE::SET)?;
    phy_wait_i2c_done(regs, polls)
}

/// Drive the PHY power down (PDDQ) input
pub fn phy_gen2_pddq(regs: &mut dyn Regmap, enable: bool) -> Result<()> {
    regs.modify(HDMI_PHY_CONF0, PHY_CONF0::GEN2_PDDQ.val(enable.into()))
}

/// Drive the PHY transmitter power on input
pub fn phy_gen2_txpwron(regs: &mut dyn Regmap, enable: bool) -> Result<()> {
    regs.modify(HDMI_PHY_CONF0, PHY_CONF0::GEN2_TXPWRON.val(enable.into()))
}

/// Drive the SVSRET low power retention input
pub fn phy_enable_svsret(regs: &mut dyn Regmap, enable: bool) -> Result<()> {
    regs.modify(HDMI_PHY_CONF0, PHY_CONF0::SVSRET.val(enable.into()))
}

/// Pulse the PHY reset
pub fn phy_reset(regs: &mut dyn Regmap) -> Result<()> {
    // PHY reset is active low
    regs.write_field(HDMI_MC_PHYRSTZ, MC_PHYRSTZ::PHYRSTZ::SET)?;
    regs.write_field(HDMI_MC_PHYRSTZ, MC_PHYRSTZ::PHYRSTZ::CLEAR)
}

/// Sample HPD from PHY_STAT0
pub fn phy_read_hpd(regs: &mut dyn Regmap) -> Result<ConnectorStatus> {
    let stat = regs.read_local::<PHY_STAT0::Register>(HDMI_PHY_STAT0)?;
    Ok(if stat.is_set(PHY_STAT0::HPD) {
        ConnectorStatus::Connected
    } else {
        ConnectorStatus::Disconnected
    })
}

/// Mask RX sense interrupts while the output is disabled or nothing is sensed
pub fn phy_update_hpd(regs: &mut dyn Regmap, force: bool, disabled: bool, rxsense: bool) -> Result<()> {
    if force {
        return Ok(());
    }
    let mut mask = regs.read_local::<PHY_STAT0::Register>(HDMI_PHY_MASK0)?;
    if disabled || !rxsense {
        mask.modify(PHY_STAT0::RX_SENSE.val(0xf));
    } else {
        mask.modify(PHY_STAT0::RX_SENSE.val(0));
    }
    regs.write(HDMI_PHY_MASK0, mask.get())
}

/// Configure HPD and RX sense interrupt polarity, clear and unmute them
pub fn phy_setup_hpd(regs: &mut dyn Regmap) -> Result<()> {
    let hpd_rxsense = PHY_STAT0::HPD::SET + PHY_STAT0::RX_SENSE.val(0xf);
    let ih_hpd_rxsense = IH_PHY_STAT0::HPD::SET + IH_PHY_STAT0::RX_SENSE.val(0xf);

    regs.write_field(HDMI_PHY_POL0, hpd_rxsense)?;
    regs.write_field(HDMI_IH_PHY_STAT0, ih_hpd_rxsense)?;

    // only HPD and RX sense may raise PHY interrupts
    let mut mask: LocalRegisterCopy<u8, PHY_STAT0::Register> = LocalRegisterCopy::new(0);
    mask.write(hpd_rxsense);
    regs.write(HDMI_PHY_MASK0, !mask.get())?;

    let mut ih: LocalRegisterCopy<u8, IH_PHY_STAT0::Register> = LocalRegisterCopy::new(0);
    ih.write(ih_hpd_rxsense);
    regs.write(HDMI_IH_PHY_STAT0, ih.get())?;
    regs.write(HDMI_IH_MUTE_PHY_STAT0, !ih.get())
}

/// Leave power down and wait for the PLL to lock
pub(crate) fn phy_power_on(
    regs: &mut dyn Regmap,
    config: &DwHdmiConfig,
    delay_us: &dyn Fn(u32),
) -> Result<()> {
    phy_gen2_txpwron(regs, true)?;
    phy_gen2_pddq(regs, false)?;

    for _ in 0..config.get_phy_lock_polls() {
        let stat = regs.read_local::<PHY_STAT0::Register>(HDMI_PHY_STAT0)?;
        if stat.is_set(PHY_STAT0::TX_PHY_LOCK) {
            log::debug!("hdmi: PHY PLL locked");
            return Ok(());
        }
        delay_us(config.get_phy_lock_delay_us());
    }

    log::error!("hdmi: PHY PLL failed to lock");
    Err(Error::Timeout)
}

/// Enter power down
pub(crate) fn phy_power_off(regs: &mut dyn Regmap) -> Result<()> {
    phy_gen2_txpwron(regs, false)?;
    let stat = regs.read_local::<PHY_STAT0::Register>(HDMI_PHY_STAT0)?;
    if stat.is_set(PHY_STAT0::TX_PHY_LOCK) {
        log::debug!("hdmi: PHY still locked while powering down");
    }
    phy_gen2_pddq(regs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat register file that reports every PHY I2C transfer done
    struct Regs {
        file: [u8; 0x8000],
        writes: [(u32, u8); 64],
        nwrites: usize,
    }

    impl Regs {
        fn new() -> Self {
            Self {
                file: [0; 0x8000],
                writes: [(0, 0); 64],
                nwrites: 0,
            }
        }
    }

    impl Regmap for Regs {
        fn read(&mut self, reg: u32) -> Result<u8> {
            if reg == HDMI_IH_I2CMPHY_STAT0 {
                return Ok(0x02);
            }
            Ok(self.file[reg as usize])
        }

        fn write(&mut self, reg: u32, val: u8) -> Result<()> {
            self.file[reg as usize] = val;
            if self.nwrites < self.writes.len() {
                self.writes[self.nwrites] = (reg, val);
                self.nwrites += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn i2c_write_sequence() {
        let mut regs = Regs::new();
        phy_i2c_write(&mut regs, 0x800d, HDMI_3D_TX_PHY_CKSYMTXCTRL, 10).unwrap();
        assert_eq!(
            &regs.writes[..regs.nwrites],
            &[
                (HDMI_IH_I2CMPHY_STAT0, 0xff),
                (HDMI_PHY_I2CM_ADDRESS_ADDR, 0x09),
                (HDMI_PHY_I2CM_DATAO_1_ADDR, 0x80),
                (HDMI_PHY_I2CM_DATAO_0_ADDR, 0x0d),
                (HDMI_PHY_I2CM_OPERATION_ADDR, 0x10),
                (HDMI_IH_I2CMPHY_STAT0, 0x02),
            ]
        );
    }

    #[test]
    fn hpd_follows_phy_stat0() {
        let mut regs = Regs::new();
        assert_eq!(phy_read_hpd(&mut regs).unwrap(), ConnectorStatus::Disconnected);
        regs.file[HDMI_PHY_STAT0 as usize] = 0x02;
        assert_eq!(phy_read_hpd(&mut regs).unwrap(), ConnectorStatus::Connected);
    }

    #[test]
    fn setup_hpd_unmasks_hpd_and_rxsense() {
        let mut regs = Regs::new();
        phy_setup_hpd(&mut regs).unwrap();
        assert_eq!(regs.file[HDMI_PHY_POL0 as usize], 0xf2);
        assert_eq!(regs.file[HDMI_PHY_MASK0 as usize], 0x0d);
        assert_eq!(regs.file[HDMI_IH_MUTE_PHY_STAT0 as usize], 0xc2);
    }

    #[test]
    fn update_hpd_masks_rxsense_when_disabled() {
        let mut regs = Regs::new();
        regs.file[HDMI_PHY_MASK0 as usize] = 0x0d;
        phy_update_hpd(&mut regs, false, true, true).unwrap();
        assert_eq!(regs.file[HDMI_PHY_MASK0 as usize], 0xfd);
        phy_update_hpd(&mut regs, false, false, true).unwrap();
        assert_eq!(regs.file[HDMI_PHY_MASK0 as usize], 0x0d);
    }

    #[test]
    fn power_on_times_out_without_lock() {
        let mut regs = Regs::new();
        let cfg = DwHdmiConfig::new().phy_lock_polls(3);
        assert_eq!(phy_power_on(&mut regs, &cfg, &|_: u32| {}), Err(Error::Timeout));
        regs.file[HDMI_PHY_STAT0 as usize] = 0x01;
        assert!(phy_power_on(&mut regs, &cfg, &|_: u32| {}).is_ok());
        // TXPWRON set, PDDQ clear
        assert_eq!(regs.file[HDMI_PHY_CONF0 as usize] & 0x18, 0x08);
    }
}
