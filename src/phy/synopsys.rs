//! Built-in driver for the DWC PHYs behind the PHY I2C master

use crate::common::format::FormatFamily;
use crate::common::PhyType;
use crate::error::{Error, Result};
use crate::phy::tables::{select_phy_config, select_synopsys_params, SynopsysPhyParams};
use crate::phy::{
    phy_enable_svsret, phy_i2c_set_addr, phy_power_off, phy_power_on, phy_reset, PhyContext, PhyI2c,
    PhyOps,
};
use crate::plat::PlatData;
use crate::regmap::{Regmap, RegmapExt};
use crate::registers::*;

/// Synopsys DWC HDMI TX PHY (MHL, 3D TX, HDMI 2.0 TX)
pub struct SynopsysPhy<'a> {
    phy_type: PhyType,
    plat: &'a PlatData<'a>,
}

impl<'a> SynopsysPhy<'a> {
    pub fn new(phy_type: PhyType, plat: &'a PlatData<'a>) -> Self {
        Self { phy_type, plat }
    }

    pub fn phy_type(&self) -> PhyType {
        self.phy_type
    }

    /// Register values for the clock and depth in `ctx`, from the platform tables
    pub fn params(&self, ctx: &PhyContext<'_>) -> Result<SynopsysPhyParams> {
        let plat = self.plat;
        let mpixelclock = ctx.negotiated.phy_clock;
        let depth = ctx.negotiated.out_bus_format.depth();

        if let Some(table) = plat.phy316_config {
            let cfg = select_phy_config(mpixelclock, depth, ctx.mode.pixel_repetition, table)?;
            return Ok(SynopsysPhyParams::from(&cfg));
        }

        let mpll = match plat.mpll_cfg_420 {
            Some(t) if ctx.negotiated.out_bus_format.family() == FormatFamily::Ycbcr420 => t,
            _ => plat.mpll_cfg.ok_or(Error::NoMatchingConfig)?,
        };
        let curr = plat.cur_ctr.ok_or(Error::NoMatchingConfig)?;
        let phy = plat.phy_config.ok_or(Error::NoMatchingConfig)?;
        select_synopsys_params(mpixelclock, depth, mpll, curr, phy)
    }

    fn configure(&self, regs: &mut dyn Regmap, ctx: &PhyContext<'_>) -> Result<()> {
        let mpixelclock = ctx.negotiated.phy_clock;
        let mut i2c = PhyI2c::new(regs, ctx.config.get_phy_i2c_polls());

        if let Some(res) = self.plat.ops.configure_phy(&mut i2c, mpixelclock) {
            return res;
        }

        let p = self.params(ctx).map_err(|e| {
            log::error!("hdmi: no PHY setting for {} Hz", mpixelclock);
            e
        })?;

        i2c.write(p.cpce, HDMI_3D_TX_PHY_CPCE_CTRL)?;
        i2c.write(p.gmp, HDMI_3D_TX_PHY_GMPCTRL)?;
        i2c.write(p.curr, HDMI_3D_TX_PHY_CURRCTRL)?;
        i2c.write(0, HDMI_3D_TX_PHY_PLLPHBYCTRL)?;
        i2c.write(HDMI_3D_TX_PHY_MSM_CTRL_CKO_SEL_FB_CLK, HDMI_3D_TX_PHY_MSM_CTRL)?;
        i2c.write(p.term, HDMI_3D_TX_PHY_TXTERM)?;
        i2c.write(p.sym_ctr, HDMI_3D_TX_PHY_CKSYMTXCTRL)?;
        i2c.write(p.vlev_ctr, HDMI_3D_TX_PHY_VLEVCTRL)?;
        // override and disable clock termination
        i2c.write(HDMI_3D_TX_PHY_CKCALCTRL_OVERRIDE, HDMI_3D_TX_PHY_CKCALCTRL)
    }
}

impl PhyOps for SynopsysPhy<'_> {
    fn name(&self) -> &str {
        self.phy_type.name()
    }

    fn init(&self, regs: &mut dyn Regmap, ctx: &PhyContext<'_>) -> Result<()> {
        phy_power_off(regs)?;

        // leave low power retention mode on the HDMI 2.0 PHY
        if self.phy_type.has_svsret() {
            phy_enable_svsret(regs, true)?;
        }

        phy_reset(regs)?;
        regs.write_field(HDMI_MC_HEACPHY_RST, MC_HEACPHY_RST::ASSERT::SET)?;
        phy_i2c_set_addr(regs, HDMI_PHY_I2CM_SLAVE_ADDR_PHY_GEN2)?;

        self.configure(regs, ctx)?;

        let ops = self.plat.ops;
        phy_power_on(regs, ctx.config, &|us: u32| ops.delay_us(us))
    }

    fn disable(&self, regs: &mut dyn Regmap) -> Result<()> {
        phy_power_off(regs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::DwHdmiConfig;
    use crate::common::format::{BusFormat, Encoding, QuantRange};
    use crate::common::{ColorDepth, OperationMode, PixelRepetition};
    use crate::mode::{DisplayInfo, DisplayMode};
    use crate::negotiate::Negotiated;
    use crate::phy::tables::{Phy316Entry, PhyConfig};
    use crate::plat::NO_PLAT_OPS;

    struct Regs {
        file: [u8; 0x8000],
        phy: [(u8, u16); 16],
        nphy: usize,
    }

    impl Regmap for Regs {
        fn read(&mut self, reg: u32) -> Result<u8> {
            match reg {
                HDMI_IH_I2CMPHY_STAT0 => Ok(0x02),
                HDMI_PHY_STAT0 => Ok(0x01),
                _ => Ok(self.file[reg as usize]),
            }
        }

        fn write(&mut self, reg: u32, val: u8) -> Result<()> {
            if reg == HDMI_PHY_I2CM_OPERATION_ADDR && self.nphy < self.phy.len() {
                let data = u16::from(self.file[HDMI_PHY_I2CM_DATAO_1_ADDR as usize]) << 8
                    | u16::from(self.file[HDMI_PHY_I2CM_DATAO_0_ADDR as usize]);
                self.phy[self.nphy] = (self.file[HDMI_PHY_I2CM_ADDRESS_ADDR as usize], data);
                self.nphy += 1;
            }
            self.file[reg as usize] = val;
            Ok(())
        }
    }

    fn negotiated(clock: u64, out: BusFormat) -> Negotiated {
        Negotiated {
            in_bus_format: out,
            out_bus_format: out,
            enc_in: Encoding::Default,
            enc_out: Encoding::Default,
            quant_range: QuantRange::Full,
            pixel_clock: clock,
            phy_clock: clock,
            tmds_clock: clock,
        }
    }

    #[test]
    fn imx_tables_programmed_in_order() {
        let plat = PlatData::imx(&NO_PLAT_OPS);
        let phy = SynopsysPhy::new(PhyType::DwcHdmi3dTxPhy, &plat);
        let info = DisplayInfo::default();
        let mode = DisplayMode::cea_720p60();
        let neg = negotiated(74_250_000, BusFormat::Rgb888_1x24);
        let config = DwHdmiConfig::new();
        let ctx = PhyContext {
            display: &info,
            mode: &mode,
            negotiated: &neg,
            config: &config,
        };
        let mut regs = Regs {
            file: [0; 0x8000],
            phy: [(0, 0); 16],
            nphy: 0,
        };

        phy.init(&mut regs, &ctx).unwrap();

        assert_eq!(
            &regs.phy[..regs.nphy],
            &[
                (HDMI_3D_TX_PHY_CPCE_CTRL, 0x0140),
                (HDMI_3D_TX_PHY_GMPCTRL, 0x0005),
                (HDMI_3D_TX_PHY_CURRCTRL, 0x06dc),
                (HDMI_3D_TX_PHY_PLLPHBYCTRL, 0x0000),
                (HDMI_3D_TX_PHY_MSM_CTRL, 0x6000),
                (HDMI_3D_TX_PHY_TXTERM, 0x000a),
                (HDMI_3D_TX_PHY_CKSYMTXCTRL, 0x800d),
                (HDMI_3D_TX_PHY_VLEVCTRL, 0x01ad),
                (HDMI_3D_TX_PHY_CKCALCTRL, 0x8000),
            ]
        );
        assert_eq!(regs.file[HDMI_PHY_I2CM_SLAVE_ADDR as usize], 0x69);
    }

    #[test]
    fn phy316_table_takes_precedence() {
        const CFG: PhyConfig = PhyConfig {
            pixel: PixelRepetition::Off,
            color: ColorDepth::Bpc8,
            opmode: OperationMode::Hdmi20,
            oppllcfg: 0x0051,
            pllcurrctrl: 0x0006,
            pllgmpctrl: 0x0002,
            txterm: 0x0004,
            vlevctrl: 0x0232,
            cksymtxctrl: 0x8009,
        };
        let table = [Phy316Entry {
            max_clock: 297_000_000,
            config: CFG,
        }];
        let mut plat = PlatData::imx(&NO_PLAT_OPS);
        plat.phy316_config = Some(&table);
        let phy = SynopsysPhy::new(PhyType::DwcHdmi20TxPhy, &plat);
        let info = DisplayInfo::default();
        let mode = DisplayMode::cea_2160p60();
        let neg = negotiated(297_000_000, BusFormat::Rgb888_1x24);
        let config = DwHdmiConfig::new();
        let ctx = PhyContext {
            display: &info,
            mode: &mode,
            negotiated: &neg,
            config: &config,
        };

        let p = phy.params(&ctx).unwrap();
        assert_eq!(p.cpce, 0x0051);
        assert_eq!(p.vlev_ctr, 0x0232);

        let neg = negotiated(297_000_001, BusFormat::Rgb888_1x24);
        let ctx = PhyContext { negotiated: &neg, ..ctx };
        assert_eq!(phy.params(&ctx), Err(Error::NoMatchingConfig));
    }
}
