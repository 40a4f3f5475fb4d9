//! Driver for the Synopsys DesignWare HDMI TX controller
//!
//! Also carries the I2C glue of the ADAU1372 audio codec.

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod bridge;
pub mod codec;
pub mod common;
pub mod error;
pub mod hpd;
pub mod i2c;
pub mod link;
pub mod mode;
pub mod negotiate;
pub mod phy;
pub mod plat;
pub mod regmap;
pub(crate) mod registers;
pub mod split;

pub use crate::bridge::{DwHdmi, LinkState};
pub use crate::common::config::DwHdmiConfig;
pub use crate::common::format::{BusFormat, Encoding, FormatFamily, QuantRange};
pub use crate::common::{ColorDepth, ConnectorStatus, OperationMode, PhyType, PixelRepetition};
pub use crate::error::{Error, Result};
pub use crate::hpd::HpdSignal;
pub use crate::plat::{PlatData, PlatFlags, PlatOps};
pub use crate::regmap::{HdmiRegs, MmioRegmap, RegIoWidth, Regmap, RegmapExt};

/// PHY I2C register addresses and values, for platform `configure_phy` hooks
pub mod phy_regs {
    pub use crate::registers::{
        HDMI_3D_TX_PHY_CKCALCTRL, HDMI_3D_TX_PHY_CKCALCTRL_OVERRIDE, HDMI_3D_TX_PHY_CKSYMTXCTRL,
        HDMI_3D_TX_PHY_CPCE_CTRL, HDMI_3D_TX_PHY_CURRCTRL, HDMI_3D_TX_PHY_GMPCTRL,
        HDMI_3D_TX_PHY_MSM_CTRL, HDMI_3D_TX_PHY_MSM_CTRL_CKO_SEL_FB_CLK, HDMI_3D_TX_PHY_PLLPHBYCTRL,
        HDMI_3D_TX_PHY_TXTERM, HDMI_3D_TX_PHY_VLEVCTRL, HDMI_PHY_I2CM_SLAVE_ADDR_HEAC_PHY,
        HDMI_PHY_I2CM_SLAVE_ADDR_PHY_GEN2,
    };
}
