//! Platform integration data
//!
//! [`PlatData`] is handed to the controller at probe time and never changes
//! afterwards. Optional platform behaviour lives behind [`PlatOps`]; every hook
//! has a default that falls back to the built-in, table driven policy.

use bitflags::bitflags;

use crate::audio::AudioTmdsN;
use crate::common::format::{BusFormat, Encoding, QuantRange};
use crate::error::Result;
use crate::link::{DscCaps, LinkConfig};
use crate::mode::{ColorFormats, DisplayInfo, DisplayMode, ModeStatus};
use crate::phy::tables::{
    CurrCtrl, MpllConfig, Phy316Entry, PhyConfigEntry, IMX_CUR_CTR, IMX_MPLL_CFG, IMX_PHY_CONFIG,
};
use crate::phy::{PhyI2c, PhyOps};

bitflags! {
    /// Platform capability bits
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct PlatFlags: u32 {
        /// Send HDR metadata as a DRM infoframe
        const USE_DRM_INFOFRAME      = 1 << 0;
        /// YCbCr 4:2:0 output may be used
        const YCBCR_420_ALLOWED      = 1 << 1;
        /// The video source cannot feed YCbCr
        const UNSUPPORTED_YUV_INPUT  = 1 << 2;
        /// Only 8 bit per component output
        const UNSUPPORTED_DEEP_COLOR = 1 << 3;
        /// Controller is the HDMI 2.1 QP variant
        const IS_HDMI_QP             = 1 << 4;
        /// Part of a dual-link pair
        const SPLIT_MODE             = 1 << 5;
        /// Left half of a dual-link pair
        const FIRST_SCREEN           = 1 << 6;
    }
}

/// Optional platform hooks
pub trait PlatOps {
    /// Platform specific mode check
    fn mode_valid(&self, _info: &DisplayInfo, _mode: &DisplayMode) -> ModeStatus {
        ModeStatus::Ok
    }

    /// Program the PHY instead of the built-in tables; `None` when not provided
    fn configure_phy(&self, _phy: &mut PhyI2c<'_>, _mpixelclock: u64) -> Option<Result<()>> {
        None
    }

    fn get_input_bus_format(&self) -> Option<BusFormat> {
        None
    }

    fn get_output_bus_format(&self) -> Option<BusFormat> {
        None
    }

    fn get_enc_in_encoding(&self) -> Option<Encoding> {
        None
    }

    fn get_enc_out_encoding(&self) -> Option<Encoding> {
        None
    }

    fn get_quant_range(&self) -> Option<QuantRange> {
        None
    }

    /// Packed HDR (DRM) infoframe to send, header and checksum included
    fn get_hdr_blob(&self) -> Option<&[u8]> {
        None
    }

    /// Whether the platform changed output color since the last mode set
    fn get_color_changed(&self) -> bool {
        false
    }

    /// Extract DSC capabilities from the sink EDID
    fn get_edid_dsc_info(&self, _edid: &[u8]) -> Result<Option<DscCaps>> {
        Ok(None)
    }

    /// Link configuration chosen by the platform for the current mode
    fn get_link_cfg(&self) -> Option<LinkConfig> {
        None
    }

    /// Apply platform glue (GRF) settings for the current output
    fn set_grf_cfg(&self) {}

    /// Timing of one half in split mode
    fn convert_to_split_mode(&self, mode: &DisplayMode) -> DisplayMode {
        mode.to_split_half()
    }

    /// Full timing from one half in split mode
    fn convert_to_origin_mode(&self, mode: &DisplayMode) -> Result<DisplayMode> {
        mode.from_split_half()
    }

    /// Gate the display clock of video port `vp_id`
    fn dclk_set(&self, _enable: bool, _vp_id: u32) -> Result<()> {
        Ok(())
    }

    /// Gate the link clock
    fn link_clk_set(&self, _enable: bool) -> Result<()> {
        Ok(())
    }

    /// Write the SCDC TMDS bit clock ratio (1/40 when `enable`)
    fn scdc_set_high_tmds_clock_ratio(&self, _enable: bool) -> Result<()> {
        Ok(())
    }

    /// Write the SCDC scrambling enable
    fn scdc_set_scrambling(&self, _enable: bool) -> Result<()> {
        Ok(())
    }

    /// Busy wait
    fn delay_us(&self, _us: u32) {}
}

/// Platform without any hooks
pub struct NoPlatOps;

impl PlatOps for NoPlatOps {}

/// Shared instance of [`NoPlatOps`]
pub static NO_PLAT_OPS: NoPlatOps = NoPlatOps;

/// Platform description of one transmitter instance
pub struct PlatData<'a> {
    /// Format driven by the video source, `None` follows the output format
    pub input_bus_format: Option<BusFormat>,
    /// Encoding of a YCbCr input
    pub input_bus_encoding: Encoding,
    /// Highest TMDS clock in kHz the integration supports, 0 for no limit
    pub max_tmdsclk: u32,
    /// Video port feeding this transmitter
    pub id: u32,
    pub flags: PlatFlags,
    /// Output color formats the integration cannot carry
    pub unsupported_formats: ColorFormats,
    /// Use `phy_ops` without probing the PHY type
    pub phy_force_vendor: bool,
    /// Name reported for a vendor PHY, the PHY's own name when empty
    pub phy_name: &'a str,
    pub ops: &'a dyn PlatOps,
    /// Vendor PHY
    pub phy_ops: Option<&'a dyn PhyOps>,
    /// PHY of the QP controller variant
    pub qp_phy_ops: Option<&'a dyn PhyOps>,
    /// Audio N table, the common table when `None`
    pub tmds_n_table: Option<&'a [AudioTmdsN]>,
    pub mpll_cfg: Option<&'a [MpllConfig]>,
    /// MPLL table for YCbCr 4:2:0 output
    pub mpll_cfg_420: Option<&'a [MpllConfig]>,
    pub cur_ctr: Option<&'a [CurrCtrl]>,
    pub phy_config: Option<&'a [PhyConfigEntry]>,
    /// Per-depth PHY table, takes precedence over the three tables above
    pub phy316_config: Option<&'a [Phy316Entry]>,
}

impl<'a> PlatData<'a> {
    /// Platform data with no tables and default policy
    pub fn new(ops: &'a dyn PlatOps) -> Self {
        Self {
            input_bus_format: None,
            input_bus_encoding: Encoding::Default,
            max_tmdsclk: 0,
            id: 0,
            flags: PlatFlags::empty(),
            unsupported_formats: ColorFormats::empty(),
            phy_force_vendor: false,
            phy_name: "",
            ops,
            phy_ops: None,
            qp_phy_ops: None,
            tmds_n_table: None,
            mpll_cfg: None,
            mpll_cfg_420: None,
            cur_ctr: None,
            phy_config: None,
            phy316_config: None,
        }
    }

    /// Platform data using the i.MX6 Synopsys PHY tables
    pub fn imx(ops: &'a dyn PlatOps) -> Self {
        Self {
            mpll_cfg: Some(IMX_MPLL_CFG),
            cur_ctr: Some(IMX_CUR_CTR),
            phy_config: Some(IMX_PHY_CONFIG),
            ..Self::new(ops)
        }
    }

    /// Same data with `flags` added
    pub fn with_flags(mut self, flags: PlatFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn has(&self, flag: PlatFlags) -> bool {
        self.flags.contains(flag)
    }
}
