//! PHY configuration tables and lookup
//!
//! Every table is sorted ascending by its clock threshold. Lookup walks the
//! table from the start and takes the first entry whose threshold is greater
//! than or equal to the requested clock, so a clock equal to a threshold
//! selects that entry.

use crate::common::{ColorDepth, OperationMode, PixelRepetition, DW_HDMI_RES_MAX};
use crate::error::{Error, Result};

/// MPLL charge pump / GMP setting for one resolution class
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MpllRes {
    pub cpce: u16,
    pub gmp: u16,
}

/// MPLL settings up to `mpixelclock`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MpllConfig {
    /// Highest pixel clock in Hz covered by this entry
    pub mpixelclock: u64,
    /// Settings for 8, 10 and 12 bit
    pub res: [MpllRes; DW_HDMI_RES_MAX],
}

/// PLL current control up to `mpixelclock`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CurrCtrl {
    /// Highest pixel clock in Hz covered by this entry
    pub mpixelclock: u64,
    /// Settings for 8, 10 and 12 bit
    pub curr: [u16; DW_HDMI_RES_MAX],
}

/// Transmitter drive settings up to `mpixelclock`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhyConfigEntry {
    /// Highest pixel clock in Hz covered by this entry
    pub mpixelclock: u64,
    /// Clock symbol and transmitter control
    pub sym_ctr: u16,
    /// Transmission termination value
    pub term: u16,
    /// Voltage level control
    pub vlev_ctr: u16,
}

/// Complete PHY setting for one pixel clock / depth / repetition
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhyConfig {
    pub pixel: PixelRepetition,
    pub color: ColorDepth,
    pub opmode: OperationMode,
    pub oppllcfg: u16,
    pub pllcurrctrl: u16,
    pub pllgmpctrl: u16,
    pub txterm: u16,
    pub vlevctrl: u16,
    pub cksymtxctrl: u16,
}

/// One row of a per-depth PHY table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Phy316Entry {
    /// Highest pixel clock in Hz covered by this entry
    pub max_clock: u64,
    /// Setting used up to `max_clock`
    pub config: PhyConfig,
}

/// Register values for the DWC HDMI 3D TX PHY, merged from the three tables
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SynopsysPhyParams {
    pub cpce: u16,
    pub gmp: u16,
    pub curr: u16,
    pub sym_ctr: u16,
    pub term: u16,
    pub vlev_ctr: u16,
}

impl From<&PhyConfig> for SynopsysPhyParams {
    fn from(cfg: &PhyConfig) -> Self {
        Self {
            cpce: cfg.oppllcfg,
            gmp: cfg.pllgmpctrl,
            curr: cfg.pllcurrctrl,
            sym_ctr: cfg.cksymtxctrl,
            term: cfg.txterm,
            vlev_ctr: cfg.vlevctrl,
        }
    }
}

/// Pick the per-depth PHY setting for `pixel_clock`
pub fn select_phy_config(
    pixel_clock: u64,
    color_depth: ColorDepth,
    pixel_repetition: PixelRepetition,
    table: &[Phy316Entry],
) -> Result<PhyConfig> {
    table
        .iter()
        .filter(|e| e.config.color == color_depth && e.config.pixel == pixel_repetition)
        .find(|e| pixel_clock <= e.max_clock)
        .map(|e| e.config)
        .ok_or(Error::NoMatchingConfig)
}

/// MPLL setting for `mpixelclock` at `depth`
pub fn select_mpll(mpixelclock: u64, depth: ColorDepth, table: &[MpllConfig]) -> Result<MpllRes> {
    let class = depth.res_class().ok_or(Error::NoMatchingConfig)?;
    table
        .iter()
        .find(|e| mpixelclock <= e.mpixelclock)
        .map(|e| e.res[class.index()])
        .ok_or(Error::NoMatchingConfig)
}

/// PLL current for `mpixelclock` at `depth`
pub fn select_curr_ctrl(mpixelclock: u64, depth: ColorDepth, table: &[CurrCtrl]) -> Result<u16> {
    let class = depth.res_class().ok_or(Error::NoMatchingConfig)?;
    table
        .iter()
        .find(|e| mpixelclock <= e.mpixelclock)
        .map(|e| e.curr[class.index()])
        .ok_or(Error::NoMatchingConfig)
}

/// Drive settings for `mpixelclock`
pub fn select_phy_entry(mpixelclock: u64, table: &[PhyConfigEntry]) -> Result<PhyConfigEntry> {
    table
        .iter()
        .find(|e| mpixelclock <= e.mpixelclock)
        .copied()
        .ok_or(Error::NoMatchingConfig)
}

/// Merge the MPLL, current and drive tables for one clock and depth
pub fn select_synopsys_params(
    mpixelclock: u64,
    depth: ColorDepth,
    mpll: &[MpllConfig],
    curr: &[CurrCtrl],
    phy: &[PhyConfigEntry],
) -> Result<SynopsysPhyParams> {
    let res = select_mpll(mpixelclock, depth, mpll)?;
    let curr = select_curr_ctrl(mpixelclock, depth, curr)?;
    let drive = select_phy_entry(mpixelclock, phy)?;
    Ok(SynopsysPhyParams {
        cpce: res.cpce,
        gmp: res.gmp,
        curr,
        sym_ctr: drive.sym_ctr,
        term: drive.term,
        vlev_ctr: drive.vlev_ctr,
    })
}

const fn mpll(mpixelclock: u64, res: [(u16, u16); DW_HDMI_RES_MAX]) -> MpllConfig {
    MpllConfig {
        mpixelclock,
        res: [
            MpllRes { cpce: res[0].0, gmp: res[0].1 },
            MpllRes { cpce: res[1].0, gmp: res[1].1 },
            MpllRes { cpce: res[2].0, gmp: res[2].1 },
        ],
    }
}

/// i.MX6 MPLL table
pub const IMX_MPLL_CFG: &[MpllConfig] = &[
    mpll(45_250_000, [(0x01e0, 0x0000), (0x21e1, 0x0000), (0x41e2, 0x0000)]),
    mpll(92_500_000, [(0x0140, 0x0005), (0x2141, 0x0005), (0x4142, 0x0005)]),
    mpll(148_500_000, [(0x00a0, 0x000a), (0x20a1, 0x000a), (0x40a2, 0x000a)]),
    mpll(216_000_000, [(0x00a0, 0x000a), (0x2001, 0x000f), (0x4002, 0x000f)]),
];

/// i.MX6 PLL current table
pub const IMX_CUR_CTR: &[CurrCtrl] = &[
    //        pixelclk                bpp8    bpp10   bpp12
    CurrCtrl { mpixelclock: 54_000_000, curr: [0x091c, 0x091c, 0x06dc] },
    CurrCtrl { mpixelclock: 58_400_000, curr: [0x091c, 0x06dc, 0x06dc] },
    CurrCtrl { mpixelclock: 72_000_000, curr: [0x06dc, 0x06dc, 0x091c] },
    CurrCtrl { mpixelclock: 74_250_000, curr: [0x06dc, 0x0b5c, 0x091c] },
    CurrCtrl { mpixelclock: 118_800_000, curr: [0x091c, 0x091c, 0x06dc] },
    CurrCtrl { mpixelclock: 216_000_000, curr: [0x06dc, 0x0b5c, 0x091c] },
];

/// i.MX6 drive table
pub const IMX_PHY_CONFIG: &[PhyConfigEntry] = &[
    //              pixelclk                  symbol          term          vlev
    PhyConfigEntry { mpixelclock: 148_500_000, sym_ctr: 0x800d, term: 0x000a, vlev_ctr: 0x01ad },
    PhyConfigEntry { mpixelclock: 216_000_000, sym_ctr: 0x800d, term: 0x0005, vlev_ctr: 0x01ad },
];
