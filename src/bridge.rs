//! Transmitter controller
//!
//! [`DwHdmi`] owns one controller instance: its register map, the selected
//! PHY and the link state machine
//!
//! ```text
//! probe -> Disabled -> PhyInit -> HpdWait <-> Active
//!             ^            ^                    |
//!             |            +---- Suspended <----+
//!             +----- disable
//! ```
//!
//! HPD changes only take effect in [`DwHdmi::poll_hpd`] and [`DwHdmi::enable`],
//! never in the middle of a register programming sequence.

use tock_registers::LocalRegisterCopy;

use crate::audio::{channel_allocation, compute_cts, compute_n, compute_n_with, rate_family, AudioInterface, AudioParams};
use crate::common::config::DwHdmiConfig;
use crate::common::format::FormatFamily;
use crate::common::{ConnectorStatus, PhyType};
use crate::error::{Error, Result};
use crate::hpd::{HpdDebouncer, HpdSignal};
use crate::link::{DscCaps, LinkConfig};
use crate::mode::{DisplayInfo, DisplayMode, ModeFlags, ModeStatus};
use crate::negotiate::{mode_valid, negotiate, Negotiated};
use crate::phy::{PhyContext, PhyOps, SynopsysPhy};
use crate::plat::{PlatData, PlatFlags};
use crate::regmap::{HdmiRegs, Regmap, RegmapExt};
use crate::registers::*;

/// HDR (DRM) infoframe type code
const HDMI_INFOFRAME_TYPE_DRM: u8 = 0x87;
/// Largest DRM infoframe payload
const HDMI_DRM_INFOFRAME_SIZE: usize = 26;

/// Link state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Probed, output off
    Disabled,
    /// PHY configured and locked, sink state not settled yet
    PhyInit,
    /// Output configured, waiting for a sink
    HpdWait,
    /// Sink connected, output running
    Active,
    /// Powered down, link configuration kept
    Suspended,
    /// Torn down
    Removed,
}

enum Phy<'a> {
    Synopsys(SynopsysPhy<'a>),
    Vendor(&'a dyn PhyOps),
}

impl<'a> Phy<'a> {
    fn ops(&self) -> &dyn PhyOps {
        match self {
            Phy::Synopsys(phy) => phy,
            Phy::Vendor(ops) => *ops,
        }
    }

    /// Platform supplied name for vendor PHYs, the driver name otherwise
    fn name(&self, plat: &'a PlatData<'a>) -> &str {
        match self {
            Phy::Vendor(_) if !plat.phy_name.is_empty() => plat.phy_name,
            _ => self.ops().name(),
        }
    }

    fn is_synopsys(&self) -> bool {
        matches!(self, Phy::Synopsys(_))
    }
}

/// Pick the PHY driver
///
/// The QP controller always uses its dedicated PHY. Otherwise a forced vendor
/// PHY skips detection, and a detected vendor PHY uses the platform ops.
fn detect_phy<'a>(regs: &mut dyn Regmap, plat: &'a PlatData<'a>) -> Result<Phy<'a>> {
    if plat.has(PlatFlags::IS_HDMI_QP) {
        return plat.qp_phy_ops.map(Phy::Vendor).ok_or_else(|| {
            log::error!("hdmi: QP controller without QP PHY ops");
            Error::NoDevice
        });
    }

    if plat.phy_force_vendor {
        return plat.phy_ops.map(Phy::Vendor).ok_or_else(|| {
            log::error!("hdmi: vendor PHY forced but no PHY ops");
            Error::NoDevice
        });
    }

    let id = regs.read(HDMI_CONFIG2_ID)?;
    match PhyType::from_id(id) {
        Some(PhyType::VendorPhy) => plat.phy_ops.map(Phy::Vendor).ok_or_else(|| {
            log::error!("hdmi: vendor PHY detected but no PHY ops");
            Error::NoDevice
        }),
        Some(phy_type) => Ok(Phy::Synopsys(SynopsysPhy::new(phy_type, plat))),
        None => {
            log::error!("hdmi: unsupported PHY type {:#04x}", id);
            Err(Error::NoDevice)
        }
    }
}

/// DesignWare HDMI TX controller
pub struct DwHdmi<'a, R: Regmap> {
    regs: HdmiRegs<R>,
    plat: &'a PlatData<'a>,
    config: DwHdmiConfig,
    phy: Phy<'a>,
    hpd: &'a HpdSignal,
    debounce: HpdDebouncer,
    state: LinkState,

    version: u16,
    audio_caps: AudioInterface,

    display: DisplayInfo,
    mode: Option<DisplayMode>,
    negotiated: Option<Negotiated>,
    link_cfg: LinkConfig,
    dsc_caps: Option<DscCaps>,

    audio: AudioParams,
    audio_enabled: bool,

    plugged_cb: Option<&'a dyn Fn(bool)>,
    connected: bool,
    rxsense: bool,
    scrambling: bool,
}

impl<'a, R: Regmap> DwHdmi<'a, R> {
    /// Identify the controller, pick the PHY and set up HPD interrupts
    pub fn probe(map: R, plat: &'a PlatData<'a>, hpd: &'a HpdSignal, config: DwHdmiConfig) -> Result<Self> {
        let mut regs = HdmiRegs::new(map, config.get_bus_attempts());

        // product id check must be the first step
        let prod0 = regs.read(HDMI_PRODUCT_ID0)?;
        let prod1 = regs.read(HDMI_PRODUCT_ID1)?;
        if prod0 != HDMI_PRODUCT_ID0_HDMI_TX || (prod1 & !HDMI_PRODUCT_ID1_HDCP) != HDMI_PRODUCT_ID1_HDMI_TX {
            log::error!("hdmi: unsupported product id {:02x}:{:02x}", prod0, prod1);
            return Err(Error::NoDevice);
        }

        let version = u16::from(regs.read(HDMI_DESIGN_ID)?) << 8 | u16::from(regs.read(HDMI_REVISION_ID)?);
        let audio_caps = Self::read_audio_caps(&mut regs)?;
        let phy = detect_phy(&mut regs, plat)?;

        log::info!(
            "hdmi: DesignWare HDMI TX {:x}.{:03x} with {}",
            version >> 12,
            version & 0xfff,
            phy.name(plat)
        );

        let mut hdmi = Self {
            regs,
            plat,
            config,
            phy,
            hpd,
            debounce: HpdDebouncer::new(config.get_hpd_debounce_ms()),
            state: LinkState::Disabled,
            version,
            audio_caps,
            display: DisplayInfo::default(),
            mode: None,
            negotiated: None,
            link_cfg: LinkConfig::default(),
            dsc_caps: None,
            audio: AudioParams::default(),
            audio_enabled: false,
            plugged_cb: None,
            connected: false,
            rxsense: false,
            scrambling: false,
        };
        hdmi.hw_init()?;
        log::debug!("hdmi: probed, state {:?}", hdmi.state);
        Ok(hdmi)
    }

    /// Probe and apply the platform glue configuration
    pub fn bind(map: R, plat: &'a PlatData<'a>, hpd: &'a HpdSignal, config: DwHdmiConfig) -> Result<Self> {
        let hdmi = Self::probe(map, plat, hpd, config)?;
        plat.ops.set_grf_cfg();
        Ok(hdmi)
    }

    fn read_audio_caps(regs: &mut dyn Regmap) -> Result<AudioInterface> {
        let config0 = regs.read_local::<CONFIG0_ID::Register>(HDMI_CONFIG0_ID)?;
        let config3 = regs.read_local::<CONFIG3_ID::Register>(HDMI_CONFIG3_ID)?;

        let mut caps = AudioInterface::empty();
        caps.set(AudioInterface::I2S, config0.is_set(CONFIG0_ID::AUDI2S));
        caps.set(AudioInterface::SPDIF, config0.is_set(CONFIG0_ID::AUDSPDIF));
        caps.set(AudioInterface::AHB_DMA, config3.is_set(CONFIG3_ID::AHBAUDDMA));
        caps.set(AudioInterface::GP_AUD, config3.is_set(CONFIG3_ID::GPAUD));
        Ok(caps)
    }

    /// Mute everything but HPD and RX sense
    fn hw_init(&mut self) -> Result<()> {
        let regs: &mut dyn Regmap = &mut self.regs;

        let mut ih_mute = regs.read_local::<IH_MUTE::Register>(HDMI_IH_MUTE)?;
        ih_mute.modify(IH_MUTE::MUTE_WAKEUP_INTERRUPT::SET + IH_MUTE::MUTE_ALL_INTERRUPT::SET);
        regs.write(HDMI_IH_MUTE, ih_mute.get())?;

        for reg in [
            HDMI_IH_MUTE_FC_STAT0,
            HDMI_IH_MUTE_FC_STAT1,
            HDMI_IH_MUTE_FC_STAT2,
            HDMI_IH_MUTE_AS_STAT0,
            HDMI_IH_MUTE_PHY_STAT0,
            HDMI_IH_MUTE_I2CM_STAT0,
            HDMI_IH_MUTE_CEC_STAT0,
            HDMI_IH_MUTE_VP_STAT0,
            HDMI_IH_MUTE_I2CMPHY_STAT0,
            HDMI_IH_MUTE_AHBDMAAUD_STAT0,
        ] {
            regs.write(reg, 0xff)?;
        }

        ih_mute.modify(IH_MUTE::MUTE_WAKEUP_INTERRUPT::CLEAR + IH_MUTE::MUTE_ALL_INTERRUPT::CLEAR);
        regs.write(HDMI_IH_MUTE, ih_mute.get())?;

        if self.phy.is_synopsys() {
            // PHY I2C completion is polled, keep its interrupts masked
            regs.write_field(HDMI_PHY_I2CM_INT_ADDR, PHY_I2CM_INT::DONE_POL::SET)?;
            regs.write_field(
                HDMI_PHY_I2CM_CTLINT_ADDR,
                PHY_I2CM_CTLINT::NAC_POL::SET + PHY_I2CM_CTLINT::ARB_POL::SET,
            )?;
        }

        self.phy.ops().setup_hpd(&mut self.regs)
    }

    /// Tear down. The controller can not be used afterwards.
    pub fn remove(mut self) -> Result<()> {
        if self.state != LinkState::Disabled && self.state != LinkState::Suspended {
            self.power_down()?;
        }
        let mut ih_mute: LocalRegisterCopy<u8, IH_MUTE::Register> = LocalRegisterCopy::new(0);
        ih_mute.write(IH_MUTE::MUTE_WAKEUP_INTERRUPT::SET + IH_MUTE::MUTE_ALL_INTERRUPT::SET);
        self.regs.write(HDMI_IH_MUTE, ih_mute.get())?;
        self.set_state(LinkState::Removed);
        Ok(())
    }

    /// Same as [`DwHdmi::remove`]
    pub fn unbind(self) -> Result<()> {
        self.remove()
    }

    fn set_state(&mut self, next: LinkState) {
        if self.state != next {
            log::debug!("hdmi: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn reject(&self, op: &'static str) -> Error {
        log::error!("hdmi: {} not allowed in state {:?}", op, self.state);
        Error::InvalidStateTransition { op, state: self.state }
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Controller version, design id in the high byte
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Name of the PHY in use
    pub fn phy_name(&self) -> &str {
        self.phy.name(self.plat)
    }

    /// Audio inputs the controller was synthesized with
    pub fn audio_interfaces(&self) -> AudioInterface {
        self.audio_caps
    }

    /// Current link configuration
    pub fn link_config(&self) -> &LinkConfig {
        &self.link_cfg
    }

    /// Negotiation of the enabled output, `None` while disabled
    pub fn negotiated(&self) -> Option<&Negotiated> {
        self.negotiated.as_ref()
    }

    /// DSC capabilities from the last [`DwHdmi::set_edid`]
    pub fn dsc_caps(&self) -> Option<&DscCaps> {
        self.dsc_caps.as_ref()
    }

    /// Mode of the last [`DwHdmi::enable`]
    pub fn mode(&self) -> Option<&DisplayMode> {
        self.mode.as_ref()
    }

    /// Platform data the controller was probed with
    pub fn plat(&self) -> &'a PlatData<'a> {
        self.plat
    }

    /// Debounced HPD level
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Mutable access to the register map
    pub fn regmap(&mut self) -> &mut R {
        self.regs.inner_mut()
    }

    /// Check whether `mode` can be driven to `info`
    pub fn mode_valid(&self, info: &DisplayInfo, mode: &DisplayMode) -> ModeStatus {
        mode_valid(self.plat, info, mode)
    }

    /// Whether `mode` for `info` needs a full mode set
    ///
    /// True when the timing or sink changed, or the platform changed the
    /// output color behind our back.
    pub fn mode_changed(&self, info: &DisplayInfo, mode: &DisplayMode) -> bool {
        self.mode.as_ref() != Some(mode) || self.display != *info || self.plat.ops.get_color_changed()
    }

    /// Set `mode` and start the output
    pub fn enable(&mut self, info: &DisplayInfo, mode: &DisplayMode) -> Result<()> {
        match self.state {
            LinkState::Disabled | LinkState::PhyInit | LinkState::HpdWait | LinkState::Active => {}
            _ => return Err(self.reject("enable")),
        }

        match mode_valid(self.plat, info, mode) {
            ModeStatus::Ok => {}
            ModeStatus::ClockHigh => {
                log::error!("hdmi: {} kHz is above the TMDS limit", mode.clock);
                return Err(Error::NoMatchingConfig);
            }
            ModeStatus::Bad => return Err(Error::UnsupportedFormat),
        }

        let neg = negotiate(self.plat, info, mode)?;

        // a new mode invalidates everything negotiated for the previous one
        self.link_cfg.reset();
        if let Some(cfg) = self.plat.ops.get_link_cfg() {
            self.link_cfg = cfg;
        }

        self.display = *info;
        if let Err(err) = self.start_output(mode, &neg) {
            return Err(self.abort_output(err));
        }
        self.mode = Some(*mode);
        self.negotiated = Some(neg);

        self.settle()
    }

    /// Program `mode`, bring up the clocks and leave the link in PhyInit
    fn start_output(&mut self, mode: &DisplayMode, neg: &Negotiated) -> Result<()> {
        if self.state == LinkState::Active {
            self.gate_audio(true)?;
        }
        self.program_mode(mode, neg)?;
        self.set_state(LinkState::PhyInit);

        self.plat.ops.dclk_set(true, self.plat.id)?;
        self.plat.ops.link_clk_set(true)?;
        self.phy.ops().update_hpd(&mut self.regs, false, false, self.rxsense)
    }

    /// Power down after a failed mode set; the output ends up Disabled
    fn abort_output(&mut self, err: Error) -> Error {
        log::error!("hdmi: mode set failed: {:?}", err);
        self.mode = None;
        self.negotiated = None;
        if let Err(e) = self.power_down().and_then(|_| self.scrambler_off()) {
            log::warn!("hdmi: power down after failed mode set: {:?}", e);
        }
        self.set_state(LinkState::Disabled);
        err
    }

    /// Program controller and PHY for `mode`
    fn program_mode(&mut self, mode: &DisplayMode, neg: &Negotiated) -> Result<()> {
        self.program_frame_composer(mode)?;
        self.program_video_sampler(neg)?;
        self.program_csc_path(neg)?;
        if self.plat.has(PlatFlags::USE_DRM_INFOFRAME) {
            self.program_drm_infoframe()?;
        }
        self.apply_high_tmds_clock_ratio(neg)?;

        let ctx = PhyContext {
            display: &self.display,
            mode,
            negotiated: neg,
            config: &self.config,
        };
        self.phy.ops().init(&mut self.regs, &ctx)?;

        self.regs.modify(
            HDMI_MC_CLKDIS,
            MC_CLKDIS::PIXELCLK_DISABLE::CLEAR + MC_CLKDIS::TMDSCLK_DISABLE::CLEAR,
        )
    }

    fn program_frame_composer(&mut self, mode: &DisplayMode) -> Result<()> {
        let mut conf: LocalRegisterCopy<u8, FC_INVIDCONF::Register> = LocalRegisterCopy::new(0);
        conf.write(
            FC_INVIDCONF::VSYNC_IN_POLARITY.val(mode.flags.contains(ModeFlags::PVSYNC).into())
                + FC_INVIDCONF::HSYNC_IN_POLARITY.val(mode.flags.contains(ModeFlags::PHSYNC).into())
                + FC_INVIDCONF::DE_IN_POLARITY::SET
                + FC_INVIDCONF::DVI_MODEZ.val(self.display.is_hdmi.into())
                + FC_INVIDCONF::R_V_BLANK_IN_OSC.val(mode.flags.contains(ModeFlags::INTERLACE).into())
                + FC_INVIDCONF::IN_I_P.val(mode.flags.contains(ModeFlags::INTERLACE).into()),
        );
        self.regs.write(HDMI_FC_INVIDCONF, conf.get())
    }

    fn program_video_sampler(&mut self, neg: &Negotiated) -> Result<()> {
        let regs: &mut dyn Regmap = &mut self.regs;

        regs.write_field(
            HDMI_TX_INVID0,
            TX_INVID0::INTERNAL_DE_GENERATOR::CLEAR + TX_INVID0::VIDEO_MAPPING.val(neg.in_bus_format.video_mapping()),
        )?;

        // stuff blanking with zeros
        regs.write_field(
            HDMI_TX_INSTUFFING,
            TX_INSTUFFING::BDBDATA_STUFFING::SET
                + TX_INSTUFFING::RCRDATA_STUFFING::SET
                + TX_INSTUFFING::GYDATA_STUFFING::SET,
        )?;
        for reg in [
            HDMI_TX_GYDATA0,
            HDMI_TX_GYDATA1,
            HDMI_TX_RCRDATA0,
            HDMI_TX_RCRDATA1,
            HDMI_TX_BCBDATA0,
            HDMI_TX_BCBDATA1,
        ] {
            regs.write(reg, 0)?;
        }
        Ok(())
    }

    fn program_csc_path(&mut self, neg: &Negotiated) -> Result<()> {
        let in_family = neg.in_bus_format.family();
        let out_family = neg.out_bus_format.family();
        let csc = in_family != out_family || (out_family.is_yuv() && neg.enc_in != neg.enc_out);

        self.regs
            .modify(HDMI_MC_FLOWCTRL, MC_FLOWCTRL::CSC_IN_PATH.val(csc.into()))?;
        self.regs
            .modify(HDMI_MC_CLKDIS, MC_CLKDIS::CSCCLK_DISABLE.val((!csc).into()))
    }

    fn program_drm_infoframe(&mut self) -> Result<()> {
        let regs: &mut dyn Regmap = &mut self.regs;
        regs.modify(HDMI_FC_PACKET_TX_EN, FC_PACKET_TX_EN::DRM::CLEAR)?;

        let Some(blob) = self.plat.ops.get_hdr_blob() else {
            return Ok(());
        };

        // type, version, length, checksum, payload
        if blob.len() < 4 || blob[0] != HDMI_INFOFRAME_TYPE_DRM {
            log::error!("hdmi: malformed HDR infoframe");
            return Err(Error::InvalidArgs);
        }
        let len = usize::from(blob[2]);
        if len > HDMI_DRM_INFOFRAME_SIZE || blob.len() != 4 + len {
            log::error!("hdmi: HDR infoframe length {} does not match", len);
            return Err(Error::InvalidArgs);
        }

        regs.write(HDMI_FC_DRM_HB0, blob[1])?;
        regs.write(HDMI_FC_DRM_HB1, blob[2])?;
        for (i, b) in blob[4..].iter().enumerate() {
            regs.write(HDMI_FC_DRM_PB0 + i as u32, *b)?;
        }
        regs.write(HDMI_FC_DRM_UP, 1)?;
        regs.modify(HDMI_FC_PACKET_TX_EN, FC_PACKET_TX_EN::DRM::SET)
    }

    fn tmds_software_reset(&mut self) -> Result<()> {
        // requests are active low
        let mut rst: LocalRegisterCopy<u8, MC_SWRSTZ::Register> = LocalRegisterCopy::new(0xff);
        rst.modify(MC_SWRSTZ::TMDSSWRST_REQ::CLEAR);
        self.regs.write(HDMI_MC_SWRSTZ, rst.get())
    }

    fn apply_high_tmds_clock_ratio(&mut self, neg: &Negotiated) -> Result<()> {
        let high = neg.needs_high_tmds_ratio();
        let scdc = self.display.scdc;

        if high && !(scdc.supported && scdc.scrambling) {
            log::warn!("hdmi: sink can not scramble at {} Hz", neg.tmds_clock);
        }

        let scramble = scdc.supported && scdc.scrambling && (high || scdc.low_rates);
        if scramble == self.scrambling && !high {
            return Ok(());
        }

        self.plat.ops.scdc_set_high_tmds_clock_ratio(high)?;
        self.plat.ops.scdc_set_scrambling(scramble)?;
        self.regs
            .write_field(HDMI_FC_SCRAMBLER_CTRL, FC_SCRAMBLER_CTRL::SCRAMBLER_ON.val(scramble.into()))?;
        self.tmds_software_reset()?;
        self.scrambling = scramble;
        log::debug!("hdmi: scrambling {}", if scramble { "on" } else { "off" });
        Ok(())
    }

    /// Re-evaluate the TMDS clock ratio and scrambling for `info`
    pub fn set_high_tmds_clock_ratio(&mut self, info: &DisplayInfo) -> Result<()> {
        self.display.scdc = info.scdc;
        match self.negotiated {
            Some(neg) => self.apply_high_tmds_clock_ratio(&neg),
            None => Ok(()),
        }
    }

    fn power_down(&mut self) -> Result<()> {
        self.gate_audio(true)?;
        self.phy.ops().disable(&mut self.regs)?;
        self.regs.modify(
            HDMI_MC_CLKDIS,
            MC_CLKDIS::PIXELCLK_DISABLE::SET + MC_CLKDIS::TMDSCLK_DISABLE::SET,
        )?;
        self.plat.ops.dclk_set(false, self.plat.id)?;
        self.plat.ops.link_clk_set(false)
    }

    /// Stop the output
    pub fn disable(&mut self) -> Result<()> {
        match self.state {
            LinkState::Disabled => return Ok(()),
            LinkState::Suspended | LinkState::Removed => return Err(self.reject("disable")),
            _ => {}
        }
        self.power_down()?;
        self.scrambler_off()?;
        self.phy.ops().update_hpd(&mut self.regs, false, true, self.rxsense)?;
        // the link configuration outlives the output, the negotiation does not
        self.negotiated = None;
        self.set_state(LinkState::Disabled);
        Ok(())
    }

    fn scrambler_off(&mut self) -> Result<()> {
        if self.scrambling {
            self.plat.ops.scdc_set_scrambling(false)?;
            self.regs
                .write_field(HDMI_FC_SCRAMBLER_CTRL, FC_SCRAMBLER_CTRL::SCRAMBLER_ON::CLEAR)?;
            self.scrambling = false;
        }
        Ok(())
    }

    /// Move between PhyInit, HpdWait and Active according to the applied HPD level
    fn settle(&mut self) -> Result<()> {
        match (self.state, self.connected) {
            (LinkState::PhyInit | LinkState::HpdWait, true) if self.negotiated.is_some() => {
                self.set_state(LinkState::Active);
                if self.audio_enabled {
                    self.start_audio()?;
                }
            }
            (LinkState::PhyInit, false) if self.negotiated.is_some() => {
                self.set_state(LinkState::HpdWait);
            }
            (LinkState::Active, false) => {
                self.gate_audio(true)?;
                self.set_state(LinkState::HpdWait);
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply pending HPD updates that are stable by `now_ms`
    pub fn poll_hpd(&mut self, now_ms: u32) -> Result<LinkState> {
        if let Some(ev) = self.hpd.take() {
            self.rxsense = ev.rx_sense;
            self.debounce.observe(ev.connected, ev.at_ms);
            if self.state != LinkState::Suspended {
                let disabled = self.state == LinkState::Disabled;
                self.phy.ops().update_hpd(&mut self.regs, false, disabled, ev.rx_sense)?;
            }
        }

        if let Some(level) = self.debounce.poll(now_ms) {
            self.connected = level;
            log::info!("hdmi: sink {}", if level { "connected" } else { "disconnected" });
            if let Some(cb) = self.plugged_cb {
                cb(level);
            }
        }

        if self.state != LinkState::Suspended {
            self.settle()?;
        }
        Ok(self.state)
    }

    /// Sample HPD through the PHY and queue the level
    pub fn read_hpd(&mut self, now_ms: u32) -> Result<ConnectorStatus> {
        let status = self.phy.ops().read_hpd(&mut self.regs)?;
        self.hpd.update(status == ConnectorStatus::Connected, self.rxsense, now_ms);
        Ok(status)
    }

    /// HPD / RX sense reported by the interrupt path
    pub fn setup_rx_sense(&mut self, hpd: bool, rx_sense: bool, now_ms: u32) {
        self.hpd.update(hpd, rx_sense, now_ms);
    }

    /// Register the plug notifier; it is called once with the current level
    pub fn set_plugged_cb(&mut self, cb: &'a dyn Fn(bool)) {
        self.plugged_cb = Some(cb);
        cb(self.connected);
    }

    /// Parse sink DSC capabilities from `edid`
    pub fn set_edid(&mut self, edid: &[u8]) -> Result<Option<DscCaps>> {
        self.dsc_caps = self.plat.ops.get_edid_dsc_info(edid)?;
        Ok(self.dsc_caps)
    }

    /// Power down, keeping the link configuration
    pub fn suspend(&mut self) -> Result<()> {
        if matches!(self.state, LinkState::Suspended | LinkState::Removed) {
            return Err(self.reject("suspend"));
        }
        if self.state != LinkState::Disabled {
            self.power_down()?;
        }
        self.set_state(LinkState::Suspended);
        Ok(())
    }

    /// Restore the controller; the link always restarts from PhyInit
    ///
    /// Only an output that was enabled when suspended is programmed again.
    pub fn resume(&mut self) -> Result<()> {
        if self.state != LinkState::Suspended {
            return Err(self.reject("resume"));
        }
        self.hw_init()?;
        // the sink may have changed while powered down, report its level again
        self.debounce.reset();
        if let (Some(mode), Some(neg)) = (self.mode, self.negotiated) {
            if let Err(err) = self.program_mode(&mode, &neg) {
                return Err(self.abort_output(err));
            }
            self.plat.ops.dclk_set(true, self.plat.id)?;
            self.plat.ops.link_clk_set(true)?;
        }
        self.set_state(LinkState::PhyInit);
        Ok(())
    }

    fn gate_audio(&mut self, gate: bool) -> Result<()> {
        self.regs
            .modify(HDMI_MC_CLKDIS, MC_CLKDIS::AUDCLK_DISABLE.val(gate.into()))
    }

    fn program_cts_n(&mut self) -> Result<()> {
        let Some(neg) = self.negotiated else {
            return Err(self.reject("audio"));
        };
        let rate = self.audio.sample_rate;
        let n = match self.plat.tmds_n_table {
            Some(table) => compute_n_with(table, neg.tmds_clock, rate)?,
            None => compute_n(neg.tmds_clock, rate)?,
        };
        let cts = compute_cts(neg.tmds_clock, n, rate)?;
        log::debug!("hdmi: audio {} Hz, N {} CTS {}", rate, n, cts);

        let regs: &mut dyn Regmap = &mut self.regs;
        // N and CTS are latched together on the N1 write
        regs.write_field(
            HDMI_AUD_N3,
            AUD_N3::NCTS_ATOMIC_WRITE::SET + AUD_N3::N.val(((n >> 16) & 0x0f) as u8),
        )?;
        regs.write_field(
            HDMI_AUD_CTS3,
            AUD_CTS3::CTS_MANUAL::SET + AUD_CTS3::CTS.val(((cts >> 16) & 0x0f) as u8),
        )?;
        regs.write(HDMI_AUD_CTS2, (cts >> 8) as u8)?;
        regs.write(HDMI_AUD_CTS1, cts as u8)?;
        regs.write(HDMI_AUD_N2, (n >> 8) as u8)?;
        regs.write(HDMI_AUD_N1, n as u8)
    }

    fn program_channel_status(&mut self) -> Result<()> {
        let cs = self.audio.status()?;
        self.regs.write(HDMI_FC_AUDSCHNLS7, cs[3])?;
        self.regs.write(HDMI_FC_AUDSCHNLS8, cs[4])
    }

    fn program_layout(&mut self) -> Result<()> {
        let channels = self.audio.channels;
        let regs: &mut dyn Regmap = &mut self.regs;

        regs.write_field(HDMI_FC_AUDICONF0, FC_AUDICONF0::CC.val(channels - 1))?;
        regs.write(HDMI_FC_AUDICONF2, self.audio.ca)?;
        if channels > 2 {
            regs.write_field(HDMI_FC_AUDSCONF, FC_AUDSCONF::AUD_PACKET_LAYOUT::Layout1)?;
        } else {
            regs.write_field(HDMI_FC_AUDSCONF, FC_AUDSCONF::AUD_PACKET_LAYOUT::Layout0)?;
        }

        // one I2S line per two channels
        let lines = (channels + 1) / 2;
        regs.write_field(
            HDMI_AUD_CONF0,
            AUD_CONF0::I2S_SELECT::SET + AUD_CONF0::I2S_IN_EN.val((1 << lines) - 1),
        )?;
        regs.write_field(
            HDMI_AUD_CONF1,
            AUD_CONF1::I2S_MODE::Standard + AUD_CONF1::I2S_WIDTH.val(24),
        )?;
        regs.write(HDMI_AUD_INPUTCLKFS, 0)
    }

    fn start_audio(&mut self) -> Result<()> {
        self.program_cts_n()?;
        self.program_channel_status()?;
        self.program_layout()?;

        let mut rst: LocalRegisterCopy<u8, MC_SWRSTZ::Register> = LocalRegisterCopy::new(0xff);
        rst.modify(MC_SWRSTZ::I2SSWRST_REQ::CLEAR);
        self.regs.write(HDMI_MC_SWRSTZ, rst.get())?;

        self.gate_audio(false)
    }

    /// Start audio; only valid while the link is active
    pub fn audio_enable(&mut self) -> Result<()> {
        if self.state != LinkState::Active {
            return Err(self.reject("audio_enable"));
        }
        if !self.audio_caps.contains(AudioInterface::I2S) {
            log::error!("hdmi: controller has no I2S audio input");
            return Err(Error::NoDevice);
        }
        self.start_audio()?;
        self.audio_enabled = true;
        log::debug!("hdmi: audio enabled");
        Ok(())
    }

    /// Stop audio; only valid while the link is active
    pub fn audio_disable(&mut self) -> Result<()> {
        if self.state != LinkState::Active {
            return Err(self.reject("audio_disable"));
        }
        self.regs.modify(HDMI_AUD_CONF0, AUD_CONF0::I2S_IN_EN.val(0))?;
        self.gate_audio(true)?;
        self.audio_enabled = false;
        log::debug!("hdmi: audio disabled");
        Ok(())
    }

    /// Whether audio was requested, even if the link is not active
    pub fn is_audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    fn audio_running(&self) -> bool {
        self.audio_enabled && self.state == LinkState::Active
    }

    /// Set the audio sample rate in Hz
    pub fn set_sample_rate(&mut self, rate: u32) -> Result<()> {
        rate_family(rate)?;
        self.audio.sample_rate = rate;
        if self.audio_running() {
            self.program_cts_n()?;
            self.program_channel_status()?;
        }
        Ok(())
    }

    /// Set the audio channel count; also picks the default channel allocation
    pub fn set_channel_count(&mut self, channels: u8) -> Result<()> {
        let ca = channel_allocation(channels)?;
        self.audio.channels = channels;
        self.audio.ca = ca;
        if self.audio_running() {
            self.program_layout()?;
            self.program_channel_status()?;
        }
        Ok(())
    }

    /// Use `status` as IEC 60958 channel status instead of the computed one
    pub fn set_channel_status(&mut self, status: &[u8]) -> Result<()> {
        if status.len() < 5 || status.len() > 24 {
            return Err(Error::InvalidArgs);
        }
        let mut cs = [0u8; 24];
        cs[..status.len()].copy_from_slice(status);
        self.audio.channel_status = Some(cs);
        if self.audio_running() {
            self.program_channel_status()?;
        }
        Ok(())
    }

    /// Override the CEA-861 channel allocation
    pub fn set_channel_allocation(&mut self, ca: u8) -> Result<()> {
        if ca > 0x31 {
            return Err(Error::InvalidArgs);
        }
        self.audio.ca = ca;
        if self.audio_running() {
            self.regs.write(HDMI_FC_AUDICONF2, ca)?;
        }
        Ok(())
    }

    /// Output family of the enabled output
    pub fn output_family(&self) -> Option<FormatFamily> {
        self.negotiated.map(|n| n.out_bus_format.family())
    }
}
