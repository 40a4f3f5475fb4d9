//! Display modes and sink capabilities

use bitflags::bitflags;

use crate::common::format::{Encoding, FormatFamily};
use crate::common::{ColorDepth, PixelRepetition};
use crate::error::{Error, Result};

bitflags! {
    /// Color formats the sink accepts
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ColorFormats: u32 {
        /// RGB 4:4:4
        const RGB444   = 1 << 0;
        /// YCbCr 4:4:4
        const YCBCR444 = 1 << 1;
        /// YCbCr 4:2:2
        const YCBCR422 = 1 << 2;
        /// YCbCr 4:2:0
        const YCBCR420 = 1 << 3;
    }
}

impl ColorFormats {
    /// Flag for one family
    pub fn from_family(family: FormatFamily) -> Self {
        match family {
            FormatFamily::Rgb444 => Self::RGB444,
            FormatFamily::Ycbcr444 => Self::YCBCR444,
            FormatFamily::Ycbcr422 => Self::YCBCR422,
            FormatFamily::Ycbcr420 => Self::YCBCR420,
        }
    }
}

bitflags! {
    /// Sync polarity and scan flags
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ModeFlags: u32 {
        /// Positive hsync
        const PHSYNC    = 1 << 0;
        /// Negative hsync
        const NHSYNC    = 1 << 1;
        /// Positive vsync
        const PVSYNC    = 1 << 2;
        /// Negative vsync
        const NVSYNC    = 1 << 3;
        /// Interlaced
        const INTERLACE = 1 << 4;
    }
}

/// SCDC capabilities of the sink
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ScdcCaps {
    /// SCDC present
    pub supported: bool,
    /// Scrambling supported
    pub scrambling: bool,
    /// Scrambling below 340 MHz supported
    pub low_rates: bool,
}

/// What the sink can display
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// HDMI (not DVI) sink
    pub is_hdmi: bool,
    /// Accepted color formats
    pub color_formats: ColorFormats,
    /// Maximum bits per component
    pub bpc: u8,
    /// Maximum TMDS clock in kHz, 0 if unknown
    pub max_tmds_clock: u32,
    /// SCDC capabilities
    pub scdc: ScdcCaps,
}

impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            is_hdmi: true,
            color_formats: ColorFormats::RGB444,
            bpc: 8,
            max_tmds_clock: 0,
            scdc: ScdcCaps::default(),
        }
    }
}

/// Output color requested for a mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorRequest {
    /// Component layout
    pub family: FormatFamily,
    /// Bits per component
    pub depth: ColorDepth,
    /// Explicit encoding, or `None` to let the negotiator choose
    pub encoding: Option<Encoding>,
}

impl Default for ColorRequest {
    fn default() -> Self {
        Self {
            family: FormatFamily::Rgb444,
            depth: ColorDepth::Bpc8,
            encoding: None,
        }
    }
}

/// Display timing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    /// Pixel clock in kHz
    pub clock: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    /// Sync and scan flags
    pub flags: ModeFlags,
    /// CEA-861 VIC, 0 for non-CEA modes
    pub vic: u8,
    /// Pixel repetition
    pub pixel_repetition: PixelRepetition,
    /// Requested output color
    pub color: ColorRequest,
}

impl DisplayMode {
    /// 1280x720@60 (VIC 4)
    pub const fn cea_720p60() -> Self {
        Self {
            clock: 74250,
            hdisplay: 1280,
            hsync_start: 1390,
            hsync_end: 1430,
            htotal: 1650,
            vdisplay: 720,
            vsync_start: 725,
            vsync_end: 730,
            vtotal: 750,
            flags: ModeFlags::PHSYNC.union(ModeFlags::PVSYNC),
            vic: 4,
            pixel_repetition: PixelRepetition::Off,
            color: ColorRequest {
                family: FormatFamily::Rgb444,
                depth: ColorDepth::Bpc8,
                encoding: None,
            },
        }
    }

    /// 1920x1080@60 (VIC 16)
    pub const fn cea_1080p60() -> Self {
        Self {
            clock: 148500,
            hdisplay: 1920,
            hsync_start: 2008,
            hsync_end: 2052,
            htotal: 2200,
            vdisplay: 1080,
            vsync_start: 1084,
            vsync_end: 1089,
            vtotal: 1125,
            flags: ModeFlags::PHSYNC.union(ModeFlags::PVSYNC),
            vic: 16,
            pixel_repetition: PixelRepetition::Off,
            color: ColorRequest {
                family: FormatFamily::Rgb444,
                depth: ColorDepth::Bpc8,
                encoding: None,
            },
        }
    }

    /// 3840x2160@60 (VIC 97)
    pub const fn cea_2160p60() -> Self {
        Self {
            clock: 594000,
            hdisplay: 3840,
            hsync_start: 4016,
            hsync_end: 4104,
            htotal: 4400,
            vdisplay: 2160,
            vsync_start: 2168,
            vsync_end: 2178,
            vtotal: 2250,
            flags: ModeFlags::PHSYNC.union(ModeFlags::PVSYNC),
            vic: 97,
            pixel_repetition: PixelRepetition::Off,
            color: ColorRequest {
                family: FormatFamily::Rgb444,
                depth: ColorDepth::Bpc8,
                encoding: None,
            },
        }
    }

    /// Same timing with another output color
    pub fn with_color(mut self, color: ColorRequest) -> Self {
        self.color = color;
        self
    }

    /// Pixel clock in Hz
    #[inline]
    pub fn pixel_clock_hz(&self) -> u64 {
        u64::from(self.clock) * 1000
    }

    /// Timing of one half of a dual-link (split) output
    pub fn to_split_half(&self) -> Self {
        let mut half = *self;
        half.clock = self.clock / 2;
        half.hdisplay = self.hdisplay / 2;
        half.hsync_start = self.hsync_start / 2;
        half.hsync_end = self.hsync_end / 2;
        half.htotal = self.htotal / 2;
        half
    }

    /// Undo [`DisplayMode::to_split_half`]
    ///
    /// Fails with [`Error::InvalidArgs`] when the full timing does not fit.
    pub fn from_split_half(&self) -> Result<Self> {
        let double = |v: u16| v.checked_mul(2).ok_or(Error::InvalidArgs);
        let mut full = *self;
        full.clock = self.clock.checked_mul(2).ok_or(Error::InvalidArgs)?;
        full.hdisplay = double(self.hdisplay)?;
        full.hsync_start = double(self.hsync_start)?;
        full.hsync_end = double(self.hsync_end)?;
        full.htotal = double(self.htotal)?;
        Ok(full)
    }
}

/// Result of mode validation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModeStatus {
    /// Mode can be driven
    Ok,
    /// Clock above what the transmitter or sink supports
    ClockHigh,
    /// Rejected by the platform
    Bad,
}
