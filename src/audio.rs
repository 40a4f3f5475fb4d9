//! Audio clock regeneration and IEC 60958 channel status

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Audio inputs synthesized into the controller (CONFIG0_ID / CONFIG3_ID)
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct AudioInterface: u8 {
        const I2S     = 1 << 0;
        const SPDIF   = 1 << 1;
        const AHB_DMA = 1 << 2;
        const GP_AUD  = 1 << 3;
    }
}

/// N values for one TMDS clock
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AudioTmdsN {
    /// TMDS clock in Hz
    pub tmds: u64,
    pub n_32k: u32,
    pub n_44k1: u32,
    pub n_48k: u32,
}

const fn tmds_n(tmds: u64, n_32k: u32, n_44k1: u32, n_48k: u32) -> AudioTmdsN {
    AudioTmdsN {
        tmds,
        n_32k,
        n_44k1,
        n_48k,
    }
}

/// N values for the common CEA/VESA TMDS clocks
pub const COMMON_TMDS_N_TABLE: &[AudioTmdsN] = &[
    tmds_n(25_175_000, 4096, 12854, 6144),
    tmds_n(25_200_000, 4096, 5656, 6144),
    tmds_n(27_000_000, 4096, 5488, 6144),
    tmds_n(28_320_000, 4096, 5586, 6144),
    tmds_n(30_240_000, 4096, 5642, 6144),
    tmds_n(31_500_000, 4096, 5600, 6144),
    tmds_n(32_000_000, 4096, 5733, 6144),
    tmds_n(33_750_000, 4096, 6272, 6144),
    tmds_n(36_000_000, 4096, 5684, 6144),
    tmds_n(40_000_000, 4096, 5733, 6144),
    tmds_n(49_500_000, 4096, 5488, 6144),
    tmds_n(50_000_000, 4096, 5292, 6144),
    tmds_n(54_000_000, 4096, 5684, 6144),
    tmds_n(65_000_000, 4096, 7056, 6144),
    tmds_n(68_250_000, 4096, 5376, 6144),
    tmds_n(71_000_000, 4096, 7056, 6144),
    tmds_n(72_000_000, 4096, 5635, 6144),
    tmds_n(73_250_000, 11648, 14112, 6144),
    tmds_n(74_250_000, 4096, 6272, 6144),
    tmds_n(75_000_000, 4096, 5880, 6144),
    tmds_n(78_750_000, 4096, 5600, 6144),
    tmds_n(78_800_000, 4096, 5292, 6144),
    tmds_n(79_500_000, 4096, 4704, 6144),
    tmds_n(83_500_000, 4096, 7056, 6144),
    tmds_n(85_500_000, 4096, 5488, 6144),
    tmds_n(88_750_000, 4096, 14112, 6144),
    tmds_n(97_750_000, 4096, 14112, 6144),
    tmds_n(101_000_000, 4096, 7056, 6144),
    tmds_n(106_500_000, 4096, 4704, 6144),
    tmds_n(108_000_000, 4096, 5684, 6144),
    tmds_n(115_500_000, 4096, 5712, 6144),
    tmds_n(119_000_000, 4096, 5544, 6144),
    tmds_n(135_000_000, 4096, 5488, 6144),
    tmds_n(146_250_000, 11648, 6272, 6144),
    tmds_n(148_500_000, 4096, 6272, 6144),
    tmds_n(154_000_000, 4096, 5544, 6144),
    tmds_n(162_000_000, 4096, 5684, 6144),
    // 297 MHz and up use the HDMI 2.0 recommendations
    tmds_n(297_000_000, 3073, 4704, 5120),
    tmds_n(594_000_000, 3073, 9408, 10240),
];

/// Base rate of a sample rate
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RateFamily {
    Fs32k,
    Fs44k1,
    Fs48k,
}

impl RateFamily {
    fn table_n(self, e: &AudioTmdsN) -> u32 {
        match self {
            Self::Fs32k => e.n_32k,
            Self::Fs44k1 => e.n_44k1,
            Self::Fs48k => e.n_48k,
        }
    }

    /// N recommended when the TMDS clock is in no table
    fn recommended_n(self) -> u32 {
        match self {
            Self::Fs32k => 4096,
            Self::Fs44k1 => 6272,
            Self::Fs48k => 6144,
        }
    }
}

/// Split `sample_rate` into its base family and power of two multiplier
pub fn rate_family(sample_rate: u32) -> Result<(RateFamily, u32)> {
    match sample_rate {
        32000 => Ok((RateFamily::Fs32k, 1)),
        64000 => Ok((RateFamily::Fs32k, 2)),
        128000 => Ok((RateFamily::Fs32k, 4)),
        44100 => Ok((RateFamily::Fs44k1, 1)),
        88200 => Ok((RateFamily::Fs44k1, 2)),
        176400 => Ok((RateFamily::Fs44k1, 4)),
        48000 => Ok((RateFamily::Fs48k, 1)),
        96000 => Ok((RateFamily::Fs48k, 2)),
        192000 => Ok((RateFamily::Fs48k, 4)),
        _ => Err(Error::InvalidArgs),
    }
}

/// Audio clock regeneration N for `tmds_clock` from the common table
pub fn compute_n(tmds_clock: u64, sample_rate: u32) -> Result<u32> {
    compute_n_with(COMMON_TMDS_N_TABLE, tmds_clock, sample_rate)
}

/// Audio clock regeneration N for `tmds_clock` from `table`
pub fn compute_n_with(table: &[AudioTmdsN], tmds_clock: u64, sample_rate: u32) -> Result<u32> {
    let (family, mult) = rate_family(sample_rate)?;
    let base = table
        .iter()
        .find(|e| tmds_clock <= e.tmds)
        .map(|e| family.table_n(e))
        .unwrap_or_else(|| family.recommended_n());
    Ok(base * mult)
}

/// Cycle time stamp matching `n` for `tmds_clock`
pub fn compute_cts(tmds_clock: u64, n: u32, sample_rate: u32) -> Result<u32> {
    if sample_rate == 0 || n == 0 {
        return Err(Error::InvalidArgs);
    }
    let cts = tmds_clock * u64::from(n) / (128 * u64::from(sample_rate));
    // CTS is a 20 bit field
    u32::try_from(cts)
        .ok()
        .filter(|v| *v < 1 << 20)
        .ok_or(Error::InvalidArgs)
}

/// IEC 60958 sampling frequency code (byte 3, bits 0..3)
fn fs_code(sample_rate: u32) -> Result<u8> {
    Ok(match sample_rate {
        32000 => 0x03,
        44100 => 0x00,
        48000 => 0x02,
        64000 => 0x0b,
        88200 => 0x08,
        96000 => 0x0a,
        128000 => 0x2b,
        176400 => 0x0c,
        192000 => 0x0e,
        _ => return Err(Error::InvalidArgs),
    })
}

/// IEC 60958-3 consumer channel status for linear PCM at 24 bit
pub fn compute_channel_status(sample_rate: u32, channel_count: u8) -> Result<[u8; 24]> {
    if !(1..=8).contains(&channel_count) {
        return Err(Error::InvalidArgs);
    }
    let fs = fs_code(sample_rate)?;

    let mut cs = [0u8; 24];
    // consumer, PCM, no copyright, no pre-emphasis
    cs[0] = 0x04;
    // general category
    cs[1] = 0x00;
    if channel_count > 2 {
        cs[2] = (channel_count - 1) << 4;
    }
    // clock accuracy level II
    cs[3] = fs;
    // max word length 24, 24 bit, original fs
    cs[4] = 0x0b | ((!fs & 0x0f) << 4);
    Ok(cs)
}

/// CEA-861 speaker allocation for `channel_count` channels with LFE
pub fn channel_allocation(channel_count: u8) -> Result<u8> {
    Ok(match channel_count {
        2 => 0x00,
        3 => 0x01,
        4 => 0x03,
        5 => 0x07,
        6 => 0x0b,
        7 => 0x0f,
        8 => 0x13,
        _ => return Err(Error::InvalidArgs),
    })
}

/// Audio stream parameters held by the controller
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AudioParams {
    pub sample_rate: u32,
    pub channels: u8,
    /// CEA-861 channel allocation
    pub ca: u8,
    /// Channel status; computed from rate and count unless the user set one
    pub channel_status: Option<[u8; 24]>,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            ca: 0,
            channel_status: None,
        }
    }
}

impl AudioParams {
    /// Channel status to program
    pub fn status(&self) -> Result<[u8; 24]> {
        match self.channel_status {
            Some(cs) => Ok(cs),
            None => compute_channel_status(self.sample_rate, self.channels),
        }
    }
}
