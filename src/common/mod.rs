//! HDMI common module
//!
//! Include:
//! config: driver tunables
//! format: media bus formats, encodings and quantization ranges

use crate::error::{Error, Result};

/// Pixel repetition factor
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PixelRepetition {
    /// No repetition
    Off = 0,
    /// Each pixel sent twice
    X1 = 1,
    /// Each pixel sent 3 times
    X2 = 2,
    /// Each pixel sent 4 times
    X3 = 3,
    /// Each pixel sent 5 times
    X4 = 4,
    /// Each pixel sent 6 times
    X5 = 5,
    /// Each pixel sent 7 times
    X6 = 6,
    /// Each pixel sent 8 times
    X7 = 7,
    /// Each pixel sent 9 times
    X8 = 8,
    /// Each pixel sent 10 times
    X9 = 9,
    /// Each pixel sent 11 times
    X10 = 10,
}

impl PixelRepetition {
    /// Map a raw factor (0..=10)
    pub fn from_factor(factor: u8) -> Result<Self> {
        Ok(match factor {
            0 => Self::Off,
            1 => Self::X1,
            2 => Self::X2,
            3 => Self::X3,
            4 => Self::X4,
            5 => Self::X5,
            6 => Self::X6,
            7 => Self::X7,
            8 => Self::X8,
            9 => Self::X9,
            10 => Self::X10,
            _ => return Err(Error::InvalidArgs),
        })
    }

    /// Raw factor
    #[inline]
    pub fn factor(self) -> u8 {
        self as u8
    }
}

/// Color depth in bits per component
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorDepth {
    /// 8 bit
    Bpc8 = 8,
    /// 10 bit
    Bpc10 = 10,
    /// 12 bit
    Bpc12 = 12,
    /// 16 bit
    Bpc16 = 16,
}

impl ColorDepth {
    /// Map a raw bits-per-component value
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            8 => Ok(Self::Bpc8),
            10 => Ok(Self::Bpc10),
            12 => Ok(Self::Bpc12),
            16 => Ok(Self::Bpc16),
            _ => Err(Error::InvalidArgs),
        }
    }

    /// Bits per component
    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Resolution class used by the Synopsys PHY tables.
    ///
    /// 16 bit has no class in those tables.
    pub fn res_class(self) -> Option<ResClass> {
        match self {
            Self::Bpc8 => Some(ResClass::Res8),
            Self::Bpc10 => Some(ResClass::Res10),
            Self::Bpc12 => Some(ResClass::Res12),
            Self::Bpc16 => None,
        }
    }
}

/// Resolution class index into `res[]` / `curr[]` table columns
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResClass {
    /// 8 bit
    Res8 = 0,
    /// 10 bit
    Res10 = 1,
    /// 12 bit
    Res12 = 2,
}

/// Number of resolution classes
pub const DW_HDMI_RES_MAX: usize = 3;

impl ResClass {
    /// Column index
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// PHY operation mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperationMode {
    /// HDMI 1.4
    Hdmi14 = 1,
    /// HDMI 2.0
    Hdmi20,
    /// MHL 24 bit
    Mhl24,
    /// MHL packed pixel
    MhlPackedPixel,
}

/// PHY type reported in CONFIG2_ID
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PhyType {
    /// DWC HDMI TX PHY
    DwcHdmiTxPhy = 0x00,
    /// DWC MHL PHY with HEAC
    DwcMhlPhyHeac = 0xb2,
    /// DWC MHL PHY
    DwcMhlPhy = 0xc2,
    /// DWC HDMI 3D TX PHY with HEAC
    DwcHdmi3dTxPhyHeac = 0xe2,
    /// DWC HDMI 3D TX PHY
    DwcHdmi3dTxPhy = 0xf2,
    /// DWC HDMI 2.0 TX PHY
    DwcHdmi20TxPhy = 0xf3,
    /// Vendor PHY
    VendorPhy = 0xfe,
}

impl PhyType {
    /// Decode the CONFIG2_ID value
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0x00 => Self::DwcHdmiTxPhy,
            0xb2 => Self::DwcMhlPhyHeac,
            0xc2 => Self::DwcMhlPhy,
            0xe2 => Self::DwcHdmi3dTxPhyHeac,
            0xf2 => Self::DwcHdmi3dTxPhy,
            0xf3 => Self::DwcHdmi20TxPhy,
            0xfe => Self::VendorPhy,
            _ => return None,
        })
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::DwcHdmiTxPhy => "DWC HDMI TX PHY",
            Self::DwcMhlPhyHeac => "DWC MHL PHY + HEAC PHY",
            Self::DwcMhlPhy => "DWC MHL PHY",
            Self::DwcHdmi3dTxPhyHeac => "DWC HDMI 3D TX PHY + HEAC PHY",
            Self::DwcHdmi3dTxPhy => "DWC HDMI 3D TX PHY",
            Self::DwcHdmi20TxPhy => "DWC HDMI 2.0 TX PHY",
            Self::VendorPhy => "Vendor PHY",
        }
    }

    /// Whether the PHY has the SVSRET low power retention input
    pub fn has_svsret(self) -> bool {
        matches!(self, Self::DwcHdmi20TxPhy)
    }
}

/// Connector status reported by HPD
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectorStatus {
    /// Sink present
    Connected,
    /// No sink
    Disconnected,
    /// Not known yet
    Unknown,
}

/// driver configuration
pub mod config;
/// bus formats and encodings
pub mod format;
