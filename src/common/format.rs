//! Media bus formats, YCbCr encodings and quantization ranges

use super::ColorDepth;

/// Component layout of a bus format
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatFamily {
    /// RGB 4:4:4
    Rgb444,
    /// YCbCr 4:4:4
    Ycbcr444,
    /// YCbCr 4:2:2
    Ycbcr422,
    /// YCbCr 4:2:0
    Ycbcr420,
}

impl FormatFamily {
    /// All families, in output preference order
    pub const ALL: [FormatFamily; 4] = [
        FormatFamily::Rgb444,
        FormatFamily::Ycbcr444,
        FormatFamily::Ycbcr422,
        FormatFamily::Ycbcr420,
    ];

    /// Whether the family carries YCbCr
    #[inline]
    pub fn is_yuv(self) -> bool {
        !matches!(self, FormatFamily::Rgb444)
    }
}

/// Media bus format codes understood by the controller's 48 bit input bus
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BusFormat {
    /// MEDIA_BUS_FMT_RGB888_1X24
    Rgb888_1x24 = 0x100a,
    /// MEDIA_BUS_FMT_RGB101010_1X30
    Rgb101010_1x30 = 0x1018,
    /// MEDIA_BUS_FMT_RGB121212_1X36
    Rgb121212_1x36 = 0x1019,
    /// MEDIA_BUS_FMT_RGB161616_1X48
    Rgb161616_1x48 = 0x101a,
    /// MEDIA_BUS_FMT_YUV8_1X24
    Yuv8_1x24 = 0x2025,
    /// MEDIA_BUS_FMT_YUV10_1X30
    Yuv10_1x30 = 0x2016,
    /// MEDIA_BUS_FMT_YUV12_1X36
    Yuv12_1x36 = 0x2029,
    /// MEDIA_BUS_FMT_YUV16_1X48
    Yuv16_1x48 = 0x202a,
    /// MEDIA_BUS_FMT_UYVY8_1X16
    Uyvy8_1x16 = 0x200f,
    /// MEDIA_BUS_FMT_UYVY10_1X20
    Uyvy10_1x20 = 0x201a,
    /// MEDIA_BUS_FMT_UYVY12_1X24
    Uyvy12_1x24 = 0x2020,
    /// MEDIA_BUS_FMT_UYYVYY8_0_5X24
    Uyyvyy8_0_5x24 = 0x2026,
    /// MEDIA_BUS_FMT_UYYVYY10_0_5X30
    Uyyvyy10_0_5x30 = 0x2027,
    /// MEDIA_BUS_FMT_UYYVYY12_0_5X36
    Uyyvyy12_0_5x36 = 0x202b,
    /// MEDIA_BUS_FMT_UYYVYY16_0_5X48
    Uyyvyy16_0_5x48 = 0x202c,
}

impl BusFormat {
    /// Every supported bus format
    pub const ALL: [BusFormat; 15] = [
        BusFormat::Rgb888_1x24,
        BusFormat::Rgb101010_1x30,
        BusFormat::Rgb121212_1x36,
        BusFormat::Rgb161616_1x48,
        BusFormat::Yuv8_1x24,
        BusFormat::Yuv10_1x30,
        BusFormat::Yuv12_1x36,
        BusFormat::Yuv16_1x48,
        BusFormat::Uyvy8_1x16,
        BusFormat::Uyvy10_1x20,
        BusFormat::Uyvy12_1x24,
        BusFormat::Uyyvyy8_0_5x24,
        BusFormat::Uyyvyy10_0_5x30,
        BusFormat::Uyyvyy12_0_5x36,
        BusFormat::Uyyvyy16_0_5x48,
    ];

    /// Decode a raw MEDIA_BUS_FMT code
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.code() == code)
    }

    /// Raw MEDIA_BUS_FMT code
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Bus format for a family and depth, if the controller supports it
    pub fn from_parts(family: FormatFamily, depth: ColorDepth) -> Option<Self> {
        use BusFormat::*;
        use ColorDepth::*;

        Some(match (family, depth) {
            (FormatFamily::Rgb444, Bpc8) => Rgb888_1x24,
            (FormatFamily::Rgb444, Bpc10) => Rgb101010_1x30,
            (FormatFamily::Rgb444, Bpc12) => Rgb121212_1x36,
            (FormatFamily::Rgb444, Bpc16) => Rgb161616_1x48,
            (FormatFamily::Ycbcr444, Bpc8) => Yuv8_1x24,
            (FormatFamily::Ycbcr444, Bpc10) => Yuv10_1x30,
            (FormatFamily::Ycbcr444, Bpc12) => Yuv12_1x36,
            (FormatFamily::Ycbcr444, Bpc16) => Yuv16_1x48,
            (FormatFamily::Ycbcr422, Bpc8) => Uyvy8_1x16,
            (FormatFamily::Ycbcr422, Bpc10) => Uyvy10_1x20,
            (FormatFamily::Ycbcr422, Bpc12) => Uyvy12_1x24,
            (FormatFamily::Ycbcr422, Bpc16) => return None,
            (FormatFamily::Ycbcr420, Bpc8) => Uyyvyy8_0_5x24,
            (FormatFamily::Ycbcr420, Bpc10) => Uyyvyy10_0_5x30,
            (FormatFamily::Ycbcr420, Bpc12) => Uyyvyy12_0_5x36,
            (FormatFamily::Ycbcr420, Bpc16) => Uyyvyy16_0_5x48,
        })
    }

    /// Component layout
    pub fn family(self) -> FormatFamily {
        use BusFormat::*;

        match self {
            Rgb888_1x24 | Rgb101010_1x30 | Rgb121212_1x36 | Rgb161616_1x48 => {
                FormatFamily::Rgb444
            }
            Yuv8_1x24 | Yuv10_1x30 | Yuv12_1x36 | Yuv16_1x48 => FormatFamily::Ycbcr444,
            Uyvy8_1x16 | Uyvy10_1x20 | Uyvy12_1x24 => FormatFamily::Ycbcr422,
            Uyyvyy8_0_5x24 | Uyyvyy10_0_5x30 | Uyyvyy12_0_5x36 | Uyyvyy16_0_5x48 => {
                FormatFamily::Ycbcr420
            }
        }
    }

    /// Bits per component
    pub fn depth(self) -> ColorDepth {
        use BusFormat::*;

        match self {
            Rgb888_1x24 | Yuv8_1x24 | Uyvy8_1x16 | Uyyvyy8_0_5x24 => ColorDepth::Bpc8,
            Rgb101010_1x30 | Yuv10_1x30 | Uyvy10_1x20 | Uyyvyy10_0_5x30 => ColorDepth::Bpc10,
            Rgb121212_1x36 | Yuv12_1x36 | Uyvy12_1x24 | Uyyvyy12_0_5x36 => ColorDepth::Bpc12,
            Rgb161616_1x48 | Yuv16_1x48 | Uyyvyy16_0_5x48 => ColorDepth::Bpc16,
        }
    }

    /// TX_INVID0 video mapping code for this input format
    pub fn video_mapping(self) -> u8 {
        use BusFormat::*;

        match self {
            Rgb888_1x24 => 0x01,
            Rgb101010_1x30 => 0x03,
            Rgb121212_1x36 => 0x05,
            Rgb161616_1x48 => 0x07,
            Yuv8_1x24 | Uyyvyy8_0_5x24 => 0x09,
            Yuv10_1x30 | Uyyvyy10_0_5x30 => 0x0b,
            Yuv12_1x36 | Uyyvyy12_0_5x36 => 0x0d,
            Yuv16_1x48 | Uyyvyy16_0_5x48 => 0x0f,
            Uyvy8_1x16 => 0x16,
            Uyvy10_1x20 => 0x14,
            Uyvy12_1x24 => 0x12,
        }
    }
}

/// YCbCr encoding (V4L2_YCBCR_ENC_*)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// V4L2_YCBCR_ENC_DEFAULT
    Default = 0,
    /// V4L2_YCBCR_ENC_601
    Bt601 = 1,
    /// V4L2_YCBCR_ENC_709
    Bt709 = 2,
    /// V4L2_YCBCR_ENC_XV601
    Xv601 = 3,
    /// V4L2_YCBCR_ENC_XV709
    Xv709 = 4,
}

impl Encoding {
    /// Every encoding
    pub const ALL: [Encoding; 5] = [
        Encoding::Default,
        Encoding::Bt601,
        Encoding::Bt709,
        Encoding::Xv601,
        Encoding::Xv709,
    ];
}

/// Quantization range (V4L2_QUANTIZATION_*)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuantRange {
    /// Let the sink decide
    Default = 0,
    /// 0..255
    Full = 1,
    /// 16..235
    Limited = 2,
}
