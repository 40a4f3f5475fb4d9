//! Output format negotiation
//!
//! Picks the bus formats, encodings, quantization range and clocks for one
//! mode set. Platform hooks in [`PlatOps`](crate::plat::PlatOps) win over the
//! built-in policy whenever they return a value.

use crate::common::format::{BusFormat, Encoding, FormatFamily, QuantRange};
use crate::common::ColorDepth;
use crate::error::{Error, Result};
use crate::mode::{ColorFormats, ColorRequest, DisplayInfo, DisplayMode, ModeStatus};
use crate::plat::{PlatData, PlatFlags};

/// Highest TMDS character rate in Hz without scrambling
pub const HDMI14_MAX_TMDSCLK: u64 = 340_000_000;

/// Result of format negotiation for one mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Negotiated {
    /// Format driven into the controller
    pub in_bus_format: BusFormat,
    /// Format sent on the wire
    pub out_bus_format: BusFormat,
    pub enc_in: Encoding,
    pub enc_out: Encoding,
    pub quant_range: QuantRange,
    /// Pixel clock in Hz
    pub pixel_clock: u64,
    /// Clock the PHY tables are indexed with, in Hz
    pub phy_clock: u64,
    /// TMDS character rate in Hz
    pub tmds_clock: u64,
}

impl Negotiated {
    /// TMDS rate needs scrambling and the 1/40 clock ratio
    #[inline]
    pub fn needs_high_tmds_ratio(&self) -> bool {
        self.tmds_clock > HDMI14_MAX_TMDSCLK
    }
}

/// Encodings the controller can pair with `format`
pub fn allowed_encodings(format: BusFormat) -> &'static [Encoding] {
    match format.family() {
        FormatFamily::Rgb444 => &[Encoding::Default],
        FormatFamily::Ycbcr444 | FormatFamily::Ycbcr422 => &[
            Encoding::Bt601,
            Encoding::Bt709,
            Encoding::Xv601,
            Encoding::Xv709,
        ],
        FormatFamily::Ycbcr420 => &[Encoding::Bt601, Encoding::Bt709],
    }
}

/// Whether `format` may be sent with `encoding`
pub fn check_pair(format: BusFormat, encoding: Encoding) -> Result<()> {
    if allowed_encodings(format).contains(&encoding) {
        Ok(())
    } else {
        Err(Error::UnsupportedFormat)
    }
}

/// TMDS character rate for `pixel_clock` sent as `format`
pub fn tmds_clock(pixel_clock: u64, format: BusFormat) -> u64 {
    let bits = u64::from(format.depth().bits());
    match format.family() {
        // 4:2:2 always uses 24 bit containers
        FormatFamily::Ycbcr422 => pixel_clock,
        FormatFamily::Ycbcr420 => pixel_clock / 2 * bits / 8,
        _ => pixel_clock * bits / 8,
    }
}

/// Bus format for the requested output color, after platform and sink masks
pub fn output_format(plat: &PlatData<'_>, info: &DisplayInfo, color: &ColorRequest) -> Result<BusFormat> {
    let family = color.family;
    let flag = ColorFormats::from_family(family);

    if family == FormatFamily::Ycbcr420 && !plat.has(PlatFlags::YCBCR_420_ALLOWED) {
        log::debug!("hdmi: YCbCr 4:2:0 not allowed on this platform");
        return Err(Error::UnsupportedFormat);
    }
    if plat.unsupported_formats.contains(flag) {
        log::debug!("hdmi: {:?} masked by platform", family);
        return Err(Error::UnsupportedFormat);
    }
    if family != FormatFamily::Rgb444 && !info.color_formats.contains(flag) {
        log::debug!("hdmi: sink does not accept {:?}", family);
        return Err(Error::UnsupportedFormat);
    }
    if color.depth > ColorDepth::Bpc8
        && (plat.has(PlatFlags::UNSUPPORTED_DEEP_COLOR) || info.bpc < color.depth.bits())
    {
        log::debug!("hdmi: {} bpc not available", color.depth.bits());
        return Err(Error::UnsupportedFormat);
    }

    BusFormat::from_parts(family, color.depth).ok_or(Error::UnsupportedFormat)
}

fn output_encoding(format: BusFormat, mode: &DisplayMode) -> Result<Encoding> {
    let candidates = allowed_encodings(format);

    if let Some(requested) = mode.color.encoding {
        check_pair(format, requested)?;
        return Ok(requested);
    }

    let preferred = if !format.family().is_yuv() {
        Encoding::Default
    } else if mode.vdisplay > 576 {
        Encoding::Bt709
    } else {
        Encoding::Bt601
    };

    if candidates.contains(&preferred) {
        Ok(preferred)
    } else {
        candidates.first().copied().ok_or(Error::UnsupportedFormat)
    }
}

fn input_format(plat: &PlatData<'_>, out: BusFormat) -> BusFormat {
    let fmt = plat
        .ops
        .get_input_bus_format()
        .or(plat.input_bus_format)
        .unwrap_or(out);

    if fmt.family().is_yuv() && plat.has(PlatFlags::UNSUPPORTED_YUV_INPUT) {
        // source can only drive RGB, keep the depth
        return BusFormat::from_parts(FormatFamily::Rgb444, fmt.depth()).unwrap_or(BusFormat::Rgb888_1x24);
    }
    fmt
}

fn input_encoding(plat: &PlatData<'_>, input: BusFormat, enc_out: Encoding) -> Encoding {
    if let Some(enc) = plat.ops.get_enc_in_encoding() {
        return enc;
    }
    if !input.family().is_yuv() {
        return Encoding::Default;
    }
    [plat.input_bus_encoding, enc_out, Encoding::Bt601]
        .into_iter()
        .find(|e| check_pair(input, *e).is_ok())
        .unwrap_or(Encoding::Bt601)
}

/// Default quantization for an output format and mode
pub fn default_quant_range(format: BusFormat, mode: &DisplayMode) -> QuantRange {
    if format.family().is_yuv() || mode.vic > 1 {
        QuantRange::Limited
    } else {
        QuantRange::Full
    }
}

/// Negotiate formats, encodings and clocks for `mode`
pub fn negotiate(plat: &PlatData<'_>, info: &DisplayInfo, mode: &DisplayMode) -> Result<Negotiated> {
    let ops = plat.ops;

    let out_bus_format = match ops.get_output_bus_format() {
        Some(fmt) => fmt,
        None => output_format(plat, info, &mode.color)?,
    };

    let enc_out = match ops.get_enc_out_encoding() {
        Some(enc) => {
            check_pair(out_bus_format, enc)?;
            enc
        }
        None => output_encoding(out_bus_format, mode)?,
    };

    let in_bus_format = input_format(plat, out_bus_format);
    let enc_in = input_encoding(plat, in_bus_format, enc_out);

    let quant_range = ops
        .get_quant_range()
        .unwrap_or_else(|| default_quant_range(out_bus_format, mode));

    let pixel_clock = mode.pixel_clock_hz();
    let phy_clock = if out_bus_format.family() == FormatFamily::Ycbcr420 {
        pixel_clock / 2
    } else {
        pixel_clock
    };
    let tmds = tmds_clock(pixel_clock, out_bus_format);

    let neg = Negotiated {
        in_bus_format,
        out_bus_format,
        enc_in,
        enc_out,
        quant_range,
        pixel_clock,
        phy_clock,
        tmds_clock: tmds,
    };
    log::debug!(
        "hdmi: negotiated {:?}/{:?} -> {:?}/{:?}, tmds {} Hz",
        neg.in_bus_format,
        neg.enc_in,
        neg.out_bus_format,
        neg.enc_out,
        neg.tmds_clock
    );
    Ok(neg)
}

/// Check whether `mode` can be driven to the sink described by `info`
pub fn mode_valid(plat: &PlatData<'_>, info: &DisplayInfo, mode: &DisplayMode) -> ModeStatus {
    let status = plat.ops.mode_valid(info, mode);
    if status != ModeStatus::Ok {
        return status;
    }

    let out = match plat.ops.get_output_bus_format() {
        Some(fmt) => fmt,
        None => match output_format(plat, info, &mode.color) {
            Ok(fmt) => fmt,
            Err(_) => return ModeStatus::Bad,
        },
    };
    let tmds_khz = tmds_clock(mode.pixel_clock_hz(), out) / 1000;

    if plat.max_tmdsclk != 0 && tmds_khz > u64::from(plat.max_tmdsclk) {
        return ModeStatus::ClockHigh;
    }
    if info.max_tmds_clock != 0 && tmds_khz > u64::from(info.max_tmds_clock) {
        return ModeStatus::ClockHigh;
    }
    ModeStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plat::{PlatOps, NO_PLAT_OPS};

    fn yuv_sink() -> DisplayInfo {
        DisplayInfo {
            color_formats: ColorFormats::all(),
            bpc: 12,
            ..DisplayInfo::default()
        }
    }

    #[test]
    fn matrix_is_total() {
        for fmt in BusFormat::ALL {
            let ok = Encoding::ALL.iter().filter(|e| check_pair(fmt, **e).is_ok()).count();
            let expected = match fmt.family() {
                FormatFamily::Rgb444 => 1,
                FormatFamily::Ycbcr444 | FormatFamily::Ycbcr422 => 4,
                FormatFamily::Ycbcr420 => 2,
            };
            assert_eq!(ok, expected, "{:?}", fmt);
        }
        assert!(check_pair(BusFormat::Rgb888_1x24, Encoding::Bt709).is_err());
        assert!(check_pair(BusFormat::Uyyvyy8_0_5x24, Encoding::Xv709).is_err());
    }

    #[test]
    fn rgb_1080p_defaults() {
        let plat = PlatData::new(&NO_PLAT_OPS);
        let neg = negotiate(&plat, &DisplayInfo::default(), &DisplayMode::cea_1080p60()).unwrap();
        assert_eq!(neg.out_bus_format, BusFormat::Rgb888_1x24);
        assert_eq!(neg.in_bus_format, BusFormat::Rgb888_1x24);
        assert_eq!(neg.enc_out, Encoding::Default);
        assert_eq!(neg.quant_range, QuantRange::Limited);
        assert_eq!(neg.tmds_clock, 148_500_000);
        assert!(!neg.needs_high_tmds_ratio());
    }

    #[test]
    fn yuv420_needs_platform_permission() {
        let mode = DisplayMode::cea_2160p60().with_color(ColorRequest {
            family: FormatFamily::Ycbcr420,
            depth: ColorDepth::Bpc8,
            encoding: None,
        });
        let mut plat = PlatData::new(&NO_PLAT_OPS);
        assert_eq!(negotiate(&plat, &yuv_sink(), &mode), Err(Error::UnsupportedFormat));

        plat.flags |= PlatFlags::YCBCR_420_ALLOWED;
        let neg = negotiate(&plat, &yuv_sink(), &mode).unwrap();
        assert_eq!(neg.out_bus_format, BusFormat::Uyyvyy8_0_5x24);
        assert_eq!(neg.enc_out, Encoding::Bt709);
        assert_eq!(neg.phy_clock, 297_000_000);
        assert_eq!(neg.tmds_clock, 297_000_000);
    }

    #[test]
    fn requested_encoding_outside_matrix_rejected() {
        let plat = PlatData::new(&NO_PLAT_OPS).with_flags(PlatFlags::YCBCR_420_ALLOWED);
        let mode = DisplayMode::cea_2160p60().with_color(ColorRequest {
            family: FormatFamily::Ycbcr420,
            depth: ColorDepth::Bpc8,
            encoding: Some(Encoding::Xv601),
        });
        assert_eq!(negotiate(&plat, &yuv_sink(), &mode), Err(Error::UnsupportedFormat));
    }

    #[test]
    fn deep_color_masks() {
        let mode = DisplayMode::cea_1080p60().with_color(ColorRequest {
            family: FormatFamily::Rgb444,
            depth: ColorDepth::Bpc10,
            encoding: None,
        });
        let mut plat = PlatData::new(&NO_PLAT_OPS);
        let neg = negotiate(&plat, &yuv_sink(), &mode).unwrap();
        assert_eq!(neg.tmds_clock, 185_625_000);

        // sink limited to 8 bpc
        assert!(negotiate(&plat, &DisplayInfo::default(), &mode).is_err());

        plat.flags |= PlatFlags::UNSUPPORTED_DEEP_COLOR;
        assert_eq!(negotiate(&plat, &yuv_sink(), &mode), Err(Error::UnsupportedFormat));
    }

    #[test]
    fn sd_yuv_uses_601_and_rgb_input() {
        let mode = DisplayMode {
            vdisplay: 576,
            vic: 17,
            ..DisplayMode::cea_720p60()
        }
        .with_color(ColorRequest {
            family: FormatFamily::Ycbcr444,
            depth: ColorDepth::Bpc8,
            encoding: None,
        });
        let plat = PlatData::new(&NO_PLAT_OPS).with_flags(PlatFlags::UNSUPPORTED_YUV_INPUT);
        let neg = negotiate(&plat, &yuv_sink(), &mode).unwrap();
        assert_eq!(neg.enc_out, Encoding::Bt601);
        assert_eq!(neg.in_bus_format, BusFormat::Rgb888_1x24);
        assert_eq!(neg.enc_in, Encoding::Default);
        assert_eq!(neg.quant_range, QuantRange::Limited);
    }

    struct Forced;

    impl PlatOps for Forced {
        fn get_output_bus_format(&self) -> Option<BusFormat> {
            Some(BusFormat::Yuv8_1x24)
        }

        fn get_enc_out_encoding(&self) -> Option<Encoding> {
            Some(Encoding::Xv709)
        }

        fn get_quant_range(&self) -> Option<QuantRange> {
            Some(QuantRange::Full)
        }
    }

    #[test]
    fn platform_overrides_win() {
        let plat = PlatData::new(&Forced);
        let neg = negotiate(&plat, &DisplayInfo::default(), &DisplayMode::cea_720p60()).unwrap();
        assert_eq!(neg.out_bus_format, BusFormat::Yuv8_1x24);
        assert_eq!(neg.enc_out, Encoding::Xv709);
        assert_eq!(neg.enc_in, Encoding::Xv709);
        assert_eq!(neg.quant_range, QuantRange::Full);
    }

    #[test]
    fn mode_valid_clock_limits() {
        let mut plat = PlatData::new(&NO_PLAT_OPS);
        plat.max_tmdsclk = 340_000;
        assert_eq!(mode_valid(&plat, &DisplayInfo::default(), &DisplayMode::cea_1080p60()), ModeStatus::Ok);
        assert_eq!(
            mode_valid(&plat, &DisplayInfo::default(), &DisplayMode::cea_2160p60()),
            ModeStatus::ClockHigh
        );
        let info = DisplayInfo {
            max_tmds_clock: 165_000,
            ..DisplayInfo::default()
        };
        plat.max_tmdsclk = 0;
        assert_eq!(mode_valid(&plat, &info, &DisplayMode::cea_1080p60()), ModeStatus::ClockHigh);
    }
}
