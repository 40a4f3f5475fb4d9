//! Per-session link state negotiated with the sink

/// Size of the DSC picture parameter set payload
pub const PPS_PAYLOAD_LEN: usize = 128;

/// Negotiated link configuration
///
/// Owned by the active session. It is reset on every mode change and kept
/// untouched across suspend/resume.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Display stream compression active
    pub dsc_mode: bool,
    /// Fixed rate link active (TMDS otherwise)
    pub frl_mode: bool,
    /// FRL lane count
    pub frl_lanes: u8,
    /// FRL rate per lane in Gbps
    pub rate_per_lane: u8,
    /// Active horizontal pixels of the compressed stream
    pub hcactive: u16,
    /// Additional function flags of the vendor specific payload
    pub add_func: u8,
    /// DSC picture parameter set
    pub pps_payload: [u8; PPS_PAYLOAD_LEN],
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            dsc_mode: false,
            frl_mode: false,
            frl_lanes: 0,
            rate_per_lane: 0,
            hcactive: 0,
            add_func: 0,
            pps_payload: [0; PPS_PAYLOAD_LEN],
        }
    }
}

impl LinkConfig {
    /// Forget everything negotiated
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raw link bandwidth in Gbps, 0 for TMDS
    pub fn frl_bandwidth_gbps(&self) -> u32 {
        if !self.frl_mode {
            return 0;
        }
        u32::from(self.frl_lanes) * u32::from(self.rate_per_lane)
    }
}

/// Sink DSC capabilities read from the EDID by the platform
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DscCaps {
    /// DSC 1.2 supported
    pub v1p2: bool,
    /// Maximum slice count
    pub max_slices: u8,
    /// Maximum FRL rate per lane when compressed
    pub max_frl_rate_per_lane: u8,
    /// Maximum FRL lanes when compressed
    pub max_lanes: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_payload() {
        let mut cfg = LinkConfig {
            dsc_mode: true,
            frl_mode: true,
            frl_lanes: 4,
            rate_per_lane: 12,
            hcactive: 1920,
            add_func: 0x1,
            pps_payload: [0xab; PPS_PAYLOAD_LEN],
        };
        assert_eq!(cfg.frl_bandwidth_gbps(), 48);
        cfg.reset();
        assert_eq!(cfg, LinkConfig::default());
        assert_eq!(cfg.frl_bandwidth_gbps(), 0);
    }
}
