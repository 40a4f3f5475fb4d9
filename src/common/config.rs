//! HDMI TX driver configuration

/// Default HPD debounce window in ms
pub const DW_HDMI_DEFAULT_HPD_DEBOUNCE_MS: u32 = 100;
/// Default number of attempts for one register access
pub const DW_HDMI_DEFAULT_BUS_ATTEMPTS: u32 = 3;
/// Default number of PHY PLL lock polls
pub const DW_HDMI_DEFAULT_PHY_LOCK_POLLS: u32 = 5;
/// Default delay between PHY PLL lock polls in us
pub const DW_HDMI_DEFAULT_PHY_LOCK_DELAY_US: u32 = 1000;
/// Default number of PHY I2C done polls
pub const DW_HDMI_DEFAULT_PHY_I2C_POLLS: u32 = 1000;

/// Tunables for one HDMI TX instance
///
/// An instance of `DwHdmiConfig` describes
/// how long a hot plug level must be stable before it is applied,
/// how many times a failing register access is attempted before it is reported,
/// how many times the PHY PLL lock bit is polled and the delay between polls,
/// how many times the PHY I2C master done bit is polled
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DwHdmiConfig {
    hpd_debounce_ms: u32,
    bus_attempts: u32,
    phy_lock_polls: u32,
    phy_lock_delay_us: u32,
    phy_i2c_polls: u32,
}

impl Default for DwHdmiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DwHdmiConfig {
    /// Create a default configuration
    pub const fn new() -> DwHdmiConfig {
        DwHdmiConfig {
            hpd_debounce_ms: DW_HDMI_DEFAULT_HPD_DEBOUNCE_MS,
            bus_attempts: DW_HDMI_DEFAULT_BUS_ATTEMPTS,
            phy_lock_polls: DW_HDMI_DEFAULT_PHY_LOCK_POLLS,
            phy_lock_delay_us: DW_HDMI_DEFAULT_PHY_LOCK_DELAY_US,
            phy_i2c_polls: DW_HDMI_DEFAULT_PHY_I2C_POLLS,
        }
    }

    /// get hpd debounce window
    #[inline]
    pub fn get_hpd_debounce_ms(&self) -> u32 {
        self.hpd_debounce_ms
    }

    /// get register access attempts
    #[inline]
    pub fn get_bus_attempts(&self) -> u32 {
        self.bus_attempts
    }

    /// get PHY lock polls
    #[inline]
    pub fn get_phy_lock_polls(&self) -> u32 {
        self.phy_lock_polls
    }

    /// get PHY lock poll delay
    #[inline]
    pub fn get_phy_lock_delay_us(&self) -> u32 {
        self.phy_lock_delay_us
    }

    /// get PHY I2C done polls
    #[inline]
    pub fn get_phy_i2c_polls(&self) -> u32 {
        self.phy_i2c_polls
    }

    /// set hpd_debounce_ms and return self
    #[inline]
    pub fn hpd_debounce_ms(mut self, val: u32) -> Self {
        self.hpd_debounce_ms = val;
        self
    }

    /// set bus_attempts and return self, at least one attempt is always made
    #[inline]
    pub fn bus_attempts(mut self, val: u32) -> Self {
        self.bus_attempts = val.max(1);
        self
    }

    /// set phy_lock_polls and return self
    #[inline]
    pub fn phy_lock_polls(mut self, val: u32) -> Self {
        self.phy_lock_polls = val.max(1);
        self
    }

    /// set phy_lock_delay_us and return self
    #[inline]
    pub fn phy_lock_delay_us(mut self, val: u32) -> Self {
        self.phy_lock_delay_us = val;
        self
    }

    /// set phy_i2c_polls and return self
    #[inline]
    pub fn phy_i2c_polls(mut self, val: u32) -> Self {
        self.phy_i2c_polls = val.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = DwHdmiConfig::default();
        assert_eq!(c.get_hpd_debounce_ms(), 100);
        assert_eq!(c.get_bus_attempts(), 3);
        assert_eq!(c.get_phy_lock_polls(), 5);
    }

    #[test]
    fn attempts_never_zero() {
        let c = DwHdmiConfig::new().bus_attempts(0).phy_i2c_polls(0);
        assert_eq!(c.get_bus_attempts(), 1);
        assert_eq!(c.get_phy_i2c_polls(), 1);
    }
}
