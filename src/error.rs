//! Driver error type

use core::fmt;

use crate::bridge::LinkState;

/// Errors reported by the HDMI TX driver
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// The register bus failed to complete an access to `reg`
    Bus {
        /// register offset of the failed access
        reg: u32,
    },
    /// No table entry covers the requested clock / depth / repetition
    NoMatchingConfig,
    /// Every candidate output encoding is masked out
    UnsupportedFormat,
    /// Operation invoked outside its valid controller state
    InvalidStateTransition {
        /// name of the rejected operation
        op: &'static str,
        /// state the controller was in
        state: LinkState,
    },
    /// PHY PLL lock or PHY I2C completion never signalled
    Timeout,
    /// Argument out of range
    InvalidArgs,
    /// Not a DesignWare HDMI TX, or no usable PHY
    NoDevice,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus { reg } => write!(f, "register bus error at {:#06x}", reg),
            Error::NoMatchingConfig => f.write_str("no matching PHY configuration"),
            Error::UnsupportedFormat => f.write_str("unsupported output format"),
            Error::InvalidStateTransition { op, state } => {
                write!(f, "{} not allowed in state {:?}", op, state)
            }
            Error::Timeout => f.write_str("timed out"),
            Error::InvalidArgs => f.write_str("invalid argument"),
            Error::NoDevice => f.write_str("no such device"),
        }
    }
}

/// Driver result
pub type Result<T> = core::result::Result<T, Error>;
