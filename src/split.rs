//! Dual-link (split) output
//!
//! Two controllers drive the left and right halves of one display. Each half
//! owns its own register map; only the programming order is shared.

use crate::bridge::DwHdmi;
use crate::error::{Error, Result};
use crate::mode::{DisplayInfo, DisplayMode};
use crate::plat::PlatFlags;
use crate::regmap::Regmap;

/// Which half is programmed first
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SplitOrder {
    LeftFirst,
    RightFirst,
}

/// Left/right controller pair
pub struct SplitPair<'a, L: Regmap, R: Regmap> {
    left: DwHdmi<'a, L>,
    right: DwHdmi<'a, R>,
}

impl<'a, L: Regmap, R: Regmap> SplitPair<'a, L, R> {
    /// Pair two controllers; both must be in split mode and only `left` the first screen
    pub fn new(left: DwHdmi<'a, L>, right: DwHdmi<'a, R>) -> Result<Self> {
        let (l, r) = (left.plat(), right.plat());
        if !l.has(PlatFlags::SPLIT_MODE) || !r.has(PlatFlags::SPLIT_MODE) {
            log::error!("hdmi: split pair without SPLIT_MODE");
            return Err(Error::InvalidArgs);
        }
        if !l.has(PlatFlags::FIRST_SCREEN) || r.has(PlatFlags::FIRST_SCREEN) {
            log::error!("hdmi: split pair needs FIRST_SCREEN on the left half only");
            return Err(Error::InvalidArgs);
        }
        Ok(Self { left, right })
    }

    pub fn left(&mut self) -> &mut DwHdmi<'a, L> {
        &mut self.left
    }

    pub fn right(&mut self) -> &mut DwHdmi<'a, R> {
        &mut self.right
    }

    pub fn into_parts(self) -> (DwHdmi<'a, L>, DwHdmi<'a, R>) {
        (self.left, self.right)
    }

    /// Half-width timing for `mode`, as the platform converts it
    pub fn half_mode(&self, mode: &DisplayMode) -> DisplayMode {
        self.left.plat().ops.convert_to_split_mode(mode)
    }

    /// Enable both halves with the half-width timing of `mode`
    ///
    /// A failure on the first half returns before the second is touched.
    pub fn enable(&mut self, order: SplitOrder, info: &DisplayInfo, mode: &DisplayMode) -> Result<()> {
        let half = self.half_mode(mode);
        log::debug!(
            "hdmi: split {}x{} -> 2 x {}x{}, {:?}",
            mode.hdisplay,
            mode.vdisplay,
            half.hdisplay,
            half.vdisplay,
            order
        );
        match order {
            SplitOrder::LeftFirst => {
                self.left.enable(info, &half)?;
                self.right.enable(info, &half)
            }
            SplitOrder::RightFirst => {
                self.right.enable(info, &half)?;
                self.left.enable(info, &half)
            }
        }
    }

    /// Disable both halves in `order`
    pub fn disable(&mut self, order: SplitOrder) -> Result<()> {
        match order {
            SplitOrder::LeftFirst => {
                self.left.disable()?;
                self.right.disable()
            }
            SplitOrder::RightFirst => {
                self.right.disable()?;
                self.left.disable()
            }
        }
    }

    /// Full timing the pair is currently showing
    pub fn origin_mode(&self) -> Result<Option<DisplayMode>> {
        self.left
            .mode()
            .map(|half| self.left.plat().ops.convert_to_origin_mode(half))
            .transpose()
    }

    /// Poll HPD on both halves
    pub fn poll_hpd(&mut self, now_ms: u32) -> Result<()> {
        self.left.poll_hpd(now_ms)?;
        self.right.poll_hpd(now_ms)?;
        Ok(())
    }
}
