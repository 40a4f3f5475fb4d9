//! Hot plug detect signalling
//!
//! The interrupt (or polling) path only ever touches [`HpdSignal`]. The
//! controller drains it at safe points and runs the level through
//! [`HpdDebouncer`] before acting on it.

use core::sync::atomic::{AtomicU64, Ordering};

const PENDING: u64 = 1 << 0;
const CONNECTED: u64 = 1 << 1;
const RX_SENSE: u64 = 1 << 2;
/// The sample time sits in the upper word
const AT_MS_SHIFT: u32 = 32;

/// One sampled HPD / RX sense level
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HpdEvent {
    pub connected: bool,
    pub rx_sense: bool,
    /// Caller supplied time of the sample, in ms
    pub at_ms: u32,
}

/// Single slot HPD mailbox shared with interrupt context
///
/// Newer updates overwrite older ones; only the latest level matters. Level
/// and sample time share one word so a reader never mixes two updates.
pub struct HpdSignal {
    slot: AtomicU64,
}

impl HpdSignal {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU64::new(0),
        }
    }

    /// Post a new level
    pub fn update(&self, connected: bool, rx_sense: bool, now_ms: u32) {
        let mut slot = (u64::from(now_ms) << AT_MS_SHIFT) | PENDING;
        if connected {
            slot |= CONNECTED;
        }
        if rx_sense {
            slot |= RX_SENSE;
        }
        self.slot.store(slot, Ordering::Release);
    }

    /// Take the pending level, if any
    pub fn take(&self) -> Option<HpdEvent> {
        let slot = self.slot.swap(0, Ordering::Acquire);
        if slot & PENDING == 0 {
            return None;
        }
        Some(HpdEvent {
            connected: slot & CONNECTED != 0,
            rx_sense: slot & RX_SENSE != 0,
            at_ms: (slot >> AT_MS_SHIFT) as u32,
        })
    }

    /// Whether a level is waiting
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) & PENDING != 0
    }
}

impl Default for HpdSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a level only after it stayed stable for the debounce window
#[derive(Debug, Clone)]
pub struct HpdDebouncer {
    window_ms: u32,
    candidate: Option<(bool, u32)>,
    applied: Option<bool>,
}

impl HpdDebouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            candidate: None,
            applied: None,
        }
    }

    /// Feed a sampled level; a change restarts the window
    pub fn observe(&mut self, level: bool, at_ms: u32) {
        match self.candidate {
            Some((cur, _)) if cur == level => {}
            _ => self.candidate = Some((level, at_ms)),
        }
    }

    /// Level that became stable since the last call
    pub fn poll(&mut self, now_ms: u32) -> Option<bool> {
        let (level, since) = self.candidate?;
        if now_ms.wrapping_sub(since) < self.window_ms {
            return None;
        }
        if self.applied == Some(level) {
            return None;
        }
        self.applied = Some(level);
        Some(level)
    }

    /// Last applied level
    pub fn level(&self) -> Option<bool> {
        self.applied
    }

    /// Forget the applied level so the next stable level is reported again
    pub fn reset(&mut self) {
        self.applied = None;
    }
}
