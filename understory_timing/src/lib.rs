// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: a play/pause clock driven by host frame timestamps.
//!
//! [`FrameTicker`] turns the monotonically increasing timestamps a host hands
//! to its animation-frame callback into an elapsed value that starts at zero
//! on the first frame after [`FrameTicker::play`] and freezes on
//! [`FrameTicker::pause`]. Playing again resumes from the frozen value.
//!
//! The ticker never schedules anything itself. The host calls
//! [`FrameTicker::frame`] from whatever frame source it has and keeps doing so
//! while [`FrameTicker::is_playing`] is true.
//!
//! ```rust
//! use understory_timing::FrameTicker;
//!
//! let mut ticker = FrameTicker::new();
//! ticker.play();
//! assert_eq!(ticker.frame(1000.0), Some(0.0));
//! assert_eq!(ticker.frame(1016.0), Some(16.0));
//!
//! ticker.pause();
//! assert_eq!(ticker.frame(5000.0), None);
//!
//! ticker.play();
//! assert_eq!(ticker.frame(9000.0), Some(16.0));
//! assert_eq!(ticker.frame(9010.0), Some(26.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use core::fmt;

/// Hook invoked with the elapsed value on every frame.
pub type FrameHook = Box<dyn FnMut(f64)>;

/// Elapsed-time clock for animation frames.
///
/// The unit is whatever the host's timestamps use, usually milliseconds.
#[derive(Default)]
pub struct FrameTicker {
    playing: bool,
    value: f64,
    /// Timestamp of the first frame since the last `play`.
    start: Option<f64>,
    /// Value accumulated before the last `pause`.
    offset: f64,
    on_frame: Option<FrameHook>,
}

impl fmt::Debug for FrameTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameTicker")
            .field("playing", &self.playing)
            .field("value", &self.value)
            .field("start", &self.start)
            .field("offset", &self.offset)
            .field("on_frame", &self.on_frame.is_some())
            .finish()
    }
}

impl FrameTicker {
    /// Creates a paused ticker at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether frames currently advance the clock.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Elapsed value as of the last frame.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Installs the hook run at the end of every frame, replacing any
    /// previous one.
    pub fn set_on_frame(&mut self, hook: impl FnMut(f64) + 'static) {
        self.on_frame = Some(Box::new(hook));
    }

    /// Removes the frame hook.
    pub fn clear_on_frame(&mut self) {
        self.on_frame = None;
    }

    /// Starts or resumes the clock.
    ///
    /// Runs one frame immediately at the resume value; the next call to
    /// [`FrameTicker::frame`] becomes the new start.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        log::debug!("frame ticker playing from {}", self.offset);
        self.playing = true;
        self.start = None;
        self.value = self.offset;
        self.notify();
    }

    /// Freezes the clock at its current value.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        log::debug!("frame ticker paused at {}", self.value);
        self.playing = false;
        self.offset = self.value;
        self.start = None;
    }

    /// Advances the clock to host timestamp `now` and runs the frame hook.
    ///
    /// Returns the new elapsed value, or `None` while paused.
    pub fn frame(&mut self, now: f64) -> Option<f64> {
        if !self.playing {
            return None;
        }
        let start = *self.start.get_or_insert(now);
        self.value = self.offset + now - start;
        self.notify();
        Some(self.value)
    }

    fn notify(&mut self) {
        if let Some(hook) = &mut self.on_frame {
            hook(self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn paused_ticker_ignores_frames() {
        let mut ticker = FrameTicker::new();
        assert!(!ticker.is_playing());
        assert_eq!(ticker.frame(10.0), None);
        assert_eq!(ticker.value(), 0.0);
    }

    #[test]
    fn first_frame_is_the_start() {
        let mut ticker = FrameTicker::new();
        ticker.play();
        assert_eq!(ticker.frame(250.0), Some(0.0));
        assert_eq!(ticker.frame(300.0), Some(50.0));
        assert_eq!(ticker.value(), 50.0);
    }

    #[test]
    fn pause_keeps_offset_and_resets_start() {
        let mut ticker = FrameTicker::new();
        ticker.play();
        ticker.frame(0.0);
        ticker.frame(40.0);
        ticker.pause();
        assert_eq!(ticker.value(), 40.0);

        ticker.play();
        assert_eq!(ticker.value(), 40.0);
        assert_eq!(ticker.frame(1000.0), Some(40.0));
        assert_eq!(ticker.frame(1005.0), Some(45.0));
    }

    #[test]
    fn repeated_play_does_not_restart() {
        let mut ticker = FrameTicker::new();
        ticker.play();
        ticker.frame(0.0);
        ticker.frame(10.0);
        ticker.play();
        assert_eq!(ticker.frame(20.0), Some(20.0));
    }

    #[test]
    fn hook_sees_every_frame() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ticker = FrameTicker::new();
        let sink = Rc::clone(&seen);
        ticker.set_on_frame(move |value| sink.borrow_mut().push(value));

        ticker.play();
        ticker.frame(5.0);
        ticker.frame(8.0);
        ticker.pause();
        ticker.frame(9.0);

        assert_eq!(*seen.borrow(), [0.0, 0.0, 3.0]);

        ticker.clear_on_frame();
        ticker.play();
        assert_eq!(seen.borrow().len(), 3);
    }
}
