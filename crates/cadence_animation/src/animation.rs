//! Animation requests
//!
//! An [`Animation`] describes one interpolation request: sweep a scalar
//! parameter from 0 to 1 over a duration, optionally after a delay, shaped
//! by an easing curve, optionally repeating forever. Requests are built
//! fluently and handed to a scheduler, which validates them synchronously.

use crate::curve::Curve;
use thiserror::Error;

/// Progress callback, invoked with the curve-shaped progress value.
pub type ProgressFn = Box<dyn FnMut(f64)>;

/// Completion callback, invoked at most once when a one-shot cycle ends.
pub type CompletionFn = Box<dyn FnOnce()>;

/// Why a request was rejected at schedule time.
///
/// Violations are reported synchronously by the call that introduced them,
/// never coerced or deferred to tick time.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("animation duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),
    #[error("animation delay must be zero or more seconds, got {0}")]
    InvalidDelay(f64),
    #[error("repeating animations do not take a completion callback")]
    RepeatingWithCompletion,
}

/// One interpolation request.
///
/// Durations and delays are in seconds. The progress callback is part of
/// construction; delay, curve, and completion are optional refinements:
///
/// ```
/// use cadence_animation::{Animation, Curve};
///
/// let fade = Animation::new(0.75, |t| println!("opacity {t:.2}"))
///     .delay(0.25)
///     .curve(Curve::EaseInOut)
///     .on_complete(|| println!("done"));
/// # let _ = fade;
/// ```
pub struct Animation {
    pub(crate) duration: f64,
    pub(crate) delay: f64,
    pub(crate) curve: Curve,
    pub(crate) repeating: bool,
    pub(crate) on_progress: ProgressFn,
    pub(crate) on_complete: Option<CompletionFn>,
}

impl Animation {
    /// One-shot request: progress sweeps 0 to 1 once, then completes.
    pub fn new(duration: f64, on_progress: impl FnMut(f64) + 'static) -> Self {
        Self {
            duration,
            delay: 0.0,
            curve: Curve::default(),
            repeating: false,
            on_progress: Box::new(on_progress),
            on_complete: None,
        }
    }

    /// Repeat-forever request: progress wraps back to 0 at the end of every
    /// cycle and never completes.
    pub fn repeating(duration: f64, on_progress: impl FnMut(f64) + 'static) -> Self {
        Self {
            repeating: true,
            ..Self::new(duration, on_progress)
        }
    }

    /// Seconds to wait before progress begins (default 0).
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Easing curve shaping the reported progress (default [`Curve::Linear`]).
    ///
    /// Curve output is delivered verbatim; only the internally computed
    /// linear fraction is clamped to `[0,1]`.
    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Callback fired once, after the final progress delivery of a one-shot
    /// cycle. Rejected at schedule time on repeating requests.
    pub fn on_complete(mut self, on_complete: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ScheduleError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ScheduleError::InvalidDuration(self.duration));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(ScheduleError::InvalidDelay(self.delay));
        }
        if self.repeating && self.on_complete.is_some() {
            return Err(ScheduleError::RepeatingWithCompletion);
        }
        Ok(())
    }
}
