//! Frame tick sources
//!
//! A tick source reports elapsed wall-clock time to a single subscriber,
//! once per frame. It owns no animation state and knows nothing about what
//! the subscriber does with the elapsed time; it exists purely to decouple
//! frame-driven consumers (such as an animation scheduler) from a concrete
//! display or timer mechanism.
//!
//! Two implementations are provided:
//!
//! - [`ClockTicker`]: sleeps one frame interval per iteration and delivers
//!   measured elapsed seconds on the calling thread
//! - [`ManualTicker`]: delivers whatever elapsed time the caller hands it,
//!   for tests and externally timed hosts

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Per-frame notification, carrying elapsed seconds since the previous tick.
///
/// The closure typically captures a weak handle to whatever it drives, so
/// the ticker never extends its subscriber's lifetime.
pub type TickFn = Box<dyn FnMut(f64)>;

/// Contract for a per-frame tick source.
///
/// Exactly one subscriber is supported; installing a new one replaces the
/// previous one. `start` and `stop` are idempotent.
pub trait FrameTicker {
    /// Whether ticks are currently being delivered.
    fn is_running(&self) -> bool;

    /// Begin delivering ticks.
    fn start(&mut self);

    /// Stop delivering ticks.
    fn stop(&mut self);

    /// Install the subscriber, replacing any previous one.
    fn set_subscriber(&mut self, subscriber: TickFn);
}

/// Tick source driven by hand.
///
/// `tick` forwards the given elapsed time to the subscriber while running
/// and is ignored while stopped. Useful as a test double and for hosts that
/// already own a frame loop with its own timing.
#[derive(Default)]
pub struct ManualTicker {
    running: bool,
    subscriber: Option<TickFn>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick with the given elapsed seconds.
    pub fn tick(&mut self, elapsed: f64) {
        if !self.running {
            return;
        }
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(elapsed);
        }
    }
}

impl FrameTicker for ManualTicker {
    fn is_running(&self) -> bool {
        self.running
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn set_subscriber(&mut self, subscriber: TickFn) {
        self.subscriber = Some(subscriber);
    }
}

/// Wall-clock tick source.
///
/// `run` blocks the calling thread, sleeping one frame interval per
/// iteration and reporting measured (not nominal) elapsed seconds, so a
/// stall surfaces as one large delta on the next tick rather than being
/// silently swallowed.
pub struct ClockTicker {
    interval: Duration,
    running: Rc<Cell<bool>>,
    subscriber: Option<TickFn>,
}

impl ClockTicker {
    /// Create a ticker targeting the given frame rate (clamped to >= 1 fps).
    pub fn new(target_fps: u32) -> Self {
        let fps = target_fps.max(1) as u64;
        Self {
            interval: Duration::from_micros(1_000_000 / fps),
            running: Rc::new(Cell::new(false)),
            subscriber: None,
        }
    }

    /// Non-owning stop handle, usable from inside a subscriber.
    pub fn control(&self) -> TickerControl {
        TickerControl {
            running: Rc::downgrade(&self.running),
        }
    }

    /// Drive the subscriber on the calling thread until stopped.
    pub fn run(&mut self) {
        let Some(subscriber) = self.subscriber.as_mut() else {
            tracing::warn!("clock ticker has no subscriber, refusing to run");
            return;
        };
        self.running.set(true);
        tracing::debug!(interval = ?self.interval, "clock ticker running");

        let mut last = Instant::now();
        while self.running.get() {
            std::thread::sleep(self.interval);
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f64();
            last = now;
            subscriber(elapsed);
        }
        tracing::debug!("clock ticker stopped");
    }
}

impl FrameTicker for ClockTicker {
    fn is_running(&self) -> bool {
        self.running.get()
    }

    fn start(&mut self) {
        self.running.set(true);
    }

    fn stop(&mut self) {
        self.running.set(false);
    }

    fn set_subscriber(&mut self, subscriber: TickFn) {
        self.subscriber = Some(subscriber);
    }
}

/// Weak stop handle for a [`ClockTicker`].
///
/// Holding a control does not keep the ticker alive; once the ticker is
/// dropped, `stop` becomes a no-op and `is_running` reports false.
#[derive(Clone)]
pub struct TickerControl {
    running: Weak<Cell<bool>>,
}

impl TickerControl {
    /// Request that the ticker's run loop exit after the current tick.
    pub fn stop(&self) {
        if let Some(running) = self.running.upgrade() {
            running.set(false);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.upgrade().is_some_and(|running| running.get())
    }
}
