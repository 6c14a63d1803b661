//! Cadence Animation Scheduler
//!
//! Time-driven interpolation of a scalar parameter from 0 to 1:
//!
//! - **Curves**: linear, ease-in/out/in-out, CSS-style cubic beziers, and
//!   arbitrary custom shaping functions
//! - **Scheduling**: per-task delay, repeat-forever, progress and completion
//!   callbacks
//! - **Lock-step advance**: one external tick drives every active task in
//!   creation order, deterministically
//! - **Re-entrant**: callbacks may schedule and invalidate animations while
//!   a tick is being processed
//!
//! The scheduler owns no clock; a host forwards elapsed seconds once per
//! frame from whatever tick source it uses (see the `cadence_ticker`
//! crate).
//!
//! # Example
//!
//! ```
//! use cadence_animation::{Animation, AnimationScheduler, Curve};
//!
//! let scheduler = AnimationScheduler::new();
//! scheduler
//!     .schedule(
//!         Animation::new(0.5, |t| println!("progress {t:.2}"))
//!             .curve(Curve::EaseInOut)
//!             .on_complete(|| println!("done")),
//!     )
//!     .expect("valid request");
//!
//! // Driven by the host's frame loop:
//! scheduler.advance(1.0 / 60.0);
//! ```

pub mod animation;
pub mod curve;
pub mod scheduler;

pub use animation::{Animation, CompletionFn, ProgressFn, ScheduleError};
pub use curve::{Curve, CurveFn};
pub use scheduler::{AnimationId, AnimationScheduler, Animator, SchedulerHandle};
