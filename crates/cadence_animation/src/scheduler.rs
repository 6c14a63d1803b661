//! Animation scheduler
//!
//! Owns every in-flight animation task and advances them in lock-step with
//! an external tick source. One [`AnimationScheduler::advance`] call per
//! frame updates all tasks in creation order, delivering progress and
//! completion callbacks synchronously on the driving thread.
//!
//! The model is single-threaded and cooperative: there is no internal
//! thread or timer, and the only temporal input is the elapsed seconds the
//! host forwards per tick. Callbacks may schedule and invalidate animations
//! re-entrantly while a tick is being processed. Hosts that drive the
//! scheduler from multiple threads must provide their own mutual exclusion.

use crate::animation::{Animation, CompletionFn, ProgressFn, ScheduleError};
use crate::curve::Curve;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Opaque handle to a scheduled animation, never reused while the
    /// scheduler lives.
    pub struct AnimationId;
}

/// Capability contract for an animation scheduler.
///
/// Consumers depend on this trait rather than the concrete type so tests
/// can substitute doubles; [`AnimationScheduler`] is the one concrete
/// implementation.
pub trait Animator {
    /// Validate and register a request, returning its id. No callback fires
    /// synchronously; the first progress delivery happens on the next
    /// [`advance`](Animator::advance).
    fn schedule(&self, animation: Animation) -> Result<AnimationId, ScheduleError>;

    /// Cancel the task with the given id. Unknown and already-finished ids
    /// are ignored; no further callbacks fire for a cancelled task,
    /// including a pending completion.
    fn invalidate(&self, id: AnimationId);

    /// Advance every active task by the given elapsed seconds.
    fn advance(&self, elapsed: f64);

    /// Whether no unfinished tasks remain.
    fn is_idle(&self) -> bool;

    /// Number of unfinished tasks.
    fn active_count(&self) -> usize;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskState {
    /// Accumulating elapsed time; progress not yet reported.
    Delayed,
    /// Sweeping progress from 0 to 1.
    Active,
    /// One-shot cycle finished; completion delivered.
    Completed,
    /// Cancelled; callbacks suppressed.
    Invalidated,
}

impl TaskState {
    fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Invalidated)
    }
}

/// One in-flight interpolation request.
///
/// Callbacks are stored as options so they can be moved out while they run,
/// releasing the registry borrow for re-entrant scheduling.
struct AnimationTask {
    delay: f64,
    duration: f64,
    curve: Curve,
    repeating: bool,
    on_progress: Option<ProgressFn>,
    on_complete: Option<CompletionFn>,
    /// Wall-clock seconds accumulated since the task was scheduled.
    elapsed: f64,
    state: TaskState,
}

struct SchedulerInner {
    tasks: SlotMap<AnimationId, AnimationTask>,
    /// Creation order, so callback side effects are deterministic across
    /// runs regardless of slot reuse.
    order: Vec<AnimationId>,
    /// Set for the duration of an advance pass; defers purging and rejects
    /// nested advances.
    advancing: bool,
}

/// The animation scheduler.
///
/// Cheap to clone; clones share the same registry. Dropping the last clone
/// drops all tasks without firing their callbacks.
#[derive(Clone)]
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                tasks: SlotMap::with_key(),
                order: Vec::new(),
                advancing: false,
            })),
        }
    }

    /// Get a non-owning handle for passing to callbacks and collaborators.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Validate and register a request, returning its id.
    ///
    /// The task starts delayed when a positive delay was requested, active
    /// otherwise; either way its first progress delivery happens on the
    /// next [`advance`](AnimationScheduler::advance), never synchronously.
    pub fn schedule(&self, animation: Animation) -> Result<AnimationId, ScheduleError> {
        animation.validate()?;
        let Animation {
            duration,
            delay,
            curve,
            repeating,
            on_progress,
            on_complete,
        } = animation;

        let state = if delay > 0.0 {
            TaskState::Delayed
        } else {
            TaskState::Active
        };
        let mut inner = self.inner.borrow_mut();
        let id = inner.tasks.insert(AnimationTask {
            delay,
            duration,
            curve,
            repeating,
            on_progress: Some(on_progress),
            on_complete,
            elapsed: 0.0,
            state,
        });
        inner.order.push(id);
        tracing::debug!(?id, duration, delay, repeating, "animation scheduled");
        Ok(id)
    }

    /// Cancel the task with the given id.
    ///
    /// Unknown and stale ids are ignored: ids naturally go stale once a
    /// task finishes, and cancellation must not require the caller to track
    /// liveness. Safe to call from inside any callback, for the currently
    /// advancing task or any other.
    pub fn invalidate(&self, id: AnimationId) {
        let mut inner = self.inner.borrow_mut();
        let advancing = inner.advancing;
        let Some(task) = inner.tasks.get_mut(id) else {
            return;
        };
        if task.state.is_terminal() {
            return;
        }
        task.state = TaskState::Invalidated;
        tracing::debug!(?id, "animation invalidated");

        // Mid-pass the slot must survive until the pass-end purge so the
        // iteration order stays intact.
        if !advancing {
            inner.tasks.remove(id);
            inner.order.retain(|other| *other != id);
        }
    }

    /// Advance every active task by the given elapsed seconds, in creation
    /// order, then purge finished tasks.
    ///
    /// Tolerates arbitrarily large deltas (a stalled host catches up in one
    /// call, including across delay and repeat-cycle boundaries). Negative
    /// and non-finite deltas are ignored with a warning. Tasks scheduled by
    /// callbacks during the pass wait for the next call.
    pub fn advance(&self, elapsed: f64) {
        if !elapsed.is_finite() || elapsed < 0.0 {
            tracing::warn!(elapsed, "ignoring invalid tick delta");
            return;
        }
        if elapsed == 0.0 {
            return;
        }

        let pass_len = {
            let mut inner = self.inner.borrow_mut();
            if inner.advancing {
                tracing::warn!("advance called from inside a callback, ignoring");
                return;
            }
            inner.advancing = true;
            inner.order.len()
        };

        for index in 0..pass_len {
            let id = self.inner.borrow().order[index];
            self.advance_task(id, elapsed);
        }

        let mut inner = self.inner.borrow_mut();
        inner.advancing = false;
        let SchedulerInner { tasks, order, .. } = &mut *inner;
        let finished: SmallVec<[AnimationId; 8]> = order
            .iter()
            .copied()
            .filter(|id| tasks.get(*id).map_or(true, |task| task.state.is_terminal()))
            .collect();
        for id in finished {
            tasks.remove(id);
        }
        order.retain(|id| tasks.contains_key(*id));
    }

    /// Whether no unfinished tasks remain.
    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of unfinished tasks.
    pub fn active_count(&self) -> usize {
        self.inner
            .borrow()
            .tasks
            .values()
            .filter(|task| !task.state.is_terminal())
            .count()
    }

    fn advance_task(&self, id: AnimationId, elapsed: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(task) = inner.tasks.get_mut(id) else {
                return;
            };
            if task.state.is_terminal() {
                return;
            }
            task.elapsed += elapsed;
            if task.state == TaskState::Delayed {
                if task.elapsed < task.delay {
                    return;
                }
                // The excess beyond the delay already counts toward the
                // active phase: elapsed - delay carries straight over.
                task.state = TaskState::Active;
            }
        }

        // One iteration per emission; repeating tasks may wrap through
        // several cycles within a single tick.
        loop {
            // Move the curve and callback out of the task so both run with
            // the registry borrow released: either may touch the scheduler.
            let (t, curve, mut callback) = {
                let mut inner = self.inner.borrow_mut();
                let Some(task) = inner.tasks.get_mut(id) else {
                    return;
                };
                let t = ((task.elapsed - task.delay) / task.duration).min(1.0);
                (t, std::mem::take(&mut task.curve), task.on_progress.take())
            };
            let cycle_done = t >= 1.0;
            let value = curve.apply(t);

            if let Some(on_progress) = callback.as_mut() {
                on_progress(value);
            }
            if let Some(task) = self.inner.borrow_mut().tasks.get_mut(id) {
                task.curve = curve;
                task.on_progress = callback;
            }

            let mut inner = self.inner.borrow_mut();
            let Some(task) = inner.tasks.get_mut(id) else {
                return;
            };
            if task.state == TaskState::Invalidated {
                // The callback cancelled its own task; suppress everything
                // further, including a pending completion.
                return;
            }
            if !cycle_done {
                return;
            }
            if task.repeating {
                // Wrap, carrying the overshoot into the new cycle rather
                // than resetting to exactly zero.
                task.elapsed -= task.duration;
                continue;
            }

            task.state = TaskState::Completed;
            let completion = task.on_complete.take();
            drop(inner);
            if let Some(on_complete) = completion {
                on_complete();
            }
            return;
        }
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator for AnimationScheduler {
    fn schedule(&self, animation: Animation) -> Result<AnimationId, ScheduleError> {
        AnimationScheduler::schedule(self, animation)
    }

    fn invalidate(&self, id: AnimationId) {
        AnimationScheduler::invalidate(self, id);
    }

    fn advance(&self, elapsed: f64) {
        AnimationScheduler::advance(self, elapsed);
    }

    fn is_idle(&self) -> bool {
        AnimationScheduler::is_idle(self)
    }

    fn active_count(&self) -> usize {
        AnimationScheduler::active_count(self)
    }
}

/// A non-owning handle to a scheduler.
///
/// Callbacks capture this (or a scheduler clone) to chain and cancel
/// animations without extending the registry's lifetime. Once the last
/// scheduler clone is dropped, operations become no-ops.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Recover a scheduler, if it is still alive.
    pub fn upgrade(&self) -> Option<AnimationScheduler> {
        self.inner
            .upgrade()
            .map(|inner| AnimationScheduler { inner })
    }

    /// Cancel a task; no-op when the scheduler is gone.
    pub fn invalidate(&self, id: AnimationId) {
        if let Some(scheduler) = self.upgrade() {
            scheduler.invalidate(id);
        }
    }

    /// Whether the scheduler is still alive.
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
