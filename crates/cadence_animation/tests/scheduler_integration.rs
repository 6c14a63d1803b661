//! Integration tests for the scheduler driven through a tick source
//!
//! These tests verify that:
//! - A ticker's elapsed-time notifications drive the scheduler correctly
//! - The documented timing scenarios hold end to end (delay spanning,
//!   repeat wraparound, completion ordering)
//! - Re-entrant scheduling and cancellation work from inside callbacks
//!   while a real tick source is driving

use cadence_animation::{Animation, AnimationScheduler, Animator, Curve};
use cadence_ticker::{FrameTicker, ManualTicker};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Wire a scheduler into a manual ticker, already started.
fn ticker_for(scheduler: &AnimationScheduler) -> ManualTicker {
    let driver = scheduler.clone();
    let mut ticker = ManualTicker::new();
    ticker.set_subscriber(Box::new(move |elapsed| driver.advance(elapsed)));
    ticker.start();
    ticker
}

#[test]
fn test_quarter_second_ticks_sweep_linear_progress() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let values = Rc::new(RefCell::new(Vec::new()));
    let completions = Rc::new(Cell::new(0u32));

    let progress_log = values.clone();
    let completion_count = completions.clone();
    scheduler
        .schedule(
            Animation::new(1.0, move |t| progress_log.borrow_mut().push(t))
                .on_complete(move || completion_count.set(completion_count.get() + 1)),
        )
        .expect("valid request");

    for _ in 0..4 {
        ticker.tick(0.25);
    }

    assert_eq!(*values.borrow(), vec![0.25, 0.5, 0.75, 1.0]);
    assert_eq!(completions.get(), 1);
    assert_eq!(scheduler.active_count(), 0);
}

#[test]
fn test_one_tick_spans_delay_and_active_phase() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let values = Rc::new(RefCell::new(Vec::new()));
    let progress_log = values.clone();
    scheduler
        .schedule(Animation::new(1.0, move |t| progress_log.borrow_mut().push(t)).delay(0.5))
        .expect("valid request");

    ticker.tick(0.7);

    assert_eq!(values.borrow().len(), 1);
    assert!((values.borrow()[0] - 0.2).abs() < 1e-9);
}

#[test]
fn test_stalled_tick_replays_repeat_cycles() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let values = Rc::new(RefCell::new(Vec::new()));

    let progress_log = values.clone();
    scheduler
        .schedule(Animation::repeating(1.0, move |t| {
            progress_log.borrow_mut().push(t)
        }))
        .expect("valid request");

    // The host stalled for 2.5 seconds: two full cycles plus half of the
    // next arrive in a single notification.
    ticker.tick(2.5);

    assert_eq!(*values.borrow(), vec![1.0, 1.0, 0.5]);
    assert!(!scheduler.is_idle());
}

#[test]
fn test_progress_resets_downward_at_each_cycle_boundary() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let values = Rc::new(RefCell::new(Vec::new()));
    let progress_log = values.clone();
    scheduler
        .schedule(
            Animation::repeating(0.4, move |t| progress_log.borrow_mut().push(t))
                .curve(Curve::EaseInOut),
        )
        .expect("valid request");

    for _ in 0..20 {
        ticker.tick(0.1);
    }

    // Every drop in the sequence is a wrap back toward zero, and each cycle
    // starts below where the previous one ended.
    let recorded = values.borrow();
    let mut wraps = 0;
    for pair in recorded.windows(2) {
        if pair[1] < pair[0] {
            wraps += 1;
            assert!(pair[0] >= 1.0 - 1e-9);
        }
    }
    assert!(wraps >= 4);
}

#[test]
fn test_completion_chains_through_the_same_ticker() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let phases = Rc::new(RefCell::new(Vec::new()));

    let chain = scheduler.clone();
    let chain_log = phases.clone();
    let first_log = phases.clone();
    scheduler
        .schedule(
            Animation::new(0.5, move |t| first_log.borrow_mut().push(("in", t))).on_complete(
                move || {
                    let log = chain_log.clone();
                    chain
                        .schedule(Animation::new(0.5, move |t| {
                            log.borrow_mut().push(("out", t))
                        }))
                        .expect("valid follow-up");
                },
            ),
        )
        .expect("valid request");

    for _ in 0..4 {
        ticker.tick(0.25);
    }

    assert_eq!(
        *phases.borrow(),
        vec![("in", 0.5), ("in", 1.0), ("out", 0.5), ("out", 1.0)]
    );
    assert!(scheduler.is_idle());
}

#[test]
fn test_cancellation_from_a_callback_spares_other_tasks() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let survivor_values = Rc::new(RefCell::new(Vec::new()));
    let victim_values = Rc::new(RefCell::new(Vec::new()));
    let victim_slot = Rc::new(Cell::new(None));

    // First task cancels the victim as soon as its own progress passes the
    // halfway mark.
    let handle = scheduler.handle();
    let cancel_slot = victim_slot.clone();
    scheduler
        .schedule(Animation::new(1.0, move |t| {
            if t >= 0.5 {
                if let Some(id) = cancel_slot.get() {
                    handle.invalidate(id);
                }
            }
        }))
        .expect("valid request");

    let victim_log = victim_values.clone();
    let victim = scheduler
        .schedule(Animation::new(1.0, move |t| {
            victim_log.borrow_mut().push(t)
        }))
        .expect("valid request");
    victim_slot.set(Some(victim));

    let survivor_log = survivor_values.clone();
    scheduler
        .schedule(Animation::new(1.0, move |t| {
            survivor_log.borrow_mut().push(t)
        }))
        .expect("valid request");

    for _ in 0..4 {
        ticker.tick(0.25);
    }

    // The victim reported once (before the halfway mark) and then went
    // silent; the survivor ran its full course.
    assert_eq!(*victim_values.borrow(), vec![0.25]);
    assert_eq!(*survivor_values.borrow(), vec![0.25, 0.5, 0.75, 1.0]);
    assert!(scheduler.is_idle());
}

#[test]
fn test_overshooting_curve_reaches_callback_unclamped() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let peak = Rc::new(Cell::new(f64::MIN));
    let peak_track = peak.clone();
    scheduler
        .schedule(
            Animation::new(1.0, move |t| peak_track.set(peak_track.get().max(t)))
                .curve(Curve::CubicBezier(0.34, 1.56, 0.64, 1.0)),
        )
        .expect("valid request");

    for _ in 0..25 {
        ticker.tick(0.05);
    }

    assert!(peak.get() > 1.0);
    assert!(scheduler.is_idle());
}

#[test]
fn test_stopped_ticker_freezes_the_scheduler() {
    let scheduler = AnimationScheduler::new();
    let mut ticker = ticker_for(&scheduler);

    let values = Rc::new(RefCell::new(Vec::new()));
    let progress_log = values.clone();
    scheduler
        .schedule(Animation::new(1.0, move |t| progress_log.borrow_mut().push(t)))
        .expect("valid request");

    ticker.tick(0.25);
    ticker.stop();
    ticker.tick(0.25);
    ticker.tick(0.25);

    assert_eq!(*values.borrow(), vec![0.25]);
    assert_eq!(scheduler.active_count(), 1);

    ticker.start();
    ticker.tick(0.75);
    assert_eq!(values.borrow().last().copied(), Some(1.0));
    assert!(scheduler.is_idle());
}

#[test]
fn test_dropped_scheduler_turns_ticks_into_noops() {
    let scheduler = AnimationScheduler::new();
    let handle = scheduler.handle();

    let mut ticker = ManualTicker::new();
    let driver = handle.clone();
    ticker.set_subscriber(Box::new(move |elapsed| {
        if let Some(scheduler) = driver.upgrade() {
            scheduler.advance(elapsed);
        }
    }));
    ticker.start();

    scheduler
        .schedule(Animation::new(1.0, |_| {}))
        .expect("valid request");
    ticker.tick(0.25);

    drop(scheduler);
    assert!(!handle.is_alive());

    // The ticker keeps firing; the subscriber quietly does nothing.
    ticker.tick(0.25);
    ticker.tick(0.25);
}

#[test]
fn test_scheduler_is_usable_through_the_trait() {
    fn drive(animator: &dyn Animator, ticks: u32) {
        for _ in 0..ticks {
            animator.advance(0.25);
        }
    }

    let scheduler = AnimationScheduler::new();
    let completions = Rc::new(Cell::new(0u32));

    let completion_count = completions.clone();
    let animator: &dyn Animator = &scheduler;
    animator
        .schedule(
            Animation::new(0.5, |_| {})
                .on_complete(move || completion_count.set(completion_count.get() + 1)),
        )
        .expect("valid request");

    assert_eq!(animator.active_count(), 1);
    assert!(!animator.is_idle());

    drive(animator, 2);
    assert_eq!(completions.get(), 1);
    assert!(animator.is_idle());
}
