//! Pulse Demo
//!
//! Drives an animation scheduler from a wall-clock ticker:
//! - a delayed fade-in reported as an eased percentage
//! - a completion callback that chains a fade-out
//! - a repeating pulse that keeps cycling until the fade-out finishes
//!
//! Run with: cargo run -p cadence_animation --example pulse_demo

use anyhow::Result;
use cadence_animation::{Animation, AnimationScheduler, Curve};
use cadence_ticker::{ClockTicker, FrameTicker};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let scheduler = AnimationScheduler::new();
    let mut ticker = ClockTicker::new(30);
    let control = ticker.control();

    let pulse = scheduler.schedule(
        Animation::repeating(0.4, |t| {
            tracing::info!(phase = %format_args!("{t:.2}"), "pulse");
        })
        .curve(Curve::EaseInOut),
    )?;

    let chain = scheduler.clone();
    scheduler.schedule(
        Animation::new(1.2, |t| {
            tracing::info!(opacity = %format_args!("{:3.0}%", t * 100.0), "fade in");
        })
        .delay(0.3)
        .curve(Curve::EaseOut)
        .on_complete(move || {
            tracing::info!("fade in finished, chaining fade out");
            let finish = chain.clone();
            let result = chain.schedule(
                Animation::new(0.8, |t| {
                    tracing::info!(opacity = %format_args!("{:3.0}%", (1.0 - t) * 100.0), "fade out");
                })
                .curve(Curve::EaseIn)
                .on_complete(move || {
                    finish.invalidate(pulse);
                    control.stop();
                }),
            );
            if let Err(error) = result {
                tracing::error!(%error, "failed to chain fade out");
            }
        }),
    )?;

    let driver = scheduler.clone();
    ticker.set_subscriber(Box::new(move |elapsed| driver.advance(elapsed)));
    ticker.run();

    tracing::info!(active = scheduler.active_count(), "ticker stopped");
    Ok(())
}
