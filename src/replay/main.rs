//! Replay command: pace synthesized request batches along the trace timeline

use anyhow::Result;
use rand::Rng;
use std::time::Duration;

use crate::dispatch::Dispatcher;
use crate::replay::{Pacer, ReplayConfig, RequestGenerator};
use crate::trace::TraceReader;

/// Trace time is in fractional days.
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    pub timesteps: usize,
    pub batches: usize,
    pub requests: usize,
    pub regular: usize,
    pub evictable: usize,
    pub skipped_zero_vcpu: usize,
    pub total_wait: Duration,
}

/// Load the trace named by `config` and replay it.
pub fn run<D, P, R>(
    config: &ReplayConfig,
    dispatcher: &mut D,
    pacer: &mut P,
    rng: &mut R,
) -> Result<ReplaySummary>
where
    D: Dispatcher + ?Sized,
    P: Pacer + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    tracing::info!(
        "Starting replay: trace={}, window=[{}, {}]",
        config.trace_file.display(),
        config.t_start,
        config.t_stop
    );

    let trace = TraceReader::new(&config.trace_file, config.t_start, config.t_stop)?;
    let generator = RequestGenerator::new(config.max_rq_cnt, config.max_lft, config.max_vcpu_cnt);
    replay(&trace, &generator, dispatcher, pacer, rng)
}

/// Replay an already loaded trace.
///
/// Each timestep's batch is dispatched before the wait that precedes the
/// next timestep. No wait follows the last timestep.
pub fn replay<D, P, R>(
    trace: &TraceReader,
    generator: &RequestGenerator,
    dispatcher: &mut D,
    pacer: &mut P,
    rng: &mut R,
) -> Result<ReplaySummary>
where
    D: Dispatcher + ?Sized,
    P: Pacer + ?Sized,
    R: Rng + ?Sized,
{
    let timestamps = trace.timestamps();
    let mut summary = ReplaySummary {
        timesteps: timestamps.len(),
        ..Default::default()
    };

    for (idx, &t) in timestamps.iter().enumerate() {
        let Some(row) = trace.row_at(t) else {
            continue;
        };

        let batch = generator.generate(row, rng)?;
        dispatcher.dispatch(&batch.requests)?;

        summary.batches += 1;
        summary.requests += batch.requests.len();
        summary.regular += batch.regular;
        summary.evictable += batch.evictable;
        summary.skipped_zero_vcpu += batch.skipped;

        // Nothing is printed or awaited after the last timestep.
        if let Some(&next) = timestamps.get(idx + 1) {
            let wait = wait_between(t, next)?;
            println!("{}", status_line(t, batch.requests.len(), wait));
            pacer.wait(wait);
            summary.total_wait += wait;
        }
    }

    tracing::info!(
        "Replay complete. {} batches, {} requests ({} regular, {} evictable, {} skipped)",
        summary.batches,
        summary.requests,
        summary.regular,
        summary.evictable,
        summary.skipped_zero_vcpu
    );

    Ok(summary)
}

/// Wall-clock time between two trace timestamps.
pub fn wait_between(current: f64, next: f64) -> Result<Duration> {
    let secs = (next - current) * SECONDS_PER_DAY;
    Duration::try_from_secs_f64(secs)
        .map_err(|e| anyhow::anyhow!("invalid wait between {} and {}: {}", current, next, e))
}

/// Progress line printed before waiting for the next timestep.
pub fn status_line(time: f64, requested: usize, wait: Duration) -> String {
    format!(
        "time: {} total requested: {} waiting for: {:.3}s",
        time,
        requested,
        wait.as_secs_f64()
    )
}
