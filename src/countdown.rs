use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time remaining until `target`, as `"{d}d {h}h {m}min {s}sec"`.
///
/// Past targets yield negative components.
pub fn tick(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_remaining((target - now).num_milliseconds())
}

/// Each component is floored after taking a truncating remainder of the
/// next-larger unit, so negative deltas floor every component downwards.
pub fn format_remaining(delta_ms: i64) -> String {
    let days = delta_ms.div_euclid(MS_PER_DAY);
    let hours = (delta_ms % MS_PER_DAY).div_euclid(MS_PER_HOUR);
    let minutes = (delta_ms % MS_PER_HOUR).div_euclid(MS_PER_MINUTE);
    let seconds = (delta_ms % MS_PER_MINUTE).div_euclid(MS_PER_SECOND);
    format!("{}d {}h {}min {}sec", days, hours, minutes, seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    pub target: DateTime<Utc>,
    pub interval: Duration,
    pub clamp_at_zero: bool,
}

impl CountdownConfig {
    pub fn label_at(&self, now: DateTime<Utc>) -> String {
        if self.clamp_at_zero && now > self.target {
            return format_remaining(0);
        }
        tick(self.target, now)
    }
}

/// Latest countdown label. `None` until the first tick has fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerState {
    pub label: Option<String>,
}

pub struct Countdown;

impl Countdown {
    /// Start ticking every `config.interval`, posting `Action::CountdownTick`
    /// tagged with `generation`.
    ///
    /// The first label arrives after one full interval. Ticking stops when the
    /// returned handle is stopped or dropped, but ticks already queued stay in
    /// the channel; receivers compare the generation against the live handle.
    pub fn start(
        config: CountdownConfig,
        generation: u64,
        tx: mpsc::UnboundedSender<Action>,
    ) -> CountdownHandle {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let label = config.label_at(Utc::now());
                        if tx.send(Action::CountdownTick { generation, label }).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!(generation, "countdown stopped");
        });

        CountdownHandle {
            generation,
            cancel,
            task,
        }
    }
}

/// Owns the ticking task. Dropping it cancels the countdown.
pub struct CountdownHandle {
    generation: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl std::fmt::Debug for CountdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownHandle")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
