use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::SessionId;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed second of the given session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub session: SessionId,
}

/// Background task sending a [`Tick`] every period until stopped.
///
/// The task only produces events; applying them to the session is left to whoever owns the
/// receiving end, see [`GameSession::apply_tick`](crate::GameSession::apply_tick). Must be
/// started from within a tokio runtime.
#[derive(Debug)]
pub struct SessionTimer {
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SessionTimer {
    pub fn start(session: SessionId, ticks: UnboundedSender<Tick>) -> Self {
        Self::with_period(session, ticks, TICK_PERIOD)
    }

    pub fn with_period(session: SessionId, ticks: UnboundedSender<Tick>, period: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let task_running = running.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                // stop() may have raced with this wakeup
                if !task_running.load(Ordering::Acquire) {
                    break;
                }
                if ticks.send(Tick { session }).is_err() {
                    log::debug!("Tick receiver for session {session} is gone, stopping timer");
                    break;
                }
            }
        });
        log::debug!("Timer started for session {session}");

        Self { running, task }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops ticking, returns whether this call was the one that stopped it.
    pub fn stop(&mut self) -> bool {
        if !self.running.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.task.abort();
        true
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
