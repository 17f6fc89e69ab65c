// Forecast playback - advances the hour offset on a fixed tick
use super::selector::HourOffset;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Scrubber over hour offsets 0..=72.
///
/// While playing, a single task sleeps one tick, advances the offset, and only
/// then schedules the next sleep, so at most one tick is ever pending. Stopping
/// aborts that task; dropping the playback stops it. No advance lands after
/// `stop` returns, even for a tick already in flight on another worker.
#[derive(Debug)]
pub struct Playback {
    tick: Duration,
    offset: Arc<watch::Sender<HourOffset>>,
    ticker: Option<Ticker>,
}

#[derive(Debug)]
struct Ticker {
    handle: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl Playback {
    pub fn new(tick: Duration, start: HourOffset) -> Self {
        let (offset, _) = watch::channel(start);
        Self {
            tick,
            offset: Arc::new(offset),
            ticker: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.ticker {
            Some(ticker) if !ticker.handle.is_finished() => PlaybackState::Playing,
            _ => PlaybackState::Stopped,
        }
    }

    pub fn offset(&self) -> HourOffset {
        *self.offset.borrow()
    }

    /// Receiver notified on every offset change.
    pub fn subscribe(&self) -> watch::Receiver<HourOffset> {
        self.offset.subscribe()
    }

    /// Jumps to `offset` without touching the play state.
    pub fn seek(&self, offset: HourOffset) {
        self.offset.send_replace(offset);
    }

    /// Must be called from within a tokio runtime. No-op while playing.
    pub fn start(&mut self) {
        if self.state() == PlaybackState::Playing {
            return;
        }

        let tick = self.tick;
        let offset = Arc::clone(&self.offset);
        let stopped = Arc::new(AtomicBool::new(false));
        let guard = Arc::clone(&stopped);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let advanced = offset.send_if_modified(|current| {
                    if guard.load(Ordering::Acquire) {
                        return false;
                    }
                    *current = current.next();
                    true
                });
                if !advanced {
                    break;
                }
                tracing::trace!("playback advanced to {:?}", *offset.borrow());
            }
        });
        self.ticker = Some(Ticker { handle, stopped });
        tracing::debug!("playback started at {:?}", self.offset());
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stopped.store(true, Ordering::Release);
            // Waits out an advance holding the channel lock
            self.offset.send_if_modified(|_| false);
            ticker.handle.abort();
            tracing::debug!("playback stopped at {:?}", self.offset());
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}
