// Streaming playback service - Forecast frames driven by a playback ticker
use crate::application::snapshot_repository::SnapshotRepository;
use crate::domain::breakpoint::BreakpointTable;
use crate::domain::dashboard::PlaybackFrame;
use crate::domain::legend::LegendScale;
use crate::domain::playback::Playback;
use crate::domain::selector::HourOffset;
use crate::infrastructure::config::PlaybackSettings;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

const FRAME_BUFFER: usize = 16;

#[derive(Clone)]
pub struct StreamingPlaybackService {
    repository: Arc<dyn SnapshotRepository>,
    breakpoints: Arc<BreakpointTable>,
    legend: Arc<LegendScale>,
    settings: PlaybackSettings,
}

impl StreamingPlaybackService {
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        breakpoints: Arc<BreakpointTable>,
        legend: Arc<LegendScale>,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            repository,
            breakpoints,
            legend,
            settings,
        }
    }

    /// Requested frame count bounded to `1..=max_frames`
    pub fn frame_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.settings.default_frames)
            .clamp(1, self.settings.max_frames.max(1))
    }

    /// Starts a playback at `from` and streams one frame per offset.
    ///
    /// The first frame is the starting offset; each later frame follows one
    /// playback tick. The playback is held while the receiver has no room, so
    /// a slow reader sees every offset in order. Stops once `frames` frames
    /// were sent or the receiver is dropped. `Ok(None)` when the location is
    /// unknown.
    pub async fn stream_playback(
        &self,
        location: &str,
        from: HourOffset,
        frames: usize,
    ) -> anyhow::Result<Option<mpsc::Receiver<PlaybackFrame>>> {
        let Some(snapshot) = self.repository.get_snapshot(location).await? else {
            return Ok(None);
        };

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let breakpoints = self.breakpoints.clone();
        let legend = self.legend.clone();
        let tick = self.settings.tick();
        let location = location.to_string();

        tokio::spawn(async move {
            let start_time = Instant::now();
            let mut playback = Playback::new(tick, from);
            let mut offsets = playback.subscribe();
            let mut offset = from;

            let mut sent = 0;
            loop {
                let Ok(permit) = tx.reserve().await else {
                    break;
                };
                permit.send(PlaybackFrame::build(sent, &snapshot, &breakpoints, &legend, offset));
                sent += 1;
                if sent >= frames {
                    break;
                }

                // One tick per delivered frame
                offsets.mark_unchanged();
                playback.start();
                tokio::select! {
                    changed = offsets.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => break,
                }
                playback.stop();
                offset = offset.next();
                playback.seek(offset);
            }

            playback.stop();
            tracing::debug!(
                "playback for {} finished after {} frames in {} ms",
                location,
                sent,
                start_time.elapsed().as_millis()
            );
        });

        Ok(Some(rx))
    }
}
