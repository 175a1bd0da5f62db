//! Thumbnail fetch coordination.
//!
//! Every request bumps a generation counter, cancels the previous live fetch
//! and spawns a new extraction on the tokio blocking pool. Workers report back
//! over a channel; results are applied only from [`pump`] on the interaction
//! thread, and only if they carry the current generation. Cancellation is
//! best-effort: ordering is guaranteed by the generation check alone.
//!
//! [`pump`]: ThumbnailRequestCoordinator::pump

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use scrubline_core::{RationalTime, Result, ScrubError, SharedThumbnail, Thumbnail};
use scrubline_media::{FetchCancel, FrameExtractor, ThumbnailSize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub requested_time: RationalTime,
    pub generation: u64,
}

/// Whether a fetch is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Fetching {
        generation: u64,
        time: RationalTime,
    },
}

/// How a fetch settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Image applied.
    Delivered,
    /// Abandoned before producing an image.
    Cancelled,
    /// Finished after a newer request was issued; result discarded.
    SupersededDrop,
    /// The extractor reported an error; previous image kept.
    Failed,
}

/// Running totals of settled fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub requested: u64,
    pub delivered: u64,
    pub cancelled: u64,
    pub superseded: u64,
    pub failed: u64,
}

/// Read-only view of the applied thumbnail, cloneable to a renderer thread.
#[derive(Debug, Clone, Default)]
pub struct DisplayedThumbnail(Arc<Mutex<Option<SharedThumbnail>>>);

impl DisplayedThumbnail {
    pub fn get(&self) -> Option<SharedThumbnail> {
        self.0.lock().clone()
    }

    fn set(&self, thumbnail: SharedThumbnail) {
        *self.0.lock() = Some(thumbnail);
    }

    fn clear(&self) {
        *self.0.lock() = None;
    }
}

struct Completion {
    request: FetchRequest,
    result: Result<Thumbnail>,
}

struct LiveFetch {
    request: FetchRequest,
    cancel: FetchCancel,
    task: JoinHandle<()>,
}

/// Keeps at most one thumbnail fetch live per control.
pub struct ThumbnailRequestCoordinator {
    runtime: Handle,
    extractor: Arc<dyn FrameExtractor>,
    size: ThumbnailSize,
    generation: Arc<AtomicU64>,
    live: Option<LiveFetch>,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    displayed: DisplayedThumbnail,
    last_outcome: Option<FetchOutcome>,
    stats: FetchStats,
}

impl ThumbnailRequestCoordinator {
    /// Fetch through `extractor`, running extractions on `runtime`.
    pub fn new(
        runtime: Handle,
        extractor: Arc<dyn FrameExtractor>,
        size: ThumbnailSize,
    ) -> Self {
        let (completions_tx, completions_rx) = crossbeam_channel::unbounded();
        Self {
            runtime,
            extractor,
            size,
            generation: Arc::new(AtomicU64::new(0)),
            live: None,
            completions_tx,
            completions_rx,
            displayed: DisplayedThumbnail::default(),
            last_outcome: None,
            stats: FetchStats::default(),
        }
    }

    /// Swap the extractor, e.g. when a new asset is loaded.
    ///
    /// Cancels the live fetch and forgets the displayed image.
    pub fn set_extractor(&mut self, extractor: Arc<dyn FrameExtractor>) {
        self.cancel();
        self.displayed.clear();
        self.extractor = extractor;
    }

    /// Fetch a thumbnail for `time`, superseding any live fetch.
    pub fn request(&mut self, time: RationalTime) -> FetchRequest {
        self.abandon_live();

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let request = FetchRequest {
            requested_time: time,
            generation,
        };
        let cancel = FetchCancel::new();

        let current = Arc::clone(&self.generation);
        let extractor = Arc::clone(&self.extractor);
        let size = self.size;
        let worker_cancel = cancel.clone();
        let tx = self.completions_tx.clone();

        let task = self.runtime.spawn_blocking(move || {
            let result = if current.load(Ordering::Acquire) != generation {
                Err(ScrubError::Cancelled)
            } else {
                extractor.extract(time, size, &worker_cancel)
            };
            if tx.send(Completion { request, result }).is_err() {
                debug!(generation, "Coordinator gone, discarding thumbnail");
            }
        });

        debug!(generation, %time, "Requested thumbnail");
        self.stats.requested += 1;
        self.live = Some(LiveFetch {
            request,
            cancel,
            task,
        });
        request
    }

    /// Abandon the live fetch without issuing a new one.
    pub fn cancel(&mut self) {
        if self.abandon_live() {
            // Bump so a result that still arrives reads as stale.
            self.generation.fetch_add(1, Ordering::AcqRel);
            self.last_outcome = Some(FetchOutcome::Cancelled);
        }
    }

    /// Apply finished fetches. Call on the interaction thread.
    ///
    /// Returns the newly applied thumbnail, if any.
    pub fn pump(&mut self) -> Option<SharedThumbnail> {
        let mut applied = None;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if let (FetchOutcome::Delivered, Some(thumbnail)) = self.settle(completion) {
                applied = Some(thumbnail);
            }
        }
        applied
    }

    /// Block until the live fetch settles or `timeout` elapses.
    ///
    /// Returns how the current request settled, or `None` on timeout or when
    /// nothing was live.
    pub fn wait_for_delivery(&mut self, timeout: Duration) -> Option<FetchOutcome> {
        let deadline = Instant::now() + timeout;
        while let Some(live) = &self.live {
            let generation = live.request.generation;
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.completions_rx.recv_timeout(remaining) {
                Ok(completion) => {
                    let settled_generation = completion.request.generation;
                    let (outcome, _) = self.settle(completion);
                    if settled_generation == generation {
                        return Some(outcome);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    }

    /// Currently applied thumbnail.
    pub fn displayed(&self) -> Option<SharedThumbnail> {
        self.displayed.get()
    }

    /// Shareable handle to the applied thumbnail.
    pub fn displayed_handle(&self) -> DisplayedThumbnail {
        self.displayed.clone()
    }

    pub fn phase(&self) -> FetchPhase {
        match &self.live {
            Some(live) => FetchPhase::Fetching {
                generation: live.request.generation,
                time: live.request.requested_time,
            },
            None => FetchPhase::Idle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn last_outcome(&self) -> Option<FetchOutcome> {
        self.last_outcome
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Signal the live fetch to stop. Returns whether one was live.
    fn abandon_live(&mut self) -> bool {
        match self.live.take() {
            Some(live) => {
                live.cancel.cancel();
                // Only stops the task if the blocking pool has not started it.
                live.task.abort();
                self.stats.cancelled += 1;
                debug!(generation = live.request.generation, "Cancelled thumbnail fetch");
                true
            }
            None => false,
        }
    }

    fn settle(&mut self, completion: Completion) -> (FetchOutcome, Option<SharedThumbnail>) {
        let Completion { request, result } = completion;
        let current = self.generation.load(Ordering::Acquire);

        if request.generation != current {
            debug!(
                generation = request.generation,
                current, "Dropping superseded thumbnail"
            );
            self.stats.superseded += 1;
            return (FetchOutcome::SupersededDrop, None);
        }

        if self
            .live
            .as_ref()
            .is_some_and(|live| live.request.generation == request.generation)
        {
            self.live = None;
        }

        let (outcome, applied) = match result {
            Ok(thumbnail) => {
                let thumbnail: SharedThumbnail = Arc::new(thumbnail);
                self.displayed.set(Arc::clone(&thumbnail));
                self.stats.delivered += 1;
                (FetchOutcome::Delivered, Some(thumbnail))
            }
            Err(ScrubError::Cancelled) => (FetchOutcome::Cancelled, None),
            Err(e) => {
                warn!(
                    error = %e,
                    time = %request.requested_time,
                    "Thumbnail fetch failed, keeping previous image"
                );
                self.stats.failed += 1;
                (FetchOutcome::Failed, None)
            }
        };
        self.last_outcome = Some(outcome);
        (outcome, applied)
    }
}

impl Drop for ThumbnailRequestCoordinator {
    fn drop(&mut self) {
        self.abandon_live();
    }
}

impl std::fmt::Debug for ThumbnailRequestCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailRequestCoordinator")
            .field("generation", &self.generation())
            .field("phase", &self.phase())
            .field("last_outcome", &self.last_outcome)
            .field("stats", &self.stats)
            .finish()
    }
}
