// Orientation resolution for preview media
// - Videos skip detection and are framed as landscape
// - Images are probed on a single background worker with latest-only coalescing
// - Every request carries a generation; work and results that fall behind the
//   newest generation are dropped
// - Successful probes are remembered in an LRU so revisited entries resolve
//   without a round-trip

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::media::probe::MediaProbe;
use crate::models::{MediaRef, MediaStatus, Orientation};

/// Identifies one selection request. Only the newest ticket may commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub generation: u64,
    pub entry_id: String,
}

/// Media ready to be promoted to the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub media: MediaRef,
    pub orientation: Orientation,
    pub status: MediaStatus,
}

impl Resolution {
    fn ready(media: MediaRef, orientation: Orientation) -> Self {
        Self {
            media,
            orientation,
            status: MediaStatus::Ready,
        }
    }

    /// Load failures still promote the media, framed as landscape.
    fn unavailable(media: MediaRef) -> Self {
        Self {
            media,
            orientation: Orientation::Landscape,
            status: MediaStatus::Unavailable,
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation.is_vertical()
    }
}

/// A resolution paired with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub ticket: ResolveTicket,
    pub resolution: Resolution,
}

struct ResolveRequest {
    ticket: ResolveTicket,
    media: MediaRef,
}

/// Probe plus cache, shared between the resolver and its worker.
struct ResolveCore {
    probe: Arc<dyn MediaProbe>,
    cache: Mutex<LruCache<String, Orientation>>,
}

impl ResolveCore {
    fn cached(&self, media: &MediaRef) -> Option<Resolution> {
        if media.is_video() {
            return Some(Resolution::ready(media.clone(), Orientation::Landscape));
        }
        let orientation = *self.cache.lock().get(&media.url)?;
        Some(Resolution::ready(media.clone(), orientation))
    }

    fn resolve(&self, media: &MediaRef) -> Resolution {
        if let Some(resolution) = self.cached(media) {
            return resolution;
        }
        match self.probe.dimensions(media) {
            Ok((width, height)) => {
                let orientation = Orientation::from_dimensions(width, height);
                self.cache.lock().put(media.url.clone(), orientation);
                trace!(url = %media.url, width, height, ?orientation, "Resolved media orientation");
                Resolution::ready(media.clone(), orientation)
            }
            Err(err) => {
                warn!(url = %media.url, error = %err, "Media unavailable, framing as landscape");
                Resolution::unavailable(media.clone())
            }
        }
    }
}

/// Resolves preview orientation off the event thread.
///
/// Results arrive on [`next`](Self::next) / [`try_next`](Self::try_next) and
/// must still be checked against the current selection before committing;
/// the worker only drops work it can already tell is stale.
pub struct OrientationResolver {
    core: Arc<ResolveCore>,
    latest_generation: Arc<AtomicU64>,
    request_tx: Option<flume::Sender<ResolveRequest>>,
    result_tx: async_channel::Sender<ResolvedMedia>,
    result_rx: async_channel::Receiver<ResolvedMedia>,
    worker: Option<JoinHandle<()>>,
}

impl OrientationResolver {
    pub fn new(probe: Arc<dyn MediaProbe>, cache_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(cache_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        let core = Arc::new(ResolveCore {
            probe,
            cache: Mutex::new(LruCache::new(capacity)),
        });
        let latest_generation = Arc::new(AtomicU64::new(0));
        let (result_tx, result_rx) = async_channel::unbounded::<ResolvedMedia>();
        let (request_tx, request_rx) = flume::unbounded::<ResolveRequest>();

        let worker = {
            let core = Arc::clone(&core);
            let generation = Arc::clone(&latest_generation);
            let results = result_tx.clone();
            thread::Builder::new()
                .name("orientation-worker".into())
                .spawn(move || worker_loop(request_rx, results, generation, core))
        };

        let (request_tx, worker) = match worker {
            Ok(handle) => (Some(request_tx), Some(handle)),
            Err(err) => {
                warn!(error = %err, "Failed to spawn orientation worker, resolving inline");
                (None, None)
            }
        };

        Self {
            core,
            latest_generation,
            request_tx,
            result_tx,
            result_rx,
            worker,
        }
    }

    /// Resolution available without probing: videos and cached images.
    pub fn cached(&self, media: &MediaRef) -> Option<Resolution> {
        self.core.cached(media)
    }

    /// Resolves on the calling thread.
    pub fn resolve_now(&self, media: &MediaRef) -> Resolution {
        self.core.resolve(media)
    }

    /// Queues `media` for resolution under `ticket`, superseding every older
    /// ticket.
    pub fn submit(&self, ticket: ResolveTicket, media: MediaRef) {
        self.supersede(ticket.generation);
        debug!(generation = ticket.generation, entry = %ticket.entry_id, url = %media.url, "Resolving media");

        let request = ResolveRequest { ticket, media };
        let request = match &self.request_tx {
            Some(tx) => match tx.send(request) {
                Ok(()) => return,
                Err(flume::SendError(request)) => {
                    warn!("Orientation worker gone, resolving inline");
                    request
                }
            },
            None => request,
        };

        let resolution = self.core.resolve(&request.media);
        let _ = self.result_tx.try_send(ResolvedMedia {
            ticket: request.ticket,
            resolution,
        });
    }

    /// Marks every ticket older than `generation` as stale.
    pub fn supersede(&self, generation: u64) {
        self.latest_generation.fetch_max(generation, Ordering::AcqRel);
    }

    pub fn try_next(&self) -> Option<ResolvedMedia> {
        self.result_rx.try_recv().ok()
    }

    /// Waits for the next resolution. `None` once the resolver is shut down.
    pub async fn next(&self) -> Option<ResolvedMedia> {
        self.result_rx.recv().await.ok()
    }

    /// Handle on the result stream that can be awaited without borrowing
    /// the resolver.
    pub fn results(&self) -> async_channel::Receiver<ResolvedMedia> {
        self.result_rx.clone()
    }
}

impl Drop for OrientationResolver {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.request_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Orientation worker panicked");
            }
        }
    }
}

fn worker_loop(
    requests: flume::Receiver<ResolveRequest>,
    results: async_channel::Sender<ResolvedMedia>,
    latest_generation: Arc<AtomicU64>,
    core: Arc<ResolveCore>,
) {
    while let Ok(mut request) = requests.recv() {
        // Only the newest queued request matters.
        while let Ok(next) = requests.try_recv() {
            request = next;
        }

        let generation = request.ticket.generation;
        if generation != latest_generation.load(Ordering::Acquire) {
            trace!(generation, "Skipping stale resolution request");
            continue;
        }

        let resolution = core.resolve(&request.media);

        if generation != latest_generation.load(Ordering::Acquire) {
            trace!(generation, "Dropping resolution superseded while probing");
            continue;
        }

        if results
            .send_blocking(ResolvedMedia {
                ticket: request.ticket,
                resolution,
            })
            .is_err()
        {
            break;
        }
    }
    debug!("Orientation worker stopped");
}
