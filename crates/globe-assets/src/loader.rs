//! Background texture loading: fetch and decode on a small thread pool,
//! results collected on the main thread once per frame.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::channel::TextureChannel;
use crate::raster::TextureImage;
use crate::source::TextureSource;

/// Outcome of a single texture request.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(TextureImage),
    /// Human-readable failure reason.
    Failed(String),
}

/// A completed texture request, tagged with the channel it was issued for.
#[derive(Debug)]
pub struct LoadResult {
    pub channel: TextureChannel,
    /// The URL or path that was requested.
    pub location: String,
    pub outcome: LoadOutcome,
}

impl LoadResult {
    pub fn loaded(channel: TextureChannel, image: TextureImage) -> Self {
        Self {
            channel,
            location: image.label.clone(),
            outcome: LoadOutcome::Loaded(image),
        }
    }

    pub fn failed(
        channel: TextureChannel,
        location: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            location: location.into(),
            outcome: LoadOutcome::Failed(reason.into()),
        }
    }
}

struct LoadRequest {
    channel: TextureChannel,
    location: String,
}

/// Texture loader backed by a thread pool.
///
/// Requests are fire-and-forget: no retry, no cancellation. Every accepted
/// request produces exactly one [`LoadResult`], retrieved with
/// [`drain_results`](Self::drain_results), even if the source panics.
///
/// Dropping the loader closes the request queue and detaches the workers;
/// a fetch still blocked on the network finishes on its own and its result
/// is discarded. [`shutdown`](Self::shutdown) waits for them instead.
pub struct TextureLoader {
    request_sender: Option<crossbeam_channel::Sender<LoadRequest>>,
    result_receiver: crossbeam_channel::Receiver<LoadResult>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl TextureLoader {
    /// Spawn `worker_count` (at least one) named loader threads sharing `source`.
    pub fn new(worker_count: usize, source: Arc<dyn TextureSource>) -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<LoadRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let mut handles = Vec::with_capacity(worker_count.max(1));
        for i in 0..worker_count.max(1) {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let source = Arc::clone(&source);

            let spawned = std::thread::Builder::new()
                .name(format!("texture-loader-{i}"))
                .spawn(move || {
                    while let Ok(request) = rx.recv() {
                        let result = load_guarded(source.as_ref(), request);
                        if tx.send(result).is_err() {
                            break;
                        }
                    }
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::error!("failed to spawn texture loader thread: {e}"),
            }
        }

        tracing::debug!(workers = handles.len(), "texture loader started");

        Self {
            request_sender: Some(request_tx),
            result_receiver: result_rx,
            worker_handles: handles,
        }
    }

    /// Queue a fetch. Returns `false` if the loader has been shut down or has
    /// no live workers.
    pub fn request(&self, channel: TextureChannel, location: &str) -> bool {
        let Some(sender) = &self.request_sender else {
            return false;
        };
        if self.worker_handles.is_empty() {
            return false;
        }
        tracing::debug!(%channel, location, "texture requested");
        sender
            .send(LoadRequest {
                channel,
                location: location.to_string(),
            })
            .is_ok()
    }

    /// Drain all completed results. Called once per frame on the main thread.
    pub fn drain_results(&self) -> Vec<LoadResult> {
        self.result_receiver.try_iter().collect()
    }

    /// Stop accepting requests and join the workers. Requests still queued
    /// are processed before the workers exit.
    pub fn shutdown(&mut self) {
        self.request_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        self.request_sender.take();
        let detached = self.worker_handles.drain(..).count();
        tracing::debug!(workers = detached, "texture loader detached");
    }
}

/// Runs [`load_one`], turning a panic in the source or decoder into a
/// failed result so the channel still settles.
fn load_guarded(source: &dyn TextureSource, request: LoadRequest) -> LoadResult {
    let (channel, location) = (request.channel, request.location.clone());
    panic::catch_unwind(AssertUnwindSafe(|| load_one(source, request))).unwrap_or_else(|_| {
        tracing::error!(%channel, %location, "texture loader panicked");
        LoadResult::failed(channel, location, "loader panicked")
    })
}

fn load_one(source: &dyn TextureSource, request: LoadRequest) -> LoadResult {
    let LoadRequest { channel, location } = request;
    let image = source
        .fetch(&location)
        .and_then(|bytes| TextureImage::decode(location.as_str(), &bytes))
        .map(TextureImage::with_mips);

    match image {
        Ok(image) => {
            tracing::debug!(
                %channel,
                width = image.width(),
                height = image.height(),
                levels = image.level_count(),
                "texture decoded"
            );
            LoadResult::loaded(channel, image)
        }
        Err(e) => LoadResult::failed(channel, location, e.to_string()),
    }
}
