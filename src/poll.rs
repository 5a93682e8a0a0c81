//! Fetch-on-mount plus periodic refresh for listing-backed views

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::MediaSource;
use crate::config::GalleryConfig;
use crate::error::FetchError;
use crate::gallery::{GalleryViewState, VideoGalleryState};
use crate::models::MediaListing;

/// A view whose content comes from `/api/media`
pub trait ListingView: Send + 'static {
    /// A fetch is about to start
    fn begin_fetch(&mut self);
    /// A fetch succeeded
    fn apply_listing(&mut self, listing: MediaListing);
    /// A fetch failed; the view keeps whatever it had
    fn apply_fetch_error(&mut self, error: &FetchError);
}

struct Mounted<V> {
    view: V,
    mounted: bool,
}

/// Owns a view and the recurring task that refreshes it.
///
/// The view is fetched immediately on mount and then every `interval`.
/// After [`teardown`](Self::teardown) returns, the refresh task has stopped
/// and can no longer touch the view.
pub struct PollingController<V: ListingView> {
    shared: Arc<Mutex<Mounted<V>>>,
    task: Option<JoinHandle<()>>,
}

pub type PhotoGalleryController = PollingController<GalleryViewState>;
pub type VideoGalleryController = PollingController<VideoGalleryState>;

impl<V: ListingView> PollingController<V> {
    /// Start refreshing `view` from `source`. Must be called inside a tokio runtime.
    pub fn mount<S: MediaSource>(view: V, source: Arc<S>, interval: Duration) -> Self {
        let shared = Arc::new(Mutex::new(Mounted { view, mounted: true }));
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(poll_loop(Arc::clone(&shared), source, interval));
        Self {
            shared,
            task: Some(task),
        }
    }

    /// Run a user interaction against the view
    pub fn update<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.shared.lock().view)
    }

    /// Copy of the current view state
    pub fn snapshot(&self) -> V
    where
        V: Clone,
    {
        self.shared.lock().view.clone()
    }

    /// Stop refreshing and wait for the refresh task to finish
    pub async fn teardown(mut self) {
        self.shared.lock().mounted = false;
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Refresh task failed: {}", e);
                }
            }
        }
    }
}

impl PhotoGalleryController {
    /// Photo gallery using the configured page size and refresh interval
    pub fn photos<S: MediaSource>(source: Arc<S>, config: &GalleryConfig) -> Self {
        Self::mount(
            GalleryViewState::new(config.effective_items_per_page()),
            source,
            config.poll_interval(),
        )
    }
}

impl VideoGalleryController {
    /// Video gallery using the configured refresh interval
    pub fn videos<S: MediaSource>(source: Arc<S>, config: &GalleryConfig) -> Self {
        Self::mount(VideoGalleryState::new(), source, config.poll_interval())
    }
}

impl<V: ListingView> Drop for PollingController<V> {
    fn drop(&mut self) {
        self.shared.lock().mounted = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop<V: ListingView, S: MediaSource>(
    shared: Arc<Mutex<Mounted<V>>>,
    source: Arc<S>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        {
            let mut guard = shared.lock();
            if !guard.mounted {
                return;
            }
            guard.view.begin_fetch();
        }

        let result = source.fetch_media().await;

        {
            let mut guard = shared.lock();
            if !guard.mounted {
                return;
            }
            match result {
                Ok(listing) => guard.view.apply_listing(listing),
                Err(e) => guard.view.apply_fetch_error(&e),
            }
        }
    }
}
