//! Featured carousel: slide index, autoplay timer and preload gate

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::{AssetLoader, MediaSource};
use crate::config::GalleryConfig;
use crate::models::FeaturedImage;

/// Shortest timer period accepted; tokio intervals reject zero
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Slide state without any timers attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselViewState {
    items: Vec<FeaturedImage>,
    current_index: usize,
    is_playing: bool,
    is_loaded: bool,
}

impl CarouselViewState {
    /// Starts playing; an empty carousel counts as loaded
    pub fn new(items: Vec<FeaturedImage>) -> Self {
        let is_loaded = items.is_empty();
        Self {
            items,
            current_index: 0,
            is_playing: true,
            is_loaded,
        }
    }

    pub fn items(&self) -> &[FeaturedImage] {
        &self.items
    }

    /// Index of the visible slide; `None` for an empty carousel
    pub fn current_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&FeaturedImage> {
        self.items.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn can_navigate(&self) -> bool {
        self.items.len() > 1
    }

    /// Whether an autoplay timer should be running
    pub fn wants_autoplay(&self) -> bool {
        self.is_playing && self.can_navigate()
    }

    pub fn next(&mut self) {
        if self.can_navigate() {
            self.current_index = (self.current_index + 1) % self.items.len();
        }
    }

    pub fn previous(&mut self) {
        if self.can_navigate() {
            let len = self.items.len();
            self.current_index = (self.current_index + len - 1) % len;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        if self.can_navigate() && index < self.items.len() {
            self.current_index = index;
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Swap in a new slide list; loading restarts unless the list is empty
    pub fn replace_items(&mut self, items: Vec<FeaturedImage>) {
        self.items = items;
        if self.current_index >= self.items.len() {
            self.current_index = 0;
        }
        self.is_loaded = self.items.is_empty();
    }

    pub fn mark_loaded(&mut self) {
        self.is_loaded = true;
    }
}

struct Shared {
    view: CarouselViewState,
    mounted: bool,
    autoplay_epoch: u64,
    preload_epoch: u64,
}

/// Drives a [`CarouselViewState`] with an autoplay timer and a preload gate.
///
/// Each timer task carries the epoch it was started under and only mutates
/// the view while that epoch is current and the carousel is mounted.
pub struct CarouselController<L: AssetLoader> {
    shared: Arc<Mutex<Shared>>,
    loader: Arc<L>,
    autoplay_interval: Duration,
    preload_timeout: Duration,
    autoplay: Option<JoinHandle<()>>,
    preload: Option<JoinHandle<()>>,
}

impl<L: AssetLoader> CarouselController<L> {
    /// Mount with the given slides. Must be called inside a tokio runtime.
    pub fn mount(
        items: Vec<FeaturedImage>,
        loader: Arc<L>,
        autoplay_interval: Duration,
        preload_timeout: Duration,
    ) -> Self {
        let mut controller = Self {
            shared: Arc::new(Mutex::new(Shared {
                view: CarouselViewState::new(Vec::new()),
                mounted: true,
                autoplay_epoch: 0,
                preload_epoch: 0,
            })),
            loader,
            autoplay_interval: autoplay_interval.max(MIN_PERIOD),
            preload_timeout,
            autoplay: None,
            preload: None,
        };
        controller.set_items(items);
        controller
    }

    pub fn from_config(items: Vec<FeaturedImage>, loader: Arc<L>, config: &GalleryConfig) -> Self {
        Self::mount(items, loader, config.autoplay_interval(), config.preload_timeout())
    }

    /// Replace the slides, restarting the preload gate and the autoplay timer
    pub fn set_items(&mut self, items: Vec<FeaturedImage>) {
        let paths: Vec<String> = items.iter().map(|item| item.path.clone()).collect();
        self.shared.lock().view.replace_items(items);
        self.start_preload(paths);
        self.stop_autoplay();
        self.sync_autoplay();
    }

    pub fn next(&self) {
        self.shared.lock().view.next();
    }

    pub fn previous(&self) {
        self.shared.lock().view.previous();
    }

    pub fn go_to(&self, index: usize) {
        self.shared.lock().view.go_to(index);
    }

    pub fn toggle_autoplay(&mut self) {
        {
            let mut guard = self.shared.lock();
            let playing = guard.view.is_playing();
            guard.view.set_playing(!playing);
        }
        self.sync_autoplay();
    }

    pub fn pause(&mut self) {
        self.shared.lock().view.set_playing(false);
        self.sync_autoplay();
    }

    pub fn resume(&mut self) {
        self.shared.lock().view.set_playing(true);
        self.sync_autoplay();
    }

    pub fn snapshot(&self) -> CarouselViewState {
        self.shared.lock().view.clone()
    }

    /// Whether an autoplay timer is currently pending
    pub fn autoplay_scheduled(&self) -> bool {
        self.autoplay.is_some()
    }

    /// Cancel every timer and wait for the tasks to stop
    pub async fn teardown(mut self) {
        self.shared.lock().mounted = false;
        for task in [self.autoplay.take(), self.preload.take()].into_iter().flatten() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Carousel task failed: {}", e);
                }
            }
        }
    }

    fn sync_autoplay(&mut self) {
        let wants = self.shared.lock().view.wants_autoplay();
        if wants && self.autoplay.is_none() {
            self.start_autoplay();
        } else if !wants {
            self.stop_autoplay();
        }
    }

    fn start_autoplay(&mut self) {
        let epoch = {
            let mut guard = self.shared.lock();
            guard.autoplay_epoch += 1;
            guard.autoplay_epoch
        };
        let shared = Arc::clone(&self.shared);
        let period = self.autoplay_interval;

        self.autoplay = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                {
                    let mut guard = shared.lock();
                    if !guard.mounted || guard.autoplay_epoch != epoch {
                        return;
                    }
                    guard.view.next();
                }
            }
        }));
    }

    fn stop_autoplay(&mut self) {
        self.shared.lock().autoplay_epoch += 1;
        if let Some(task) = self.autoplay.take() {
            task.abort();
        }
    }

    fn start_preload(&mut self, paths: Vec<String>) {
        if let Some(task) = self.preload.take() {
            task.abort();
        }
        let epoch = {
            let mut guard = self.shared.lock();
            guard.preload_epoch += 1;
            guard.preload_epoch
        };
        if paths.is_empty() {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let loader = Arc::clone(&self.loader);
        let ceiling = self.preload_timeout;

        self.preload = Some(tokio::spawn(async move {
            let attempts = async move {
                let mut set = JoinSet::new();
                for path in paths {
                    let loader = Arc::clone(&loader);
                    set.spawn(async move {
                        let outcome = loader.preload(&path).await;
                        (path, outcome)
                    });
                }
                while let Some(joined) = set.join_next().await {
                    if let Ok((path, Err(e))) = joined {
                        log::debug!("Preload failed for {}: {}", path, e);
                    }
                }
            };

            if tokio::time::timeout(ceiling, attempts).await.is_err() {
                log::debug!("Preload ceiling of {:?} reached", ceiling);
            }

            let mut guard = shared.lock();
            if guard.mounted && guard.preload_epoch == epoch {
                guard.view.mark_loaded();
            }
        }));
    }
}

impl<L: AssetLoader> Drop for CarouselController<L> {
    fn drop(&mut self) {
        self.shared.lock().mounted = false;
        for task in [self.autoplay.take(), self.preload.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

/// Slides for the featured carousel; `fallback` when the listing is empty or unavailable
pub async fn load_featured_slides<S: MediaSource>(
    source: &S,
    fallback: &[FeaturedImage],
) -> Vec<FeaturedImage> {
    match source.fetch_featured().await {
        Ok(response) if !response.featured_images.is_empty() => response.featured_images,
        Ok(_) => fallback.to_vec(),
        Err(e) => {
            log::warn!("Error fetching featured images: {}", e);
            fallback.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::poll::tests::{listing, ScriptedSource};
    use std::future::Future;

    const AUTOPLAY: Duration = Duration::from_secs(5);
    const CEILING: Duration = Duration::from_secs(5);

    #[derive(Clone, Copy)]
    enum Loader {
        Instant,
        Broken,
        Hanging,
    }

    impl AssetLoader for Loader {
        fn preload(&self, _path: &str) -> impl Future<Output = Result<(), FetchError>> + Send {
            let mode = *self;
            async move {
                match mode {
                    Loader::Instant => Ok(()),
                    Loader::Broken => Err(FetchError::Status(404)),
                    Loader::Hanging => std::future::pending().await,
                }
            }
        }
    }

    fn slides(n: usize) -> Vec<FeaturedImage> {
        (0..n)
            .map(|i| FeaturedImage {
                path: format!("/photos/{}.jpg", i),
                caption: format!("Slide {}", i),
            })
            .collect()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[test]
    fn test_manual_navigation() {
        let mut view = CarouselViewState::new(slides(3));
        view.previous();
        assert_eq!(view.current_index(), Some(2));
        view.next();
        assert_eq!(view.current_index(), Some(0));
        view.go_to(1);
        assert_eq!(view.current_index(), Some(1));
        view.go_to(7);
        assert_eq!(view.current_index(), Some(1));
    }

    #[test]
    fn test_navigation_noop_for_single_slide() {
        let mut view = CarouselViewState::new(slides(1));
        view.next();
        view.previous();
        view.go_to(0);
        assert_eq!(view.current_index(), Some(0));
        assert!(!view.wants_autoplay());

        let empty = CarouselViewState::new(Vec::new());
        assert_eq!(empty.current_index(), None);
        assert!(empty.current().is_none());
        assert!(empty.is_loaded());
    }

    #[test]
    fn test_replace_items_clamps_index() {
        let mut view = CarouselViewState::new(slides(5));
        view.go_to(4);
        view.replace_items(slides(2));
        assert_eq!(view.current_index(), Some(0));
        assert!(!view.is_loaded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_advances_and_wraps() {
        let carousel = CarouselController::mount(slides(3), Arc::new(Loader::Instant), AUTOPLAY, CEILING);
        assert!(carousel.autoplay_scheduled());

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(carousel.snapshot().current_index(), Some(1));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(carousel.snapshot().current_index(), Some(0));

        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_and_resume_restarts_fresh() {
        let mut carousel = CarouselController::mount(slides(3), Arc::new(Loader::Instant), AUTOPLAY, CEILING);
        tokio::time::sleep(Duration::from_secs(4)).await;

        carousel.toggle_autoplay();
        assert!(!carousel.snapshot().is_playing());
        assert!(!carousel.autoplay_scheduled());
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(carousel.snapshot().current_index(), Some(0));

        carousel.resume();
        assert!(carousel.autoplay_scheduled());
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(carousel.snapshot().current_index(), Some(0));
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(carousel.snapshot().current_index(), Some(1));

        carousel.pause();
        assert!(!carousel.autoplay_scheduled());
        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_slide_never_schedules_autoplay() {
        let mut carousel = CarouselController::mount(slides(1), Arc::new(Loader::Instant), AUTOPLAY, CEILING);
        assert!(!carousel.autoplay_scheduled());
        carousel.toggle_autoplay();
        carousel.toggle_autoplay();
        assert!(!carousel.autoplay_scheduled());

        carousel.set_items(Vec::new());
        assert!(!carousel.autoplay_scheduled());
        assert!(carousel.snapshot().is_loaded());

        carousel.set_items(slides(2));
        assert!(carousel.autoplay_scheduled());
        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_gate_opens_when_all_attempted() {
        let carousel = CarouselController::mount(slides(4), Arc::new(Loader::Broken), AUTOPLAY, CEILING);
        assert!(!carousel.snapshot().is_loaded());
        settle().await;
        assert!(carousel.snapshot().is_loaded());
        carousel.teardown().await;

        let carousel = CarouselController::mount(slides(4), Arc::new(Loader::Instant), AUTOPLAY, CEILING);
        settle().await;
        assert!(carousel.snapshot().is_loaded());
        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_gate_ceiling() {
        let carousel = CarouselController::mount(slides(2), Arc::new(Loader::Hanging), AUTOPLAY, CEILING);
        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(!carousel.snapshot().is_loaded());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(carousel.snapshot().is_loaded());
        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_items_restart_preload_gate() {
        let mut carousel = CarouselController::mount(slides(2), Arc::new(Loader::Hanging), AUTOPLAY, CEILING);
        tokio::time::sleep(Duration::from_secs(1)).await;
        carousel.set_items(slides(3));

        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert!(!carousel.snapshot().is_loaded());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(carousel.snapshot().is_loaded());
        carousel.teardown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_updates_after_teardown() {
        let carousel = CarouselController::mount(slides(3), Arc::new(Loader::Hanging), AUTOPLAY, CEILING);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let shared = Arc::clone(&carousel.shared);
        carousel.teardown().await;
        let before = shared.lock().view.clone();
        assert!(!before.is_loaded());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(shared.lock().view, before);
    }

    #[tokio::test]
    async fn test_featured_slides_fallback() {
        let fallback = slides(2);

        let source = ScriptedSource::new(vec![Ok(listing(3, 0))]);
        assert_eq!(load_featured_slides(&source, &fallback).await.len(), 3);

        let source = ScriptedSource::new(vec![Ok(listing(0, 0))]);
        assert_eq!(load_featured_slides(&source, &fallback).await, fallback);

        let source = ScriptedSource::new(vec![Err(500)]);
        assert_eq!(load_featured_slides(&source, &fallback).await, fallback);
    }
}
