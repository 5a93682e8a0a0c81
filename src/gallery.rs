//! Photo and video gallery view state
//!
//! These are plain state machines: every transition is a method call that
//! runs to completion. Timers and network fetches live in
//! [`crate::poll::PollingController`], which drives them through the
//! [`ListingView`] trait.

use crate::error::FetchError;
use crate::models::{MediaDescriptor, MediaListing, ScanResult};
use crate::pagination::{self, PageButton};
use crate::poll::ListingView;

const PHOTOS_ERROR: &str = "Failed to load photos. Please try again later.";
const VIDEOS_ERROR: &str = "Failed to load videos. Please try again later.";

/// Keyboard input relevant to the viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

impl Key {
    /// Map a DOM-style key name; other keys are not handled
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// What a gallery should render right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    /// No fetch has completed yet
    Loading,
    /// Fetching failed and nothing was ever loaded
    Error,
    /// Loaded, but the directory holds no media
    Empty,
    /// Items available (possibly stale, see `error()`)
    Ready,
}

/// Fetch bookkeeping shared by both galleries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FetchStatus {
    loading: bool,
    fetched_once: bool,
    error: Option<&'static str>,
}

impl FetchStatus {
    fn begin(&mut self) {
        self.loading = true;
    }

    fn succeed(&mut self) {
        self.loading = false;
        self.fetched_once = true;
        self.error = None;
    }

    fn fail(&mut self, message: &'static str) {
        self.loading = false;
        self.fetched_once = true;
        self.error = Some(message);
    }

    fn phase(&self, has_items: bool) -> ViewPhase {
        if has_items {
            ViewPhase::Ready
        } else if !self.fetched_once {
            ViewPhase::Loading
        } else if self.error.is_some() {
            ViewPhase::Error
        } else {
            ViewPhase::Empty
        }
    }
}

/// Paginated photo grid with a lightbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryViewState {
    items: ScanResult,
    current_page: usize,
    items_per_page: usize,
    selected_index: Option<usize>,
    status: FetchStatus,
}

impl GalleryViewState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
            selected_index: None,
            status: FetchStatus::default(),
        }
    }

    pub fn with_items(items: ScanResult, items_per_page: usize) -> Self {
        let mut state = Self::new(items_per_page);
        state.set_items(items);
        state
    }

    pub fn items(&self) -> &[MediaDescriptor] {
        &self.items
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn is_loading(&self) -> bool {
        self.status.loading
    }

    /// Inline error message from the most recent failed fetch
    pub fn error(&self) -> Option<&str> {
        self.status.error
    }

    pub fn phase(&self) -> ViewPhase {
        self.status.phase(!self.items.is_empty())
    }

    /// Replace the item list, keeping page and selection valid
    pub fn set_items(&mut self, items: ScanResult) {
        self.items = items;
        self.current_page = self.current_page.clamp(1, self.total_pages().max(1));
        if self.selected_index.is_some_and(|i| i >= self.items.len()) {
            self.selected_index = None;
        }
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.items.len(), self.items_per_page)
    }

    /// Items on the current page
    pub fn visible_items(&self) -> &[MediaDescriptor] {
        &self.items[pagination::page_range(self.current_page, self.items_per_page, self.items.len())]
    }

    pub fn shows_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn page_buttons(&self) -> Vec<PageButton> {
        pagination::page_buttons(self.current_page, self.total_pages())
    }

    /// Jump to a 1-based page, clamped to the valid range
    pub fn paginate(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn previous_page(&mut self) {
        if self.has_previous_page() {
            self.current_page -= 1;
        }
    }

    pub fn next_page(&mut self) {
        if self.has_next_page() {
            self.current_page += 1;
        }
    }

    /// Open the lightbox on the `relative`-th item of the visible page.
    ///
    /// The selection is stored as an index into the full item list.
    pub fn open_lightbox(&mut self, relative: usize) -> bool {
        let range = pagination::page_range(self.current_page, self.items_per_page, self.items.len());
        let absolute = range.start + relative;
        if absolute >= range.end {
            return false;
        }
        self.selected_index = Some(absolute);
        true
    }

    pub fn close_lightbox(&mut self) {
        self.selected_index = None;
    }

    /// Step forward through the full list, wrapping to the first item
    pub fn next(&mut self) {
        let len = self.items.len();
        if let Some(i) = self.selected_index {
            self.selected_index = Some((i + 1) % len);
        }
    }

    /// Step backward through the full list, wrapping to the last item
    pub fn previous(&mut self) {
        let len = self.items.len();
        if let Some(i) = self.selected_index {
            self.selected_index = Some((i + len - 1) % len);
        }
    }

    /// Apply a key press to the open lightbox; returns whether it was handled
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.selected_index.is_none() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.close_lightbox(),
        }
        true
    }

    pub fn selected(&self) -> Option<&MediaDescriptor> {
        self.selected_index.and_then(|i| self.items.get(i))
    }

    /// 1-based position and total, for the "3 of 30" label
    pub fn lightbox_position(&self) -> Option<(usize, usize)> {
        self.selected_index.map(|i| (i + 1, self.items.len()))
    }
}

impl ListingView for GalleryViewState {
    fn begin_fetch(&mut self) {
        self.status.begin();
    }

    fn apply_listing(&mut self, listing: MediaListing) {
        self.set_items(listing.photos);
        self.status.succeed();
    }

    fn apply_fetch_error(&mut self, error: &FetchError) {
        log::warn!("Error fetching photos: {}", error);
        self.status.fail(PHOTOS_ERROR);
    }
}

/// Video grid with a modal player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoGalleryState {
    items: ScanResult,
    selected_index: Option<usize>,
    status: FetchStatus,
}

impl VideoGalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[MediaDescriptor] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn is_loading(&self) -> bool {
        self.status.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error
    }

    pub fn phase(&self) -> ViewPhase {
        self.status.phase(!self.items.is_empty())
    }

    pub fn set_items(&mut self, items: ScanResult) {
        self.items = items;
        if self.selected_index.is_some_and(|i| i >= self.items.len()) {
            self.selected_index = None;
        }
    }

    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.selected_index = Some(index);
        true
    }

    pub fn close(&mut self) {
        self.selected_index = None;
    }

    /// Escape closes the player; other keys are ignored
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.selected_index.is_some() && key == Key::Escape {
            self.close();
            return true;
        }
        false
    }

    pub fn selected(&self) -> Option<&MediaDescriptor> {
        self.selected_index.and_then(|i| self.items.get(i))
    }
}

impl ListingView for VideoGalleryState {
    fn begin_fetch(&mut self) {
        self.status.begin();
    }

    fn apply_listing(&mut self, listing: MediaListing) {
        self.set_items(listing.videos);
        self.status.succeed();
    }

    fn apply_fetch_error(&mut self, error: &FetchError) {
        log::warn!("Error fetching videos: {}", error);
        self.status.fail(VIDEOS_ERROR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use proptest::prelude::*;

    fn photos(n: usize) -> ScanResult {
        (0..n)
            .map(|i| MediaDescriptor {
                name: format!("p{}.jpg", i),
                path: format!("/photos/p{}.jpg", i),
                media_type: MediaType::Image,
                caption: format!("P{}", i),
            })
            .collect()
    }

    #[test]
    fn test_pagination_thirty_items() {
        let mut state = GalleryViewState::with_items(photos(30), 12);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.visible_items(), &state.items()[0..12]);

        state.paginate(3);
        assert_eq!(state.visible_items().len(), 6);
        assert_eq!(state.visible_items()[0].name, "p24.jpg");

        state.paginate(99);
        assert_eq!(state.current_page(), 3);
        state.paginate(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_page_stepping_stops_at_bounds() {
        let mut state = GalleryViewState::with_items(photos(30), 12);
        state.previous_page();
        assert_eq!(state.current_page(), 1);
        state.next_page();
        state.next_page();
        state.next_page();
        assert_eq!(state.current_page(), 3);
        assert!(!state.has_next_page());
        assert!(state.has_previous_page());
    }

    #[test]
    fn test_lightbox_uses_absolute_index() {
        let mut state = GalleryViewState::with_items(photos(30), 12);
        state.paginate(2);
        assert!(state.open_lightbox(3));
        assert_eq!(state.selected_index(), Some(15));
        assert_eq!(state.selected().unwrap().name, "p15.jpg");
        assert_eq!(state.lightbox_position(), Some((16, 30)));

        state.paginate(3);
        assert!(!state.open_lightbox(6));
    }

    #[test]
    fn test_lightbox_navigates_beyond_page() {
        let mut state = GalleryViewState::with_items(photos(30), 12);
        assert!(state.open_lightbox(11));
        state.next();
        assert_eq!(state.selected_index(), Some(12));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_lightbox_wraps() {
        let mut state = GalleryViewState::with_items(photos(5), 12);
        state.open_lightbox(4);
        state.next();
        assert_eq!(state.selected_index(), Some(0));
        state.previous();
        assert_eq!(state.selected_index(), Some(4));
    }

    #[test]
    fn test_keyboard_bindings() {
        let mut state = GalleryViewState::with_items(photos(3), 12);
        assert!(!state.handle_key(Key::ArrowRight));

        state.open_lightbox(0);
        assert!(state.handle_key(Key::ArrowLeft));
        assert_eq!(state.selected_index(), Some(2));
        assert!(state.handle_key(Key::ArrowRight));
        assert_eq!(state.selected_index(), Some(0));
        assert!(state.handle_key(Key::Escape));
        assert_eq!(state.selected_index(), None);

        assert_eq!(Key::from_name("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_name("Enter"), None);
    }

    #[test]
    fn test_refresh_reconciles_page_and_selection() {
        let mut state = GalleryViewState::with_items(photos(30), 12);
        state.paginate(3);
        state.open_lightbox(5);
        assert_eq!(state.selected_index(), Some(29));

        state.set_items(photos(10));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.selected_index(), None);
    }

    #[test]
    fn test_stale_items_survive_fetch_failure() {
        let mut state = GalleryViewState::new(12);
        assert_eq!(state.phase(), ViewPhase::Loading);

        state.begin_fetch();
        state.apply_listing(MediaListing {
            photos: photos(2),
            videos: Vec::new(),
        });
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert!(state.error().is_none());

        state.begin_fetch();
        assert!(state.is_loading());
        state.apply_fetch_error(&FetchError::Status(500));
        assert!(!state.is_loading());
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert_eq!(state.error(), Some(PHOTOS_ERROR));

        state.apply_listing(MediaListing::default());
        assert!(state.error().is_none());
        assert_eq!(state.phase(), ViewPhase::Empty);
    }

    #[test]
    fn test_first_fetch_failure_is_error_phase() {
        let mut state = GalleryViewState::new(12);
        state.begin_fetch();
        state.apply_fetch_error(&FetchError::Status(503));
        assert_eq!(state.phase(), ViewPhase::Error);
    }

    #[test]
    fn test_video_gallery() {
        let mut state = VideoGalleryState::new();
        state.apply_listing(MediaListing {
            photos: photos(4),
            videos: photos(2),
        });
        assert_eq!(state.items().len(), 2);
        assert!(!state.open(2));
        assert!(state.open(1));
        assert!(!state.handle_key(Key::ArrowRight));
        assert!(state.handle_key(Key::Escape));
        assert!(state.selected().is_none());

        state.open(1);
        state.set_items(photos(1));
        assert_eq!(state.selected_index(), None);
    }

    proptest! {
        #[test]
        fn prop_lightbox_wrap(len in 1usize..60, start in 0usize..60) {
            let start = start % len;
            let mut state = GalleryViewState::with_items(photos(len), len);
            prop_assert!(state.open_lightbox(start));

            state.next();
            prop_assert_eq!(state.selected_index(), Some((start + 1) % len));
            state.previous();
            state.previous();
            prop_assert_eq!(state.selected_index(), Some((start + len - 1) % len));
        }
    }
}
