//! Photo and video gallery with filesystem-backed media discovery
//!
//! The server side scans `photos/` and `videos/` under an asset root and
//! exposes them as JSON listings. The client side holds the presentation
//! state machines (paginated gallery with lightbox, video gallery, autoplaying
//! carousel) together with the timers that drive them.

pub mod carousel;
pub mod client;
pub mod config;
pub mod error;
pub mod featured;
pub mod gallery;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod poll;
pub mod scanner;
pub mod server;

pub use carousel::{load_featured_slides, CarouselController, CarouselViewState};
pub use client::{AssetLoader, HttpAssetLoader, HttpMediaSource, MediaSource};
pub use config::GalleryConfig;
pub use error::{ConfigError, FetchError, ScanError, ScanErrorKind, ServeError};
pub use featured::sample_featured;
pub use gallery::{GalleryViewState, Key, VideoGalleryState, ViewPhase};
pub use listing::ListingService;
pub use models::{
    FeaturedImage, FeaturedResponse, MediaDescriptor, MediaDirectory, MediaFilter, MediaListing,
    MediaType, ScanResult,
};
pub use pagination::PageButton;
pub use poll::{ListingView, PhotoGalleryController, PollingController, VideoGalleryController};
pub use scanner::{caption_from_filename, scan_directory};
