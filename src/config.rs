//! Configuration for the gallery server and view controllers

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::featured::DEFAULT_FEATURED_LIMIT;
use crate::models::FeaturedImage;

/// Default number of photos per gallery page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;

/// Default gallery refresh interval (30 s)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Default carousel slide interval (5 s)
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5_000;

/// Default ceiling on the carousel loading state (5 s)
pub const DEFAULT_PRELOAD_TIMEOUT_MS: u64 = 5_000;

/// Default asset root, holding `photos/` and `videos/`
pub const DEFAULT_ASSET_ROOT: &str = "public";

/// Configuration for the gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Public asset root containing `photos/` and `videos/`
    pub asset_root: PathBuf,

    /// Address the HTTP server binds to
    pub bind: SocketAddr,

    /// Maximum number of images returned by `/api/featured`
    pub featured_limit: usize,

    /// Photos shown per gallery page
    pub items_per_page: usize,

    /// Gallery refresh interval in milliseconds
    pub poll_interval_ms: u64,

    /// Carousel slide interval in milliseconds
    pub autoplay_interval_ms: u64,

    /// Longest the carousel waits for preloads, in milliseconds
    pub preload_timeout_ms: u64,

    /// Slides shown when the featured listing is empty or unavailable
    pub fallback_slides: Vec<FeaturedImage>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            featured_limit: DEFAULT_FEATURED_LIMIT,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            autoplay_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            preload_timeout_ms: DEFAULT_PRELOAD_TIMEOUT_MS,
            fallback_slides: Vec::new(),
        }
    }
}

impl GalleryConfig {
    /// Create a config builder
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::new()
    }

    /// Load a JSON config file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    pub fn preload_timeout(&self) -> Duration {
        Duration::from_millis(self.preload_timeout_ms)
    }

    /// Page size, never zero
    pub fn effective_items_per_page(&self) -> usize {
        self.items_per_page.max(1)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for GalleryConfig
#[derive(Debug, Default)]
pub struct GalleryConfigBuilder {
    config: GalleryConfig,
}

impl GalleryConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config (e.g. one loaded from a file)
    pub fn from_config(config: GalleryConfig) -> Self {
        Self { config }
    }

    /// Set the asset root
    pub fn asset_root(mut self, root: PathBuf) -> Self {
        self.config.asset_root = root;
        self
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.config.bind = addr;
        self
    }

    /// Set the featured image limit
    pub fn featured_limit(mut self, limit: usize) -> Self {
        self.config.featured_limit = limit;
        self
    }

    /// Set the gallery page size
    pub fn items_per_page(mut self, n: usize) -> Self {
        self.config.items_per_page = n;
        self
    }

    /// Set the gallery refresh interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = millis(interval);
        self
    }

    /// Set the carousel slide interval
    pub fn autoplay_interval(mut self, interval: Duration) -> Self {
        self.config.autoplay_interval_ms = millis(interval);
        self
    }

    /// Set the preload ceiling
    pub fn preload_timeout(mut self, timeout: Duration) -> Self {
        self.config.preload_timeout_ms = millis(timeout);
        self
    }

    /// Add a fallback slide
    pub fn add_fallback_slide(mut self, path: impl Into<String>, caption: impl Into<String>) -> Self {
        self.config.fallback_slides.push(FeaturedImage {
            path: path.into(),
            caption: caption.into(),
        });
        self
    }

    /// Build the config
    pub fn build(self) -> GalleryConfig {
        self.config
    }
}
