//! Listing service: aggregates directory scans into API payloads

use std::path::{Path, PathBuf};

use crate::featured::featured_images;
use crate::models::{FeaturedResponse, MediaDirectory, MediaFilter, MediaListing};
use crate::scanner::scan_directory;

/// Produces the `/api/media` and `/api/featured` payloads from an asset root.
///
/// Every call rescans the filesystem; nothing is cached.
#[derive(Debug, Clone)]
pub struct ListingService {
    asset_root: PathBuf,
    featured_limit: usize,
}

impl ListingService {
    pub fn new(asset_root: impl Into<PathBuf>, featured_limit: usize) -> Self {
        Self {
            asset_root: asset_root.into(),
            featured_limit,
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Scan photos and videos independently; either may be empty
    pub fn media(&self) -> MediaListing {
        MediaListing {
            photos: scan_directory(&self.asset_root, MediaDirectory::Photos, MediaFilter::AllMedia),
            videos: scan_directory(&self.asset_root, MediaDirectory::Videos, MediaFilter::AllMedia),
        }
    }

    /// Random selection of photos, bounded by the featured limit
    pub fn featured(&self) -> FeaturedResponse {
        FeaturedResponse {
            featured_images: featured_images(
                &self.asset_root,
                self.featured_limit,
                &mut rand::thread_rng(),
            ),
        }
    }
}
