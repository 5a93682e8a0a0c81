//! Featured image sampling

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

use crate::models::{FeaturedImage, MediaDirectory, MediaFilter, ScanResult};
use crate::scanner::scan_directory;

/// Default number of featured images
pub const DEFAULT_FEATURED_LIMIT: usize = 4;

/// Pick up to `limit` items from `pool`.
///
/// A pool no larger than `limit` is returned whole, in scan order. A larger
/// pool is shuffled and the first `limit` items are kept.
pub fn sample_featured<R: Rng + ?Sized>(mut pool: ScanResult, limit: usize, rng: &mut R) -> ScanResult {
    if pool.len() <= limit {
        return pool;
    }
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}

/// Scan the photo directory and sample featured images from it
pub fn featured_images<R: Rng + ?Sized>(root: &Path, limit: usize, rng: &mut R) -> Vec<FeaturedImage> {
    let pool = scan_directory(root, MediaDirectory::Photos, MediaFilter::Images);
    log::debug!("Sampling {} featured images from {}", limit.min(pool.len()), pool.len());
    sample_featured(pool, limit, rng)
        .into_iter()
        .map(FeaturedImage::from)
        .collect()
}
