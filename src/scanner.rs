//! Scanner module - lists a media directory and builds descriptors

use std::path::Path;
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::models::{MediaDescriptor, MediaDirectory, MediaFilter, MediaType, ScanResult};

/// Scan one allow-listed directory under `root`.
///
/// Never fails: a missing directory is the normal "no content yet" state and
/// yields an empty result, and any other filesystem error is logged and also
/// degrades to an empty result.
pub fn scan_directory(root: &Path, dir: MediaDirectory, filter: MediaFilter) -> ScanResult {
    match try_scan_directory(root, dir, filter) {
        Ok(files) => files,
        Err(e) if e.is_not_found() => {
            log::debug!("Media directory {} not present: {}", dir, e);
            Vec::new()
        }
        Err(e) => {
            log::error!("Error reading media directory {}: {}", dir, e);
            Vec::new()
        }
    }
}

/// Scan one allow-listed directory, surfacing the first error encountered
pub fn try_scan_directory(
    root: &Path,
    dir: MediaDirectory,
    filter: MediaFilter,
) -> Result<ScanResult, ScanError> {
    let full_path = root.join(dir.as_str());
    std::fs::metadata(&full_path)
        .map_err(|e| ScanError::from(e).with_path(full_path.clone()))?;

    let walker = WalkDir::new(&full_path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = match entry.file_name().to_str() {
            Some(name) => name,
            None => {
                let err = ScanError::invalid_name(entry.path().to_path_buf());
                log::warn!("Skipping entry: {}", err);
                continue;
            }
        };

        if let Some(descriptor) = process_file(name, dir, filter) {
            files.push(descriptor);
        }
    }

    log::debug!("Scanned {}: {} media files", dir, files.len());
    Ok(files)
}

/// Build a descriptor for a file name if its extension passes the filter
pub fn process_file(name: &str, dir: MediaDirectory, filter: MediaFilter) -> Option<MediaDescriptor> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if !filter.accepts(extension) {
        return None;
    }

    Some(MediaDescriptor {
        name: name.to_string(),
        path: dir.public_path(name),
        media_type: MediaType::from_extension(extension),
        caption: caption_from_filename(name),
    })
}

/// Derive a human caption from a file name.
///
/// Strips the extension, turns `-` and `_` into spaces, then uppercases the
/// first character of every whitespace-delimited word. Everything else is
/// left as-is.
pub fn caption_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    title_case(&stem.replace(['-', '_'], " "))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}
