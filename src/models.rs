//! Core data models for the media gallery

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Image extensions recognized by the scanner (lowercase, without dot)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Video extensions recognized by the scanner (lowercase, without dot)
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Bytes escaped in a file name used as a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Media type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image files (jpg, png, webp, etc.)
    Image,
    /// Video files (mp4, webm, mov)
    Video,
    /// Extension outside the recognized sets
    Unknown,
}

impl MediaType {
    /// Infer media type from file extension
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.to_lowercase();
        match ext_lower.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => MediaType::Image,
            "mp4" | "webm" | "mov" => MediaType::Video,
            _ => MediaType::Unknown,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extension filter applied during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFilter {
    /// Images only (featured sampling)
    Images,
    /// Images and videos (unified listing)
    AllMedia,
}

impl MediaFilter {
    /// Check if an extension passes this filter (case-insensitive)
    pub fn accepts(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        let is_image = IMAGE_EXTENSIONS.contains(&ext.as_str());
        match self {
            MediaFilter::Images => is_image,
            MediaFilter::AllMedia => is_image || VIDEO_EXTENSIONS.contains(&ext.as_str()),
        }
    }
}

/// The fixed set of scannable subdirectories under the asset root.
///
/// Directory names never come from user input directly; anything that is
/// not one of these variants is rejected, so a scan cannot leave the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaDirectory {
    Photos,
    Videos,
}

impl MediaDirectory {
    /// Directory name under the asset root, also the public URL prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaDirectory::Photos => "photos",
            MediaDirectory::Videos => "videos",
        }
    }

    /// Public URL for a file in this directory, with the name percent-encoded
    pub fn public_path(&self, file_name: &str) -> String {
        format!(
            "/{}/{}",
            self.as_str(),
            utf8_percent_encode(file_name, PATH_SEGMENT)
        )
    }
}

impl FromStr for MediaDirectory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photos" => Ok(MediaDirectory::Photos),
            "videos" => Ok(MediaDirectory::Videos),
            other => Err(format!("unknown media directory: {:?}", other)),
        }
    }
}

impl std::fmt::Display for MediaDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized record describing one media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// File name including extension
    pub name: String,
    /// Public URL (`/photos/<name>` or `/videos/<name>`)
    pub path: String,
    /// Classification from the extension
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Human caption derived from the file name
    pub caption: String,
}

/// Ordered descriptors from one scan, in filesystem listing order
pub type ScanResult = Vec<MediaDescriptor>;

/// Featured image as exposed by `/api/featured`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub path: String,
    pub caption: String,
}

impl From<MediaDescriptor> for FeaturedImage {
    fn from(descriptor: MediaDescriptor) -> Self {
        Self {
            path: descriptor.path,
            caption: descriptor.caption,
        }
    }
}

/// Body of `GET /api/featured`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedResponse {
    #[serde(rename = "featuredImages")]
    pub featured_images: Vec<FeaturedImage>,
}

/// Body of `GET /api/media`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaListing {
    pub photos: ScanResult,
    pub videos: ScanResult,
}
