//! Client-side fetch boundary
//!
//! View controllers never see raw HTTP or untyped JSON. They talk to a
//! [`MediaSource`] for listings and an [`AssetLoader`] for preloads; the
//! HTTP implementations here validate every response body against the
//! payload types and turn anything malformed into a [`FetchError`].

use serde::de::DeserializeOwned;
use std::future::Future;

use crate::error::FetchError;
use crate::models::{FeaturedResponse, MediaListing};

/// Listing endpoint for photos and videos
pub const MEDIA_ENDPOINT: &str = "/api/media";

/// Listing endpoint for featured images
pub const FEATURED_ENDPOINT: &str = "/api/featured";

/// Where view controllers get their listings from
pub trait MediaSource: Send + Sync + 'static {
    fn fetch_media(&self) -> impl Future<Output = Result<MediaListing, FetchError>> + Send;

    fn fetch_featured(&self) -> impl Future<Output = Result<FeaturedResponse, FetchError>> + Send;
}

/// Loads the asset behind a public path; success or failure both count as "attempted"
pub trait AssetLoader: Send + Sync + 'static {
    fn preload(&self, path: &str) -> impl Future<Output = Result<(), FetchError>> + Send;
}

/// Decode a `/api/media` body
pub fn decode_media_listing(body: &[u8]) -> Result<MediaListing, FetchError> {
    decode(body)
}

/// Decode a `/api/featured` body
pub fn decode_featured(body: &[u8]) -> Result<FeaturedResponse, FetchError> {
    decode(body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

/// Fetches listings from a running gallery server
#[derive(Debug, Clone)]
pub struct HttpMediaSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMediaSource {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, endpoint: &str) -> Result<Vec<u8>, FetchError> {
        get_bytes(&self.client, &format!("{}{}", self.base_url, endpoint)).await
    }
}

impl MediaSource for HttpMediaSource {
    fn fetch_media(&self) -> impl Future<Output = Result<MediaListing, FetchError>> + Send {
        async move { decode_media_listing(&self.get(MEDIA_ENDPOINT).await?) }
    }

    fn fetch_featured(&self) -> impl Future<Output = Result<FeaturedResponse, FetchError>> + Send {
        async move { decode_featured(&self.get(FEATURED_ENDPOINT).await?) }
    }
}

/// Preloads assets by downloading them from the gallery server
#[derive(Debug, Clone)]
pub struct HttpAssetLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAssetLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }
}

impl AssetLoader for HttpAssetLoader {
    fn preload(&self, path: &str) -> impl Future<Output = Result<(), FetchError>> + Send {
        let url = self.url_for(path);
        let client = self.client.clone();
        async move {
            get_bytes(&client, &url).await?;
            Ok(())
        }
    }
}

async fn get_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    #[test]
    fn test_decode_valid_listing() {
        let body = br#"{
            "photos": [{"name": "a.jpg", "path": "/photos/a.jpg", "type": "image", "caption": "A"}],
            "videos": []
        }"#;
        let listing = decode_media_listing(body).unwrap();
        assert_eq!(listing.photos.len(), 1);
        assert_eq!(listing.photos[0].media_type, MediaType::Image);
        assert!(listing.videos.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_listing() {
        assert!(matches!(
            decode_media_listing(b"<html>502</html>"),
            Err(FetchError::Malformed(_))
        ));
        // missing `videos`
        assert!(matches!(
            decode_media_listing(br#"{"photos": []}"#),
            Err(FetchError::Malformed(_))
        ));
        // unknown media type
        assert!(matches!(
            decode_media_listing(
                br#"{"photos": [{"name": "a", "path": "/a", "type": "gif", "caption": "A"}], "videos": []}"#
            ),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_featured() {
        let featured =
            decode_featured(br#"{"featuredImages": [{"path": "/photos/a.jpg", "caption": "A"}]}"#)
                .unwrap();
        assert_eq!(featured.featured_images.len(), 1);
        assert!(decode_featured(br#"{"images": []}"#).is_err());
    }

    #[test]
    fn test_asset_url() {
        let loader = HttpAssetLoader::new("http://localhost:3000/");
        assert_eq!(
            loader.url_for("/photos/a.jpg"),
            "http://localhost:3000/photos/a.jpg"
        );
        assert_eq!(
            loader.url_for("https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }
}
