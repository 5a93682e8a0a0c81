//! HTTP surface: the two listing endpoints plus the static asset routes

use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::config::GalleryConfig;
use crate::error::ServeError;
use crate::listing::ListingService;
use crate::models::{FeaturedResponse, MediaDirectory, MediaListing};

/// All gallery routes.
///
/// `GET /api/featured` and `GET /api/media` always answer 200 with a
/// possibly-empty payload. `/photos/*` and `/videos/*` serve the files the
/// descriptors point at.
pub fn routes(
    service: Arc<ListingService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api = warp::path("api");

    let featured = api
        .and(warp::path("featured"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service(Arc::clone(&service)))
        .and_then(handle_featured);

    let media = api
        .and(warp::path("media"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_service(Arc::clone(&service)))
        .and_then(handle_media);

    let photos = asset_route(&service, MediaDirectory::Photos);
    let videos = asset_route(&service, MediaDirectory::Videos);

    featured
        .or(media)
        .or(photos)
        .or(videos)
        .with(warp::log("media_gallery::http"))
}

fn asset_route(
    service: &ListingService,
    dir: MediaDirectory,
) -> impl Filter<Extract = (warp::fs::File,), Error = Rejection> + Clone {
    warp::path(dir.as_str())
        .and(warp::get())
        .and(warp::fs::dir(service.asset_root().join(dir.as_str())))
}

fn with_service(
    service: Arc<ListingService>,
) -> impl Filter<Extract = (Arc<ListingService>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&service))
}

async fn handle_featured(service: Arc<ListingService>) -> Result<impl Reply, Infallible> {
    let response = match tokio::task::spawn_blocking(move || service.featured()).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Featured listing task failed: {}", e);
            FeaturedResponse::default()
        }
    };
    Ok(warp::reply::json(&response))
}

async fn handle_media(service: Arc<ListingService>) -> Result<impl Reply, Infallible> {
    let listing = match tokio::task::spawn_blocking(move || service.media()).await {
        Ok(listing) => listing,
        Err(e) => {
            log::error!("Media listing task failed: {}", e);
            MediaListing::default()
        }
    };
    Ok(warp::reply::json(&listing))
}

/// Bind and run the server until Ctrl-C
pub async fn serve(config: &GalleryConfig) -> Result<(), ServeError> {
    let service = Arc::new(ListingService::new(
        config.asset_root.clone(),
        config.featured_limit,
    ));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let (addr, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(config.bind, shutdown)
        .map_err(|e| ServeError {
            addr: config.bind,
            message: e.to_string(),
        })?;

    log::info!("Serving gallery from {:?} on http://{}", config.asset_root, addr);
    server.await;
    log::info!("Server stopped");
    Ok(())
}
