//! Media Gallery CLI
//!
//! Serves the gallery listings and assets, or prints a one-off scan.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::net::SocketAddr;
use std::path::PathBuf;

use media_gallery::config::GalleryConfigBuilder;
use media_gallery::{server, GalleryConfig, ListingService};

const ABOUT: &str = r#"
Media Gallery - photo and video gallery server

Examples:
  media_gallery serve                            Serve ./public on 127.0.0.1:3000
  media_gallery serve -r /srv/site -b 0.0.0.0:80 Serve another asset root
  media_gallery serve -c gallery.json            Load settings from a JSON file
  media_gallery scan -r /srv/site --json         Print the /api/media payload
"#;

/// Photo and video gallery server
#[derive(Parser)]
#[command(name = "media_gallery")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the listing API and the media files
    Serve {
        /// Asset root holding photos/ and videos/
        #[arg(short = 'r', long)]
        root: Option<PathBuf>,

        /// Address to bind
        #[arg(short = 'b', long)]
        bind: Option<SocketAddr>,

        /// Number of images returned by /api/featured
        #[arg(short = 'f', long)]
        featured_limit: Option<usize>,

        /// JSON config file; flags override its values
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
    /// Scan the asset root once and print the result
    Scan {
        /// Asset root holding photos/ and videos/
        #[arg(short = 'r', long, default_value = "public")]
        root: PathBuf,

        /// Print the JSON payload instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            root,
            bind,
            featured_limit,
            config,
        }) => {
            let base = match config {
                Some(path) => match GalleryConfig::from_json_file(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        error!("{}", e);
                        std::process::exit(1);
                    }
                },
                None => GalleryConfig::default(),
            };

            let mut builder = GalleryConfigBuilder::from_config(base);
            if let Some(root) = root {
                builder = builder.asset_root(root);
            }
            if let Some(bind) = bind {
                builder = builder.bind(bind);
            }
            if let Some(limit) = featured_limit {
                builder = builder.featured_limit(limit);
            }
            let config = builder.build();

            info!("Asset root: {:?}", config.asset_root);
            info!("Featured limit: {}", config.featured_limit);

            if let Err(e) = server::serve(&config).await {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Scan { root, json }) => {
            let listing = ListingService::new(root, 0).media();

            if json {
                match serde_json::to_string_pretty(&listing) {
                    Ok(out) => println!("{}", out),
                    Err(e) => {
                        error!("Cannot encode listing: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("Scan completed:");
                println!("  Photos: {}", listing.photos.len());
                println!("  Videos: {}", listing.videos.len());
            }
        }
        None => {
            println!("{}", ABOUT);
            println!("Use 'media_gallery --help' for the full help text");
        }
    }
}
