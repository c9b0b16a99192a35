use std::io;

use clap::Parser;
use nps_explorer::{
    api::NearbyPlacesClient,
    cache::ResponseCache,
    catalog::SiteCatalog,
    cli::Cli,
    config::{Config, MAPQUEST_RADIUS_URL, NPS_BASE_URL},
    fetch::{PageFetcher, ReqwestHttp},
    logging,
    session::Session,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    // Load configuration; a missing API key stops here
    let config = Config::load(&cli)?;
    tracing::debug!(?config, "Loaded configuration");

    let http = ReqwestHttp::new(config.http_timeout)?;
    let fetcher = PageFetcher::new(http.clone(), ResponseCache::new(&config.cache_path));
    let catalog = SiteCatalog::new(fetcher, NPS_BASE_URL)?;
    let nearby = NearbyPlacesClient::new(http, config.mapquest_api_key.clone(), MAPQUEST_RADIUS_URL)?;

    let mut session = Session::new(catalog, nearby);
    session.run(io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}
