//! GameHub event catalog
//!
//! Fetches the event listing once and logs the first page, decorated the way
//! the web front-end shows it. Filters are passed as `key=value` arguments,
//! e.g. `gamehub category=esports date=this-week sort=date-asc`.

use chrono::Utc;
use tracing::{info, warn};

use GameHub::{
    config::Settings,
    models::FilterCriteria,
    services::ServiceFactory,
    utils::{helpers, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", GameHub::info());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let criteria = FilterCriteria::from_params(args.iter().filter_map(|arg| arg.split_once('=')));

    let services = ServiceFactory::new(&settings)?;
    let now = Utc::now();

    info!(base_url = %settings.api.base_url, params = ?criteria.to_params(), "Loading events");
    let outcome = services.catalog.load(Some(criteria), false, now).await?;
    info!(fetched = outcome.records().len(), "Events loaded");

    let view = services.catalog.read().await;
    if view.is_empty() {
        warn!("No events match the current filters");
        return Ok(());
    }

    for record in view.visible_page() {
        info!(
            id = %record.id,
            title = %record.title,
            date = %record.date,
            time = %record.time,
            location = %record.location,
            status = %record.status(now),
            progress = record.registration_progress(),
            spots_left = record.spots_left(),
            full = record.is_full(),
            new = record.is_new(now),
            free = record.is_free(),
            created_at = %helpers::format_timestamp(record.created_at),
            description = %helpers::truncate_text(record.description.as_deref().unwrap_or_default(), 80),
            "Event"
        );
    }

    let summary = view.summary();
    info!(
        "{}",
        helpers::create_pagination_info(summary.current_page, summary.total_pages, summary.matching)
    );
    if view.has_more() {
        info!(remaining = summary.matching - summary.visible, "More events available");
    }

    Ok(())
}
