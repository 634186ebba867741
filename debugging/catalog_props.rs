//! Fetch the catalog and print how each item projects for the hero and details screens.
//! Usage:
//!   cargo run --bin catalog_props
//!   cargo run --bin catalog_props -- <content_id> [season]
//! Requires CATALOG_API_URL in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde_json::json;
use std::env;
use std::time::Duration;
use streamvault::catalog::CatalogClient;
use streamvault::details::{self, DetailsPage, PlaceholderEpisodes, SeasonPicker};
use streamvault::hero;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("CATALOG_API_URL").context("Missing CATALOG_API_URL in environment")?;
    let client = CatalogClient::new(base_url, Duration::ZERO)?;
    let catalog = client.fetch_catalog().await?;

    let mut args = env::args().skip(1);
    let Some(id) = args.next() else {
        let hero = hero::select_hero(&catalog);
        println!("{}", serde_json::to_string_pretty(&json!({ "hero": hero }))?);
        for item in catalog.items() {
            let projected = hero::project(item);
            println!(
                "{}",
                json!({
                    "id": item.id,
                    "content_type": item.kind.label(),
                    "created_at": item.created_at,
                    "hero": projected,
                })
            );
        }
        return Ok(());
    };

    let season = match args.next() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("season must be a number, got '{raw}'"))?,
        None => 1,
    };
    let item = details::find_content(&catalog, &id)
        .with_context(|| format!("No content with id '{id}' among {} items", catalog.len()))?;
    let picker = SeasonPicker {
        selected: season,
        open: false,
    };
    let page = DetailsPage::build(item, &picker, &PlaceholderEpisodes);
    println!("{}", serde_json::to_string_pretty(&page)?);

    Ok(())
}
