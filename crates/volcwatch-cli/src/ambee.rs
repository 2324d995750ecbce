use anyhow::Context;
use volcwatch_core::AppConfig;
use volcwatch_sources::{volcano_events, AmbeeClient};

use crate::render::{render_events, OutputFormat};

/// Fetch Ambee disasters for `country` and print the volcano events.
///
/// With `show_all = false` only erupting volcanoes are printed.
pub(crate) async fn run_ambee(
    config: &AppConfig,
    country: &str,
    limit: u32,
    show_all: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = AmbeeClient::from_config(config)?;
    let events = client
        .get_latest_by_country(country, limit)
        .await
        .with_context(|| format!("failed to fetch Ambee disasters for {country}"))?;

    let volcanoes = volcano_events(events, show_all);
    if volcanoes.is_empty() {
        tracing::warn!(country, show_all, "no volcano data found");
    }

    print!("{}", render_events(&volcanoes, format)?);
    Ok(())
}
