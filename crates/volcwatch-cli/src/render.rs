//! Text and JSON output for reconciled snapshots and Ambee events.

use clap::ValueEnum;
use volcwatch_sources::VolcanoEvent;

use crate::refresh::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

pub(crate) fn render_snapshot(snapshot: &Snapshot, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(snapshot)?)),
        OutputFormat::Table => Ok(snapshot_table(snapshot)),
    }
}

pub(crate) fn render_events(events: &[VolcanoEvent], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(events)?)),
        OutputFormat::Table => Ok(events_table(events)),
    }
}

fn snapshot_table(snapshot: &Snapshot) -> String {
    let mut out = format!(
        "Volcano status at {} ({} volcanoes)\n",
        snapshot.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        snapshot.records.len()
    );

    for r in &snapshot.records {
        let name = r.display.name.as_deref().unwrap_or("(unnamed)");
        let observatory = r
            .display
            .observatory
            .as_deref()
            .map(|o| format!("  [{o}]"))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:<10} {:<8} {:>8.3} {:>9.3}  {name}{observatory}\n",
            r.color_code, r.id, r.latitude, r.longitude,
        ));
    }

    out
}

fn events_table(events: &[VolcanoEvent]) -> String {
    let mut out = format!("{} volcano event(s)\n", events.len());
    for e in events {
        let date = e.date.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  {:<9} {:>8.2} {:>9.2}  {date}  {}\n",
            e.status.to_string(),
            e.latitude,
            e.longitude,
            e.name,
        ));
    }
    out
}
