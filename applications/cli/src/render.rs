//! Plain-text rendering of catalog data.

use marquee_core::{Entry, Stats, ValidationErrors};
use marquee_query::{ListState, ListView};

const COLUMNS: [(&str, usize); 8] = [
    ("ID", 6),
    ("Title", 28),
    ("Type", 8),
    ("Director", 20),
    ("Budget", 12),
    ("Location", 16),
    ("Duration", 16),
    ("Year", 10),
];

pub const LOADING: &str = "Loading entries...";
pub const EMPTY: &str = "No entries found. Add your first movie or TV show!";
pub const LOADING_MORE: &str = "Loading more entries...";
pub const NO_MORE: &str = "No more entries to load";
pub const FAILED: &str = "Failed to load entries. Please try again.";

pub fn table_header() -> String {
    let cells: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();
    let header = row(&cells);
    let rule = "-".repeat(header.chars().count());
    format!("{}\n{}", header, rule)
}

pub fn entry_row(entry: &Entry) -> String {
    row(&[
        entry.id.to_string(),
        entry.title.clone(),
        entry.entry_type.label().to_string(),
        entry.director.clone(),
        entry.budget.clone(),
        entry.location.clone(),
        entry.duration.clone(),
        entry.year.clone(),
    ])
}

pub fn entry_table<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    let mut lines = vec![table_header()];
    lines.extend(entries.into_iter().map(entry_row));
    lines.join("\n")
}

fn row(cells: &[String]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:<width$}", truncate(cell, *width), width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Total, movie and TV show cards; missing counts show as 0
pub fn stats_cards(stats: Option<&Stats>) -> String {
    let stats = stats.copied().unwrap_or_default();
    format!(
        "Total Entries  {}\nMovies         {}\nTV Shows       {}",
        stats.total, stats.movies, stats.tv_shows
    )
}

/// Status line shown under the list, if any
pub fn list_status(view: &ListView) -> Option<String> {
    match &view.state {
        ListState::Idle | ListState::Loading => Some(LOADING.to_string()),
        ListState::LoadingMore => Some(LOADING_MORE.to_string()),
        ListState::Ready => None,
        ListState::Exhausted if view.entries.is_empty() => Some(EMPTY.to_string()),
        ListState::Exhausted => Some(NO_MORE.to_string()),
        ListState::Error(message) => Some(format!("{} ({})", FAILED, message)),
    }
}

/// One line per failing field
pub fn field_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}
