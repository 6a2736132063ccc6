//! Interactive list: debounced search and load-more on demand.
//!
//! Each input line is one event:
//! - `/text` searches for `text` (`/` alone clears the search)
//! - an empty line asks for more entries
//! - `r` retries after a failure
//! - `q` quits

use crate::render;
use crate::App;
use anyhow::Result;
use marquee_core::EntryFilter;
use marquee_query::{Debounced, ListController, ListState, ListView, ViewportEvent};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::debug;

pub const HELP: &str = "Enter: load more  /text: search  r: retry  q: quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Search(String),
    More,
    Retry,
    Quit,
    Unknown,
}

impl BrowseInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches('\r');
        if let Some(text) = line.strip_prefix('/') {
            return BrowseInput::Search(text.to_string());
        }
        match line.trim() {
            "" => BrowseInput::More,
            "r" => BrowseInput::Retry,
            "q" => BrowseInput::Quit,
            _ => BrowseInput::Unknown,
        }
    }
}

/// Prints list views incrementally: rows already shown are not repeated
/// while the filter stays the same.
#[derive(Debug, Default)]
pub struct ViewPrinter {
    filter: Option<EntryFilter>,
    printed: usize,
    state: Option<ListState>,
}

impl ViewPrinter {
    pub fn print(&mut self, view: &ListView, out: &mut dyn Write) -> std::io::Result<()> {
        if self.filter.as_ref() != Some(&view.filter) {
            self.filter = Some(view.filter.clone());
            self.printed = 0;
            self.state = None;
            if view.filter.has_search() {
                writeln!(out, "\nSearch: {}", view.filter.search)?;
            } else {
                writeln!(out, "\nAll entries")?;
            }
        }

        // A refetch from the first page can shrink the list
        if view.entries.len() < self.printed {
            self.printed = 0;
        }

        if view.entries.len() > self.printed {
            if self.printed == 0 {
                writeln!(out, "{}", render::table_header())?;
            }
            for entry in &view.entries[self.printed..] {
                writeln!(out, "{}", render::entry_row(entry))?;
            }
            self.printed = view.entries.len();
        }

        if self.state.as_ref() != Some(&view.state) {
            self.state = Some(view.state.clone());
            if let Some(status) = render::list_status(view) {
                writeln!(out, "{}", status)?;
            }
        }

        out.flush()
    }
}

/// Run the interactive list until `q` or end of input.
pub async fn run(app: &App, search: String, out: &mut dyn Write) -> Result<()> {
    let (search_tx, search_rx) = watch::channel(search.clone());
    let (sentinel_tx, sentinel_rx) = mpsc::unbounded_channel();
    let (retry_tx, retry_rx) = mpsc::unbounded_channel();
    let (view_tx, mut view_rx) = watch::channel(ListView::default());

    let controller = ListController::new(app.queries.clone(), EntryFilter::new(search));
    let debounced = Debounced::new(search_rx, app.settings.search_debounce());
    let task = tokio::spawn(controller.run(debounced, sentinel_rx, retry_rx, view_tx));

    writeln!(out, "{}", HELP)?;

    let mut printer = ViewPrinter::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = view_rx.borrow_and_update().clone();
                printer.print(&view, out)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let sent = match BrowseInput::parse(&line) {
                    BrowseInput::Search(text) => search_tx.send(text).is_ok(),
                    BrowseInput::More => sentinel_tx.send(ViewportEvent::SentinelVisible).is_ok(),
                    BrowseInput::Retry => retry_tx.send(()).is_ok(),
                    BrowseInput::Quit => break,
                    BrowseInput::Unknown => {
                        writeln!(out, "{}", HELP)?;
                        true
                    }
                };
                if !sent {
                    debug!("List controller is gone");
                    break;
                }
            }
        }
    }

    task.abort();
    Ok(())
}
