//! Command handlers.

use crate::cli::Commands;
use crate::{browse, render, App};
use anyhow::{anyhow, bail, Context, Result};
use marquee_client::{CatalogApi, RouteDecision};
use marquee_core::{
    Credentials, Entry, EntryFilter, EntryForm, EntryId, SignupForm, ValidationErrors,
};
use marquee_query::{ListController, ListState, QueryError, ViewportEvent};
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const SIGNED_OUT: &str = "Not signed in. Run `marquee login` first.";
pub const LOGIN_HINT: &str = "Run `marquee login` to sign in.";

/// Run one command, writing user-facing output to `out`.
///
/// `input` answers confirmation prompts.
pub async fn execute(
    app: &App,
    command: Commands,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    if let RouteDecision::Redirect(route) = app.client.session().guard(command.route()) {
        debug!(?route, "Redirected by session guard");
        bail!(SIGNED_OUT);
    }

    match command {
        Commands::Signup {
            name,
            email,
            password,
            confirm_password,
        } => {
            let request = SignupForm {
                name,
                email,
                password,
                confirm_password,
            }
            .validate()
            .map_err(invalid)?;

            app.client.signup(&request).await?;
            writeln!(out, "Account created. {}", LOGIN_HINT)?;
        }

        Commands::Login { email, password } => {
            let credentials = Credentials::new(email, password);
            credentials.validate().map_err(invalid)?;

            let session = app.client.login(&credentials).await?;
            writeln!(
                out,
                "Signed in as {} ({})",
                session.user.name, session.user.email
            )?;
        }

        Commands::Logout => {
            app.client.logout()?;
            writeln!(out, "Logged out. {}", LOGIN_HINT)?;
        }

        Commands::Whoami => match app.client.session().user() {
            Some(user) => writeln!(out, "{} <{}>", user.name, user.email)?,
            None => writeln!(out, "{}", SIGNED_OUT)?,
        },

        Commands::Stats => {
            let stats = app.queries.stats().await.map_err(surface)?;
            writeln!(out, "{}", render::stats_cards(Some(&stats)))?;
        }

        Commands::List { search, pages, all } => {
            list(app, EntryFilter::new(search), (!all).then_some(pages), out).await?;
        }

        Commands::Add(args) => {
            let entry = app
                .queries
                .create_entry(&args.into_form())
                .await
                .map_err(surface)?;
            writeln!(out, "Entry saved! ({} {})", entry.id, entry.title)?;
        }

        Commands::Edit { id, changes } => {
            if changes.is_empty() {
                writeln!(out, "Nothing to change.")?;
                return Ok(());
            }

            let id = EntryId::new(id);
            let existing = find_entry(app, &id).await?;
            let mut form = EntryForm::from_entry(&existing);
            changes.apply(&mut form);

            let entry = app
                .queries
                .update_entry(&id, &form)
                .await
                .map_err(surface)?;
            writeln!(out, "Entry saved! ({} {})", entry.id, entry.title)?;
        }

        Commands::Delete { id, yes } => {
            let id = EntryId::new(id);
            if !yes && !confirm_delete(&id, out, input)? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }

            app.queries.delete_entry(&id).await.map_err(surface)?;
            writeln!(out, "Entry deleted successfully")?;
        }

        Commands::Browse { search } => {
            browse::run(app, search, out).await?;
        }
    }

    Ok(())
}

/// Print the list for `filter`, loading up to `pages` pages (all if `None`).
async fn list(
    app: &App,
    filter: EntryFilter,
    pages: Option<u32>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut list = ListController::new(app.queries.clone(), filter);
    let mut loaded = 0;

    loop {
        while matches!(list.state(), ListState::Loading | ListState::LoadingMore) {
            if !list.changed().await {
                bail!("Entry list closed unexpectedly");
            }
        }
        loaded += 1;

        let wanted_more = pages.map_or(true, |pages| loaded < pages);
        if !wanted_more || !list.on_viewport(ViewportEvent::SentinelVisible) {
            break;
        }
    }

    let view = list.view();
    if !view.entries.is_empty() {
        writeln!(out, "{}", render::entry_table(&view.entries))?;
    }
    match render::list_status(&view) {
        Some(status) => writeln!(out, "{}", status)?,
        None => {
            let total = view.total.unwrap_or_default();
            writeln!(
                out,
                "Showing {} of {} entries (use --all or --pages for more)",
                view.entries.len(),
                total
            )?;
        }
    }

    if let ListState::Error(message) = &view.state {
        bail!("{}", message);
    }
    Ok(())
}

/// Look up one entry by walking the unfiltered list.
async fn find_entry(app: &App, id: &EntryId) -> Result<Entry> {
    let filter = EntryFilter::default();
    let limit = app.settings.page_size;
    let mut offset = 0;

    loop {
        let page = app.client.list_entries(&filter, limit, offset).await?;
        if let Some(entry) = page.entries.iter().find(|e| e.id == *id) {
            return Ok(entry.clone());
        }

        offset += page.entries.len() as u64;
        if page.entries.is_empty() || offset >= page.total {
            bail!("Entry {} not found", id);
        }
    }
}

fn confirm_delete(id: &EntryId, out: &mut dyn Write, input: &mut dyn BufRead) -> Result<bool> {
    write!(
        out,
        "Delete entry {}? This action cannot be undone. [y/N] ",
        id
    )?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn invalid(errors: ValidationErrors) -> anyhow::Error {
    anyhow!("Please fix the following:\n{}", render::field_errors(&errors))
}

fn surface(err: QueryError) -> anyhow::Error {
    match err {
        QueryError::Validation(errors) => invalid(errors),
        other => {
            info!(error = %other, "Request failed");
            anyhow::Error::new(other)
        }
    }
}
