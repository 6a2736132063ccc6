//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use marquee_client::Route;
use marquee_core::EntryForm;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(version, about = "Browse and manage a movie and TV show catalog", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Must match --password
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show entry counts
    Stats,
    /// Print entries
    List {
        /// Only entries matching this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Load every page
        #[arg(long, conflicts_with = "pages")]
        all: bool,
    },
    /// Add an entry
    Add(EntryArgs),
    /// Change an entry; fields not given keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        changes: EntryChanges,
    },
    /// Delete an entry
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Scroll through entries interactively
    Browse {
        /// Initial search text
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

impl Commands {
    /// Route the command belongs to, for the session guard
    pub fn route(&self) -> Route {
        match self {
            Commands::Signup { .. } => Route::Signup,
            Commands::Login { .. } | Commands::Logout | Commands::Whoami => Route::Login,
            Commands::Stats
            | Commands::List { .. }
            | Commands::Add(_)
            | Commands::Edit { .. }
            | Commands::Delete { .. }
            | Commands::Browse { .. } => Route::Catalog,
        }
    }
}

/// Entry fields as typed; checked by form validation, not by clap
#[derive(Args, Debug, Clone, Default)]
pub struct EntryArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    /// "movie" or "tv-show"
    #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
    pub entry_type: String,
    #[arg(long, default_value = "")]
    pub director: String,
    #[arg(long, default_value = "")]
    pub budget: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// e.g. "148 min" or "49 min/episode"
    #[arg(long, default_value = "")]
    pub duration: String,
    /// Year or era, e.g. "2010" or "2008-2013"
    #[arg(long, default_value = "")]
    pub year: String,
}

impl EntryArgs {
    pub fn into_form(self) -> EntryForm {
        EntryForm {
            title: self.title,
            entry_type: self.entry_type,
            director: self.director,
            budget: self.budget,
            location: self.location,
            duration: self.duration,
            year: self.year,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EntryChanges {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long = "type", value_name = "TYPE")]
    pub entry_type: Option<String>,
    #[arg(long)]
    pub director: Option<String>,
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
}

impl EntryChanges {
    /// Overwrite the fields that were given
    pub fn apply(self, form: &mut EntryForm) {
        let fields = [
            (self.title, &mut form.title),
            (self.entry_type, &mut form.entry_type),
            (self.director, &mut form.director),
            (self.budget, &mut form.budget),
            (self.location, &mut form.location),
            (self.duration, &mut form.duration),
            (self.year, &mut form.year),
        ];
        for (change, field) in fields {
            if let Some(value) = change {
                *field = value;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.entry_type.is_none()
            && self.director.is_none()
            && self.budget.is_none()
            && self.location.is_none()
            && self.duration.is_none()
            && self.year.is_none()
    }
}
