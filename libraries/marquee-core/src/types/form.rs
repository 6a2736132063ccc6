//! Editable entry form
use super::entry::{Entry, EntryInput, EntryType};
use crate::error::ValidationErrors;
use crate::validation::{self, MIN_TITLE_CHARS};

/// Raw entry form values, exactly as typed
///
/// `entry_type` stays a string here so an unknown tag is reported as a field
/// error instead of failing earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub title: String,
    pub entry_type: String,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            entry_type: EntryType::Film.as_str().to_string(),
            director: String::new(),
            budget: String::new(),
            location: String::new(),
            duration: String::new(),
            year: String::new(),
        }
    }
}

impl EntryForm {
    /// Pre-fill the form from an existing entry for editing
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            entry_type: entry.entry_type.as_str().to_string(),
            director: entry.director.clone(),
            budget: entry.budget.clone(),
            location: entry.location.clone(),
            duration: entry.duration.clone(),
            year: entry.year.clone(),
        }
    }

    /// Check every field and build the request body
    pub fn validate(&self) -> Result<EntryInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validation::min_chars(
            &mut errors,
            "title",
            &self.title,
            MIN_TITLE_CHARS,
            "Title must be at least 2 characters.",
        );

        let entry_type = match self.entry_type.parse::<EntryType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("type", "Type must be either movie or tv-show.");
                None
            }
        };

        validation::require(&mut errors, "director", &self.director, "Director is required.");

        if self.budget.trim().is_empty() {
            errors.push("budget", "Budget is required.");
        } else if !validation::is_amount(&self.budget) {
            errors.push("budget", "Budget must be a number.");
        }

        validation::require(&mut errors, "location", &self.location, "Location is required.");
        validation::require(&mut errors, "duration", &self.duration, "Duration is required.");
        validation::require(&mut errors, "year", &self.year, "Year is required.");

        match entry_type {
            Some(entry_type) if errors.is_empty() => Ok(EntryInput {
                title: self.title.trim().to_string(),
                entry_type,
                director: self.director.trim().to_string(),
                budget: self.budget.trim().to_string(),
                location: self.location.trim().to_string(),
                duration: self.duration.trim().to_string(),
                year: self.year.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}
