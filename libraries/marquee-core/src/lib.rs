//! Marquee Core
//!
//! Domain types and client-side validation for the Marquee catalog client.
//!
//! The catalog holds movies and TV shows owned by a remote REST service. This
//! crate only describes the shapes exchanged with that service and the form
//! rules checked before anything is sent:
//! - **Domain Types**: `Entry`, `EntryType`, `EntriesPage`, `Stats`, `UserProfile`
//! - **Forms**: `EntryForm`, `SignupForm`, `Credentials`
//! - **Error Handling**: `ValidationErrors` with one message per failing field
//!
//! # Example
//!
//! ```rust
//! use marquee_core::EntryForm;
//!
//! let form = EntryForm {
//!     title: "A".to_string(),
//!     ..EntryForm::default()
//! };
//!
//! let errors = form.validate().unwrap_err();
//! assert_eq!(
//!     errors.message_for("title"),
//!     Some("Title must be at least 2 characters.")
//! );
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod types;
pub mod validation;

pub use error::{FieldError, ValidationErrors};
pub use types::{
    Credentials, EntriesPage, Entry, EntryFilter, EntryForm, EntryId, EntryInput, EntryType,
    LoginResponse, SignupForm, SignupRequest, Stats, UserProfile,
};
