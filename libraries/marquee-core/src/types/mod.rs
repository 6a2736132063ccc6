mod entry;
mod form;
mod ids;
mod stats;
mod user;
mod wire;

pub use entry::{EntriesPage, Entry, EntryFilter, EntryInput, EntryType};
pub use form::EntryForm;
pub use ids::EntryId;
pub use stats::Stats;
pub use user::{Credentials, LoginResponse, SignupForm, SignupRequest, UserProfile};
