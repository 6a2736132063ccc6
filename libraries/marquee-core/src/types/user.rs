//! Account and authentication types
use crate::error::ValidationErrors;
use crate::validation::{self, MIN_PASSWORD_CHARS};
use serde::{Deserialize, Serialize};

/// Profile returned at login and cached with the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

/// Raw signup form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for the signup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    /// Check every field; the confirmation never leaves the client
    pub fn validate(&self) -> Result<SignupRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validation::require(&mut errors, "name", &self.name, "Name is required.");

        if !validation::is_valid_email(&self.email) {
            errors.push("email", "Invalid email address.");
        }

        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push("password", "Password must be at least 6 characters.");
        }

        if self.confirm_password != self.password {
            errors.push("confirm_password", "Passwords don't match.");
        }

        errors.into_result(SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Login request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validation::is_valid_email(&self.email) {
            errors.push("email", "Invalid email address.");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required.");
        }

        errors.into_result(())
    }
}

/// Response from a successful login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
