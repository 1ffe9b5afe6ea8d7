//! Error types for the discovery services.
//!
//! Every failure a caller sees falls into one of three categories:
//! the user is not signed in (or has the wrong role), the input failed
//! validation, or the collaborator store failed.

use std::fmt;
use store::{Role, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// No acting user, or the user id is unknown to the store
    #[error("not authenticated")]
    NotAuthenticated,

    /// The acting user has the wrong role for the operation
    #[error("forbidden: requires role {required}")]
    Forbidden { required: Role },

    /// Input rejected before any store call
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A feed filter failed
    #[error("feed pipeline failed: {0}")]
    Pipeline(anyhow::Error),
}

/// The three-way taxonomy errors are reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotAuthenticated,
    Validation,
    Collaborator,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::NotAuthenticated => f.write_str("not authenticated"),
            ErrorCategory::Validation => f.write_str("validation"),
            ErrorCategory::Collaborator => f.write_str("collaborator failure"),
        }
    }
}

impl DiscoveryError {
    pub fn validation(message: impl Into<String>) -> Self {
        DiscoveryError::Validation(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DiscoveryError::NotAuthenticated | DiscoveryError::Forbidden { .. } => {
                ErrorCategory::NotAuthenticated
            }
            DiscoveryError::Validation(_) => ErrorCategory::Validation,
            DiscoveryError::Store(_) | DiscoveryError::Pipeline(_) => ErrorCategory::Collaborator,
        }
    }

    /// Short inline message naming the general category.
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::NotAuthenticated | DiscoveryError::Forbidden { .. } => {
                "Please sign in as a user with access to this page.".to_string()
            }
            DiscoveryError::Validation(reason) => format!("Invalid input: {reason}"),
            DiscoveryError::Store(_) | DiscoveryError::Pipeline(_) => {
                "Something went wrong, please try again.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
