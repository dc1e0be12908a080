//! API errors and the notices they turn into.

use std::fmt::{Display, Formatter, Result as FmtResult};

use platter::{forms::FieldErrors, routes::Route};
use thiserror::Error;

use crate::session::SessionError;

/// Failure of one backend request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("could not reach the server")]
    Transport(#[source] reqwest::Error),

    /// The server answered and refused the request.
    #[error("request rejected{}", rejection_suffix(*status, message.as_deref()))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The session is missing, expired or lacks permission.
    #[error("not authorised, please log in again")]
    Unauthorized,

    /// The response body could not be understood.
    #[error("unexpected response from the server")]
    Decode(#[source] serde_json::Error),

    #[error("session storage failed")]
    Session(#[from] SessionError),
}

fn rejection_suffix(status: Option<u16>, message: Option<&str>) -> String {
    match (status, message) {
        (_, Some(message)) => format!(": {message}"),
        (Some(status), None) => format!(" with status {status}"),
        (None, None) => String::new(),
    }
}

impl ApiError {
    /// A refusal carrying the server's own words.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            message: Some(message.into()),
        }
    }

    /// Message reported by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server's message verbatim, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// What a view shows the user after something went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking message for a failed mutation.
    Alert(String),

    /// Per-field messages next to a form.
    Inline(FieldErrors),

    /// Empty-state text in place of data that failed to load.
    Placeholder(String),

    /// Navigate away, e.g. to the login screen.
    Redirect(Route),
}

impl Notice {
    /// Notice for a failed mutation.
    #[must_use]
    pub fn for_mutation(error: &ApiError, fallback: &str) -> Self {
        if error.is_unauthorized() {
            return Self::Redirect(Route::Login);
        }

        Self::Alert(error.user_message(fallback))
    }

    /// Notice for a failed read.
    #[must_use]
    pub fn for_fetch(error: &ApiError, fallback: &str) -> Self {
        if error.is_unauthorized() {
            return Self::Redirect(Route::Login);
        }

        Self::Placeholder(error.user_message(fallback))
    }

    /// Text to print, if this notice carries any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Alert(message) | Self::Placeholder(message) => Some(message),
            Self::Inline(_) | Self::Redirect(_) => None,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Alert(message) | Self::Placeholder(message) => f.write_str(message),
            Self::Inline(errors) => Display::fmt(errors, f),
            Self::Redirect(route) => write!(f, "continue at {route}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let error = ApiError::rejected("Item is currently unavailable");

        assert_eq!(
            Notice::for_mutation(&error, "Failed to update cart"),
            Notice::Alert("Item is currently unavailable".to_string())
        );
    }

    #[test]
    fn generic_fallback_without_server_message() {
        let error = ApiError::Rejected {
            status: Some(500),
            message: None,
        };

        assert_eq!(
            Notice::for_fetch(&error, "Could not load restaurants"),
            Notice::Placeholder("Could not load restaurants".to_string())
        );
        assert_eq!(error.to_string(), "request rejected with status 500");
    }

    #[test]
    fn unauthorised_requests_redirect_to_login() {
        assert_eq!(
            Notice::for_mutation(&ApiError::Unauthorized, "ignored"),
            Notice::Redirect(Route::Login)
        );
    }
}
