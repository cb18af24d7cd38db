//! UI/backend events and error modeling for the edit page window.

use client_core::PageView;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    ViewChanged(PageView),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Load,
    Submit,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("http 401")
            || message_lower.contains("http 403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("no bearer token")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("http 400")
            || message_lower.contains("http 422")
            || message_lower.contains("failed to decode")
            || message_lower.contains("invalid")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("disconnected")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line hint shown under the page, next to the raw message.
    pub fn status_line(&self) -> String {
        let hint = match (self.category, self.context) {
            (UiErrorCategory::Auth, _) => {
                "Sign in to the dashboard again so the token cookie is refreshed."
            }
            (UiErrorCategory::Transport, _) => "Backend unreachable; check the API URL and network.",
            (UiErrorCategory::Validation, UiErrorContext::Submit) => {
                "The backend rejected the submitted values."
            }
            (_, UiErrorContext::BackendStartup) => "The background worker could not start.",
            _ => "Unexpected error.",
        };
        format!("{hint} ({})", self.message)
    }
}
