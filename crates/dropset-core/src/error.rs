//! Error types for `dropset-core`.
//!
//! A duplicate submission is not an error: it is reported as
//! [`Submission::AlreadyRegistered`](crate::waitlist::Submission). Only
//! rejected submissions surface here.

/// Reasons a submitted email is rejected before touching the registrant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEmail {
    /// No email was supplied, it was not a string, or it was empty.
    #[error("email is required")]
    Missing,

    /// The value does not have the `local@domain.tld` shape.
    #[error("email does not match local@domain.tld")]
    Format,
}

/// Errors from waitlist submissions.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    /// The client has used up its submissions for the current window.
    #[error("rate limit exceeded for client '{client_id}'")]
    RateLimited { client_id: String },

    /// The submitted email failed validation.
    #[error("invalid email: {0}")]
    InvalidInput(#[from] InvalidEmail),
}
