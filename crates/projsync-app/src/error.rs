// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Failures surfaced by a [`crate::ProjectService`].
///
/// `Http` keeps the status code alongside the best-effort message taken from
/// the response body so callers can always show both.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("Error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }
}
