//! Error types for the directory client.

use roster_core::RosterError;
use thiserror::Error;

/// Errors that can occur when talking to the remote directory.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        /// The `error` field of the response body, when present
        message: Option<String>,
    },

    /// Auth endpoint answered without a token
    #[error("No token received")]
    MissingToken,

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// The error string supplied by the server, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Human-readable message: the server's own text, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Convert into the domain `Auth` error
    pub fn into_auth(self, fallback: &str) -> RosterError {
        RosterError::auth(self.user_message(fallback))
    }

    /// Convert into the domain `Network` error
    pub fn into_network(self, fallback: &str) -> RosterError {
        RosterError::network(self.user_message(fallback))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
