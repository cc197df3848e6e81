// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for qtshell.

use thiserror::Error;

/// Top-level error type for all qtshell operations.
///
/// Missing window-inset data is deliberately absent from this enum: it is
/// normalized to a zero rectangle instead of being reported.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Package registry --
    #[error("package lookup failed: {0}")]
    Lookup(String),

    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    // -- Configuration --
    #[error("invalid shell configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("JNI call failed: {0}")]
    Jni(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl BridgeError {
    /// Whether the error came from the package registry.
    ///
    /// The embedded UI uses this to decide between blocking startup and
    /// continuing without integrity verification.
    pub fn is_lookup(&self) -> bool {
        matches!(self, BridgeError::Lookup(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_are_flagged() {
        assert!(BridgeError::Lookup("gone".into()).is_lookup());
        assert!(!BridgeError::PlatformUnavailable.is_lookup());
    }

    #[test]
    fn messages_carry_context() {
        let err = BridgeError::Jni("getWindow: null".into());
        assert_eq!(err.to_string(), "JNI call failed: getWindow: null");
    }
}
