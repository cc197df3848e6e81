// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// qtshell-security: SHA-256 fingerprints of APK signing certificates.
//
// The fingerprints are compared against allow-lists supplied from outside
// the app, so the text form is fixed: 64 uppercase hex characters, high
// nibble first, no separators. This crate only produces and parses them;
// deciding whether a set is trusted is up to the caller.

pub mod fingerprint;

pub use fingerprint::{Fingerprint, FingerprintSet, encode_upper_hex};
