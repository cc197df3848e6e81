// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate fingerprints: SHA-256 digests rendered as uppercase hex.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use qtshell_core::error::{BridgeError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Render bytes as uppercase hex without separators.
pub fn encode_upper_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// SHA-256 digest of one DER-encoded signing certificate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; DIGEST_LEN]);

impl Fingerprint {
    /// Hash the raw certificate bytes (`Signature.toByteArray()`).
    pub fn of_certificate(certificate: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(certificate);
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// The 64-character uppercase hex form.
    pub fn to_hex(&self) -> String {
        encode_upper_hex(&self.0)
    }

    /// Parse the hex form. Lowercase digits are accepted, so an allow-list
    /// entry can be normalized through `to_hex`; anything that does not
    /// decode to exactly 32 bytes is rejected.
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text, &mut bytes)
            .map_err(|e| BridgeError::InvalidFingerprint(format!("{text:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Fingerprints of the certificates that signed a package, in the order the
/// platform reported the signers.
///
/// That order differs between OS versions, so equality and membership
/// helpers ignore it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintSet(Vec<Fingerprint>);

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint each certificate blob, keeping platform order.
    pub fn from_certificates<I, C>(certificates: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        certificates
            .into_iter()
            .map(|cert| Fingerprint::of_certificate(cert.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fingerprint> {
        self.0.iter()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.0.contains(fingerprint)
    }

    /// Hex strings in platform order, as handed to the embedded UI.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.0.iter().map(Fingerprint::to_hex).collect()
    }

    /// Order-insensitive comparison of the distinct members.
    pub fn same_members(&self, other: &FingerprintSet) -> bool {
        let lhs: HashSet<&Fingerprint> = self.0.iter().collect();
        let rhs: HashSet<&Fingerprint> = other.0.iter().collect();
        lhs == rhs
    }
}

impl FromIterator<Fingerprint> for FingerprintSet {
    fn from_iter<T: IntoIterator<Item = Fingerprint>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FingerprintSet {
    type Item = Fingerprint;
    type IntoIter = std::vec::IntoIter<Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FingerprintSet {
    type Item = &'a Fingerprint;
    type IntoIter = std::slice::Iter<'a, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
