// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Signing-certificate fingerprints of the running package.
//
// Which certificates are reported depends on the platform level, and that
// difference is kept: on API 28+ a single-signer package reports its whole
// rotation lineage while a multi-signer package reports only its current
// signers; older platforms report the legacy signature block.

use qtshell_core::ApiLevel;
use qtshell_core::error::{BridgeError, Result};
use qtshell_security::FingerprintSet;

use crate::traits::PackageRegistry;

/// Which package-registry query supplies the certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStrategy {
    /// `PackageInfo.signatures` via `GET_SIGNATURES`.
    LegacySignatures,
    /// `PackageInfo.signingInfo` via `GET_SIGNING_CERTIFICATES`.
    CertificateLineage,
}

/// Minimum API level for each strategy, highest first.
const SIGNING_STRATEGIES: &[(ApiLevel, SigningStrategy)] =
    &[(ApiLevel::P, SigningStrategy::CertificateLineage)];

impl SigningStrategy {
    pub fn for_level(level: ApiLevel) -> Self {
        SIGNING_STRATEGIES
            .iter()
            .find(|(min, _)| level >= *min)
            .map(|(_, strategy)| *strategy)
            .unwrap_or(SigningStrategy::LegacySignatures)
    }

    /// Raw certificate blobs for `package`, in the platform's signer order.
    pub fn certificates<R>(self, registry: &R, package: &str) -> Result<Vec<Vec<u8>>>
    where
        R: PackageRegistry + ?Sized,
    {
        match self {
            SigningStrategy::LegacySignatures => registry.legacy_signatures(package),
            SigningStrategy::CertificateLineage => match registry.signing_info(package)? {
                None => Ok(Vec::new()),
                Some(info) if info.has_multiple_signers => Ok(info.apk_contents_signers),
                Some(info) => Ok(info.signing_certificate_history),
            },
        }
    }

    /// Fingerprints of the running package's signing certificates.
    ///
    /// An unsigned package gives an empty set. Any registry failure is a
    /// `BridgeError::Lookup`; it is not retried.
    pub fn fingerprints<R>(self, registry: &R) -> Result<FingerprintSet>
    where
        R: PackageRegistry + ?Sized,
    {
        let package = registry.package_name().map_err(into_lookup)?;
        let certificates = self
            .certificates(registry, &package)
            .map_err(into_lookup)?;
        let set = FingerprintSet::from_certificates(&certificates);

        tracing::info!(
            package = %package,
            strategy = ?self,
            count = set.len(),
            "collected signing fingerprints"
        );
        Ok(set)
    }
}

/// Registry failures of any kind surface as `BridgeError::Lookup`.
pub(crate) fn into_lookup(e: BridgeError) -> BridgeError {
    match e {
        BridgeError::Lookup(_) => e,
        other => BridgeError::Lookup(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePlatform;
    use crate::traits::SigningInfo;
    use qtshell_security::Fingerprint;

    fn cert(tag: &str) -> Vec<u8> {
        format!("-----CERT {tag}-----").into_bytes()
    }

    fn fp(tag: &str) -> Fingerprint {
        Fingerprint::of_certificate(&cert(tag))
    }

    #[test]
    fn strategy_table_by_level() {
        assert_eq!(SigningStrategy::for_level(ApiLevel(23)), SigningStrategy::LegacySignatures);
        assert_eq!(SigningStrategy::for_level(ApiLevel(27)), SigningStrategy::LegacySignatures);
        assert_eq!(SigningStrategy::for_level(ApiLevel(28)), SigningStrategy::CertificateLineage);
        assert_eq!(SigningStrategy::for_level(ApiLevel(34)), SigningStrategy::CertificateLineage);
    }

    #[test]
    fn single_certificate_gives_one_fingerprint() {
        let mut platform = FakePlatform::at_level(33);
        platform.signing_info = Some(SigningInfo {
            has_multiple_signers: false,
            apk_contents_signers: vec![cert("release")],
            signing_certificate_history: vec![cert("release")],
        });

        let set = SigningStrategy::CertificateLineage.fingerprints(&platform).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&fp("release")));
    }

    #[test]
    fn single_signer_reports_rotation_history() {
        let mut platform = FakePlatform::at_level(30);
        platform.signing_info = Some(SigningInfo {
            has_multiple_signers: false,
            apk_contents_signers: vec![cert("v2")],
            signing_certificate_history: vec![cert("v1"), cert("v2")],
        });

        let set = SigningStrategy::CertificateLineage.fingerprints(&platform).unwrap();
        assert_eq!(set.to_hex_strings(), vec![fp("v1").to_hex(), fp("v2").to_hex()]);
    }

    #[test]
    fn multiple_signers_report_current_signers_only() {
        let mut platform = FakePlatform::at_level(30);
        platform.signing_info = Some(SigningInfo {
            has_multiple_signers: true,
            apk_contents_signers: vec![cert("a"), cert("b")],
            signing_certificate_history: vec![cert("old")],
        });

        let set = SigningStrategy::CertificateLineage.fingerprints(&platform).unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&fp("old")));
    }

    #[test]
    fn missing_signing_info_is_empty() {
        let platform = FakePlatform::at_level(31);
        let set = SigningStrategy::CertificateLineage.fingerprints(&platform).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn legacy_reads_signature_block() {
        let mut platform = FakePlatform::at_level(26);
        platform.legacy = vec![cert("legacy")];
        // Lineage data is ignored by the legacy strategy.
        platform.signing_info = Some(SigningInfo {
            has_multiple_signers: false,
            apk_contents_signers: vec![],
            signing_certificate_history: vec![cert("v1"), cert("v2")],
        });

        let set = SigningStrategy::LegacySignatures.fingerprints(&platform).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&fp("legacy")));
    }

    #[test]
    fn unreachable_registry_is_lookup_error() {
        let mut platform = FakePlatform::at_level(30);
        platform.package = None;
        let err = SigningStrategy::CertificateLineage
            .fingerprints(&platform)
            .unwrap_err();
        assert!(err.is_lookup());
    }

    #[test]
    fn other_errors_become_lookup_errors() {
        let err = into_lookup(BridgeError::Jni("PackageInfo.signingInfo: NoSuchFieldError".into()));
        assert!(err.is_lookup());
        assert!(err.to_string().contains("NoSuchFieldError"));
    }
}
