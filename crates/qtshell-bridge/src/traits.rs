// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the shell bridge.
//
// The host OS is reached through `HostPlatform`; the host runtime calls the
// shell through `HostLifecycle`; the embedded UI reads from it through
// `EmbeddedUi`.

use std::time::Duration;

use qtshell_core::error::Result;
use qtshell_core::{ApiLevel, InsetRectangle, NavigationIntent};
use qtshell_security::FingerprintSet;

use crate::capabilities::ImmersivePlan;

/// Everything the shell needs from the host OS.
pub trait HostPlatform: WindowInsetsSource + PackageRegistry + HostWindow + Send + Sync {
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;

    /// SDK level of the running device. Read once when the platform is bound.
    fn api_level(&self) -> ApiLevel;
}

/// Window-inset queries. Each is only meaningful from the API level noted;
/// the resolver never calls one below that level.
pub trait WindowInsetsSource {
    /// Safe insets of the display cutout (API 28+).
    ///
    /// `None` when the window has no root insets yet or the display has no
    /// cutout.
    fn display_cutout_insets(&self) -> Result<Option<InsetRectangle>>;

    /// System-bar and cutout insets as separate typed queries (API 30+).
    ///
    /// `None` when the window has no root insets yet.
    fn typed_insets(&self) -> Result<Option<TypedInsets>>;
}

/// Result of the typed `WindowInsets.getInsets` queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypedInsets {
    /// Status bars and navigation bars combined.
    pub system_bars: InsetRectangle,
    pub display_cutout: InsetRectangle,
}

/// Package-registry queries. Failures are reported as `BridgeError::Lookup`.
pub trait PackageRegistry {
    /// Name of the running package.
    fn package_name(&self) -> Result<String>;

    /// Signing-certificate data (`GET_SIGNING_CERTIFICATES`, API 28+).
    /// `None` when the package record carries no signing info.
    fn signing_info(&self, package: &str) -> Result<Option<SigningInfo>>;

    /// Legacy signature block (`GET_SIGNATURES`). Missing signatures yield
    /// an empty list.
    fn legacy_signatures(&self, package: &str) -> Result<Vec<Vec<u8>>>;
}

/// Raw certificates from `android.content.pm.SigningInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningInfo {
    /// `hasMultipleSigners()`.
    pub has_multiple_signers: bool,
    /// `getApkContentsSigners()`: the current signers.
    pub apk_contents_signers: Vec<Vec<u8>>,
    /// `getSigningCertificateHistory()`: the rotation lineage, oldest first.
    /// The platform leaves this empty when there are multiple signers.
    pub signing_certificate_history: Vec<Vec<u8>>,
}

/// Window control the shell performs on the host.
pub trait HostWindow {
    /// Switch the window to edge-to-edge layout as described by `plan`.
    fn apply_immersive(&self, plan: &ImmersivePlan) -> Result<()>;

    /// Ask the window to re-apply insets and lay out again after `delay`.
    fn schedule_relayout(&self, delay: Duration) -> Result<()>;
}

/// Callbacks the host runtime delivers to the shell.
pub trait HostLifecycle {
    /// Activity created. `launch` is the intent that started it.
    fn on_create(&self, launch: Option<NavigationIntent>);

    /// A new intent arrived for the running activity.
    fn on_new_intent(&self, intent: NavigationIntent);

    fn on_resume(&self);

    fn on_window_focus_changed(&self, has_focus: bool);

    fn on_configuration_changed(&self);
}

/// Accessors the embedded UI runtime calls on the shell.
pub trait EmbeddedUi {
    /// Padding content must keep clear of bars and cutouts. Never fails;
    /// missing data is the zero rectangle.
    fn resolve_safe_area(&self) -> InsetRectangle;

    /// SHA-256 fingerprints of the package's signing certificates.
    fn signing_fingerprints(&self) -> Result<FingerprintSet>;

    /// The pending deep link, cleared on return.
    fn consume_pending_link(&self) -> Option<String>;
}

/// Receives deep links that arrive while the UI is already running.
///
/// Called with the shell borrowed; implementations must not call back into
/// the shell.
pub trait LinkListener: Send + Sync {
    fn link_available(&self, uri: &str);
}

impl<F> LinkListener for F
where
    F: Fn(&str) + Send + Sync,
{
    fn link_available(&self, uri: &str) {
        self(uri)
    }
}
