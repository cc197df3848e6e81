// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub platform for desktop/CI builds where the Android APIs are unavailable.
//
// Reports API level 0, so the shell selects the no-inset and legacy-signature
// strategies; the package registry fails with a lookup error and window
// control returns `PlatformUnavailable`.

use std::time::Duration;

use qtshell_core::error::{BridgeError, Result};
use qtshell_core::{ApiLevel, InsetRectangle};

use crate::capabilities::ImmersivePlan;
use crate::traits::*;

/// No-op platform returned on non-Android targets.
pub struct StubPlatform;

impl HostPlatform for StubPlatform {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn api_level(&self) -> ApiLevel {
        ApiLevel(0)
    }
}

impl WindowInsetsSource for StubPlatform {
    fn display_cutout_insets(&self) -> Result<Option<InsetRectangle>> {
        Ok(None)
    }

    fn typed_insets(&self) -> Result<Option<TypedInsets>> {
        Ok(None)
    }
}

impl PackageRegistry for StubPlatform {
    fn package_name(&self) -> Result<String> {
        tracing::warn!("PackageRegistry::package_name called on stub platform");
        Err(BridgeError::Lookup("no package registry on this platform".into()))
    }

    fn signing_info(&self, _package: &str) -> Result<Option<SigningInfo>> {
        Err(BridgeError::Lookup("no package registry on this platform".into()))
    }

    fn legacy_signatures(&self, _package: &str) -> Result<Vec<Vec<u8>>> {
        Err(BridgeError::Lookup("no package registry on this platform".into()))
    }
}

impl HostWindow for StubPlatform {
    fn apply_immersive(&self, _plan: &ImmersivePlan) -> Result<()> {
        tracing::warn!("HostWindow::apply_immersive called on stub platform");
        Err(BridgeError::PlatformUnavailable)
    }

    fn schedule_relayout(&self, _delay: Duration) -> Result<()> {
        tracing::warn!("HostWindow::schedule_relayout called on stub platform");
        Err(BridgeError::PlatformUnavailable)
    }
}
