// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory host platform for unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use qtshell_core::error::{BridgeError, Result};
use qtshell_core::{ApiLevel, InsetRectangle};

use crate::capabilities::ImmersivePlan;
use crate::traits::*;

/// Scriptable platform. Window-control calls are recorded for assertions.
#[derive(Default)]
pub struct FakePlatform {
    pub api_level: u32,
    pub cutout: Option<InsetRectangle>,
    pub typed: Option<TypedInsets>,
    pub fail_insets: bool,
    pub package: Option<String>,
    pub signing_info: Option<SigningInfo>,
    pub legacy: Vec<Vec<u8>>,
    pub relayouts: Mutex<Vec<Duration>>,
    pub immersive: Mutex<Vec<ImmersivePlan>>,
}

impl FakePlatform {
    pub fn at_level(api_level: u32) -> Self {
        Self {
            api_level,
            package: Some("org.qtshell.demo".to_owned()),
            ..Self::default()
        }
    }

    pub fn relayouts(&self) -> Vec<Duration> {
        self.relayouts.lock().unwrap().clone()
    }

    pub fn immersive_calls(&self) -> Vec<ImmersivePlan> {
        self.immersive.lock().unwrap().clone()
    }
}

impl HostPlatform for FakePlatform {
    fn platform_name(&self) -> &str {
        "Fake"
    }

    fn api_level(&self) -> ApiLevel {
        ApiLevel(self.api_level)
    }
}

impl WindowInsetsSource for FakePlatform {
    fn display_cutout_insets(&self) -> Result<Option<InsetRectangle>> {
        if self.fail_insets {
            return Err(BridgeError::Jni("getRootWindowInsets: detached view".into()));
        }
        Ok(self.cutout)
    }

    fn typed_insets(&self) -> Result<Option<TypedInsets>> {
        if self.fail_insets {
            return Err(BridgeError::Jni("getRootWindowInsets: detached view".into()));
        }
        Ok(self.typed)
    }
}

impl PackageRegistry for FakePlatform {
    fn package_name(&self) -> Result<String> {
        self.package
            .clone()
            .ok_or_else(|| BridgeError::Lookup("package manager unreachable".into()))
    }

    fn signing_info(&self, _package: &str) -> Result<Option<SigningInfo>> {
        Ok(self.signing_info.clone())
    }

    fn legacy_signatures(&self, _package: &str) -> Result<Vec<Vec<u8>>> {
        Ok(self.legacy.clone())
    }
}

impl HostWindow for FakePlatform {
    fn apply_immersive(&self, plan: &ImmersivePlan) -> Result<()> {
        self.immersive.lock().unwrap().push(*plan);
        Ok(())
    }

    fn schedule_relayout(&self, delay: Duration) -> Result<()> {
        self.relayouts.lock().unwrap().push(delay);
        Ok(())
    }
}

/// Hands a `FakePlatform` to the shell while the test keeps a handle on it.
pub struct SharedFake(pub Arc<FakePlatform>);

impl HostPlatform for SharedFake {
    fn platform_name(&self) -> &str {
        self.0.platform_name()
    }

    fn api_level(&self) -> ApiLevel {
        self.0.api_level()
    }
}

impl WindowInsetsSource for SharedFake {
    fn display_cutout_insets(&self) -> Result<Option<InsetRectangle>> {
        self.0.display_cutout_insets()
    }

    fn typed_insets(&self) -> Result<Option<TypedInsets>> {
        self.0.typed_insets()
    }
}

impl PackageRegistry for SharedFake {
    fn package_name(&self) -> Result<String> {
        self.0.package_name()
    }

    fn signing_info(&self, package: &str) -> Result<Option<SigningInfo>> {
        self.0.signing_info(package)
    }

    fn legacy_signatures(&self, package: &str) -> Result<Vec<Vec<u8>>> {
        self.0.legacy_signatures(package)
    }
}

impl HostWindow for SharedFake {
    fn apply_immersive(&self, plan: &ImmersivePlan) -> Result<()> {
        self.0.apply_immersive(plan)
    }

    fn schedule_relayout(&self, delay: Duration) -> Result<()> {
        self.0.schedule_relayout(delay)
    }
}
