// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! qtshell: Android shell bridge for an embedded Qt UI.
//!
//! The Java `org.qtshell.ShellActivity` forwards its lifecycle callbacks
//! here; the Qt side asks for the safe display area, the APK signing
//! fingerprints and any pending deep link. The platform itself sits behind
//! the [`traits::HostPlatform`] seam so the logic runs (and is tested) off
//! device against the stub or fakes.

pub mod activity;
pub mod capabilities;
pub mod logging;
pub mod pending_link;
pub mod safe_area;
pub mod signing;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::ShellActivity;
pub use capabilities::{Capabilities, ImmersivePlan, InsetListener};
pub use pending_link::PendingLinkSlot;
pub use safe_area::InsetStrategy;
pub use signing::SigningStrategy;

use qtshell_core::error::Result;

/// Returns the host platform for the target operating system.
///
/// On Android this binds to the activity registered in `ndk-context` (set by
/// `android-activity` or `ANativeActivity_onCreate`). Shells that call in
/// through JNI build their platform from the JNI arguments instead.
pub fn host_platform() -> Result<Box<dyn traits::HostPlatform>> {
    #[cfg(target_os = "android")]
    {
        Ok(Box::new(android::AndroidPlatform::from_ndk_context()?))
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: no window insets, no package registry.
        Ok(Box::new(stub::StubPlatform))
    }
}
