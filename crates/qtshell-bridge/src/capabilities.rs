// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability detection: one lookup from the API level to every
// version-dependent strategy, done when the platform is bound.

use qtshell_core::ApiLevel;

use crate::safe_area::InsetStrategy;
use crate::signing::SigningStrategy;

/// How the shell treats `WindowInsets` dispatched to the decor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetListener {
    /// Leave the platform default in place.
    Untouched,
    /// Consume system-window and cutout insets so the Qt view is not padded.
    ConsumeSystemAndCutout,
    /// Hand insets through unchanged.
    PassThrough,
}

/// Window changes that lay the Qt view out edge to edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmersivePlan {
    /// `WindowManager.LayoutParams.FLAG_LAYOUT_NO_LIMITS`.
    pub layout_no_limits: bool,
    /// `LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES`.
    pub cutout_short_edges: bool,
    /// Value for `View.setFitsSystemWindows`, if it should be set.
    pub fits_system_windows: Option<bool>,
    pub inset_listener: InsetListener,
}

impl ImmersivePlan {
    pub const NONE: ImmersivePlan = ImmersivePlan {
        layout_no_limits: false,
        cutout_short_edges: false,
        fits_system_windows: None,
        inset_listener: InsetListener::Untouched,
    };

    pub fn for_level(level: ApiLevel) -> Self {
        if level >= ApiLevel::R {
            ImmersivePlan {
                layout_no_limits: true,
                cutout_short_edges: true,
                fits_system_windows: Some(false),
                inset_listener: InsetListener::PassThrough,
            }
        } else if level >= ApiLevel::P {
            ImmersivePlan {
                layout_no_limits: true,
                cutout_short_edges: true,
                fits_system_windows: None,
                inset_listener: InsetListener::ConsumeSystemAndCutout,
            }
        } else {
            Self::NONE
        }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}

/// Strategies selected for the running platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub api_level: ApiLevel,
    pub insets: InsetStrategy,
    pub signing: SigningStrategy,
    pub immersive: ImmersivePlan,
}

impl Capabilities {
    pub fn detect(api_level: ApiLevel) -> Self {
        let capabilities = Self {
            api_level,
            insets: InsetStrategy::for_level(api_level),
            signing: SigningStrategy::for_level(api_level),
            immersive: ImmersivePlan::for_level(api_level),
        };
        tracing::info!(
            %api_level,
            insets = ?capabilities.insets,
            signing = ?capabilities.signing,
            "platform capabilities detected"
        );
        capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_pie_has_nothing() {
        let caps = Capabilities::detect(ApiLevel(26));
        assert_eq!(caps.insets, InsetStrategy::NoInsetSupport);
        assert_eq!(caps.signing, SigningStrategy::LegacySignatures);
        assert!(caps.immersive.is_noop());
    }

    #[test]
    fn pie_consumes_insets() {
        let caps = Capabilities::detect(ApiLevel::P);
        assert_eq!(caps.insets, InsetStrategy::CutoutOnly);
        assert_eq!(caps.signing, SigningStrategy::CertificateLineage);
        assert_eq!(caps.immersive.inset_listener, InsetListener::ConsumeSystemAndCutout);
        assert_eq!(caps.immersive.fits_system_windows, None);
        assert!(caps.immersive.cutout_short_edges);
    }

    #[test]
    fn r_and_later_pass_insets_through() {
        let caps = Capabilities::detect(ApiLevel(34));
        assert_eq!(caps.insets, InsetStrategy::FullInsetQuery);
        assert_eq!(caps.immersive.inset_listener, InsetListener::PassThrough);
        assert_eq!(caps.immersive.fits_system_windows, Some(false));
        assert!(caps.immersive.layout_no_limits);
    }
}
