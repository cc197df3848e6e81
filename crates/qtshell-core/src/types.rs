// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the qtshell bridge.

/// Intent action that carries a deep link (`Intent.ACTION_VIEW`).
pub const ACTION_VIEW: &str = "android.intent.action.VIEW";

/// Android SDK level of the running device (`Build.VERSION.SDK_INT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiLevel(pub u32);

impl ApiLevel {
    /// Android 9. Display cutouts and signing-certificate lineage.
    pub const P: ApiLevel = ApiLevel(28);
    /// Android 11. Typed `WindowInsets` queries.
    pub const R: ApiLevel = ApiLevel(30);

    /// Converts the raw `jint` reported by the platform. Negative values
    /// cannot occur on a real device and are treated as level 0.
    pub fn from_raw(sdk_int: i32) -> Self {
        Self(u32::try_from(sdk_int).unwrap_or(0))
    }
}

impl std::fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API {}", self.0)
    }
}

/// Padding, in pixels, that UI content must keep from each window edge.
///
/// All zeros means no obstruction was detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InsetRectangle {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl InsetRectangle {
    pub const ZERO: InsetRectangle = InsetRectangle {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a rectangle from raw platform values, clamping negatives to 0.
    pub fn from_platform(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let clamp = |v: i32| u32::try_from(v).unwrap_or(0);
        Self::new(clamp(left), clamp(top), clamp(right), clamp(bottom))
    }

    /// Per-edge maximum: the area clear of both obstructions.
    pub fn union(self, other: InsetRectangle) -> InsetRectangle {
        InsetRectangle {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// The action/data pair of an Android `Intent` as seen by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationIntent {
    pub action: Option<String>,
    pub data: Option<String>,
}

impl NavigationIntent {
    pub fn new(action: Option<String>, data: Option<String>) -> Self {
        Self { action, data }
    }

    /// Shorthand for a VIEW intent carrying `uri`.
    pub fn view(uri: impl Into<String>) -> Self {
        Self {
            action: Some(ACTION_VIEW.to_owned()),
            data: Some(uri.into()),
        }
    }

    /// The deep link carried by this intent, if its action is `view_action`
    /// and it has a data string.
    pub fn deep_link(&self, view_action: &str) -> Option<&str> {
        match (self.action.as_deref(), self.data.as_deref()) {
            (Some(action), Some(uri)) if action == view_action => Some(uri),
            _ => None,
        }
    }
}
