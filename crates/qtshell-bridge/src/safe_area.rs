// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Safe-area resolution: the padding UI content needs to stay clear of system
// bars and display cutouts.

use qtshell_core::{ApiLevel, InsetRectangle};

use crate::traits::{TypedInsets, WindowInsetsSource};

/// How insets are queried on a given platform level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetStrategy {
    /// Nothing to query; always the zero rectangle.
    NoInsetSupport,
    /// Display-cutout safe insets only.
    CutoutOnly,
    /// Typed system-bar and cutout queries, merged per edge.
    FullInsetQuery,
}

/// Minimum API level for each strategy, highest first.
const INSET_STRATEGIES: &[(ApiLevel, InsetStrategy)] = &[
    (ApiLevel::R, InsetStrategy::FullInsetQuery),
    (ApiLevel::P, InsetStrategy::CutoutOnly),
];

impl InsetStrategy {
    pub fn for_level(level: ApiLevel) -> Self {
        INSET_STRATEGIES
            .iter()
            .find(|(min, _)| level >= *min)
            .map(|(_, strategy)| *strategy)
            .unwrap_or(InsetStrategy::NoInsetSupport)
    }

    /// Query `source` and return the safe-area insets.
    ///
    /// Absent data and failing queries both give the zero rectangle: insets
    /// are routinely missing right after a layout pass and the caller simply
    /// asks again later.
    pub fn resolve<S>(self, source: &S) -> InsetRectangle
    where
        S: WindowInsetsSource + ?Sized,
    {
        let resolved = match self {
            InsetStrategy::NoInsetSupport => return InsetRectangle::ZERO,
            InsetStrategy::CutoutOnly => source
                .display_cutout_insets()
                .map(Option::unwrap_or_default),
            InsetStrategy::FullInsetQuery => source
                .typed_insets()
                .map(|typed| typed.map(merge).unwrap_or_default()),
        };

        resolved.unwrap_or_else(|e| {
            tracing::debug!(error = %e, strategy = ?self, "inset query failed, reporting no obstruction");
            InsetRectangle::ZERO
        })
    }
}

/// Content clipped by either obstruction must avoid both.
fn merge(typed: TypedInsets) -> InsetRectangle {
    typed.system_bars.union(typed.display_cutout)
}
