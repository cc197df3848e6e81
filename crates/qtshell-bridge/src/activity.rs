// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The shell activity: receives host lifecycle callbacks and serves the
// embedded UI.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qtshell_core::error::Result;
use qtshell_core::{InsetRectangle, NavigationIntent, ShellConfig};
use qtshell_security::FingerprintSet;

use crate::capabilities::Capabilities;
use crate::pending_link::PendingLinkSlot;
use crate::traits::{EmbeddedUi, HostLifecycle, HostPlatform, LinkListener};

type ListenerSlot = Mutex<Option<Arc<dyn LinkListener>>>;

/// Bridge between one host activity and the embedded UI.
///
/// Strategies are chosen from the platform's API level when the platform is
/// bound and reused for every call afterwards.
pub struct ShellActivity {
    platform: Box<dyn HostPlatform>,
    capabilities: Capabilities,
    config: ShellConfig,
    pending: PendingLinkSlot,
    listener: ListenerSlot,
}

impl ShellActivity {
    pub fn new(platform: Box<dyn HostPlatform>, config: ShellConfig) -> Self {
        let capabilities = Capabilities::detect(platform.api_level());
        tracing::info!(platform = platform.platform_name(), "shell activity bound");
        Self {
            platform,
            capabilities,
            config,
            pending: PendingLinkSlot::new(),
            listener: Mutex::new(None),
        }
    }

    /// Shell for a recreated host activity.
    ///
    /// The OS destroys and recreates activities (rotation, process trim).
    /// The new shell binds the new platform handle and inherits this shell's
    /// unconsumed deep link; the link listener is not carried over.
    pub fn rebind(&self, platform: Box<dyn HostPlatform>, config: ShellConfig) -> ShellActivity {
        let next = ShellActivity::new(platform, config);
        let carried = self.pending.take();
        tracing::info!(link_pending = carried.is_some(), "shell activity rebound");
        if let Some(uri) = carried {
            next.pending.offer(uri);
        }
        next
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Push links that arrive via `on_new_intent` to `listener` instead of
    /// leaving them for `consume_pending_link`.
    pub fn set_link_listener(&self, listener: impl LinkListener + 'static) {
        *self.listener() = Some(Arc::new(listener));
    }

    pub fn clear_link_listener(&self) {
        *self.listener() = None;
    }

    fn listener(&self) -> MutexGuard<'_, Option<Arc<dyn LinkListener>>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Put the intent's deep link in the pending slot. Returns whether the
    /// intent carried one.
    fn store_link(&self, intent: &NavigationIntent) -> bool {
        match intent.deep_link(&self.config.view_action) {
            Some(uri) => {
                tracing::info!(uri, "deep link received");
                self.pending.offer(uri);
                true
            }
            None => {
                tracing::debug!(action = ?intent.action, "intent carries no deep link");
                false
            }
        }
    }

    /// Ask the host to re-apply insets on the configured delay schedule.
    /// Insets can arrive after the layout pass that triggered the callback.
    fn request_relayout(&self, trigger: &'static str) {
        for delay in self.config.relayout_delays() {
            if let Err(e) = self.platform.schedule_relayout(delay) {
                tracing::warn!(error = %e, trigger, "relayout request failed");
                return;
            }
        }
        tracing::debug!(
            trigger,
            requests = self.config.relayout_delays_ms.len(),
            "relayout scheduled"
        );
    }
}

impl HostLifecycle for ShellActivity {
    fn on_create(&self, launch: Option<NavigationIntent>) {
        // The UI is not running yet; a launch link waits for it to pull.
        if let Some(intent) = launch {
            self.store_link(&intent);
        }

        let plan = self.capabilities.immersive;
        if self.config.immersive && !plan.is_noop() {
            match self.platform.apply_immersive(&plan) {
                Ok(()) => tracing::info!(?plan, "immersive layout applied"),
                Err(e) => tracing::warn!(error = %e, "could not apply immersive layout"),
            }
        }
    }

    fn on_new_intent(&self, intent: NavigationIntent) {
        if !self.store_link(&intent) {
            return;
        }
        // No lock is held while the listener runs; it may call back in.
        let Some(listener) = self.listener().clone() else {
            return;
        };
        // Taken from the slot first so a pull cannot deliver it again.
        if let Some(uri) = self.pending.take() {
            listener.link_available(&uri);
        }
    }

    fn on_resume(&self) {
        self.request_relayout("resume");
    }

    fn on_window_focus_changed(&self, has_focus: bool) {
        if has_focus {
            self.request_relayout("focus");
        }
    }

    fn on_configuration_changed(&self) {
        self.request_relayout("configuration");
    }
}

impl EmbeddedUi for ShellActivity {
    fn resolve_safe_area(&self) -> InsetRectangle {
        self.capabilities.insets.resolve(&*self.platform)
    }

    fn signing_fingerprints(&self) -> Result<FingerprintSet> {
        self.capabilities.signing.fingerprints(&*self.platform)
    }

    fn consume_pending_link(&self) -> Option<String> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::ImmersivePlan;
    use crate::testing::{FakePlatform, SharedFake};
    use crate::traits::TypedInsets;
    use std::time::Duration;

    fn bind(platform: FakePlatform) -> (ShellActivity, Arc<FakePlatform>) {
        bind_with(platform, ShellConfig::default())
    }

    fn bind_with(platform: FakePlatform, config: ShellConfig) -> (ShellActivity, Arc<FakePlatform>) {
        let platform = Arc::new(platform);
        let shell = ShellActivity::new(Box::new(SharedFake(Arc::clone(&platform))), config);
        (shell, platform)
    }

    #[test]
    fn launch_link_is_consumed_once() {
        let (shell, _) = bind(FakePlatform::at_level(33));
        shell.on_create(Some(NavigationIntent::view("https://example.com/x")));

        assert_eq!(shell.consume_pending_link().as_deref(), Some("https://example.com/x"));
        assert_eq!(shell.consume_pending_link(), None);
    }

    #[test]
    fn non_view_launch_leaves_nothing_pending() {
        let (shell, _) = bind(FakePlatform::at_level(33));
        shell.on_create(Some(NavigationIntent::new(
            Some("android.intent.action.MAIN".into()),
            None,
        )));
        assert_eq!(shell.consume_pending_link(), None);
    }

    #[test]
    fn new_intent_without_listener_waits_for_pull() {
        let (shell, _) = bind(FakePlatform::at_level(30));
        shell.on_create(None);
        shell.on_new_intent(NavigationIntent::view("app://first"));
        shell.on_new_intent(NavigationIntent::view("app://second"));

        assert_eq!(shell.consume_pending_link().as_deref(), Some("app://second"));
        assert_eq!(shell.consume_pending_link(), None);
    }

    #[test]
    fn new_intent_with_listener_is_pushed_not_pulled() {
        let (shell, _) = bind(FakePlatform::at_level(30));
        let received = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&received);
        shell.set_link_listener(move |uri: &str| sink.lock().unwrap().push(uri.to_owned()));

        shell.on_new_intent(NavigationIntent::view("app://pushed"));

        assert_eq!(*received.lock().unwrap(), vec!["app://pushed".to_owned()]);
        assert_eq!(shell.consume_pending_link(), None);

        shell.clear_link_listener();
        shell.on_new_intent(NavigationIntent::view("app://pulled"));
        assert_eq!(shell.consume_pending_link().as_deref(), Some("app://pulled"));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn custom_view_action() {
        let config = ShellConfig {
            view_action: "org.qtshell.OPEN".into(),
            ..ShellConfig::default()
        };
        let (shell, _) = bind_with(FakePlatform::at_level(30), config);

        shell.on_new_intent(NavigationIntent::view("app://ignored"));
        assert_eq!(shell.consume_pending_link(), None);

        shell.on_new_intent(NavigationIntent::new(
            Some("org.qtshell.OPEN".into()),
            Some("app://custom".into()),
        ));
        assert_eq!(shell.consume_pending_link().as_deref(), Some("app://custom"));
    }

    #[test]
    fn create_applies_immersive_plan_for_level() {
        let (shell, platform) = bind(FakePlatform::at_level(31));
        shell.on_create(None);
        assert_eq!(
            platform.immersive_calls(),
            vec![ImmersivePlan::for_level(qtshell_core::ApiLevel(31))]
        );
    }

    #[test]
    fn immersive_disabled_or_unsupported_does_nothing() {
        let config = ShellConfig {
            immersive: false,
            ..ShellConfig::default()
        };
        let (shell, platform) = bind_with(FakePlatform::at_level(31), config);
        shell.on_create(None);
        assert!(platform.immersive_calls().is_empty());

        let (old, platform) = bind(FakePlatform::at_level(26));
        old.on_create(None);
        assert!(platform.immersive_calls().is_empty());
    }

    #[test]
    fn layout_events_schedule_relayouts() {
        let (shell, platform) = bind(FakePlatform::at_level(30));
        shell.on_resume();
        assert_eq!(platform.relayouts().len(), 6);
        assert_eq!(platform.relayouts()[0], Duration::from_millis(50));
        assert_eq!(platform.relayouts()[5], Duration::from_millis(2000));

        shell.on_window_focus_changed(false);
        assert_eq!(platform.relayouts().len(), 6);

        shell.on_window_focus_changed(true);
        shell.on_configuration_changed();
        assert_eq!(platform.relayouts().len(), 18);
    }

    #[test]
    fn safe_area_uses_detected_strategy() {
        let mut fake = FakePlatform::at_level(30);
        fake.typed = Some(TypedInsets {
            system_bars: InsetRectangle::new(0, 24, 0, 48),
            display_cutout: InsetRectangle::new(0, 30, 0, 0),
        });
        fake.cutout = Some(InsetRectangle::new(0, 99, 0, 0));
        let (shell, _) = bind(fake);

        assert_eq!(shell.resolve_safe_area(), InsetRectangle::new(0, 30, 0, 48));
        // Repeated polling is stable.
        assert_eq!(shell.resolve_safe_area(), InsetRectangle::new(0, 30, 0, 48));
    }

    #[test]
    fn fingerprints_use_detected_strategy() {
        let mut fake = FakePlatform::at_level(27);
        fake.legacy = vec![b"legacy-cert".to_vec()];
        let (shell, _) = bind(fake);

        let set = shell.signing_fingerprints().unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rebind_keeps_pending_link_and_redetects() {
        let (shell, _) = bind(FakePlatform::at_level(27));
        shell.on_create(Some(NavigationIntent::view("app://survives")));

        let replacement = Arc::new(FakePlatform::at_level(30));
        let shell = shell.rebind(Box::new(SharedFake(replacement)), ShellConfig::default());

        assert_eq!(shell.capabilities().insets, crate::InsetStrategy::FullInsetQuery);
        assert_eq!(shell.consume_pending_link().as_deref(), Some("app://survives"));
    }

    #[test]
    fn empty_delay_list_disables_relayout() {
        let config = ShellConfig::from_json(r#"{"relayout_delays_ms": []}"#).unwrap();
        let (shell, platform) = bind_with(FakePlatform::at_level(30), config);

        shell.on_resume();
        shell.on_window_focus_changed(true);
        shell.on_configuration_changed();
        assert!(platform.relayouts().is_empty());
    }

    #[test]
    fn listener_may_call_back_into_the_shell() {
        let (shell, _) = bind(FakePlatform::at_level(30));
        let shell = Arc::new(shell);
        let received = Arc::new(Mutex::new(Vec::<(String, Option<String>)>::new()));

        let inner = Arc::clone(&shell);
        let sink = Arc::clone(&received);
        shell.set_link_listener(move |uri: &str| {
            // Re-entrant calls must not block on the shell's own locks.
            let pulled = inner.consume_pending_link();
            inner.clear_link_listener();
            sink.lock().unwrap().push((uri.to_owned(), pulled));
        });

        shell.on_new_intent(NavigationIntent::view("app://reentrant"));
        assert_eq!(*received.lock().unwrap(), vec![("app://reentrant".to_owned(), None)]);

        // The listener removed itself, so the next link waits for a pull.
        shell.on_new_intent(NavigationIntent::view("app://next"));
        assert_eq!(shell.consume_pending_link().as_deref(), Some("app://next"));
        assert_eq!(received.lock().unwrap().len(), 1);
    }
}
