// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI entry points for `org.qtshell.ShellActivity`.
//
// Java declarations:
//
//   native void nativeOnCreate(String configJson, String action, String data);
//   native void nativeOnNewIntent(String action, String data);
//   native void nativeOnResume();
//   native void nativeOnWindowFocusChanged(boolean hasFocus);
//   native void nativeOnConfigurationChanged();
//   native Rect nativeGetSafeArea();
//   native String[] nativeGetSigningCertSha256();
//   native String nativeConsumePendingLink();
//
// All are instance methods; the receiving activity arrives as the second
// argument. The process-wide lock is only held to fetch or replace the shell,
// so Java may call back in from `onDeepLink` or any other upcall.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jni::JNIEnv;
use jni::objects::{JObject, JObjectArray, JString, JValue};
use jni::sys::{JNI_FALSE, jboolean, jobject, jobjectArray, jsize, jstring};

use qtshell_core::error::{BridgeError, Result};
use qtshell_core::{InsetRectangle, NavigationIntent, ShellConfig};

use super::{AndroidPlatform, jni_call};
use crate::activity::ShellActivity;
use crate::logging;
use crate::traits::{EmbeddedUi, HostLifecycle};

/// The shell for the process. It is replaced when the OS recreates the
/// activity; the pending deep link is carried into the replacement.
static SHELL: Mutex<Option<Arc<ShellActivity>>> = Mutex::new(None);

fn shell_slot() -> MutexGuard<'static, Option<Arc<ShellActivity>>> {
    SHELL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn current_shell() -> Option<Arc<ShellActivity>> {
    shell_slot().clone()
}

fn with_shell<T>(entry: &str, f: impl FnOnce(&ShellActivity) -> T) -> Option<T> {
    match current_shell() {
        Some(shell) => Some(f(&shell)),
        None => {
            tracing::warn!(entry, "shell called before nativeOnCreate");
            None
        }
    }
}

/// A nullable Java string as an `Option`.
fn optional_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match env.get_string(value) {
        Ok(s) => Some(s.into()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read Java string argument");
            None
        }
    }
}

fn new_rect<'local>(env: &mut JNIEnv<'local>, rect: InsetRectangle) -> Result<JObject<'local>> {
    let to_jint = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
    jni_call(env, "new Rect", |env| {
        env.new_object(
            "android/graphics/Rect",
            "(IIII)V",
            &[
                JValue::Int(to_jint(rect.left)),
                JValue::Int(to_jint(rect.top)),
                JValue::Int(to_jint(rect.right)),
                JValue::Int(to_jint(rect.bottom)),
            ],
        )
    })
}

fn string_array<'local>(env: &mut JNIEnv<'local>, values: &[String]) -> Result<JObjectArray<'local>> {
    let len = jsize::try_from(values.len())
        .map_err(|_| BridgeError::Jni(format!("{} strings do not fit a Java array", values.len())))?;
    let array = jni_call(env, "new String[]", |env| {
        env.new_object_array(len, "java/lang/String", JObject::null())
    })?;
    for (index, value) in (0..len).zip(values) {
        let element = jni_call(env, "new_string", |env| env.new_string(value))?;
        jni_call(env, "SetObjectArrayElement", |env| {
            env.set_object_array_element(&array, index, &element)
        })?;
    }
    Ok(array)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeOnCreate<'local>(
    mut env: JNIEnv<'local>,
    activity: JObject<'local>,
    config_json: JString<'local>,
    action: JString<'local>,
    data: JString<'local>,
) {
    let parsed = optional_string(&mut env, &config_json)
        .map(|json| ShellConfig::from_json(&json))
        .unwrap_or_else(|| Ok(ShellConfig::default()));
    let config = match parsed {
        Ok(config) => {
            logging::init(&config.log_filter);
            config
        }
        Err(e) => {
            let config = ShellConfig::default();
            logging::init(&config.log_filter);
            tracing::warn!(error = %e, "invalid shell configuration, using defaults");
            config
        }
    };

    let platform = match AndroidPlatform::from_jni(&mut env, &activity) {
        Ok(platform) => platform,
        Err(e) => {
            tracing::error!(error = %e, "cannot bind the Android platform");
            return;
        }
    };
    let forwarder = match platform.link_forwarder() {
        Ok(forwarder) => Some(forwarder),
        Err(e) => {
            tracing::warn!(error = %e, "deep links will only be delivered on request");
            None
        }
    };
    let launch = NavigationIntent::new(
        optional_string(&mut env, &action),
        optional_string(&mut env, &data),
    );

    let shell = match current_shell() {
        Some(previous) => previous.rebind(Box::new(platform), config),
        None => ShellActivity::new(Box::new(platform), config),
    };
    if let Some(forwarder) = forwarder {
        shell.set_link_listener(forwarder);
    }
    let shell = Arc::new(shell);
    *shell_slot() = Some(Arc::clone(&shell));
    shell.on_create(Some(launch));
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeOnNewIntent<'local>(
    mut env: JNIEnv<'local>,
    _activity: JObject<'local>,
    action: JString<'local>,
    data: JString<'local>,
) {
    let intent = NavigationIntent::new(
        optional_string(&mut env, &action),
        optional_string(&mut env, &data),
    );
    with_shell("nativeOnNewIntent", |shell| shell.on_new_intent(intent));
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeOnResume<'local>(
    _env: JNIEnv<'local>,
    _activity: JObject<'local>,
) {
    with_shell("nativeOnResume", |shell| shell.on_resume());
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeOnWindowFocusChanged<'local>(
    _env: JNIEnv<'local>,
    _activity: JObject<'local>,
    has_focus: jboolean,
) {
    with_shell("nativeOnWindowFocusChanged", |shell| {
        shell.on_window_focus_changed(has_focus != JNI_FALSE)
    });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeOnConfigurationChanged<'local>(
    _env: JNIEnv<'local>,
    _activity: JObject<'local>,
) {
    with_shell("nativeOnConfigurationChanged", |shell| {
        shell.on_configuration_changed()
    });
}

// ---------------------------------------------------------------------------
// Embedded UI accessors
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeGetSafeArea<'local>(
    mut env: JNIEnv<'local>,
    _activity: JObject<'local>,
) -> jobject {
    let rect = with_shell("nativeGetSafeArea", |shell| shell.resolve_safe_area())
        .unwrap_or(InsetRectangle::ZERO);
    match new_rect(&mut env, rect) {
        Ok(obj) => obj.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "failed to build android.graphics.Rect");
            JObject::null().into_raw()
        }
    }
}

/// Throws `IllegalStateException` and returns null when the package
/// registry lookup fails.
#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeGetSigningCertSha256<'local>(
    mut env: JNIEnv<'local>,
    _activity: JObject<'local>,
) -> jobjectArray {
    let fingerprints = with_shell("nativeGetSigningCertSha256", |shell| {
        shell.signing_fingerprints()
    })
    .unwrap_or_else(|| Err(BridgeError::Lookup("shell activity not created".into())));

    let result = fingerprints.and_then(|set| string_array(&mut env, &set.to_hex_strings()));
    match result {
        Ok(array) => array.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "signing fingerprints unavailable");
            if let Err(throw_err) = env.throw_new("java/lang/IllegalStateException", e.to_string()) {
                tracing::error!(error = %throw_err, "failed to raise IllegalStateException");
            }
            JObject::null().into_raw()
        }
    }
}

/// Returns the empty string when no link is pending.
#[unsafe(no_mangle)]
pub extern "system" fn Java_org_qtshell_ShellActivity_nativeConsumePendingLink<'local>(
    env: JNIEnv<'local>,
    _activity: JObject<'local>,
) -> jstring {
    let link = with_shell("nativeConsumePendingLink", |shell| shell.consume_pending_link())
        .flatten()
        .unwrap_or_default();
    match env.new_string(&link) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "failed to return pending link");
            JObject::null().into_raw()
        }
    }
}
