// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android host platform via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Window-inset and package-registry queries are
// plain synchronous JNI calls into the ART runtime.
//
// ## Architecture notes
//
// Two things cannot be done from native code without a Java object to hand
// to the framework: an `OnApplyWindowInsetsListener` and a delayed
// `Runnable`. The Java shell (`org.qtshell.ShellActivity`) provides them:
//
//   void installInsetListener(boolean consume)
//   void scheduleRelayout(long delayMs)
//   void onDeepLink(String uri)
//
// The shell's lifecycle overrides call the `native*` entry points in
// `exports`.

#![cfg(target_os = "android")]

pub mod exports;

use std::time::Duration;

use jni::objects::{GlobalRef, JByteArray, JObject, JObjectArray, JString, JValue};
use jni::{JNIEnv, JavaVM};

use qtshell_core::error::{BridgeError, Result};
use qtshell_core::{ApiLevel, InsetRectangle};

use crate::capabilities::{ImmersivePlan, InsetListener};
use crate::signing::into_lookup;
use crate::traits::*;

// ---------------------------------------------------------------------------
// Framework constants
// ---------------------------------------------------------------------------

/// `WindowManager.LayoutParams.FLAG_LAYOUT_NO_LIMITS`.
const FLAG_LAYOUT_NO_LIMITS: i32 = 0x0000_0200;

/// `WindowManager.LayoutParams.LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES`.
const LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES: i32 = 1;

/// `PackageManager.GET_SIGNATURES`.
const GET_SIGNATURES: i32 = 0x0000_0040;

/// `PackageManager.GET_SIGNING_CERTIFICATES`.
const GET_SIGNING_CERTIFICATES: i32 = 0x0800_0000;

// ---------------------------------------------------------------------------
// JNI helpers
// ---------------------------------------------------------------------------

/// Convenience: map any `jni::errors::Error` into `BridgeError::Jni`.
fn jni_err(context: &str, e: jni::errors::Error) -> BridgeError {
    BridgeError::Jni(format!("{context}: {e}"))
}

/// Run one JNI operation, clearing any Java exception it raised so the
/// thread can keep making calls.
fn jni_call<'local, T, F>(env: &mut JNIEnv<'local>, context: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut JNIEnv<'local>) -> jni::errors::Result<T>,
{
    f(&mut *env).map_err(|e| {
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_clear();
        }
        jni_err(context, e)
    })
}

fn object_method<'local>(
    env: &mut JNIEnv<'local>,
    target: &JObject<'_>,
    name: &str,
    sig: &str,
) -> Result<JObject<'local>> {
    jni_call(env, name, |env| env.call_method(target, name, sig, &[])?.l())
}

fn int_method(env: &mut JNIEnv<'_>, target: &JObject<'_>, name: &str) -> Result<i32> {
    jni_call(env, name, |env| env.call_method(target, name, "()I", &[])?.i())
}

fn int_field(env: &mut JNIEnv<'_>, target: &JObject<'_>, name: &str) -> Result<i32> {
    jni_call(env, name, |env| env.get_field(target, name, "I")?.i())
}

fn java_string(env: &mut JNIEnv<'_>, value: JObject<'_>) -> Result<String> {
    let value = JString::from(value);
    jni_call(env, "GetStringUTFChars", |env| {
        env.get_string(&value).map(String::from)
    })
}

/// `Build.VERSION.SDK_INT`.
fn sdk_int(env: &mut JNIEnv<'_>) -> Result<ApiLevel> {
    let raw = jni_call(env, "Build.VERSION.SDK_INT", |env| {
        env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")?
            .i()
    })?;
    Ok(ApiLevel::from_raw(raw))
}

fn decor_view<'local>(env: &mut JNIEnv<'local>, activity: &JObject<'_>) -> Result<JObject<'local>> {
    let window = object_method(env, activity, "getWindow", "()Landroid/view/Window;")?;
    if window.is_null() {
        return Err(BridgeError::Jni("getWindow: activity has no window".into()));
    }
    object_method(env, &window, "getDecorView", "()Landroid/view/View;")
}

/// `getWindow().getDecorView().getRootWindowInsets()`, `None` before the
/// view is attached.
fn root_window_insets<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
) -> Result<Option<JObject<'local>>> {
    let decor = decor_view(env, activity)?;
    let insets = object_method(
        env,
        &decor,
        "getRootWindowInsets",
        "()Landroid/view/WindowInsets;",
    )?;
    Ok((!insets.is_null()).then_some(insets))
}

/// `WindowInsets.getInsets(typeMask)` as a rectangle.
fn insets_of_type(env: &mut JNIEnv<'_>, insets: &JObject<'_>, type_mask: i32) -> Result<InsetRectangle> {
    let value = jni_call(env, "WindowInsets.getInsets", |env| {
        env.call_method(
            insets,
            "getInsets",
            "(I)Landroid/graphics/Insets;",
            &[JValue::Int(type_mask)],
        )?
        .l()
    })?;
    Ok(InsetRectangle::from_platform(
        int_field(env, &value, "left")?,
        int_field(env, &value, "top")?,
        int_field(env, &value, "right")?,
        int_field(env, &value, "bottom")?,
    ))
}

/// `WindowInsets.Type.<name>()`.
fn inset_type(env: &mut JNIEnv<'_>, name: &str) -> Result<i32> {
    jni_call(env, name, |env| {
        env.call_static_method("android/view/WindowInsets$Type", name, "()I", &[])?
            .i()
    })
}

/// `getPackageManager().getPackageInfo(package, flags)`.
fn package_info<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
    package: &str,
    flags: i32,
) -> Result<JObject<'local>> {
    let package_manager = object_method(
        env,
        activity,
        "getPackageManager",
        "()Landroid/content/pm/PackageManager;",
    )?;
    let j_package = jni_call(env, "new_string(package)", |env| env.new_string(package))?;
    let info = jni_call(env, "PackageManager.getPackageInfo", |env| {
        env.call_method(
            &package_manager,
            "getPackageInfo",
            "(Ljava/lang/String;I)Landroid/content/pm/PackageInfo;",
            &[JValue::Object(&j_package), JValue::Int(flags)],
        )?
        .l()
    })?;
    if info.is_null() {
        return Err(BridgeError::Lookup(format!("no PackageInfo for {package}")));
    }
    Ok(info)
}

/// `Signature[]` to raw certificate bytes. A null array is empty.
fn signature_blobs(env: &mut JNIEnv<'_>, signatures: JObject<'_>) -> Result<Vec<Vec<u8>>> {
    if signatures.is_null() {
        return Ok(Vec::new());
    }
    let signatures = JObjectArray::from(signatures);
    let len = jni_call(env, "GetArrayLength", |env| env.get_array_length(&signatures))?;

    let mut blobs = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    for index in 0..len {
        let signature = jni_call(env, "GetObjectArrayElement", |env| {
            env.get_object_array_element(&signatures, index)
        })?;
        if signature.is_null() {
            continue;
        }
        let bytes = object_method(env, &signature, "toByteArray", "()[B")?;
        let bytes = JByteArray::from(bytes);
        blobs.push(jni_call(env, "convert_byte_array", |env| {
            env.convert_byte_array(&bytes)
        })?);
    }
    Ok(blobs)
}

// ---------------------------------------------------------------------------
// Platform struct
// ---------------------------------------------------------------------------

/// Android implementation of the shell's host platform.
///
/// Holds a global reference to the hosting activity; every query attaches
/// the calling thread (a no-op on the UI thread) and goes through JNI.
pub struct AndroidPlatform {
    vm: JavaVM,
    activity: GlobalRef,
    api_level: ApiLevel,
}

impl AndroidPlatform {
    /// Bind to the activity passed into a JNI entry point.
    pub fn from_jni(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self> {
        let vm = env.get_java_vm().map_err(|e| jni_err("GetJavaVM", e))?;
        let activity = env
            .new_global_ref(activity)
            .map_err(|e| jni_err("NewGlobalRef(activity)", e))?;
        let api_level = sdk_int(env)?;
        Ok(Self {
            vm,
            activity,
            api_level,
        })
    }

    /// Bind to the activity registered in `ndk-context`.
    pub fn from_ndk_context() -> Result<Self> {
        let ctx = ndk_context::android_context();
        if ctx.context().is_null() {
            return Err(BridgeError::Jni(
                "Android context is null: native activity not initialised".into(),
            ));
        }
        // SAFETY: `ctx.vm()` is the `JavaVM*` set by the NDK glue code and
        // stays valid for the lifetime of the process.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
            .map_err(|e| jni_err("failed to obtain JavaVM", e))?;

        let (activity, api_level) = {
            let mut env = vm
                .attach_current_thread()
                .map_err(|e| jni_err("failed to attach JNI thread", e))?;
            // SAFETY: the NDK guarantees this pointer is a valid global
            // jobject for the hosting Activity.
            let raw = unsafe { JObject::from_raw(ctx.context().cast()) };
            let activity = env
                .new_global_ref(&raw)
                .map_err(|e| jni_err("NewGlobalRef(activity)", e))?;
            (activity, sdk_int(&mut env)?)
        };

        Ok(Self {
            vm,
            activity,
            api_level,
        })
    }

    fn with_env<T>(&self, f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|e| jni_err("failed to attach JNI thread", e))?;
        f(&mut env, self.activity.as_obj())
    }

    /// A listener that forwards pushed deep links to `onDeepLink(String)`
    /// on the same activity.
    pub fn link_forwarder(&self) -> Result<JavaLinkForwarder> {
        let vm = self.with_env(|env, _| env.get_java_vm().map_err(|e| jni_err("GetJavaVM", e)))?;
        Ok(JavaLinkForwarder {
            vm,
            activity: self.activity.clone(),
        })
    }
}

impl HostPlatform for AndroidPlatform {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn api_level(&self) -> ApiLevel {
        self.api_level
    }
}

// ---------------------------------------------------------------------------
// WindowInsetsSource: android.view.WindowInsets
// ---------------------------------------------------------------------------

impl WindowInsetsSource for AndroidPlatform {
    fn display_cutout_insets(&self) -> Result<Option<InsetRectangle>> {
        self.with_env(|env, activity| {
            let Some(insets) = root_window_insets(env, activity)? else {
                return Ok(None);
            };
            let cutout = object_method(
                env,
                &insets,
                "getDisplayCutout",
                "()Landroid/view/DisplayCutout;",
            )?;
            if cutout.is_null() {
                return Ok(None);
            }
            Ok(Some(InsetRectangle::from_platform(
                int_method(env, &cutout, "getSafeInsetLeft")?,
                int_method(env, &cutout, "getSafeInsetTop")?,
                int_method(env, &cutout, "getSafeInsetRight")?,
                int_method(env, &cutout, "getSafeInsetBottom")?,
            )))
        })
    }

    fn typed_insets(&self) -> Result<Option<TypedInsets>> {
        self.with_env(|env, activity| {
            let Some(insets) = root_window_insets(env, activity)? else {
                return Ok(None);
            };
            let bars = inset_type(env, "statusBars")? | inset_type(env, "navigationBars")?;
            let cutout = inset_type(env, "displayCutout")?;
            Ok(Some(TypedInsets {
                system_bars: insets_of_type(env, &insets, bars)?,
                display_cutout: insets_of_type(env, &insets, cutout)?,
            }))
        })
    }
}

// ---------------------------------------------------------------------------
// PackageRegistry: android.content.pm.PackageManager
// ---------------------------------------------------------------------------

impl PackageRegistry for AndroidPlatform {
    fn package_name(&self) -> Result<String> {
        self.with_env(|env, activity| {
            let name = object_method(env, activity, "getPackageName", "()Ljava/lang/String;")?;
            if name.is_null() {
                return Err(BridgeError::Lookup("getPackageName returned null".into()));
            }
            java_string(env, name)
        })
        .map_err(into_lookup)
    }

    fn signing_info(&self, package: &str) -> Result<Option<SigningInfo>> {
        self.with_env(|env, activity| {
            let info = package_info(env, activity, package, GET_SIGNING_CERTIFICATES)?;
            let signing = jni_call(env, "PackageInfo.signingInfo", |env| {
                env.get_field(&info, "signingInfo", "Landroid/content/pm/SigningInfo;")?
                    .l()
            })?;
            if signing.is_null() {
                return Ok(None);
            }

            let has_multiple_signers = jni_call(env, "SigningInfo.hasMultipleSigners", |env| {
                env.call_method(&signing, "hasMultipleSigners", "()Z", &[])?
                    .z()
            })?;
            let contents = object_method(
                env,
                &signing,
                "getApkContentsSigners",
                "()[Landroid/content/pm/Signature;",
            )?;
            let history = object_method(
                env,
                &signing,
                "getSigningCertificateHistory",
                "()[Landroid/content/pm/Signature;",
            )?;

            Ok(Some(SigningInfo {
                has_multiple_signers,
                apk_contents_signers: signature_blobs(env, contents)?,
                signing_certificate_history: signature_blobs(env, history)?,
            }))
        })
        .map_err(into_lookup)
    }

    fn legacy_signatures(&self, package: &str) -> Result<Vec<Vec<u8>>> {
        self.with_env(|env, activity| {
            let info = package_info(env, activity, package, GET_SIGNATURES)?;
            let signatures = jni_call(env, "PackageInfo.signatures", |env| {
                env.get_field(&info, "signatures", "[Landroid/content/pm/Signature;")?
                    .l()
            })?;
            signature_blobs(env, signatures)
        })
        .map_err(into_lookup)
    }
}

// ---------------------------------------------------------------------------
// HostWindow: android.view.Window
// ---------------------------------------------------------------------------

impl HostWindow for AndroidPlatform {
    fn apply_immersive(&self, plan: &ImmersivePlan) -> Result<()> {
        self.with_env(|env, activity| {
            let window = object_method(env, activity, "getWindow", "()Landroid/view/Window;")?;
            if window.is_null() {
                return Err(BridgeError::Jni("getWindow: activity has no window".into()));
            }

            if plan.layout_no_limits {
                jni_call(env, "Window.setFlags", |env| {
                    env.call_method(
                        &window,
                        "setFlags",
                        "(II)V",
                        &[
                            JValue::Int(FLAG_LAYOUT_NO_LIMITS),
                            JValue::Int(FLAG_LAYOUT_NO_LIMITS),
                        ],
                    )
                })?;
            }

            if plan.cutout_short_edges {
                let attrs = object_method(
                    env,
                    &window,
                    "getAttributes",
                    "()Landroid/view/WindowManager$LayoutParams;",
                )?;
                jni_call(env, "LayoutParams.layoutInDisplayCutoutMode", |env| {
                    env.set_field(
                        &attrs,
                        "layoutInDisplayCutoutMode",
                        "I",
                        JValue::Int(LAYOUT_IN_DISPLAY_CUTOUT_MODE_SHORT_EDGES),
                    )
                })?;
                jni_call(env, "Window.setAttributes", |env| {
                    env.call_method(
                        &window,
                        "setAttributes",
                        "(Landroid/view/WindowManager$LayoutParams;)V",
                        &[JValue::Object(&attrs)],
                    )
                })?;
            }

            if let Some(fits) = plan.fits_system_windows {
                let decor = object_method(env, &window, "getDecorView", "()Landroid/view/View;")?;
                jni_call(env, "View.setFitsSystemWindows", |env| {
                    env.call_method(
                        &decor,
                        "setFitsSystemWindows",
                        "(Z)V",
                        &[JValue::Bool(u8::from(fits))],
                    )
                })?;
            }

            let consume = match plan.inset_listener {
                InsetListener::Untouched => return Ok(()),
                InsetListener::ConsumeSystemAndCutout => true,
                InsetListener::PassThrough => false,
            };
            jni_call(env, "ShellActivity.installInsetListener", |env| {
                env.call_method(
                    activity,
                    "installInsetListener",
                    "(Z)V",
                    &[JValue::Bool(u8::from(consume))],
                )
            })?;
            Ok(())
        })
    }

    fn schedule_relayout(&self, delay: Duration) -> Result<()> {
        let delay_ms = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
        self.with_env(|env, activity| {
            jni_call(env, "ShellActivity.scheduleRelayout", |env| {
                env.call_method(activity, "scheduleRelayout", "(J)V", &[JValue::Long(delay_ms)])
            })?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Link forwarding: ShellActivity.onDeepLink(String)
// ---------------------------------------------------------------------------

/// Pushes deep links to the Java shell, which hands them to Qt.
pub struct JavaLinkForwarder {
    vm: JavaVM,
    activity: GlobalRef,
}

impl JavaLinkForwarder {
    fn forward(&self, uri: &str) -> Result<()> {
        let mut guard = self
            .vm
            .attach_current_thread()
            .map_err(|e| jni_err("failed to attach JNI thread", e))?;
        let env: &mut JNIEnv<'_> = &mut guard;
        let j_uri = jni_call(env, "new_string(uri)", |env| env.new_string(uri))?;
        jni_call(env, "ShellActivity.onDeepLink", |env| {
            env.call_method(
                self.activity.as_obj(),
                "onDeepLink",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&j_uri)],
            )
        })?;
        Ok(())
    }
}

impl LinkListener for JavaLinkForwarder {
    fn link_available(&self, uri: &str) {
        if let Err(e) = self.forward(uri) {
            tracing::error!(error = %e, uri, "failed to forward deep link to the shell");
        }
    }
}
