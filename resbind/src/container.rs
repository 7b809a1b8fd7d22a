//! Platform decorations applied to the container as a whole.

use std::collections::BTreeMap;
use std::fmt;

use crate::code::{Import, Member, string_literal};
use crate::emitter::EmitContext;
use crate::platform::Platform;

/// Container-wide scaffolding for one platform.
pub trait PlatformContainerEmitter {
    /// Platform served by the emitter.
    fn platform(&self) -> Platform;

    /// Symbols the scaffolding references.
    fn imports(&self, _ctx: &EmitContext<'_>) -> Vec<Import> {
        Vec::new()
    }

    /// Members declared before the nested resource objects.
    fn before_types(&self, _ctx: &EmitContext<'_>) -> Vec<Member> {
        Vec::new()
    }
}

/// Loads the resource bundle once per container.
///
/// The loadable companion bundle is tried first, then the main bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppleContainerEmitter;

impl PlatformContainerEmitter for AppleContainerEmitter {
    fn platform(&self) -> Platform {
        Platform::Apple
    }

    fn imports(&self, _ctx: &EmitContext<'_>) -> Vec<Import> {
        vec![
            Import::new("platform.Foundation", "NSBundle"),
            Import::new("resbind.runtime.utils", "loadableBundle"),
        ]
    }

    fn before_types(&self, ctx: &EmitContext<'_>) -> Vec<Member> {
        let identifier = string_literal(&ctx.settings.bundle_identifier());
        vec![Member::new(
            "bundle",
            format!(
                "private val bundle: NSBundle by lazy {{\n    NSBundle.loadableBundle({identifier}) ?: NSBundle.mainBundle\n}}"
            ),
        )]
    }
}

/// Exposes the class loader that owns the packaged resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct JvmContainerEmitter;

impl PlatformContainerEmitter for JvmContainerEmitter {
    fn platform(&self) -> Platform {
        Platform::Jvm
    }

    fn before_types(&self, ctx: &EmitContext<'_>) -> Vec<Member> {
        vec![Member::new(
            "resourcesClassLoader",
            format!(
                "private val resourcesClassLoader: ClassLoader\n    get() = {}::class.java.classLoader",
                ctx.class_name()
            ),
        )]
    }
}

/// Imports the generated `R` class.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidContainerEmitter;

impl PlatformContainerEmitter for AndroidContainerEmitter {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn imports(&self, ctx: &EmitContext<'_>) -> Vec<Import> {
        vec![Import::new(ctx.settings.android_r_class_package(), "R")]
    }
}

/// JS containers need no scaffolding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsContainerEmitter;

impl PlatformContainerEmitter for JsContainerEmitter {
    fn platform(&self) -> Platform {
        Platform::Js
    }
}

/// Container emitters keyed by platform.
#[derive(Default)]
pub struct ContainerRegistry {
    emitters: BTreeMap<Platform, Box<dyn PlatformContainerEmitter>>,
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.emitters.keys()).finish()
    }
}

impl ContainerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in emitter of every platform.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(AndroidContainerEmitter);
        registry.register(AppleContainerEmitter);
        registry.register(JvmContainerEmitter);
        registry.register(JsContainerEmitter);
        registry
    }

    /// Registers `emitter` for its platform, replacing any previous one.
    pub fn register(&mut self, emitter: impl PlatformContainerEmitter + 'static) {
        self.emitters.insert(emitter.platform(), Box::new(emitter));
    }

    /// Emitter for `platform`, if one is registered.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&dyn PlatformContainerEmitter> {
        self.emitters.get(&platform).map(|emitter| &**emitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{OutputDirs, Settings};
    use camino::Utf8Path;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> Settings {
        Settings::new("com.example", OutputDirs::under(Utf8Path::new("out")))
    }

    #[rstest]
    fn apple_bundle_falls_back_to_main_bundle(settings: Settings) {
        let ctx = EmitContext::new(&settings, "iosMain");

        let members = AppleContainerEmitter.before_types(&ctx);

        assert_eq!(
            members,
            vec![Member::new(
                "bundle",
                "private val bundle: NSBundle by lazy {\n    NSBundle.loadableBundle(\"com.example.MR\") ?: NSBundle.mainBundle\n}"
            )]
        );
    }

    #[rstest]
    fn android_imports_configured_r_class(mut settings: Settings) {
        settings.android_r_class_package = Some("com.example.android".to_owned());
        let ctx = EmitContext::new(&settings, "androidMain");

        assert_eq!(
            AndroidContainerEmitter.imports(&ctx),
            vec![Import::new("com.example.android", "R")]
        );
    }

    #[rstest]
    fn standard_registry_has_every_platform() {
        let registry = ContainerRegistry::standard();
        for platform in Platform::ALL {
            let emitter = registry.get(platform).expect("registered");
            assert_eq!(emitter.platform(), platform);
        }
    }
}
