//! Capability probing for the runtime localization packages.
//!
//! Resolution is injected through [`PackageResolver`] so the probes are
//! testable without installed packages; hosts typically back it with their
//! bundler's module resolution. Probe progress is reported through
//! `tracing` debug events.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Error;

/// The full-featured runtime package.
pub const RUNTIME_PACKAGE: &str = "vue-i18n";
/// The lightweight runtime package.
pub const LITE_RUNTIME_PACKAGE: &str = "petite-vue-i18n";
/// The compatibility-bridge package.
pub const BRIDGE_PACKAGE: &str = "vue-i18n-bridge";

/// Resolves package names to installed modules.
pub trait PackageResolver {
    fn resolve(&self, package: &str) -> Option<ResolvedPackage>;
}

/// A successfully resolved package and its exposed version markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedPackage {
    /// Filesystem location the package resolved to.
    pub path: PathBuf,
    /// The modern version marker (the `VERSION` export).
    pub version: Option<String>,
    /// The legacy version marker (the `version` export).
    pub legacy_version: Option<String>,
}

/// Which of the two mutually exclusive runtime variants is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeVariant {
    Full,
    Lite,
}

impl RuntimeVariant {
    /// The package name of the detected variant.
    pub fn package(&self) -> &'static str {
        match self {
            RuntimeVariant::Full => RUNTIME_PACKAGE,
            RuntimeVariant::Lite => LITE_RUNTIME_PACKAGE,
        }
    }
}

/// Major-version bucket of the resolved runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeVersion {
    NotInstalled,
    V8,
    V9,
    Unknown,
}

/// Reports which runtime variant is installed, preferring the full variant
/// when both resolve. Fails with a configuration error naming `requester`
/// when neither is present.
pub fn check_runtime_package(
    resolver: &dyn PackageResolver,
    requester: &str,
) -> Result<RuntimeVariant, Error> {
    let full = probe(resolver, RUNTIME_PACKAGE);
    let lite = probe(resolver, LITE_RUNTIME_PACKAGE);
    if full.is_some() {
        return Ok(RuntimeVariant::Full);
    }
    if lite.is_some() {
        return Ok(RuntimeVariant::Lite);
    }
    Err(Error::MissingRuntime {
        requester: requester.to_string(),
    })
}

/// Reports whether the compatibility-bridge package is resolvable.
pub fn check_bridge_package(resolver: &dyn PackageResolver) -> bool {
    probe(resolver, BRIDGE_PACKAGE).is_some()
}

/// Classifies the installed runtime into a major-version bucket via its
/// exposed version markers.
pub fn runtime_version(resolver: &dyn PackageResolver) -> RuntimeVersion {
    let Some(package) = probe(resolver, RUNTIME_PACKAGE) else {
        return RuntimeVersion::NotInstalled;
    };
    if package
        .legacy_version
        .as_deref()
        .is_some_and(|version| version.starts_with("8."))
    {
        return RuntimeVersion::V8;
    }
    if package
        .version
        .as_deref()
        .is_some_and(|version| version.starts_with("9."))
    {
        return RuntimeVersion::V9;
    }
    RuntimeVersion::Unknown
}

fn probe(resolver: &dyn PackageResolver, package: &str) -> Option<ResolvedPackage> {
    match resolver.resolve(package) {
        Some(resolved) => {
            debug!(package, path = %resolved.path.display(), "package resolved");
            Some(resolved)
        }
        None => {
            debug!(package, "cannot find package");
            None
        }
    }
}
