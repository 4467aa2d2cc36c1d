//! Options for one generation call.

use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    source_map::SourceMap,
    types::{Environment, TargetType},
};

/// Configuration for [`crate::codegen::Generator`] entry points.
///
/// All options are plain data; the error sink and the bridge injector are
/// bound on the generator itself. Defaults match the behavior callers get
/// from an empty options bag: plain target, development environment, strict
/// message checking on, everything else off.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Shape of the generated module.
    pub target: TargetType,
    /// Bypass the tree walk and emit a single static injection snippet
    /// (only meaningful together with [`TargetType::Sfc`]).
    pub legacy: bool,
    /// Emit the compatibility wrapper supporting two runtime versions.
    pub bridge: bool,
    /// In bridge mode, use `export default` rather than `module.exports =`.
    pub export_esm: bool,
    /// Name of the document, used as the source map source. When empty, a
    /// per-format default such as `bundle.json` is used.
    pub filename: String,
    /// An externally supplied map describing how the document itself maps
    /// to some further original file; merged maps compose through it.
    pub in_source_map: Option<SourceMap>,
    /// Locale attached to embedded registrations.
    pub locale: String,
    /// Register onto the global array rather than the component-local one.
    pub is_global: bool,
    /// Build and return a source map.
    pub source_map: bool,
    /// Development wraps message functions with their source text.
    pub env: Environment,
    /// Compile non-string scalars as messages too (stringified first).
    pub force_stringify: bool,
    /// Report embedded markup in messages through the error sink.
    pub strict_message: bool,
    /// HTML-escape messages that contain markup before compiling.
    pub escape_html: bool,
    /// Alternate embedded-target property access for class components.
    pub use_class_component: bool,
    /// JavaScript format only: allow a non-object default export and return
    /// the source unchanged instead of failing.
    pub allow_dynamic: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            target: TargetType::Plain,
            legacy: false,
            bridge: false,
            export_esm: false,
            filename: String::new(),
            in_source_map: None,
            locale: String::new(),
            is_global: false,
            source_map: false,
            env: Environment::Development,
            force_stringify: false,
            strict_message: true,
            escape_html: false,
            use_class_component: false,
            allow_dynamic: false,
        }
    }
}

impl GenerateOptions {
    /// Creates options with the default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: TargetType) -> Self {
        self.target = target;
        self
    }

    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn with_bridge(mut self, bridge: bool) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn with_export_esm(mut self, export_esm: bool) -> Self {
        self.export_esm = export_esm;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_in_source_map(mut self, map: Option<SourceMap>) -> Self {
        self.in_source_map = map;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_is_global(mut self, is_global: bool) -> Self {
        self.is_global = is_global;
        self
    }

    pub fn with_source_map(mut self, source_map: bool) -> Self {
        self.source_map = source_map;
        self
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_force_stringify(mut self, force_stringify: bool) -> Self {
        self.force_stringify = force_stringify;
        self
    }

    pub fn with_strict_message(mut self, strict_message: bool) -> Self {
        self.strict_message = strict_message;
        self
    }

    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    pub fn with_use_class_component(mut self, use_class_component: bool) -> Self {
        self.use_class_component = use_class_component;
        self
    }

    pub fn with_allow_dynamic(mut self, allow_dynamic: bool) -> Self {
        self.allow_dynamic = allow_dynamic;
        self
    }

    /// Validates cross-option constraints. A non-empty `locale` must be a
    /// well-formed Unicode language identifier.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.locale.is_empty() && self.locale.parse::<LanguageIdentifier>().is_err() {
            return Err(Error::validation_error(format!(
                "locale `{}` is not a valid language identifier",
                self.locale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GenerateOptions::new();
        assert_eq!(options.target, TargetType::Plain);
        assert_eq!(options.env, Environment::Development);
        assert!(options.strict_message);
        assert!(!options.source_map);
        assert!(!options.force_stringify);
        assert!(options.filename.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let options = GenerateOptions::new()
            .with_target(TargetType::Sfc)
            .with_locale("ja")
            .with_source_map(true)
            .with_filename("app.locale.json");
        assert_eq!(options.target, TargetType::Sfc);
        assert_eq!(options.locale, "ja");
        assert!(options.source_map);
        assert_eq!(options.filename, "app.locale.json");
    }

    #[test]
    fn test_locale_validation() {
        assert!(GenerateOptions::new().validate().is_ok());
        assert!(GenerateOptions::new().with_locale("en-US").validate().is_ok());
        assert!(GenerateOptions::new().with_locale("not a locale").validate().is_err());
    }
}
