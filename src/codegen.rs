//! Tree-to-code generation.
//!
//! [`Generator`] binds the external collaborators (message compiler, error
//! sink, bridge injector) and exposes one entry point per document format.
//! All formats share one walker over the parsed document tree: it emits the
//! module preamble, re-serializes containers with the separator discipline,
//! compiles every string leaf through the message adapter, and records the
//! key/index path for error attribution. Legacy mode bypasses the walk and
//! emits a single static injection snippet.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{self, ArrayNode, Document, Node, ObjectNode, Property, RawNode, Scalar, ScalarNode},
    emitter::CodeGenerator,
    error::Error,
    formats::{self, FormatType, javascript::ExportKind},
    message::{MessageCompiler, generate_message_function},
    options::GenerateOptions,
    source_map::{Mapping, Position, SourceMap, SourceMapGenerator, merge_source_maps},
    types::{Diagnostic, Generated, Location, TargetType},
};

const COMPONENT_NAMESPACE: &str = "_Component";

/// Generates executable module code from locale resource documents.
///
/// One generator can serve many documents; each call constructs its own
/// emission context, so nothing is shared between invocations.
///
/// # Example
/// ```rust,ignore
/// let mut generator = Generator::new(&compiler)
///     .with_error_sink(|diagnostic| eprintln!("{diagnostic}"));
/// let generated = generator.generate_json(source, &GenerateOptions::new())?;
/// ```
pub struct Generator<'c> {
    compiler: &'c dyn MessageCompiler,
    on_error: Option<Box<dyn FnMut(Diagnostic) + 'c>>,
    injector: Option<Box<dyn Fn() -> String + 'c>>,
}

impl<'c> Generator<'c> {
    pub fn new(compiler: &'c dyn MessageCompiler) -> Self {
        Generator {
            compiler,
            on_error: None,
            injector: None,
        }
    }

    /// Receives every per-message diagnostic. Without a sink, leaf-level
    /// compilation problems are silently swallowed and generation still
    /// produces degraded output.
    pub fn with_error_sink(mut self, sink: impl FnMut(Diagnostic) + 'c) -> Self {
        self.on_error = Some(Box::new(sink));
        self
    }

    /// Supplies the bridge token pushed onto the compatibility array when
    /// generating in bridge mode.
    pub fn with_injector(mut self, injector: impl Fn() -> String + 'c) -> Self {
        self.injector = Some(Box::new(injector));
        self
    }

    /// Generates module code from a JSON resource document.
    pub fn generate_json(
        &mut self,
        source: &str,
        options: &GenerateOptions,
    ) -> Result<Generated, Error> {
        options.validate()?;
        let filename = effective_filename(options, FormatType::Json);
        debug!(filename = %filename, "generating module from JSON resource");
        let document = formats::json::parse(source, &filename)?;
        self.generate_document(source, document, options, &filename)
    }

    /// Generates module code from a YAML resource document.
    pub fn generate_yaml(
        &mut self,
        source: &str,
        options: &GenerateOptions,
    ) -> Result<Generated, Error> {
        options.validate()?;
        let filename = effective_filename(options, FormatType::Yaml);
        debug!(filename = %filename, "generating module from YAML resource");
        let document = formats::yaml::parse(source, &filename)?;
        self.generate_document(source, document, options, &filename)
    }

    /// Generates module code from a restricted JavaScript module.
    ///
    /// Fails with [`Error::ObjectDefaultExportRequired`] when the module
    /// has no object-literal default export, unless `allow_dynamic` permits
    /// function exports; those return the source unchanged, passing any
    /// input map through.
    pub fn generate_javascript(
        &mut self,
        source: &str,
        options: &GenerateOptions,
    ) -> Result<Generated, Error> {
        options.validate()?;
        let filename = effective_filename(options, FormatType::JavaScript);
        debug!(filename = %filename, "generating module from JavaScript resource");
        let scan = formats::javascript::parse(source, &filename)?;
        match scan.export {
            Some(ExportKind::Object) => {
                let document = scan.document.expect("object exports carry a document");
                self.generate_document(source, document, options, &filename)
            }
            Some(kind) if options.allow_dynamic => {
                debug!(?kind, "passing dynamic resource module through unchanged");
                Ok(Generated {
                    ast: Document {
                        root: Node::Raw(RawNode {
                            code: source.to_string(),
                            loc: Location::new(1, 1, 0),
                        }),
                    },
                    code: source.to_string(),
                    map: options.in_source_map.clone(),
                })
            }
            Some(_) => Err(Error::ObjectDefaultExportRequired),
            None if options.allow_dynamic => Err(Error::DefaultExportRequired),
            None => Err(Error::ObjectDefaultExportRequired),
        }
    }

    /// Dispatches on the extension of `options.filename`.
    pub fn generate_auto(
        &mut self,
        source: &str,
        options: &GenerateOptions,
    ) -> Result<Generated, Error> {
        match formats::infer_format_from_extension(&options.filename)? {
            FormatType::Json => self.generate_json(source, options),
            FormatType::Yaml => self.generate_yaml(source, options),
            FormatType::JavaScript => self.generate_javascript(source, options),
        }
    }

    fn generate_document(
        &mut self,
        source: &str,
        document: Document,
        options: &GenerateOptions,
        filename: &str,
    ) -> Result<Generated, Error> {
        if options.legacy && options.target == TargetType::Sfc {
            let code = generate_legacy_code(options, &document);
            let map = options
                .source_map
                .then(|| legacy_map(filename, source, &code));
            return Ok(Generated {
                ast: document,
                code,
                map,
            });
        }

        let mut emitter = CodeGenerator::new(filename, source, options.source_map);
        let mut noop: Box<dyn FnMut(Diagnostic)> = Box::new(|_| {});
        let on_error: &mut dyn FnMut(Diagnostic) = match self.on_error.as_mut() {
            Some(sink) => sink.as_mut(),
            None => noop.as_mut(),
        };
        let mut walker = Walker {
            emitter: &mut emitter,
            options,
            compiler: self.compiler,
            on_error,
            injector: self.injector.as_deref(),
            path: Vec::new(),
            code_maps: HashMap::new(),
        };
        walker.emit_program(&document.root);
        let code_maps = walker.code_maps;

        let (code, map_builder) = emitter.into_parts();
        let outer = map_builder.map(SourceMapGenerator::into_map);
        let map = merge_source_maps(outer.as_ref(), &code_maps, options.in_source_map.as_ref())?;
        Ok(Generated {
            ast: document,
            code,
            map,
        })
    }
}

fn effective_filename(options: &GenerateOptions, format: FormatType) -> String {
    if options.filename.is_empty() {
        format.default_filename().to_string()
    } else {
        options.filename.clone()
    }
}

fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Renders a non-string scalar as JSON-safe text. Numbers are normalized
/// through their parsed value, so `1e3` and `2.50` emit as `1000` and
/// `2.5` whatever the source lexeme looked like.
fn scalar_literal(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str(value) => json_string(value),
        Scalar::Number(raw) => ast::number_value(raw).to_string(),
        Scalar::Bool(true) => "true".to_string(),
        Scalar::Bool(false) => "false".to_string(),
        Scalar::Null => "null".to_string(),
    }
}

/// The traversal context threaded through one document walk.
struct Walker<'w, 'c> {
    emitter: &'w mut CodeGenerator,
    options: &'w GenerateOptions,
    compiler: &'c dyn MessageCompiler,
    on_error: &'w mut dyn FnMut(Diagnostic),
    injector: Option<&'w (dyn Fn() -> String + 'c)>,
    /// Key names and numeric indices of the nesting currently open.
    path: Vec<String>,
    /// Per-message compiled maps, keyed by message source text.
    code_maps: HashMap<String, SourceMap>,
}

impl Walker<'_, '_> {
    fn emit_program(&mut self, root: &Node) {
        match self.options.target {
            TargetType::Plain => {
                self.emitter.push("const resource = ");
                self.emit_node(root);
                self.emitter.push("\n");
                self.emitter.push("export default resource");
            }
            TargetType::Sfc => {
                let variable = if self.options.is_global {
                    "__i18nGlobal"
                } else {
                    "__i18n"
                };
                let export_syntax = if self.options.bridge && !self.options.export_esm {
                    "module.exports ="
                } else {
                    "export default"
                };
                self.emitter
                    .push(&format!("{} function (Component) {{", export_syntax));
                self.emitter.indent();
                let component_variable = if self.options.bridge {
                    "Component.options || Component"
                } else if self.options.use_class_component {
                    "Component.__o || Component.__vfdConstructor || Component"
                } else {
                    "Component"
                };
                self.emitter.pushline(&format!(
                    "const {} = {}",
                    COMPONENT_NAMESPACE, component_variable
                ));
                self.emitter.pushline(&format!(
                    "{ns}.{variable} = {ns}.{variable} || []",
                    ns = COMPONENT_NAMESPACE,
                ));
                self.emitter
                    .push(&format!("{}.{}.push({{", COMPONENT_NAMESPACE, variable));
                self.emitter.indent();
                self.emitter
                    .pushline(&format!("\"locale\": {},", json_string(&self.options.locale)));
                self.emitter.push("\"resource\": ");
                self.emit_node(root);
                self.emitter.deindent();
                self.emitter.push("})");
                if self.options.bridge {
                    if let Some(injector) = self.injector {
                        self.emitter.newline();
                        self.emitter.pushline(&format!(
                            "{ns}.__i18nBridge = {ns}.__i18nBridge || []",
                            ns = COMPONENT_NAMESPACE,
                        ));
                        self.emitter.pushline(&format!(
                            "{}.__i18nBridge.push('{}')",
                            COMPONENT_NAMESPACE,
                            injector()
                        ));
                        self.emitter
                            .pushline(&format!("delete {}._Ctor", COMPONENT_NAMESPACE));
                    }
                }
                self.emitter.deindent();
                self.emitter.pushline("}");
            }
        }
    }

    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Object(object) => self.emit_object(object),
            Node::Array(array) => self.emit_array(array),
            Node::Scalar(scalar) => self.emit_scalar_leaf(scalar),
            Node::Raw(raw) => self.emit_raw(raw),
            Node::Unsupported(_) => {}
        }
    }

    fn emit_object(&mut self, object: &ObjectNode) {
        self.emitter.push("{");
        self.emitter.indent();
        let mut emitted = false;
        for property in &object.entries {
            // Skipped properties leave no separator artifact.
            if matches!(property.value, Node::Unsupported(_)) {
                continue;
            }
            if emitted {
                self.emitter.pushline(",");
            }
            self.emit_property(property);
            emitted = true;
        }
        self.emitter.deindent();
        self.emitter.push("}");
    }

    fn emit_property(&mut self, property: &Property) {
        let name = &property.key.name;
        self.emitter.push(&format!("{}: ", json_string(name)));
        self.path.push(name.clone());
        self.emit_node(&property.value);
        self.path.pop();
    }

    fn emit_array(&mut self, array: &ArrayNode) {
        self.emitter.push("[");
        self.emitter.indent();
        let mut emitted = false;
        for (index, item) in array.items.iter().enumerate() {
            if matches!(item, Node::Unsupported(_)) {
                continue;
            }
            if emitted {
                self.emitter.pushline(",");
            }
            self.path.push(index.to_string());
            self.emit_node(item);
            self.path.pop();
            emitted = true;
        }
        self.emitter.deindent();
        self.emitter.push("]");
    }

    fn emit_scalar_leaf(&mut self, scalar: &ScalarNode) {
        match &scalar.value {
            Scalar::Str(value) => self.compile_and_push(value, scalar.loc),
            other => {
                if self.options.force_stringify {
                    let stringified = scalar_literal(other);
                    self.compile_and_push(&stringified, scalar.loc);
                } else {
                    self.emitter.push(&scalar_literal(other));
                }
            }
        }
    }

    fn emit_raw(&mut self, raw: &RawNode) {
        self.emitter
            .push_with(&raw.code, Some(raw.loc), Some(&raw.code));
    }

    fn compile_and_push(&mut self, message: &str, loc: Location) {
        let function = generate_message_function(
            message,
            self.options,
            &self.path,
            self.compiler,
            &mut *self.on_error,
        );
        if self.options.source_map {
            if let Some(map) = function.map {
                self.code_maps.insert(message.to_string(), map);
            }
        }
        self.emitter
            .push_with(&function.code, Some(loc), Some(message));
    }
}

/// Legacy mode: the document is evaluated to a static value, serialized
/// once, and wrapped in a fixed injection snippet.
fn generate_legacy_code(options: &GenerateOptions, document: &Document) -> String {
    let namespace = "Component.options";
    let variable = if options.is_global {
        "__i18nGlobal"
    } else {
        "__i18n"
    };
    let value = ast::static_value(&document.root);
    format!(
        "export default function (Component) {{\n  {ns}.{v} = {ns}.{v} || []\n  {ns}.{v}.push({json})\n  delete {ns}._Ctor\n}}",
        ns = namespace,
        v = variable,
        json = friendly_json_stringify(&value),
    )
}

/// JSON serialization safe to inline into generated code: escapes the
/// characters that terminate script contexts or break line-based tooling.
fn friendly_json_stringify(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace('\'', "\\u0027")
}

/// The legacy snippet is fixed text; its map is one segment per generated
/// line pointing at the document start, with the source embedded.
fn legacy_map(filename: &str, source: &str, code: &str) -> SourceMap {
    let mut generator = SourceMapGenerator::new(Some(filename));
    generator.set_source_content(filename, source);
    let lines = code.lines().count().max(1) as u32;
    for line in 1..=lines {
        generator.add_mapping(Mapping {
            generated: Position { line, column: 0 },
            source: Some(filename.to_string()),
            original: Some(Position { line: 1, column: 0 }),
            name: None,
        });
    }
    generator.into_map()
}
