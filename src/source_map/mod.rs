//! Source Map v3 support: the serializable map model, a generator, a
//! consumer, and the two-stage merger used by document generation.
//!
//! Generated positions use 1-based lines and 0-based columns throughout
//! this module, matching the conventions of Source Map v3 tooling.

pub mod vlq;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A serializable Source Map v3 structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mappings: String,
}

/// A generated or original position: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// One mapping registered with [`SourceMapGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub generated: Position,
    pub source: Option<String>,
    pub original: Option<Position>,
    pub name: Option<String>,
}

/// Accumulates mappings and serializes them into a [`SourceMap`].
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: HashMap<String, String>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    pub fn new(file: Option<&str>) -> Self {
        SourceMapGenerator {
            file: file.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn add_mapping(&mut self, mapping: Mapping) {
        if let Some(source) = &mapping.source {
            self.ensure_source(source);
        }
        if let Some(name) = &mapping.name {
            if !self.names.iter().any(|n| n == name) {
                self.names.push(name.clone());
            }
        }
        self.mappings.push(mapping);
    }

    /// Registers a source file without requiring a mapping to mention it.
    pub fn add_source(&mut self, source: &str) {
        self.ensure_source(source);
    }

    pub fn set_source_content(&mut self, source: &str, content: &str) {
        self.ensure_source(source);
        self.sources_content
            .insert(source.to_string(), content.to_string());
    }

    pub fn set_source_root(&mut self, source_root: Option<String>) {
        self.source_root = source_root;
    }

    pub fn set_file(&mut self, file: Option<String>) {
        self.file = file;
    }

    fn ensure_source(&mut self, source: &str) -> usize {
        match self.sources.iter().position(|s| s == source) {
            Some(index) => index,
            None => {
                self.sources.push(source.to_string());
                self.sources.len() - 1
            }
        }
    }

    /// Serializes the accumulated mappings, sorted by generated position,
    /// into a Source Map v3 structure.
    pub fn into_map(mut self) -> SourceMap {
        self.mappings
            .sort_by_key(|m| (m.generated.line, m.generated.column));

        let mut encoded = String::new();
        let mut current_line = 1u32;
        let mut prev_generated_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_original_line = 0i64;
        let mut prev_original_column = 0i64;
        let mut prev_name = 0i64;

        for (index, mapping) in self.mappings.iter().enumerate() {
            while current_line < mapping.generated.line {
                encoded.push(';');
                current_line += 1;
                prev_generated_column = 0;
            }
            if index > 0 && !encoded.is_empty() && !encoded.ends_with(';') {
                encoded.push(',');
            }

            let generated_column = mapping.generated.column as i64;
            encoded.push_str(&vlq::encode(generated_column - prev_generated_column));
            prev_generated_column = generated_column;

            if let (Some(source), Some(original)) = (&mapping.source, &mapping.original) {
                let source_index = self
                    .sources
                    .iter()
                    .position(|s| s == source)
                    .unwrap_or(0) as i64;
                encoded.push_str(&vlq::encode(source_index - prev_source));
                prev_source = source_index;

                let original_line = (original.line.saturating_sub(1)) as i64;
                encoded.push_str(&vlq::encode(original_line - prev_original_line));
                prev_original_line = original_line;

                let original_column = original.column as i64;
                encoded.push_str(&vlq::encode(original_column - prev_original_column));
                prev_original_column = original_column;

                if let Some(name) = &mapping.name {
                    let name_index =
                        self.names.iter().position(|n| n == name).unwrap_or(0) as i64;
                    encoded.push_str(&vlq::encode(name_index - prev_name));
                    prev_name = name_index;
                }
            }
        }

        let sources_content = if self.sources_content.is_empty() {
            None
        } else {
            Some(
                self.sources
                    .iter()
                    .map(|s| self.sources_content.get(s).cloned())
                    .collect(),
            )
        };

        SourceMap {
            version: 3,
            file: self.file,
            source_root: self.source_root,
            sources: self.sources,
            sources_content,
            names: self.names,
            mappings: encoded,
        }
    }
}

/// An original position resolved through a consumed map.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalLocation {
    pub source: String,
    pub line: u32,
    pub column: u32,
}

/// One decoded mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedMapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original: Option<OriginalLocation>,
    pub name: Option<String>,
}

/// Decodes a [`SourceMap`] for iteration and position lookup.
#[derive(Debug)]
pub struct SourceMapConsumer<'m> {
    map: &'m SourceMap,
    entries: Vec<ConsumedMapping>,
}

impl<'m> SourceMapConsumer<'m> {
    pub fn new(map: &'m SourceMap) -> Result<Self, Error> {
        let mut entries = Vec::new();
        let mut generated_line = 1u32;
        let mut prev_generated_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_original_line = 0i64;
        let mut prev_original_column = 0i64;
        let mut prev_name = 0i64;

        for line in map.mappings.split(';') {
            for segment in line.split(',') {
                if segment.is_empty() {
                    continue;
                }
                let mut rest = segment;
                let (column_delta, consumed) = vlq::decode(rest)?;
                rest = &rest[consumed..];
                let generated_column = prev_generated_column + column_delta;
                prev_generated_column = generated_column;

                let mut original = None;
                let mut name = None;
                if !rest.is_empty() {
                    let (source_delta, consumed) = vlq::decode(rest)?;
                    rest = &rest[consumed..];
                    let (line_delta, consumed) = vlq::decode(rest)?;
                    rest = &rest[consumed..];
                    let (column_delta, consumed) = vlq::decode(rest)?;
                    rest = &rest[consumed..];

                    let source_index = prev_source + source_delta;
                    let original_line = prev_original_line + line_delta;
                    let original_column = prev_original_column + column_delta;
                    prev_source = source_index;
                    prev_original_line = original_line;
                    prev_original_column = original_column;

                    let source = map
                        .sources
                        .get(source_index.max(0) as usize)
                        .cloned()
                        .ok_or_else(|| {
                            Error::SourceMap(format!("source index {} out of range", source_index))
                        })?;
                    original = Some(OriginalLocation {
                        source,
                        line: (original_line + 1).max(1) as u32,
                        column: original_column.max(0) as u32,
                    });

                    if !rest.is_empty() {
                        let (name_delta, consumed) = vlq::decode(rest)?;
                        rest = &rest[consumed..];
                        let name_index = prev_name + name_delta;
                        prev_name = name_index;
                        name = map.names.get(name_index.max(0) as usize).cloned();
                    }
                }
                if !rest.is_empty() {
                    return Err(Error::SourceMap(format!(
                        "trailing data in mappings segment `{}`",
                        segment
                    )));
                }

                entries.push(ConsumedMapping {
                    generated_line,
                    generated_column: generated_column.max(0) as u32,
                    original,
                    name,
                });
            }
            generated_line += 1;
            prev_generated_column = 0;
        }

        Ok(SourceMapConsumer { map, entries })
    }

    pub fn mappings(&self) -> &[ConsumedMapping] {
        &self.entries
    }

    /// Resolves a generated position to its original position: the entry on
    /// the same generated line with the greatest column not exceeding the
    /// queried column.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<&OriginalLocation> {
        self.entries
            .iter()
            .filter(|e| e.generated_line == line && e.generated_column <= column)
            .max_by_key(|e| e.generated_column)
            .and_then(|e| e.original.as_ref())
    }

    pub fn sources(&self) -> &[String] {
        &self.map.sources
    }

    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        let index = self.map.sources.iter().position(|s| s == source)?;
        self.map
            .sources_content
            .as_ref()?
            .get(index)?
            .as_deref()
    }
}

/// Composes the document-level map with the per-message maps collected
/// during generation, optionally resolving through an externally supplied
/// input map.
///
/// Returns `Ok(None)` when no document-level map exists. Outer mappings
/// without an original position or without a per-message map keyed by their
/// name are skipped; when an input map is present, outer positions that do
/// not resolve through it are skipped as generated-only code. The merged
/// map carries the source contents of the dominant side (the input map when
/// present, otherwise the document map) and prefers the input map's
/// `sourceRoot` and `file`.
pub fn merge_source_maps(
    outer: Option<&SourceMap>,
    code_maps: &HashMap<String, SourceMap>,
    in_map: Option<&SourceMap>,
) -> Result<Option<SourceMap>, Error> {
    let Some(outer) = outer else {
        return Ok(None);
    };
    let outer_consumer = SourceMapConsumer::new(outer)?;
    let in_consumer = match in_map {
        Some(map) => Some(SourceMapConsumer::new(map)?),
        None => None,
    };
    let mut merged = SourceMapGenerator::new(None);

    for res in outer_consumer.mappings() {
        let Some(orig) = &res.original else {
            continue;
        };
        let Some(leaf) = res.name.as_ref().and_then(|name| code_maps.get(name)) else {
            continue;
        };
        let (base_source, base_line, base_column) = match &in_consumer {
            Some(consumer) => match consumer.original_position_for(orig.line, orig.column) {
                Some(resolved) => (resolved.source.clone(), resolved.line, resolved.column),
                None => continue,
            },
            None => (orig.source.clone(), orig.line, orig.column),
        };

        let leaf_consumer = SourceMapConsumer::new(leaf)?;
        for m in leaf_consumer.mappings() {
            let generated_line_delta = m.generated_line - 1;
            let generated = Position {
                line: res.generated_line + generated_line_delta,
                column: if generated_line_delta == 0 {
                    res.generated_column + m.generated_column
                } else {
                    m.generated_column
                },
            };
            let (original_line_delta, original_column) = match &m.original {
                Some(original) => (original.line - 1, original.column),
                None => (0, 0),
            };
            let original = Position {
                line: base_line + original_line_delta,
                column: if original_line_delta == 0 {
                    base_column + original_column
                } else {
                    original_column
                },
            };
            merged.add_mapping(Mapping {
                generated,
                source: Some(base_source.clone()),
                original: Some(original),
                name: m.name.clone(),
            });
        }
    }

    let dominant = in_consumer.as_ref().unwrap_or(&outer_consumer);
    for source in dominant.sources().to_vec() {
        merged.add_source(&source);
        if let Some(content) = dominant.source_content_for(&source) {
            let content = content.to_string();
            merged.set_source_content(&source, &content);
        }
    }
    match in_map {
        Some(map) => {
            merged.set_source_root(map.source_root.clone());
            merged.set_file(map.file.clone());
        }
        None => {
            merged.set_source_root(outer.source_root.clone());
            merged.set_file(outer.file.clone());
        }
    }

    Ok(Some(merged.into_map()))
}
