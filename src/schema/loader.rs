//! Schema loader for schema files read at startup
//!
//! Schema files are JSON documents in a single directory, one schema per
//! file:
//!
//! ```json
//! { "name": "newsletterSignup",
//!   "fields": [ { "name": "email", "type": "string", "required": true, "isEmail": true } ] }
//! ```
//!
//! Fields are a list so declaration order survives parsing. Custom
//! validators cannot be expressed in files. Any unreadable file, unknown
//! type or bad regex aborts loading (FATAL).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use super::errors::{SchemaError, SchemaResult};
use super::types::{ArrayRule, FieldKind, FieldRule, NumberRule, Schema, StringRule};

/// On-disk schema document
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    name: String,
    fields: Vec<FieldSpec>,
}

/// On-disk field rule
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FieldSpec {
    name: String,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    is_email: bool,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    min_items: Option<usize>,
    #[serde(default)]
    max_items: Option<usize>,
    #[serde(default)]
    items: Option<Vec<FieldSpec>>,
}

impl FieldSpec {
    fn has_string_constraints(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some() || self.pattern.is_some() || self.is_email
    }

    fn has_number_constraints(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn has_array_constraints(&self) -> bool {
        self.min_items.is_some() || self.max_items.is_some() || self.items.is_some()
    }

    fn into_rule(self) -> SchemaResult<FieldRule> {
        let kind = match self.field_type.as_deref() {
            None => FieldKind::Any,
            Some("string") => {
                let mut rule = StringRule::new();
                rule.min_length = self.min_length;
                rule.max_length = self.max_length;
                rule.is_email = self.is_email;
                match &self.pattern {
                    Some(pattern) => rule.pattern(pattern)?.into(),
                    None => rule.into(),
                }
            }
            Some("number") => NumberRule {
                min: self.min,
                max: self.max,
            }
            .into(),
            Some("boolean") => FieldKind::Boolean,
            Some("array") => {
                let mut rule = ArrayRule::new();
                rule.min_items = self.min_items;
                rule.max_items = self.max_items;
                if let Some(items) = self.items {
                    rule.items = Some(build_schema(items)?);
                }
                rule.into()
            }
            Some("object") => FieldKind::Object,
            Some(other) => return Err(SchemaError::unknown_type(other)),
        };

        Ok(if self.required {
            FieldRule::required(kind)
        } else {
            FieldRule::optional(kind)
        })
    }

    /// Names of constraints the declared type will never evaluate.
    fn ignored_constraints(&self) -> Vec<&'static str> {
        let kind = self.field_type.as_deref();
        let mut ignored = Vec::new();
        if kind != Some("string") && self.has_string_constraints() {
            ignored.push("string");
        }
        if kind != Some("number") && self.has_number_constraints() {
            ignored.push("number");
        }
        if kind != Some("array") && self.has_array_constraints() {
            ignored.push("array");
        }
        ignored
    }
}

fn build_schema(specs: Vec<FieldSpec>) -> SchemaResult<Schema> {
    let mut schema = Schema::new();
    for spec in specs {
        for family in spec.ignored_constraints() {
            warn!(field = %spec.name, family, "constraints ignored for declared type");
        }
        if schema.get(&spec.name).is_some() {
            return Err(SchemaError::duplicate_field(&spec.name));
        }
        let name = spec.name.clone();
        schema = schema.field(name, spec.into_rule()?);
    }
    Ok(schema)
}

/// Parses one schema document.
pub fn parse_schema(content: &str) -> SchemaResult<(String, Schema)> {
    parse_schema_from(content, "<in-memory>")
}

fn parse_schema_from(content: &str, source: &str) -> SchemaResult<(String, Schema)> {
    let file: SchemaFile = serde_json::from_str(content)
        .map_err(|e| SchemaError::malformed_schema(source, format!("Invalid JSON: {}", e)))?;
    let name = file.name;
    let schema = build_schema(file.fields).map_err(|e| e.in_schema(&name))?;
    Ok((name, schema))
}

/// Reads schema files from a directory and keeps them by name.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is a configuration error.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        let dir = self.schema_dir.display().to_string();
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(&dir, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform-defined; load in a stable order.
        paths.sort();

        for path in paths {
            self.load_schema_file(&path)?;
        }

        info!(dir = %dir, count = self.schemas.len(), "schema files loaded");
        Ok(())
    }

    /// Loads and registers a single schema file.
    pub fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::malformed_schema(&display, format!("Failed to read file: {}", e)))?;

        let (name, schema) = parse_schema_from(&content, &display)?;

        self.register(name, schema)
    }

    /// Registers a schema directly. Names are unique across files.
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) -> SchemaResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::duplicate(name));
        }
        self.schemas.insert(name, schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn into_schemas(self) -> impl Iterator<Item = (String, Schema)> {
        self.schemas.into_iter()
    }
}
