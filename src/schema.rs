//! Bundled JSON Schemas for the data files the tools read.
//!
//! The schemas ship inside the binary so a checkout without the `schema/`
//! directory still validates. Each schema's `schema_version` const must match
//! the version this crate understands.

use crate::error::CatalogError;
use jsonschema::JSONSchema;
use serde_json::Value;

/// Version marker accepted in override documents.
pub const OVERRIDE_SCHEMA_VERSION: &str = "override_set_v1";
/// Version marker accepted in glossary documents.
pub const GLOSSARY_SCHEMA_VERSION: &str = "glossary_v1";

const OVERRIDE_SCHEMA: &str = include_str!("../schema/override_set.schema.json");
const GLOSSARY_SCHEMA: &str = include_str!("../schema/glossary.schema.json");

const VERSION_POINTER: &str = "/properties/schema_version/const";

pub(crate) struct DocumentSchema {
    compiled: JSONSchema,
}

impl DocumentSchema {
    pub(crate) fn override_set() -> Result<Self, CatalogError> {
        Self::bundled(OVERRIDE_SCHEMA, OVERRIDE_SCHEMA_VERSION)
    }

    pub(crate) fn glossary() -> Result<Self, CatalogError> {
        Self::bundled(GLOSSARY_SCHEMA, GLOSSARY_SCHEMA_VERSION)
    }

    fn bundled(text: &str, expected_version: &str) -> Result<Self, CatalogError> {
        let raw: Value = serde_json::from_str(text).map_err(|err| {
            CatalogError::Schema(format!("parsing bundled {expected_version} schema: {err}"))
        })?;
        Self::compile(&raw, expected_version)
    }

    pub(crate) fn compile(raw: &Value, expected_version: &str) -> Result<Self, CatalogError> {
        let version = extract_schema_version(raw, VERSION_POINTER)
            .ok_or_else(|| CatalogError::Schema("schema missing schema_version const".into()))?;
        if version != expected_version {
            return Err(CatalogError::Schema(format!(
                "schema_version '{version}' is not {expected_version}"
            )));
        }
        let compiled = JSONSchema::compile(raw)
            .map_err(|err| CatalogError::Schema(format!("compiling schema: {err}")))?;
        Ok(Self { compiled })
    }

    /// Validate a parsed document; on failure every violation, one per line.
    pub(crate) fn validate(&self, document: &Value) -> Result<(), String> {
        if let Err(errors) = self.compiled.validate(document) {
            let details = errors
                .map(|err| format!("  - {err}"))
                .collect::<Vec<_>>()
                .join("\n");
            return Err(details);
        }
        Ok(())
    }
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
