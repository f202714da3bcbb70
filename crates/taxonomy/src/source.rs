use crate::error::{Result, TaxonomyError};
use crate::types::RegionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Node of the nested taxonomy description, as delivered by the atlas source.
///
/// Required fields are optional here so that a missing field surfaces as a
/// [`TaxonomyError::Malformed`] from the index build rather than a serde error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<RegionId>,

    #[serde(default)]
    pub acronym: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub color_hex_triplet: Option<String>,

    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(id: RegionId, acronym: &str, name: &str, color: &str) -> Self {
        Self {
            id: Some(id),
            acronym: Some(acronym.to_string()),
            name: Some(name.to_string()),
            color_hex_triplet: Some(color.to_string()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }
}

/// Parse a taxonomy forest from JSON.
///
/// Accepted layouts:
/// - an array of root nodes
/// - a single root node object
/// - the atlas API envelope `{"msg": [{"children": [...]}]}`, whose roots are
///   the children of the first message entry
pub fn parse_forest(json: &str) -> Result<Vec<RawNode>> {
    let value: Value = serde_json::from_str(json)?;
    forest_from_value(value)
}

pub fn forest_from_value(value: Value) -> Result<Vec<RawNode>> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            if let Some(msg) = map.remove("msg") {
                let first = match msg {
                    Value::Array(mut entries) if !entries.is_empty() => entries.swap_remove(0),
                    _ => {
                        return Err(TaxonomyError::Malformed(
                            "envelope 'msg' must be a non-empty array".to_string(),
                        ))
                    }
                };
                let children = first
                    .get("children")
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()));
                return Ok(serde_json::from_value(children)?);
            }
            Ok(vec![serde_json::from_value(Value::Object(map))?])
        }
        other => Err(TaxonomyError::Malformed(format!(
            "expected an array or object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
