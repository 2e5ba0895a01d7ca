//! Parameter validation and coercion.
//!
//! Raw invocation parameters arrive as an untyped JSON object. Before a
//! handler runs, each declared parameter is checked for presence and coerced
//! to its declared [`ParameterType`]. Keys the tool does not declare are
//! dropped.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::error::{ParameterIssue, ToolError};
use super::schema::{ParameterSpec, ParameterType, ToolDefinition};

/// A parameter value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    List(Vec<Value>),
    Dictionary(Map<String, Value>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Dictionary(map) => Some(map),
            _ => None,
        }
    }
}

/// Validated, typed parameters handed to a tool handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolParams {
    values: BTreeMap<String, ParamValue>,
}

impl ToolParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Fetch a string parameter the handler cannot proceed without.
    ///
    /// Validation already guarantees required parameters are present, so a
    /// miss here means the handler and its definition disagree.
    pub fn require_str(&self, name: &str) -> anyhow::Result<&str> {
        self.get_str(name)
            .ok_or_else(|| anyhow::anyhow!("string parameter '{}' not available", name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Validate raw parameters against a tool definition.
///
/// Every issue is collected so callers can fix all of them at once.
pub fn validate_parameters(
    definition: &ToolDefinition,
    raw: &Value,
) -> Result<ToolParams, Vec<ParameterIssue>> {
    let empty = Map::new();
    let object = match raw {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(vec![ParameterIssue::new(
                "*",
                format!(
                    "parameters must be a JSON object, got {}",
                    json_kind(other)
                ),
            )]);
        }
    };

    let mut params = ToolParams::new();
    let mut issues = Vec::new();

    for spec in &definition.parameters {
        match object.get(&spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    issues.push(ParameterIssue::missing(&spec.name));
                }
            }
            Some(value) => match coerce(spec, value) {
                Ok(coerced) => params.insert(spec.name.clone(), coerced),
                Err(issue) => issues.push(issue),
            },
        }
    }

    if issues.is_empty() {
        Ok(params)
    } else {
        Err(issues)
    }
}

impl From<Vec<ParameterIssue>> for ToolError {
    fn from(issues: Vec<ParameterIssue>) -> Self {
        ToolError::Validation(issues)
    }
}

fn coerce(spec: &ParameterSpec, value: &Value) -> Result<ParamValue, ParameterIssue> {
    let coerced = match (spec.param_type, value) {
        (ParameterType::String, Value::String(s)) => Some(ParamValue::String(s.clone())),
        (ParameterType::String, Value::Number(n)) => Some(ParamValue::String(n.to_string())),
        (ParameterType::String, Value::Bool(b)) => Some(ParamValue::String(b.to_string())),

        (ParameterType::Integer, Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                // i64::MAX as f64 rounds up to 2^63, which is already out of range.
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(ParamValue::Integer),
        (ParameterType::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().ok().map(ParamValue::Integer)
        }

        (ParameterType::Number, Value::Number(n)) => n.as_f64().map(ParamValue::Number),
        (ParameterType::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(ParamValue::Number),

        (ParameterType::Boolean, Value::Bool(b)) => Some(ParamValue::Boolean(*b)),
        (ParameterType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str()
        {
            "true" => Some(ParamValue::Boolean(true)),
            "false" => Some(ParamValue::Boolean(false)),
            _ => None,
        },

        (ParameterType::List, Value::Array(items)) => Some(ParamValue::List(items.clone())),
        (ParameterType::Dictionary, Value::Object(map)) => {
            Some(ParamValue::Dictionary(map.clone()))
        }

        _ => None,
    };

    coerced.ok_or_else(|| {
        ParameterIssue::new(
            &spec.name,
            format!("expected {}, got {}", spec.param_type, json_kind(value)),
        )
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dictionary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("demo", "Demo tool")
            .with_parameter(ParameterSpec::required("query", ParameterType::String, ""))
            .with_parameter(ParameterSpec::optional("limit", ParameterType::Integer, ""))
            .with_parameter(ParameterSpec::optional("ratio", ParameterType::Number, ""))
            .with_parameter(ParameterSpec::optional("exact", ParameterType::Boolean, ""))
            .with_parameter(ParameterSpec::optional("tags", ParameterType::List, ""))
            .with_parameter(ParameterSpec::optional("extra", ParameterType::Dictionary, ""))
    }

    #[test]
    fn test_all_types_accepted() {
        let raw = json!({
            "query": "oslo",
            "limit": 5,
            "ratio": 0.5,
            "exact": true,
            "tags": ["a", "b"],
            "extra": { "k": "v" }
        });
        let params = validate_parameters(&definition(), &raw).unwrap();

        assert_eq!(params.get_str("query"), Some("oslo"));
        assert_eq!(params.get_i64("limit"), Some(5));
        assert_eq!(params.get_f64("ratio"), Some(0.5));
        assert_eq!(params.get_bool("exact"), Some(true));
        assert_eq!(params.get("tags").and_then(ParamValue::as_list).map(<[Value]>::len), Some(2));
        assert!(params.get("extra").and_then(ParamValue::as_dictionary).is_some());
    }

    #[test]
    fn test_string_coercions() {
        let raw = json!({ "query": "7", "limit": "12", "ratio": "2.5", "exact": "FALSE" });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.get_i64("limit"), Some(12));
        assert_eq!(params.get_f64("ratio"), Some(2.5));
        assert_eq!(params.get_bool("exact"), Some(false));

        let raw = json!({ "query": 42 });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.get_str("query"), Some("42"));
    }

    #[test]
    fn test_integral_float_is_integer() {
        let raw = json!({ "query": "x", "limit": 3.0 });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.get_i64("limit"), Some(3));

        let raw = json!({ "query": "x", "limit": 3.5 });
        let issues = validate_parameters(&definition(), &raw).unwrap_err();
        assert_eq!(issues[0].parameter, "limit");
        assert!(issues[0].problem.contains("expected integer"));
    }

    #[test]
    fn test_missing_required_named() {
        let raw = json!({ "limit": 1, "unrelated": "x" });
        let issues = validate_parameters(&definition(), &raw).unwrap_err();
        assert_eq!(issues, vec![ParameterIssue::missing("query")]);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let issues = validate_parameters(&definition(), &json!({ "query": null })).unwrap_err();
        assert_eq!(issues[0].parameter, "query");

        let params = validate_parameters(&definition(), &json!({ "query": "a", "limit": null }))
            .unwrap();
        assert!(!params.contains("limit"));
    }

    #[test]
    fn test_all_issues_collected() {
        let raw = json!({ "limit": "many", "exact": "maybe", "tags": "a,b" });
        let issues = validate_parameters(&definition(), &raw).unwrap_err();
        let names: Vec<_> = issues.iter().map(|i| i.parameter.as_str()).collect();
        assert_eq!(names, vec!["query", "limit", "exact", "tags"]);
        assert!(issues[3].problem.contains("expected list, got string"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let raw = json!({ "query": "a", "future_flag": true });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.len(), 1);
        assert!(!params.contains("future_flag"));
    }

    #[test]
    fn test_non_object_rejected() {
        let issues = validate_parameters(&definition(), &json!(["query"])).unwrap_err();
        assert!(issues[0].problem.contains("must be a JSON object"));
    }

    #[test]
    fn test_null_body_means_no_parameters() {
        let def = ToolDefinition::new("noop", "");
        let params = validate_parameters(&def, &Value::Null).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        for limit in [json!(9_223_372_036_854_775_808_u64), json!(9_223_372_036_854_775_808.0_f64)] {
            let raw = json!({ "query": "x", "limit": limit });
            let issues = validate_parameters(&definition(), &raw).unwrap_err();
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].parameter, "limit");
        }

        let raw = json!({ "query": "x", "limit": i64::MAX });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.get_i64("limit"), Some(i64::MAX));

        let raw = json!({ "query": "x", "limit": -9_223_372_036_854_775_808.0_f64 });
        let params = validate_parameters(&definition(), &raw).unwrap();
        assert_eq!(params.get_i64("limit"), Some(i64::MIN));
    }

    #[test]
    fn test_non_finite_number_string_rejected() {
        let raw = json!({ "query": "a", "ratio": "NaN" });
        assert!(validate_parameters(&definition(), &raw).is_err());
    }
}
