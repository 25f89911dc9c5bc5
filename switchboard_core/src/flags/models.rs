use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Filters;

/// A single flag configuration: a typed default value plus an ordered list of targeting rules
/// overriding it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Configuration key, unique within a project.
    pub key: String,
    /// Value type of the configuration. Informational only: evaluation treats values as opaque.
    #[serde(rename = "type")]
    pub config_type: ConfigType,
    /// Inactive configurations always evaluate to `{null, "none", DISABLED}`.
    pub is_active: bool,
    /// Value served when no rule matches.
    pub default_value: serde_json::Value,
    /// Targeting rules, evaluated in ascending priority order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Value type of a [`Config`].
///
/// SECRET values arrive already decrypted to plaintext; decryption happens upstream of this
/// library.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ConfigType {
    Boolean,
    Json,
    String,
    Secret,
}

/// A prioritized override: returns `return_value` when all conditions match, subject to rollout
/// gating.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Rule {
    /// Stable identifier, unique within the configuration. Also feeds rollout bucketing.
    pub id: String,
    /// Conditions combined with AND. An empty list matches any context.
    pub conditions: Vec<Condition>,
    /// Value served when this rule is accepted.
    pub return_value: serde_json::Value,
    /// Evaluation order, ascending. Values need not be contiguous.
    #[serde(default)]
    pub priority: i64,
    /// Percentage of identifiers receiving this rule's value when it matches; the rest fall
    /// through to later rules or the default.
    #[serde(default = "default_rollout_percentage")]
    pub rollout_percentage: u32,
}

fn default_rollout_percentage() -> u32 {
    100
}

/// One predicate over a single context attribute.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Condition {
    /// Key into the request's [`Filters`] map.
    pub attribute: String,
    /// Comparison to apply.
    pub operator: Operator,
    /// Operand: a single string or a list of strings.
    pub value: ConditionValue,
}

/// Operand of a [`Condition`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    /// A single string operand.
    Single(String),
    /// A list operand, used by IN/NOT_IN membership tests.
    Multiple(Vec<String>),
}

impl ConditionValue {
    /// Scalar form: the string itself, or the first element of a list (empty string for an empty
    /// list).
    pub(crate) fn scalar(&self) -> &str {
        match self {
            ConditionValue::Single(s) => s,
            ConditionValue::Multiple(items) => items.first().map_or("", String::as_str),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<String>> for ConditionValue {
    fn from(value: Vec<String>) -> Self {
        Self::Multiple(value)
    }
}

/// Condition comparison operator.
///
/// Deserialization never fails on an unrecognized operator name: it maps to [`Operator::Unknown`],
/// which matches nothing. This keeps one bad rule from poisoning the rest of a fetched manifest.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    GreaterThan,
    LessThan,
    Regex,
    /// An operator this version of the library does not recognize. Never matches.
    Unknown,
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "EQUALS" => Operator::Equals,
            "NOT_EQUALS" => Operator::NotEquals,
            "IN" => Operator::In,
            "NOT_IN" => Operator::NotIn,
            "CONTAINS" => Operator::Contains,
            "GREATER_THAN" => Operator::GreaterThan,
            "LESS_THAN" => Operator::LessThan,
            "REGEX" => Operator::Regex,
            _ => Operator::Unknown,
        })
    }
}

/// A batch evaluation request: which keys to evaluate and the context to match rules against.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EvaluateRequest {
    /// Request context attributes.
    #[serde(default)]
    pub filters: Filters,
    /// Configuration keys to evaluate.
    pub keys: Vec<String>,
    /// Identifier used for rollout bucketing when `filters` carries no `identifier` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl EvaluateRequest {
    /// Identifier used for rollout bucketing: a non-empty `identifier` filter wins over the
    /// top-level field; absent both, the empty string.
    pub fn rollout_identifier(&self) -> String {
        if let Some(value) = self.filters.get("identifier") {
            let value = value.coerce_string();
            if !value.is_empty() {
                return value;
            }
        }
        self.identifier.clone().unwrap_or_default()
    }
}

/// Outcome of evaluating one configuration against one request context.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Value to serve. `null` for disabled configurations and unknown keys.
    pub value: serde_json::Value,
    /// Id of the accepted rule, or `"default"` (fell back to the configuration default) or
    /// `"none"` (nothing to serve).
    pub rule_id: String,
    /// Why this value was chosen.
    pub reason: EvaluationReason,
}

/// Why an [`EvaluationResult`] carries the value it does.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationReason {
    /// A rule matched and was accepted.
    Match,
    /// No rule was accepted; the configuration default (or `null` for an unknown key) is served.
    Fallback,
    /// The configuration is inactive.
    Disabled,
    /// Reserved. The evaluator reports rollout exclusion by falling through to the next rule or
    /// to FALLBACK, never by emitting this reason.
    RolloutExcluded,
}
