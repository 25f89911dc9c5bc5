use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Type alias for a HashMap representing the request context that targeting rules are matched
/// against.
///
/// Keys are strings naming context attributes (e.g., `"country"`, `"tier"`, `"identifier"`).
///
/// # Examples
/// ```
/// # use switchboard_core::{Filters, FilterValue};
/// let filters = [
///     ("tier".to_owned(), "vip".into()),
///     ("age".to_owned(), 30.0.into()),
///     ("is_beta_tester".to_owned(), true.into()),
/// ].into_iter().collect::<Filters>();
/// ```
pub type Filters = HashMap<String, FilterValue>;

/// Enum representing possible values of a context attribute.
///
/// Conveniently implements `From` conversions for `String`, `&str`, `f64`, and `bool` types.
///
/// Examples:
/// ```
/// # use switchboard_core::FilterValue;
/// let string_value: FilterValue = "CO".into();
/// let number_value: FilterValue = 42.0.into();
/// let bool_value: FilterValue = true.into();
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, PartialOrd, From, Clone)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// A numerical value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// A null value or absence of value.
    Null,
}

impl FilterValue {
    /// String form used for condition matching and rollout identifier resolution. `Null` coerces
    /// to the empty string, same as an absent attribute.
    pub fn coerce_string(&self) -> String {
        match self {
            FilterValue::String(s) => s.clone(),
            FilterValue::Number(n) => n.to_string(),
            FilterValue::Boolean(b) => b.to_string(),
            FilterValue::Null => String::new(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
