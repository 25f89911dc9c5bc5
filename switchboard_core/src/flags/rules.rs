use regex::Regex;

use crate::{
    flags::{Condition, ConditionValue, Operator, Rule},
    FilterValue, Filters,
};

impl Rule {
    pub(crate) fn matches(&self, filters: &Filters) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches(filters))
    }
}

impl Condition {
    fn matches(&self, filters: &Filters) -> bool {
        self.operator
            .eval(filters.get(&self.attribute), &self.value)
    }
}

impl Operator {
    /// Applying `Operator` to the values. Returns `false` if the operator cannot be applied or
    /// there's a misconfiguration (e.g., an invalid regular expression).
    fn eval(&self, context: Option<&FilterValue>, condition_value: &ConditionValue) -> bool {
        // Absent context attributes coerce to the empty string, same as explicit nulls.
        let raw = context.map(FilterValue::coerce_string).unwrap_or_default();
        let lowered = raw.to_lowercase();

        match self {
            Self::Equals => lowered == condition_value.scalar().to_lowercase(),
            Self::NotEquals => lowered != condition_value.scalar().to_lowercase(),

            Self::In => condition_value.list_contains(&lowered),
            Self::NotIn => !condition_value.list_contains(&lowered),

            Self::Contains => lowered.contains(&condition_value.scalar().to_lowercase()),

            Self::GreaterThan | Self::LessThan => {
                let lhs = parse_number(&lowered);
                let rhs = parse_number(condition_value.scalar());
                // NaN on either side makes both comparisons false.
                match self {
                    Self::GreaterThan => lhs > rhs,
                    _ => lhs < rhs,
                }
            }

            // The pattern and the context are matched raw, without lowercasing.
            Self::Regex => Regex::new(condition_value.scalar())
                .map(|regex| regex.is_match(&raw))
                .unwrap_or(false),

            Self::Unknown => false,
        }
    }
}

impl ConditionValue {
    /// Membership test for IN/NOT_IN. A single string operand is treated as a comma-separated
    /// list with surrounding whitespace trimmed; comparison is case-insensitive.
    fn list_contains(&self, needle_lower: &str) -> bool {
        match self {
            ConditionValue::Single(s) => s
                .split(',')
                .any(|item| item.trim().to_lowercase() == needle_lower),
            ConditionValue::Multiple(items) => {
                items.iter().any(|item| item.to_lowercase() == needle_lower)
            }
        }
    }
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::flags::{Condition, ConditionValue, Operator, Rule};

    #[test]
    fn equals_is_case_insensitive() {
        assert!(Operator::Equals.eval(Some(&"VIP".into()), &"vip".into()));
        assert!(Operator::Equals.eval(Some(&"vip".into()), &"VIP".into()));
        assert!(!Operator::Equals.eval(Some(&"basic".into()), &"vip".into()));
    }

    #[test]
    fn equals_with_absent_context() {
        // Absent attributes coerce to the empty string.
        assert!(Operator::Equals.eval(None, &"".into()));
        assert!(!Operator::Equals.eval(None, &"vip".into()));
    }

    #[test]
    fn equals_coerces_numbers_and_booleans() {
        assert!(Operator::Equals.eval(Some(&42.0.into()), &"42".into()));
        assert!(Operator::Equals.eval(Some(&true.into()), &"TRUE".into()));
        assert!(Operator::Equals.eval(Some(&false.into()), &"false".into()));
    }

    #[test]
    fn not_equals_negates() {
        assert!(Operator::NotEquals.eval(Some(&"basic".into()), &"vip".into()));
        assert!(!Operator::NotEquals.eval(Some(&"VIP".into()), &"vip".into()));
    }

    #[test]
    fn in_with_list_operand() {
        let countries: ConditionValue = vec!["CO".to_owned(), "MX".to_owned()].into();
        assert!(Operator::In.eval(Some(&"CO".into()), &countries));
        assert!(Operator::In.eval(Some(&"mx".into()), &countries));
        assert!(!Operator::In.eval(Some(&"US".into()), &countries));
    }

    #[test]
    fn in_with_comma_separated_operand() {
        let countries: ConditionValue = "CO, MX ,BR".into();
        assert!(Operator::In.eval(Some(&"co".into()), &countries));
        assert!(Operator::In.eval(Some(&"BR".into()), &countries));
        assert!(!Operator::In.eval(Some(&"US".into()), &countries));
    }

    #[test]
    fn not_in_negates_membership() {
        let countries: ConditionValue = vec!["CO".to_owned(), "MX".to_owned()].into();
        assert!(Operator::NotIn.eval(Some(&"US".into()), &countries));
        assert!(!Operator::NotIn.eval(Some(&"co".into()), &countries));
        // Absent context is the empty string, which is not a member.
        assert!(Operator::NotIn.eval(None, &countries));
    }

    #[test]
    fn contains_substring() {
        assert!(Operator::Contains.eval(Some(&"user@example.com".into()), &"@EXAMPLE.".into()));
        assert!(!Operator::Contains.eval(Some(&"user@test.com".into()), &"@example.".into()));
    }

    #[test]
    fn greater_than_and_less_than() {
        assert!(Operator::GreaterThan.eval(Some(&"19".into()), &"18".into()));
        assert!(!Operator::GreaterThan.eval(Some(&"18".into()), &"18".into()));
        assert!(Operator::LessThan.eval(Some(&17.0.into()), &"18".into()));
        assert!(!Operator::LessThan.eval(Some(&"18".into()), &"18".into()));
        assert!(Operator::GreaterThan.eval(Some(&"2.5".into()), &"2.4".into()));
    }

    #[test]
    fn numeric_operators_reject_unparseable_input() {
        assert!(!Operator::GreaterThan.eval(Some(&"abc".into()), &"18".into()));
        assert!(!Operator::LessThan.eval(Some(&"abc".into()), &"18".into()));
        assert!(!Operator::GreaterThan.eval(Some(&"19".into()), &"abc".into()));
        assert!(!Operator::LessThan.eval(None, &"18".into()));
    }

    #[test]
    fn regex_matches_raw_context() {
        assert!(Operator::Regex.eval(Some(&"test@example.com".into()), &"^test.*".into()));
        assert!(!Operator::Regex.eval(Some(&"example@test.com".into()), &"^test.*".into()));
        // Regex is the one operator that does not lowercase.
        assert!(!Operator::Regex.eval(Some(&"TEST@example.com".into()), &"^test.*".into()));
    }

    #[test]
    fn invalid_regex_never_matches() {
        assert!(!Operator::Regex.eval(Some(&"anything".into()), &"[invalid(".into()));
    }

    #[test]
    fn regex_takes_first_element_of_list_operand() {
        let patterns: ConditionValue = vec!["^vip-".to_owned(), "unused".to_owned()].into();
        assert!(Operator::Regex.eval(Some(&"vip-123".into()), &patterns));
        assert!(!Operator::Regex.eval(Some(&"basic-123".into()), &patterns));
    }

    #[test]
    fn unknown_operator_never_matches() {
        assert!(!Operator::Unknown.eval(Some(&"vip".into()), &"vip".into()));
        assert!(!Operator::Unknown.eval(None, &"".into()));
    }

    #[test]
    fn empty_rule_matches_any_context() {
        let rule = rule(vec![]);
        assert!(rule.matches(&HashMap::from([])));
    }

    #[test]
    fn conditions_are_combined_with_and() {
        let rule = rule(vec![
            condition("tier", Operator::Equals, "vip"),
            condition("country", Operator::In, "CO,MX"),
        ]);
        assert!(rule.matches(&HashMap::from([
            ("tier".to_owned(), "VIP".into()),
            ("country".to_owned(), "co".into()),
        ])));
        assert!(!rule.matches(&HashMap::from([
            ("tier".to_owned(), "VIP".into()),
            ("country".to_owned(), "US".into()),
        ])));
        assert!(!rule.matches(&HashMap::from([("country".to_owned(), "co".into())])));
    }

    fn rule(conditions: Vec<Condition>) -> Rule {
        Rule {
            id: "rule-1".to_owned(),
            conditions,
            return_value: true.into(),
            priority: 0,
            rollout_percentage: 100,
        }
    }

    fn condition(attribute: &str, operator: Operator, value: &str) -> Condition {
        Condition {
            attribute: attribute.to_owned(),
            operator,
            value: value.into(),
        }
    }
}
