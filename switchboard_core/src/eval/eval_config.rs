use std::collections::HashMap;

use crate::{
    flags::{Config, EvaluateRequest, EvaluationReason, EvaluationResult},
    sharder::{Sha256Sharder, Sharder},
    Configuration, Filters,
};

/// `rule_id` reported when evaluation fell back to the configuration default.
pub const RULE_ID_DEFAULT: &str = "default";
/// `rule_id` reported when there is no value to serve (inactive configuration or unknown key).
pub const RULE_ID_NONE: &str = "none";

/// Capability to resolve configuration keys to hydrated [`Config`]s.
///
/// The batch evaluator is agnostic to where configurations come from: a synchronized in-memory
/// [`Configuration`] snapshot on the client, or a per-request store lookup on the server. Rules
/// are expected to be pre-sorted by ascending priority and SECRET values already decrypted.
pub trait ConfigurationLookup {
    /// Returns the configuration for the given key, if it exists.
    fn config_by_key(&self, key: &str) -> Option<&Config>;
}

impl ConfigurationLookup for Configuration {
    fn config_by_key(&self, key: &str) -> Option<&Config> {
        self.get(key)
    }
}

impl ConfigurationLookup for HashMap<String, Config> {
    fn config_by_key(&self, key: &str) -> Option<&Config> {
        self.get(key)
    }
}

/// An absent lookup behaves as an empty one, so evaluating before the first sync resolves every
/// key through the unknown-key path.
impl<L: ConfigurationLookup + ?Sized> ConfigurationLookup for Option<&L> {
    fn config_by_key(&self, key: &str) -> Option<&Config> {
        self.and_then(|lookup| lookup.config_by_key(key))
    }
}

/// Evaluate a single configuration against a request context.
///
/// The decision procedure is a waterfall: rules are consulted in ascending priority order and the
/// first accepted rule wins. A rule is accepted when all of its conditions match and, for partial
/// rollouts, the identifier's [bucket](crate::sharder) is below the rule's percentage. A rule
/// excluded by rollout is not terminal; evaluation continues with the next rule.
pub fn evaluate_config(config: &Config, filters: &Filters, identifier: &str) -> EvaluationResult {
    if !config.is_active {
        return EvaluationResult {
            value: serde_json::Value::Null,
            rule_id: RULE_ID_NONE.to_owned(),
            reason: EvaluationReason::Disabled,
        };
    }

    for rule in &config.rules {
        if !rule.matches(filters) {
            continue;
        }

        // At 100% the bucket check is skipped: every bucket is below 100.
        if rule.rollout_percentage < 100 {
            let bucket = Sha256Sharder.bucket(identifier, &rule.id);
            if bucket >= rule.rollout_percentage {
                // Excluded from the rollout; later rules may still accept.
                continue;
            }
        }

        return EvaluationResult {
            value: rule.return_value.clone(),
            rule_id: rule.id.clone(),
            reason: EvaluationReason::Match,
        };
    }

    EvaluationResult {
        value: config.default_value.clone(),
        rule_id: RULE_ID_DEFAULT.to_owned(),
        reason: EvaluationReason::Fallback,
    }
}

/// Evaluate every requested key, producing one result per key.
///
/// Keys absent from the lookup still get an explicit `{null, "none", FALLBACK}` entry; callers
/// can rely on the result containing every requested key. Keys are processed in request order.
pub fn evaluate_batch<L: ConfigurationLookup + ?Sized>(
    lookup: &L,
    request: &EvaluateRequest,
) -> HashMap<String, EvaluationResult> {
    let identifier = request.rollout_identifier();

    request
        .keys
        .iter()
        .map(|key| {
            let result = match lookup.config_by_key(key) {
                Some(config) => evaluate_config(config, &request.filters, &identifier),
                None => EvaluationResult {
                    value: serde_json::Value::Null,
                    rule_id: RULE_ID_NONE.to_owned(),
                    reason: EvaluationReason::Fallback,
                },
            };
            (key.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{evaluate_batch, evaluate_config, RULE_ID_DEFAULT, RULE_ID_NONE};
    use crate::{
        flags::{
            Condition, ConditionValue, Config, ConfigType, EvaluateRequest, EvaluationReason,
            Operator, Rule,
        },
        Configuration, Filters,
    };

    fn config(is_active: bool, rules: Vec<Rule>) -> Config {
        Config {
            key: "feature_x".to_owned(),
            config_type: ConfigType::Boolean,
            is_active,
            default_value: false.into(),
            rules,
        }
    }

    fn rule(id: &str, priority: i64, conditions: Vec<Condition>, rollout: u32) -> Rule {
        Rule {
            id: id.to_owned(),
            conditions,
            return_value: true.into(),
            priority,
            rollout_percentage: rollout,
        }
    }

    fn tier_equals_vip() -> Condition {
        Condition {
            attribute: "tier".to_owned(),
            operator: Operator::Equals,
            value: ConditionValue::Single("vip".to_owned()),
        }
    }

    fn vip_filters() -> Filters {
        [("tier".to_owned(), "VIP".into())].into_iter().collect()
    }

    #[test]
    fn inactive_config_is_disabled_regardless_of_rules() {
        let config = config(false, vec![rule("rule-1", 0, vec![], 100)]);
        let result = evaluate_config(&config, &vip_filters(), "user-1");

        assert_eq!(result.value, serde_json::Value::Null);
        assert_eq!(result.rule_id, RULE_ID_NONE);
        assert_eq!(result.reason, EvaluationReason::Disabled);
    }

    #[test]
    fn empty_rule_list_falls_back_to_default() {
        let config = config(true, vec![]);
        let result = evaluate_config(&config, &vip_filters(), "user-1");

        assert_eq!(result.value, serde_json::Value::Bool(false));
        assert_eq!(result.rule_id, RULE_ID_DEFAULT);
        assert_eq!(result.reason, EvaluationReason::Fallback);
    }

    #[test]
    fn matching_rule_is_accepted_case_insensitively() {
        let config = config(true, vec![rule("rule-1", 0, vec![tier_equals_vip()], 100)]);
        let result = evaluate_config(&config, &vip_filters(), "user-1");

        assert_eq!(result.value, serde_json::Value::Bool(true));
        assert_eq!(result.rule_id, "rule-1");
        assert_eq!(result.reason, EvaluationReason::Match);
    }

    #[test]
    fn non_matching_rule_falls_back_to_default() {
        let config = config(true, vec![rule("rule-1", 0, vec![tier_equals_vip()], 100)]);
        let filters = [("tier".to_owned(), "basic".into())].into_iter().collect();
        let result = evaluate_config(&config, &filters, "user-1");

        assert_eq!(result.value, serde_json::Value::Bool(false));
        assert_eq!(result.rule_id, RULE_ID_DEFAULT);
        assert_eq!(result.reason, EvaluationReason::Fallback);
    }

    #[test]
    fn waterfall_accepts_the_lowest_priority_rule() {
        let config = config(
            true,
            vec![
                rule("first", 0, vec![tier_equals_vip()], 100),
                rule("second", 1, vec![tier_equals_vip()], 100),
            ],
        );
        let result = evaluate_config(&config, &vip_filters(), "user-1");
        assert_eq!(result.rule_id, "first");
    }

    #[test]
    fn rollout_zero_always_excludes() {
        let config = config(true, vec![rule("rule-1", 0, vec![], 0)]);
        for n in 0..20 {
            let result = evaluate_config(&config, &Filters::new(), &format!("user-{n}"));
            assert_eq!(result.reason, EvaluationReason::Fallback);
            assert_eq!(result.rule_id, RULE_ID_DEFAULT);
        }
    }

    #[test]
    fn rollout_hundred_always_accepts() {
        let config = config(true, vec![rule("rule-1", 0, vec![], 100)]);
        for n in 0..20 {
            let result = evaluate_config(&config, &Filters::new(), &format!("user-{n}"));
            assert_eq!(result.reason, EvaluationReason::Match);
        }
    }

    #[test]
    fn rollout_gates_on_the_identifier_bucket() {
        // bucket("carol", "rule-a") == 27, bucket("dave", "rule-a") == 56.
        let config = config(true, vec![rule("rule-a", 0, vec![], 30)]);

        let included = evaluate_config(&config, &Filters::new(), "carol");
        assert_eq!(included.reason, EvaluationReason::Match);
        assert_eq!(included.rule_id, "rule-a");

        let excluded = evaluate_config(&config, &Filters::new(), "dave");
        assert_eq!(excluded.reason, EvaluationReason::Fallback);
        assert_eq!(excluded.rule_id, RULE_ID_DEFAULT);
    }

    #[test]
    fn rollout_exclusion_falls_through_to_the_next_rule() {
        // "dave" is excluded from rule-a at 30% (bucket 56) but rule-b has no rollout gate.
        let config = config(
            true,
            vec![rule("rule-a", 0, vec![], 30), rule("rule-b", 1, vec![], 100)],
        );
        let result = evaluate_config(&config, &Filters::new(), "dave");

        assert_eq!(result.reason, EvaluationReason::Match);
        assert_eq!(result.rule_id, "rule-b");
    }

    #[test]
    fn rollout_boundary_bucket_is_excluded() {
        // bucket("user-1", "rule-1") == 92: excluded at 92%, included at 93%.
        let at_bucket = config(true, vec![rule("rule-1", 0, vec![], 92)]);
        let result = evaluate_config(&at_bucket, &Filters::new(), "user-1");
        assert_eq!(result.reason, EvaluationReason::Fallback);

        let above_bucket = config(true, vec![rule("rule-1", 0, vec![], 93)]);
        let result = evaluate_config(&above_bucket, &Filters::new(), "user-1");
        assert_eq!(result.reason, EvaluationReason::Match);
    }

    #[test]
    fn non_matching_rule_is_skipped_without_bucketing() {
        // A rule whose conditions fail is skipped outright; it neither matches nor consumes the
        // identifier's rollout bucket.
        let config = config(
            true,
            vec![
                rule("gated", 0, vec![tier_equals_vip()], 0),
                rule("open", 1, vec![], 100),
            ],
        );
        let filters = [("tier".to_owned(), "basic".into())].into_iter().collect();
        let result = evaluate_config(&config, &filters, "user-1");
        assert_eq!(result.rule_id, "open");
    }

    #[test]
    fn batch_produces_explicit_entries_for_unknown_keys() {
        let configuration = Configuration::from_server_response(vec![config(true, vec![])]);
        let request = EvaluateRequest {
            filters: Filters::new(),
            keys: vec!["feature_x".to_owned(), "missing".to_owned()],
            identifier: None,
        };

        let results = evaluate_batch(&configuration, &request);
        assert_eq!(results.len(), 2);

        let missing = &results["missing"];
        assert_eq!(missing.value, serde_json::Value::Null);
        assert_eq!(missing.rule_id, RULE_ID_NONE);
        assert_eq!(missing.reason, EvaluationReason::Fallback);

        let known = &results["feature_x"];
        assert_eq!(known.rule_id, RULE_ID_DEFAULT);
    }

    #[test]
    fn batch_uses_the_filters_identifier_for_bucketing() {
        // bucket("carol", "rule-a") == 27 (included at 30%), bucket("dave", "rule-a") == 56.
        let configuration =
            Configuration::from_server_response(vec![config(true, vec![rule("rule-a", 0, vec![], 30)])]);

        let request = EvaluateRequest {
            filters: [("identifier".to_owned(), "carol".into())].into_iter().collect(),
            keys: vec!["feature_x".to_owned()],
            identifier: Some("dave".to_owned()),
        };
        let results = evaluate_batch(&configuration, &request);
        assert_eq!(results["feature_x"].reason, EvaluationReason::Match);

        let request = EvaluateRequest {
            filters: Filters::new(),
            keys: vec!["feature_x".to_owned()],
            identifier: Some("dave".to_owned()),
        };
        let results = evaluate_batch(&configuration, &request);
        assert_eq!(results["feature_x"].reason, EvaluationReason::Fallback);
    }

    #[test]
    fn batch_is_idempotent() {
        let configuration = Configuration::from_server_response(vec![config(
            true,
            vec![rule("rule-a", 0, vec![tier_equals_vip()], 50)],
        )]);
        let request = EvaluateRequest {
            filters: vip_filters(),
            keys: vec!["feature_x".to_owned(), "missing".to_owned()],
            identifier: Some("user-7".to_owned()),
        };

        let first = evaluate_batch(&configuration, &request);
        let second = evaluate_batch(&configuration, &request);
        assert_eq!(first, second);
    }

    #[test]
    fn batch_works_over_a_plain_map_lookup() {
        let mut lookup = HashMap::new();
        lookup.insert("feature_x".to_owned(), config(true, vec![]));

        let request = EvaluateRequest {
            filters: Filters::new(),
            keys: vec!["feature_x".to_owned()],
            identifier: None,
        };
        let results = evaluate_batch(&lookup, &request);
        assert_eq!(results["feature_x"].reason, EvaluationReason::Fallback);
    }
}
