use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    configuration_store::ConfigurationStore,
    flags::{EvaluateRequest, EvaluationResult},
};

use super::evaluate_batch;

/// Evaluator binds the batch evaluation function to a [`ConfigurationStore`], so callers don't
/// have to thread the current snapshot through every call.
///
/// `evaluate` is synchronous and suspension-free: it reads whatever snapshot is currently
/// published and never triggers a fetch.
pub struct Evaluator {
    configuration_store: Arc<ConfigurationStore>,
}

impl Evaluator {
    pub fn new(configuration_store: Arc<ConfigurationStore>) -> Evaluator {
        Evaluator {
            configuration_store,
        }
    }

    /// Evaluate the requested keys against the current snapshot.
    ///
    /// Before the first successful sync this behaves as evaluation against an empty snapshot:
    /// every requested key resolves to an explicit `{null, "none", FALLBACK}` entry.
    pub fn evaluate(&self, request: &EvaluateRequest) -> HashMap<String, EvaluationResult> {
        let configuration = self.configuration_store.get_configuration();
        if configuration.is_none() {
            log::warn!(target: "switchboard",
                keys:serde = request.keys;
                "evaluating before a configuration snapshot has been synced");
        }

        let results = evaluate_batch(&configuration.as_deref(), request);

        log::trace!(target: "switchboard",
            keys:serde = request.keys;
            "evaluated configuration batch");

        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Evaluator;
    use crate::{
        configuration_store::ConfigurationStore,
        eval::RULE_ID_NONE,
        flags::{Config, ConfigType, EvaluateRequest, EvaluationReason},
        Configuration,
    };

    #[test]
    fn evaluates_as_empty_snapshot_before_first_sync() {
        let store = Arc::new(ConfigurationStore::new());
        let evaluator = Evaluator::new(store);

        let request = EvaluateRequest {
            filters: Default::default(),
            keys: vec!["feature_x".to_owned()],
            identifier: None,
        };
        let results = evaluator.evaluate(&request);

        let result = &results["feature_x"];
        assert_eq!(result.value, serde_json::Value::Null);
        assert_eq!(result.rule_id, RULE_ID_NONE);
        assert_eq!(result.reason, EvaluationReason::Fallback);
    }

    #[test]
    fn picks_up_the_published_snapshot() {
        let store = Arc::new(ConfigurationStore::new());
        let evaluator = Evaluator::new(store.clone());

        store.set_configuration(Arc::new(Configuration::from_server_response(vec![Config {
            key: "feature_x".to_owned(),
            config_type: ConfigType::String,
            is_active: true,
            default_value: "hello".into(),
            rules: vec![],
        }])));

        let request = EvaluateRequest {
            filters: Default::default(),
            keys: vec!["feature_x".to_owned()],
            identifier: None,
        };
        let results = evaluator.evaluate(&request);

        assert_eq!(results["feature_x"].reason, EvaluationReason::Fallback);
        assert_eq!(
            results["feature_x"].value,
            serde_json::Value::String("hello".to_owned())
        );
    }
}
