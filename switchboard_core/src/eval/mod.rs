//! Evaluation of flag configurations against request contexts.
mod eval_config;
mod evaluator;

pub use eval_config::{
    evaluate_batch, evaluate_config, ConfigurationLookup, RULE_ID_DEFAULT, RULE_ID_NONE,
};
pub use evaluator::Evaluator;
