//! Classifier boundary: turns operator text plus session history into an
//! [`ActionValue`].

mod openai;
mod prompt;

pub use openai::OpenAiClassifier;
pub use prompt::system_prompt;

use crate::config::ClassifierConfig;
use crate::errors::AppResult;
use crate::models::action::ActionValue;

pub trait Classifier {
    /// Classify `input` with the rolling `history` as context.
    ///
    /// Transport and service failures are returned as
    /// [`AppError::Classification`](crate::errors::AppError::Classification);
    /// the dispatcher turns them into a reply.
    fn classify(&self, input: &str, history: &[String]) -> AppResult<ActionValue>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledClassifier;

impl Classifier for DisabledClassifier {
    fn classify(&self, _input: &str, _history: &[String]) -> AppResult<ActionValue> {
        Ok(ActionValue::reply(
            "The classifier is not configured (missing API key).",
        ))
    }
}

/// Build the classifier for this configuration: the OpenAI adapter when the
/// key variable is set (a `.env` file is honoured), otherwise the disabled one.
pub fn from_config(cfg: &ClassifierConfig) -> AppResult<Box<dyn Classifier>> {
    dotenvy::dotenv().ok();

    match std::env::var(&cfg.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(Box::new(OpenAiClassifier::new(cfg, key.trim())?)),
        _ => Ok(Box::new(DisabledClassifier)),
    }
}
