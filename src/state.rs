//! Application state: prompt templates, the generation client, and the
//! per-session quiz store.

use tracing::{error, info, instrument};

use crate::config::{load_tutor_config_from_env, Prompts};
use crate::openai::OpenAI;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub openai: OpenAI,
    pub prompts: Prompts,
    pub sessions: SessionStore,
}

impl AppState {
    /// Build state from env: load config and init the OpenAI client.
    ///
    /// A missing OPENAI_API_KEY is a configuration error and fatal: every
    /// flow depends on the generation capability, so there is nothing useful
    /// to serve without it.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, String> {
        let prompts = load_tutor_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let openai = OpenAI::from_env().ok_or_else(|| {
            error!(target: "patterncoach_backend", "OPENAI_API_KEY not set; refusing to start");
            "OPENAI_API_KEY is not set. The generation capability is required.".to_string()
        })?;
        info!(target: "patterncoach_backend", base_url = %openai.base_url, model = %openai.model, "OpenAI enabled.");

        Ok(Self {
            openai,
            prompts,
            sessions: SessionStore::new(),
        })
    }
}
