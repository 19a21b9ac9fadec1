//! # LLM Helpers
//!
//! radkit's `LlmFunction` and `LlmWorker` are generic over a concrete
//! `BaseLlm`, so the provider has to be picked where the client is used.
//! `with_llm!` builds the client for the configured provider, binds it to
//! the given name and evaluates the body once with it.
//!
//! ```rust,ignore
//! let plan = with_llm!(&config, llm => {
//!     LlmFunction::<Plan>::new_with_system_instructions(llm, PLANNER)
//!         .run(input)
//!         .await?
//! });
//! ```

macro_rules! with_llm {
    ($config:expr, $llm:ident => $body:expr) => {{
        use radkit::models::providers::{
            AnthropicLlm, DeepSeekLlm, GeminiLlm, GrokLlm, OpenAILlm, OpenRouterLlm,
        };
        use $crate::models::LlmProvider;

        let config = $config;
        let model = config.model.as_str();
        match config.provider {
            LlmProvider::Anthropic => {
                let $llm = AnthropicLlm::from_env(model)?;
                $body
            }
            // Only OpenAI-compatible endpoints take a base URL
            LlmProvider::OpenAI => {
                let $llm = match config.effective_base_url() {
                    Some(url) => OpenAILlm::from_env(model)?.with_base_url(url),
                    None => OpenAILlm::from_env(model)?,
                };
                $body
            }
            LlmProvider::Gemini => {
                let $llm = GeminiLlm::from_env(model)?;
                $body
            }
            LlmProvider::OpenRouter => {
                let $llm = OpenRouterLlm::from_env(model)?;
                $body
            }
            LlmProvider::Grok => {
                let $llm = GrokLlm::from_env(model)?;
                $body
            }
            LlmProvider::DeepSeek => {
                let $llm = DeepSeekLlm::from_env(model)?;
                $body
            }
        }
    }};
}

pub(crate) use with_llm;
