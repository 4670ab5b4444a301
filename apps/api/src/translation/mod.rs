// Korean shift plan → Chief Hank work instructions.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod handlers;
pub mod prompts;
pub mod translator;

pub use translator::{TranslationFailure, TranslationResult, Translator};
