/// Hosted backend used for model inference.
///
/// Only the Anthropic Messages API is wired today; the enum stays so that a
/// second provider slots in without touching callers.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// assert_eq!(LlmProvider::Anthropic.as_str(), "anthropic");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Anthropic Messages API (`POST /v1/messages`).
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "anthropic",
        }
    }
}
