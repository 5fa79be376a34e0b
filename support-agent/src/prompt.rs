//! System prompt builder: retrieved context, category ids, strict JSON output
//! format with worked examples, and the hand-off policy.

use chat_contract::UserMood;
use knowledge_base::RetrievalOutcome;

use crate::categories::CategoryTaxonomy;

/// Placed in the information block when retrieval found nothing.
pub const NO_INFORMATION: &str = "No information found for this query.";

const ROLE: &str = "You are acting as a customer support assistant for a software company. \
Answer only from the information provided below. If the information does not cover the \
question, say so honestly and offer to connect the user with a human agent.";

const OUTPUT_RULES: &str = r#"Respond with a single JSON object and nothing else. Required fields:
- "thinking": brief explanation of your reasoning (string)
- "response": the reply shown to the user (string, may contain markdown)
- "user_mood": one of MOODS
- "suggested_questions": up to three follow-up questions the user might ask (array of strings)
- "debug": {"context_used": true if the information block contributed to the answer}
Optional fields:
- "matched_categories": ids from the category list that apply (array of strings)
- "redirect_to_agent": {"should_redirect": boolean, "reason": string}
Escape newlines inside strings as \n. Do not wrap the object in code fences."#;

const EXAMPLES: &str = r#"Example (answered from the information block):
{
  "thinking": "The user asks how to reset a password; the information block describes the reset flow.",
  "response": "Open **Settings > Security** and choose *Reset password*. A reset link is sent to your email.",
  "user_mood": "curious",
  "suggested_questions": ["What if I no longer have access to my email?", "How do I enable two-factor authentication?"],
  "debug": {"context_used": true},
  "matched_categories": ["account_management"],
  "redirect_to_agent": {"should_redirect": false}
}

Example (hand-off to a human):
{
  "thinking": "The user reports a duplicate charge and is upset; refunds need a human.",
  "response": "I'm sorry about the double charge. I'm connecting you with a billing specialist who can issue the refund.",
  "user_mood": "frustrated",
  "suggested_questions": [],
  "debug": {"context_used": false},
  "matched_categories": ["billing_and_payments"],
  "redirect_to_agent": {"should_redirect": true, "reason": "Refund request requires account access"}
}"#;

const REDIRECT_POLICY: &str = "Set redirect_to_agent.should_redirect to true only when the user \
explicitly asks for a human, is repeatedly frustrated, or needs an action you cannot perform \
(refunds, account changes, legal or security incidents). Otherwise set it to false.";

/// Build the complete system instruction for one support turn.
pub fn build_system_prompt(outcome: &RetrievalOutcome, taxonomy: &CategoryTaxonomy) -> String {
    let information = if outcome.has_context() {
        outcome.context.trim()
    } else {
        NO_INFORMATION
    };

    let categories = taxonomy
        .categories
        .iter()
        .map(|c| format!("- {}: {}", c.id, c.description))
        .collect::<Vec<_>>()
        .join("\n");

    let moods = UserMood::ALL
        .iter()
        .map(|m| format!("\"{}\"", m.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::with_capacity(4096 + information.len());
    out.push_str(ROLE);
    out.push_str("\n\n<information>\n");
    out.push_str(information);
    out.push_str("\n</information>\n\n");
    out.push_str("Categories:\n");
    out.push_str(&categories);
    out.push_str("\n\n");
    out.push_str(&OUTPUT_RULES.replace("MOODS", &moods));
    out.push_str("\n\n");
    out.push_str(EXAMPLES);
    out.push_str("\n\n");
    out.push_str(REDIRECT_POLICY);
    out.push('\n');
    out
}
