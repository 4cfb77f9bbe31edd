//! Second-stage response synthesis: result rows (or a persisted search)
//! become a user-facing, lightly HTML-formatted answer.

use secrecy::SecretString;

use askledger_core::datastore::Row;
use askledger_core::prompt::Prompt;

use crate::llm::{LlmClient, LlmError};
use crate::prompts;

/// Deterministic template for the zero-row case. No second model call:
/// there is nothing to summarize, and the query text is the only useful
/// debugging signal the user can act on.
pub fn no_rows_message(sql: &str) -> String {
    format!("I couldn't find any records for that request. (Query used: <code>{sql}</code>)")
}

/// Deterministic template for a persisted saved search. The link stays
/// host-relative so it resolves on any deployment domain.
pub fn saved_search_message(title: &str, location: &str) -> String {
    format!(
        "Success! I saved the search <b>{title}</b>.<br>\
         <a href='{location}' target='_blank'>Click here to open it</a>"
    )
}

/// Asks the model to answer the original question from the (already
/// truncated) result rows. Failures surface to the caller untouched; the
/// query itself succeeded, so swallowing them would hide a real fault.
pub async fn summarize_rows(
    llm: &dyn LlmClient,
    credential: &SecretString,
    rows: &[Row],
    user_text: &str,
) -> Result<String, LlmError> {
    let rows_json = serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string());
    let prompt = Prompt::stateless(String::new(), prompts::summary_prompt(&rows_json, user_text));
    let response = llm.generate(&prompt, credential).await?;
    Ok(response.text)
}

#[cfg(test)]
mod tests {
    use super::{no_rows_message, saved_search_message};

    #[test]
    fn no_rows_template_embeds_literal_query_text() {
        let message = no_rows_message("SELECT * FROM customers WHERE balance > 1000000");
        assert!(message.contains("<code>SELECT * FROM customers WHERE balance > 1000000</code>"));
    }

    #[test]
    fn saved_search_template_links_relative_location() {
        let message = saved_search_message("AI Generated: Open invoices", "/searches/abc-123");
        assert!(message.contains("<b>AI Generated: Open invoices</b>"));
        assert!(message.contains("href='/searches/abc-123'"));
        assert!(!message.contains("http"));
    }
}
