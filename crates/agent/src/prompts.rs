//! System prompt texts and the fixed schema contract handed to the model.

use askledger_core::search::TITLE_PREFIX;

/// The only tables the model may query. Keeping this description small and
/// fixed is what makes the first-stage translation reliable.
pub const SCHEMA: &str = "transactions (id, trandate, tranid, type, total, entity, status), \
                          customers (id, entityid, companyname, balance)";

/// First-stage instructions for the query-and-summarize flow.
pub fn query_system_prompt() -> String {
    format!(
        "You are a SQL expert for a transactional ledger datastore. \
         Translate the user request into a single SQLite SELECT statement. \
         Return ONLY the raw SQL. No explanations. No markdown. \
         Tables: {SCHEMA}"
    )
}

/// First-stage instructions for the generate-and-persist flow.
pub fn saved_search_system_prompt() -> String {
    format!(
        "You are a ledger assistant. \
         Convert the user request into a JSON object describing a saved search. \
         Include 'target', 'filters', 'columns', and a 'title'. \
         The 'title' must start with '{TITLE_PREFIX}'. \
         Return ONLY the raw JSON object. NO markdown (no ```json). \
         Tables: {SCHEMA}"
    )
}

/// Second-stage instructions that turn result rows into an answer.
pub fn summary_prompt(rows_json: &str, user_text: &str) -> String {
    format!(
        "Based on this ledger data: {rows_json}\n\
         Summarize it to answer: {user_text}\n\
         Use HTML for formatting (bold, lists). Keep it concise."
    )
}
