use serde::{Deserialize, Serialize};

/// One prior exchange in a conversation, oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Assistant,
}

/// An immutable request to the text-generation backend.
///
/// `prior_turns` is chronological and empty for the stateless flows; the
/// caller reconstructs history from its own storage on each turn, nothing
/// is held server-side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub system_instructions: String,
    pub user_text: String,
    pub prior_turns: Vec<Turn>,
}

impl Prompt {
    pub fn stateless(system_instructions: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            user_text: user_text.into(),
            prior_turns: Vec::new(),
        }
    }

    pub fn with_history(
        system_instructions: impl Into<String>,
        user_text: impl Into<String>,
        prior_turns: Vec<Turn>,
    ) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            user_text: user_text.into(),
            prior_turns,
        }
    }

    /// System instructions and user text joined the way the generation
    /// backend expects a single-part prompt.
    pub fn combined_text(&self) -> String {
        if self.system_instructions.is_empty() {
            return self.user_text.clone();
        }
        format!("{}\n\nRequest: {}", self.system_instructions, self.user_text)
    }
}

/// Successful model output. An envelope with no usable content is a
/// distinct failure state upstream, never an empty `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelResponse {
    pub text: String,
}
