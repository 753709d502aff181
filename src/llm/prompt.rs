//! Prompt construction for LLM requests.
//!
//! Renders the fixed airports schema plus the user's question into a single
//! instruction prompt, and supplies the persona used as the system message
//! for chat-style models.

use crate::llm::types::Message;

/// Persona sent as the system message to chat-style models.
pub const PERSONA: &str = r#"You are an expert data scientist who knows SQL very well.
You can be provided table schemas and detailed questions to get insights from data,
and you can create accurate SQL queries to extract these insights."#;

/// Schema description of the airports dataset.
pub const SCHEMA: &str = r#""airports" database has the following tables
tbl_2004_final_statistics
tbl_2007_final_statistics
tbl_2008_final_statistics
tbl_2009_final_statistics
tbl_2010_final_statistics
tbl_2011_preliminary_statistics
tbl_2012_preliminary_statistics

tbl_2004_final_statistics has the following schema
      Rank INTEGER,
      Airport TEXT,
      Code TEXT, -- this is in upper case
      Location TEXT, -- this has country name
      Total_Cargo REAL,
      Prev_Rank INTEGER, -- rank for the previous year, 2003
      Percentage_Change REAL

all the other tables have the following schema
      Rank INTEGER,
      Airport TEXT,
      Code TEXT, -- this is in upper case
      Total_Cargo REAL,
      Percentage_Change REAL"#;

/// Instruction prompt template.
const PROMPT_TEMPLATE: &str = r#"{schema}

---
do not explain only provide sql for:
{question}"#;

/// Renders the schema-plus-question prompt.
///
/// The question is embedded verbatim; no filtering is applied.
pub fn build_prompt(question: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{schema}", SCHEMA)
        .replace("{question}", question)
}

/// Immutable prompt material for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    persona: String,
    prompt: String,
}

impl PromptContext {
    /// Builds the context for a question.
    pub fn new(question: &str) -> Self {
        Self {
            persona: PERSONA.to_string(),
            prompt: build_prompt(question),
        }
    }

    /// The rendered schema-plus-question prompt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Two-message exchange for chat-style models: persona, then prompt.
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.persona.clone()),
            Message::user(self.prompt.clone()),
        ]
    }
}
