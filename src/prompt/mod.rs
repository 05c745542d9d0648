//! Instruction templates sent to the LLM
//!
//! The user's raw request is embedded verbatim; the surrounding text tells the
//! model which kind of ticket to write. Output shape is enforced separately by
//! the JSON schema on the chat call.

/// Kind of ticket the instruction asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    /// Concise summary plus detailed description
    Task,
    /// Connextra-style user story with acceptance criteria
    Story,
}

impl TicketKind {
    pub fn from_flag(user_story: bool) -> Self {
        if user_story {
            TicketKind::Story
        } else {
            TicketKind::Task
        }
    }
}

/// Maximum summary length requested from the model for non-story tickets.
/// Requested only; nothing enforces it server-side.
pub const SUMMARY_TARGET_CHARS: usize = 100;

/// Build the instruction for a ticket of `kind` from the user's request
pub fn build_instruction(kind: TicketKind, request: &str) -> String {
    match kind {
        TicketKind::Story => format!(
            r#"
Based on the following user request, generate a JIRA user story ticket using the Connextra template format.

The summary should follow the format: "As a [user], I want [feature] so that [benefit]"
The description should be detailed and well-formatted, including:
- Acceptance criteria
- Technical details
- Requirements
- Context

User request: {request}

Please structure the response as a proper user story with clear acceptance criteria.
"#
        ),
        TicketKind::Task => format!(
            r#"
Based on the following user request, generate a JIRA ticket with an appropriate summary and detailed description.

The summary should be concise (under {SUMMARY_TARGET_CHARS} characters) and capture the main request.
The description should be detailed and well-formatted, including any technical details, requirements, or context.

User request: {request}
"#
        ),
    }
}
