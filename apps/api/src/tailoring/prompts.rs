// Tailoring prompt templates.
// Replace `{role}` and `{prd_content}` before sending.

use crate::llm_client::prompts::fill_template;

pub const TAILORING_PROMPT_TEMPLATE: &str = r#"You are helping a Product Manager communicate a PRD to a {role}.

Extract and summarize only the information from this PRD that is relevant to a {role}'s responsibilities and concerns. Focus on:
- Technical requirements specific to their role
- Dependencies they need to be aware of
- Deliverables expected from them
- Timeline and milestones affecting their work

Keep it concise and jargon-free where possible. Format it in clear sections with Markdown.

PRD Content:
{prd_content}"#;

/// Builds the tailoring prompt for one stakeholder role.
pub fn build_tailoring_prompt(role: &str, prd_content: &str) -> String {
    fill_template(
        TAILORING_PROMPT_TEMPLATE,
        &[("role", role.trim()), ("prd_content", prd_content)],
    )
}
