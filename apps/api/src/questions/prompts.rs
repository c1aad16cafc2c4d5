// Answer suggestion prompt.
// Replace `{role}`, `{question}` and `{prd_content}` before sending.

use crate::llm_client::prompts::fill_template;

pub const ANSWER_PROMPT_TEMPLATE: &str = r#"A {role} reviewing a PRD has asked the Product Manager the following question:

"{question}"

Draft a short, direct answer the Product Manager can send back. Base it only on the PRD below. If the PRD does not answer the question, say which decision is still open instead of inventing one.

PRD Content:
{prd_content}"#;

pub fn build_answer_prompt(role: &str, question: &str, prd_content: &str) -> String {
    fill_template(
        ANSWER_PROMPT_TEMPLATE,
        &[
            ("role", role.trim()),
            ("question", question.trim()),
            ("prd_content", prd_content),
        ],
    )
}
