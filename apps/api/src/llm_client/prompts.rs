// Shared prompt fragments.
// Each module that calls the model keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// System prompt for every call made on a product manager's behalf.
pub const PM_ASSISTANT_SYSTEM: &str = "\
You are an assistant to a Product Manager. \
You only use information present in the product requirements document you are given. \
If the document does not cover something, say so plainly instead of guessing.";

/// Fills `{name}` placeholders in one pass over `template`.
///
/// Values are inserted as is and never rescanned, so a question that
/// contains `{prd_content}` stays literal. Unknown names are left untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close + 1))
        });
        match value {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
