//! `{front}` / `{back}` substitution for shortcut templates.
//!
//! Substitution is a single left-to-right pass: text inserted for one
//! placeholder is never scanned again, so a card that literally contains
//! `{back}` does not pull the back side into a front-only prompt.

pub const FRONT_PLACEHOLDER: &str = "{front}";
pub const BACK_PLACEHOLDER: &str = "{back}";

/// Render a template with the current card text.
///
/// A missing `back` renders `{back}` as the empty string. Unknown or
/// unbalanced braces are copied through untouched.
pub fn render(template: &str, front: &str, back: Option<&str>) -> String {
    let back = back.unwrap_or("");
    let mut out = String::with_capacity(template.len() + front.len() + back.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix(FRONT_PLACEHOLDER) {
            out.push_str(front);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(BACK_PLACEHOLDER) {
            out.push_str(back);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    out
}
