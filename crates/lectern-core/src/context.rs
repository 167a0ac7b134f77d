//! Joins ranked passages into the bounded context block handed to the
//! generation model.

/// Default character budget for the assembled context.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 2000;

/// Joins passage texts in ranked order with a blank line between them,
/// keeping the result within `max_chars`.
///
/// Truncation keeps the head: passages are taken in rank order and the first
/// one that no longer fits is dropped, along with everything after it. Only
/// when the top passage alone exceeds the budget is it cut mid-text (at a
/// char boundary). The most relevant content always survives.
pub fn assemble(passages: &[String], max_chars: usize) -> String {
    let mut out = String::new();
    for text in passages {
        let sep_len = if out.is_empty() { 0 } else { 2 };
        if out.len() + sep_len + text.len() > max_chars {
            if out.is_empty() {
                out.push_str(truncate_at_char_boundary(text, max_chars));
            }
            break;
        }
        if sep_len > 0 {
            out.push_str("\n\n");
        }
        out.push_str(text);
    }
    out
}

fn truncate_at_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn joins_with_blank_line_when_under_budget() {
        let ctx = assemble(&[p("first passage"), p("second passage")], 100);
        assert_eq!(ctx, "first passage\n\nsecond passage");
    }

    #[test]
    fn drops_least_relevant_passages_first() {
        // 60 + 60 chars against a budget of 50: only the top passage's
        // content may appear, truncated to fit.
        let top = "a".repeat(60);
        let rest = "b".repeat(60);
        let ctx = assemble(&[top.clone(), rest], 50);
        assert!(ctx.len() <= 50);
        assert!(ctx.starts_with("aaa"));
        assert!(!ctx.contains('b'));
    }

    #[test]
    fn keeps_whole_passages_that_fit() {
        let ctx = assemble(&[p("12345"), p("67890"), p("abcde")], 12);
        // 5 + 2 + 5 = 12 fits; adding the third would need 19
        assert_eq!(ctx, "12345\n\n67890");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ééééé".to_string(); // 2 bytes per char
        let ctx = assemble(&[text], 5);
        assert_eq!(ctx, "éé");
    }

    #[test]
    fn empty_input_yields_empty_context() {
        assert_eq!(assemble(&[], 100), "");
    }

    #[test]
    fn zero_budget_yields_empty_context() {
        assert_eq!(assemble(&[p("anything")], 0), "");
    }
}
