//! Static resolution of string literals.
//!
//! Handles quoted strings with escape sequences (`"\x65val"`), simple template
//! literals and `+` concatenation chains (`'ev' + 'al'`).

use super::SourceContext;
use tree_sitter::Node;

/// Try to statically resolve a string expression.
pub(super) fn resolve_string(node: Node, ctx: &SourceContext, depth: usize) -> Option<String> {
    if depth > ctx.config.max_concat_depth {
        return None;
    }

    match node.kind() {
        "string" => {
            let body = unquote(ctx.text(node)?)?;
            Some(decode_escapes(body))
        }
        "template_string" => {
            // Only templates without substitutions are static
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|c| c.kind() == "template_substitution");
            if has_substitution {
                return None;
            }
            let body = unquote(ctx.text(node)?)?;
            Some(decode_escapes(body))
        }
        "binary_expression" | "binary_operator" => {
            let operator = node.child_by_field_name("operator")?;
            if ctx.text(operator)? != "+" {
                return None;
            }

            let left = node.child_by_field_name("left")?;
            let right = node.child_by_field_name("right")?;

            let left_val = resolve_string(left, ctx, depth + 1)?;
            let right_val = resolve_string(right, ctx, depth + 1)?;

            Some(format!("{}{}", left_val, right_val))
        }
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut value = String::new();
            for part in node.named_children(&mut cursor) {
                value.push_str(&resolve_string(part, ctx, depth + 1)?);
            }
            Some(value)
        }
        "parenthesized_expression" => {
            let inner = node.named_child(0)?;
            resolve_string(inner, ctx, depth + 1)
        }
        _ => None,
    }
}

/// Strip the quotes (and any Python string prefix) from a literal.
pub(super) fn unquote(text: &str) -> Option<&str> {
    let body = text.trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'));
    for quote in ["\"\"\"", "'''", "\"", "'", "`"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return Some(&body[quote.len()..body.len() - quote.len()]);
        }
    }
    None
}

/// Decode `\xHH`, `\uHHHH`, `\u{H..}` and the common single-character escapes.
fn decode_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some('x') => {
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.next_if(|ch| ch.is_ascii_hexdigit()) {
                        Some(ch) => hex.push(ch),
                        None => break,
                    }
                }
                if let Ok(code) = u8::from_str_radix(&hex, 16) {
                    result.push(code as char);
                }
            }
            Some('u') => {
                let mut hex = String::new();
                if chars.next_if_eq(&'{').is_some() {
                    while let Some(ch) = chars.next_if(|ch| ch.is_ascii_hexdigit()) {
                        hex.push(ch);
                    }
                    chars.next_if_eq(&'}');
                } else {
                    while hex.len() < 4 {
                        match chars.next_if(|ch| ch.is_ascii_hexdigit()) {
                            Some(ch) => hex.push(ch),
                            None => break,
                        }
                    }
                }
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    result.push(ch);
                }
            }
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'eval'"), Some("eval"));
        assert_eq!(unquote("\"eval\""), Some("eval"));
        assert_eq!(unquote("`eval`"), Some("eval"));
        assert_eq!(unquote("r'raw'"), Some("raw"));
        assert_eq!(unquote("'''doc'''"), Some("doc"));
        assert_eq!(unquote("'"), None);
        assert_eq!(unquote("eval"), None);
    }

    #[test]
    fn test_decode_hex_and_unicode() {
        assert_eq!(decode_escapes(r"\x65\x76\x61\x6c"), "eval");
        assert_eq!(decode_escapes(r"\u0065\u0076al"), "eval");
        assert_eq!(decode_escapes(r"\u{65}val"), "eval");
        assert_eq!(decode_escapes(r"plain"), "plain");
    }

    #[test]
    fn test_decode_truncated_escapes() {
        assert_eq!(decode_escapes(r"\x6"), "\u{6}");
        assert_eq!(decode_escapes("\\"), "\\");
        assert_eq!(decode_escapes(r"\u{zz}"), "zz}");
    }
}
