// saml-relay-core/src/escape.rs
// ============================================================================
// Module: Escaping Renderer
// Description: HTML attribute-context escaping.
// Purpose: Make interpolated values injection-safe inside double-quoted
//          attributes.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Escapes the five HTML-significant characters for placement inside a
//! double-quoted attribute. Safe only when applied exactly once per value;
//! the response builder guarantees single application per render.

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes `&`, `<`, `>`, `"`, and `'` for HTML attribute context.
///
/// Single character-level pass, so produced entities are never re-escaped
/// within one application.
#[must_use]
pub fn attribute_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::attribute_escape;

    #[test]
    fn escapes_all_five_significant_characters() {
        assert_eq!(attribute_escape(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#x27;");
    }

    #[test]
    fn passes_through_base64_alphabet_untouched() {
        let payload = "PHNhbWxwOlJlc3BvbnNlPg==";
        assert_eq!(attribute_escape(payload), payload);
    }

    #[test]
    fn neutralizes_attribute_breakout() {
        let escaped = attribute_escape(r#""><script>alert(1)</script>"#);
        assert!(!escaped.contains("<script>"));
        assert!(!escaped.contains('"'));
        assert_eq!(
            escaped,
            "&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn escaping_twice_double_encodes() {
        // Not idempotent: callers must apply it exactly once.
        let once = attribute_escape("<");
        let twice = attribute_escape(&once);
        assert_eq!(once, "&lt;");
        assert_eq!(twice, "&amp;lt;");
    }
}
