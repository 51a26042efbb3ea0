//! Sanitization boundary. Every caller-controlled string passes through here
//! before it is interpolated into HTML.

use std::fmt;

/// Text that has already been escaped for HTML text and attribute positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeText(String);

impl SafeText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims, drops control characters and escapes HTML metacharacters.
pub fn sanitize_input(input: &str) -> SafeText {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '\n' | '\t' => out.push(ch),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    SafeText(out)
}

/// Multi-line text with line breaks kept as `<br>`.
pub fn sanitize_multiline(input: &str) -> SafeText {
    let escaped = sanitize_input(input);
    SafeText(escaped.0.replace('\n', "<br>"))
}

/// `#rgb` or `#rrggbb`, otherwise `None`.
pub fn sanitize_color(input: &str) -> Option<SafeText> {
    let value = input.trim();
    let hex = value.strip_prefix('#')?;
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| SafeText(value.to_ascii_lowercase()))
}

/// Accepts http(s) and inline image URLs only.
pub fn sanitize_url(input: &str) -> Option<SafeText> {
    let value = input.trim();
    let lower = value.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("data:image/");
    if !allowed || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    Some(sanitize_input(value))
}
