//! Integrity Stamp - proves HTML came out of this engine
//!
//! Every document the engine emits carries exactly one signature `<meta>` tag
//! in its `<head>`. The PDF conversion step refuses anything without it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::SignatureError;

pub const PDF_ENGINE_META_NAME: &str = "offerforge-pdf-engine";
pub const PDF_ENGINE_META_CONTENT: &str = "offerforge-template-engine/v1";

/// The canonical tag, as written by the engine.
pub const PDF_ENGINE_SIGNATURE_TAG: &str =
    r#"<meta name="offerforge-pdf-engine" content="offerforge-template-engine/v1">"#;

// Attribute order is not guaranteed once HTML has passed through other tools.
static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    let name = regex::escape(PDF_ENGINE_META_NAME);
    let content = regex::escape(PDF_ENGINE_META_CONTENT);
    let pattern = format!(
        r#"(?i)<meta\s+(?:name\s*=\s*["']{name}["']\s+content\s*=\s*["']{content}["']|content\s*=\s*["']{content}["']\s+name\s*=\s*["']{name}["'])\s*/?>"#
    );
    Regex::new(&pattern).expect("signature pattern is a valid regex")
});

/// Minimal well-formed, signed document. Used when a caller needs valid
/// engine HTML without a full template render.
pub fn create_minimal_engine_html(body: Option<&str>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}\n</head>\n<body>{}</body>\n</html>\n",
        PDF_ENGINE_SIGNATURE_TAG,
        body.unwrap_or_default()
    )
}

pub fn html_has_signature(html: &str) -> bool {
    SIGNATURE_RE.is_match(html)
}

/// Untyped check: anything that is not a JSON string is unsigned.
pub fn has_pdf_engine_signature(html: &Value) -> bool {
    html.as_str().is_some_and(html_has_signature)
}

pub fn signature_count(html: &str) -> usize {
    SIGNATURE_RE.find_iter(html).count()
}

pub fn assert_pdf_engine_str(html: &str, context: Option<&str>) -> Result<(), SignatureError> {
    if html_has_signature(html) {
        Ok(())
    } else {
        Err(SignatureError::Missing {
            context: context.map(str::to_owned),
        })
    }
}

pub fn assert_pdf_engine_html(html: &Value, context: Option<&str>) -> Result<(), SignatureError> {
    match html.as_str() {
        Some(s) => assert_pdf_engine_str(s, context),
        None => Err(SignatureError::NotAString {
            context: context.map(str::to_owned),
        }),
    }
}

/// Engine output carries the tag exactly once; a template that stamps its
/// own copy is rejected.
pub fn assert_single_signature(html: &str, context: Option<&str>) -> Result<(), SignatureError> {
    assert_pdf_engine_str(html, context)?;
    match signature_count(html) {
        1 => Ok(()),
        count => Err(SignatureError::Duplicated {
            context: context.map(str::to_owned),
            count,
        }),
    }
}
