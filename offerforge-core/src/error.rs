//! Error taxonomy for the rendering engine.

use thiserror::Error;

/// Errors raised while resolving or rendering a single template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template {template} failed to render: {reason}")]
    Render { template: String, reason: String },

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl TemplateError {
    pub fn render(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            reason: reason.into(),
        }
    }
}

/// Returned by the fallback facade once both attempts have failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render offer template")]
    Failed {
        template_id: String,
        fallback_template_id: String,
        #[source]
        source: TemplateError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("{}PDF HTML must be a string.", label(.context))]
    NotAString { context: Option<String> },

    #[error("{}HTML is missing the PDF engine signature.", label(.context))]
    Missing { context: Option<String> },

    #[error("{}HTML carries {count} PDF engine signatures, expected one.", label(.context))]
    Duplicated { context: Option<String>, count: usize },
}

fn label(context: &Option<String>) -> String {
    match context {
        Some(ctx) => format!("[{ctx}] "),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_hash_failure_is_not_a_render_failure() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RenderError::from(json_err);
        assert!(matches!(err, RenderError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }

    #[test]
    fn signature_labels() {
        let err = SignatureError::Duplicated { context: Some("free.minimal@1.0.0".into()), count: 2 };
        assert_eq!(
            err.to_string(),
            "[free.minimal@1.0.0] HTML carries 2 PDF engine signatures, expected one."
        );
        assert_eq!(
            SignatureError::Missing { context: None }.to_string(),
            "HTML is missing the PDF engine signature."
        );
    }
}
