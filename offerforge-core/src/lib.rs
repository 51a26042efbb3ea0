//! OfferForge Core - offer document template engine
//!
//! # Guarantees
//! 1. Tier policy runs before every render
//! 2. Every emitted document carries the engine signature
//! 3. A failed template falls back to the default exactly once
//! 4. Rendering is a pure function of its input

pub mod config;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod model;
pub mod policy;
pub mod render;
pub mod signature;
pub mod templates;

pub use config::EngineConfig;
pub use engine::{build_offer_html, build_offer_html_with_fallback, OfferEngine, OfferRenderRequest, RenderedOffer};
pub use error::{ConfigError, RenderError, SignatureError, TemplateError};
pub use model::{Branding, ImageAsset, OfferData, OfferImages, PriceRow, Recipient};
pub use policy::{
    enforce_template_for_plan, normalize_template_id, plan_to_template_tier, template_requires_pro,
    PolicyDecision, SubscriptionPlan, TemplateResolution,
};
pub use render::i18n::{Catalog, Locale, Translator};
pub use render::{OfferTemplate, RenderContext};
pub use signature::{assert_pdf_engine_html, create_minimal_engine_html, has_pdf_engine_signature};
pub use templates::{
    get_offer_template_by_legacy_id, list_templates, load_template, TemplateId, TemplateMeta,
    TemplateRegistry, TemplateTier, DEFAULT_OFFER_TEMPLATE_ID,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
