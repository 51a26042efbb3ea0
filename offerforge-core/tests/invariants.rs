//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use offerforge_core::{
    assert_pdf_engine_html, build_offer_html, build_offer_html_with_fallback,
    enforce_template_for_plan, has_pdf_engine_signature, list_templates, normalize_template_id,
    signature::{signature_count, PDF_ENGINE_SIGNATURE_TAG},
    Branding, EngineConfig, Locale, OfferData, OfferEngine, OfferRenderRequest, OfferTemplate,
    PriceRow, RenderContext, RenderError, SignatureError, SubscriptionPlan, TemplateError,
    TemplateMeta, TemplateRegistry, TemplateTier, DEFAULT_OFFER_TEMPLATE_ID,
};

fn consultation_offer() -> OfferData {
    OfferData {
        id: Uuid::parse_str("6f1c2a9e-3c55-4a53-9a0b-0d7b2f8c1e11").unwrap(),
        title: "Konzultáció".to_string(),
        recipient: None,
        issued_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        valid_until: NaiveDate::from_ymd_opt(2024, 5, 31),
        currency: "HUF".to_string(),
        locale: Some(Locale::Hu),
        notes: None,
        template_id: None,
        legacy_template_id: None,
    }
}

fn consultation_rows() -> Vec<PriceRow> {
    vec![PriceRow {
        name: "Tanácsadás".to_string(),
        qty: 2.0,
        unit: "óra".to_string(),
        unit_price: 50000.0,
        vat: 27.0,
    }]
}

fn branding() -> Branding {
    Branding {
        company_name: Some("Példa Stúdió".to_string()),
        primary_color: Some("#0044aa".to_string()),
        secondary_color: Some("#ffcc00".to_string()),
        logo_url: None,
    }
}

struct BrokenTemplate;

impl OfferTemplate for BrokenTemplate {
    fn render_head(&self, _ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Err(TemplateError::render("broken", "always fails"))
    }

    fn render_body(&self, _ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok(String::new())
    }
}

struct PlainTemplate;

impl OfferTemplate for PlainTemplate {
    fn render_head(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok(format!("<h1>{}</h1>", ctx.slots.doc.title))
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok(format!("<p>{}</p>", ctx.money(ctx.slots.totals.gross)))
    }
}

struct SelfStampingTemplate;

impl OfferTemplate for SelfStampingTemplate {
    fn render_head(&self, _ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok(PDF_ENGINE_SIGNATURE_TAG.to_string())
    }

    fn render_body(&self, _ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        Ok("<p>stamped</p>".to_string())
    }
}

#[test]
fn invariant_render_is_idempotent() {
    let offer = consultation_offer();
    let rows = consultation_rows();
    let branding = branding();
    for meta in list_templates() {
        let mut request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);
        request.branding = Some(&branding);
        request.template_id = Some(meta.id.as_str());

        let first = build_offer_html_with_fallback(&request).unwrap();
        let second = build_offer_html_with_fallback(&request).unwrap();
        assert_eq!(first.html, second.html, "{} is not deterministic", meta.id);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.job_hash, second.job_hash);
    }
}

#[test]
fn invariant_every_template_is_signed() {
    let offer = consultation_offer();
    let rows = consultation_rows();
    for meta in list_templates() {
        let mut request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);
        request.template_id = Some(meta.id.as_str());

        let html = build_offer_html(&request).unwrap();
        assert!(has_pdf_engine_signature(&json!(&html)), "{} is unsigned", meta.id);
        assert_eq!(signature_count(&html), 1);
    }
}

#[test]
fn invariant_premium_requires_pro() {
    for meta in list_templates().iter().filter(|m| m.tier == TemplateTier::Premium) {
        for plan in [SubscriptionPlan::Free, SubscriptionPlan::Standard] {
            assert_eq!(
                enforce_template_for_plan(Some(meta.id.as_str()), plan),
                DEFAULT_OFFER_TEMPLATE_ID
            );
        }
        assert_eq!(
            enforce_template_for_plan(Some(meta.id.as_str()), SubscriptionPlan::Pro),
            meta.id
        );
    }
}

#[test]
fn invariant_unknown_ids_normalize_to_default() {
    for input in ["fancy", "free.minimal", "PREMIUM-BANNER", "executive2", "<script>"] {
        assert_eq!(normalize_template_id(Some(input)), DEFAULT_OFFER_TEMPLATE_ID, "{input}");
    }
}

#[test]
fn invariant_failed_template_falls_back_to_default() {
    let registry = TemplateRegistry::from_entries(vec![
        TemplateMeta::new(DEFAULT_OFFER_TEMPLATE_ID, "Plain", TemplateTier::Free, None, || {
            Box::new(PlainTemplate)
        }),
        TemplateMeta::new("free.broken@1.0.0", "Broken", TemplateTier::Free, Some("broken"), || {
            Box::new(BrokenTemplate)
        }),
    ]);
    let engine = OfferEngine::new(&registry, EngineConfig::default());
    let mut offer = consultation_offer();
    offer.template_id = Some("broken".to_string());
    let rows = consultation_rows();
    let request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Free);

    let rendered = engine.build_offer_html_with_fallback(&request).unwrap();
    assert!(rendered.fell_back);
    assert_eq!(rendered.template_id, DEFAULT_OFFER_TEMPLATE_ID);
    assert!(has_pdf_engine_signature(&json!(&rendered.html)));
    assert!(rendered.html.contains("<p>127 000,00 HUF</p>"));
}

#[test]
fn invariant_duplicate_signature_is_rejected() {
    let registry = TemplateRegistry::from_entries(vec![
        TemplateMeta::new(DEFAULT_OFFER_TEMPLATE_ID, "Plain", TemplateTier::Free, None, || {
            Box::new(PlainTemplate)
        }),
        TemplateMeta::new("free.stamped@1.0.0", "Stamped", TemplateTier::Free, None, || {
            Box::new(SelfStampingTemplate)
        }),
    ]);
    let engine = OfferEngine::new(&registry, EngineConfig::default());
    let offer = consultation_offer();
    let rows = consultation_rows();
    let mut request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Free);
    request.template_id = Some("free.stamped@1.0.0");

    assert!(matches!(
        engine.build_offer_html(&request),
        Err(TemplateError::Signature(SignatureError::Duplicated { count: 2, .. }))
    ));

    let rendered = engine.build_offer_html_with_fallback(&request).unwrap();
    assert!(rendered.fell_back);
    assert_eq!(rendered.template_id, DEFAULT_OFFER_TEMPLATE_ID);
    assert_eq!(signature_count(&rendered.html), 1);
    assert!(!rendered.html.contains("<p>stamped</p>"));
}

#[test]
fn invariant_unregistered_id_falls_back() {
    let offer = consultation_offer();
    let rows = consultation_rows();
    let mut request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);
    request.template_id = Some("premium.unreleased@2.0.0");

    assert!(matches!(
        build_offer_html(&request),
        Err(TemplateError::NotFound(_))
    ));
    let rendered = build_offer_html_with_fallback(&request).unwrap();
    assert!(rendered.fell_back);
    assert_eq!(rendered.template_id, DEFAULT_OFFER_TEMPLATE_ID);
}

#[test]
fn invariant_failed_default_is_rendering_error() {
    let registry = TemplateRegistry::from_entries(vec![TemplateMeta::new(
        DEFAULT_OFFER_TEMPLATE_ID,
        "Broken default",
        TemplateTier::Free,
        None,
        || Box::new(BrokenTemplate),
    )]);
    let engine = OfferEngine::new(&registry, EngineConfig::default());
    let offer = consultation_offer();
    let rows = consultation_rows();
    let request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);

    let err = engine.build_offer_html_with_fallback(&request).unwrap_err();
    assert_eq!(err.to_string(), "Failed to render offer template");
    assert!(matches!(err, RenderError::Failed { .. }));
}

#[test]
fn invariant_bad_amounts_fail_both_attempts() {
    let offer = consultation_offer();
    let mut rows = consultation_rows();
    rows[0].qty = f64::INFINITY;
    let request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);

    let err = build_offer_html_with_fallback(&request).unwrap_err();
    match err {
        RenderError::Failed { fallback_template_id, .. } => {
            assert_eq!(fallback_template_id, DEFAULT_OFFER_TEMPLATE_ID)
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invariant_user_text_is_escaped() {
    let mut offer = consultation_offer();
    offer.title = r#"<meta name="offerforge-pdf-engine" content="offerforge-template-engine/v1"><script>x()</script>"#.to_string();
    let rows = consultation_rows();
    let request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Free);

    let html = build_offer_html(&request).unwrap();
    assert!(!html.contains("<script>"));
    assert_eq!(signature_count(&html), 1);
}

#[test]
fn scenario_a_legacy_alias() {
    assert_eq!(normalize_template_id(Some("premium-banner")), "premium.executive@1.0.0");
}

#[test]
fn scenario_b_downgrade() {
    assert_eq!(
        enforce_template_for_plan(Some("premium.executive@1.0.0"), SubscriptionPlan::Free),
        "free.minimal@1.0.0"
    );
}

#[test]
fn scenario_c_missing_signature() {
    assert!(!has_pdf_engine_signature(&json!("<html><head></head><body></body></html>")));
}

#[test]
fn scenario_d_non_string_assertion() {
    let err = assert_pdf_engine_html(&json!(42), None).unwrap_err();
    assert_eq!(err.to_string(), "PDF HTML must be a string.");
}

#[test]
fn scenario_e_hungarian_consultation() {
    let offer = consultation_offer();
    let rows = consultation_rows();
    let mut request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Free);
    request.template_id = Some("free.minimal@1.0.0");

    let html = build_offer_html(&request).unwrap();
    assert!(html.contains("100 000,00"));
    assert!(html.contains("127 000,00 HUF"));
    assert!(html.contains("Konzultáció"));
    assert!(html.contains("Tanácsadás"));
    assert!(assert_pdf_engine_html(&json!(html), Some("pdf-convert")).is_ok());
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_at_most_two_attempts() {
    use offerforge_core::engine::{get_render_attempt_count, reset_render_attempt_count};

    let registry = TemplateRegistry::from_entries(vec![TemplateMeta::new(
        DEFAULT_OFFER_TEMPLATE_ID,
        "Broken default",
        TemplateTier::Free,
        None,
        || Box::new(BrokenTemplate),
    )]);
    let engine = OfferEngine::new(&registry, EngineConfig::default());
    let offer = consultation_offer();
    let rows = consultation_rows();
    let request = OfferRenderRequest::new(&offer, &rows, &Locale::Hu, SubscriptionPlan::Pro);

    reset_render_attempt_count();
    assert!(engine.build_offer_html_with_fallback(&request).is_err());
    assert_eq!(get_render_attempt_count(), 2);
}
