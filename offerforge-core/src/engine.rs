//! Engine Facade - single entry point for offer rendering
//!
//! Every render goes through tier enforcement first. A failed render is
//! retried exactly once against the default template; a second failure is
//! surfaced as `RenderError::Failed`. No partial output is ever returned.

use serde::Serialize;
use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::error::{RenderError, TemplateError};
use crate::hashing::{compute_job_hash, document_fingerprint};
use crate::model::{Branding, OfferData, OfferImages, PriceRow};
use crate::policy::{
    enforce_template_for_plan_detailed, plan_to_template_tier, PolicyDecision, SubscriptionPlan,
};
use crate::render::i18n::Translator;
use crate::render::sanitize::sanitize_input;
use crate::render::RenderContext;
use crate::signature::{assert_single_signature, PDF_ENGINE_SIGNATURE_TAG};
use crate::templates::{
    TemplateId, TemplateMeta, TemplateRegistry, TemplateTier, DEFAULT_OFFER_TEMPLATE_ID,
};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
thread_local! {
    static RENDER_ATTEMPT_COUNT: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// Render attempts made on the current thread.
#[cfg(feature = "test-hooks")]
pub fn get_render_attempt_count() -> u32 {
    RENDER_ATTEMPT_COUNT.with(|count| count.get())
}

#[cfg(feature = "test-hooks")]
pub fn reset_render_attempt_count() {
    RENDER_ATTEMPT_COUNT.with(|count| count.set(0));
}

/// Everything a render needs. All of it is borrowed from the caller.
#[derive(Clone, Copy)]
pub struct OfferRenderRequest<'a> {
    pub offer: &'a OfferData,
    pub rows: &'a [PriceRow],
    pub branding: Option<&'a Branding>,
    pub images: Option<&'a OfferImages>,
    pub i18n: &'a dyn Translator,
    pub template_id: Option<&'a str>,
    pub plan: SubscriptionPlan,
}

impl<'a> OfferRenderRequest<'a> {
    pub fn new(offer: &'a OfferData, rows: &'a [PriceRow], i18n: &'a dyn Translator, plan: SubscriptionPlan) -> Self {
        Self {
            offer,
            rows,
            branding: None,
            images: None,
            i18n,
            template_id: offer.template_id.as_deref(),
            plan,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedOffer {
    #[serde(skip)]
    pub html: String,
    /// Template that produced `html`. Persist it so the offer re-renders
    /// with the same version later.
    pub template_id: TemplateId,
    pub decision: PolicyDecision,
    pub fell_back: bool,
    pub fingerprint: String,
    pub job_hash: String,
}

#[derive(Serialize)]
struct JobPayload<'a> {
    offer: &'a OfferData,
    rows: &'a [PriceRow],
    branding: Option<&'a Branding>,
    images: Option<&'a OfferImages>,
}

pub struct OfferEngine<'r> {
    registry: &'r TemplateRegistry,
    config: EngineConfig,
}

impl<'r> OfferEngine<'r> {
    pub fn new(registry: &'r TemplateRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered templates paired with whether `plan` may use them.
    pub fn templates_for_plan(&self, plan: SubscriptionPlan) -> Vec<(&'r TemplateMeta, bool)> {
        let plan_tier = plan_to_template_tier(plan);
        self.registry
            .list()
            .iter()
            .map(|meta| (meta, meta.tier == TemplateTier::Free || plan_tier == TemplateTier::Premium))
            .collect()
    }

    /// Enforce, resolve, render and stamp. No fallback.
    pub fn build_offer_html(&self, request: &OfferRenderRequest<'_>) -> Result<String, TemplateError> {
        let resolution = enforce_template_for_plan_detailed(self.registry, request.template_id, request.plan);
        self.render_with(&resolution.id, request)
    }

    pub fn build_offer_html_with_fallback(
        &self,
        request: &OfferRenderRequest<'_>,
    ) -> Result<RenderedOffer, RenderError> {
        let resolution = enforce_template_for_plan_detailed(self.registry, request.template_id, request.plan);

        let err = match self.render_with(&resolution.id, request) {
            Ok(html) => return self.finish(html, resolution.id, resolution.decision, false, request),
            Err(err) => err,
        };

        let fallback_id = TemplateId::default_offer();
        warn!(
            template_id = %resolution.id,
            stored_template_id = ?request.offer.template_id,
            fallback_template_id = %fallback_id,
            offer_id = %request.offer.id,
            error = %err,
            "template render failed, using fallback"
        );

        let mut offer = request.offer.clone();
        offer.template_id = Some(fallback_id.to_string());
        offer.legacy_template_id = self
            .registry
            .get(fallback_id.as_str())
            .and_then(|meta| meta.legacy_id.clone());
        let fallback_request = OfferRenderRequest {
            offer: &offer,
            template_id: Some(DEFAULT_OFFER_TEMPLATE_ID),
            ..*request
        };
        let decision = PolicyDecision::FellBack {
            requested: resolution.id.clone(),
            reason: err.to_string(),
        };

        match self.render_with(&fallback_id, &fallback_request) {
            Ok(html) => self.finish(html, fallback_id.clone(), decision, true, &fallback_request),
            Err(fallback_err) => {
                error!(
                    template_id = %resolution.id,
                    fallback_template_id = %fallback_id,
                    offer_id = %request.offer.id,
                    error = %fallback_err,
                    "failed to render offer with fallback template"
                );
                Err(RenderError::Failed {
                    template_id: resolution.id.to_string(),
                    fallback_template_id: fallback_id.to_string(),
                    source: fallback_err,
                })
            }
        }
    }

    fn render_with(&self, id: &TemplateId, request: &OfferRenderRequest<'_>) -> Result<String, TemplateError> {
        #[cfg(feature = "test-hooks")]
        RENDER_ATTEMPT_COUNT.with(|count| count.set(count.get() + 1));

        let template = self.registry.load(id.as_str())?;
        let ctx = RenderContext::build(
            request.offer,
            request.rows,
            request.branding,
            request.images,
            request.i18n,
            &self.config,
        );
        let head = template.render_head(&ctx)?;
        let body = template.render_body(&ctx)?;
        let html = compose_document(&ctx, &head, &body);

        if self.config.enforce_signature {
            assert_single_signature(&html, Some(id.as_str()))?;
        }
        Ok(html)
    }

    fn finish(
        &self,
        html: String,
        template_id: TemplateId,
        decision: PolicyDecision,
        fell_back: bool,
        request: &OfferRenderRequest<'_>,
    ) -> Result<RenderedOffer, RenderError> {
        let version = template_id
            .version()
            .map(|v| v.to_string())
            .unwrap_or_default();
        let payload = JobPayload {
            offer: request.offer,
            rows: request.rows,
            branding: request.branding,
            images: request.images,
        };
        let job_hash = compute_job_hash(template_id.as_str(), &version, &payload, ENGINE_VERSION)?;
        Ok(RenderedOffer {
            fingerprint: document_fingerprint(&html),
            html,
            template_id,
            decision,
            fell_back,
            job_hash,
        })
    }
}

impl Default for OfferEngine<'static> {
    fn default() -> Self {
        Self::new(TemplateRegistry::builtin(), EngineConfig::default())
    }
}

fn compose_document(ctx: &RenderContext<'_>, head: &str, body: &str) -> String {
    let title = if ctx.slots.doc.title.is_empty() {
        sanitize_input(&ctx.i18n.translate("offer.title"))
    } else {
        ctx.slots.doc.title.clone()
    };
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"{lang}\">\n",
            "<head>\n<meta charset=\"utf-8\">\n{signature}\n<title>{title}</title>\n</head>\n",
            "<body>\n{head}\n{body}\n</body>\n",
            "</html>\n"
        ),
        lang = ctx.locale().tag(),
        signature = PDF_ENGINE_SIGNATURE_TAG,
        title = title,
        head = head,
        body = body,
    )
}

pub fn build_offer_html(request: &OfferRenderRequest<'_>) -> Result<String, TemplateError> {
    OfferEngine::default().build_offer_html(request)
}

pub fn build_offer_html_with_fallback(request: &OfferRenderRequest<'_>) -> Result<RenderedOffer, RenderError> {
    OfferEngine::default().build_offer_html_with_fallback(request)
}
