//! Template Tier Policy - plan gating and id normalization
//!
//! Lookup failures never abort a render: every path resolves to some id,
//! and the reason is reported as a `PolicyDecision`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::templates::{TemplateId, TemplateRegistry, TemplateTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Standard,
    Pro,
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Standard => "standard",
            SubscriptionPlan::Pro => "pro",
        })
    }
}

/// Old flat template names and the canonical ids they now map to.
const LEGACY_TEMPLATE_ALIASES: &[(&str, &str)] = &[
    ("default", "free.minimal@1.0.0"),
    ("modern", "free.minimal@1.0.0"),
    ("classic-table", "free.classic@1.0.0"),
    ("premium", "premium.executive@1.0.0"),
    ("premium-banner", "premium.executive@1.0.0"),
];

/// Why a particular id was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PolicyDecision {
    /// Input already carried a version; used as-is.
    Canonical,
    Aliased { from: String },
    LegacyLookup { from: String },
    DefaultedEmpty,
    DefaultedUnknown { input: String },
    Downgraded { requested: TemplateId, plan: SubscriptionPlan },
    /// The resolved template failed to render; the default was used instead.
    FellBack { requested: TemplateId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateResolution {
    pub id: TemplateId,
    pub decision: PolicyDecision,
}

impl TemplateResolution {
    fn new(id: TemplateId, decision: PolicyDecision) -> Self {
        if decision != PolicyDecision::Canonical {
            debug!(template_id = %id, decision = ?decision, "template id resolved");
        }
        Self { id, decision }
    }

    pub fn is_default_fallback(&self) -> bool {
        matches!(
            self.decision,
            PolicyDecision::DefaultedEmpty
                | PolicyDecision::DefaultedUnknown { .. }
                | PolicyDecision::Downgraded { .. }
                | PolicyDecision::FellBack { .. }
        )
    }
}

pub fn resolve_template_id_in(registry: &TemplateRegistry, id: Option<&str>) -> TemplateResolution {
    let input = id.unwrap_or_default();
    if input.trim().is_empty() {
        return TemplateResolution::new(TemplateId::default_offer(), PolicyDecision::DefaultedEmpty);
    }
    // Versioned ids are returned untouched, whitespace included.
    if input.contains('@') {
        return TemplateResolution::new(TemplateId::new(input), PolicyDecision::Canonical);
    }
    let raw = input.trim();
    if let Some((_, canonical)) = LEGACY_TEMPLATE_ALIASES.iter().find(|(alias, _)| *alias == raw) {
        return TemplateResolution::new(
            TemplateId::new(*canonical),
            PolicyDecision::Aliased { from: raw.to_string() },
        );
    }
    match registry.by_legacy_id(raw) {
        Ok(meta) => TemplateResolution::new(
            meta.id.clone(),
            PolicyDecision::LegacyLookup { from: raw.to_string() },
        ),
        Err(_) => TemplateResolution::new(
            TemplateId::default_offer(),
            PolicyDecision::DefaultedUnknown { input: raw.to_string() },
        ),
    }
}

pub fn resolve_template_id(id: Option<&str>) -> TemplateResolution {
    resolve_template_id_in(TemplateRegistry::builtin(), id)
}

/// Never fails: unknown input maps to the default template id.
pub fn normalize_template_id(id: Option<&str>) -> TemplateId {
    resolve_template_id(id).id
}

/// A template that cannot be found does not require `pro`. Rendering an
/// unknown id fails and falls back to the free default, so this never
/// unlocks premium output.
pub fn template_requires_pro_in(registry: &TemplateRegistry, id: &TemplateId) -> bool {
    registry
        .meta(id.as_str())
        .map(|meta| meta.tier == TemplateTier::Premium)
        .unwrap_or(false)
}

pub fn template_requires_pro(id: &TemplateId) -> bool {
    template_requires_pro_in(TemplateRegistry::builtin(), id)
}

/// The single authority for tier gating.
pub fn enforce_template_for_plan_detailed(
    registry: &TemplateRegistry,
    requested: Option<&str>,
    plan: SubscriptionPlan,
) -> TemplateResolution {
    let resolved = resolve_template_id_in(registry, requested);
    if plan != SubscriptionPlan::Pro && template_requires_pro_in(registry, &resolved.id) {
        return TemplateResolution::new(
            TemplateId::default_offer(),
            PolicyDecision::Downgraded { requested: resolved.id, plan },
        );
    }
    resolved
}

pub fn enforce_template_for_plan(requested: Option<&str>, plan: SubscriptionPlan) -> TemplateId {
    enforce_template_for_plan_detailed(TemplateRegistry::builtin(), requested, plan).id
}

pub fn plan_to_template_tier(plan: SubscriptionPlan) -> TemplateTier {
    match plan {
        SubscriptionPlan::Pro => TemplateTier::Premium,
        SubscriptionPlan::Free | SubscriptionPlan::Standard => TemplateTier::Free,
    }
}
