//! Template Registry - versioned ids mapped to renderers

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TemplateError;
use crate::render::templates::{ClassicTemplate, ExecutiveTemplate, MinimalTemplate};
use crate::render::OfferTemplate;

pub const DEFAULT_OFFER_TEMPLATE_ID: &str = "free.minimal@1.0.0";

/// `<tier-namespace>.<name>@<semver>`, e.g. `free.minimal@1.0.0`.
///
/// Values without an `@` are legacy ids and need alias resolution before use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_offer() -> Self {
        Self(DEFAULT_OFFER_TEMPLATE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exactly one `@` separating the dotted name from the version.
    pub fn is_canonical(&self) -> bool {
        self.0.matches('@').count() == 1
    }

    fn qualified_name(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.qualified_name().split_once('.').map(|(ns, _)| ns)
    }

    pub fn name(&self) -> Option<&str> {
        self.qualified_name().split_once('.').map(|(_, name)| name)
    }

    pub fn version(&self) -> Option<semver::Version> {
        let (_, version) = self.0.split_once('@')?;
        semver::Version::parse(version).ok()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<&str> for TemplateId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateTier {
    Free,
    Premium,
}

pub type TemplateFactory = fn() -> Box<dyn OfferTemplate>;

/// Registry entry.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMeta {
    pub id: TemplateId,
    pub name: String,
    pub tier: TemplateTier,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    #[serde(skip)]
    pub factory: TemplateFactory,
}

impl TemplateMeta {
    pub fn new(
        id: &str,
        name: &str,
        tier: TemplateTier,
        legacy_id: Option<&str>,
        factory: TemplateFactory,
    ) -> Self {
        let id = TemplateId::new(id);
        let version = id
            .version()
            .map(|v| v.to_string())
            .unwrap_or_default();
        Self {
            id,
            name: name.to_string(),
            tier,
            version,
            legacy_id: legacy_id.map(str::to_string),
            factory,
        }
    }

    pub fn instantiate(&self) -> Box<dyn OfferTemplate> {
        (self.factory)()
    }
}

impl fmt::Debug for TemplateMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateMeta")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tier", &self.tier)
            .field("version", &self.version)
            .field("legacy_id", &self.legacy_id)
            .finish()
    }
}

/// Ordered, read-only table of templates. Order is registration order.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    entries: Vec<TemplateMeta>,
}

static BUILTIN: Lazy<TemplateRegistry> = Lazy::new(|| {
    TemplateRegistry::from_entries(vec![
        TemplateMeta::new(
            DEFAULT_OFFER_TEMPLATE_ID,
            "Minimal",
            TemplateTier::Free,
            Some("minimal"),
            || Box::new(MinimalTemplate),
        ),
        TemplateMeta::new(
            "free.classic@1.0.0",
            "Classic",
            TemplateTier::Free,
            Some("classic"),
            || Box::new(ClassicTemplate),
        ),
        TemplateMeta::new(
            "premium.executive@1.0.0",
            "Executive",
            TemplateTier::Premium,
            Some("executive"),
            || Box::new(ExecutiveTemplate),
        ),
    ])
});

impl TemplateRegistry {
    pub fn from_entries(entries: Vec<TemplateMeta>) -> Self {
        Self { entries }
    }

    /// The process-wide registry of built-in templates.
    pub fn builtin() -> &'static TemplateRegistry {
        &BUILTIN
    }

    pub fn list(&self) -> &[TemplateMeta] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&TemplateMeta> {
        self.entries.iter().find(|meta| meta.id.as_str() == id)
    }

    pub fn meta(&self, id: &str) -> Result<&TemplateMeta, TemplateError> {
        self.get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn load(&self, id: &str) -> Result<Box<dyn OfferTemplate>, TemplateError> {
        self.meta(id).map(TemplateMeta::instantiate)
    }

    pub fn by_legacy_id(&self, legacy_id: &str) -> Result<&TemplateMeta, TemplateError> {
        self.entries
            .iter()
            .find(|meta| meta.legacy_id.as_deref() == Some(legacy_id))
            .ok_or_else(|| TemplateError::NotFound(legacy_id.to_string()))
    }
}

pub fn list_templates() -> &'static [TemplateMeta] {
    TemplateRegistry::builtin().list()
}

pub fn load_template(id: &str) -> Result<Box<dyn OfferTemplate>, TemplateError> {
    TemplateRegistry::builtin().load(id)
}

pub fn get_offer_template_by_legacy_id(legacy_id: &str) -> Result<&'static TemplateMeta, TemplateError> {
    TemplateRegistry::builtin().by_legacy_id(legacy_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_canonical() {
        for meta in list_templates() {
            assert!(meta.id.is_canonical(), "{} is not canonical", meta.id);
            let version = meta.id.version().expect("semver");
            assert_eq!(meta.version, version.to_string());
        }
    }

    #[test]
    fn registration_order_is_stable() {
        let ids: Vec<_> = list_templates().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["free.minimal@1.0.0", "free.classic@1.0.0", "premium.executive@1.0.0"]
        );
    }

    #[test]
    fn id_parts() {
        let id = TemplateId::new("premium.executive@1.2.3");
        assert_eq!(id.namespace(), Some("premium"));
        assert_eq!(id.name(), Some("executive"));
        assert_eq!(id.version(), Some(semver::Version::new(1, 2, 3)));
        assert!(!TemplateId::new("premium-banner").is_canonical());
        assert!(!TemplateId::new("a@b@c").is_canonical());
    }

    #[test]
    fn unknown_template_not_found() {
        let err = load_template("free.nope@1.0.0").err().expect("missing");
        assert!(err.to_string().contains("Template not found"));
    }

    #[test]
    fn legacy_lookup() {
        let meta = get_offer_template_by_legacy_id("executive").unwrap();
        assert_eq!(meta.id, "premium.executive@1.0.0");
        assert_eq!(meta.tier, TemplateTier::Premium);
        assert!(get_offer_template_by_legacy_id("nope").is_err());
    }
}
