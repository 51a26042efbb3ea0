//! Template Renderer - per-call context and the template contract

pub mod format;
pub mod i18n;
pub mod partials;
pub mod sanitize;
pub mod templates;

use crate::config::EngineConfig;
use crate::error::TemplateError;
use crate::model::{Branding, OfferData, OfferImages, PriceRow};
use i18n::{Locale, Translator};
use sanitize::{sanitize_color, sanitize_input, sanitize_multiline, sanitize_url, SafeText};

/// One registered document layout.
///
/// Output must be a pure function of the context: no I/O, no clock, no
/// shared state. Each render composes into exactly one head fragment and
/// one body fragment.
pub trait OfferTemplate: Send + Sync {
    /// Banner area: brand mark, title, subtitle, date.
    fn render_head(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError>;

    /// Items table, totals and any template-specific partials.
    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone)]
pub struct BrandSlot {
    pub name: SafeText,
    pub initials: SafeText,
    pub logo_src: Option<SafeText>,
    pub primary_color: Option<SafeText>,
    pub secondary_color: Option<SafeText>,
}

#[derive(Debug, Clone)]
pub struct DocSlot {
    pub title: SafeText,
    pub recipient: Option<SafeText>,
    pub recipient_details: Vec<SafeText>,
    pub date: String,
    pub valid_until: Option<String>,
    pub locale: Locale,
}

#[derive(Debug, Clone)]
pub struct ItemSlot {
    pub name: SafeText,
    pub unit: SafeText,
    pub qty: f64,
    pub unit_price: f64,
    pub vat: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone)]
pub struct TotalsSlot {
    pub net: f64,
    pub vat: f64,
    pub gross: f64,
    pub currency: SafeText,
}

#[derive(Debug, Clone)]
pub struct Slots {
    pub brand: BrandSlot,
    pub doc: DocSlot,
    pub items: Vec<ItemSlot>,
    pub totals: TotalsSlot,
    pub notes: Option<SafeText>,
}

/// Built fresh for every render and dropped afterwards.
pub struct RenderContext<'a> {
    pub slots: Slots,
    pub i18n: &'a dyn Translator,
    pub marketing_footer: bool,
}

impl<'a> RenderContext<'a> {
    pub fn build(
        offer: &OfferData,
        rows: &[PriceRow],
        branding: Option<&Branding>,
        images: Option<&OfferImages>,
        i18n: &'a dyn Translator,
        config: &EngineConfig,
    ) -> Self {
        let locale = offer.locale.unwrap_or(config.default_locale);
        let branding = branding.cloned().unwrap_or_default();

        let raw_brand_name = branding
            .company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !sanitize_input(name).is_empty())
            .unwrap_or("OfferForge");
        let brand_name = sanitize_input(raw_brand_name);
        let embedded_logo = images
            .and_then(|i| i.logo.as_ref())
            .and_then(|logo| sanitize_url(&logo.to_data_uri()));
        let logo_src = embedded_logo.or_else(|| branding.logo_url.as_deref().and_then(sanitize_url));

        let brand = BrandSlot {
            initials: initials(raw_brand_name),
            name: brand_name,
            logo_src,
            primary_color: branding.primary_color.as_deref().and_then(sanitize_color),
            secondary_color: branding.secondary_color.as_deref().and_then(sanitize_color),
        };

        let recipient = offer.recipient.as_ref();
        let doc = DocSlot {
            title: sanitize_input(&offer.title),
            recipient: recipient
                .map(|r| sanitize_input(&r.name))
                .filter(|name| !name.is_empty()),
            recipient_details: recipient
                .map(|r| {
                    [&r.company, &r.address, &r.email]
                        .into_iter()
                        .flatten()
                        .map(|line| sanitize_multiline(line))
                        .filter(|line| !line.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            date: offer.issued_on.format(locale.date_format()).to_string(),
            valid_until: offer
                .valid_until
                .map(|d| d.format(locale.date_format()).to_string()),
            locale,
        };

        let items: Vec<ItemSlot> = rows
            .iter()
            .map(|row| ItemSlot {
                name: sanitize_input(&row.name),
                unit: sanitize_input(&row.unit),
                qty: row.qty,
                unit_price: row.unit_price,
                vat: row.vat,
                line_total: row.net(),
            })
            .collect();

        let net: f64 = rows.iter().map(PriceRow::net).sum();
        let vat: f64 = rows.iter().map(PriceRow::vat_amount).sum();
        let currency = if offer.currency.trim().is_empty() {
            &config.default_currency
        } else {
            &offer.currency
        };
        let totals = TotalsSlot {
            net,
            vat,
            gross: net + vat,
            currency: sanitize_input(currency),
        };

        let notes = offer
            .notes
            .as_deref()
            .map(sanitize_multiline)
            .filter(|n| !n.is_empty());

        Self {
            slots: Slots { brand, doc, items, totals, notes },
            i18n,
            marketing_footer: config.marketing_footer,
        }
    }

    pub fn locale(&self) -> Locale {
        self.slots.doc.locale
    }

    pub fn t(&self, key: &str) -> SafeText {
        sanitize_input(&self.i18n.translate(key))
    }

    pub fn money(&self, value: f64) -> String {
        format::format_money(value, self.slots.totals.currency.as_str(), self.locale())
    }

    pub fn amount(&self, value: f64) -> String {
        format::format_amount(value, self.locale())
    }

    /// Rejects NaN and infinite amounts, which would otherwise print as text.
    pub fn ensure_finite_amounts(&self, template: &str) -> Result<(), TemplateError> {
        for item in &self.slots.items {
            let values = [item.qty, item.unit_price, item.vat, item.line_total];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(TemplateError::render(
                    template,
                    format!("non-finite amount in row '{}'", item.name),
                ));
            }
        }
        let totals = &self.slots.totals;
        if ![totals.net, totals.vat, totals.gross].iter().all(|v| v.is_finite()) {
            return Err(TemplateError::render(template, "non-finite document total"));
        }
        Ok(())
    }
}

fn initials(name: &str) -> SafeText {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    sanitize_input(&letters)
}
