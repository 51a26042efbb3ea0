//! Localized strings and number conventions. Always passed explicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Hu,
    En,
    De,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Hu => "hu",
            Locale::En => "en",
            Locale::De => "de",
        }
    }

    pub fn thousands_separator(self) -> char {
        match self {
            Locale::Hu => ' ',
            Locale::En => ',',
            Locale::De => '.',
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Hu | Locale::De => ',',
            Locale::En => '.',
        }
    }

    pub fn date_format(self) -> &'static str {
        match self {
            Locale::Hu => "%Y. %m. %d.",
            Locale::En => "%Y-%m-%d",
            Locale::De => "%d.%m.%Y",
        }
    }

    fn phrase(self, key: &str) -> Option<&'static str> {
        PHRASES.iter().find(|p| p.key == key).map(|p| match self {
            Locale::Hu => p.hu,
            Locale::En => p.en,
            Locale::De => p.de,
        })
    }
}

/// Key to localized-string lookup.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

impl Translator for Locale {
    fn translate(&self, key: &str) -> String {
        self.phrase(key).unwrap_or(key).to_string()
    }
}

/// A locale with caller-supplied overrides on top of the phrasebook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub locale: Locale,
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale, overrides: BTreeMap::new() }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.overrides.insert(key.to_string(), value.to_string());
        self
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        match self.overrides.get(key) {
            Some(value) => value.clone(),
            None => self.locale.translate(key),
        }
    }
}

struct Phrase {
    key: &'static str,
    hu: &'static str,
    en: &'static str,
    de: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "offer.title", hu: "Árajánlat", en: "Quotation", de: "Angebot" },
    Phrase { key: "offer.recipient", hu: "Címzett", en: "Prepared for", de: "Empfänger" },
    Phrase { key: "offer.date", hu: "Kelt", en: "Date", de: "Datum" },
    Phrase { key: "offer.validUntil", hu: "Érvényes", en: "Valid until", de: "Gültig bis" },
    Phrase { key: "table.item", hu: "Tétel", en: "Item", de: "Position" },
    Phrase { key: "table.qty", hu: "Mennyiség", en: "Qty", de: "Menge" },
    Phrase { key: "table.unit", hu: "Egység", en: "Unit", de: "Einheit" },
    Phrase { key: "table.unitPrice", hu: "Egységár", en: "Unit price", de: "Einzelpreis" },
    Phrase { key: "table.vat", hu: "ÁFA", en: "VAT", de: "MwSt." },
    Phrase { key: "table.total", hu: "Összesen", en: "Total", de: "Gesamt" },
    Phrase { key: "totals.net", hu: "Nettó összesen", en: "Net total", de: "Netto gesamt" },
    Phrase { key: "totals.vat", hu: "ÁFA összesen", en: "VAT total", de: "MwSt. gesamt" },
    Phrase { key: "totals.gross", hu: "Bruttó összesen", en: "Gross total", de: "Brutto gesamt" },
    Phrase { key: "notes.title", hu: "Megjegyzések", en: "Notes", de: "Anmerkungen" },
    Phrase { key: "summary.title", hu: "Összefoglaló", en: "Summary", de: "Zusammenfassung" },
    Phrase { key: "summary.items", hu: "Tételek száma", en: "Line items", de: "Positionen" },
    Phrase { key: "footer.marketing", hu: "Készült az OfferForge-dzsal", en: "Created with OfferForge", de: "Erstellt mit OfferForge" },
];
