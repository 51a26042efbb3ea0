//! Offer content supplied by the caller. Read-only input to the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::render::i18n::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferData {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub recipient: Option<Recipient>,
    pub issued_on: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Template the offer was generated with.
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub legacy_template_id: Option<String>,
}

fn default_currency() -> String {
    "HUF".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub name: String,
    pub qty: f64,
    #[serde(default)]
    pub unit: String,
    pub unit_price: f64,
    /// VAT rate in percent.
    #[serde(default)]
    pub vat: f64,
}

impl PriceRow {
    pub fn net(&self) -> f64 {
        self.qty * self.unit_price
    }

    pub fn vat_amount(&self) -> f64 {
        self.net() * self.vat / 100.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Binary assets embedded into the document as `data:` URIs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferImages {
    #[serde(default)]
    pub logo: Option<ImageAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAsset {
    pub mime: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl ImageAsset {
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.data);
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
