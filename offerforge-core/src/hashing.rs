//! Hashing - SHA-256 fingerprints for rendered documents
//!
//! Downstream PDF caching keys on these. Same input, same hash.

use sha2::{Sha256, Digest};
use serde::Serialize;
use serde_json::{Value, to_string};

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

pub fn document_fingerprint(html: &str) -> String {
    sha256_hex(html.as_bytes())
}

/// job_hash = sha256(template_id + template_version + canonical_payload + engine_version)
pub fn compute_job_hash(
    template_id: &str,
    template_version: &str,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined = format!(
        "{}:{}:{}:{}",
        template_id, template_version, canonical_payload, engine_version
    );
    Ok(sha256_hex(combined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"y": 1, "b": [{"d": 1, "c": 2}]}});
        assert_eq!(
            canonical_json(&obj).unwrap(),
            r#"{"a":2,"m":{"b":[{"c":2,"d":1}],"y":1},"z":1}"#
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn job_hash_depends_on_template() {
        let payload = json!({"title": "Konzultáció"});
        let a = compute_job_hash("free.minimal@1.0.0", "1.0.0", &payload, "1.0.0").unwrap();
        let b = compute_job_hash("free.classic@1.0.0", "1.0.0", &payload, "1.0.0").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, compute_job_hash("free.minimal@1.0.0", "1.0.0", &payload, "1.0.0").unwrap());
    }
}
