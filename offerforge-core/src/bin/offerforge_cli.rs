//! OfferForge CLI - render offers from JSON
//!
//! Commands: templates, render, verify
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on failure

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use offerforge_core::{
    signature::html_has_signature, Branding, Catalog, EngineConfig, OfferData, OfferEngine,
    OfferImages, OfferRenderRequest, PriceRow, SubscriptionPlan, TemplateRegistry,
};

#[derive(Parser)]
#[command(name = "offerforge-cli")]
#[command(about = "OfferForge CLI - offer document renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an engine config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Plan {
    Free,
    Standard,
    Pro,
}

impl From<Plan> for SubscriptionPlan {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Free => SubscriptionPlan::Free,
            Plan::Standard => SubscriptionPlan::Standard,
            Plan::Pro => SubscriptionPlan::Pro,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    Templates {
        /// Mark which templates this plan may use
        #[arg(short, long, value_enum, default_value = "free")]
        plan: Plan,
    },

    /// Render an offer to HTML
    Render {
        #[arg(short, long, value_enum)]
        plan: Plan,

        /// Template id; defaults to the offer's stored template
        #[arg(short, long)]
        template: Option<String>,

        /// JSON payload, or @path to read it from a file
        #[arg(long)]
        payload: String,

        /// Write the HTML here instead of embedding it in the output
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check that an HTML file carries the engine signature
    Verify {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Deserialize)]
struct RenderPayload {
    offer: OfferData,
    #[serde(default)]
    rows: Vec<PriceRow>,
    #[serde(default)]
    branding: Option<Branding>,
    #[serde(default)]
    images: Option<OfferImages>,
    #[serde(default)]
    translations: BTreeMap<String, String>,
}

fn fail(key: &str, message: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({ key: false, "error": message.to_string() });
    println!("{}", output);
    ExitCode::FAILURE
}

fn read_payload(raw: &str) -> Result<RenderPayload, String> {
    let content = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("Failed to read payload: {e}"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&content).map_err(|e| format!("Invalid payload: {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => return fail("success", e),
        },
        None => EngineConfig::default(),
    };
    let engine = OfferEngine::new(TemplateRegistry::builtin(), config);

    match cli.command {
        Commands::Templates { plan } => {
            let templates: Vec<_> = engine
                .templates_for_plan(plan.into())
                .into_iter()
                .map(|(meta, allowed)| serde_json::json!({
                    "id": meta.id,
                    "name": meta.name,
                    "tier": meta.tier,
                    "version": meta.version,
                    "legacyId": meta.legacy_id,
                    "allowed": allowed,
                }))
                .collect();

            match serde_json::to_string_pretty(&templates) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => fail("success", e),
            }
        }

        Commands::Render { plan, template, payload, out } => {
            let payload = match read_payload(&payload) {
                Ok(p) => p,
                Err(e) => return fail("success", e),
            };

            let locale = payload.offer.locale.unwrap_or(engine.config().default_locale);
            let catalog = Catalog { locale, overrides: payload.translations.clone() };
            let mut request = OfferRenderRequest::new(&payload.offer, &payload.rows, &catalog, plan.into());
            request.branding = payload.branding.as_ref();
            request.images = payload.images.as_ref();
            if let Some(id) = template.as_deref() {
                request.template_id = Some(id);
            }

            let rendered = match engine.build_offer_html_with_fallback(&request) {
                Ok(r) => r,
                Err(e) => {
                    let output = serde_json::json!({ "success": false, "error": e.to_string() });
                    println!("{}", output);
                    return ExitCode::from(2);
                }
            };

            let mut output = serde_json::json!({ "success": true, "offer": &rendered });
            match out {
                Some(path) => {
                    if let Err(e) = fs::write(&path, &rendered.html) {
                        return fail("success", format!("Failed to write {}: {e}", path.display()));
                    }
                    output["path"] = serde_json::json!(path.display().to_string());
                }
                None => output["html"] = serde_json::json!(rendered.html),
            }
            println!("{}", output);
            ExitCode::SUCCESS
        }

        Commands::Verify { file } => {
            let html = match fs::read_to_string(&file) {
                Ok(h) => h,
                Err(e) => return fail("signed", format!("Failed to read {}: {e}", file.display())),
            };
            let signed = html_has_signature(&html);
            println!("{}", serde_json::json!({ "signed": signed }));
            if signed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
    }
}
