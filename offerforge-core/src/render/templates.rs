//! Built-in offer templates.

use crate::error::TemplateError;
use crate::render::partials::{
    brand_mark, items_table, marketing_footer, meta_line, notes_block, recipient_block,
    totals_block,
};
use crate::render::{OfferTemplate, RenderContext};

const MINIMAL_ID: &str = "free.minimal@1.0.0";
const CLASSIC_ID: &str = "free.classic@1.0.0";
const EXECUTIVE_ID: &str = "premium.executive@1.0.0";

fn color<'c>(value: &'c Option<crate::render::sanitize::SafeText>, default: &'c str) -> &'c str {
    value.as_ref().map(|c| c.as_str()).unwrap_or(default)
}

fn title_or_default(ctx: &RenderContext<'_>) -> String {
    if ctx.slots.doc.title.is_empty() {
        ctx.t("offer.title").to_string()
    } else {
        ctx.slots.doc.title.to_string()
    }
}

/// Default free template: plain header, single table.
pub struct MinimalTemplate;

impl OfferTemplate for MinimalTemplate {
    fn render_head(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        let accent = color(&ctx.slots.brand.primary_color, "#222222");
        Ok(format!(
            concat!(
                "<style>",
                "body{{font-family:Helvetica,Arial,sans-serif;color:#222;margin:32px}}",
                ".brand-mark{{display:inline-block;width:40px;height:40px;line-height:40px;text-align:center;background:{accent};color:#fff;border-radius:4px}}",
                ".brand-logo{{max-height:48px}}",
                "h1{{color:{accent};margin:12px 0 4px}}",
                "table{{width:100%;border-collapse:collapse}}",
                "td,th{{padding:6px;border-bottom:1px solid #ddd;text-align:left}}",
                ".num{{text-align:right}}",
                ".marketing{{margin-top:32px;font-size:10px;color:#999;text-align:center}}",
                "</style>",
                r#"<header class="offer-head minimal">{mark}<h1>{title}</h1>"#,
                r#"<p class="subtitle">{brand}</p>{meta}</header>"#
            ),
            accent = accent,
            mark = brand_mark(ctx),
            title = title_or_default(ctx),
            brand = ctx.slots.brand.name,
            meta = meta_line(ctx),
        ))
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        ctx.ensure_finite_amounts(MINIMAL_ID)?;
        Ok(format!(
            r#"<main class="offer-body minimal">{}{}{}{}</main>{}"#,
            recipient_block(ctx),
            items_table(ctx, false),
            totals_block(ctx),
            notes_block(ctx),
            marketing_footer(ctx),
        ))
    }
}

/// Bordered table layout with a VAT column.
pub struct ClassicTemplate;

impl OfferTemplate for ClassicTemplate {
    fn render_head(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        let primary = color(&ctx.slots.brand.primary_color, "#1f3a5f");
        let secondary = color(&ctx.slots.brand.secondary_color, "#e8eef5");
        Ok(format!(
            concat!(
                "<style>",
                "body{{font-family:Georgia,serif;color:#1a1a1a;margin:28px}}",
                ".offer-head{{display:flex;justify-content:space-between;border-bottom:3px double {primary};padding-bottom:12px}}",
                ".brand-mark{{font-size:22px;font-weight:bold;color:{primary}}}",
                ".brand-logo{{max-height:56px}}",
                "table{{width:100%;border-collapse:collapse;margin-top:16px}}",
                "td,th{{border:1px solid #999;padding:5px}}",
                "thead th{{background:{secondary}}}",
                ".num{{text-align:right}}",
                ".gross th,.gross td{{font-weight:bold}}",
                ".marketing{{margin-top:24px;font-size:10px;color:#888}}",
                "</style>",
                r#"<header class="offer-head classic"><div>{mark}<p class="subtitle">{brand}</p></div>"#,
                r#"<div><h1>{title}</h1>{meta}</div></header>"#
            ),
            primary = primary,
            secondary = secondary,
            mark = brand_mark(ctx),
            brand = ctx.slots.brand.name,
            title = title_or_default(ctx),
            meta = meta_line(ctx),
        ))
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        ctx.ensure_finite_amounts(CLASSIC_ID)?;
        Ok(format!(
            r#"<main class="offer-body classic">{}{}{}{}</main>{}"#,
            recipient_block(ctx),
            items_table(ctx, true),
            totals_block(ctx),
            notes_block(ctx),
            marketing_footer(ctx),
        ))
    }
}

/// Premium layout: colored cover band and a summary box. No marketing footer.
pub struct ExecutiveTemplate;

impl OfferTemplate for ExecutiveTemplate {
    fn render_head(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        if ctx.slots.doc.title.is_empty() {
            return Err(TemplateError::render(EXECUTIVE_ID, "cover requires an offer title"));
        }
        let primary = color(&ctx.slots.brand.primary_color, "#0b2545");
        let secondary = color(&ctx.slots.brand.secondary_color, "#c9a227");
        Ok(format!(
            concat!(
                "<style>",
                "body{{font-family:'Helvetica Neue',Arial,sans-serif;color:#13315c;margin:0}}",
                ".cover{{background:{primary};color:#fff;padding:40px 48px;border-bottom:6px solid {secondary}}}",
                ".brand-mark{{display:inline-block;width:56px;height:56px;line-height:56px;text-align:center;border:2px solid {secondary};border-radius:50%;font-weight:bold}}",
                ".brand-logo{{max-height:64px}}",
                ".cover h1{{font-size:34px;margin:18px 0 6px}}",
                ".offer-body{{padding:32px 48px}}",
                ".summary{{border-left:4px solid {secondary};padding:8px 16px;margin-bottom:24px;background:#f4f6fa}}",
                "table{{width:100%;border-collapse:collapse}}",
                "thead th{{background:{primary};color:#fff;padding:8px}}",
                "td{{padding:8px;border-bottom:1px solid #dde3ec}}",
                ".num{{text-align:right}}",
                ".gross th,.gross td{{color:{primary};font-size:18px}}",
                "</style>",
                r#"<header class="cover">{mark}<h1>{title}</h1>"#,
                r#"<p class="subtitle">{brand}</p>{meta}</header>"#
            ),
            primary = primary,
            secondary = secondary,
            mark = brand_mark(ctx),
            title = ctx.slots.doc.title,
            brand = ctx.slots.brand.name,
            meta = meta_line(ctx),
        ))
    }

    fn render_body(&self, ctx: &RenderContext<'_>) -> Result<String, TemplateError> {
        ctx.ensure_finite_amounts(EXECUTIVE_ID)?;
        let summary = format!(
            r#"<aside class="summary"><h3>{}</h3><p>{}: {}</p><p>{}: {}</p></aside>"#,
            ctx.t("summary.title"),
            ctx.t("summary.items"),
            ctx.slots.items.len(),
            ctx.t("totals.gross"),
            ctx.money(ctx.slots.totals.gross),
        );
        Ok(format!(
            r#"<main class="offer-body executive">{}{}{}{}{}</main>"#,
            summary,
            recipient_block(ctx),
            items_table(ctx, true),
            totals_block(ctx),
            notes_block(ctx),
        ))
    }
}
