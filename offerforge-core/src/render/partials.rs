//! Shared HTML fragments. Inputs are already sanitized slot values.

use std::fmt::Write as _;

use crate::render::RenderContext;

pub fn brand_mark(ctx: &RenderContext<'_>) -> String {
    let brand = &ctx.slots.brand;
    match &brand.logo_src {
        Some(src) => format!(
            r#"<img class="brand-logo" src="{}" alt="{}">"#,
            src, brand.name
        ),
        None => format!(
            r#"<div class="brand-mark" aria-label="{}">{}</div>"#,
            brand.name, brand.initials
        ),
    }
}

pub fn meta_line(ctx: &RenderContext<'_>) -> String {
    let doc = &ctx.slots.doc;
    let mut out = format!(
        r#"<p class="doc-date">{}: {}</p>"#,
        ctx.t("offer.date"),
        doc.date
    );
    if let Some(valid) = &doc.valid_until {
        let _ = write!(
            out,
            r#"<p class="doc-valid">{}: {}</p>"#,
            ctx.t("offer.validUntil"),
            valid
        );
    }
    out
}

pub fn recipient_block(ctx: &RenderContext<'_>) -> String {
    let doc = &ctx.slots.doc;
    let Some(name) = &doc.recipient else {
        return String::new();
    };
    let mut out = format!(
        r#"<section class="recipient"><h3>{}</h3><p class="recipient-name">{}</p>"#,
        ctx.t("offer.recipient"),
        name
    );
    for line in &doc.recipient_details {
        let _ = write!(out, "<p>{line}</p>");
    }
    out.push_str("</section>");
    out
}

/// Items table. Every numeric cell uses fixed two-decimal formatting.
pub fn items_table(ctx: &RenderContext<'_>, with_vat: bool) -> String {
    let mut out = String::from(r#"<table class="items"><thead><tr>"#);
    let mut headers = vec!["table.item", "table.qty", "table.unit", "table.unitPrice"];
    if with_vat {
        headers.push("table.vat");
    }
    headers.push("table.total");
    for key in headers {
        let _ = write!(out, "<th>{}</th>", ctx.t(key));
    }
    out.push_str("</tr></thead><tbody>");

    for item in &ctx.slots.items {
        let _ = write!(
            out,
            r#"<tr><td class="name">{}</td><td class="num">{}</td><td>{}</td><td class="num">{}</td>"#,
            item.name,
            ctx.amount(item.qty),
            item.unit,
            ctx.amount(item.unit_price)
        );
        if with_vat {
            let _ = write!(out, r#"<td class="num">{}%</td>"#, ctx.amount(item.vat));
        }
        let _ = write!(out, r#"<td class="num">{}</td></tr>"#, ctx.amount(item.line_total));
    }
    out.push_str("</tbody></table>");
    out
}

pub fn totals_block(ctx: &RenderContext<'_>) -> String {
    let totals = &ctx.slots.totals;
    format!(
        concat!(
            r#"<table class="totals">"#,
            r#"<tr><th>{}</th><td class="num">{}</td></tr>"#,
            r#"<tr><th>{}</th><td class="num">{}</td></tr>"#,
            r#"<tr class="gross"><th>{}</th><td class="num">{}</td></tr>"#,
            "</table>"
        ),
        ctx.t("totals.net"),
        ctx.money(totals.net),
        ctx.t("totals.vat"),
        ctx.money(totals.vat),
        ctx.t("totals.gross"),
        ctx.money(totals.gross),
    )
}

pub fn notes_block(ctx: &RenderContext<'_>) -> String {
    match &ctx.slots.notes {
        Some(notes) => format!(
            r#"<section class="notes"><h3>{}</h3><p>{}</p></section>"#,
            ctx.t("notes.title"),
            notes
        ),
        None => String::new(),
    }
}

/// Free-tier footer.
pub fn marketing_footer(ctx: &RenderContext<'_>) -> String {
    if !ctx.marketing_footer {
        return String::new();
    }
    format!(
        r#"<footer class="marketing">{}</footer>"#,
        ctx.t("footer.marketing")
    )
}
