//! HTML rendering of the watch page.

use super::PageContext;
use crate::vinted::NormalizedItem;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f6f7f9;color:#1d1f23}\
header{display:flex;justify-content:space-between;align-items:center;padding:12px 20px;background:#09b1ba;color:#fff}\
.stats{display:flex;gap:12px;padding:12px 20px}\
.stat{background:#fff;border-radius:8px;padding:8px 14px}\
.stat b{display:block;font-size:1.4em}\
form{padding:0 20px 12px}\
.brands{display:flex;flex-wrap:wrap;gap:6px;margin-bottom:8px}\
.brands label{background:#fff;border-radius:6px;padding:4px 8px}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(220px,1fr));gap:14px;padding:0 20px 20px}\
.card{background:#fff;border-radius:10px;overflow:hidden;text-decoration:none;color:inherit}\
.card img.photo{width:100%;aspect-ratio:3/4;object-fit:cover;background:#e4e6ea}\
.card .body{padding:8px 10px}\
.price{font-weight:700;color:#09b1ba}\
.seller{display:flex;align-items:center;gap:6px;font-size:.9em}\
.seller img{width:24px;height:24px;border-radius:50%}\
.empty{padding:40px 20px;text-align:center}";

/// Renders the full page for a context.
pub fn render(ctx: &PageContext) -> String {
    let mut html = String::with_capacity(4096 + ctx.items.len() * 640);

    html.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<meta http-equiv=\"refresh\" content=\"{}\">", ctx.cache_ttl_secs);
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Vinted Watch</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<header><strong>Vinted Watch</strong><span>Mis à jour à {}</span></header>",
        text(&ctx.refresh_time)
    );

    let _ = writeln!(
        html,
        "<div class=\"stats\">\
         <div class=\"stat\"><b>{}</b>Articles affichés</div>\
         <div class=\"stat\"><b>{}</b>Marques sélectionnées</div>\
         <div class=\"stat\"><b>{}s</b>Cache TTL</div></div>",
        ctx.items.len(),
        ctx.selected_brands.len(),
        ctx.cache_ttl_secs
    );

    render_brand_form(&mut html, ctx);

    if ctx.items.is_empty() {
        html.push_str("<p class=\"empty\">Aucun article pour le moment.</p>\n");
    } else {
        html.push_str("<main class=\"grid\">\n");
        for item in &ctx.items {
            render_card(&mut html, item);
        }
        html.push_str("</main>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_brand_form(html: &mut String, ctx: &PageContext) {
    html.push_str("<form method=\"GET\" action=\"/\">\n<div class=\"brands\">\n");
    for brand in &ctx.available_brands {
        let checked = if ctx.selected_brands.iter().any(|id| id == brand.id) { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<label><input type=\"checkbox\" name=\"brands\" value=\"{}\"{}> {}</label>",
            attr(brand.id),
            checked,
            text(brand.name)
        );
    }
    html.push_str("</div>\n<button type=\"submit\">Appliquer les filtres</button>\n</form>\n");
}

fn render_card(html: &mut String, item: &NormalizedItem) {
    let _ = write!(
        html,
        "<a class=\"card\" href=\"{}\" target=\"_blank\" rel=\"noopener\">",
        attr(&item.detail_url)
    );

    if !item.photo_url.is_empty() {
        let _ = write!(
            html,
            "<img class=\"photo\" src=\"{}\" alt=\"Photo de {}\" loading=\"lazy\">",
            attr(&item.photo_url),
            attr(&item.title)
        );
    }

    let _ = write!(html, "<div class=\"body\"><h2>{}</h2>", text(&item.title));
    if !item.price_display.is_empty() {
        let _ = write!(html, "<div class=\"price\">{}</div>", text(&item.price_display));
    }
    if !item.size.is_empty() {
        let _ = write!(html, "<div class=\"size\">{}</div>", text(&item.size));
    }

    html.push_str("<div class=\"seller\">");
    if !item.seller_avatar_url.is_empty() {
        let _ = write!(html, "<img src=\"{}\" alt=\"\">", attr(&item.seller_avatar_url));
    }
    let _ = write!(
        html,
        "<span>{}</span><span title=\"{}\">{}</span></div>",
        text(&item.seller_name),
        attr(&item.seller_rating_display),
        text(&item.seller_stars_glyphs)
    );

    html.push_str("</div></a>\n");
}
