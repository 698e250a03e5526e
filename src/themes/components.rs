//! Markup shared by the built-in themes.

use super::{Artifact, RenderContext};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};

pub(super) const PAGES: [(Artifact, &str); 3] = [
    (Artifact::Home, "Home"),
    (Artifact::Products, "Products"),
    (Artifact::About, "About"),
];

/// Render a product description as Markdown. Raw HTML in the source is
/// emitted as escaped text.
pub fn description_html(markdown: &str) -> Markup {
    let parser = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// Renders the base HTML document structure
pub(super) fn document(
    ctx: &RenderContext<'_>,
    theme_class: &str,
    page_title: &str,
    content: Markup,
) -> Markup {
    let business = ctx.business;
    let title = if page_title.is_empty() {
        business.name.clone()
    } else {
        format!("{page_title} · {}", business.name)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !business.tagline.is_empty() {
                    meta name="description" content=(business.tagline);
                }
                title { (title) }
                link rel="stylesheet" href=(Artifact::Stylesheet.output_path());
            }
            body class=(theme_class) {
                (content)
            }
        }
    }
}

/// Logo (when present) and business name, linking home.
pub(super) fn brand(ctx: &RenderContext<'_>) -> Markup {
    html! {
        a.brand href=(Artifact::Home.output_path()) {
            @if let Some(logo) = ctx.logo {
                img.logo src=(logo) alt={ (ctx.business.name) " logo" };
            }
            span.brand-name { (ctx.business.name) }
        }
    }
}

pub(super) fn nav(current: Artifact) -> Markup {
    html! {
        nav.site-nav {
            ul {
                @for (artifact, label) in PAGES {
                    li class=[(artifact == current).then_some("current")] {
                        a href=(artifact.output_path()) { (label) }
                    }
                }
            }
        }
    }
}

pub(super) fn price(ctx: &RenderContext<'_>, index: usize) -> Markup {
    html! {
        span.price { "$" (ctx.business.products[index].display_price()) }
    }
}

/// Product image for position `index`, if one was copied.
pub(super) fn product_image(ctx: &RenderContext<'_>, index: usize) -> Markup {
    let product = &ctx.business.products[index];
    html! {
        @if let Some(src) = ctx.product_image(index) {
            img.product-image src=(src) alt=(product.name) loading="lazy";
        }
    }
}

/// Email, phone and postal address, skipping blanks.
pub(super) fn contact(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    html! {
        ul.contact {
            @if !b.email.is_empty() {
                li.email { a href={ "mailto:" (b.email) } { (b.email) } }
            }
            @if !b.phone.is_empty() {
                li.phone { a href={ "tel:" (b.phone) } { (b.phone) } }
            }
            @if !b.address.is_empty() {
                li.address { (b.address) }
            }
        }
    }
}

pub(super) fn social(ctx: &RenderContext<'_>) -> Markup {
    let links = ctx.business.social_links();
    html! {
        @if !links.is_empty() {
            ul.social {
                @for (label, url) in links {
                    li { a href=(url) rel="noopener" target="_blank" { (label) } }
                }
            }
        }
    }
}

pub(super) fn footer(ctx: &RenderContext<'_>) -> Markup {
    html! {
        footer.site-footer {
            (social(ctx))
            p.copyright { "© " (ctx.business.name) }
        }
    }
}

/// Stylesheet text with a header naming the site.
pub(super) fn stylesheet(ctx: &RenderContext<'_>, theme: &str, css: &str) -> String {
    format!("/* {} · {theme} */\n{css}", ctx.business.slug())
}
