//! `modern`: hero banner and a card grid.

use super::components::{brand, contact, description_html, document, footer, nav, price, product_image, social, stylesheet};
use super::{Artifact, RenderContext, ThemeBundle};
use maud::{Markup, html};

const CSS: &str = include_str!("../../static/themes/modern/style.css");
const ID: &str = "modern";
const FEATURED: usize = 3;

pub(super) fn bundle() -> ThemeBundle {
    ThemeBundle::new(ID)
        .with(Artifact::Home, |ctx| home(ctx).into_string())
        .with(Artifact::Products, |ctx| products(ctx).into_string())
        .with(Artifact::About, |ctx| about(ctx).into_string())
        .with(Artifact::Stylesheet, |ctx| stylesheet(ctx, ID, CSS))
}

fn top_bar(ctx: &RenderContext<'_>, current: Artifact) -> Markup {
    html! {
        header.top-bar {
            div.container {
                (brand(ctx))
                (nav(current))
            }
        }
    }
}

fn card(ctx: &RenderContext<'_>, index: usize, with_description: bool) -> Markup {
    let p = &ctx.business.products[index];
    html! {
        article.card {
            (product_image(ctx, index))
            div.card-body {
                h3 { (p.name) }
                (price(ctx, index))
                @if with_description && !p.description.is_empty() {
                    div.description { (description_html(&p.description)) }
                }
            }
        }
    }
}

fn home(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let featured = b.products.len().min(FEATURED);
    let content = html! {
        (top_bar(ctx, Artifact::Home))
        section.hero {
            div.container {
                h1 { (b.name) }
                @if !b.tagline.is_empty() {
                    p.tagline { (b.tagline) }
                }
                a.button href=(Artifact::Products.output_path()) { "Browse products" }
            }
        }
        main.container {
            h2 { "Featured" }
            div.card-grid {
                @for i in 0..featured {
                    (card(ctx, i, false))
                }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-modern", "", content)
}

fn products(ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        (top_bar(ctx, Artifact::Products))
        main.container {
            h1 { "Our products" }
            div.card-grid {
                @for i in 0..ctx.business.products.len() {
                    (card(ctx, i, true))
                }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-modern", "Products", content)
}

fn about(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let content = html! {
        (top_bar(ctx, Artifact::About))
        main.container.about {
            div.panel {
                h1 { (b.name) }
                @if !b.tagline.is_empty() {
                    p.tagline { (b.tagline) }
                }
            }
            div.panel {
                h2 { "Get in touch" }
                (contact(ctx))
                (social(ctx))
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-modern", "About", content)
}
