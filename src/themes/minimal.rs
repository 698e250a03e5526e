//! `minimal`: single column, plain type, no decoration.

use super::components::{brand, contact, description_html, document, footer, nav, price, product_image, stylesheet};
use super::{Artifact, RenderContext, ThemeBundle};
use maud::{Markup, html};

const CSS: &str = include_str!("../../static/themes/minimal/style.css");
const ID: &str = "minimal";

pub(super) fn bundle() -> ThemeBundle {
    ThemeBundle::new(ID)
        .with(Artifact::Home, |ctx| home(ctx).into_string())
        .with(Artifact::Products, |ctx| products(ctx).into_string())
        .with(Artifact::About, |ctx| about(ctx).into_string())
        .with(Artifact::Stylesheet, |ctx| stylesheet(ctx, ID, CSS))
}

fn header(ctx: &RenderContext<'_>, current: Artifact) -> Markup {
    html! {
        header.site-header {
            (brand(ctx))
            (nav(current))
        }
    }
}

fn home(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let content = html! {
        (header(ctx, Artifact::Home))
        main.home {
            h1 { (b.name) }
            @if !b.tagline.is_empty() {
                p.tagline { (b.tagline) }
            }
            section.product-names {
                h2 { "What we offer" }
                ul {
                    @for p in &b.products {
                        li { (p.name) }
                    }
                }
                a.more href=(Artifact::Products.output_path()) { "See all products" }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-minimal", "", content)
}

fn products(ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        (header(ctx, Artifact::Products))
        main.products {
            h1 { "Products" }
            @for (i, p) in ctx.business.products.iter().enumerate() {
                article.product {
                    (product_image(ctx, i))
                    h2 { (p.name) " " (price(ctx, i)) }
                    @if !p.description.is_empty() {
                        div.description { (description_html(&p.description)) }
                    }
                }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-minimal", "Products", content)
}

fn about(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let content = html! {
        (header(ctx, Artifact::About))
        main.about {
            h1 { "About " (b.name) }
            @if !b.tagline.is_empty() {
                p.tagline { (b.tagline) }
            }
            h2 { "Contact" }
            (contact(ctx))
        }
        (footer(ctx))
    };
    document(ctx, "theme-minimal", "About", content)
}
