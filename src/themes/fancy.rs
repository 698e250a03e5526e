//! `fancy`: serif display type, ornaments and a menu-style price list.

use super::components::{brand, contact, description_html, document, footer, nav, price, product_image, stylesheet};
use super::{Artifact, RenderContext, ThemeBundle};
use maud::{Markup, html};

const CSS: &str = include_str!("../../static/themes/fancy/style.css");
const ID: &str = "fancy";

pub(super) fn bundle() -> ThemeBundle {
    ThemeBundle::new(ID)
        .with(Artifact::Home, |ctx| home(ctx).into_string())
        .with(Artifact::Products, |ctx| products(ctx).into_string())
        .with(Artifact::About, |ctx| about(ctx).into_string())
        .with(Artifact::Stylesheet, |ctx| stylesheet(ctx, ID, CSS))
}

fn masthead(ctx: &RenderContext<'_>, current: Artifact) -> Markup {
    let b = ctx.business;
    html! {
        header.masthead {
            (brand(ctx))
            @if !b.tagline.is_empty() {
                p.tagline { em { (b.tagline) } }
            }
            div.ornament aria-hidden="true" { "❦" }
            (nav(current))
        }
    }
}

fn home(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let content = html! {
        (masthead(ctx, Artifact::Home))
        main.home {
            section.welcome {
                h1 { "Welcome to " (b.name) }
            }
            section.menu-preview {
                h2 { "From our collection" }
                ol.menu {
                    @for (i, p) in b.products.iter().enumerate() {
                        li {
                            span.item-name { (p.name) }
                            span.leader {}
                            (price(ctx, i))
                        }
                    }
                }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-fancy", "", content)
}

fn products(ctx: &RenderContext<'_>) -> Markup {
    let content = html! {
        (masthead(ctx, Artifact::Products))
        main.products {
            h1 { "The Collection" }
            @for (i, p) in ctx.business.products.iter().enumerate() {
                figure.product.flipped[i % 2 == 1] {
                    (product_image(ctx, i))
                    figcaption {
                        h2 { (p.name) }
                        (price(ctx, i))
                        @if !p.description.is_empty() {
                            div.description { (description_html(&p.description)) }
                        }
                    }
                }
                div.ornament aria-hidden="true" { "✦" }
            }
        }
        (footer(ctx))
    };
    document(ctx, "theme-fancy", "Products", content)
}

fn about(ctx: &RenderContext<'_>) -> Markup {
    let b = ctx.business;
    let content = html! {
        (masthead(ctx, Artifact::About))
        main.about {
            h1 { "Our Story" }
            p.lede { (b.name) " welcomes you." }
            h2 { "Visit or write to us" }
            (contact(ctx))
        }
        (footer(ctx))
    };
    document(ctx, "theme-fancy", "About", content)
}
