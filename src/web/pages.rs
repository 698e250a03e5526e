//! Operator-facing pages: the submission form, the preview frame and errors.

use maud::{DOCTYPE, Markup, html};

const CSS: &str = include_str!("../../static/app.css");

/// Product rows shown on a fresh form.
const PRODUCT_ROWS: usize = 3;

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Microsite Generator" }
                style { (CSS) }
            }
            body {
                header.app-header {
                    a href="/" { "Microsite Generator" }
                }
                main { (content) }
            }
        }
    }
}

fn text_input(name: &str, label: &str, kind: &str, required: bool) -> Markup {
    html! {
        label {
            span { (label) }
            input type=(kind) name=(name) required[required];
        }
    }
}

fn product_row(index: usize) -> Markup {
    html! {
        fieldset.product-row {
            legend { "Product " (index + 1) }
            label {
                span { "Name" }
                input type="text" name="product_name" required[index == 0];
            }
            label {
                span { "Price" }
                input type="number" name="product_price" min="0" step="0.01";
            }
            label {
                span { "Description (Markdown)" }
                textarea name="product_description" rows="3" {}
            }
            label {
                span { "Image" }
                input type="file" name="product_image" accept=".png,.jpg,.jpeg,.gif,.webp";
            }
        }
    }
}

/// The business submission form, with an error banner after a rejected post.
pub fn form_page<'a>(themes: impl Iterator<Item = &'a str>, error: Option<&str>) -> Markup {
    let content = html! {
        h1 { "Create a microsite" }
        @if let Some(message) = error {
            p.flash.error role="alert" { (message) }
        }
        form method="post" action="/create" enctype="multipart/form-data" {
            fieldset {
                legend { "Business" }
                (text_input("business_name", "Business name", "text", true))
                (text_input("tagline", "Tagline", "text", false))
                (text_input("email", "Email", "email", false))
                (text_input("phone", "Phone", "tel", false))
                (text_input("address", "Address", "text", false))
                label {
                    span { "Logo" }
                    input type="file" name="logo" accept=".png,.jpg,.jpeg,.gif,.webp";
                }
            }
            fieldset {
                legend { "Social" }
                (text_input("facebook", "Facebook URL", "url", false))
                (text_input("instagram", "Instagram URL", "url", false))
                (text_input("twitter", "Twitter URL", "url", false))
            }
            fieldset {
                legend { "Theme" }
                select name="theme" {
                    @for id in themes {
                        option value=(id) selected[id == crate::types::DEFAULT_THEME] { (id) }
                    }
                }
            }
            @for i in 0..PRODUCT_ROWS {
                (product_row(i))
            }
            button type="submit" { "Generate microsite" }
        }
    };
    layout("New microsite", content)
}

/// Preview of a generated site in a frame, with a download link.
pub fn preview_page(slug: &str) -> Markup {
    let content = html! {
        div.preview-bar {
            h1 { "Preview: " (slug) }
            a.button href={ "/download/" (slug) } { "Download ZIP" }
            a href={ "/sites/" (slug) "/" } target="_blank" { "Open in new tab" }
        }
        iframe.preview src={ "/sites/" (slug) "/" } title={ (slug) " preview" } {}
    };
    layout(slug, content)
}

pub fn error_page(title: &str, message: &str) -> Markup {
    let content = html! {
        h1 { (title) }
        p.flash.error { (message) }
        p { a href="/" { "Back to the form" } }
    };
    layout(title, content)
}
