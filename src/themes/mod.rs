//! Theme bundles: named sets of the four artifacts every microsite needs.
//!
//! | Artifact | Output path |
//! |---|---|
//! | Home | `index.html` |
//! | Products | `products.html` |
//! | About | `about.html` |
//! | Stylesheet | `assets/style.css` |
//!
//! A [`ThemeBundle`] maps each [`Artifact`] to a renderer, a function from a
//! [`RenderContext`] to text. Built-in bundles are compiled in with maud;
//! [`ThemeRegistry::register`] adds others. A bundle may be incomplete, and
//! [`ThemeRegistry::missing_artifacts`] reports exactly what it lacks so the
//! generator can refuse it before touching the output tree. An unknown theme
//! id lacks all four.
//!
//! Renderers must be pure: the same context always yields the same text.

mod components;
mod fancy;
mod minimal;
mod modern;

use crate::types::Business;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use components::description_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Artifact {
    Home,
    Products,
    About,
    Stylesheet,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Artifact::Home,
        Artifact::Products,
        Artifact::About,
        Artifact::Stylesheet,
    ];

    /// Path of the rendered artifact, relative to the site root.
    pub fn output_path(self) -> &'static str {
        match self {
            Artifact::Home => "index.html",
            Artifact::Products => "products.html",
            Artifact::About => "about.html",
            Artifact::Stylesheet => "assets/style.css",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Artifact::Home => "home",
            Artifact::Products => "products",
            Artifact::About => "about",
            Artifact::Stylesheet => "stylesheet",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.output_path())
    }
}

/// Everything a renderer sees.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub business: &'a Business,
    /// Site-relative path of the copied logo.
    pub logo: Option<&'a str>,
    /// Site-relative image path per product, by position in `business.products`.
    pub product_images: &'a [Option<String>],
}

impl<'a> RenderContext<'a> {
    pub fn product_image(&self, index: usize) -> Option<&'a str> {
        self.product_images.get(index).and_then(|p| p.as_deref())
    }
}

pub type Renderer = Arc<dyn Fn(&RenderContext<'_>) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ThemeBundle {
    id: String,
    artifacts: BTreeMap<Artifact, Renderer>,
}

impl fmt::Debug for ThemeBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeBundle")
            .field("id", &self.id)
            .field("artifacts", &self.artifacts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ThemeBundle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// Add or replace the renderer for one artifact.
    pub fn with<F>(mut self, artifact: Artifact, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> String + Send + Sync + 'static,
    {
        self.artifacts.insert(artifact, Arc::new(render));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has(&self, artifact: Artifact) -> bool {
        self.artifacts.contains_key(&artifact)
    }

    /// Artifacts this bundle does not provide, in output order.
    pub fn missing(&self) -> Vec<Artifact> {
        Artifact::ALL
            .into_iter()
            .filter(|a| !self.has(*a))
            .collect()
    }

    pub fn render(&self, artifact: Artifact, ctx: &RenderContext<'_>) -> Option<String> {
        self.artifacts.get(&artifact).map(|render| render(ctx))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    bundles: BTreeMap<String, ThemeBundle>,
}

impl ThemeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `minimal`, `modern` and `fancy` themes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(minimal::bundle());
        registry.register(modern::bundle());
        registry.register(fancy::bundle());
        registry
    }

    /// Add a bundle, replacing any bundle with the same id.
    pub fn register(&mut self, bundle: ThemeBundle) {
        self.bundles.insert(bundle.id.clone(), bundle);
    }

    pub fn get(&self, id: &str) -> Option<&ThemeBundle> {
        self.bundles.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    pub fn missing_artifacts(&self, id: &str) -> Vec<Artifact> {
        match self.get(id) {
            Some(bundle) => bundle.missing(),
            None => Artifact::ALL.to_vec(),
        }
    }
}
