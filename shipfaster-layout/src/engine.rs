//! Handlebars template engine wrapper

use crate::{Result, error::LayoutError, helpers};
use handlebars::Handlebars;
use parking_lot::RwLock;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Built-in templates, by registration name
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("head", include_str!("../templates/head.hbs")),
    ("toaster", include_str!("../templates/toaster.hbs")),
    ("navigation", include_str!("../templates/navigation.hbs")),
    ("loading", include_str!("../templates/loading.hbs")),
    ("seo_script", include_str!("../templates/seo_script.hbs")),
    ("ad_script", include_str!("../templates/ad_script.hbs")),
];

const TEMPLATE_EXTENSION: &str = "hbs";

/// Handlebars registry holding the document templates
#[derive(Clone)]
pub struct LayoutEngine {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
}

impl LayoutEngine {
    /// Create an engine with the built-in templates registered
    pub fn new(strict_mode: bool) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(strict_mode);
        helpers::register_builtin_helpers(&mut handlebars);

        for (name, source) in BUILTIN_TEMPLATES {
            handlebars.register_template_string(name, *source)?;
        }

        Ok(Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
        })
    }

    /// Register every `.hbs` file under `dir`, replacing templates of the
    /// same name (`partials/nav.hbs` registers as `partials/nav`).
    pub fn load_overrides(&self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(LayoutError::TemplateNotFound(format!(
                "template directory {}",
                dir.display()
            )));
        }
        self.load_dir(dir, dir)
    }

    fn load_dir(&self, root: &Path, dir: &Path) -> Result<usize> {
        let mut loaded = 0;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                loaded += self.load_dir(root, &path)?;
            } else if path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
                let name = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .with_extension("")
                    .to_string_lossy()
                    .replace('\\', "/");
                let source = fs::read_to_string(&path)?;

                debug!(template = %name, "Registering template override");
                self.register_template(&name, &source)?;
                loaded += 1;
            }
        }

        Ok(loaded)
    }

    /// Render a registered template with data
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let handlebars = self.handlebars.read();
        if !handlebars.has_template(template) {
            return Err(LayoutError::TemplateNotFound(template.to_string()));
        }
        Ok(handlebars.render(template, data)?)
    }

    /// Register a template (or partial) from a string
    pub fn register_template(&self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .write()
            .register_template_string(name, template)?;
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.read().has_template(name)
    }

    /// Registered template names
    pub fn templates(&self) -> Vec<String> {
        self.handlebars.read().get_templates().keys().cloned().collect()
    }
}
