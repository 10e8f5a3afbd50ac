//! Handlebars rendering of the spec file, desktop entry, and rpmbuild macros.
//!
//! The registry runs in strict mode: a template referencing a field the
//! context does not define fails to render instead of producing a blank.

use super::{Error, PackageOptions, Result, error::ErrorExt};
use handlebars::Handlebars;
use serde_json::Value;

const SPEC_TEMPLATE: &str = include_str!("spec.hbs");
const DESKTOP_TEMPLATE: &str = include_str!("desktop.hbs");
const MACROS_TEMPLATE: &str = include_str!("macros.hbs");

/// Templates rendered from the package options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// rpmbuild spec file.
    Spec,
    /// freedesktop.org desktop entry.
    Desktop,
    /// rpmbuild macro definitions.
    Macros,
}

impl TemplateKind {
    /// Registry name of the template.
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Spec => "spec",
            TemplateKind::Desktop => "desktop",
            TemplateKind::Macros => "macros",
        }
    }
}

/// Registered templates for one packaging run.
#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Registers the bundled templates.
    pub fn new() -> Result<Self> {
        Self::with_sources(SPEC_TEMPLATE, DESKTOP_TEMPLATE)
    }

    /// Registers the templates for `options`, reading any custom spec or
    /// desktop template it names.
    pub async fn load(options: &PackageOptions) -> Result<Self> {
        if options.spec_template.is_none() && options.desktop_template.is_none() {
            return Self::new();
        }

        let spec = match &options.spec_template {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .fs_context("reading spec template", path)?,
            None => SPEC_TEMPLATE.to_string(),
        };
        let desktop = match &options.desktop_template {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .fs_context("reading desktop template", path)?,
            None => DESKTOP_TEMPLATE.to_string(),
        };
        Self::with_sources(&spec, &desktop)
    }

    fn with_sources(spec: &str, desktop: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        for (kind, source) in [
            (TemplateKind::Spec, spec),
            (TemplateKind::Desktop, desktop),
            (TemplateKind::Macros, MACROS_TEMPLATE),
        ] {
            registry
                .register_template_string(kind.name(), source)
                .map_err(|e| Error::Template {
                    name: kind.name().to_string(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    /// Renders `kind` against the options, extended with `extra` keys.
    pub fn render(
        &self,
        kind: TemplateKind,
        options: &PackageOptions,
        extra: &[(&str, Value)],
    ) -> Result<String> {
        let data = context(options, extra)?;
        self.registry
            .render(kind.name(), &data)
            .map_err(|e| Error::Template {
                name: kind.name().to_string(),
                reason: e.to_string(),
            })
    }

    /// Renders an ad-hoc template string against the options.
    pub fn render_str(&self, template: &str, options: &PackageOptions) -> Result<String> {
        let data = context(options, &[])?;
        self.registry
            .render_template(template, &data)
            .map_err(|e| Error::Template {
                name: template.to_string(),
                reason: e.to_string(),
            })
    }
}

fn context(options: &PackageOptions, extra: &[(&str, Value)]) -> Result<Value> {
    let mut data = serde_json::to_value(options)?;
    if let Value::Object(map) = &mut data {
        for (key, value) in extra {
            map.insert((*key).to_string(), value.clone());
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{UserOptions, resolve};
    use serde_json::json;

    fn options() -> PackageOptions {
        let user = UserOptions {
            name: Some("demo".into()),
            version: Some("1.2.3".into()),
            arch: Some("x86_64".into()),
            ..Default::default()
        };
        resolve(user, &Default::default())
    }

    fn staging() -> [(&'static str, Value); 1] {
        [("stagingDir", json!("/tmp/demo_1.2.3_x86_64_abc"))]
    }

    #[test]
    fn every_bundled_template_renders_with_defaults() {
        let templates = Templates::new().unwrap();
        let opts = resolve(UserOptions::default(), &Default::default());
        for kind in [TemplateKind::Spec, TemplateKind::Desktop, TemplateKind::Macros] {
            templates.render(kind, &opts, &staging()).unwrap();
        }
    }

    #[test]
    fn spec_references_identity() {
        let templates = Templates::new().unwrap();
        let spec = templates
            .render(TemplateKind::Spec, &options(), &staging())
            .unwrap();
        assert!(spec.contains("Name: demo"));
        assert!(spec.contains("Version: 1.2.3"));
        assert!(spec.contains("Requires: lsb, libXScrnSaver"));
        assert!(spec.contains("cp -R /tmp/demo_1.2.3_x86_64_abc/BUILD/usr/*"));
        assert!(!spec.contains("URL:"));
        assert!(spec.contains("%global debug_package %{nil}"));
    }

    #[test]
    fn desktop_lists_categories() {
        let templates = Templates::new().unwrap();
        let desktop = templates
            .render(TemplateKind::Desktop, &options(), &[])
            .unwrap();
        assert!(desktop.contains("Name=demo"));
        assert!(desktop.contains("Exec=demo %U"));
        assert!(desktop.contains("Categories=GNOME;GTK;Utility;"));
    }

    #[test]
    fn missing_field_is_an_error() {
        let templates = Templates::new().unwrap();
        let err = templates
            .render(TemplateKind::Macros, &options(), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(templates.render_str("{{nope}}", &options()).is_err());
    }

    #[test]
    fn render_str_substitutes_options() {
        let templates = Templates::new().unwrap();
        let path = templates
            .render_str("/out/{{name}}-{{version}}-{{revision}}.{{arch}}.rpm", &options())
            .unwrap();
        assert_eq!(path, "/out/demo-1.2.3-1.x86_64.rpm");
    }

    #[tokio::test]
    async fn custom_spec_template_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom.spec.hbs");
        std::fs::write(&custom, "Name: {{name}}-custom\n").unwrap();

        let mut opts = options();
        opts.spec_template = Some(custom);
        let templates = Templates::load(&opts).await.unwrap();
        let spec = templates.render(TemplateKind::Spec, &opts, &[]).unwrap();
        assert_eq!(spec, "Name: demo-custom\n");
    }

    #[tokio::test]
    async fn load_without_custom_templates_uses_bundled() {
        let opts = options();
        let loaded = Templates::load(&opts).await.unwrap();
        let bundled = Templates::new().unwrap();
        assert_eq!(
            loaded.render(TemplateKind::Spec, &opts, &staging()).unwrap(),
            bundled.render(TemplateKind::Spec, &opts, &staging()).unwrap()
        );
    }
}
