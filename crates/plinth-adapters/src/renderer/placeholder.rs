//! `{{ .Name }}` substitution renderer.

use tracing::instrument;

use plinth_core::{
    application::ports::TemplateRenderer,
    domain::{Bindings, ConfigurationContext, FrozenTemplate, RenderedFile, ScaffoldPath},
    error::PlinthResult,
};

/// Renders both the path and the body of a frozen template.
///
/// Names resolve against the template's injected mixin values first and the
/// context's extra variables second. The rendered path is validated again,
/// since a substituted value may introduce `..` or an absolute prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    /// Create a new placeholder renderer.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    #[instrument(skip_all, fields(template = template.name()))]
    fn render(
        &self,
        template: &FrozenTemplate,
        context: &ConfigurationContext,
    ) -> PlinthResult<RenderedFile> {
        let bindings = Bindings::new(template.mixins(), context);

        let path = bindings.render(template.name(), &template.path().to_string())?;
        let path = ScaffoldPath::try_new(path)?;
        let body = bindings.render(template.name(), template.body())?;

        Ok(RenderedFile::new(path, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::domain::{DomainError, MixinSlot, StaticTemplate, Template};
    use plinth_core::error::{ErrorKind, PlinthError};

    fn context() -> ConfigurationContext {
        ConfigurationContext::builder()
            .project_name("guestbook")
            .repository("example.com/guestbook")
            .boilerplate("// header")
            .variable("Kind", "Guestbook")
            .build()
            .unwrap()
    }

    fn frozen(path: &str, body: &str, slots: &[MixinSlot]) -> FrozenTemplate {
        let mut builder = StaticTemplate::builder().name("t").path(path).body(body);
        for slot in slots {
            builder = builder.slot(slot.clone());
        }
        let mut t = builder.build().unwrap();
        t.base_mut().mixins_mut().inject(&context());
        t.set_defaults().unwrap();
        t.base_mut().freeze("t").unwrap()
    }

    #[test]
    fn renders_path_and_body() {
        let t = frozen(
            "cmd/{{ .ProjectName }}/main.go",
            "{{ .Boilerplate }}\npackage main // {{.Kind}}\n",
            &[MixinSlot::ProjectName, MixinSlot::Boilerplate],
        );
        let file = PlaceholderRenderer::new().render(&t, &context()).unwrap();

        assert_eq!(file.path().to_string(), "cmd/guestbook/main.go");
        assert_eq!(file.contents(), b"// header\npackage main // Guestbook\n");
    }

    #[test]
    fn undeclared_mixin_is_unresolved() {
        // `Repo` exists in the context but the template never declared it.
        let t = frozen("main.go", "import \"{{ .Repo }}/api\"", &[]);
        let err = PlaceholderRenderer::new().render(&t, &context()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnresolvedPlaceholder);
        assert_eq!(
            err,
            PlinthError::Domain(DomainError::UnresolvedPlaceholder {
                template: "t".into(),
                token: "Repo".into(),
            })
        );
    }

    #[test]
    fn text_without_placeholders_is_identical() {
        let body = "no braces here, just { and } and text\n";
        let t = frozen("README", body, &[]);
        let file = PlaceholderRenderer::new().render(&t, &context()).unwrap();
        assert_eq!(file.contents(), body.as_bytes());
    }
}
