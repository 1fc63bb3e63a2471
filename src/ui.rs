use minijinja::Environment;
use rust_embed::Embed;
use serde::Serialize;

use crate::contacts;

#[derive(Embed)]
#[folder = "templates/"]
struct TemplateAssets;

/// Compiled page templates. `.html` templates auto-escape every
/// interpolated value.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compile every embedded template. A syntax error is a startup failure.
    pub fn load() -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.add_filter("path_segment", |value: String| contacts::path_segment(&value));
        env.add_filter("display_name", |value: String| contacts::display_name(&value));

        let mut count = 0usize;
        for path in TemplateAssets::iter() {
            let file = TemplateAssets::get(&path)
                .ok_or_else(|| anyhow::anyhow!("embedded template vanished: {path}"))?;
            let source = String::from_utf8(file.data.into_owned())?;
            env.add_template_owned(path.to_string(), source)?;
            count += 1;
        }
        tracing::debug!(count, "templates compiled");

        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
