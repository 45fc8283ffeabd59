use super::Highlighter;
use crate::error::Result;
use crate::output::Output;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "preview.html";
const TEMPLATE: &str = include_str!("assets/preview.html");
const STYLESHEET: &str = include_str!("assets/preview.css");

/// Two-pane Quick Look preview: highlighted input on the left, the
/// transform result and any error on the right.
pub struct HtmlRenderer {
    template_engine: Tera,
    highlighter: Highlighter,
}

impl HtmlRenderer {
    pub fn new(highlighter: Highlighter) -> Result<Self> {
        let mut template_engine = Tera::default();
        template_engine.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        Ok(Self {
            template_engine,
            highlighter,
        })
    }

    pub fn render(&self, input: &str, output: &Output) -> Result<String> {
        let mut context = Context::new();
        context.insert("stylesheet", STYLESHEET);
        context.insert(
            "input_html",
            &self.highlighter.highlight_best_effort(input)?,
        );
        context.insert(
            "output_html",
            &self.highlighter.highlight(&output.text()?, output.lexer)?,
        );
        context.insert("faded", &output.is_err());
        context.insert("err", &output.err);

        Ok(self.template_engine.render(TEMPLATE_NAME, &context)?)
    }
}
