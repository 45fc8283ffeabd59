use crate::error::{Error, Result};
use crate::output::Lexer;
use serde_json::Value;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Syntax highlighting to inline-styled HTML with one fixed theme.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Result<Self> {
        let mut themes = ThemeSet::load_defaults();
        let theme = match themes.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                let available: Vec<&str> = themes.themes.keys().map(String::as_str).collect();
                return Err(Error::Config(format!(
                    "unknown theme '{}', expected one of: {}",
                    theme_name,
                    available.join(", ")
                )));
            }
        };

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    pub fn highlight(&self, text: &str, lexer: Lexer) -> Result<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_extension(lexer.extension())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        self.render(text, syntax)
    }

    /// Highlight text of unknown format: JSON when it parses, otherwise a
    /// guessed syntax, otherwise plain text.
    pub fn highlight_best_effort(&self, text: &str) -> Result<String> {
        self.render(text, self.guess_syntax(text))
    }

    pub fn guess_syntax(&self, text: &str) -> &SyntaxReference {
        let plain = self.syntaxes.find_syntax_plain_text();
        let by_extension = |ext: &str| self.syntaxes.find_syntax_by_extension(ext);

        if serde_json::from_str::<Value>(text).is_ok() {
            return by_extension("json").unwrap_or(plain);
        }

        if let Some(syntax) = self.syntaxes.find_syntax_by_first_line(text) {
            return syntax;
        }

        let trimmed = text.trim_start();
        let guess = if trimmed.starts_with('<') {
            by_extension("xml")
        } else if trimmed.starts_with("# ") || trimmed.starts_with("```") {
            by_extension("md")
        } else if trimmed.starts_with("---\n") {
            by_extension("yaml")
        } else {
            None
        };
        guess.unwrap_or(plain)
    }

    fn render(&self, text: &str, syntax: &SyntaxReference) -> Result<String> {
        tracing::trace!("Highlighting {} bytes as {}", text.len(), syntax.name);
        Ok(highlighted_html_for_string(
            text,
            &self.syntaxes,
            syntax,
            &self.theme,
        )?)
    }
}
