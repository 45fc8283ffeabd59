//! The normalized result every transform produces.

pub mod cache;

pub use cache::OutputCache;

use crate::error::Result;
use std::fmt;

/// Highlighter applied to a transform result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lexer {
    #[default]
    Text,
    Json,
    Python,
    JavaScript,
}

impl Lexer {
    /// File extension used to look the syntax up in the highlighter.
    pub fn extension(self) -> &'static str {
        match self {
            Lexer::Text => "txt",
            Lexer::Json => "json",
            Lexer::Python => "py",
            Lexer::JavaScript => "js",
        }
    }
}

impl fmt::Display for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lexer::Text => "text",
            Lexer::Json => "json",
            Lexer::Python => "python",
            Lexer::JavaScript => "javascript",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Output {
    text: String,
    pub lexer: Lexer,
    pub err: Option<String>,
    pub title: String,
    pub subtitle: String,
    cache: OutputCache,
}

impl Output {
    pub fn new(cache: OutputCache, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            lexer: Lexer::Text,
            err: None,
            title: title.into(),
            subtitle: subtitle.into(),
            cache,
        }
    }

    /// The result text, falling back to the cached result when this run
    /// produced none.
    pub fn text(&self) -> Result<String> {
        if self.text.is_empty() {
            self.cache.read()
        } else {
            Ok(self.text.clone())
        }
    }

    /// Record the result. Blank values are kept in memory only so the
    /// cached result survives.
    pub fn set_text(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if !value.trim().is_empty() {
            self.cache.write(&value)?;
        }
        self.text = value;
        Ok(())
    }

    pub fn fail(&mut self, err: impl fmt::Display) {
        let err = err.to_string();
        tracing::debug!("{} failed: {}", self.title, err);
        self.err = Some(err);
    }

    pub fn is_err(&self) -> bool {
        self.err.is_some()
    }
}
