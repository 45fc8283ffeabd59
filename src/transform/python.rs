use super::help::{self, Request};
use super::Transform;
use crate::error::Result;
use crate::eval::{
    eval_with_auto_import, EvalValue, Evaluator, ModuleResolver, ResultFormat, Scope,
};
use crate::output::{Lexer, Output, OutputCache};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// What both Python handlers need to evaluate user code.
#[derive(Clone)]
pub struct PythonContext {
    pub evaluator: Arc<dyn Evaluator>,
    pub resolver: Arc<dyn ModuleResolver>,
    pub help_template: String,
}

impl PythonContext {
    /// Apply the help marker, returning the expression to evaluate and the
    /// lexer it forces, if any.
    fn expression(&self, code: &str) -> (String, Option<Lexer>) {
        match help::parse(code) {
            Request::Help(target) => (
                help::python_help(&self.help_template, target),
                Some(Lexer::Python),
            ),
            Request::Run(code) => (code.to_string(), None),
        }
    }

    /// Evaluate `code` in `scope`, recording any failure on `output`.
    async fn evaluate(
        &self,
        code: &str,
        mut scope: Scope,
        format: ResultFormat,
        output: &mut Output,
    ) -> Option<EvalValue> {
        let (expression, lexer) = self.expression(code);
        if let Some(lexer) = lexer {
            output.lexer = lexer;
        }

        match eval_with_auto_import(
            self.evaluator.as_ref(),
            self.resolver.as_ref(),
            &expression,
            &mut scope,
            format,
        )
        .await
        {
            Ok(value) => Some(value),
            Err(e) => {
                output.fail(e);
                None
            }
        }
    }
}

/// Python over the input parsed as JSON, bound to `j`.
pub struct PyJson {
    python: PythonContext,
    dump_width: usize,
}

impl PyJson {
    pub fn new(python: PythonContext, dump_width: usize) -> Self {
        Self { python, dump_width }
    }
}

#[async_trait]
impl Transform for PyJson {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output> {
        let mut output = Output::new(
            cache.clone(),
            "Process JSON with Python",
            "variable: j (parsed JSON object)",
        );

        let j: Value = match serde_json::from_str(input) {
            Ok(j) => j,
            Err(e) => {
                output.fail(e);
                return Ok(output);
            }
        };

        let format = ResultFormat {
            prefer_json: true,
            width: self.dump_width,
        };
        let Some(value) = self
            .python
            .evaluate(code, Scope::with_value("j", j), format, &mut output)
            .await
        else {
            return Ok(output);
        };

        match value {
            EvalValue::Str(text) => {
                if serde_json::from_str::<Value>(&text).is_ok() {
                    output.lexer = Lexer::Json;
                }
                output.set_text(text)?;
            }
            EvalValue::Json(text) => {
                output.set_text(text)?;
                output.lexer = Lexer::Json;
            }
            EvalValue::Repr(text) => {
                output.set_text(text)?;
                output.lexer = Lexer::Python;
            }
        }
        Ok(output)
    }
}

/// Python over the raw input, bound to `txt`.
pub struct PyTxt {
    python: PythonContext,
    line_width: usize,
}

impl PyTxt {
    pub fn new(python: PythonContext, line_width: usize) -> Self {
        Self { python, line_width }
    }
}

#[async_trait]
impl Transform for PyTxt {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output> {
        let mut output = Output::new(cache.clone(), "Process Text with Python", "variable: txt");

        let format = ResultFormat {
            prefer_json: false,
            width: self.line_width,
        };
        let Some(value) = self
            .python
            .evaluate(code, Scope::with_value("txt", input), format, &mut output)
            .await
        else {
            return Ok(output);
        };

        match value {
            EvalValue::Str(text) => output.set_text(text)?,
            EvalValue::Json(text) | EvalValue::Repr(text) => {
                output.set_text(text)?;
                output.lexer = Lexer::Python;
            }
        }
        Ok(output)
    }
}
