use super::Transform;
use crate::error::Result;
use crate::output::{Lexer, Output, OutputCache};
use async_trait::async_trait;
use boa_engine::property::Attribute;
use boa_engine::{js_string, Context, JsValue, Source};
use serde_json::Value;

/// JavaScript over the input parsed as JSON, bound to `j`.
pub struct JscJson;

/// Evaluate `JSON.stringify(<code>)` with `j` bound to `json`.
///
/// Runs synchronously; the engine context never crosses an await point.
fn stringify(json: &Value, code: &str) -> std::result::Result<String, String> {
    let mut context = Context::default();

    let j = JsValue::from_json(json, &mut context).map_err(|e| e.to_string())?;
    context
        .register_global_property(js_string!("j"), j, Attribute::all())
        .map_err(|e| e.to_string())?;

    let script = format!("JSON.stringify({code})");
    let result = context
        .eval(Source::from_bytes(script.as_str()))
        .map_err(|e| e.to_string())?;

    result
        .to_string(&mut context)
        .map(|s| s.to_std_string_escaped())
        .map_err(|e| e.to_string())
}

#[async_trait]
impl Transform for JscJson {
    async fn apply(&self, input: &str, code: &str, cache: &OutputCache) -> Result<Output> {
        let mut output = Output::new(
            cache.clone(),
            "Process JSON with JavaScript",
            "variable: j (parsed JSON object)",
        );

        let j: Value = match serde_json::from_str(input) {
            Ok(j) => j,
            Err(e) => {
                output.fail(e);
                return Ok(output);
            }
        };

        let text = match stringify(&j, code) {
            Ok(text) => text,
            Err(e) => {
                output.fail(e);
                return Ok(output);
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                output.set_text(serde_json::to_string_pretty(&value)?)?;
                output.lexer = Lexer::Json;
            }
            Err(_) => {
                output.set_text(text)?;
                output.lexer = Lexer::JavaScript;
            }
        }
        Ok(output)
    }
}
