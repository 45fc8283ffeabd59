//! Alfred script filter JSON.

use crate::error::Result;
use crate::output::Output;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlfredFeedback {
    pub items: Vec<AlfredItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlfredItem {
    pub title: String,
    pub subtitle: String,
    /// Passed on to the next workflow action.
    pub arg: String,
    pub quicklookurl: String,
    pub text: AlfredText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlfredText {
    /// Shown with Large Type; carries the error, if any.
    pub largetype: Option<String>,
}

impl AlfredFeedback {
    pub fn from_output(output: &Output, quicklook: &Path) -> Result<Self> {
        Ok(Self {
            items: vec![AlfredItem {
                title: output.title.clone(),
                subtitle: output.subtitle.clone(),
                arg: output.text()?,
                quicklookurl: quicklook.display().to_string(),
                text: AlfredText {
                    largetype: output.err.clone(),
                },
            }],
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
