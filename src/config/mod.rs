use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub mod loader;

pub use loader::ConfigLoader;

/// Directory holding `config.toml` when no explicit path is given.
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "process-text", "process-text")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub display: DisplayConfig,
    pub python: PythonConfig,
    pub shell: ShellConfig,
    pub jq: JqConfig,
    pub process: ProcessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw input text written by the workflow before each run.
    pub input: PathBuf,
    /// Last non-blank transform result.
    pub output: PathBuf,
    /// Appended to `output` to name the Quick Look HTML file.
    pub html_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    /// Width of one pane of the Quick Look preview, in columns.
    pub line_width: usize,
    /// Width used when dumping non-JSON values produced from JSON input.
    pub json_dump_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PythonConfig {
    pub interpreter: String,
    /// Expression used for `code?`; `{expr}` is replaced by `code`.
    pub help_template: String,
    /// Modules importable on demand in addition to the standard library.
    pub extra_modules: Vec<String>,
    /// Short names resolved to a module path, e.g. `np = "numpy"`.
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JqConfig {
    pub program: String,
    /// Passed before the filter, e.g. `["--sort-keys"]`.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProcessConfig {
    /// Zero disables the timeout.
    pub timeout_secs: u64,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("/tmp/in.txt"),
            output: PathBuf::from("/tmp/out.txt"),
            html_suffix: ".html".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_width: 59,
            json_dump_width: 55,
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            help_template: "pydoc.render_doc({expr}, renderer=pydoc.plaintext)".to_string(),
            extra_modules: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "/bin/sh".to_string(),
        }
    }
}

impl Default for JqConfig {
    fn default() -> Self {
        Self {
            program: "jq".to_string(),
            args: Vec::new(),
        }
    }
}

impl ProcessConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply `PROCESS_TEXT_*` overrides read through `lookup`.
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup("PROCESS_TEXT_INPUT") {
            self.paths.input = PathBuf::from(input);
        }

        if let Some(output) = lookup("PROCESS_TEXT_OUTPUT") {
            self.paths.output = PathBuf::from(output);
        }

        if let Some(theme) = lookup("PROCESS_TEXT_THEME") {
            self.display.theme = theme;
        }

        if let Some(python) = lookup("PROCESS_TEXT_PYTHON") {
            self.python.interpreter = python;
        }

        if let Some(jq) = lookup("PROCESS_TEXT_JQ") {
            self.jq.program = jq;
        }
    }

    /// Path of the Quick Look HTML file derived from the output cache path.
    pub fn html_path(&self) -> PathBuf {
        let mut path = self.paths.output.clone().into_os_string();
        path.push(&self.paths.html_suffix);
        PathBuf::from(path)
    }
}
