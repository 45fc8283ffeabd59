use crate::config::PythonConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Top-level standard library modules that may be imported on demand.
const STANDARD_LIBRARY: &[&str] = &[
    "abc", "argparse", "array", "ast", "asyncio", "base64", "binascii", "bisect", "builtins",
    "bz2", "calendar", "cmath", "codecs", "collections", "colorsys", "contextlib", "copy", "csv",
    "ctypes", "dataclasses", "datetime", "decimal", "difflib", "dis", "email", "enum", "errno",
    "fnmatch", "fractions", "functools", "gc", "getpass", "gettext", "glob", "graphlib", "gzip",
    "hashlib", "heapq", "hmac", "html", "http", "imaplib", "importlib", "inspect", "io",
    "ipaddress", "itertools", "json", "keyword", "locale", "logging", "lzma", "math",
    "mimetypes", "numbers", "operator", "os", "pathlib", "pickle", "platform", "plistlib",
    "pprint", "pydoc", "queue", "quopri", "random", "re", "reprlib", "secrets", "shlex",
    "shutil", "signal", "socket", "sqlite3", "statistics", "string", "stringprep", "struct",
    "subprocess", "sys", "tarfile", "tempfile", "textwrap", "threading", "time", "timeit",
    "tokenize", "tomllib", "traceback", "types", "typing", "unicodedata", "urllib", "uuid",
    "warnings", "weakref", "xml", "zipfile", "zlib", "zoneinfo",
];

/// Decides whether an undefined identifier names an importable module.
pub trait ModuleResolver: Send + Sync {
    /// Import path to bind under `name`, or `None` when `name` must stay undefined.
    fn resolve(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    allowed: BTreeSet<String>,
    aliases: BTreeMap<String, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard_library() -> Self {
        STANDARD_LIBRARY
            .iter()
            .fold(Self::new(), |registry, module| registry.allow(module))
    }

    pub fn from_config(config: &PythonConfig) -> Self {
        let registry = config
            .extra_modules
            .iter()
            .fold(Self::standard_library(), |registry, module| registry.allow(module));

        config
            .aliases
            .iter()
            .fold(registry, |registry, (name, path)| registry.alias(name, path))
    }

    pub fn allow(mut self, module: &str) -> Self {
        self.allowed.insert(module.to_string());
        self
    }

    pub fn alias(mut self, name: &str, path: &str) -> Self {
        self.aliases.insert(name.to_string(), path.to_string());
        self
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, name: &str) -> Option<String> {
        if let Some(path) = self.aliases.get(name) {
            return Some(path.clone());
        }
        self.allowed.contains(name).then(|| name.to_string())
    }
}
