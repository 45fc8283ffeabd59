//! The trailing `?` convention: `code?` asks for documentation on `code`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    Run(&'a str),
    /// Documentation requested for the code before the `?`.
    Help(&'a str),
}

pub fn parse(code: &str) -> Request<'_> {
    match code.strip_suffix('?') {
        Some(target) => Request::Help(target),
        None => Request::Run(code),
    }
}

/// Python expression producing documentation for `target`.
pub fn python_help(template: &str, target: &str) -> String {
    template.replace("{expr}", target)
}

/// Rewrite `... | cmd?` into `... | man cmd | col -bx`.
///
/// Returns the documented command together with the rewritten pipeline, or
/// `None` when there is no command before the `?`.
pub fn shell_help(target: &str) -> Option<(&str, String)> {
    let command = target.split_whitespace().last()?;
    let rewritten = format!("{target}?").replace(
        &format!("{command}?"),
        &format!("man {command} | col -bx"),
    );
    Some((command, rewritten))
}
