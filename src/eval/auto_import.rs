use super::{EvalError, EvalValue, Evaluator, ModuleResolver, ResultFormat, Scope};

/// Evaluate `expression`, importing undefined module names on demand.
///
/// Each time evaluation fails on an undefined identifier that `resolver`
/// knows, the module is bound into `scope` and the whole expression runs
/// again. Side effects of earlier attempts are therefore repeated. When the
/// identifier is unknown, already bound, or its import fails, the
/// `NameError` is returned unchanged.
pub async fn eval_with_auto_import(
    evaluator: &dyn Evaluator,
    resolver: &dyn ModuleResolver,
    expression: &str,
    scope: &mut Scope,
    format: ResultFormat,
) -> Result<EvalValue, EvalError> {
    // The NameError behind the latest import, surfaced if that import fails.
    let mut trigger: Option<(String, EvalError)> = None;

    loop {
        let err = match evaluator.evaluate(expression, scope, format).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match err {
            EvalError::UndefinedName { name, message } => {
                let original = EvalError::UndefinedName {
                    name: name.clone(),
                    message,
                };

                if scope.contains(&name) {
                    tracing::debug!("'{}' is bound but still undefined, giving up", name);
                    return Err(original);
                }

                let Some(path) = resolver.resolve(&name) else {
                    tracing::debug!("'{}' is not an importable module", name);
                    return Err(original);
                };

                tracing::debug!("Auto-importing {} as '{}'", path, name);
                scope.bind_module(&name, path);
                trigger = Some((name, original));
            }
            EvalError::ImportFailed { module, message } => match trigger.take() {
                Some((name, original)) => {
                    tracing::debug!("Import of {} failed: {}", module, message);
                    scope.unbind(&name);
                    return Err(original);
                }
                None => return Err(EvalError::ImportFailed { module, message }),
            },
            other => return Err(other),
        }
    }
}
