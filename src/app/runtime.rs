//! One invocation of the pipeline: read the input, run the transform, write
//! the Quick Look preview and hand back the Alfred feedback.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputCache;
use crate::render::{AlfredFeedback, Highlighter, HtmlRenderer};
use crate::subprocess::SubprocessManager;
use crate::transform::{TransformFactory, TransformKind};
use tokio::fs;
use tracing::{debug, info, warn};

/// What the user asked for on the command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub kind: TransformKind,
    pub code: String,
}

impl Invocation {
    pub fn new(kind: TransformKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
        }
    }
}

pub async fn run(
    config: &Config,
    subprocess: SubprocessManager,
    invocation: &Invocation,
) -> Result<AlfredFeedback> {
    run_with_factory(config, TransformFactory::new(config, subprocess), invocation).await
}

/// Same as [`run`] with a caller-supplied factory.
pub async fn run_with_factory(
    config: &Config,
    factory: TransformFactory,
    invocation: &Invocation,
) -> Result<AlfredFeedback> {
    let input_path = &config.paths.input;
    let input = fs::read_to_string(input_path)
        .await
        .map_err(|e| Error::io(input_path, e))?;
    debug!("Read {} bytes from {}", input.len(), input_path.display());

    let renderer = HtmlRenderer::new(Highlighter::new(&config.display.theme)?)?;

    let cache = OutputCache::new(&config.paths.output);
    cache.seed(&input)?;

    info!("Running {} transform", invocation.kind);
    let transform = factory.create(invocation.kind);
    let output = transform.apply(&input, &invocation.code, &cache).await?;
    if let Some(err) = &output.err {
        warn!("{} transform reported an error: {}", invocation.kind, err);
    }

    let html_path = config.html_path();
    let html = renderer.render(&input, &output)?;
    fs::write(&html_path, html)
        .await
        .map_err(|e| Error::io(&html_path, e))?;
    debug!("Wrote preview to {}", html_path.display());

    AlfredFeedback::from_output(&output, &html_path)
}
