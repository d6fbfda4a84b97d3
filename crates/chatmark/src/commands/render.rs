//! `chatmark render` command implementation.

use std::path::PathBuf;

use chatmark_config::{CliSettings, Config};
use chatmark_renderer::MarkdownRenderer;
use clap::Args;

use super::{read_input, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown input file (default: stdin).
    input: Option<PathBuf>,

    /// Output file for the HTML (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Origin used to resolve relative links (overrides config).
    #[arg(long, env = "CHATMARK_BASE_ORIGIN")]
    base_origin: Option<String>,

    /// Path to configuration file (default: auto-discover chatmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the input or output cannot be
    /// accessed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            base_origin: self.base_origin,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let renderer = MarkdownRenderer::new().with_base_origin(config.base_origin()?)?;
        tracing::info!(
            base_origin = %renderer.inline().sanitizer().base(),
            "Resolving relative links"
        );

        let markdown = read_input(self.input.as_deref())?;
        let html = renderer.render(&markdown);
        write_output(self.output.as_deref(), &html)?;

        if let Some(path) = &self.output {
            Output::new().success(&format!("Rendered to {}", path.display()));
        }
        Ok(())
    }
}
