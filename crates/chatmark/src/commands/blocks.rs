//! `chatmark blocks` command implementation.

use std::path::PathBuf;

use chatmark_renderer::{normalize_line_endings, segment};
use clap::Args;

use super::{read_input, write_output};
use crate::error::CliError;

/// Arguments for the blocks command.
#[derive(Args)]
pub(crate) struct BlocksArgs {
    /// Markdown input file (default: stdin).
    input: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BlocksArgs {
    /// Execute the blocks command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(self.input.as_deref())?;
        let json = blocks_json(&markdown)?;
        write_output(None, &json)?;
        Ok(())
    }
}

fn blocks_json(markdown: &str) -> Result<String, serde_json::Error> {
    let blocks = segment(&normalize_line_endings(markdown));
    serde_json::to_string_pretty(&blocks)
}
