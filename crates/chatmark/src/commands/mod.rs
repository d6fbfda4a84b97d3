//! CLI command implementations.

pub(crate) mod blocks;
pub(crate) mod render;

use std::io::{Read, Write};
use std::path::Path;

pub(crate) use blocks::BlocksArgs;
pub(crate) use render::RenderArgs;

/// Read markdown from a file, or from stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Write a document to a file, or to stdout when no path is given.
///
/// A trailing newline is appended for stdout so shells print cleanly.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
            stdout.flush()?;
            tracing::info!(bytes = content.len(), "Wrote output to stdout");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.md");
        std::fs::write(&path, "# Title\n").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), "# Title\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.md"))).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reply.html");

        write_output(Some(&path), "<p>hi</p>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }
}
