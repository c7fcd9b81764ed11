//! Serialization of the handoff document.

use crate::config::OutputFormat;
use crate::errors::{Error, Result};
use crate::spec::Extraction;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Render `extraction` in `format`.
pub fn render(extraction: &Extraction, format: OutputFormat) -> Result<String> {
    let mut text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(extraction)?,
        OutputFormat::Yaml => serde_yaml::to_string(extraction)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write the rendered document to `path`, or to stdout when `path` is `None`.
pub fn write_extraction(extraction: &Extraction, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    let text = render(extraction, format)?;
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::io(path, e))?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(text.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(|e| Error::io(path, e))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .map_err(|e| Error::io("<stdout>", e))
        }
    }
}
