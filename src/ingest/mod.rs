mod sources;

pub use sources::TabularSource;

use std::path::PathBuf;

use crate::error::AgentError;

/// Outcome of flattening one batch of uploaded files.
///
/// Per-file failures land in `warnings` and never abort the batch; `text`
/// holds the concatenated renderings of every file that could be read.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Renders every supported file into flat text, preserving row order within
/// each file and file order across the batch.
pub fn gather_text(paths: &[PathBuf]) -> IngestReport {
    let mut report = IngestReport::default();

    for path in paths {
        match TabularSource::from_path(path) {
            Some(source) => match source.to_flat_text() {
                Ok(text) => {
                    report.text.push_str(&text);
                    report.text.push('\n');
                }
                Err(e) => {
                    log::warn!("{}", e);
                    report.warnings.push(e.to_string());
                }
            },
            None => {
                let warning =
                    AgentError::UnsupportedFile(path.display().to_string()).to_string();
                log::warn!("{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    report
}
