//! Directory batch processing.
//!
//! Every document is processed in isolation: a reader error or a panic in one
//! document is logged, recorded in the [`BatchReport`] and turned into an
//! empty result file, and the batch carries on.

use std::any::Any;
use std::ffi::OsString;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::DocumentResult;
use crate::pipeline::OutlineExtractor;
use crate::render::{write_json, JsonFormat};

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents whose outline was written
    pub processed: Vec<PathBuf>,
    /// Documents that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Whether every document was processed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Processed(PathBuf),
    Failed(PathBuf, String),
}

/// List the `*.pdf` files (extension matched case-insensitively) directly
/// inside `dir`, sorted by path.
pub fn collect_inputs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Other(format!(
            "input directory not found: {}",
            dir.display()
        )));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Process every PDF in `input` and write `<stem>.json` files to `output`.
pub fn process_directory(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    extractor: &OutlineExtractor,
) -> Result<BatchReport> {
    process_directory_with_progress(input, output, extractor, |_| {})
}

/// Like [`process_directory`], calling `progress` after each document.
///
/// Documents are processed on the rayon pool unless the extractor's options
/// disable parallelism.
pub fn process_directory_with_progress<F>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    extractor: &OutlineExtractor,
    progress: F,
) -> Result<BatchReport>
where
    F: Fn(&Path) + Sync,
{
    let inputs = collect_inputs(input)?;
    let output = output.as_ref();
    fs::create_dir_all(output)?;

    log::info!("Processing {} PDF files", inputs.len());

    let run = |path: &PathBuf| {
        let outcome = process_one(path, output, extractor);
        progress(path.as_path());
        outcome
    };
    let outcomes: Vec<Outcome> = if extractor.options().parallel {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Processed(path) => report.processed.push(path),
            Outcome::Failed(path, reason) => report.failed.push((path, reason)),
        }
    }
    log::info!(
        "Processed {} files, {} failed",
        report.processed.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Output path for an input document: `<output>/<stem>.json`.
pub fn output_path(input: &Path, output: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".json");
    output.join(name)
}

fn process_one(path: &Path, output: &Path, extractor: &OutlineExtractor) -> Outcome {
    log::debug!("Processing {}", path.display());

    let extracted = match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract_file(path))) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    };

    let (result, failure) = match extracted {
        Ok(result) => (result, None),
        Err(reason) => {
            log::error!("Error processing {}: {}", path.display(), reason);
            (DocumentResult::empty(), Some(reason))
        }
    };

    let target = output_path(path, output);
    if let Err(e) = write_json(&result, &target, JsonFormat::Pretty) {
        log::error!("Failed to write {}: {}", target.display(), e);
        return Outcome::Failed(path.to_path_buf(), e.to_string());
    }

    match failure {
        None => Outcome::Processed(path.to_path_buf()),
        Some(reason) => Outcome::Failed(path.to_path_buf(), reason),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("reader panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("reader panicked: {}", message)
    } else {
        "reader panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("A.PDF"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn test_missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_inputs(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_output_path_uses_stem() {
        let path = output_path(Path::new("in/report.v2.PDF"), Path::new("out"));
        assert_eq!(path, Path::new("out").join("report.v2.json"));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "reader panicked: boom");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "reader panicked");
    }
}
