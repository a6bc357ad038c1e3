// File: ./src/syllabus.rs
// Built-in syllabus text and the optional external-file variant
use crate::model::{Subject, parse};
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Fourth-semester B.Sc. CSIT syllabus, as extracted from the published PDF.
pub const EMBEDDED_SYLLABUS: &str = include_str!("../assets/syllabus.txt");

/// Parses the configured syllabus file, or the embedded text when none is set.
pub fn load_subjects(external: Option<&Path>) -> Result<Vec<Subject>> {
    let subjects = match external {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading syllabus {}", path.display()))?;
            parse(&text)
        }
        None => parse(EMBEDDED_SYLLABUS),
    };
    info!("parsed {} subject(s)", subjects.len());
    Ok(subjects)
}
