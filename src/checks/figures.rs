//! Figure checks: the four required plots exist, follow the naming scheme,
//! have plausible file sizes, and actually contain drawn content rather than
//! a blank canvas.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::checks::runner::Submission;
use crate::checks::types::CheckOutcome;

const FIGURES_PRESENT: &str = "figures_present";
const FIGURE_NAMING: &str = "figure_naming";
const FIGURE_SIZES: &str = "figure_sizes";
const FIGURE_CONTENT: &str = "figure_content";

/// A plausible figure is strictly between these sizes; anything at or under
/// the floor is in practice an empty canvas.
const MIN_FIGURE_BYTES: u64 = 10_000;
const MAX_FIGURE_BYTES: u64 = 5_000_000;

/// A mostly-white image has a normalized mean pixel value above this.
const BLANK_PIXEL_MEAN: f64 = 0.96;

/// Smallest acceptable figure edge, in pixels.
const MIN_FIGURE_EDGE: u32 = 100;

/// Only this many figures are decoded for the content check, to keep a run
/// over a large cohort cheap.
const CONTENT_SAMPLE: usize = 2;

pub fn checks(submission: &Submission) -> Vec<CheckOutcome> {
    let dir = submission.figures_dir();
    if !dir.is_dir() {
        let reason = "figures/ directory not found".to_string();
        return vec![
            CheckOutcome::skipped(FIGURES_PRESENT, reason.clone()),
            CheckOutcome::skipped(FIGURE_NAMING, reason.clone()),
            CheckOutcome::skipped(FIGURE_SIZES, reason.clone()),
            CheckOutcome::skipped(FIGURE_CONTENT, reason),
        ];
    }

    let figures = match figure_files(&dir, submission) {
        Ok(figures) => figures,
        Err(e) => {
            let message = format!("{e:#}");
            return vec![
                CheckOutcome::failed(FIGURES_PRESENT, message.clone()),
                CheckOutcome::failed(FIGURE_NAMING, message.clone()),
                CheckOutcome::failed(FIGURE_SIZES, message.clone()),
                CheckOutcome::failed(FIGURE_CONTENT, message),
            ];
        }
    };

    vec![
        all_present(submission, &figures),
        naming(submission, &figures),
        sizes(&figures),
        content(&figures),
    ]
}

/// All figure files in `dir` matching `<prefix>*-<tag>.png`, sorted by name.
fn figure_files(dir: &Path, submission: &Submission) -> Result<Vec<PathBuf>> {
    let prefix = &submission.config.figure_prefix;
    let suffix = format!("-{}.png", submission.config.figure_tag);

    let mut figures = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let file_name = entry.file_name();
        if let Some(name) = file_name.to_str() {
            if name.starts_with(prefix.as_str()) && name.ends_with(&suffix) {
                figures.push(entry.path());
            }
        }
    }
    figures.sort();
    Ok(figures)
}

/// Each required figure number has a matching file, and none of them still
/// carries the `YourName` template name.
fn all_present(submission: &Submission, figures: &[PathBuf]) -> CheckOutcome {
    let config = &submission.config;

    for n in 1..=config.figure_count {
        let number_prefix = format!("{}{n}-", config.figure_prefix);
        let matching: Vec<_> = figures
            .iter()
            .filter(|p| file_name(p).starts_with(&number_prefix))
            .collect();

        if matching.is_empty() {
            return CheckOutcome::failed(
                FIGURES_PRESENT,
                format!(
                    "required figure not found: {number_prefix}*-{}.png",
                    config.figure_tag
                ),
            );
        }
        if let Some(template) = matching.iter().find(|p| file_name(p).contains("YourName")) {
            return CheckOutcome::failed(
                FIGURES_PRESENT,
                format!("figure name not personalized: {}", file_name(template)),
            );
        }
    }

    CheckOutcome::passed(FIGURES_PRESENT)
}

/// Every matching figure name splits as `<prefix><1..N>-<Name>-<Tag>`.
fn naming(submission: &Submission, figures: &[PathBuf]) -> CheckOutcome {
    let config = &submission.config;

    for path in figures {
        let name = file_name(path);
        let stem = name.strip_suffix(".png").unwrap_or(name);
        let parts: Vec<&str> = stem.split('-').collect();

        let valid = parts.len() >= 3
            && parts[0].starts_with(config.figure_prefix.as_str())
            && parts[0]
                .strip_prefix(config.figure_prefix.as_str())
                .and_then(|digits| digits.parse::<usize>().ok())
                .is_some_and(|n| (1..=config.figure_count).contains(&n))
            && !parts[1].is_empty()
            && *parts.last().unwrap() == config.figure_tag;

        if !valid {
            return CheckOutcome::failed(
                FIGURE_NAMING,
                format!("figure name format incorrect: {name}"),
            );
        }
    }

    CheckOutcome::passed(FIGURE_NAMING)
}

/// Figure files are neither suspiciously small nor absurdly large.
fn sizes(figures: &[PathBuf]) -> CheckOutcome {
    for path in figures {
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                return CheckOutcome::failed(
                    FIGURE_SIZES,
                    format!("could not stat {}: {e}", file_name(path)),
                );
            }
        };

        if size <= MIN_FIGURE_BYTES {
            return CheckOutcome::failed(
                FIGURE_SIZES,
                format!("figure file too small (likely empty): {} ({size} bytes)", file_name(path)),
            );
        }
        if size >= MAX_FIGURE_BYTES {
            return CheckOutcome::failed(
                FIGURE_SIZES,
                format!("figure file too large: {} ({size} bytes)", file_name(path)),
            );
        }
    }

    CheckOutcome::passed(FIGURE_SIZES)
}

/// The first figures decode as PNG, exceed the minimum dimensions, and are
/// not a blank white canvas. With nothing to decode there is nothing to
/// assert, so an empty set skips rather than passes.
fn content(figures: &[PathBuf]) -> CheckOutcome {
    if figures.is_empty() {
        return CheckOutcome::skipped(FIGURE_CONTENT, "no figures found");
    }

    for path in figures.iter().take(CONTENT_SAMPLE) {
        let (width, height, mean) = match decode_stats(path) {
            Ok(stats) => stats,
            Err(e) => {
                return CheckOutcome::failed(
                    FIGURE_CONTENT,
                    format!("could not decode {}: {e:#}", file_name(path)),
                );
            }
        };

        if width <= MIN_FIGURE_EDGE || height <= MIN_FIGURE_EDGE {
            return CheckOutcome::failed(
                FIGURE_CONTENT,
                format!("figure too small: {} ({width}x{height} px)", file_name(path)),
            );
        }
        if mean >= BLANK_PIXEL_MEAN {
            return CheckOutcome::failed(
                FIGURE_CONTENT,
                format!(
                    "figure appears to be mostly empty/white: {} (mean pixel {mean:.4})",
                    file_name(path)
                ),
            );
        }
    }

    CheckOutcome::passed(FIGURE_CONTENT)
}

/// Decodes a PNG and returns (width, height, normalized mean sample value).
fn decode_stats(path: &Path) -> Result<(u32, u32, f64)> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let decoder = png::Decoder::new(file);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let data = &buf[..frame.buffer_size()];

    let mean = if data.is_empty() {
        1.0
    } else {
        data.iter().map(|&b| b as f64).sum::<f64>() / (data.len() as f64 * 255.0)
    };

    Ok((frame.width, frame.height, mean))
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}
