//! Minimal serde model of a Jupyter notebook file.
//!
//! Only the pieces the checks need: the cell list, each cell's type, and its
//! source text. Per nbformat, `source` may arrive either as a single string
//! or as a list of lines.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default)]
    pub source: Source,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl Source {
    /// The cell source as one string, lines concatenated in order.
    pub fn joined(&self) -> String {
        match self {
            Source::Text(s) => s.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }
}

impl Notebook {
    /// Parses the notebook JSON at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading notebook {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing notebook JSON {}", path.display()))
    }

    /// Source text of every code cell, joined with newlines.
    pub fn code_text(&self) -> String {
        self.cells
            .iter()
            .filter(|c| c.cell_type == "code")
            .map(|c| c.source.joined())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterates over the source text of every markdown cell.
    pub fn markdown_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .iter()
            .filter(|c| c.cell_type == "markdown")
            .map(|c| c.source.joined())
    }
}
