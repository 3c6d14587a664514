//! File I/O operations for Game of Life grids
//!
//! Two formats are supported:
//! - JSON save documents ([`GridDocument`]) carrying the grid plus its display
//!   metadata, used for save/load of a running session.
//! - Plain-text patterns, one row per line with one digit per cell.

use super::Grid;
use crate::config::DisplayConfig;
use crate::error::GridError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialized form of a grid and the display metadata saved alongside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    pub width: i64,
    pub height: i64,
    pub cell_width: f32,
    pub cell_height: f32,
    pub line_width: f32,
    #[serde(default)]
    pub color_map: BTreeMap<u32, String>,
    /// Cell values as rows, `cells[y][x]`
    pub cells: Vec<Vec<u32>>,
}

impl GridDocument {
    pub fn from_grid(grid: &Grid, display: &DisplayConfig) -> Self {
        Self {
            width: grid.width() as i64,
            height: grid.height() as i64,
            cell_width: display.cell_width,
            cell_height: display.cell_height,
            line_width: display.line_width,
            color_map: display.color_map.clone(),
            cells: grid.rows(),
        }
    }

    /// Rebuild the grid, checking the matrix against the declared dimensions
    pub fn to_grid(&self) -> Result<Grid, GridError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GridError::malformed(format!(
                "declared dimensions {}x{} must be positive",
                self.width, self.height
            )));
        }

        if self.cells.len() as i64 != self.height {
            return Err(GridError::malformed(format!(
                "declared height {} but found {} rows",
                self.height,
                self.cells.len()
            )));
        }

        if let Some((y, row)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() as i64 != self.width)
        {
            return Err(GridError::malformed(format!(
                "declared width {} but row {} has {} cells",
                self.width,
                y,
                row.len()
            )));
        }

        Grid::from_rows(self.cells.clone())
    }

    /// Display metadata carried by this document
    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            line_width: self.line_width,
            color_map: self.color_map.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Save a grid and its display metadata as a JSON document
pub fn save_grid_to_file<P: AsRef<Path>>(
    grid: &Grid,
    display: &DisplayConfig,
    path: P,
) -> Result<()> {
    let content = GridDocument::from_grid(grid, display)
        .to_json()
        .context("Failed to serialize grid")?;

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Read a JSON save document without building the grid
pub fn load_document_from_file<P: AsRef<Path>>(path: P) -> Result<GridDocument> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    GridDocument::from_json(&content)
        .with_context(|| format!("Failed to parse grid file: {}", path.as_ref().display()))
}

/// Load a grid from a JSON save document
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let document = load_document_from_file(&path)?;
    let grid = document
        .to_grid()
        .with_context(|| format!("Invalid grid in file: {}", path.as_ref().display()))?;
    Ok(grid)
}

/// Load a plain-text pattern file
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pattern file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse pattern from file: {}", path.as_ref().display()))
}

/// Parse a grid from a string representation
/// Format: each line is a row, each character a digit cell value (`0` is dead)
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Pattern is empty or contains no valid rows");
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (col_idx, ch) in line.chars().enumerate() {
            match ch.to_digit(10) {
                Some(value) => row.push(value),
                None => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only digits are allowed",
                    ch,
                    col_idx,
                    row_idx
                ),
            }
        }
        rows.push(row);
    }

    Ok(Grid::from_rows(rows)?)
}

/// Convert a grid to its plain-text representation
///
/// Values above 9 are written as `1` since the format has one digit per cell.
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.height() * (grid.width() + 1));

    for row in grid.cells().chunks(grid.width()) {
        for &cell in row {
            let digit = if cell > 9 { 1 } else { cell };
            result.push(char::from_digit(digit, 10).unwrap_or('1'));
        }
        result.push('\n');
    }

    result
}

/// Write example pattern files
pub fn create_example_grids<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let patterns = [
        ("glider.txt", "00100\n10100\n01100\n00000\n00000\n"),
        ("blinker.txt", "000\n111\n000\n"),
        ("block.txt", "0000\n0110\n0110\n0000\n"),
        ("beacon.txt", "110000\n110000\n001100\n001100\n"),
    ];

    for (name, content) in patterns {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write {}", name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_grid() -> Grid {
        Grid::from_rows(vec![
            vec![1, 0, 1, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 3, 1],
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_grid_from_string() {
        let grid = parse_grid_from_string("010\n101\n010\n").unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.living_count(), 4);
        assert_eq!(grid.get(1, 0), 1);
        assert_eq!(grid.get(0, 1), 1);
        assert_eq!(grid.get(2, 1), 1);
        assert_eq!(grid.get(1, 2), 1);
    }

    #[test]
    fn test_text_round_trip() {
        let original_content = "0102\n1010\n0100\n";
        let grid = parse_grid_from_string(original_content).unwrap();
        assert_eq!(grid.get(3, 0), 2);
        assert_eq!(grid_to_string(&grid), original_content);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(parse_grid_from_string("010\n1X1\n010\n").is_err());
        assert!(parse_grid_from_string("010\n11\n010\n").is_err());
        assert!(parse_grid_from_string("").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("saves/session.json");
        let original = sample_grid();

        save_grid_to_file(&original, &DisplayConfig::default(), &file_path).unwrap();
        let loaded = load_grid_from_file(&file_path).unwrap();

        assert_eq!(loaded.width(), original.width());
        assert_eq!(loaded.height(), original.height());
        assert_eq!(loaded, original);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(loaded.get(x, y), original.get(x, y));
            }
        }
    }

    #[test]
    fn test_document_keeps_display_metadata() {
        let mut display = DisplayConfig::default();
        display.cell_width = 8.0;
        display.color_map.insert(3, "#ff00ff".to_string());

        let document = GridDocument::from_grid(&sample_grid(), &display);
        let json = document.to_json().unwrap();
        let parsed = GridDocument::from_json(&json).unwrap();

        assert_eq!(parsed, document);
        assert_eq!(parsed.display_config(), display);
    }

    #[test]
    fn test_mismatched_shape_rejected() {
        let mut document = GridDocument::from_grid(&sample_grid(), &DisplayConfig::default());
        document.width = 5;
        assert!(matches!(
            document.to_grid(),
            Err(GridError::MalformedGridData(_))
        ));

        let mut document = GridDocument::from_grid(&sample_grid(), &DisplayConfig::default());
        document.cells.pop();
        assert!(matches!(
            document.to_grid(),
            Err(GridError::MalformedGridData(_))
        ));

        let mut document = GridDocument::from_grid(&sample_grid(), &DisplayConfig::default());
        document.cells[1].push(0);
        assert!(document.to_grid().is_err());
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        let json = r#"{"width": -2, "height": 1, "cell_width": 16.0, "cell_height": 16.0,
            "line_width": 2.0, "cells": [[0, 0]]}"#;
        let document = GridDocument::from_json(json).unwrap();
        assert!(matches!(
            document.to_grid(),
            Err(GridError::MalformedGridData(_))
        ));

        let json = r#"{"width": 0, "height": 0, "cell_width": 16.0, "cell_height": 16.0,
            "line_width": 2.0, "cells": []}"#;
        let document = GridDocument::from_json(json).unwrap();
        assert!(document.to_grid().is_err());
    }

    #[test]
    fn test_create_example_grids() {
        let temp_dir = tempdir().unwrap();
        create_example_grids(temp_dir.path()).unwrap();

        for name in ["glider.txt", "blinker.txt", "block.txt", "beacon.txt"] {
            assert!(temp_dir.path().join(name).exists());
        }

        let glider = load_pattern_from_file(temp_dir.path().join("glider.txt")).unwrap();
        assert_eq!(glider.width(), 5);
        assert_eq!(glider.height(), 5);
        assert_eq!(glider.living_count(), 5);
    }
}
