//! Display and output formatting utilities

use crate::game_of_life::{Grid, DEAD};
use crate::simulation::Snapshot;
use itertools::Itertools;

/// Format grids for console output
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::new();
        for row in grid.cells().chunks(grid.width()) {
            for &cell in row {
                output.push(Self::symbol(cell));
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        output.push_str(
            &(0..grid.width())
                .map(|x| format!("{:2}", x % 10))
                .join(""),
        );
        output.push('\n');

        // Rows with row numbers
        for (y, row) in grid.cells().chunks(grid.width()).enumerate() {
            output.push_str(&format!("{:2} ", y));
            for &cell in row {
                let symbol = Self::symbol(cell);
                output.push(symbol);
                output.push(symbol);
            }
            output.push('\n');
        }

        output
    }

    /// One-line statistics for a published generation
    pub fn format_statistics(snapshot: &Snapshot) -> String {
        let grid = &snapshot.grid;
        let total = grid.width() * grid.height();
        let living = grid.living_count();
        format!(
            "Generation {} | {}x{} | Living cells: {} | Density: {:.1}%",
            snapshot.generation,
            grid.width(),
            grid.height(),
            living,
            living as f64 / total as f64 * 100.0
        )
    }

    fn symbol(cell: u32) -> char {
        match cell {
            DEAD => '·',
            1 => '█',
            // display-only values
            _ => '▓',
        }
    }
}

/// Progress indicator for long-running operations
pub struct ProgressIndicator {
    total: usize,
    current: usize,
    last_update: std::time::Instant,
    start_time: std::time::Instant,
}

impl ProgressIndicator {
    /// Create a new progress indicator
    pub fn new(total: usize) -> Self {
        let now = std::time::Instant::now();
        Self {
            total,
            current: 0,
            last_update: now,
            start_time: now,
        }
    }

    /// Update progress and optionally display
    pub fn update(&mut self, current: usize) {
        self.current = current.min(self.total);
        let now = std::time::Instant::now();

        // Update display every 100ms
        if now.duration_since(self.last_update).as_millis() > 100 {
            self.display();
            self.last_update = now;
        }
    }

    /// Display current progress
    pub fn display(&self) {
        let percentage = if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        };

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.current as f64 / elapsed
        } else {
            0.0
        };

        print!(
            "\rGeneration {}/{} ({:.1}%) - {:.1} gen/s",
            self.current, self.total, percentage, rate
        );
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    /// Finish and clear the progress line
    pub fn finish(&self) {
        println!(
            "\rCompleted: {}/{} generations - Total time: {:.1}s",
            self.current,
            self.total,
            self.start_time.elapsed().as_secs_f64()
        );
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        Grid::from_rows(vec![vec![1, 0, 1], vec![0, 2, 0], vec![1, 0, 1]]).unwrap()
    }

    #[test]
    fn test_grid_formatting() {
        let grid = sample_grid();

        let compact = GridFormatter::format_grid_compact(&grid);
        assert_eq!(compact, "█·█\n·▓·\n█·█\n");

        let with_coords = GridFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 0 ██··██\n"));
        assert!(with_coords.contains(" 1 ··▓▓··\n"));
    }

    #[test]
    fn test_statistics() {
        let snapshot = Snapshot {
            generation: 7,
            grid: sample_grid(),
        };
        assert_eq!(
            GridFormatter::format_statistics(&snapshot),
            "Generation 7 | 3x3 | Living cells: 5 | Density: 55.6%"
        );
    }

    #[test]
    fn test_progress_indicator() {
        let mut progress = ProgressIndicator::new(100);
        progress.update(50);
        assert_eq!(progress.current, 50);
        progress.update(150);
        assert_eq!(progress.current, 100);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
