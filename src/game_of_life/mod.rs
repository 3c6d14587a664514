//! Game of Life core functionality

pub mod grid;
pub mod rules;
pub mod io;

pub use grid::{Grid, ALIVE, DEAD};
pub use rules::Rules;
pub use io::{
    create_example_grids, load_grid_from_file, load_pattern_from_file, save_grid_to_file,
    GridDocument,
};
