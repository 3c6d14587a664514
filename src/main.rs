//! Headless command line driver for the Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use game_of_life_sim::{
    config::{CliOverrides, DisplayConfig, Settings},
    controls::SpeedSlider,
    game_of_life::{
        create_example_grids, io::load_document_from_file, load_pattern_from_file,
        save_grid_to_file, Grid,
    },
    run_generations,
    simulation::{GridEvent, SimulationEngine},
    utils::{ColorOutput, GridFormatter, ProgressIndicator},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "game_of_life_sim")]
#[command(about = "Toroidal Game of Life simulator")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the background simulation for a number of generations
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Grid width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Grid height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Text pattern to stamp into the centre of a blank grid
        #[arg(short, long, conflicts_with = "load")]
        pattern: Option<PathBuf>,

        /// JSON save to start from
        #[arg(short, long)]
        load: Option<PathBuf>,

        /// Generations to run before stopping
        #[arg(short, long, default_value_t = 100)]
        generations: u64,

        /// Speed slider position, 1 to 10 (10 runs without delay)
        #[arg(short, long)]
        speed: Option<f32>,

        /// Base delay between generations in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Save the final generation to this JSON file (relative to the output directory)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Directory for saves (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Step a saved grid synchronously and write it back
    Step {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// JSON save to read
        #[arg(short, long)]
        input: PathBuf,

        /// Number of generations
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Where to write the result (defaults to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a blank saved grid
    New {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Grid width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Grid height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// JSON file to create (relative to the output directory)
        #[arg(short, long)]
        output: PathBuf,

        /// Directory for saves (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a saved grid with statistics
    Show {
        /// JSON save to read
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = execute(cli.command) {
        eprintln!("{}", ColorOutput::error(&format!("❌ {:#}", err)));
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config,
            width,
            height,
            pattern,
            load,
            generations,
            speed,
            delay_ms,
            save,
            output_dir,
        } => {
            let overrides = CliOverrides {
                width,
                height,
                delay_ms,
                speed: speed.map(SpeedSlider::new),
                output_dir,
            };
            run_command(config, overrides, pattern, load, generations, save)
        }
        Commands::Step {
            config,
            input,
            count,
            output,
        } => step_command(config, input, count, output),
        Commands::New {
            config,
            width,
            height,
            output,
            output_dir,
        } => {
            let overrides = CliOverrides {
                width,
                height,
                output_dir,
                ..Default::default()
            };
            new_command(config, overrides, output)
        }
        Commands::Show { input } => show_command(input),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        let message = format!(
            "Config file {} not found, using defaults",
            config_path.display()
        );
        println!("{}", ColorOutput::warning(&message));
        Ok(Settings::default())
    }
}

fn run_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    pattern: Option<PathBuf>,
    load: Option<PathBuf>,
    generations: u64,
    save: Option<PathBuf>,
) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let (grid, display) = initial_grid(&settings, pattern, load)?;
    let message = format!(
        "▶ Running {}x{} grid for {} generations (step delay {:?})",
        grid.width(),
        grid.height(),
        generations,
        settings.speed.step_delay()
    );
    println!("{}", ColorOutput::info(&message));

    let engine = SimulationEngine::new(grid, settings.simulation_config());
    let events = engine.subscribe();
    let timeout = engine.speed().step_delay() + Duration::from_secs(5);
    let start_time = Instant::now();

    if generations > 0 {
        let mut progress = ProgressIndicator::new(generations as usize);
        engine.start();
        loop {
            let event = events
                .recv_timeout(timeout)
                .context("Simulation stopped producing generations")?;
            if let GridEvent::Stepped { generation } = event {
                progress.update(generation as usize);
                if generation >= generations {
                    break;
                }
            }
        }
        engine.stop();
        progress.update(generations as usize);
        progress.finish();
    }

    let snapshot = engine.snapshot();
    engine.shutdown();

    println!("{}", GridFormatter::format_grid_compact(&snapshot.grid));
    println!("{}", GridFormatter::format_statistics(&snapshot));
    let message = format!("✅ Finished in {:.3}s", start_time.elapsed().as_secs_f64());
    println!("{}", ColorOutput::success(&message));

    if let Some(path) = save {
        let path = settings.resolve_output_path(&path);
        save_grid_to_file(&snapshot.grid, &display, &path)
            .with_context(|| format!("Failed to save grid to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

fn initial_grid(
    settings: &Settings,
    pattern: Option<PathBuf>,
    load: Option<PathBuf>,
) -> Result<(Grid, DisplayConfig)> {
    if let Some(path) = load {
        let document = load_document_from_file(&path)?;
        let grid = document
            .to_grid()
            .with_context(|| format!("Invalid grid in {}", path.display()))?;
        return Ok((grid, document.display_config()));
    }

    let mut grid = Grid::new(settings.grid.width, settings.grid.height)?;
    if let Some(path) = pattern {
        let pattern = load_pattern_from_file(&path)?;
        let x = (grid.width() as i64 - pattern.width() as i64) / 2;
        let y = (grid.height() as i64 - pattern.height() as i64) / 2;
        grid.stamp(&pattern, x, y);
    }
    Ok((grid, settings.display.clone()))
}

fn step_command(
    config_path: PathBuf,
    input: PathBuf,
    count: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(&config_path)?;
    let document = load_document_from_file(&input)?;
    let grid = document
        .to_grid()
        .with_context(|| format!("Invalid grid in {}", input.display()))?;

    let evolved = run_generations(&settings, grid, count)?;

    let output = output.unwrap_or(input);
    save_grid_to_file(&evolved, &document.display_config(), &output)?;
    let message = format!(
        "Stepped {} generation(s), saved to {}",
        count,
        output.display()
    );
    println!("{}", ColorOutput::success(&message));
    Ok(())
}

fn new_command(config_path: PathBuf, overrides: CliOverrides, output: PathBuf) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);

    let grid = Grid::new(settings.grid.width, settings.grid.height)?;
    let output = settings.resolve_output_path(&output);
    save_grid_to_file(&grid, &settings.display, &output)?;
    println!(
        "Created {}x{} grid: {}",
        grid.width(),
        grid.height(),
        output.display()
    );
    Ok(())
}

fn show_command(input: PathBuf) -> Result<()> {
    let document = load_document_from_file(&input)?;
    let grid = document
        .to_grid()
        .with_context(|| format!("Invalid grid in {}", input.display()))?;

    println!("Grid ({}x{}):", grid.width(), grid.height());
    println!("{}", GridFormatter::format_grid_with_coords(&grid));
    println!("Living cells: {}", grid.living_count());
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("input/patterns");
    let output_dir = directory.join("output/saves");

    for dir in [&config_dir, &pattern_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_grids(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: cargo run -- run --pattern input/patterns/glider.txt --speed 10");

    Ok(())
}
