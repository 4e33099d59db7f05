use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use log::{error, info, warn};

use gridworld::config::Config;
use gridworld::{Color, GridError, Runner, Scenario, World};

/// Run a GridWorld demo in the terminal.
#[derive(Parser, Debug)]
#[command(name = "gridworld", version)]
struct Cli {
    /// Configuration file [default: gridworld.toml]
    #[arg(long)]
    config: Option<String>,
    /// Demo layout
    #[arg(long, value_enum)]
    scenario: Option<Scenario>,
    #[arg(long)]
    rows: Option<i32>,
    #[arg(long)]
    cols: Option<i32>,
    /// Use an unbounded grid
    #[arg(long)]
    unbounded: bool,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Steps to run
    #[arg(long)]
    steps: Option<u64>,
    /// Milliseconds between steps
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Color for uncolored flowers, a palette name or #rrggbb
    #[arg(long)]
    flower_color: Option<Color>,
}

impl Cli {
    /// Command-line flags win over file values.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(scenario) = self.scenario {
            config.scenario = scenario;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        config.unbounded |= self.unbounded;
        config.seed = self.seed.or(config.seed);
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(delay) = self.delay_ms {
            config.step_delay_ms = delay;
        }
        if let Some(color) = self.flower_color {
            config.flower_color = color;
        }
        config
    }
}

fn run(config: &Config) -> Result<(), GridError> {
    let mut world = World::with_grid(config.grid_shape(), config.seed)?;
    config.scenario.populate_with(&mut world, config.flower_color)?;
    info!("{:?} scenario on a {}", config.scenario, world.grid().name());
    println!("{}", world.display_message());
    print!("{}", world);
    if config.steps == 0 {
        return Ok(());
    }

    let repaints = world.subscribe();
    let world = Arc::new(Mutex::new(world));
    let runner = Runner::start(Arc::clone(&world), config.step_delay(), Some(config.steps));
    runner.follow(&repaints, |generation| {
        if let Ok(world) = world.lock() {
            println!("generation {}", generation);
            print!("{}", world);
        }
    });
    let steps = runner.join();
    if steps < config.steps {
        warn!("run ended after {} of {} steps", steps, config.steps);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.apply(Config::load(cli.config.as_deref()));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("gridworld: {}", e);
            ExitCode::FAILURE
        }
    }
}
