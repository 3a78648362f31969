use std::io;
use std::io::prelude::*;

use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use reactor::parse::parse_commands;
use reactor::{count_in_region, initialization_region, reboot, Command, RebootConfig};

fn part1(commands: &[Command], config: &RebootConfig) -> Result<(), String> {
    let count =
        count_in_region(commands, &initialization_region(), config).map_err(|e| e.to_string())?;
    println!("Day 22 part 1: {} cubes are on", count);
    Ok(())
}

fn part2(commands: &[Command], config: &RebootConfig) -> Result<(), String> {
    let count = reboot(commands, config).map_err(|e| e.to_string())?;
    println!("Day 22 part 2: {} cubes are on", count);
    Ok(())
}

fn run() -> Result<(), String> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = RebootConfig::from_env().map_err(|e| e.to_string())?;
    event!(
        Level::DEBUG,
        "strategy {}, at most {} grid cells",
        config.strategy,
        config.max_grid_cells
    );

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("failed to read input: {}", e))?;
    let commands = parse_commands(&input).map_err(|e| e.to_string())?;
    event!(Level::INFO, "read {} reboot steps", commands.len());

    part1(&commands, &config)?;
    part2(&commands, &config)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
