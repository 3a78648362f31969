//! Count the cubes left on after a reactor reboot: a sequence of steps,
//! each of which switches every cube inside a cuboid on or off.  Later
//! steps override earlier ones wherever they overlap.
//!
//! Two reactors do the real work.  [`engine::CompressedReactor`]
//! compresses the coordinates mentioned by the steps and keeps one
//! flag per compressed cell; [`tree::IntervalTree`] keeps nested lists
//! of disjoint ranges per axis.  [`dense::DenseReactor`] stores each
//! cube of a small region and is used to check the others.
pub mod command;
pub mod compress;
pub mod config;
pub mod dense;
pub mod engine;
pub mod error;
pub mod grid;
pub mod parse;
pub mod range;
pub mod tree;

#[cfg(test)]
mod testing;

use tracing::{event, Level};

pub use command::Command;
pub use config::{RebootConfig, Strategy};
pub use error::RebootError;
pub use range::{AxisRange, Cuboid};

pub trait CubeFlipper {
    fn obey(&mut self, command: &Command);
    fn count_cubes_on(&self) -> Result<u64, RebootError>;
}

/// Feed every step to `reactor`, in order, and count the result.
pub fn run_all<T: CubeFlipper>(reactor: &mut T, commands: &[Command]) -> Result<u64, RebootError> {
    for command in commands {
        reactor.obey(command);
    }
    reactor.count_cubes_on()
}

/// Count the cubes on after applying `commands` in order.
pub fn reboot(commands: &[Command], config: &RebootConfig) -> Result<u64, RebootError> {
    if commands.is_empty() {
        return Ok(0);
    }
    match config.strategy {
        Strategy::Grid => engine::count_on(commands, config.max_grid_cells),
        Strategy::Tree => tree::count_on(commands),
        Strategy::Auto => match engine::count_on(commands, config.max_grid_cells) {
            Err(RebootError::GridTooLarge { cells, limit }) => {
                event!(
                    Level::INFO,
                    "compressed grid would have {:?} cells (limit {}), using the interval tree instead",
                    cells,
                    limit,
                );
                tree::count_on(commands)
            }
            other => other,
        },
    }
}

/// Count with the default configuration.
pub fn count_cubes_on(commands: &[Command]) -> Result<u64, RebootError> {
    reboot(commands, &RebootConfig::default())
}

/// The region `-50..=50` on every axis, which the reactor initializes
/// before the full reboot.
pub fn initialization_region() -> Cuboid {
    let r = AxisRange { from: -50, to: 50 };
    Cuboid::new(r, r, r)
}

/// The steps restricted to `region`; those missing it are dropped.
pub fn crop_all(commands: &[Command], region: &Cuboid) -> Vec<Command> {
    commands.iter().filter_map(|c| c.crop(region)).collect()
}

/// Count the cubes on inside `region` only.
pub fn count_in_region(
    commands: &[Command],
    region: &Cuboid,
    config: &RebootConfig,
) -> Result<u64, RebootError> {
    reboot(&crop_all(commands, region), config)
}

#[cfg(test)]
use crate::config::DEFAULT_MAX_GRID_CELLS;
#[cfg(test)]
use crate::dense::DenseReactor;
#[cfg(test)]
use crate::parse::parse_commands;
#[cfg(test)]
use crate::testing::{scattered_commands, SAMPLE_FAR, SAMPLE_OVERLAP, SAMPLE_REGION, SAMPLE_SINGLE};

#[cfg(test)]
fn with_strategy(strategy: Strategy) -> RebootConfig {
    RebootConfig {
        strategy,
        ..RebootConfig::default()
    }
}

#[cfg(test)]
const ALL_STRATEGIES: [Strategy; 3] = [Strategy::Grid, Strategy::Tree, Strategy::Auto];

#[test]
fn test_samples_with_every_strategy() {
    let single = parse_commands(SAMPLE_SINGLE).unwrap();
    let overlap = parse_commands(SAMPLE_OVERLAP).unwrap();
    for strategy in ALL_STRATEGIES {
        let config = with_strategy(strategy);
        assert_eq!(reboot(&single, &config), Ok(27), "{}", strategy);
        assert_eq!(reboot(&overlap, &config), Ok(39), "{}", strategy);
        assert_eq!(reboot(&[], &config), Ok(0), "{}", strategy);
    }
    assert_eq!(count_cubes_on(&overlap), Ok(39));
}

#[test]
fn test_reactors_agree_with_brute_force() {
    let commands = parse_commands(SAMPLE_REGION).unwrap();
    assert_eq!(commands.len(), 22);
    let mut dense = DenseReactor::new(initialization_region(), 101 * 101 * 101).unwrap();
    let expected = run_all(&mut dense, &commands).unwrap();
    assert!(expected > 0);
    for strategy in ALL_STRATEGIES {
        assert_eq!(reboot(&commands, &with_strategy(strategy)), Ok(expected), "{}", strategy);
    }
}

#[test]
fn test_initialization_region_ignores_far_steps() {
    let near = parse_commands(SAMPLE_REGION).unwrap();
    let mut all = near.clone();
    all.extend(parse_commands(SAMPLE_FAR).unwrap());

    let mut dense = DenseReactor::new(initialization_region(), 101 * 101 * 101).unwrap();
    let expected = run_all(&mut dense, &all).unwrap();
    let config = RebootConfig::default();
    assert_eq!(count_in_region(&all, &initialization_region(), &config), Ok(expected));
    assert_eq!(crop_all(&all, &initialization_region()).len(), near.len() + 1);
    assert!(count_cubes_on(&all).unwrap() > expected);
}

#[test]
fn test_random_small_inputs_match_brute_force() {
    let region = Cuboid::cube(-20, 20).unwrap();
    for seed in 0..10 {
        let commands = scattered_commands(seed, 30, 20, 15);
        let mut dense = DenseReactor::new(region, DEFAULT_MAX_GRID_CELLS).unwrap();
        let expected = run_all(&mut dense, &commands).unwrap();
        for strategy in ALL_STRATEGIES {
            assert_eq!(
                reboot(&commands, &with_strategy(strategy)),
                Ok(expected),
                "seed {} strategy {}",
                seed,
                strategy
            );
        }
    }
}

#[test]
fn test_large_coordinates() {
    let commands = scattered_commands(2021, 40, 100_000, 60_000);
    let grid = reboot(&commands, &with_strategy(Strategy::Grid)).unwrap();
    let tree = reboot(&commands, &with_strategy(Strategy::Tree)).unwrap();
    assert_eq!(grid, tree);
    assert!(grid > 0);
}

#[test]
fn test_grid_limit_is_enforced() {
    // Around 420 steps would need roughly 840^3 compressed cells, more
    // than the default limit allows, so the grid is never allocated.
    let commands = scattered_commands(99, 420, 100_000, 60_000);
    assert!(matches!(
        reboot(&commands, &with_strategy(Strategy::Grid)),
        Err(RebootError::GridTooLarge { .. })
    ));
}

#[test]
fn test_many_large_steps_with_default_config() {
    let commands = scattered_commands(99, 420, 100_000, 60_000);
    let auto = reboot(&commands, &RebootConfig::default()).unwrap();
    assert!(auto > 0);
    assert_eq!(reboot(&commands, &with_strategy(Strategy::Tree)), Ok(auto));
}

#[test]
fn test_grid_and_tree_agree_on_larger_input() {
    // 150 steps give at most 300 boundaries per axis, which is under
    // the default cell limit.
    let commands = scattered_commands(150, 150, 100_000, 60_000);
    let grid = reboot(&commands, &with_strategy(Strategy::Grid)).unwrap();
    assert!(grid > 0);
    assert_eq!(reboot(&commands, &with_strategy(Strategy::Tree)), Ok(grid));
}

#[test]
fn test_auto_falls_back_to_tree() {
    let overlap = parse_commands(SAMPLE_OVERLAP).unwrap();
    let tight = RebootConfig {
        strategy: Strategy::Grid,
        max_grid_cells: 10,
    };
    assert!(matches!(
        reboot(&overlap, &tight),
        Err(RebootError::GridTooLarge { .. })
    ));
    let auto = RebootConfig {
        strategy: Strategy::Auto,
        ..tight
    };
    assert_eq!(reboot(&overlap, &auto), Ok(39));
}

#[test]
fn test_order_matters() {
    let a = Command::on(Cuboid::cube(0, 9).unwrap());
    let b = Command::off(Cuboid::cube(5, 14).unwrap());
    for strategy in ALL_STRATEGIES {
        let config = with_strategy(strategy);
        assert_eq!(reboot(&[a, b], &config), Ok(875));
        assert_eq!(reboot(&[b, a], &config), Ok(1000));
    }
}
