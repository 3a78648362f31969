//! The coordinate-compressed reactor: build the boundary tables once,
//! overwrite grid cells step by step, then add up the volume of the
//! cells left on.
use tracing::{event, span, Level};

use crate::command::Command;
use crate::compress::CompressedAxes;
use crate::error::RebootError;
use crate::grid::VolumeGrid;
use crate::CubeFlipper;

/// Set every cell covered by `command` to its new state.  Later steps
/// simply overwrite earlier ones.  `command` must be one of the steps
/// `axes` was built from.
pub fn apply_one(
    grid: &mut VolumeGrid,
    axes: &CompressedAxes,
    command: &Command,
) -> Result<(), RebootError> {
    match axes.span(command)? {
        Some((xs, ys, zs)) => {
            event!(
                Level::TRACE,
                "{}: cells {:?} x {:?} x {:?}",
                command,
                xs,
                ys,
                zs,
            );
            grid.fill(xs, ys, zs, command.turn_on);
        }
        None => {
            event!(Level::TRACE, "{} covers no cells", command);
        }
    }
    Ok(())
}

/// Apply the steps in order.
pub fn apply(
    grid: &mut VolumeGrid,
    axes: &CompressedAxes,
    commands: &[Command],
) -> Result<(), RebootError> {
    for command in commands {
        apply_one(grid, axes, command)?;
    }
    Ok(())
}

/// The total number of raw cubes in the cells which are on.
pub fn aggregate(grid: &VolumeGrid, axes: &CompressedAxes) -> Result<u64, RebootError> {
    let mut total: u128 = 0;
    for (pos, on) in grid.cells() {
        if on {
            total = total
                .checked_add(axes.cell_volume(pos)?)
                .ok_or(RebootError::ArithmeticOverflow)?;
        }
    }
    u64::try_from(total).map_err(|_| RebootError::ArithmeticOverflow)
}

pub struct CompressedReactor {
    axes: CompressedAxes,
    grid: VolumeGrid,
    // The first step we were given but could not map onto the grid.
    rejected: Option<RebootError>,
}

impl CompressedReactor {
    /// Prepare a reactor for exactly this list of steps.  Any other
    /// step passed to `obey` is ignored and makes `count_cubes_on` fail.
    pub fn new(commands: &[Command], max_cells: usize) -> Result<CompressedReactor, RebootError> {
        let axes = CompressedAxes::build(commands)?;
        let grid = VolumeGrid::new(&axes, max_cells)?;
        Ok(CompressedReactor {
            axes,
            grid,
            rejected: None,
        })
    }

    pub fn axes(&self) -> &CompressedAxes {
        &self.axes
    }

    pub fn grid(&self) -> &VolumeGrid {
        &self.grid
    }
}

impl CubeFlipper for CompressedReactor {
    fn obey(&mut self, command: &Command) {
        if let Err(e) = apply_one(&mut self.grid, &self.axes, command) {
            event!(Level::WARN, "ignoring {}: {}", command, e);
            if self.rejected.is_none() {
                self.rejected = Some(e);
            }
        }
    }

    fn count_cubes_on(&self) -> Result<u64, RebootError> {
        match &self.rejected {
            Some(e) => Err(e.clone()),
            None => aggregate(&self.grid, &self.axes),
        }
    }
}

pub fn count_on(commands: &[Command], max_cells: usize) -> Result<u64, RebootError> {
    let span = span!(Level::DEBUG, "compressed reboot", steps = commands.len());
    let _enter = span.enter();
    let mut reactor = CompressedReactor::new(commands, max_cells)?;
    apply(&mut reactor.grid, &reactor.axes, commands)?;
    reactor.count_cubes_on()
}

#[cfg(test)]
use crate::config::DEFAULT_MAX_GRID_CELLS;
#[cfg(test)]
use crate::parse::parse_commands;
#[cfg(test)]
use crate::range::{AxisRange, Cuboid};
#[cfg(test)]
use crate::testing::{scattered_commands, SAMPLE_OVERLAP, SAMPLE_SINGLE};

#[cfg(test)]
fn count(commands: &[Command]) -> u64 {
    count_on(commands, DEFAULT_MAX_GRID_CELLS).expect("sample should be countable")
}

#[test]
fn test_single_command() {
    let commands = parse_commands(SAMPLE_SINGLE).unwrap();
    assert_eq!(count(&commands), 27);
}

#[test]
fn test_overlapping_sample() {
    let commands = parse_commands(SAMPLE_OVERLAP).unwrap();
    assert_eq!(count(&commands), 39);
}

#[test]
fn test_empty_input() {
    assert_eq!(
        count_on(&[], DEFAULT_MAX_GRID_CELLS),
        Err(RebootError::EmptyCommandList)
    );
}

#[test]
fn test_repeated_command_is_idempotent() {
    let commands = parse_commands(SAMPLE_OVERLAP).unwrap();
    let mut doubled: Vec<Command> = Vec::new();
    for c in &commands {
        doubled.push(*c);
        doubled.push(*c);
    }
    let mut once = CompressedReactor::new(&doubled, DEFAULT_MAX_GRID_CELLS).unwrap();
    let mut twice = CompressedReactor::new(&doubled, DEFAULT_MAX_GRID_CELLS).unwrap();
    for c in &commands {
        once.obey(c);
        twice.obey(c);
        twice.obey(c);
        assert_eq!(
            once.grid().cells().collect::<Vec<_>>(),
            twice.grid().cells().collect::<Vec<_>>()
        );
    }
    assert_eq!(count(&doubled), 39);
}

#[test]
fn test_last_step_wins() {
    let a = Command::on(Cuboid::cube(0, 9).unwrap());
    let b = Command::off(Cuboid::cube(5, 14).unwrap());
    // The 5..9 cube in the middle is 125 cubes.
    assert_eq!(count(&[a, b]), 1000 - 125);
    assert_eq!(count(&[b, a]), 1000);
    assert_ne!(count(&[a, b]), count(&[b, a]));

    let c = Command::on(Cuboid::cube(5, 14).unwrap());
    assert_eq!(count(&[a, c]), count(&[c, a]));
}

#[test]
fn test_disjoint_steps_commute() {
    let a = Command::on(Cuboid::cube(0, 9).unwrap());
    let b = Command::off(Cuboid::cube(10, 14).unwrap());
    let c = Command::on(Cuboid::new(
        AxisRange::new(-100, -1).unwrap(),
        AxisRange::new(0, 0).unwrap(),
        AxisRange::new(3, 7).unwrap(),
    ));
    assert_eq!(count(&[a, b, c]), 1000 + 500);
    assert_eq!(count(&[c, b, a]), 1000 + 500);
    assert_eq!(count(&[b, a, c]), 1000 + 500);
}

#[test]
fn test_cell_volumes_fill_bounding_box() {
    let commands = scattered_commands(7, 25, 100_000, 40_000);
    let axes = CompressedAxes::build(&commands).unwrap();
    let grid = VolumeGrid::new(&axes, DEFAULT_MAX_GRID_CELLS).unwrap();
    let mut total: u128 = 0;
    for (pos, _) in grid.cells() {
        total += axes.cell_volume(pos).unwrap();
    }

    let lowest = |f: fn(&Command) -> AxisRange| commands.iter().map(|c| f(c).from).min().unwrap();
    let highest = |f: fn(&Command) -> AxisRange| commands.iter().map(|c| f(c).to).max().unwrap();
    let bounds = Cuboid::new(
        AxisRange::new(lowest(|c| c.x), highest(|c| c.x)).unwrap(),
        AxisRange::new(lowest(|c| c.y), highest(|c| c.y)).unwrap(),
        AxisRange::new(lowest(|c| c.z), highest(|c| c.z)).unwrap(),
    );
    assert_eq!(total, bounds.count_points().unwrap());
}

#[test]
fn test_compressed_grid_stays_small() {
    let n = 40;
    let commands = scattered_commands(22, n, 100_000, 60_000);
    let reactor = CompressedReactor::new(&commands, DEFAULT_MAX_GRID_CELLS).unwrap();
    let (nx, ny, nz) = reactor.axes().shape();
    assert!(nx < 2 * n && ny < 2 * n && nz < 2 * n);
}

#[test]
fn test_step_from_elsewhere_is_rejected() {
    let built_for = Command::on(Cuboid::cube(0, 9).unwrap());
    let stranger = Command::off(Cuboid::cube(3, 4).unwrap());
    let mut reactor = CompressedReactor::new(&[built_for], DEFAULT_MAX_GRID_CELLS).unwrap();
    reactor.obey(&built_for);
    assert_eq!(reactor.count_cubes_on(), Ok(1000));
    reactor.obey(&stranger);
    assert_eq!(
        reactor.count_cubes_on(),
        Err(RebootError::UnknownStep {
            step: "off x=3..4,y=3..4,z=3..4".to_string()
        })
    );
    // The grid itself was left alone.
    assert_eq!(aggregate(reactor.grid(), reactor.axes()), Ok(1000));

    let axes = CompressedAxes::build(&[built_for]).unwrap();
    let mut grid = VolumeGrid::new(&axes, DEFAULT_MAX_GRID_CELLS).unwrap();
    assert!(matches!(
        apply(&mut grid, &axes, &[built_for, stranger]),
        Err(RebootError::UnknownStep { .. })
    ));
}

#[test]
fn test_overflow_is_reported() {
    let everything = Command::on(Cuboid::cube(i64::MIN, i64::MAX).unwrap());
    assert_eq!(
        count_on(&[everything], DEFAULT_MAX_GRID_CELLS),
        Err(RebootError::ArithmeticOverflow)
    );

    // 2^63 cubes, one cell: fits in a u64.
    let huge = Command::on(Cuboid::new(
        AxisRange::new(0, (1 << 31) - 1).unwrap(),
        AxisRange::new(0, (1 << 31) - 1).unwrap(),
        AxisRange::new(0, 1).unwrap(),
    ));
    assert_eq!(count(&[huge]), 1 << 63);
}
