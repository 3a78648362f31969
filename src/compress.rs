//! Coordinate compression.
//!
//! Every reboot step contributes the coordinates `from` and `to + 1` on
//! each axis.  Between two consecutive such boundaries every cube is
//! treated identically by every step, so a whole slab can be tracked as
//! a single cell.
use std::ops::Range;

use tracing::{event, Level};

use crate::command::Command;
use crate::error::RebootError;
use crate::range::AxisRange;

/// The sorted, distinct boundary coordinates along one axis.
///
/// Cell `i` covers the raw coordinates `boundaries[i]..boundaries[i+1]`.
/// The boundaries are held as `i128` since `to + 1` may not fit in an
/// `i64`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CompressedAxis {
    boundaries: Vec<i128>,
}

impl CompressedAxis {
    pub fn from_ranges<'a, I>(ranges: I) -> CompressedAxis
    where
        I: IntoIterator<Item = &'a AxisRange>,
    {
        let mut boundaries: Vec<i128> = ranges
            .into_iter()
            .filter(|r| !r.is_empty())
            .flat_map(|r| [i128::from(r.from), i128::from(r.to) + 1])
            .collect();
        boundaries.sort_unstable();
        boundaries.dedup();
        CompressedAxis { boundaries }
    }

    pub fn boundaries(&self) -> &[i128] {
        &self.boundaries
    }

    /// The number of cells along this axis.
    pub fn cells(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    /// The index of `coord`, if it is one of our boundaries.
    pub fn index_of(&self, coord: i128) -> Option<usize> {
        self.boundaries.binary_search(&coord).ok()
    }

    /// The cell indexes covered by `range`, or None if either end of
    /// the range is not a boundary (so the axis was not built from it).
    pub fn span(&self, range: &AxisRange) -> Option<Range<usize>> {
        if range.is_empty() {
            return Some(0..0);
        }
        let start = self.index_of(i128::from(range.from))?;
        let end = self.index_of(i128::from(range.to) + 1)?;
        Some(start..end)
    }

    /// The number of raw coordinates in cell `i`.
    pub fn width(&self, i: usize) -> u128 {
        (self.boundaries[i + 1] - self.boundaries[i]) as u128
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CompressedAxes {
    pub x: CompressedAxis,
    pub y: CompressedAxis,
    pub z: CompressedAxis,
}

impl CompressedAxes {
    /// Build the boundary tables for the complete list of steps.  This
    /// has to see every step before any of them is applied.
    pub fn build(commands: &[Command]) -> Result<CompressedAxes, RebootError> {
        if commands.is_empty() {
            return Err(RebootError::EmptyCommandList);
        }
        let axes = CompressedAxes {
            x: CompressedAxis::from_ranges(commands.iter().map(|c| &c.x)),
            y: CompressedAxis::from_ranges(commands.iter().map(|c| &c.y)),
            z: CompressedAxis::from_ranges(commands.iter().map(|c| &c.z)),
        };
        event!(
            Level::DEBUG,
            "compressed {} steps into a {:?} cell grid",
            commands.len(),
            axes.shape(),
        );
        Ok(axes)
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.x.cells(), self.y.cells(), self.z.cells())
    }

    /// Total number of cells, or None if that overflows a usize.
    pub fn cell_count(&self) -> Option<usize> {
        let (nx, ny, nz) = self.shape();
        nx.checked_mul(ny).and_then(|n| n.checked_mul(nz))
    }

    /// The index box covered by a step, or None if it covers no cells.
    /// A step whose endpoints are not all boundaries is an error.
    pub fn span(
        &self,
        command: &Command,
    ) -> Result<Option<(Range<usize>, Range<usize>, Range<usize>)>, RebootError> {
        let unknown = || RebootError::UnknownStep {
            step: command.to_string(),
        };
        let xs = self.x.span(&command.x).ok_or_else(unknown)?;
        let ys = self.y.span(&command.y).ok_or_else(unknown)?;
        let zs = self.z.span(&command.z).ok_or_else(unknown)?;
        if xs.is_empty() || ys.is_empty() || zs.is_empty() {
            Ok(None)
        } else {
            Ok(Some((xs, ys, zs)))
        }
    }

    /// The number of raw cubes inside cell `(i, j, k)`.
    pub fn cell_volume(&self, (i, j, k): (usize, usize, usize)) -> Result<u128, RebootError> {
        self.x
            .width(i)
            .checked_mul(self.y.width(j))
            .and_then(|v| v.checked_mul(self.z.width(k)))
            .ok_or(RebootError::ArithmeticOverflow)
    }
}

#[cfg(test)]
fn r(from: i64, to: i64) -> AxisRange {
    AxisRange { from, to }
}

#[test]
fn test_from_ranges_sorts_and_dedups() {
    let axis = CompressedAxis::from_ranges(&[r(10, 12), r(11, 13), r(9, 11), r(10, 10)]);
    assert_eq!(axis.boundaries(), &[9, 10, 11, 12, 13, 14]);
    assert_eq!(axis.cells(), 5);
}

#[test]
fn test_extreme_boundaries() {
    let axis = CompressedAxis::from_ranges(&[r(i64::MIN, i64::MAX)]);
    assert_eq!(
        axis.boundaries(),
        &[i128::from(i64::MIN), i128::from(i64::MAX) + 1]
    );
    assert_eq!(axis.width(0), 1u128 << 64);
}

#[test]
fn test_span() {
    let axis = CompressedAxis::from_ranges(&[r(10, 12), r(11, 13)]);
    // boundaries: 10 11 13 14
    assert_eq!(axis.span(&r(10, 12)), Some(0..2));
    assert_eq!(axis.span(&r(11, 13)), Some(1..3));
    assert_eq!(axis.width(0), 1);
    assert_eq!(axis.width(1), 2);
    assert_eq!(axis.width(2), 1);
    assert_eq!(axis.span(&r(13, 12)), Some(0..0));
}

#[test]
fn test_unknown_coordinate() {
    let axis = CompressedAxis::from_ranges(&[r(10, 12)]);
    assert_eq!(axis.index_of(10), Some(0));
    assert_eq!(axis.index_of(13), Some(1));
    assert_eq!(axis.index_of(11), None);
    assert_eq!(axis.span(&r(11, 12)), None);
    assert_eq!(axis.span(&r(10, 11)), None);
}

#[test]
fn test_build_empty() {
    assert_eq!(
        CompressedAxes::build(&[]),
        Err(RebootError::EmptyCommandList)
    );
}

#[test]
fn test_build_shape() {
    use crate::range::Cuboid;
    let commands = [
        Command::on(Cuboid::new(r(0, 9), r(0, 0), r(-5, 5))),
        Command::off(Cuboid::new(r(5, 14), r(0, 0), r(0, 0))),
    ];
    let axes = CompressedAxes::build(&commands).unwrap();
    assert_eq!(axes.shape(), (3, 1, 3));
    assert_eq!(axes.cell_count(), Some(9));
    assert_eq!(axes.span(&commands[1]), Ok(Some((1..3, 0..1, 1..2))));
    let foreign = Command::on(Cuboid::new(r(1, 2), r(0, 0), r(0, 0)));
    assert_eq!(
        axes.span(&foreign),
        Err(RebootError::UnknownStep {
            step: "on x=1..2,y=0..0,z=0..0".to_string()
        })
    );
    assert_eq!(axes.cell_volume((0, 0, 0)), Ok(25));
}
