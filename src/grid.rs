use std::ops::Range;

use ndarray::prelude::*;
use tracing::{event, Level};

use crate::compress::CompressedAxes;
use crate::error::RebootError;

/// The on/off state of every compressed cell.
#[derive(Debug, Clone)]
pub struct VolumeGrid {
    cells: Array3<bool>,
}

impl VolumeGrid {
    /// An all-off grid shaped to `axes`, refusing to allocate more
    /// than `max_cells` cells.
    pub fn new(axes: &CompressedAxes, max_cells: usize) -> Result<VolumeGrid, RebootError> {
        match axes.cell_count() {
            Some(n) if n <= max_cells => {
                event!(Level::DEBUG, "allocating a grid of {} cells", n);
                Ok(VolumeGrid {
                    cells: Array3::from_elem(axes.shape(), false),
                })
            }
            cells => Err(RebootError::GridTooLarge {
                cells,
                limit: max_cells,
            }),
        }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.cells.dim()
    }

    #[cfg(test)]
    pub fn get(&self, pos: (usize, usize, usize)) -> bool {
        self.cells[pos]
    }

    /// Overwrite every cell in the index box with `state`.  An empty
    /// box is a no-op.
    pub fn fill(&mut self, xs: Range<usize>, ys: Range<usize>, zs: Range<usize>, state: bool) {
        if xs.is_empty() || ys.is_empty() || zs.is_empty() {
            return;
        }
        self.cells
            .slice_mut(s![xs.start..xs.end, ys.start..ys.end, zs.start..zs.end])
            .fill(state);
    }

    /// Every cell position along with its state.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize, usize), bool)> + '_ {
        self.cells.indexed_iter().map(|(pos, on)| (pos, *on))
    }

    #[cfg(test)]
    pub fn count_cells_on(&self) -> usize {
        self.cells.iter().filter(|on| **on).count()
    }
}

#[cfg(test)]
fn axes_for(ranges: &[(i64, i64)]) -> CompressedAxes {
    use crate::command::Command;
    use crate::range::{AxisRange, Cuboid};
    let commands: Vec<Command> = ranges
        .iter()
        .map(|(from, to)| {
            let r = AxisRange::new(*from, *to).unwrap();
            Command::on(Cuboid::new(r, r, r))
        })
        .collect();
    CompressedAxes::build(&commands).unwrap()
}

#[test]
fn test_new_grid_is_off() {
    let axes = axes_for(&[(0, 9), (5, 14)]);
    let grid = VolumeGrid::new(&axes, 1000).unwrap();
    assert_eq!(grid.shape(), (3, 3, 3));
    assert_eq!(grid.count_cells_on(), 0);
}

#[test]
fn test_grid_limit() {
    let axes = axes_for(&[(0, 9), (5, 14)]);
    assert_eq!(
        VolumeGrid::new(&axes, 26).unwrap_err(),
        RebootError::GridTooLarge {
            cells: Some(27),
            limit: 26
        }
    );
}

#[test]
fn test_fill() {
    let axes = axes_for(&[(0, 9), (5, 14)]);
    let mut grid = VolumeGrid::new(&axes, 1000).unwrap();
    grid.fill(0..2, 1..3, 2..3, true);
    assert_eq!(grid.count_cells_on(), 4);
    assert!(grid.get((1, 2, 2)));
    assert!(!grid.get((2, 2, 2)));
    grid.fill(1..3, 0..3, 0..3, false);
    assert_eq!(grid.count_cells_on(), 2);
    grid.fill(2..2, 0..3, 0..3, true);
    assert_eq!(grid.count_cells_on(), 2);
    assert_eq!(grid.cells().filter(|(_, on)| *on).count(), 2);
}
