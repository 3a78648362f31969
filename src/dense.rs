//! A reactor which stores every cube of a bounded region separately.
//! It is only practical for small regions, but it is simple enough to
//! serve as a reference for the other reactors.
use ndarray::prelude::*;

use crate::command::Command;
use crate::error::RebootError;
use crate::range::{AxisRange, Cuboid};
use crate::CubeFlipper;

pub struct DenseReactor {
    region: Cuboid,
    cubes: Array3<bool>,
}

fn side(r: &AxisRange) -> Option<usize> {
    usize::try_from(r.len()).ok()
}

fn offset(val: i64, origin: i64) -> usize {
    (i128::from(val) - i128::from(origin)) as usize
}

impl DenseReactor {
    /// A reactor covering `region`, with every cube off.  Steps are
    /// clipped to the region.
    pub fn new(region: Cuboid, max_cells: usize) -> Result<DenseReactor, RebootError> {
        let dims = match (side(&region.x), side(&region.y), side(&region.z)) {
            (Some(nx), Some(ny), Some(nz)) => Some((nx, ny, nz)),
            _ => None,
        };
        let cells = dims.and_then(|(nx, ny, nz)| nx.checked_mul(ny)?.checked_mul(nz));
        match (dims, cells) {
            (Some(dims), Some(n)) if n <= max_cells => Ok(DenseReactor {
                region,
                cubes: Array3::from_elem(dims, false),
            }),
            (_, cells) => Err(RebootError::GridTooLarge {
                cells,
                limit: max_cells,
            }),
        }
    }

    pub fn region(&self) -> &Cuboid {
        &self.region
    }
}

impl CubeFlipper for DenseReactor {
    fn obey(&mut self, command: &Command) {
        let cropped = match command.crop(&self.region) {
            Some(c) => c,
            None => {
                return;
            }
        };
        let (x0, x1) = (
            offset(cropped.x.from, self.region.x.from),
            offset(cropped.x.to, self.region.x.from) + 1,
        );
        let (y0, y1) = (
            offset(cropped.y.from, self.region.y.from),
            offset(cropped.y.to, self.region.y.from) + 1,
        );
        let (z0, z1) = (
            offset(cropped.z.from, self.region.z.from),
            offset(cropped.z.to, self.region.z.from) + 1,
        );
        self.cubes
            .slice_mut(s![x0..x1, y0..y1, z0..z1])
            .fill(command.turn_on);
    }

    fn count_cubes_on(&self) -> Result<u64, RebootError> {
        let n = self.cubes.iter().filter(|on| **on).count();
        u64::try_from(n).map_err(|_| RebootError::ArithmeticOverflow)
    }
}

#[test]
fn test_region_too_large() {
    let region = Cuboid::cube(-100000, 100000).unwrap();
    assert!(matches!(
        DenseReactor::new(region, 1 << 28),
        Err(RebootError::GridTooLarge { .. })
    ));
}

#[test]
fn test_obey_clips_to_region() {
    let region = Cuboid::cube(-50, 50).unwrap();
    let mut reactor = DenseReactor::new(region, 101 * 101 * 101).unwrap();
    reactor.obey(&Command::on(Cuboid::cube(40, 60).unwrap()));
    assert_eq!(reactor.count_cubes_on(), Ok(11 * 11 * 11));
    // Only the 40..=45 corner has all three coordinates <= 45.
    reactor.obey(&Command::off(Cuboid::cube(-1000, 45).unwrap()));
    assert_eq!(reactor.count_cubes_on(), Ok(1331 - 216));
    reactor.obey(&Command::on(Cuboid::cube(1000, 2000).unwrap()));
    assert_eq!(reactor.count_cubes_on(), Ok(1331 - 216));
}
