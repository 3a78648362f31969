//! Sample inputs and input generators shared by the tests.
use crate::command::Command;
use crate::range::{AxisRange, Cuboid};

pub(crate) const SAMPLE_SINGLE: &str = "on x=10..12,y=10..12,z=10..12\n";

pub(crate) const SAMPLE_OVERLAP: &str = concat!(
    "on x=10..12,y=10..12,z=10..12\n",
    "on x=11..13,y=11..13,z=11..13\n",
    "off x=9..11,y=9..11,z=9..11\n",
    "on x=10..10,y=10..10,z=10..10\n",
);

/// Twenty-two steps, all inside the initialization region.
pub(crate) const SAMPLE_REGION: &str = concat!(
    "on x=-20..26,y=-36..17,z=-47..7\n",
    "on x=-20..33,y=-21..23,z=-26..28\n",
    "on x=-22..28,y=-29..23,z=-38..16\n",
    "on x=-46..7,y=-6..46,z=-50..-1\n",
    "on x=-49..1,y=-3..46,z=-24..28\n",
    "on x=2..47,y=-22..22,z=-23..27\n",
    "on x=-27..23,y=-28..26,z=-21..29\n",
    "on x=-39..5,y=-6..47,z=-3..44\n",
    "on x=-30..21,y=-8..43,z=-13..34\n",
    "on x=-22..26,y=-27..20,z=-29..19\n",
    "off x=-48..-32,y=26..41,z=-47..-37\n",
    "on x=-12..35,y=6..50,z=-50..-2\n",
    "off x=-48..-32,y=-32..-16,z=-15..-5\n",
    "on x=-18..26,y=-33..15,z=-7..46\n",
    "off x=-40..-22,y=-38..-28,z=23..41\n",
    "on x=-16..35,y=-41..10,z=-47..6\n",
    "off x=-32..-23,y=11..30,z=-14..3\n",
    "on x=-49..-5,y=-3..45,z=-29..18\n",
    "off x=18..30,y=-20..-8,z=-3..13\n",
    "on x=-41..9,y=-7..43,z=-33..15\n",
    "off x=-50..-40,y=40..50,z=-10..10\n",
    "on x=30..50,y=-50..-30,z=45..50\n",
);

/// Steps lying (at least partly) outside the initialization region.
pub(crate) const SAMPLE_FAR: &str = concat!(
    "on x=-54112..-39298,y=-85059..-49293,z=-27449..7877\n",
    "on x=967..23432,y=45373..81175,z=27513..53682\n",
    "off x=-60..60,y=45..70,z=-90..-40\n",
);

/// A small linear congruential generator, so that generated inputs are
/// the same on every run.
pub(crate) struct Lcg(u64);

impl Lcg {
    pub(crate) fn new(seed: u64) -> Lcg {
        Lcg(seed)
    }

    pub(crate) fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// A value in `lo..=hi`.
    pub(crate) fn between(&mut self, lo: i64, hi: i64) -> i64 {
        let n = (hi - lo + 1) as u64;
        lo + (self.next() % n) as i64
    }
}

fn scattered_range(rng: &mut Lcg, limit: i64, max_size: i64) -> AxisRange {
    let from = rng.between(-limit, limit);
    let to = (from + rng.between(0, max_size)).min(limit);
    AxisRange { from, to }
}

/// `count` steps inside `-limit..=limit` on every axis, each at most
/// `max_size + 1` cubes along each axis.  About two thirds turn cubes on.
pub(crate) fn scattered_commands(seed: u64, count: usize, limit: i64, max_size: i64) -> Vec<Command> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let turn_on = rng.next() % 3 != 0;
            let x = scattered_range(&mut rng, limit, max_size);
            let y = scattered_range(&mut rng, limit, max_size);
            let z = scattered_range(&mut rng, limit, max_size);
            Command::new(turn_on, Cuboid::new(x, y, z))
        })
        .collect()
}
