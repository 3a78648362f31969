use std::fmt::{self, Display, Formatter};

use crate::range::{AxisRange, Cuboid};

/// One reboot step: switch every cube in the cuboid on or off.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Command {
    pub turn_on: bool,
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Command {
    pub fn new(turn_on: bool, affects: Cuboid) -> Command {
        Command {
            turn_on,
            x: affects.x,
            y: affects.y,
            z: affects.z,
        }
    }

    pub fn on(affects: Cuboid) -> Command {
        Command::new(true, affects)
    }

    pub fn off(affects: Cuboid) -> Command {
        Command::new(false, affects)
    }

    pub fn affects(&self) -> Cuboid {
        Cuboid::new(self.x, self.y, self.z)
    }

    pub fn axes(&self) -> [AxisRange; 3] {
        [self.x, self.y, self.z]
    }

    /// The same step restricted to `region`, or None if it misses
    /// the region entirely.
    pub fn crop(&self, region: &Cuboid) -> Option<Command> {
        self.affects()
            .intersect(region)
            .map(|cropped| Command::new(self.turn_on, cropped))
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = if self.turn_on { "on" } else { "off" };
        write!(f, "{} {}", state, self.affects())
    }
}

#[test]
fn test_crop() {
    let region = Cuboid::cube(-50, 50).unwrap();
    let far = Command::on(Cuboid::new(
        AxisRange::new(-54112, -39298).unwrap(),
        AxisRange::new(-85059, -49293).unwrap(),
        AxisRange::new(-27449, 7877).unwrap(),
    ));
    assert_eq!(far.crop(&region), None);

    let straddling = Command::off(Cuboid::new(
        AxisRange::new(-54112, 39298).unwrap(),
        AxisRange::new(-85059, -19).unwrap(),
        AxisRange::new(20, 200).unwrap(),
    ));
    assert_eq!(
        straddling.crop(&region),
        Some(Command::off(Cuboid::new(
            AxisRange::new(-50, 50).unwrap(),
            AxisRange::new(-50, -19).unwrap(),
            AxisRange::new(20, 50).unwrap(),
        )))
    );
}

#[test]
fn test_display() {
    let c = Command::on(Cuboid::cube(10, 12).unwrap());
    assert_eq!(c.to_string(), "on x=10..12,y=10..12,z=10..12");
}
