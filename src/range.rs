use std::cmp::{max, min};
use std::fmt::{self, Display, Formatter};

use crate::error::RebootError;

/// A closed interval `from..=to` along one axis.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AxisRange {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PointLineRelation {
    Before,
    Within,
    Beyond,
}

impl AxisRange {
    pub fn new(from: i64, to: i64) -> Result<AxisRange, RebootError> {
        if from <= to {
            Ok(AxisRange { from, to })
        } else {
            Err(RebootError::MalformedRange { from, to })
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Number of integer points in the range.  This is a `u128`
    /// because `i64::MIN..=i64::MAX` holds 2^64 of them.
    pub fn len(&self) -> u128 {
        if self.is_empty() {
            0
        } else {
            (i128::from(self.to) - i128::from(self.from) + 1) as u128
        }
    }

    pub fn contains(&self, val: i64) -> bool {
        self.from <= val && val <= self.to
    }

    /// True if every point of `self` is less than every point of `other`.
    pub fn is_before(&self, other: &AxisRange) -> bool {
        self.to < other.from
    }

    pub fn overlaps(&self, other: &AxisRange) -> bool {
        !self.is_empty() && !other.is_empty() && !self.is_before(other) && !other.is_before(self)
    }

    pub fn relation_of(&self, val: i64) -> PointLineRelation {
        if self.from > val {
            PointLineRelation::Before
        } else if self.to < val {
            PointLineRelation::Beyond
        } else {
            PointLineRelation::Within
        }
    }

    pub fn intersect(&self, other: &AxisRange) -> Option<AxisRange> {
        let result = AxisRange {
            from: max(self.from, other.from),
            to: min(self.to, other.to),
        };
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Split into (a, b) where a holds the points `<= boundary` and b
    /// the points `> boundary`.
    pub fn split_at(self, boundary: i64) -> (Option<AxisRange>, Option<AxisRange>) {
        match self.relation_of(boundary) {
            PointLineRelation::Before => (None, Some(self)),
            PointLineRelation::Beyond => (Some(self), None),
            PointLineRelation::Within if boundary == self.to => (Some(self), None),
            PointLineRelation::Within => (
                Some(AxisRange {
                    from: self.from,
                    to: boundary,
                }),
                Some(AxisRange {
                    from: boundary + 1,
                    to: self.to,
                }),
            ),
        }
    }
}

impl Display for AxisRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Cuboid {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Cuboid {
    pub fn new(x: AxisRange, y: AxisRange, z: AxisRange) -> Cuboid {
        Cuboid { x, y, z }
    }

    /// A cube spanning `from..=to` on every axis.
    pub fn cube(from: i64, to: i64) -> Result<Cuboid, RebootError> {
        let r = AxisRange::new(from, to)?;
        Ok(Cuboid { x: r, y: r, z: r })
    }

    pub fn axes(&self) -> [AxisRange; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    pub fn count_points(&self) -> Result<u128, RebootError> {
        self.x
            .len()
            .checked_mul(self.y.len())
            .and_then(|xy| xy.checked_mul(self.z.len()))
            .ok_or(RebootError::ArithmeticOverflow)
    }

    pub fn intersect(&self, other: &Cuboid) -> Option<Cuboid> {
        Some(Cuboid {
            x: self.x.intersect(&other.x)?,
            y: self.y.intersect(&other.y)?,
            z: self.z.intersect(&other.z)?,
        })
    }

    pub fn overlaps(&self, other: &Cuboid) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    pub fn contains(&self, (x, y, z): (i64, i64, i64)) -> bool {
        self.x.contains(x) && self.y.contains(y) && self.z.contains(z)
    }
}

impl Display for Cuboid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "x={},y={},z={}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
fn r(from: i64, to: i64) -> AxisRange {
    AxisRange { from, to }
}

#[test]
fn test_new_rejects_inverted() {
    assert_eq!(AxisRange::new(3, 3), Ok(r(3, 3)));
    assert_eq!(
        AxisRange::new(4, 3),
        Err(RebootError::MalformedRange { from: 4, to: 3 })
    );
}

#[test]
fn test_len() {
    assert_eq!(r(10, 12).len(), 3);
    assert_eq!(r(-5, -5).len(), 1);
    assert_eq!(r(5, 4).len(), 0);
    assert_eq!(r(i64::MIN, i64::MAX).len(), 1u128 << 64);
}

#[test]
fn test_overlaps() {
    assert!(r(0, 5).overlaps(&r(5, 9)));
    assert!(r(0, 5).overlaps(&r(-3, 0)));
    assert!(r(0, 5).overlaps(&r(1, 2)));
    assert!(!r(0, 5).overlaps(&r(6, 9)));
    assert!(!r(0, 5).overlaps(&r(-9, -1)));
    assert!(r(0, 5).is_before(&r(6, 9)));
    assert!(!r(0, 6).is_before(&r(6, 9)));
}

#[test]
fn test_split_at() {
    assert_eq!(r(5, 10).split_at(1000000), (Some(r(5, 10)), None));
    assert_eq!(r(5, 10).split_at(-1000000), (None, Some(r(5, 10))));
    assert_eq!(r(5, 10).split_at(8), (Some(r(5, 8)), Some(r(9, 10))));
    assert_eq!(r(5, 10).split_at(4), (None, Some(r(5, 10))));
    assert_eq!(r(5, 10).split_at(10), (Some(r(5, 10)), None));
    assert_eq!(r(5, 10).split_at(5), (Some(r(5, 5)), Some(r(6, 10))));
}

#[test]
fn test_cuboid_intersect() {
    let a = Cuboid::new(r(10, 12), r(10, 12), r(10, 12));
    let b = Cuboid::new(r(11, 13), r(11, 13), r(11, 13));
    assert_eq!(
        a.intersect(&b),
        Some(Cuboid::new(r(11, 12), r(11, 12), r(11, 12)))
    );
    let c = Cuboid::new(r(13, 20), r(0, 100), r(0, 100));
    assert_eq!(a.intersect(&c), None);
    assert!(!a.overlaps(&c));
    assert!(a.overlaps(&b));
}

#[test]
fn test_count_points() {
    assert_eq!(Cuboid::cube(10, 12).unwrap().count_points(), Ok(27));
    assert_eq!(
        Cuboid::cube(i64::MIN, i64::MAX).unwrap().count_points(),
        Err(RebootError::ArithmeticOverflow)
    );
}

#[test]
fn test_display() {
    assert_eq!(
        Cuboid::new(r(-54112, -39298), r(1, 2), r(3, 3)).to_string(),
        "x=-54112..-39298,y=1..2,z=3..3"
    );
}
