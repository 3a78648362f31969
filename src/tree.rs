//! A reactor which keeps, for each axis in turn, an ordered list of
//! disjoint ranges.  Each range of the x list owns a list of y ranges,
//! each of those a list of z ranges, and each z range a leaf saying
//! whether its cubes are on.  A step splits whichever ranges it
//! partially overlaps, so no global compression pass is needed.
use tracing::{event, Level};

use crate::command::Command;
use crate::error::RebootError;
use crate::range::AxisRange;
use crate::CubeFlipper;

const DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(bool),
    Branch(Vec<(AxisRange, Node)>),
}

impl Node {
    /// A node whose whole extent along `ranges` has state `on`.
    fn solid(ranges: &[AxisRange], on: bool) -> Node {
        match ranges.split_first() {
            None => Node::Leaf(on),
            Some((first, rest)) => Node::Branch(vec![(*first, Node::solid(rest, on))]),
        }
    }

    /// Set the state of everything inside `ranges` (one range per
    /// remaining axis) to `on`.
    fn update(&mut self, ranges: &[AxisRange], on: bool) {
        match self {
            Node::Leaf(state) => {
                assert!(ranges.is_empty(), "reached a leaf with axes left over");
                *state = on;
            }
            Node::Branch(children) => {
                let (first, rest) = match ranges.split_first() {
                    Some(split) => split,
                    None => panic!("ran out of axes above a leaf"),
                };
                let old = std::mem::take(children);
                *children = Node::merge_children(old, *first, rest, on);
            }
        }
    }

    fn merge_children(
        old: Vec<(AxisRange, Node)>,
        incoming: AxisRange,
        rest: &[AxisRange],
        on: bool,
    ) -> Vec<(AxisRange, Node)> {
        let mut result: Vec<(AxisRange, Node)> = Vec::with_capacity(old.len() + 2);
        let mut pending: Option<AxisRange> = Some(incoming);
        for (range, mut child) in old {
            let mut want = match pending {
                None => {
                    result.push((range, child));
                    continue;
                }
                Some(w) => w,
            };
            if range.is_before(&want) {
                // Entirely to the left of the step.
                result.push((range, child));
                continue;
            }
            if want.is_before(&range) {
                // The rest of the step fits in the gap before this child.
                result.push((want, Node::solid(rest, on)));
                result.push((range, child));
                pending = None;
                continue;
            }
            // The two overlap.  First deal with whichever of them starts
            // earlier, so that both begin at the same coordinate.
            if want.from < range.from {
                if let (Some(gap), Some(remainder)) = want.split_at(range.from - 1) {
                    result.push((gap, Node::solid(rest, on)));
                    want = remainder;
                }
            }
            let mut range = range;
            if range.from < want.from {
                if let (Some(untouched), Some(remainder)) = range.split_at(want.from - 1) {
                    result.push((untouched, child.clone()));
                    range = remainder;
                }
            }
            debug_assert_eq!(range.from, want.from);
            match range.split_at(want.to) {
                (Some(covered), None) => {
                    // The child ends within the step (or with it).
                    child.update(rest, on);
                    result.push((covered, child));
                    pending = want.split_at(covered.to).1;
                }
                (Some(covered), Some(beyond)) => {
                    // The child continues past the end of the step.
                    let mut middle = child.clone();
                    middle.update(rest, on);
                    result.push((covered, middle));
                    result.push((beyond, child));
                    pending = None;
                }
                (None, _) => unreachable!("child and step start together"),
            }
        }
        if let Some(want) = pending {
            result.push((want, Node::solid(rest, on)));
        }
        result
    }

    fn count_cubes_on(&self) -> Result<u128, RebootError> {
        match self {
            Node::Leaf(on) => Ok(u128::from(*on)),
            Node::Branch(children) => {
                let mut total: u128 = 0;
                for (range, child) in children {
                    let n = child
                        .count_cubes_on()?
                        .checked_mul(range.len())
                        .ok_or(RebootError::ArithmeticOverflow)?;
                    total = total.checked_add(n).ok_or(RebootError::ArithmeticOverflow)?;
                }
                Ok(total)
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(children) => 1 + children.iter().map(|(_, c)| c.node_count()).sum::<usize>(),
        }
    }

    /// Panic unless leaves are exactly `axes_left` levels down and each
    /// branch holds non-empty, ascending, disjoint ranges.
    fn check(&self, axes_left: usize) {
        match self {
            Node::Leaf(_) => assert_eq!(axes_left, 0, "leaf above the last axis"),
            Node::Branch(children) => {
                assert!(axes_left > 0, "branch below the last axis");
                for (range, child) in children {
                    assert!(!range.is_empty(), "empty range {}", range);
                    child.check(axes_left - 1);
                }
                for pair in children.windows(2) {
                    let (left, right) = (&pair[0].0, &pair[1].0);
                    assert!(
                        left.is_before(right),
                        "ranges {} and {} are out of order or overlap",
                        left,
                        right
                    );
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTree {
    root: Node,
}

impl Default for IntervalTree {
    fn default() -> IntervalTree {
        IntervalTree::new()
    }
}

impl IntervalTree {
    pub fn new() -> IntervalTree {
        IntervalTree {
            root: Node::Branch(Vec::new()),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Panic if the partition invariant does not hold.
    pub fn check(&self) {
        self.root.check(DEPTH);
    }
}

impl CubeFlipper for IntervalTree {
    fn obey(&mut self, command: &Command) {
        if command.affects().is_empty() {
            event!(Level::TRACE, "{} is empty, ignoring it", command);
            return;
        }
        self.root.update(&command.axes(), command.turn_on);
        if cfg!(debug_assertions) {
            self.check();
        }
        event!(
            Level::TRACE,
            "{}: tree now has {} nodes",
            command,
            self.node_count()
        );
    }

    fn count_cubes_on(&self) -> Result<u64, RebootError> {
        let total = self.root.count_cubes_on()?;
        u64::try_from(total).map_err(|_| RebootError::ArithmeticOverflow)
    }
}

pub fn count_on(commands: &[Command]) -> Result<u64, RebootError> {
    let mut tree = IntervalTree::new();
    for command in commands {
        tree.obey(command);
    }
    event!(
        Level::DEBUG,
        "interval tree for {} steps has {} nodes",
        commands.len(),
        tree.node_count()
    );
    tree.count_cubes_on()
}

#[cfg(test)]
use crate::dense::DenseReactor;
#[cfg(test)]
use crate::range::Cuboid;

#[cfg(test)]
fn r(from: i64, to: i64) -> AxisRange {
    AxisRange { from, to }
}

#[test]
fn test_empty_tree() {
    let tree = IntervalTree::new();
    assert_eq!(tree.count_cubes_on(), Ok(0));
    tree.check();
}

#[test]
fn test_single_step() {
    let mut tree = IntervalTree::new();
    tree.obey(&Command::on(Cuboid::cube(10, 12).unwrap()));
    assert_eq!(tree.count_cubes_on(), Ok(27));
    assert_eq!(
        tree.root(),
        &Node::Branch(vec![(
            r(10, 12),
            Node::Branch(vec![(r(10, 12), Node::Branch(vec![(r(10, 12), Node::Leaf(true))]))])
        )])
    );
}

#[test]
fn test_three_way_split() {
    let mut tree = IntervalTree::new();
    tree.obey(&Command::on(Cuboid::new(r(0, 9), r(0, 0), r(0, 0))));
    tree.obey(&Command::off(Cuboid::new(r(3, 5), r(0, 0), r(0, 0))));
    let xs: Vec<AxisRange> = match tree.root() {
        Node::Branch(children) => children.iter().map(|(range, _)| *range).collect(),
        Node::Leaf(_) => panic!("root should be a branch"),
    };
    assert_eq!(xs, vec![r(0, 2), r(3, 5), r(6, 9)]);
    assert_eq!(tree.count_cubes_on(), Ok(7));
}

/// Try every placement of a second range against a first one along
/// the x axis, covering each way two ranges can overlap, and compare
/// against a brute-force count.
#[test]
fn test_all_overlap_cases() {
    let region = Cuboid::new(r(0, 9), r(0, 1), r(0, 0));
    let spans: Vec<AxisRange> = (0..10)
        .flat_map(|from| (from..10).map(move |to| r(from, to)))
        .collect();
    let first = r(3, 6);
    for second in &spans {
        for (first_on, second_on) in [(true, true), (true, false), (false, true)] {
            let commands = [
                Command::new(first_on, Cuboid::new(first, r(0, 1), r(0, 0))),
                Command::new(second_on, Cuboid::new(*second, r(1, 1), r(0, 0))),
                Command::new(!second_on, Cuboid::new(*second, r(0, 0), r(0, 0))),
            ];
            let mut tree = IntervalTree::new();
            let mut dense = DenseReactor::new(region, 1000).unwrap();
            for c in &commands {
                tree.obey(c);
                dense.obey(c);
                assert_eq!(
                    tree.count_cubes_on(),
                    dense.count_cubes_on(),
                    "after {} in {:?}",
                    c,
                    commands
                );
            }
        }
    }
}

#[test]
fn test_extreme_coordinates() {
    let mut tree = IntervalTree::new();
    tree.obey(&Command::on(Cuboid::new(r(i64::MIN, i64::MAX), r(0, 0), r(0, 0))));
    tree.obey(&Command::off(Cuboid::new(r(i64::MIN + 1, i64::MAX), r(0, 0), r(0, 0))));
    assert_eq!(tree.count_cubes_on(), Ok(1));
    tree.obey(&Command::on(Cuboid::cube(i64::MIN, i64::MAX).unwrap()));
    assert_eq!(tree.count_cubes_on(), Err(RebootError::ArithmeticOverflow));
}

#[test]
fn test_empty_step_is_ignored() {
    let mut tree = IntervalTree::new();
    tree.obey(&Command::on(Cuboid::cube(0, 1).unwrap()));
    tree.obey(&Command::off(Cuboid::new(r(1, 0), r(0, 1), r(0, 1))));
    assert_eq!(tree.count_cubes_on(), Ok(8));
}
