use std::env;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::RebootError;

/// Enough for a grid of a few hundred megabytes.
pub const DEFAULT_MAX_GRID_CELLS: usize = 1 << 28;

pub const STRATEGY_VAR: &str = "REACTOR_STRATEGY";
pub const MAX_GRID_CELLS_VAR: &str = "REACTOR_MAX_GRID_CELLS";

/// Which reactor does the counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The coordinate-compressed grid.
    Grid,
    /// The per-axis interval tree.
    Tree,
    /// The grid, unless it would be too large, in which case the tree.
    Auto,
}

impl FromStr for Strategy {
    type Err = RebootError;
    fn from_str(s: &str) -> Result<Strategy, RebootError> {
        match s {
            "grid" => Ok(Strategy::Grid),
            "tree" => Ok(Strategy::Tree),
            "auto" => Ok(Strategy::Auto),
            _ => Err(RebootError::Config(format!(
                "unknown strategy '{}' (expected grid, tree or auto)",
                s
            ))),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Grid => "grid",
            Strategy::Tree => "tree",
            Strategy::Auto => "auto",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebootConfig {
    pub strategy: Strategy,
    pub max_grid_cells: usize,
}

impl Default for RebootConfig {
    fn default() -> RebootConfig {
        RebootConfig {
            strategy: Strategy::Auto,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
        }
    }
}

impl RebootConfig {
    pub fn from_env() -> Result<RebootConfig, RebootError> {
        RebootConfig::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from whatever `lookup` returns for each
    /// variable name; missing variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<RebootConfig, RebootError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RebootConfig::default();
        if let Some(s) = lookup(STRATEGY_VAR) {
            config.strategy = s.trim().parse()?;
        }
        if let Some(s) = lookup(MAX_GRID_CELLS_VAR) {
            config.max_grid_cells = s.trim().parse().map_err(|e| {
                RebootError::Config(format!("{}: bad value '{}': {}", MAX_GRID_CELLS_VAR, s, e))
            })?;
        }
        Ok(config)
    }
}

#[test]
fn test_defaults() {
    assert_eq!(
        RebootConfig::from_lookup(|_| None),
        Ok(RebootConfig {
            strategy: Strategy::Auto,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
        })
    );
}

#[test]
fn test_from_lookup() {
    let config = RebootConfig::from_lookup(|name| match name {
        STRATEGY_VAR => Some("tree".to_string()),
        MAX_GRID_CELLS_VAR => Some(" 1000 ".to_string()),
        _ => None,
    });
    assert_eq!(
        config,
        Ok(RebootConfig {
            strategy: Strategy::Tree,
            max_grid_cells: 1000,
        })
    );
}

#[test]
fn test_bad_values() {
    assert!(matches!(
        RebootConfig::from_lookup(|name| (name == STRATEGY_VAR).then(|| "fastest".to_string())),
        Err(RebootError::Config(_))
    ));
    assert!(matches!(
        RebootConfig::from_lookup(|name| (name == MAX_GRID_CELLS_VAR).then(|| "-3".to_string())),
        Err(RebootError::Config(_))
    ));
}

#[test]
fn test_strategy_round_trip() {
    for s in [Strategy::Grid, Strategy::Tree, Strategy::Auto] {
        assert_eq!(s.to_string().parse::<Strategy>(), Ok(s));
    }
}
