use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RebootError {
    /// An axis range whose start lies beyond its end.
    MalformedRange { from: i64, to: i64 },
    /// No commands at all.  `reboot` treats this as a count of zero.
    EmptyCommandList,
    /// A volume, or the running total, does not fit.
    ArithmeticOverflow,
    /// A grid would need more cells than we are prepared to allocate.
    GridTooLarge { cells: Option<usize>, limit: usize },
    /// A step given to a compressed reactor which was not built for it.
    UnknownStep { step: String },
    Parse { line: usize, message: String },
    Config(String),
}

impl Display for RebootError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RebootError::MalformedRange { from, to } => {
                write!(f, "inverted range {}..{}", from, to)
            }
            RebootError::EmptyCommandList => f.write_str("no reboot steps were given"),
            RebootError::ArithmeticOverflow => f.write_str("volume too large to count"),
            RebootError::GridTooLarge {
                cells: Some(cells),
                limit,
            } => write!(f, "grid of {} cells exceeds the limit of {}", cells, limit),
            RebootError::GridTooLarge { cells: None, limit } => {
                write!(f, "grid size overflows (limit is {} cells)", limit)
            }
            RebootError::UnknownStep { step } => {
                write!(f, "step '{}' is not one the grid was built from", step)
            }
            RebootError::Parse { line, message } => write!(f, "line {}: {}", line, message),
            RebootError::Config(message) => write!(f, "bad configuration: {}", message),
        }
    }
}

impl Error for RebootError {}

#[test]
fn test_display() {
    assert_eq!(
        RebootError::MalformedRange { from: 4, to: -2 }.to_string(),
        "inverted range 4..-2"
    );
    assert_eq!(
        RebootError::GridTooLarge {
            cells: Some(1000),
            limit: 10
        }
        .to_string(),
        "grid of 1000 cells exceeds the limit of 10"
    );
    assert_eq!(
        RebootError::UnknownStep {
            step: "off x=3..4,y=3..4,z=3..4".to_string()
        }
        .to_string(),
        "step 'off x=3..4,y=3..4,z=3..4' is not one the grid was built from"
    );
    assert_eq!(
        RebootError::Parse {
            line: 3,
            message: "unexpected trailing junk: 'x'".to_string()
        }
        .to_string(),
        "line 3: unexpected trailing junk: 'x'"
    );
}
