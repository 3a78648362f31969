use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, i64 as signed},
    combinator::{map, map_res, value},
    sequence::{preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::command::Command;
use crate::error::RebootError;
use crate::range::AxisRange;
#[cfg(test)]
use crate::range::Cuboid;

/// `name=from..to`, rejecting ranges which run backwards.
fn axis_range<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, AxisRange> {
    preceded(
        terminated(tag(name), char('=')),
        map_res(separated_pair(signed, tag(".."), signed), |(from, to)| {
            AxisRange::new(from, to)
        }),
    )
}

fn on_off(input: &str) -> IResult<&str, bool> {
    alt((value(true, tag("on")), value(false, tag("off"))))(input)
}

fn reboot_step(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            terminated(on_off, char(' ')),
            terminated(axis_range("x"), char(',')),
            terminated(axis_range("y"), char(',')),
            axis_range("z"),
        )),
        |(turn_on, x, y, z)| Command { turn_on, x, y, z },
    )(input)
}

/// Parse a single line such as `on x=10..12,y=10..12,z=10..12`.
pub fn parse_command(s: &str) -> Result<Command, String> {
    match reboot_step(s) {
        Ok(("", command)) => Ok(command),
        Ok((tail, _)) => Err(format!("unexpected trailing junk: '{}'", tail)),
        Err(e) => Err(format!("failed to parse '{}': {}", s, e)),
    }
}

/// Parse one step per line, ignoring blank lines.
pub fn parse_commands(input: &str) -> Result<Vec<Command>, RebootError> {
    input
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line, text)| {
            parse_command(text).map_err(|message| RebootError::Parse { line, message })
        })
        .collect()
}

#[test]
fn test_parse_command() {
    assert_eq!(
        parse_command("on x=-54112..-39298,y=-85059..-49293,z=-27449..7877"),
        Ok(Command::on(Cuboid::new(
            AxisRange::new(-54112, -39298).unwrap(),
            AxisRange::new(-85059, -49293).unwrap(),
            AxisRange::new(-27449, 7877).unwrap(),
        )))
    );
    assert_eq!(
        parse_command("off x=9..11,y=9..11,z=9..11"),
        Ok(Command::off(Cuboid::cube(9, 11).unwrap()))
    );
}

#[test]
fn test_parse_command_errors() {
    assert_eq!(
        parse_command("on x=1..2,y=1..2,z=1..2 please"),
        Err("unexpected trailing junk: ' please'".to_string())
    );
    assert!(parse_command("on x=5..2,y=1..2,z=1..2")
        .unwrap_err()
        .starts_with("failed to parse"));
    assert!(parse_command("toggle x=1..2,y=1..2,z=1..2").is_err());
    assert!(parse_command("on x=1..2,z=1..2,y=1..2").is_err());
    assert!(parse_command("on x=1..99999999999999999999,y=1..2,z=1..2").is_err());
}

#[test]
fn test_parse_commands() {
    let input = "on x=10..12,y=10..12,z=10..12\r\n\noff x=9..11,y=9..11,z=9..11\n";
    assert_eq!(
        parse_commands(input),
        Ok(vec![
            Command::on(Cuboid::cube(10, 12).unwrap()),
            Command::off(Cuboid::cube(9, 11).unwrap()),
        ])
    );
    assert!(matches!(
        parse_commands("on x=10..12,y=10..12,z=10..12\n\noff x=9..11,y=9..11,z=11..9\n"),
        Err(RebootError::Parse { line: 3, .. })
    ));
}
