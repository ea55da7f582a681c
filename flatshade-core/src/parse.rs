/// Line-oriented nom helpers shared by the text source formats
use nom::{
    character::complete::{alphanumeric1, char, space0, space1, u64 as decimal},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::error::LoadError;

/// Non-blank lines of a source, numbered from 1
pub(crate) struct SourceLines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> SourceLines<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            inner: input.lines().enumerate(),
        }
    }

    /// Next non-blank line, or `UnexpectedEof` naming what was expected
    pub(crate) fn next_line(&mut self, expected: &str) -> Result<(usize, &'a str), LoadError> {
        self.inner
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| (i + 1, line))
            .ok_or_else(|| LoadError::UnexpectedEof {
                expected: expected.to_string(),
            })
    }

    /// Upper bound on the number of lines `next_line` can still return
    pub(crate) fn remaining_lines(&self) -> usize {
        self.inner.clone().count()
    }
}

/// Run `parser` over a whole line, allowing surrounding blanks
pub(crate) fn parse_line<'a, O, F>(
    line_no: usize,
    line: &'a str,
    what: &str,
    parser: F,
) -> Result<O, LoadError>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    match all_consuming(delimited(space0, parser, space0))(line) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(LoadError::Syntax {
            line: line_no,
            message: format!("expected {}, found `{}`", what, line.trim()),
        }),
    }
}

pub(crate) fn ensure_finite(line_no: usize, values: &[f32]) -> Result<(), LoadError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(LoadError::Syntax {
            line: line_no,
            message: format!("non-finite value {}", v),
        }),
        None => Ok(()),
    }
}

pub(crate) fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, x) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

pub(crate) fn parse_index_pair(input: &str) -> IResult<&str, (u64, u64)> {
    separated_pair(decimal, space1, decimal)(input)
}

pub(crate) fn parse_index_triple(input: &str) -> IResult<&str, (u64, u64, u64)> {
    let (input, a) = decimal(input)?;
    let (input, _) = space1(input)?;
    let (input, b) = decimal(input)?;
    let (input, _) = space1(input)?;
    let (input, c) = decimal(input)?;
    Ok((input, (a, b, c)))
}

/// `key = v1 v2 ...`
pub(crate) fn parse_field(input: &str) -> IResult<&str, (&str, Vec<f32>)> {
    separated_pair(
        alphanumeric1,
        delimited(space0, char('='), space0),
        separated_list1(space1, float),
    )(input)
}
