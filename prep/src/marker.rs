//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Position markers.
//!
//! A marker is a single line `#file "<path>" <line> <offset>` telling whoever reads the
//! flattened output that the text after it comes from `path`, starting at `line` and byte
//! `offset` of that file.

use std::fmt;
use std::io::Write;

use nom::bytes::complete::{escaped, is_not, tag};
use nom::character::complete::{anychar, char, digit1};
use nom::combinator::{map, map_res, opt};
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

use crate::position::SourcePosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub path: String,
    pub line: usize,
    pub offset: usize,
}

impl Marker {
    pub fn new(path: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            path: path.into(),
            line: position.line,
            offset: position.offset,
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> crate::Result<()> {
        write!(out, "{self}")?;
        Ok(())
    }

    /// Parse a marker at the start of `input`, returning it with the input that follows.
    pub fn parse(input: &[u8]) -> Option<(Marker, &[u8])> {
        match parse_marker(input) {
            Ok((remaining, marker)) => Some((marker, remaining)),
            Err(error) => {
                log::trace!("Marker::parse() no marker: {error:?}");
                None
            }
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#file \"{}\" {} {}", self.path, self.line, self.offset)
    }
}

fn parse_number(input: &[u8]) -> IResult<&[u8], usize> {
    map_res(map_res(digit1, std::str::from_utf8), str::parse::<usize>)(input)
}

/// The quoted path, taken verbatim up to the first unescaped `"`.
fn parse_path(input: &[u8]) -> IResult<&[u8], String> {
    map_res(
        delimited(
            char('"'),
            map(opt(escaped(is_not("\\\""), '\\', anychar)), |path| {
                path.unwrap_or_default()
            }),
            char('"'),
        ),
        |path: &[u8]| String::from_utf8(path.to_vec()),
    )(input)
}

fn parse_marker(input: &[u8]) -> IResult<&[u8], Marker> {
    map(
        terminated(
            tuple((
                preceded(tag("#file "), parse_path),
                preceded(char(' '), parse_number),
                preceded(char(' '), parse_number),
            )),
            char('\n'),
        ),
        |(path, line, offset)| Marker { path, line, offset },
    )(input)
}

#[cfg(test)]
mod test {
    use super::Marker;
    use crate::position::SourcePosition;

    #[test]
    fn test_display() {
        let marker = Marker::new("lib/b.txt", SourcePosition { line: 2, offset: 15 });
        assert_eq!(marker.to_string(), "#file \"lib/b.txt\" 2 15\n");
    }

    #[test]
    fn test_write_to_appends() {
        let mut out = b"text\n".to_vec();
        Marker::new("a", SourcePosition::new())
            .write_to(&mut out)
            .unwrap();
        assert_eq!(out, b"text\n#file \"a\" 1 0\n");
    }

    #[test]
    fn test_parse() {
        let (marker, rest) = Marker::parse(b"#file \"b.txt\" 1 0\nhello\n").unwrap();
        assert_eq!(marker, Marker::new("b.txt", SourcePosition::new()));
        assert_eq!(rest, b"hello\n");
    }

    #[test]
    fn test_parse_escaped_and_empty_path() {
        let (marker, _) = Marker::parse(b"#file \"a\\\"b\" 10 200\n").unwrap();
        assert_eq!(marker.path, "a\\\"b");
        assert_eq!((marker.line, marker.offset), (10, 200));

        let (marker, _) = Marker::parse(b"#file \"\" 1 0\n").unwrap();
        assert_eq!(marker.path, "");
    }

    #[test]
    fn test_parse_rejects_other_text() {
        assert!(Marker::parse(b"#filex \"a\" 1 0\n").is_none());
        assert!(Marker::parse(b"#file \"a\" 1\n").is_none());
        assert!(Marker::parse(b"#file \"a\" 1 0").is_none());
        assert!(Marker::parse(b"import \"a\"\n").is_none());
    }

    #[test]
    fn test_display_parse_agree() {
        let marker = Marker::new("dir/x.src", SourcePosition { line: 7, offset: 99 });
        let text = marker.to_string();
        assert_eq!(Marker::parse(text.as_bytes()).unwrap().0, marker);
    }
}
