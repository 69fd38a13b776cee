//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Byte level classification of a file's contents.
//!
//! Everything is copied to the output unchanged except `import "path"` directives, which are
//! only recognised as the first word of a line. Comments and string literals are copied whole
//! so that nothing inside them is ever taken for a directive.

use crate::error::{Construct, Error, Result};
use crate::scanner::Scanner;
use crate::MAX_PATH_LEN;

const IMPORT_TAIL: &[u8] = b"mport";

/// An `import` directive found at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    /// The quoted path, exactly as written (escape sequences are kept).
    pub path: String,
    /// Line of the importing file holding the directive.
    pub line: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Some input was copied to the output.
    Copied,
    /// An import directive was consumed, up to and including its line terminator. Nothing was
    /// written for it.
    Import(ImportDirective),
    /// End of input.
    End,
}

#[derive(Debug)]
pub struct Classifier {
    at_line_start: bool,
    /// Blanks seen since the start of the line, held back until it is known whether the line
    /// is a directive.
    indent: Vec<u8>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            at_line_start: true,
            indent: Vec::new(),
        }
    }

    /// Consume one unit of input (a byte, a comment, a string literal or a directive).
    pub fn step(&mut self, scanner: &mut Scanner, out: &mut Vec<u8>) -> Result<Step> {
        let Some(c) = scanner.next()? else {
            out.append(&mut self.indent);
            return Ok(Step::End);
        };

        match c {
            b' ' | b'\t' | b'\x0c' if self.at_line_start => {
                self.indent.push(c);
                return Ok(Step::Copied);
            }
            b'i' if self.at_line_start && is_import_keyword(scanner)? => {
                let directive = read_import(scanner)?;
                log::trace!(
                    "Classifier::step() import {:?} at {}:{}",
                    directive.path,
                    scanner.path(),
                    directive.line
                );
                // Still at the start of a line: the directive's terminator was swallowed.
                self.indent.clear();
                return Ok(Step::Import(directive));
            }
            _ => out.append(&mut self.indent),
        }

        match c {
            b'/' if matches!(scanner.peek(0)?, Some(b'*' | b'/')) => {
                out.push(c);
                self.at_line_start = copy_comment(scanner, out)?;
            }
            b'"' => {
                out.push(c);
                copy_literal(scanner, out)?;
                self.at_line_start = false;
            }
            b'\n' | b'\r' => {
                out.push(c);
                self.at_line_start = true;
            }
            b' ' | b'\t' | b'\x0c' => out.push(c),
            _ => {
                out.push(c);
                self.at_line_start = false;
            }
        }

        Ok(Step::Copied)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Called with the `i` already consumed.
fn is_import_keyword(scanner: &mut Scanner) -> Result<bool> {
    Ok(scanner.peek_matches(IMPORT_TAIL)?
        && scanner.peek(IMPORT_TAIL.len())?.is_some_and(is_blank))
}

/// Copy a comment whose first `/` has already been written. Returns whether the comment ended
/// with a line terminator.
fn copy_comment(scanner: &mut Scanner, out: &mut Vec<u8>) -> Result<bool> {
    let Some(kind) = scanner.next()? else {
        return Ok(false);
    };
    out.push(kind);

    if kind == b'*' {
        while let Some(c) = scanner.next()? {
            out.push(c);
            if c == b'*' && scanner.peek(0)? == Some(b'/') {
                out.push(b'/');
                scanner.next()?;
                return Ok(false);
            }
        }
        log::warn!(
            "{}: {} reaches end of file",
            scanner.path(),
            Construct::BlockComment
        );
        Ok(false)
    } else {
        while let Some(c) = scanner.next()? {
            out.push(c);
            if c == b'\n' || c == b'\r' {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Copy a string literal whose opening quote has already been written.
fn copy_literal(scanner: &mut Scanner, out: &mut Vec<u8>) -> Result<()> {
    let mut escaped = false;
    while let Some(c) = scanner.next()? {
        out.push(c);
        if c == b'"' && !escaped {
            return Ok(());
        }
        escaped = !escaped && c == b'\\';
    }
    log::warn!(
        "{}: {} reaches end of file",
        scanner.path(),
        Construct::StringLiteral
    );
    Ok(())
}

/// Read the rest of an import directive, from just after its leading `i` to the end of the
/// line.
fn read_import(scanner: &mut Scanner) -> Result<ImportDirective> {
    let line = scanner.position().line;

    loop {
        match scanner.next()? {
            Some(b'"') => break,
            None | Some(b'\n' | b'\r') => {
                return Err(Error::MissingImportPath {
                    path: scanner.path().to_owned(),
                    line,
                })
            }
            Some(_) => {}
        }
    }

    let mut path = Vec::new();
    let mut escaped = false;
    loop {
        match scanner.next()? {
            Some(b'"') if !escaped => break,
            None | Some(b'\n' | b'\r') => {
                return Err(Error::Unterminated {
                    construct: Construct::ImportPath,
                    path: scanner.path().to_owned(),
                    line,
                })
            }
            Some(c) => {
                if path.len() == MAX_PATH_LEN {
                    let prefix = &path[..path.len().min(32)];
                    return Err(Error::PathTooLong {
                        path_prefix: String::from_utf8_lossy(prefix).into_owned(),
                        max: MAX_PATH_LEN,
                        path: scanner.path().to_owned(),
                        line,
                    });
                }
                path.push(c);
                escaped = !escaped && c == b'\\';
            }
        }
    }

    // Whatever follows the closing quote is dropped.
    while let Some(c) = scanner.next()? {
        if c == b'\n' || c == b'\r' {
            break;
        }
    }

    let path = String::from_utf8(path).map_err(|_| Error::InvalidPath {
        path: scanner.path().to_owned(),
        line,
    })?;
    Ok(ImportDirective { path, line })
}
