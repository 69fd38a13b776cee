//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

/// Line and byte offset of the next byte to be consumed from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub offset: usize,
}

impl SourcePosition {
    pub fn new() -> Self {
        Self { line: 1, offset: 0 }
    }

    /// Account for one consumed byte. `\r` and `\n` each start a new line, so a `\r\n` pair
    /// counts twice.
    pub fn advance(&mut self, c: u8) {
        if c == b'\n' || c == b'\r' {
            self.line += 1;
        }
        self.offset += 1;
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new()
    }
}
