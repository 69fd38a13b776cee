//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::{self, Read};

use crate::error::{Error, Result};
use crate::position::SourcePosition;
use crate::source::Source;
use crate::CHUNK_SIZE;

/// Streams the bytes of one file through a fixed size window, so that a few bytes can be looked
/// at before they are consumed.
pub struct Scanner<'a> {
    reader: Box<dyn Read + 'a>,
    window: Box<[u8]>,
    /// Number of bytes of `window` holding data.
    len: usize,
    /// Index in `window` of the next byte to be consumed.
    cursor: usize,
    path: String,
    position: SourcePosition,
}

impl<'a> Scanner<'a> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub(crate) fn new(
        path: impl Into<String>,
        reader: Box<dyn Read + 'a>,
        capacity: usize,
    ) -> Self {
        assert!(capacity > 0, "scanner window must not be empty");
        Self {
            reader,
            window: vec![0; capacity].into_boxed_slice(),
            len: 0,
            cursor: 0,
            path: path.into(),
            position: SourcePosition::new(),
        }
    }

    /// Open `path` from `source`. This is the only place a missing or unreadable file is
    /// reported.
    pub fn open<S: Source + ?Sized>(source: &'a S, path: &str) -> Result<Self> {
        let reader = source.open(path).map_err(|source| Error::NotFound {
            path: path.to_owned(),
            source,
        })?;
        log::trace!("Scanner::open() {path}");
        Ok(Self::new(path, reader, CHUNK_SIZE))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// Consume the next byte, `None` at end of input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u8>> {
        if !self.fill(0)? {
            return Ok(None);
        }
        let c = self.window[self.cursor];
        self.cursor += 1;
        self.position.advance(c);
        Ok(Some(c))
    }

    /// Look at the byte `k` places after the next one without consuming anything.
    pub fn peek(&mut self, k: usize) -> Result<Option<u8>> {
        if !self.fill(k)? {
            return Ok(None);
        }
        Ok(Some(self.window[self.cursor + k]))
    }

    /// Whether the upcoming bytes are exactly `token`.
    pub fn peek_matches(&mut self, token: &[u8]) -> Result<bool> {
        for (k, expected) in token.iter().enumerate() {
            if self.peek(k)? != Some(*expected) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Make sure `window[cursor + k]` holds data, reading more from the source if needed.
    /// Returns `false` when the source ends first.
    fn fill(&mut self, k: usize) -> Result<bool> {
        if self.cursor + k < self.len {
            return Ok(true);
        }
        if k >= self.window.len() {
            return Ok(false);
        }

        // Drop the consumed bytes to make room at the end.
        self.window.copy_within(self.cursor..self.len, 0);
        self.len -= self.cursor;
        self.cursor = 0;

        while self.len <= k {
            let n = match self.reader.read(&mut self.window[self.len..]) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(Error::Io {
                        path: self.path.clone(),
                        source,
                    })
                }
            };
            if n == 0 {
                return Ok(false);
            }
            self.len += n;
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Scanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("path", &self.path)
            .field("position", &self.position)
            .field("buffered", &(self.len - self.cursor))
            .finish()
    }
}
