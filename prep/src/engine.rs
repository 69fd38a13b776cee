//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Recursive import expansion.
//!
//! Every open file owns a [`Frame`] on an explicit stack, mirroring the [`ImportChain`] one to
//! one, so deep import graphs are bounded by `Config::max_depth` instead of the thread's stack.

use crate::chain::ImportChain;
use crate::classify::{Classifier, Step};
use crate::error::{Error, Result};
use crate::marker::Marker;
use crate::position::SourcePosition;
use crate::scanner::Scanner;
use crate::source::Source;
use crate::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum length of the import chain, the root file included.
    pub max_depth: usize,
    /// Whether to write `#file` markers around every expansion.
    pub markers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            markers: true,
        }
    }
}

/// A file being scanned.
struct Frame<'a> {
    scanner: Scanner<'a>,
    classifier: Classifier,
}

pub struct Preprocessor<S> {
    source: S,
    config: Config,
}

impl<S: Source> Preprocessor<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: S, config: Config) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flatten `root` and everything it imports into one byte stream.
    pub fn preprocess(&self, root: &str) -> Result<Vec<u8>> {
        let mut chain = ImportChain::new();
        let mut sink = Vec::new();
        self.expand(root, &mut chain, &mut sink)?;
        Ok(sink)
    }

    /// Append the expansion of `path` to `sink`. `chain` holds the files already being
    /// expanded around this one; it is left as it was on return, also on error.
    pub fn expand(&self, path: &str, chain: &mut ImportChain, sink: &mut Vec<u8>) -> Result<()> {
        let base = chain.len();
        let result = self.expand_frames(path, chain, sink);
        if result.is_err() {
            while chain.len() > base {
                chain.pop();
            }
        }
        result
    }

    fn expand_frames(&self, path: &str, chain: &mut ImportChain, sink: &mut Vec<u8>) -> Result<()> {
        let mut frames = Vec::new();
        self.enter(path, chain, &mut frames)?;

        while let Some(frame) = frames.last_mut() {
            match frame.classifier.step(&mut frame.scanner, sink)? {
                Step::Copied => {}
                Step::Import(directive) => {
                    self.mark(sink, &directive.path, SourcePosition::new())?;
                    self.enter(&directive.path, chain, &mut frames)?;
                }
                Step::End => {
                    if let Some(done) = frames.pop() {
                        log::debug!(
                            "Preprocessor::expand() leaving {} after {} lines",
                            done.scanner.path(),
                            done.scanner.position().line
                        );
                    }
                    chain.pop();
                    if let Some(parent) = frames.last() {
                        self.mark(sink, parent.scanner.path(), parent.scanner.position())?;
                    }
                }
            }
        }

        Ok(())
    }

    fn enter<'a>(
        &'a self,
        path: &str,
        chain: &mut ImportChain,
        frames: &mut Vec<Frame<'a>>,
    ) -> Result<()> {
        if chain.len() >= self.config.max_depth {
            return Err(Error::DepthExceeded {
                path: path.to_owned(),
                max: self.config.max_depth,
            });
        }
        chain.push(path)?;
        let scanner = Scanner::open(&self.source, path)?;
        log::debug!(
            "Preprocessor::expand() entering {path} at depth {}",
            chain.len()
        );
        frames.push(Frame {
            scanner,
            classifier: Classifier::new(),
        });
        Ok(())
    }

    /// Markers always sit on a line of their own.
    fn mark(&self, sink: &mut Vec<u8>, path: &str, position: SourcePosition) -> Result<()> {
        if !self.config.markers {
            return Ok(());
        }
        if !matches!(sink.last(), None | Some(b'\n' | b'\r')) {
            sink.push(b'\n');
        }
        Marker::new(path, position).write_to(sink)
    }
}
