//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! `prep` flattens `import "path"` directives by splicing the imported file in place,
//! recursively, and brackets every spliced file with `#file` position markers so that later
//! compiler stages can report positions in the original sources.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub use error::{Error, Result};

pub mod chain;
pub mod classify;
pub mod engine;
pub mod error;
pub mod marker;
pub mod position;
pub mod scanner;
pub mod source;

pub use chain::ImportChain;
pub use engine::{Config, Preprocessor};
pub use marker::Marker;
pub use position::SourcePosition;
pub use source::{FsSource, MemorySource, Source};

/// Capacity of the look ahead window of each open file.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Longest quoted path accepted in an import directive, in bytes.
pub const MAX_PATH_LEN: usize = 256;

/// Default maximum length of the import chain, counting the root file.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Preprocess `root` from the file system with the default configuration.
pub fn preprocess(root: &str) -> Result<Vec<u8>> {
    Preprocessor::new(FsSource).preprocess(root)
}

#[derive(Debug, clap::Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Write the flattened output to FILE instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Maximum nesting depth of imports, counting the root file.
    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Don't emit `#file` position markers.
    #[arg(short = 'P', long)]
    pub no_markers: bool,
    /// Root files to preprocess. Each one is expanded independently, in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            max_depth: self.max_depth,
            markers: !self.no_markers,
        }
    }
}

pub fn run<STDOUT: Write + 'static, STDERR: Write>(
    stdout: STDOUT,
    mut stderr: STDERR,
    args: Args,
) -> Result<()> {
    match run_impl(stdout, args) {
        Ok(_) => Ok(()),
        Err(error) => {
            writeln!(stderr, "prep: {error}")?;
            Err(error)
        }
    }
}

/// Processing stops at the first root that fails; nothing of a failing root is written. An
/// output file is only created, or replaced, once every root has been flattened.
pub fn run_impl<STDOUT: Write + 'static>(stdout: STDOUT, args: Args) -> Result<()> {
    let preprocessor = Preprocessor::with_config(FsSource, args.config());
    log::debug!("run_impl() {:?}", preprocessor.config());

    match &args.output {
        Some(path) => {
            let mut flattened = Vec::new();
            for file in &args.files {
                flattened.extend(preprocess_root(&preprocessor, file)?);
            }
            let mut output = BufWriter::new(std::fs::File::create(path)?);
            output.write_all(&flattened)?;
            output.flush()?;
        }
        None => {
            let mut output = BufWriter::new(stdout);
            for file in &args.files {
                output.write_all(&preprocess_root(&preprocessor, file)?)?;
            }
            output.flush()?;
        }
    }

    Ok(())
}

fn preprocess_root<S: Source>(preprocessor: &Preprocessor<S>, file: &Path) -> Result<Vec<u8>> {
    let root = file.to_string_lossy();
    log::debug!("run_impl() preprocessing {root}");
    preprocessor.preprocess(&root)
}
