//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{path}: cannot open file: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: error reading file: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("circular import of {path:?} ({})", chain_display(.chain, .path))]
    CircularImport { path: String, chain: Vec<String> },
    #[error("{path}:{line}: import path starting with {path_prefix:?} is longer than {max} bytes")]
    PathTooLong {
        path_prefix: String,
        max: usize,
        path: String,
        line: usize,
    },
    #[error("{path}:{line}: unterminated {construct}")]
    Unterminated {
        construct: Construct,
        path: String,
        line: usize,
    },
    #[error("{path}:{line}: import directive without a quoted path")]
    MissingImportPath { path: String, line: usize },
    #[error("{path}:{line}: import path is not valid UTF-8")]
    InvalidPath { path: String, line: usize },
    #[error("{path}: import depth exceeds the maximum of {max}")]
    DepthExceeded { path: String, max: usize },
    #[error("error writing output: {0}")]
    Output(#[from] std::io::Error),
}

/// Lexical constructs that can be left open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    ImportPath,
    BlockComment,
    StringLiteral,
}

impl std::fmt::Display for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Construct::ImportPath => "import path",
            Construct::BlockComment => "block comment",
            Construct::StringLiteral => "string literal",
        })
    }
}

fn chain_display(chain: &[String], path: &str) -> String {
    let mut s = chain.join(" -> ");
    if !s.is_empty() {
        s.push_str(" -> ");
    }
    s.push_str(path);
    s
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait GetExitCode {
    fn get_exit_code(&self) -> i32;
}

impl<T> GetExitCode for Result<T> {
    fn get_exit_code(&self) -> i32 {
        match self {
            Ok(_) => 0,
            Err(_) => 1,
        }
    }
}
