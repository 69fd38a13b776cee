//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::io::{self, Read};

/// Where the bytes of a file come from. Paths are passed through exactly as they were written
/// in an import directive; any resolution is up to the implementation.
pub trait Source {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Reads files from the file system, relative to the current working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl Source for FsSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(path)?;
        Ok(Box::new(file))
    }
}

/// Serves file contents held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl Source for MemorySource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.files.get(path) {
            Some(contents) => Ok(Box::new(contents.as_slice())),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file {path:?}"),
            )),
        }
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }
}

#[cfg(test)]
mod test {
    use std::io::Read;

    use super::{MemorySource, Source};

    #[test]
    fn test_memory_source_open() {
        let source = MemorySource::new().with("a.txt", "hello");
        let mut contents = String::new();
        source
            .open("a.txt")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn test_memory_source_missing() {
        let source = MemorySource::new();
        let error = source.open("missing.txt").err().unwrap();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fs_source_missing() {
        let error = super::FsSource
            .open("this/path/does/not/exist.txt")
            .err()
            .unwrap();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }
}
