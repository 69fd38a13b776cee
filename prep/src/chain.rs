//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::error::{Error, Result};

/// The files currently being expanded, root first. A path may appear at most once; pushing one
/// that is already open anywhere in the chain means the imports form a cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportChain {
    paths: Vec<String>,
}

impl ImportChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &str) -> Result<()> {
        if self.contains_anywhere(path) {
            return Err(Error::CircularImport {
                path: path.to_owned(),
                chain: self.paths.clone(),
            });
        }
        self.paths.push(path.to_owned());
        Ok(())
    }

    pub fn pop(&mut self) -> Option<String> {
        self.paths.pop()
    }

    pub fn contains_anywhere(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn top(&self) -> Option<&str> {
        self.paths.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

#[cfg(test)]
mod test {
    use super::ImportChain;
    use crate::error::Error;

    #[test]
    fn test_push_pop() {
        let mut chain = ImportChain::new();
        chain.push("a").unwrap();
        chain.push("b").unwrap();
        assert_eq!(chain.top(), Some("b"));
        assert_eq!(chain.pop().as_deref(), Some("b"));
        assert_eq!(chain.pop().as_deref(), Some("a"));
        assert!(chain.is_empty());
        assert_eq!(chain.pop(), None);
    }

    #[test]
    fn test_cycle_detected_below_top() {
        let mut chain = ImportChain::new();
        chain.push("a").unwrap();
        chain.push("b").unwrap();
        chain.push("c").unwrap();
        match chain.push("a") {
            Err(Error::CircularImport { path, chain }) => {
                assert_eq!(path, "a");
                assert_eq!(chain, ["a", "b", "c"]);
            }
            other => panic!("expected circular import, got {other:?}"),
        }
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_reopen_after_pop() {
        let mut chain = ImportChain::new();
        chain.push("a").unwrap();
        chain.push("b").unwrap();
        chain.pop();
        chain.push("b").unwrap();
        assert_eq!(chain.paths(), ["a", "b"]);
    }
}
