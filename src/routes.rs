//! Route accumulation and the single end-of-run flush.
//!
//! Blocks are appended in generation order with no keying by table, so
//! flushing the same tables twice duplicates their routes. Regeneration is
//! not idempotent for the routing file.

use std::path::Path;

use crate::codegen::fs_utils;
use crate::error::GeneratorError;

/// Rendered routes for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBlock {
    pub table: String,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct RouteAggregator {
    blocks: Vec<RouteBlock>,
}

impl RouteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: RouteBlock) {
        self.blocks.push(block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Existing content followed by every accumulated block, each preceded
    /// by a blank separator line.
    ///
    /// Existing content is kept byte-for-byte: lines are never re-joined, so
    /// line breaks in the routing file are not doubled on each run.
    pub fn render(&self, existing: &str) -> String {
        let mut output = String::from(existing);

        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }

        for block in &self.blocks {
            output.push('\n');
            output.push_str(&block.text);
            if !block.text.ends_with('\n') {
                output.push('\n');
            }
        }

        output
    }

    /// Append all blocks to the routing file at `path`, rewriting it whole.
    ///
    /// A missing file is treated as empty and created. Returns the number of
    /// blocks written.
    pub fn flush<P: AsRef<Path>>(&self, path: P) -> Result<usize, GeneratorError> {
        let path = path.as_ref();

        let existing = fs_utils::read_or_empty(path).map_err(|e| GeneratorError::io(path, e))?;
        fs_utils::write_file(path, self.render(&existing))
            .map_err(|e| GeneratorError::io(path, e))?;

        for block in &self.blocks {
            tracing::debug!("Appended routes for {} to {}", block.table, path.display());
        }
        tracing::info!("Appended {} route block(s) to {}", self.blocks.len(), path.display());
        Ok(self.blocks.len())
    }
}
