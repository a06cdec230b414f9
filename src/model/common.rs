use super::Block;
use serde::{Deserialize, Serialize};

/// Common fields for all blocks.
///
/// `has_children` is stored rather than computed so the validator's
/// consistency check (`has_children == !children.is_empty()`) verifies a
/// real invariant instead of a tautology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlockCommon {
    pub children: Vec<Block>,
    pub has_children: bool,
}

impl BlockCommon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// Replace the children, keeping `has_children` in sync.
    pub fn set_children(&mut self, children: Vec<Block>) {
        self.has_children = !children.is_empty();
        self.children = children;
    }
}
