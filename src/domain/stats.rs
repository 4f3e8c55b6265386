//! Structural statistics of a concept tree.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of distinct concepts
    pub total_nodes: usize,
    /// Text of the first concept ever inserted
    pub root_text: Option<String>,
    /// Longest root-to-leaf path, counted in nodes (0 for an empty tree)
    pub depth: usize,
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "concepts: {}", self.total_nodes)?;
        writeln!(f, "root:     {}", self.root_text.as_deref().unwrap_or("<empty>"))?;
        write!(f, "depth:    {}", self.depth)
    }
}
