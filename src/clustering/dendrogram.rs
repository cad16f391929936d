//! Plain-text rendering of a merge tree.
//!
//! Every nesting level adds one `|` to the indent. A merge line reads
//! `<indent>||<distance>`, a leaf `<indent>-Observation: <name>`. At each merge
//! the child formed at the larger distance is printed above the merge line.

use crate::clustering::hierarchical::HierarchicalCluster;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const BASE_INDENT: &str = "||||";

/// Displays a [`HierarchicalCluster`] as a dendrogram.
pub struct Dendrogram<'a>(pub &'a HierarchicalCluster);

impl fmt::Display for Dendrogram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, BASE_INDENT, self.0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, indent: &str, cluster: &HierarchicalCluster) -> fmt::Result {
    match cluster {
        HierarchicalCluster::Unary { name, .. } => writeln!(f, "{indent}-Observation: {name}"),
        HierarchicalCluster::Binary {
            left,
            right,
            min_distance,
        } => {
            let (above, below) = if left.min_distance() > right.min_distance() {
                (left, right)
            } else {
                (right, left)
            };
            let child_indent = format!("{indent}|");
            write_node(f, &child_indent, above)?;
            writeln!(f, "{indent}||{min_distance}")?;
            write_node(f, &child_indent, below)
        }
    }
}

/// `<matrix file>-Clustering.txt`, next to the matrix file.
pub fn default_output_path(matrix_path: &Path) -> PathBuf {
    let mut name = matrix_path.as_os_str().to_owned();
    name.push("-Clustering.txt");
    PathBuf::from(name)
}

pub fn write_dendrogram(path: &Path, root: &HierarchicalCluster) -> Result<()> {
    std::fs::write(path, Dendrogram(root).to_string()).map_err(|e| Error::io(path, e))
}
