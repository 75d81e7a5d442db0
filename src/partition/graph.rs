//! Stream graph
//!
//! Parent/child relationships between streams and the traversal plan for a
//! selection of streams.

use crate::error::{Error, Result};
use crate::streams::StreamDefinition;
use std::collections::{BTreeSet, HashMap};

/// Parent/child relationships between a set of stream definitions
#[derive(Debug, Clone)]
pub struct StreamGraph<'a> {
    streams: Vec<&'a StreamDefinition>,
    index: HashMap<&'a str, usize>,
}

/// One node of a traversal plan
///
/// Parents of a selected child are traversed even when not selected
/// themselves; `emit` is false for them.
#[derive(Debug, Clone)]
pub struct SyncNode<'a> {
    pub stream: &'a StreamDefinition,
    pub emit: bool,
    pub children: Vec<SyncNode<'a>>,
}

impl<'a> StreamGraph<'a> {
    /// Build and validate a graph
    ///
    /// Every parent must be defined, names must be unique, and following
    /// parent links must never come back to the same stream.
    pub fn new(definitions: impl IntoIterator<Item = &'a StreamDefinition>) -> Result<Self> {
        let streams: Vec<&'a StreamDefinition> = definitions.into_iter().collect();
        let mut index = HashMap::new();
        for (i, stream) in streams.iter().enumerate() {
            if index.insert(stream.name.as_str(), i).is_some() {
                return Err(Error::config(format!("Duplicate stream '{}'", stream.name)));
            }
        }

        let graph = Self { streams, index };
        for stream in &graph.streams {
            graph.ancestors(stream)?;
        }
        Ok(graph)
    }

    /// Look up a stream
    pub fn get(&self, name: &str) -> Option<&'a StreamDefinition> {
        self.index.get(name).map(|&i| self.streams[i])
    }

    /// All streams in definition order
    pub fn streams(&self) -> impl Iterator<Item = &'a StreamDefinition> + '_ {
        self.streams.iter().copied()
    }

    /// Streams without a parent, in definition order
    pub fn roots(&self) -> Vec<&'a StreamDefinition> {
        self.streams
            .iter()
            .copied()
            .filter(|s| s.parent.is_none())
            .collect()
    }

    /// Direct children of a stream, in definition order
    pub fn children_of(&self, name: &str) -> Vec<&'a StreamDefinition> {
        self.streams
            .iter()
            .copied()
            .filter(|s| s.parent.as_ref().is_some_and(|p| p.stream == name))
            .collect()
    }

    /// Parent chain of a stream, nearest first
    pub fn ancestors(&self, stream: &StreamDefinition) -> Result<Vec<&'a StreamDefinition>> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::from([stream.name.as_str()]);
        let mut current = stream.parent.as_ref();

        while let Some(link) = current {
            let parent = self.get(&link.stream).ok_or_else(|| {
                Error::config(format!(
                    "Stream '{}' references unknown parent '{}'",
                    stream.name, link.stream
                ))
            })?;
            if !seen.insert(parent.name.as_str()) {
                return Err(Error::config(format!(
                    "Parent cycle detected at stream '{}'",
                    stream.name
                )));
            }
            chain.push(parent);
            current = parent.parent.as_ref();
        }
        Ok(chain)
    }

    /// Traversal plan for the selected streams
    ///
    /// Returns root nodes in definition order, each carrying only the
    /// subtrees that contain a selected stream.
    pub fn plan(&self, selected: &BTreeSet<String>) -> Result<Vec<SyncNode<'a>>> {
        for name in selected {
            if !self.index.contains_key(name.as_str()) {
                return Err(Error::StreamNotFound {
                    stream: name.clone(),
                });
            }
        }

        Ok(self
            .roots()
            .into_iter()
            .filter_map(|root| self.node(root, selected))
            .collect())
    }

    fn node(&self, stream: &'a StreamDefinition, selected: &BTreeSet<String>) -> Option<SyncNode<'a>> {
        let children: Vec<SyncNode<'a>> = self
            .children_of(&stream.name)
            .into_iter()
            .filter_map(|child| self.node(child, selected))
            .collect();
        let emit = selected.contains(&stream.name);

        (emit || !children.is_empty()).then_some(SyncNode {
            stream,
            emit,
            children,
        })
    }
}
