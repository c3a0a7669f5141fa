// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive named tree of ranges.
//!
//! Each node is written pre-order:
//!
//! ```text
//! [name: string][range: Range][child count: u32][child 0]...[child n-1]
//! ```
//!
//! Children are owned by value, so a tree can never contain a cycle or a
//! shared subtree. Encode, decode, comparison, cloning, formatting and drop
//! all walk the tree with an explicit stack; stream depth is bounded by
//! `CodecConfig::max_depth`, not by the native call stack.

use super::range::Range;
use crate::codec::{BinaryClass, Decode, Encode};
use crate::error::{Error, Result};
use crate::id::TypeId;
use crate::ser::{Decoder, Encoder};
use std::fmt;

/// Schema signature the [`Node`] identifier was derived from.
pub const NODE_SIGNATURE: &str = "atom.Node{name:string,range:atom.Range,children:[]atom.Node}";

/// A named group covering `range`, with ordered sub-groups.
#[derive(Default)]
pub struct Node {
    pub name: String,
    pub range: Range,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal yielding `(depth, node)`; the root is depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Number of levels in the tree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(1)
    }

    /// Child indices leading to the deepest node whose range contains
    /// `index`.
    ///
    /// Returns `None` when the root itself does not contain `index`, and an
    /// empty path when no child does. At each level the first matching child
    /// wins.
    pub fn find_path(&self, index: u64) -> Option<Vec<usize>> {
        if !self.range.contains(index) {
            return None;
        }
        let mut path = Vec::new();
        let mut current = self;
        while let Some((i, child)) = current
            .children
            .iter()
            .enumerate()
            .find(|(_, c)| c.range.contains(index))
        {
            path.push(i);
            current = child;
        }
        Some(path)
    }

    /// Follow a path of child indices from this node.
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get(i))
    }

    /// Copy of this node without its children.
    fn shallow_clone(&self) -> Node {
        Node {
            name: self.name.clone(),
            range: self.range,
            children: Vec::with_capacity(self.children.len()),
        }
    }

    fn encode_header(&self, enc: &mut Encoder<'_>) -> Result<()> {
        enc.write_string(&self.name)?;
        self.range.encode(enc)?;
        enc.write_count(self.children.len())
    }
}

impl PartialEq for Node {
    // Same pre-order sequence with the same child counts at every node
    // means the same shape.
    fn eq(&self, other: &Self) -> bool {
        self.walk()
            .zip(other.walk())
            .all(|((da, a), (db, b))| {
                da == db
                    && a.name == b.name
                    && a.range == b.range
                    && a.children.len() == b.children.len()
            })
    }
}

impl Eq for Node {}

impl Clone for Node {
    fn clone(&self) -> Self {
        let mut ancestors = Vec::new();
        let mut current = (self.shallow_clone(), self.children.iter());
        loop {
            if let Some(child) = current.1.next() {
                let next = (child.shallow_clone(), child.children.iter());
                ancestors.push(std::mem::replace(&mut current, next));
            } else {
                match ancestors.pop() {
                    Some(mut parent) => {
                        parent.0.children.push(current.0);
                        current = parent;
                    }
                    None => return current.0,
                }
            }
        }
    }
}

impl fmt::Debug for Node {
    /// Same shape as a derived `Debug`; `{:#?}` puts each child on its own
    /// indented line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = f.alternate();
        write!(
            f,
            "Node {{ name: {:?}, range: {:?}, children: [",
            self.name, self.range
        )?;
        // (unvisited siblings, nothing written at this level yet)
        let mut stack = vec![(self.children.iter(), true)];
        loop {
            let depth = stack.len();
            let Some((siblings, first)) = stack.last_mut() else {
                return Ok(());
            };
            match siblings.next() {
                Some(child) => {
                    if pretty {
                        write!(f, "\n{:indent$}", "", indent = depth * 4)?;
                    } else if !*first {
                        f.write_str(", ")?;
                    }
                    *first = false;
                    write!(
                        f,
                        "Node {{ name: {:?}, range: {:?}, children: [",
                        child.name, child.range
                    )?;
                    stack.push((child.children.iter(), true));
                }
                None => {
                    let had_children = !*first;
                    stack.pop();
                    if pretty && had_children {
                        write!(f, "\n{:indent$}", "", indent = (depth - 1) * 4)?;
                    }
                    f.write_str("] }")?;
                    if pretty && !stack.is_empty() {
                        f.write_str(",")?;
                    }
                }
            }
        }
    }
}

impl Drop for Node {
    // Flatten the subtree first so deep chains drop without recursion.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Iterator returned by [`Node::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

impl Encode for Node {
    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        self.encode_header(enc)?;
        let mut stack = vec![self.children.iter()];
        while let Some(siblings) = stack.last_mut() {
            match siblings.next() {
                Some(child) => {
                    child.encode_header(enc)?;
                    stack.push(child.children.iter());
                }
                None => {
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

/// A node whose header has been read but whose children are still arriving.
struct Frame {
    node: Node,
    remaining: usize,
}

impl Frame {
    fn read(dec: &mut Decoder<'_>) -> Result<Self> {
        let name = dec.read_string()?;
        let range = Range::decode(dec)?;
        let count = dec.read_count()?;
        Ok(Self {
            node: Node {
                name,
                range,
                // grows as children arrive; the declared count is untrusted
                children: Vec::new(),
            },
            remaining: count,
        })
    }
}

impl Decode for Node {
    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let max_depth = dec.config().max_depth;
        let mut ancestors: Vec<Frame> = Vec::new();
        let mut current = Frame::read(dec)?;

        loop {
            if current.remaining > 0 {
                current.remaining -= 1;
                // current sits at depth ancestors.len() + 1; its child one below
                if ancestors.len() + 2 > max_depth {
                    return Err(Error::DepthExceeded { max: max_depth });
                }
                let child = Frame::read(dec)?;
                ancestors.push(std::mem::replace(&mut current, child));
            } else {
                match ancestors.pop() {
                    Some(mut parent) => {
                        parent.node.children.push(current.node);
                        current = parent;
                    }
                    None => return Ok(current.node),
                }
            }
        }
    }
}

impl BinaryClass for Node {
    const ID: TypeId = TypeId::from_bytes([
        0xf9, 0x6f, 0xbe, 0xe7, 0xa4, 0x17, 0x3d, 0xdc, 0x95, 0x90, 0xc0, 0x87, 0x22, 0x03, 0x0f,
        0xd7, 0xa8, 0x2e, 0xd2, 0x6c,
    ]);
    const NAME: &'static str = "atom.Node";
}

impl fmt::Display for Node {
    /// Indented outline, one node per line: `name [start, end)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, node) in self.walk() {
            writeln!(
                f,
                "{:indent$}{} [{}, {})",
                "",
                node.name,
                node.range.start,
                node.range.end(),
                indent = depth * 2
            )?;
        }
        Ok(())
    }
}
