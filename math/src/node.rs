//! Parent/child transform hierarchy.
//!
//! Nodes live in an arena owned by the `Graph` and refer to each other by
//! `NodeId`. Each node's world matrix is its parent's world matrix times its
//! own local transform; `update_world_matrices` recomputes them top-down.

use crate::{Error, Mat4, Result, Transform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct Node {
    pub local: Transform,
    world: Mat4,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(local: Transform) -> Self {
        Node {
            local,
            world: local.matrix(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn add(&mut self, local: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(local));
        id
    }

    pub fn add_child(&mut self, parent: NodeId, local: Transform) -> Result<NodeId> {
        self.get(parent)?;
        let id = self.add(local);
        self.set_parent(id, Some(parent))?;
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(Error::UnknownNode)
    }

    pub fn world(&self, id: NodeId) -> Result<Mat4> {
        Ok(self.get(id)?.world)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| self.nodes[id.0].parent.is_none())
            .collect()
    }

    /// Move `node` under `parent`, or make it a root with `None`.
    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.get(node)?;

        if let Some(parent) = parent {
            // Walk up from the new parent; finding `node` means a loop.
            let mut ancestor = Some(parent);
            while let Some(id) = ancestor {
                if id == node {
                    return Err(Error::Cycle);
                }
                ancestor = self.get(id)?.parent;
            }
        }

        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|&c| c != node);
        }

        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(node);
        }
        self.nodes[node.0].parent = parent;

        Ok(())
    }

    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots()
            .into_iter()
            .map(|id| (id, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.world = parent_world * node.local.matrix();

            let world = node.world;
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
