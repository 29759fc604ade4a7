//! Detached node trees.
//!
//! A [`Node`] owns its children by value and lives outside any graph until it
//! is handed to [`RenderGraph::append`](crate::scene_graph::RenderGraph::append),
//! which moves the whole subtree in. Because attaching consumes the value, a
//! node can never end up with two owning parents.

use crate::scene_graph::kind::Kind;
use crate::scene_graph::transform::NodeTransform;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub transform: NodeTransform,
    pub kind: Option<Kind>,
    children: Vec<Node>,
}

impl Node {
    /// Pure grouping or pivot node.
    pub fn empty(transform: NodeTransform) -> Self {
        Self {
            transform,
            kind: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(transform: NodeTransform, kind: impl Into<Kind>) -> Self {
        Self {
            transform,
            kind: Some(kind.into()),
            children: Vec::new(),
        }
    }

    pub fn group(transform: NodeTransform, children: impl IntoIterator<Item = Node>) -> Self {
        Self {
            transform,
            kind: None,
            children: children.into_iter().collect(),
        }
    }

    /// Appends `child` after any existing children and hands it back.
    pub fn push(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn into_parts(self) -> (NodeTransform, Option<Kind>, Vec<Node>) {
        (self.transform, self.kind, self.children)
    }
}

/// Assembles a node and an ordered list of children in one expression.
///
/// ```
/// use bodygraph::{Line, Node, NodeBuilder, NodeTransform};
///
/// let axes = NodeBuilder::new(NodeTransform::IDENTITY)
///     .child(Node::leaf(NodeTransform::IDENTITY, Line::arrow(10.0)))
///     .child(Node::leaf(NodeTransform::IDENTITY, Line::circle(4.0)))
///     .build();
/// assert_eq!(axes.children().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(transform: NodeTransform) -> Self {
        Self {
            node: Node::empty(transform),
        }
    }

    pub fn kind(mut self, kind: impl Into<Kind>) -> Self {
        self.node.kind = Some(kind.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.node.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.node.children.extend(children);
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

impl From<NodeBuilder> for Node {
    fn from(builder: NodeBuilder) -> Self {
        builder.build()
    }
}
