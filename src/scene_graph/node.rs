use id_arena::Id;

use crate::scene_graph::graph::RenderGraph;
use crate::scene_graph::kind::Kind;
use crate::scene_graph::transform::NodeTransform;

pub type NodeId = Id<GraphNode>;

/// A node after it has been attached to a [`RenderGraph`].
///
/// Children are owned through the graph's arena; `parent_id` is only a
/// lookup and never keeps anything alive.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub transform: NodeTransform,
    pub kind: Option<Kind>,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
}

impl GraphNode {
    pub(crate) fn new(
        transform: NodeTransform,
        kind: Option<Kind>,
        parent_id: Option<NodeId>,
    ) -> Self {
        Self {
            transform,
            kind,
            parent_id,
            child_ids: Vec::new(),
        }
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    pub fn parent<'a>(&self, graph: &'a RenderGraph) -> Option<&'a GraphNode> {
        self.parent_id.and_then(|id| graph.get_node(id))
    }

    pub fn children<'a, 'b>(
        &'a self,
        graph: &'b RenderGraph,
    ) -> impl Iterator<Item = &'b GraphNode> + 'b
    where
        'a: 'b,
    {
        self.child_ids.iter().filter_map(move |id| graph.get_node(*id))
    }
}
