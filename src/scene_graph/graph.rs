use glam::Vec3;
use id_arena::Arena;

use crate::camera::CameraParameters;
use crate::error::GraphError;
use crate::scene_graph::builder::Node;
use crate::scene_graph::kind::Kind;
use crate::scene_graph::node::{GraphNode, NodeId};
use crate::scene_graph::transform::{compose, MatrixTransform, NodeTransform};

/// Owns every node of one editing session.
///
/// Traversal takes `&self` and mutation takes `&mut self`, so the graph can
/// not change while a [`walk`](RenderGraph::walk) is in flight.
pub struct RenderGraph {
    nodes: Arena<GraphNode>,
    root: NodeId,
    active_camera: Option<NodeId>,
    aspect_ratio: f32,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::with_aspect_ratio(1.0)
    }

    pub fn with_aspect_ratio(aspect_ratio: f32) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(GraphNode::new(NodeTransform::IDENTITY, None, None));

        Self {
            nodes,
            root,
            active_camera: None,
            aspect_ratio,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent_id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.child_ids.as_slice())
            .unwrap_or_default()
    }

    /// Moves `child` and its whole subtree under `parent`, after any existing
    /// children, and returns the id of the attached node.
    ///
    /// # Panics
    ///
    /// If `parent` does not belong to this graph.
    pub fn append(&mut self, parent: NodeId, child: Node) -> NodeId {
        if self.nodes.get(parent).is_none() {
            panic!("cannot append to {parent:?}: node is not part of this graph");
        }

        let id = self.insert(parent, child);
        log::debug!(
            "Appended {:?} under {:?} ({} nodes total)",
            id,
            parent,
            self.nodes.len()
        );

        id
    }

    /// Shorthand for appending to the root.
    pub fn push(&mut self, child: Node) -> NodeId {
        self.append(self.root, child)
    }

    fn insert(&mut self, parent: NodeId, node: Node) -> NodeId {
        let (transform, kind, children) = node.into_parts();
        let id = self.nodes.alloc(GraphNode::new(transform, kind, Some(parent)));

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.child_ids.push(id);
        }

        for child in children {
            self.insert(id, child);
        }

        id
    }

    pub fn active_camera(&self) -> Option<NodeId> {
        self.active_camera
    }

    /// Designates the viewpoint. The node is expected to carry a camera;
    /// [`camera_parameters`](RenderGraph::camera_parameters) fails otherwise.
    pub fn set_active_camera(&mut self, id: NodeId) {
        let is_camera = self
            .nodes
            .get(id)
            .and_then(|node| node.kind.as_ref())
            .and_then(Kind::as_camera)
            .is_some();

        if !is_camera {
            log::warn!("Active camera {:?} does not carry a camera payload", id);
        }

        self.active_camera = Some(id);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Updates the aspect ratio from a viewport size in pixels. A zero-sized
    /// viewport (minimised window) keeps the previous ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.set_aspect_ratio(width as f32 / height as f32);
    }

    /// World transform of `id`, folded from the root down the parent chain.
    pub fn world_transform(&self, id: NodeId) -> Option<MatrixTransform> {
        let mut chain = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            chain.push(node.transform.matrix());
            current = node.parent_id;
        }

        Some(
            chain
                .iter()
                .rev()
                .fold(MatrixTransform::IDENTITY, |world, local| compose(&world, local)),
        )
    }

    /// Visits every payload-bearing node in pre-order, parents before
    /// children and siblings in append order, with its world transform.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(MatrixTransform, &'a Kind)) {
        let Some(root) = self.nodes.get(self.root) else {
            return;
        };

        // The root itself never carries a payload.
        let root_world = compose(&MatrixTransform::IDENTITY, &root.transform.matrix());
        for &child_id in &root.child_ids {
            self.visit_node(child_id, &root_world, &mut visit);
        }
    }

    fn visit_node<'a, F>(&'a self, id: NodeId, parent_world: &MatrixTransform, visit: &mut F)
    where
        F: FnMut(MatrixTransform, &'a Kind),
    {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        let world = compose(parent_world, &node.transform.matrix());

        if let Some(kind) = &node.kind {
            log::trace!("Visiting {} {:?}", kind.name(), id);
            visit(world, kind);
        }

        for &child_id in &node.child_ids {
            self.visit_node(child_id, &world, visit);
        }
    }

    /// Projection and view for the active camera.
    ///
    /// # Panics
    ///
    /// If no active camera is set or the active node is not a camera. See
    /// [`try_camera_parameters`](RenderGraph::try_camera_parameters).
    pub fn camera_parameters(&self) -> CameraParameters {
        self.try_camera_parameters()
            .unwrap_or_else(|err| panic!("cannot derive camera parameters: {err}"))
    }

    pub fn try_camera_parameters(&self) -> Result<CameraParameters, GraphError> {
        let id = self.active_camera.ok_or(GraphError::NoActiveCamera)?;

        let camera = self
            .nodes
            .get(id)
            .and_then(|node| node.kind.as_ref())
            .and_then(Kind::as_camera)
            .ok_or(GraphError::NotACamera(id))?;
        let world = self.world_transform(id).ok_or(GraphError::UnknownNode(id))?;

        let projection = camera.projection_matrix(self.aspect_ratio);
        let view = world.inverse();

        Ok(CameraParameters {
            view_projection: projection * *view.matrix(),
            camera_position: world.origin(),
        })
    }

    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(id).ok_or(GraphError::UnknownNode(id))?;
        node.transform.translate(delta)?;
        Ok(())
    }

    pub fn translate_active_camera(&mut self, delta: Vec3) -> Result<(), GraphError> {
        let id = self.active_camera.ok_or(GraphError::NoActiveCamera)?;
        self.translate(id, delta)
    }

    /// Rotates `id` in place so its local `+Z` axis points at the world origin
    /// of `target`, keeping its world position. The node's world scale
    /// becomes one.
    ///
    /// The new local transform is decomposed back into position, rotation and
    /// scale, which is exact only when the parent's world scale is uniform.
    /// Under a rotated, non-uniformly scaled parent the aim is approximate.
    pub fn look_at(&mut self, id: NodeId, target: NodeId) -> Result<(), GraphError> {
        let eye = self.world_transform(id).ok_or(GraphError::UnknownNode(id))?.origin();
        let target_position = self
            .world_transform(target)
            .ok_or(GraphError::UnknownNode(target))?
            .origin();

        let view = MatrixTransform::look_at(eye, target_position, Vec3::Y)?;
        let parent_world = match self.parent(id) {
            Some(parent) => self.world_transform(parent).ok_or(GraphError::UnknownNode(parent))?,
            None => MatrixTransform::IDENTITY,
        };

        let local = compose(&parent_world.inverse(), &view.inverse());
        let transform = NodeTransform::from_matrix(&local)?;

        let node = self.nodes.get_mut(id).ok_or(GraphError::UnknownNode(id))?;
        node.transform = transform;

        Ok(())
    }
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}
