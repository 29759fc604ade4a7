//! Scene graph and transform composition for a 3D body editor.
//!
//! A [`RenderGraph`] owns a tree of nodes, each with a local
//! [`NodeTransform`] and an optional [`Kind`] payload. Once per frame the host
//! walks the graph to get `(world transform, payload)` pairs in a
//! deterministic order, and asks for the active camera's view-projection.

pub mod camera;
pub mod config;
pub mod editor;
pub mod error;
pub mod rendering;
pub mod scene_graph;

pub use camera::{Camera, CameraParameters, CameraUniform};
pub use config::EditorConfig;
pub use editor::BodyEditor;
pub use error::{GraphError, SamplerError, TransformError};
pub use scene_graph::{
    compose, GraphNode, Kind, Line, LineStyle, MatrixTransform, Node, NodeBuilder, NodeId,
    NodeTransform, RenderGraph, Surface,
};
