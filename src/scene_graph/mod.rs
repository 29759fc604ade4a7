pub mod builder;
pub mod graph;
pub mod kind;
pub mod node;
pub mod transform;

// Re-export main types for convenience
pub use builder::{Node, NodeBuilder};
pub use graph::RenderGraph;
pub use kind::{Kind, Line, LineStyle, Surface};
pub use node::{GraphNode, NodeId};
pub use transform::{compose, MatrixTransform, NodeTransform};
