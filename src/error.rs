//! Error types for the scene graph.

use glam::Vec3;
use thiserror::Error;

use crate::scene_graph::NodeId;

/// Rejected transform input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransformError {
    /// Scale components must be strictly positive
    #[error("scale must be positive on every axis, got {0}")]
    NonPositiveScale(Vec3),

    /// NaN or infinite component
    #[error("transform component is not finite: {0}")]
    NonFinite(Vec3),

    /// Matrix has no usable inverse
    #[error("transform is degenerate and cannot be inverted")]
    Degenerate,
}

/// Broken graph setup.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GraphError {
    #[error("no active camera set")]
    NoActiveCamera,

    #[error("node {0:?} is not part of this graph")]
    UnknownNode(NodeId),

    #[error("node {0:?} does not carry a camera")]
    NotACamera(NodeId),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Surface sampling that could not start.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SamplerError {
    #[error("repulsion radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("surface batch is empty")]
    NothingToSample,

    #[error("no seed point converged onto the surface")]
    NoSeed,
}
