pub mod line_batch;
pub mod pipeline;
pub mod surface_batch;
pub mod surface_sampler;

pub use line_batch::{LineBatch, LineInstance, SegmentShape};
pub use pipeline::{draw_graph, DrawList, FrameStats, Pipeline};
pub use surface_batch::SurfaceBatch;
pub use surface_sampler::SurfaceSampler;
