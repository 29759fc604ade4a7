use glam::Vec3;

use crate::rendering::pipeline::Pipeline;
use crate::scene_graph::{MatrixTransform, Surface};

/// Collects surface primitives for one frame and exposes them as a single
/// blended implicit field. Negative samples are inside the body.
///
/// Shapes are only cleared by `begin`. A frame without surfaces never
/// brackets the batch, so the previous frame's shapes are still sampled.
pub struct SurfaceBatch {
    shapes: Vec<(MatrixTransform, Surface)>,
    smoothing: f32,
}

impl SurfaceBatch {
    pub const DEFAULT_SMOOTHING: f32 = 0.5;

    pub fn new() -> Self {
        Self::with_smoothing(Self::DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(smoothing: f32) -> Self {
        Self {
            shapes: Vec::new(),
            smoothing,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World transforms and primitives drawn this frame, in draw order.
    pub fn shapes(&self) -> &[(MatrixTransform, Surface)] {
        &self.shapes
    }

    fn eval_shape(transform: &MatrixTransform, surface: &Surface, at: Vec3) -> f32 {
        // Evaluate in the shape's own frame.
        let local = transform.inverse().transform_point(at);

        match surface {
            Surface::Ellipsoid(size) => (local * local / (*size * *size)).element_sum() - 1.0,
        }
    }

    fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
        let h = (k - (a - b).abs()).max(0.0);
        a.min(b) - h * h * 0.25 / k
    }

    /// Field value at a world-space point, or `None` when nothing was drawn.
    pub fn sample(&self, at: Vec3) -> Option<f32> {
        let mut values = self
            .shapes
            .iter()
            .map(|(transform, surface)| Self::eval_shape(transform, surface, at));

        let first = values.next()?;
        let Some(second) = values.next() else {
            return Some(first);
        };

        let (mut lowest, mut second_lowest) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        for value in values {
            if value < lowest {
                second_lowest = lowest;
                lowest = value;
            } else if value < second_lowest {
                second_lowest = value;
            }
        }

        Some(Self::smooth_min(lowest, second_lowest, self.smoothing))
    }
}

impl Default for SurfaceBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<Surface> for SurfaceBatch {
    fn begin(&mut self) {
        self.shapes.clear();
    }

    fn draw(&mut self, transform: &MatrixTransform, surface: &Surface) {
        self.shapes.push((*transform, *surface));
    }

    fn end(&mut self) {
        log::trace!("Surface batch holds {} shapes", self.shapes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::NodeTransform;
    use approx::assert_abs_diff_eq;

    fn batch_of(shapes: &[(NodeTransform, Surface)]) -> SurfaceBatch {
        let mut batch = SurfaceBatch::new();
        batch.begin();
        for (transform, surface) in shapes {
            batch.draw(&transform.matrix(), surface);
        }
        batch.end();
        batch
    }

    #[test]
    fn empty_batch_has_no_field() {
        assert_eq!(SurfaceBatch::new().sample(Vec3::ZERO), None);
    }

    #[test]
    fn single_sphere_is_zero_on_its_surface() {
        let batch = batch_of(&[(
            NodeTransform::from_position(Vec3::new(10.0, 0.0, 0.0)).unwrap(),
            Surface::sphere(5.0),
        )]);

        assert_abs_diff_eq!(batch.sample(Vec3::new(15.0, 0.0, 0.0)).unwrap(), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(batch.sample(Vec3::new(10.0, 0.0, 0.0)).unwrap(), -1.0, epsilon = 1e-5);
        assert!(batch.sample(Vec3::ZERO).unwrap() > 0.0);
    }

    #[test]
    fn ellipsoid_respects_node_rotation() {
        let rotated = NodeTransform::from_rotation(Vec3::new(0.0, 0.0, 90.0)).unwrap();
        let batch = batch_of(&[(rotated, Surface::ellipsoid(4.0, 1.0, 1.0))]);

        // The long axis now runs along world Y.
        assert_abs_diff_eq!(batch.sample(Vec3::new(0.0, 4.0, 0.0)).unwrap(), 0.0, epsilon = 1e-4);
        assert!(batch.sample(Vec3::new(4.0, 0.0, 0.0)).unwrap() > 0.0);
    }

    #[test]
    fn nearby_shapes_blend_below_either_alone() {
        let at = |x: f32| NodeTransform::from_position(Vec3::new(x, 0.0, 0.0)).unwrap();
        let left = (at(-1.0), Surface::sphere(2.0));
        let right = (at(1.0), Surface::sphere(2.0));
        let far = (at(50.0), Surface::sphere(1.0));

        let alone = batch_of(&[left]).sample(Vec3::ZERO).unwrap();
        let blended = batch_of(&[left, right]).sample(Vec3::ZERO).unwrap();
        assert!(blended < alone);

        let with_far = batch_of(&[far, left, right]).sample(Vec3::ZERO).unwrap();
        assert_abs_diff_eq!(with_far, blended, epsilon = 1e-6);
    }

    #[test]
    fn begin_clears_the_previous_frame() {
        let mut batch = batch_of(&[(NodeTransform::IDENTITY, Surface::sphere(1.0))]);
        assert_eq!(batch.len(), 1);
        batch.begin();
        assert!(batch.is_empty());
    }
}
