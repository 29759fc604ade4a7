use std::collections::HashMap;
use std::f32::consts::FRAC_PI_3;

use glam::{IVec3, Vec3};
use rand::Rng;

use crate::error::SamplerError;
use crate::rendering::surface_batch::SurfaceBatch;

/// Scatters evenly spaced points over the zero set of a [`SurfaceBatch`].
///
/// Every shape in the batch gets a seed point, and each accepted point grows
/// six hexagonal siblings in its tangent plane. A sibling is kept only when it
/// lies on the surface and no kept point is within `1.9 * repulsion_radius`.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSampler {
    repulsion_radius: f32,
    tolerance: f32,
    max_samples: usize,
}

impl SurfaceSampler {
    pub const DEFAULT_TOLERANCE: f32 = 1e-4;
    pub const DEFAULT_MAX_SAMPLES: usize = 1000;

    const GRADIENT_STEP: f32 = 1e-3;
    const SEED_ATTEMPTS: usize = 8;
    const SEED_ITERATIONS: usize = 100;
    const REFINE_ITERATIONS: usize = 10;
    const REJECTION_FACTOR: f32 = 1.9;

    pub fn new(repulsion_radius: f32) -> Self {
        Self {
            repulsion_radius,
            tolerance: Self::DEFAULT_TOLERANCE,
            max_samples: Self::DEFAULT_MAX_SAMPLES,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn repulsion_radius(&self) -> f32 {
        self.repulsion_radius
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        batch: &SurfaceBatch,
        rng: &mut R,
    ) -> Result<Vec<Vec3>, SamplerError> {
        if !self.repulsion_radius.is_finite() || self.repulsion_radius <= 0.0 {
            return Err(SamplerError::InvalidRadius(self.repulsion_radius));
        }
        if batch.is_empty() {
            return Err(SamplerError::NothingToSample);
        }

        let mut samples = SampleGrid::new(self.repulsion_radius * Self::REJECTION_FACTOR);
        let mut untreated = Vec::new();

        for (transform, _) in batch.shapes() {
            let Some(seed) = self.seed(batch, transform.origin(), rng) else {
                log::debug!("No seed found near {}", transform.origin());
                continue;
            };

            if samples.try_insert(seed) {
                untreated.push(seed);
            }
        }

        if samples.is_empty() {
            return Err(SamplerError::NoSeed);
        }

        while let Some(parent) = untreated.pop() {
            for sibling in self.sibling_points(batch, parent) {
                if samples.len() >= self.max_samples {
                    log::warn!("Surface sampling stopped at {} points", self.max_samples);
                    return Ok(samples.points);
                }

                if samples.try_insert(sibling) {
                    untreated.push(sibling);
                }
            }
        }

        log::debug!("Sampled {} surface points", samples.len());
        Ok(samples.points)
    }

    fn field(batch: &SurfaceBatch, at: Vec3) -> f32 {
        batch.sample(at).unwrap_or(f32::INFINITY)
    }

    fn on_surface(&self, batch: &SurfaceBatch, at: Vec3) -> bool {
        Self::field(batch, at).abs() <= self.tolerance
    }

    fn gradient(batch: &SurfaceBatch, at: Vec3) -> Vec3 {
        let h = Self::GRADIENT_STEP;
        let axis = |offset: Vec3| {
            (Self::field(batch, at + offset) - Self::field(batch, at - offset)) / (2.0 * h)
        };

        Vec3::new(axis(Vec3::X * h), axis(Vec3::Y * h), axis(Vec3::Z * h))
    }

    /// One Newton step towards the zero set, or `None` on a flat or broken
    /// field.
    fn newton_step(batch: &SurfaceBatch, at: Vec3) -> Option<Vec3> {
        let grad = Self::gradient(batch, at);
        let length_squared = grad.length_squared();
        if !length_squared.is_finite() || length_squared <= f32::EPSILON {
            return None;
        }

        let next = at - grad * (Self::field(batch, at) / length_squared);
        next.is_finite().then_some(next)
    }

    fn project(&self, batch: &SurfaceBatch, mut point: Vec3) -> Option<Vec3> {
        for _ in 0..Self::SEED_ITERATIONS {
            if self.on_surface(batch, point) {
                return Some(point);
            }
            point = Self::newton_step(batch, point)?;
        }

        self.on_surface(batch, point).then_some(point)
    }

    fn seed<R: Rng + ?Sized>(&self, batch: &SurfaceBatch, near: Vec3, rng: &mut R) -> Option<Vec3> {
        (0..Self::SEED_ATTEMPTS).find_map(|_| {
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .normalize_or_zero();
            if direction == Vec3::ZERO {
                return None;
            }

            self.project(batch, near + direction * 0.5)
        })
    }

    fn sibling_points(&self, batch: &SurfaceBatch, parent: Vec3) -> Vec<Vec3> {
        let normal = Self::gradient(batch, parent).normalize_or_zero();
        if normal == Vec3::ZERO {
            return Vec::new();
        }

        let (u, v) = normal.any_orthonormal_pair();
        let spacing = self.repulsion_radius * 2.0;

        (0..6)
            .filter_map(|i| {
                let angle = i as f32 * FRAC_PI_3;
                let guess = parent + (u * angle.cos() + v * angle.sin()) * spacing;
                self.refine_point(batch, parent, guess)
            })
            .collect()
    }

    /// Pulls `guess` onto the surface while keeping it a sibling's spacing
    /// away from `parent`.
    fn refine_point(&self, batch: &SurfaceBatch, parent: Vec3, guess: Vec3) -> Option<Vec3> {
        let spacing = self.repulsion_radius * 2.0;
        let mut point = guess;

        for _ in 0..Self::REFINE_ITERATIONS {
            point = Self::newton_step(batch, point)?;

            let away = point - parent;
            let distance = away.length();
            if distance < spacing {
                point += away.normalize_or_zero() * (spacing - distance);
            }

            if self.on_surface(batch, point) {
                return Some(point);
            }
        }

        self.project(batch, point)
    }
}

/// Accepted points bucketed by cell, for the rejection-radius check.
struct SampleGrid {
    cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
    points: Vec<Vec3>,
}

impl SampleGrid {
    fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn cell(&self, point: Vec3) -> IVec3 {
        (point / self.cell_size).floor().as_ivec3()
    }

    fn any_within(&self, point: Vec3) -> bool {
        let centre = self.cell(point);
        let radius_squared = self.cell_size * self.cell_size;

        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let Some(indices) = self.cells.get(&(centre + IVec3::new(x, y, z))) else {
                        continue;
                    };
                    if indices
                        .iter()
                        .any(|&i| self.points[i].distance_squared(point) < radius_squared)
                    {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Adds `point` unless another point is within the cell size of it.
    fn try_insert(&mut self, point: Vec3) -> bool {
        if self.any_within(point) {
            return false;
        }

        let cell = self.cell(point);
        self.cells.entry(cell).or_default().push(self.points.len());
        self.points.push(point);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::Pipeline;
    use crate::scene_graph::{NodeTransform, Surface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn batch_of(shapes: &[(NodeTransform, Surface)]) -> SurfaceBatch {
        let mut batch = SurfaceBatch::new();
        batch.begin();
        for (transform, surface) in shapes {
            batch.draw(&transform.matrix(), surface);
        }
        batch.end();
        batch
    }

    fn assert_spaced(points: &[Vec3], radius: f32) {
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= radius, "{a} and {b} are closer than {radius}");
            }
        }
    }

    #[test]
    fn sphere_points_lie_on_the_surface() {
        let batch = batch_of(&[(NodeTransform::IDENTITY, Surface::sphere(5.0))]);
        let sampler = SurfaceSampler::new(1.0);
        let mut rng = StdRng::seed_from_u64(7);

        let points = sampler.sample(&batch, &mut rng).unwrap();
        assert!(points.len() > 30 && points.len() < 200, "got {} points", points.len());

        for point in &points {
            let value = batch.sample(*point).unwrap();
            assert!(value.abs() <= sampler.tolerance(), "{point} samples {value}");
        }
        assert_spaced(&points, sampler.repulsion_radius());
    }

    #[test]
    fn rotated_ellipsoid_is_sampled_in_world_space() {
        let rotated = NodeTransform::from_rotation(Vec3::new(0.0, 0.0, 90.0)).unwrap();
        let batch = batch_of(&[(rotated, Surface::ellipsoid(4.0, 2.0, 2.0))]);
        let sampler = SurfaceSampler::new(0.75);
        let mut rng = StdRng::seed_from_u64(11);

        let points = sampler.sample(&batch, &mut rng).unwrap();
        assert!(points.iter().all(|p| p.x.abs() <= 2.01));
        assert!(points.iter().any(|p| p.y.abs() > 2.5));
        for point in &points {
            assert!(batch.sample(*point).unwrap().abs() <= sampler.tolerance());
        }
        assert_spaced(&points, sampler.repulsion_radius());
    }

    #[test]
    fn every_disjoint_shape_gets_points() {
        let at = |x: f32| NodeTransform::from_position(Vec3::new(x, 0.0, 0.0)).unwrap();
        let batch = batch_of(&[
            (at(-20.0), Surface::sphere(3.0)),
            (at(20.0), Surface::sphere(3.0)),
        ]);
        let mut rng = StdRng::seed_from_u64(3);

        let points = SurfaceSampler::new(1.0).sample(&batch, &mut rng).unwrap();
        assert!(points.iter().any(|p| p.x < 0.0));
        assert!(points.iter().any(|p| p.x > 0.0));
    }

    #[test]
    fn sampling_stops_at_the_limit() {
        let batch = batch_of(&[(NodeTransform::IDENTITY, Surface::sphere(5.0))]);
        let sampler = SurfaceSampler::new(0.5).with_max_samples(10);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(sampler.sample(&batch, &mut rng).unwrap().len(), 10);
    }

    #[test]
    fn rejects_empty_batch_and_bad_radius() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = SurfaceBatch::new();
        assert_eq!(
            SurfaceSampler::new(1.0).sample(&empty, &mut rng),
            Err(SamplerError::NothingToSample)
        );

        let batch = batch_of(&[(NodeTransform::IDENTITY, Surface::sphere(1.0))]);
        assert_eq!(
            SurfaceSampler::new(0.0).sample(&batch, &mut rng),
            Err(SamplerError::InvalidRadius(0.0))
        );
    }
}
