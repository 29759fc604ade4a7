use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::rendering::pipeline::Pipeline;
use crate::scene_graph::{Line, LineStyle, MatrixTransform};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SegmentShape {
    #[default]
    Rectangle = 0,
    Triangle = 1,
}

/// One world-space segment as handed to a line shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable, PartialEq)]
pub struct LineInstance {
    pub a: [f32; 3],
    pub b: [f32; 3],
    pub color: [f32; 3],
    pub thickness: f32,
    pub shape: u32,
    pub dash_size: f32,
    pub dash_offset: f32,
}

impl LineInstance {
    fn new(
        a: Vec3,
        b: Vec3,
        line: &Line,
        thickness: f32,
        shape: SegmentShape,
        dash_size: f32,
        dash_offset: f32,
    ) -> Self {
        Self {
            a: a.to_array(),
            b: b.to_array(),
            color: line.color.to_array(),
            thickness,
            shape: shape as u32,
            dash_size,
            dash_offset,
        }
    }

    pub fn length(&self) -> f32 {
        Vec3::from_array(self.a).distance(Vec3::from_array(self.b))
    }
}

/// Expands [`Line`] payloads into [`LineInstance`] segments on the CPU.
///
/// Instances are only cleared by `begin`. A frame without lines never
/// brackets the batch, so the previous frame's instances stay readable.
pub struct LineBatch {
    instances: Vec<LineInstance>,
    dropped: usize,
}

impl LineBatch {
    pub const MAX_INSTANCES: usize = 1000;
    pub const CIRCLE_SEGMENTS: usize = 48;

    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(Self::MAX_INSTANCES),
            dropped: 0,
        }
    }

    pub fn instances(&self) -> &[LineInstance] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Instances discarded because the batch was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn push_instance(&mut self, instance: LineInstance) {
        if self.instances.len() >= Self::MAX_INSTANCES {
            self.dropped += 1;
            return;
        }

        self.instances.push(instance);
    }

    fn push_segment(&mut self, matrix: &MatrixTransform, line: &Line) {
        let a = matrix.transform_point(Vec3::new(0.0, line.size / 2.0, 0.0));
        let b = matrix.transform_point(Vec3::new(0.0, -line.size / 2.0, 0.0));

        self.push_instance(LineInstance::new(
            a,
            b,
            line,
            line.thickness,
            SegmentShape::Rectangle,
            line.dash_size,
            0.0,
        ));
    }

    fn push_arrow(&mut self, matrix: &MatrixTransform, line: &Line) {
        let direction = matrix.transform_vector(Vec3::Y).normalize_or_zero();
        let start = matrix.origin();
        let end = start + direction * line.size;

        let head_thickness = line.thickness * 4.0;
        let head_length = head_thickness * 1.5;

        if line.size <= head_length {
            // Too short for a stem
            self.push_instance(LineInstance::new(
                start,
                end,
                line,
                head_thickness,
                SegmentShape::Triangle,
                0.0,
                0.0,
            ));
            return;
        }

        let stem_end = start + direction * (line.size - head_length);
        self.push_instance(LineInstance::new(
            start,
            stem_end,
            line,
            line.thickness,
            SegmentShape::Rectangle,
            line.dash_size,
            0.0,
        ));
        self.push_instance(LineInstance::new(
            stem_end,
            end,
            line,
            head_thickness,
            SegmentShape::Triangle,
            0.0,
            0.0,
        ));
    }

    fn push_circle(&mut self, matrix: &MatrixTransform, line: &Line) {
        let radius = line.size / 2.0;
        let points: Vec<Vec3> = (0..Self::CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f32 / Self::CIRCLE_SEGMENTS as f32;
                matrix.transform_point(Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()))
            })
            .collect();

        let mut dash_offset = 0.0;
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + points.len() - 1) % points.len()];

            self.push_instance(LineInstance::new(
                a,
                b,
                line,
                line.thickness,
                SegmentShape::Rectangle,
                line.dash_size,
                dash_offset,
            ));

            dash_offset += a.distance(b);
        }
    }
}

impl Default for LineBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<Line> for LineBatch {
    fn begin(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    fn draw(&mut self, transform: &MatrixTransform, line: &Line) {
        match line.style {
            LineStyle::Segment => self.push_segment(transform, line),
            LineStyle::Arrow => self.push_arrow(transform, line),
            LineStyle::Circle => self.push_circle(transform, line),
        }
    }

    fn end(&mut self) {
        if self.dropped > 0 {
            log::error!(
                "Line batch full: dropped {} instances past {}",
                self.dropped,
                Self::MAX_INSTANCES
            );
        }
    }
}
