use glam::Vec3;

use crate::camera::{Camera, CameraUniform};
use crate::config::EditorConfig;
use crate::error::{GraphError, TransformError};
use crate::rendering::{draw_graph, FrameStats, Pipeline};
use crate::scene_graph::{Line, Node, NodeBuilder, NodeId, NodeTransform, RenderGraph, Surface};

/// Red X, green Y and blue Z arrows meeting at the origin.
pub fn cardinal_arrows(magnitude: f32, thickness: f32) -> Result<Node, TransformError> {
    let arrow = |rotation: Vec3, color: Vec3| -> Result<Node, TransformError> {
        Ok(Node::leaf(
            NodeTransform::from_rotation(rotation)?,
            Line::arrow(magnitude).with_color(color).with_thickness(thickness),
        ))
    };

    Ok(NodeBuilder::new(NodeTransform::IDENTITY)
        .child(arrow(Vec3::new(0.0, 0.0, -90.0), Vec3::X)?)
        .child(arrow(Vec3::ZERO, Vec3::Y)?)
        .child(arrow(Vec3::new(90.0, 0.0, 0.0), Vec3::Z)?)
        .build())
}

pub struct FrameOutput {
    pub stats: FrameStats,
    pub uniform: CameraUniform,
}

/// One body-editing session: the graph plus the commands the host UI issues.
pub struct BodyEditor {
    pub graph: RenderGraph,
    config: EditorConfig,
    camera: NodeId,
    camera_target: NodeId,
}

impl BodyEditor {
    pub fn new(config: EditorConfig) -> Result<Self, GraphError> {
        let mut graph = RenderGraph::with_aspect_ratio(config.aspect_ratio);

        let camera = Camera::new(config.camera_fov)
            .with_planes(config.camera_near_plane, config.camera_far_plane);
        let eye = NodeTransform::from_position(config.camera_position)?;
        let camera = graph.push(Node::leaf(eye, camera));
        let camera_target = graph.push(Node::empty(NodeTransform::IDENTITY));
        graph.look_at(camera, camera_target)?;
        graph.set_active_camera(camera);

        graph.push(cardinal_arrows(config.arrow_magnitude, config.arrow_thickness)?);

        log::info!("Body editor ready with {} nodes", graph.len());

        Ok(Self {
            graph,
            config,
            camera,
            camera_target,
        })
    }

    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn camera_target(&self) -> NodeId {
        self.camera_target
    }

    pub fn add_sphere(&mut self) -> NodeId {
        self.graph.push(Node::leaf(
            NodeTransform::IDENTITY,
            Surface::sphere(self.config.sphere_radius),
        ))
    }

    pub fn move_camera(&mut self) -> Result<(), GraphError> {
        self.graph.translate_active_camera(self.config.camera_step)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.graph.resize(width, height);
    }

    /// Draws the graph into the given backends and packs this frame's camera
    /// uniform.
    pub fn frame(
        &self,
        lines: &mut impl Pipeline<Line>,
        surfaces: &mut impl Pipeline<Surface>,
    ) -> Result<FrameOutput, GraphError> {
        let stats = draw_graph(&self.graph, lines, surfaces);
        let parameters = self.graph.try_camera_parameters()?;

        Ok(FrameOutput {
            stats,
            uniform: CameraUniform::from_parameters(&parameters),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::{LineBatch, SurfaceBatch};

    #[test]
    fn starts_with_camera_target_and_axes() {
        let editor = BodyEditor::new(EditorConfig::default()).unwrap();
        // root, camera, target, arrow group, three arrows
        assert_eq!(editor.graph.len(), 7);
        assert_eq!(editor.graph.active_camera(), Some(editor.camera()));

        let parameters = editor.graph.camera_parameters();
        assert!(parameters.camera_position.abs_diff_eq(Vec3::new(-20.0, 20.0, -20.0), 1e-3));

        // The target projects to the centre of the screen.
        let centre = parameters.view_projection.project_point3(Vec3::ZERO);
        assert!(centre.x.abs() < 1e-3 && centre.y.abs() < 1e-3);
    }

    #[test]
    fn rejects_non_finite_camera_position() {
        let config = EditorConfig {
            camera_position: Vec3::new(f32::NAN, 20.0, -20.0),
            ..EditorConfig::default()
        };
        assert!(matches!(
            BodyEditor::new(config),
            Err(GraphError::Transform(TransformError::NonFinite(_)))
        ));
    }

    #[test]
    fn arrows_point_along_their_axes() {
        let axes = cardinal_arrows(10.0, 0.2).unwrap();
        let tips: Vec<Vec3> = axes
            .children()
            .iter()
            .map(|arrow| arrow.transform.matrix().transform_vector(Vec3::Y) * 10.0)
            .collect();

        assert!(tips[0].abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-4));
        assert!(tips[1].abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), 1e-4));
        assert!(tips[2].abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-4));
    }

    #[test]
    fn commands_change_the_next_frame() {
        let mut editor = BodyEditor::new(EditorConfig::default()).unwrap();
        let mut lines = LineBatch::new();
        let mut surfaces = SurfaceBatch::new();

        let before = editor.frame(&mut lines, &mut surfaces).unwrap();
        assert_eq!(before.stats.lines, 3);
        assert_eq!(before.stats.surfaces, 0);
        assert_eq!(lines.instances().len(), 6);

        editor.add_sphere();
        editor.move_camera().unwrap();
        editor.resize(800, 400);

        let after = editor.frame(&mut lines, &mut surfaces).unwrap();
        assert_eq!(after.stats.surfaces, 1);
        let on_sphere = surfaces.sample(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(on_sphere.map(|v| v.abs() < 1e-5), Some(true));
        assert!(after
            .uniform
            .camera_position()
            .abs_diff_eq(Vec3::new(-20.0, 20.0, -10.0), 1e-3));
        assert_ne!(before.uniform.view_proj(), after.uniform.view_proj());
    }
}
