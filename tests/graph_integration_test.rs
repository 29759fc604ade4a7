//! End-to-end traversal of a small editing scene.

use bodygraph::rendering::{draw_graph, LineBatch, SurfaceBatch};
use bodygraph::{Camera, Kind, Line, MatrixTransform, Node, NodeTransform, RenderGraph, Surface};
use glam::Vec3;

#[test]
fn camera_then_arrow_are_visited_in_order() {
    let mut graph = RenderGraph::new();
    let camera = graph.push(Node::leaf(
        NodeTransform::from_position(Vec3::new(0.0, 0.0, -40.0)).unwrap(),
        Camera::new(90.0),
    ));
    graph.push(Node::leaf(NodeTransform::IDENTITY, Line::arrow(10.0)));
    graph.set_active_camera(camera);

    let mut visits = Vec::new();
    graph.walk(|world, kind| visits.push((world, kind.clone())));

    assert_eq!(visits.len(), 2, "expected exactly two payload visits");

    let (camera_world, camera_kind) = &visits[0];
    assert!(matches!(camera_kind, Kind::Camera(_)));
    assert!(camera_world
        .origin()
        .abs_diff_eq(Vec3::new(0.0, 0.0, -40.0), 1e-5));

    let (line_world, line_kind) = &visits[1];
    assert_eq!(line_kind, &Kind::Line(Line::arrow(10.0)));
    assert!(line_world.abs_diff_eq(&MatrixTransform::IDENTITY, 1e-6));

    let parameters = graph.camera_parameters();
    assert!(parameters
        .camera_position
        .abs_diff_eq(Vec3::new(0.0, 0.0, -40.0), 1e-5));
}

#[test]
fn frame_drives_both_backends() {
    let mut graph = RenderGraph::new();
    let group = graph.push(Node::group(
        NodeTransform::from_position(Vec3::new(0.0, 3.0, 0.0)).unwrap(),
        [
            Node::leaf(NodeTransform::IDENTITY, Surface::sphere(2.0)),
            Node::leaf(NodeTransform::IDENTITY, Line::circle(4.0)),
        ],
    ));
    graph.append(group, Node::leaf(NodeTransform::IDENTITY, Line::line(1.0)));

    let mut lines = LineBatch::new();
    let mut surfaces = SurfaceBatch::new();
    let stats = draw_graph(&graph, &mut lines, &mut surfaces);

    assert_eq!(stats.lines, 2);
    assert_eq!(stats.surfaces, 1);
    assert_eq!(lines.instances().len(), LineBatch::CIRCLE_SEGMENTS + 1);

    let inside = surfaces.sample(Vec3::new(0.0, 3.0, 0.0)).unwrap();
    let outside = surfaces.sample(Vec3::ZERO).unwrap();
    assert!(inside < 0.0);
    assert!(outside > 0.0);
}
