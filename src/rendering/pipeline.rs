use crate::scene_graph::{Kind, Line, MatrixTransform, RenderGraph, Surface};

/// Backend that batches one kind of drawable per frame.
///
/// Per frame, `begin` is called at most once, then `draw` once per node of
/// the kind in traversal order, then `end` exactly once.
pub trait Pipeline<T> {
    fn begin(&mut self);
    fn draw(&mut self, transform: &MatrixTransform, item: &T);
    fn end(&mut self);
}

/// How many nodes of each kind one frame visited.
///
/// A zero `lines` or `surfaces` count means that backend was not bracketed
/// this frame and still holds whatever it batched last.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub cameras: usize,
    pub lines: usize,
    pub surfaces: usize,
}

/// Drawables gathered by a single walk, grouped by kind and kept in
/// traversal order.
#[derive(Default)]
pub struct DrawList<'a> {
    pub lines: Vec<(MatrixTransform, &'a Line)>,
    pub surfaces: Vec<(MatrixTransform, &'a Surface)>,
    pub cameras: usize,
}

impl<'a> DrawList<'a> {
    pub fn gather(graph: &'a RenderGraph) -> Self {
        let mut list = DrawList::default();

        graph.walk(|world, kind| match kind {
            Kind::Camera(_) => list.cameras += 1,
            Kind::Line(line) => list.lines.push((world, line)),
            Kind::Surface(surface) => list.surfaces.push((world, surface)),
        });

        list
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            cameras: self.cameras,
            lines: self.lines.len(),
            surfaces: self.surfaces.len(),
        }
    }
}

fn submit<T>(pipeline: &mut impl Pipeline<T>, items: &[(MatrixTransform, &T)]) {
    if items.is_empty() {
        return;
    }

    pipeline.begin();
    for (transform, item) in items {
        pipeline.draw(transform, item);
    }
    pipeline.end();
}

/// Walks the graph once and feeds its drawables to the backends, lines
/// first, then surfaces. A kind with nothing to draw is left untouched, so
/// its backend keeps the previous frame's batch; check the returned
/// [`FrameStats`] before reading one back.
pub fn draw_graph(
    graph: &RenderGraph,
    lines: &mut impl Pipeline<Line>,
    surfaces: &mut impl Pipeline<Surface>,
) -> FrameStats {
    let list = DrawList::gather(graph);

    submit(lines, &list.lines);
    submit(surfaces, &list.surfaces);

    let stats = list.stats();
    log::trace!("Frame drawn: {:?}", stats);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::rendering::{LineBatch, SurfaceBatch};
    use crate::scene_graph::{Node, NodeTransform};
    use glam::Vec3;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin(&'static str),
        Draw(&'static str, Vec3),
        End(&'static str),
    }

    struct Recorder<'a> {
        name: &'static str,
        calls: &'a std::cell::RefCell<Vec<Call>>,
    }

    impl<T> Pipeline<T> for Recorder<'_> {
        fn begin(&mut self) {
            self.calls.borrow_mut().push(Call::Begin(self.name));
        }

        fn draw(&mut self, transform: &MatrixTransform, _item: &T) {
            self.calls.borrow_mut().push(Call::Draw(self.name, transform.origin()));
        }

        fn end(&mut self) {
            self.calls.borrow_mut().push(Call::End(self.name));
        }
    }

    fn at(x: f32) -> NodeTransform {
        NodeTransform::from_position(Vec3::new(x, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn batches_are_bracketed_and_never_interleave() {
        let mut graph = RenderGraph::new();
        graph.push(Node::leaf(at(0.0), Camera::new(90.0)));
        graph.push(Node::leaf(at(1.0), Line::line(1.0)));
        graph.push(Node::leaf(at(2.0), Surface::sphere(1.0)));
        graph.push(Node::leaf(at(3.0), Line::arrow(1.0)));

        let calls = std::cell::RefCell::new(Vec::new());
        let stats = draw_graph(
            &graph,
            &mut Recorder { name: "lines", calls: &calls },
            &mut Recorder { name: "surfaces", calls: &calls },
        );

        assert_eq!(
            stats,
            FrameStats {
                cameras: 1,
                lines: 2,
                surfaces: 1
            }
        );
        assert_eq!(
            calls.into_inner(),
            vec![
                Call::Begin("lines"),
                Call::Draw("lines", Vec3::new(1.0, 0.0, 0.0)),
                Call::Draw("lines", Vec3::new(3.0, 0.0, 0.0)),
                Call::End("lines"),
                Call::Begin("surfaces"),
                Call::Draw("surfaces", Vec3::new(2.0, 0.0, 0.0)),
                Call::End("surfaces"),
            ]
        );
    }

    #[test]
    fn kinds_without_nodes_get_no_batch() {
        let mut graph = RenderGraph::new();
        graph.push(Node::leaf(at(1.0), Line::circle(2.0)));

        let calls = std::cell::RefCell::new(Vec::new());
        draw_graph(
            &graph,
            &mut Recorder { name: "lines", calls: &calls },
            &mut Recorder { name: "surfaces", calls: &calls },
        );

        let calls = calls.into_inner();
        assert_eq!(calls.len(), 3);
        assert!(!calls.contains(&Call::Begin("surfaces")));
    }

    #[test]
    fn untouched_batch_keeps_last_frame() {
        let mut lines = LineBatch::new();
        let mut surfaces = SurfaceBatch::new();

        let mut graph = RenderGraph::new();
        graph.push(Node::leaf(at(1.0), Line::line(2.0)));
        graph.push(Node::leaf(at(2.0), Surface::sphere(1.0)));
        let first = draw_graph(&graph, &mut lines, &mut surfaces);
        assert_eq!((first.lines, first.surfaces), (1, 1));

        let second = draw_graph(&RenderGraph::new(), &mut lines, &mut surfaces);
        assert_eq!(second, FrameStats::default());
        assert_eq!(lines.instances().len(), 1);
        assert_eq!(surfaces.len(), 1);
    }
}
