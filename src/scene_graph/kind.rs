use glam::Vec3;

use crate::camera::Camera;

/// Renderable content a node may carry.
///
/// The set is closed: traversal consumers match on it exhaustively, so a new
/// kind of renderable is added here rather than behind a trait object.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Camera(Camera),
    Line(Line),
    Surface(Surface),
}

impl Kind {
    pub fn as_camera(&self) -> Option<&Camera> {
        match self {
            Kind::Camera(camera) => Some(camera),
            Kind::Line(_) | Kind::Surface(_) => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Camera(_) => "camera",
            Kind::Line(_) => "line",
            Kind::Surface(_) => "surface",
        }
    }
}

impl From<Camera> for Kind {
    fn from(camera: Camera) -> Self {
        Kind::Camera(camera)
    }
}

impl From<Line> for Kind {
    fn from(line: Line) -> Self {
        Kind::Line(line)
    }
}

impl From<Surface> for Kind {
    fn from(surface: Surface) -> Self {
        Kind::Surface(surface)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Straight segment centred on the node, running along local Y
    #[default]
    Segment,
    /// Starts at the node origin and points along local Y
    Arrow,
    /// Ring in the local XZ plane
    Circle,
}

/// Line-like drawable. `size` is the length for segments and arrows and the
/// diameter for circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub style: LineStyle,
    pub color: Vec3,
    pub size: f32,
    pub thickness: f32,
    /// Zero draws a solid line
    pub dash_size: f32,
}

impl Line {
    const DEFAULT_THICKNESS: f32 = 0.1;

    fn styled(style: LineStyle, size: f32) -> Self {
        Self {
            style,
            color: Vec3::ZERO,
            size,
            thickness: Self::DEFAULT_THICKNESS,
            dash_size: 0.0,
        }
    }

    pub fn line(length: f32) -> Self {
        Self::styled(LineStyle::Segment, length)
    }

    pub fn arrow(length: f32) -> Self {
        Self::styled(LineStyle::Arrow, length)
    }

    pub fn circle(diameter: f32) -> Self {
        Self::styled(LineStyle::Circle, diameter)
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_dashes(mut self, dash_size: f32) -> Self {
        self.dash_size = dash_size;
        self
    }
}

/// Surface primitive blended into the body's implicit surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Half-extents along local X, Y and Z
    Ellipsoid(Vec3),
}

impl Surface {
    pub fn ellipsoid(x: f32, y: f32, z: f32) -> Self {
        Surface::Ellipsoid(Vec3::new(x, y, z))
    }

    pub fn sphere(radius: f32) -> Self {
        Surface::Ellipsoid(Vec3::splat(radius))
    }
}
