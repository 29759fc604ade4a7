use glam::{Mat4, Vec3, Vec4};

/// Perspective camera payload. `fov` is the vertical field of view in
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Camera {
    pub const DEFAULT_NEAR_PLANE: f32 = 0.0001;
    pub const DEFAULT_FAR_PLANE: f32 = 1000.0;

    pub fn new(fov: f32) -> Self {
        Self {
            fov,
            near_plane: Self::DEFAULT_NEAR_PLANE,
            far_plane: Self::DEFAULT_FAR_PLANE,
        }
    }

    pub fn with_planes(mut self, near_plane: f32, far_plane: f32) -> Self {
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self
    }

    /// Symmetric left-handed perspective with depth mapped to `0..1`.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        let ys = 1.0 / (self.fov.to_radians() * 0.5).tan();
        let xs = ys / aspect_ratio;
        let zs = self.far_plane / (self.far_plane - self.near_plane);

        Mat4::from_cols(
            Vec4::new(xs, 0.0, 0.0, 0.0),
            Vec4::new(0.0, ys, 0.0, 0.0),
            Vec4::new(0.0, 0.0, zs, 1.0),
            Vec4::new(0.0, 0.0, -self.near_plane * zs, 0.0),
        )
    }
}

/// Per-frame camera data derived from the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParameters {
    pub view_projection: Mat4,
    pub camera_position: Vec3,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
    camera_position: Vec3,
    _padding: f32,
}

impl CameraUniform {
    pub fn from_parameters(parameters: &CameraParameters) -> Self {
        let mut uniform = Self::default();
        uniform.update(parameters);
        uniform
    }

    pub fn update(&mut self, parameters: &CameraParameters) {
        self.view_proj = parameters.view_projection;
        self.camera_position = parameters.camera_position;
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
