use glam::Vec3;

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub camera_position: Vec3,
    pub camera_fov: f32,
    pub camera_near_plane: f32,
    pub camera_far_plane: f32,
    /// Distance the camera travels per "move camera" command
    pub camera_step: Vec3,
    pub arrow_magnitude: f32,
    pub arrow_thickness: f32,
    pub sphere_radius: f32,
    pub aspect_ratio: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(-20.0, 20.0, -20.0),
            camera_fov: 90.0,
            camera_near_plane: 0.0001,
            camera_far_plane: 1000.0,
            camera_step: Vec3::new(0.0, 0.0, 10.0),
            arrow_magnitude: 10.0,
            arrow_thickness: 0.2,
            sphere_radius: 5.0,
            aspect_ratio: 1.0,
        }
    }
}
