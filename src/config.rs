use glam::Vec3;

/// Static viewer settings. Everything the user can change at runtime lives in
/// `ViewerState` instead.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub window_title: &'static str,
    pub window_size: (u32, u32),
    pub log_filter: &'static str,

    pub camera_distance: f32,
    pub camera_fov_deg: f32,

    pub mesh_color: [f32; 3],
    pub ambient_intensity: f32,
    pub light_position: Vec3,

    pub marker_color: [f32; 3],
    pub marker_radius: f32,
    pub marker_segments: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "MeshMemo",
            window_size: (1600, 900),
            log_filter: "info",

            camera_distance: 5.0,
            camera_fov_deg: 60.0,

            mesh_color: [1.0, 0.647, 0.0],
            ambient_intensity: 0.5,
            light_position: Vec3::new(10.0, 10.0, 10.0),

            marker_color: [1.0, 0.0, 0.0],
            marker_radius: 0.02,
            marker_segments: 16,
        }
    }
}
