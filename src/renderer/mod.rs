pub mod camera;
pub mod gpu;
pub mod marker;

pub use camera::Camera;
pub use gpu::GpuState;
