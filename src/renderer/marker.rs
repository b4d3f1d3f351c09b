use bytemuck::{Pod, Zeroable};

const INITIAL_MARKER_CAPACITY: usize = 64;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MarkerInstance {
    pub position: [f32; 3],
}

/// One shared sphere plus a per-memo instance buffer.
pub struct MarkerBuffers {
    sphere_vertex_buffer: wgpu::Buffer,
    sphere_index_buffer: wgpu::Buffer,
    sphere_index_count: u32,

    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

impl MarkerBuffers {
    pub fn new(device: &wgpu::Device, radius: f32, segments: u32) -> Self {
        let (vertices, indices) = generate_sphere(radius, segments);

        let sphere_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Marker Sphere Vertex Buffer"),
            size: (vertices.len() * 4) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        sphere_vertex_buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::cast_slice(&vertices));
        sphere_vertex_buffer.unmap();

        let sphere_index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Marker Sphere Index Buffer"),
            size: (indices.len() * 4) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        sphere_index_buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::cast_slice(&indices));
        sphere_index_buffer.unmap();

        let instance_buffer = create_instance_buffer(device, INITIAL_MARKER_CAPACITY);

        Self {
            sphere_vertex_buffer,
            sphere_index_buffer,
            sphere_index_count: indices.len() as u32,
            instance_buffer,
            instance_capacity: INITIAL_MARKER_CAPACITY,
            instance_count: 0,
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[MarkerInstance]) {
        let capacity = grown_capacity(self.instance_capacity, instances.len());
        if capacity != self.instance_capacity {
            log::debug!("growing marker buffer to {capacity} instances");
            self.instance_buffer = create_instance_buffer(device, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.sphere_vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.sphere_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.sphere_index_count, 0, 0..self.instance_count);
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Marker Instance Buffer"),
        size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Smallest power-of-two capacity, never below `current`, that holds `needed`.
fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two()
    }
}

/// UV sphere centred on the origin: positions as flat `f32` triples, wound
/// counter-clockwise seen from outside.
pub fn generate_sphere(radius: f32, segments: u32) -> (Vec<f32>, Vec<u32>) {
    let segments = segments.max(3);
    let rings = segments;
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1) * 3) as usize);
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

    for r in 0..=rings {
        let theta = r as f32 / rings as f32 * std::f32::consts::PI;
        for s in 0..=segments {
            let phi = s as f32 / segments as f32 * std::f32::consts::TAU;
            vertices.extend_from_slice(&[
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            ]);
        }
    }

    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    (vertices, indices)
}

pub fn sphere_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

pub fn marker_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let (vertices, indices) = generate_sphere(0.02, 16);
        assert_eq!(vertices.len(), 17 * 17 * 3);
        assert_eq!(indices.len(), 16 * 16 * 6);
        for v in vertices.chunks_exact(3) {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 0.02).abs() < 1e-6);
        }
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len() / 3));
    }

    #[test]
    fn sphere_faces_outward_for_back_face_culling() {
        let (vertices, indices) = generate_sphere(1.0, 16);
        let at = |i: u32| {
            let i = i as usize * 3;
            glam::Vec3::new(vertices[i], vertices[i + 1], vertices[i + 2])
        };

        let mut faces = 0;
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (at(tri[0]), at(tri[1]), at(tri[2]));
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-6 {
                continue;
            }
            faces += 1;
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward face {tri:?}");
        }
        assert!(faces >= 16 * 16);
    }

    #[test]
    fn instance_capacity_grows_past_any_marker_count() {
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(64, 64), 64);
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(64, 5000), 8192);
    }
}
