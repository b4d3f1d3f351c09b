use glam::Vec3;

/// Triangle soup as uploaded to the GPU: three `f32` per vertex, one facet
/// normal repeated per corner, and sequential `u32` indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub mesh: TriangleMesh,
    pub bounds: BoundingSphere,
}

impl TriangleMesh {
    pub fn from_triangles(triangles: &[[Vec3; 3]]) -> Self {
        let mut vertices = Vec::with_capacity(triangles.len() * 9);
        let mut normals = Vec::with_capacity(triangles.len() * 9);

        for tri in triangles {
            let n = facet_normal(tri);
            for v in tri {
                vertices.extend_from_slice(&v.to_array());
                normals.extend_from_slice(&n.to_array());
            }
        }

        let indices = (0..(triangles.len() * 3) as u32).collect();

        Self {
            vertices,
            normals,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.vertices[i * 3..i * 3 + 3])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|idx| {
            [
                self.vertex(idx[0] as usize),
                self.vertex(idx[1] as usize),
                self.vertex(idx[2] as usize),
            ]
        })
    }

    /// Centre of the axis-aligned box, radius to the farthest vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.vertices.is_empty() {
            return BoundingSphere {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in self.vertices.chunks_exact(3) {
            let v = Vec3::from_slice(v);
            min = min.min(v);
            max = max.max(v);
        }
        let center = (min + max) * 0.5;

        let radius_sq = self
            .vertices
            .chunks_exact(3)
            .map(|v| Vec3::from_slice(v).distance_squared(center))
            .fold(0.0_f32, f32::max);

        BoundingSphere {
            center,
            radius: radius_sq.sqrt(),
        }
    }

    fn transform(&mut self, offset: Vec3, scale: f32) {
        for v in self.vertices.chunks_exact_mut(3) {
            let p = (Vec3::from_slice(v) + offset) * scale;
            v.copy_from_slice(&p.to_array());
        }
    }
}

impl Mesh {
    /// Moves the bounding-sphere centre to the origin and scales the radius to
    /// one. Returns `None` when the geometry has no extent to scale.
    pub fn normalized(mut mesh: TriangleMesh) -> Option<Self> {
        let original = mesh.bounding_sphere();
        if !(original.radius.is_finite() && original.radius > f32::EPSILON) {
            return None;
        }

        mesh.transform(-original.center, 1.0 / original.radius);
        let bounds = mesh.bounding_sphere();

        Some(Self { mesh, bounds })
    }
}

fn facet_normal(tri: &[Vec3; 3]) -> Vec3 {
    let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
    n.try_normalize().unwrap_or(Vec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn offset_tetra() -> TriangleMesh {
        let a = Vec3::new(10.0, 10.0, 10.0);
        let b = Vec3::new(14.0, 10.0, 10.0);
        let c = Vec3::new(10.0, 13.0, 10.0);
        let d = Vec3::new(10.0, 10.0, 12.0);
        TriangleMesh::from_triangles(&[[a, c, b], [a, b, d], [a, d, c], [b, c, d]])
    }

    #[test]
    fn normalization_centers_and_scales_to_unit_radius() {
        let mesh = Mesh::normalized(offset_tetra()).unwrap();
        assert!(mesh.bounds.center.length() < 1e-5);
        assert!(approx(mesh.bounds.radius, 1.0));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = Mesh::normalized(offset_tetra()).unwrap();
        let twice = Mesh::normalized(once.mesh.clone()).unwrap();
        assert!(twice.bounds.center.length() < 1e-5);
        assert!(approx(twice.bounds.radius, 1.0));
        for (a, b) in once.mesh.vertices.iter().zip(&twice.mesh.vertices) {
            assert!(approx(*a, *b));
        }
    }

    #[test]
    fn zero_extent_geometry_is_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let mesh = TriangleMesh::from_triangles(&[[p, p, p]]);
        assert!(Mesh::normalized(mesh).is_none());
        assert!(Mesh::normalized(TriangleMesh::default()).is_none());
    }

    #[test]
    fn facet_normal_follows_right_hand_rule() {
        let mesh = TriangleMesh::from_triangles(&[[Vec3::ZERO, Vec3::X, Vec3::Y]]);
        assert_eq!(&mesh.normals[0..3], &[0.0, 0.0, 1.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.triangle_count(), 1);
    }
}
