use glam::Vec3;

use crate::memo::{MemoId, MemoStore};
use crate::mesh::model::Mesh;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickHit {
    Surface(Vec3),
    Marker(MemoId),
}

/// Nearest thing under the ray. Markers compete with the surface on distance,
/// so a marker sitting on the surface wins over the triangles behind it.
pub fn pick(ray: &Ray, mesh: Option<&Mesh>, memos: &MemoStore, marker_radius: f32) -> Option<PickHit> {
    let surface = mesh.and_then(|m| raycast_mesh(ray, m)).map(|t| (t, PickHit::Surface(ray.at(t))));

    let marker = memos
        .iter()
        .filter_map(|memo| {
            ray_sphere_intersect(ray, memo.position, marker_radius).map(|t| (t, PickHit::Marker(memo.id)))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match (surface, marker) {
        (Some(s), Some(m)) => Some(if m.0 <= s.0 { m.1 } else { s.1 }),
        (s, m) => s.or(m).map(|(_, hit)| hit),
    }
}

pub fn raycast_mesh(ray: &Ray, mesh: &Mesh) -> Option<f32> {
    mesh.mesh
        .triangles()
        .filter_map(|[v0, v1, v2]| ray_triangle_intersect(ray, v0, v1, v2))
        .min_by(f32::total_cmp)
}

/// Möller–Trumbore, double sided.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

pub fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_d = disc.sqrt();
    let near = -b - sqrt_d;
    let far = -b + sqrt_d;
    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::model::TriangleMesh;

    /// Unit quad in the z = 0 plane facing +z.
    fn quad() -> Mesh {
        let a = Vec3::new(-1.0, -1.0, 0.0);
        let b = Vec3::new(1.0, -1.0, 0.0);
        let c = Vec3::new(1.0, 1.0, 0.0);
        let d = Vec3::new(-1.0, 1.0, 0.0);
        Mesh::normalized(TriangleMesh::from_triangles(&[[a, b, c], [a, c, d]])).unwrap()
    }

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 5.0), Vec3::NEG_Z)
    }

    #[test]
    fn triangle_hit_distance() {
        let ray = down_z(0.2, 0.2);
        let t = ray_triangle_intersect(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
        assert!(ray_triangle_intersect(&down_z(0.8, 0.8), Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn sphere_hit_from_outside_and_inside() {
        let ray = down_z(0.0, 0.0);
        let t = ray_sphere_intersect(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((ray_sphere_intersect(&inside, Vec3::ZERO, 1.0).unwrap() - 1.0).abs() < 1e-5);
        assert!(ray_sphere_intersect(&down_z(3.0, 0.0), Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn surface_pick_returns_hit_point() {
        let mesh = quad();
        let hit = pick(&down_z(0.3, 0.1), Some(&mesh), &MemoStore::default(), 0.02);
        match hit {
            Some(PickHit::Surface(p)) => {
                assert!((p - Vec3::new(0.3, 0.1, 0.0)).length() < 1e-4);
            }
            other => panic!("expected surface hit, got {other:?}"),
        }
    }

    #[test]
    fn marker_wins_over_surface_behind_it() {
        let mesh = quad();
        let mut memos = MemoStore::default();
        let id = memos.create(Vec3::new(0.3, 0.1, 0.0), "crack").unwrap();

        let hit = pick(&down_z(0.3, 0.1), Some(&mesh), &memos, 0.02);
        assert_eq!(hit, Some(PickHit::Marker(id)));

        let elsewhere = pick(&down_z(-0.5, -0.5), Some(&mesh), &memos, 0.02);
        assert!(matches!(elsewhere, Some(PickHit::Surface(_))));
    }

    #[test]
    fn miss_returns_none() {
        assert_eq!(pick(&down_z(5.0, 5.0), Some(&quad()), &MemoStore::default(), 0.02), None);
        assert_eq!(pick(&down_z(0.0, 0.0), None, &MemoStore::default(), 0.02), None);
    }
}
