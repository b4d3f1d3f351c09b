//! Sculpt brush parameters and the brush capability.
//!
//! No deformation algorithm ships yet: `PlaceholderBrush` records the request
//! and leaves the geometry alone.

use crate::mesh::Mesh;

pub const BRUSH_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;
pub const INTENSITY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushKind {
    #[default]
    Pull,
    Push,
    Smooth,
    Flatten,
}

impl BrushKind {
    pub const ALL: [BrushKind; 4] = [
        BrushKind::Pull,
        BrushKind::Push,
        BrushKind::Smooth,
        BrushKind::Flatten,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BrushKind::Pull => "Pull",
            BrushKind::Push => "Push",
            BrushKind::Smooth => "Smooth",
            BrushKind::Flatten => "Flatten",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SculptParams {
    pub brush_size: u32,
    pub intensity: f32,
    pub kind: BrushKind,
}

impl Default for SculptParams {
    fn default() -> Self {
        Self {
            brush_size: 20,
            intensity: 0.5,
            kind: BrushKind::Pull,
        }
    }
}

impl SculptParams {
    pub fn clamped(self) -> Self {
        Self {
            brush_size: self
                .brush_size
                .clamp(*BRUSH_SIZE_RANGE.start(), *BRUSH_SIZE_RANGE.end()),
            intensity: self
                .intensity
                .clamp(*INTENSITY_RANGE.start(), *INTENSITY_RANGE.end()),
            kind: self.kind,
        }
    }
}

pub enum SculptOutcome {
    Unchanged,
    Deformed(Mesh),
}

pub trait SculptBrush: Send + Sync {
    fn apply(&self, _mesh: &Mesh, _params: &SculptParams) -> SculptOutcome {
        SculptOutcome::Unchanged
    }

    fn cancel(&self) {}
}

pub struct PlaceholderBrush;

impl SculptBrush for PlaceholderBrush {
    fn apply(&self, mesh: &Mesh, params: &SculptParams) -> SculptOutcome {
        log::info!(
            "sculpt {:?} requested (size {}, intensity {:.1}) on {} triangles; brush not implemented",
            params.kind,
            params.brush_size,
            params.intensity,
            mesh.mesh.triangle_count()
        );
        SculptOutcome::Unchanged
    }

    fn cancel(&self) {
        log::info!("sculpt cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriangleMesh;
    use glam::Vec3;

    #[test]
    fn params_clamp_into_slider_ranges() {
        let p = SculptParams {
            brush_size: 0,
            intensity: 3.0,
            kind: BrushKind::Smooth,
        }
        .clamped();
        assert_eq!(p.brush_size, 1);
        assert_eq!(p.intensity, 1.0);
        assert_eq!(p.kind, BrushKind::Smooth);

        assert_eq!(SculptParams { brush_size: 500, ..Default::default() }.clamped().brush_size, 100);
    }

    #[test]
    fn placeholder_leaves_geometry_alone() {
        let mesh =
            Mesh::normalized(TriangleMesh::from_triangles(&[[Vec3::ZERO, Vec3::X, Vec3::Y]])).unwrap();
        let outcome = PlaceholderBrush.apply(&mesh, &SculptParams::default());
        assert!(matches!(outcome, SculptOutcome::Unchanged));
    }
}
