use std::sync::Arc;

use reyes_math::{Box3, Mat4, Vec3};
use reyes_primvar::PrimvarStore;

use crate::geometry::{Geometry, TessellationContext};
use crate::patch::BilinearPatch;

/// A convex polygon mesh. The only implemented split decomposes quad faces
/// into one [`BilinearPatch`] each; non-quad faces are skipped with a
/// warning rather than attempted.
pub struct PolygonMesh {
    positions: Vec<Vec3>,
    faces: Vec<Vec<usize>>,
}

impl PolygonMesh {
    pub fn new(positions: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Self {
        Self { positions, faces }
    }
}

impl Geometry for PolygonMesh {
    fn bound(&self) -> Box3 {
        Box3::from_points(self.positions.iter().copied())
    }

    fn motion_compatible(&self, other: &dyn Geometry) -> bool {
        other
            .as_any()
            .downcast_ref::<PolygonMesh>()
            .is_some_and(|m| m.faces.len() == self.faces.len())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn tessellate(&self, _trans: Mat4, ctx: &mut dyn TessellationContext) -> anyhow::Result<()> {
        for face in &self.faces {
            if face.len() != 4 {
                tracing::warn!(
                    target: "reyes_geom",
                    face_verts = face.len(),
                    "unimplemented face kind: only quad faces split into patches"
                );
                continue;
            }
            let corners = [
                self.positions[face[0]],
                self.positions[face[1]],
                self.positions[face[3]],
                self.positions[face[2]],
            ];
            let patch = BilinearPatch::new(corners, PrimvarStore::new());
            ctx.push_geometry(Arc::new(patch));
        }
        Ok(())
    }

    fn transform(&mut self, m: Mat4) {
        for p in &mut self.positions {
            *p = m.transform_point3(*p);
        }
    }
}
