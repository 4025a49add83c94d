use std::sync::Arc;

use reyes_grid::{Grid, StorClass};
use reyes_math::{Box3, Mat4, Vec3};
use reyes_primvar::{InterpClass, PrimvarStore};
use reyes_varspec::Stdvar;

use crate::geometry::{Geometry, TessellationContext};

/// Four corner values of one primvar, in the order `(u0,v0), (u1,v0),
/// (u0,v1), (u1,v1)` — the layout every varying/vertex/facevarying/
/// facevertex primvar on a patch takes, since a patch has exactly one face
/// and four control points.
fn bilerp_corners(corners: &[f32], scalar_size: usize, u: f32, v: f32) -> Vec<f32> {
    let a = &corners[0..scalar_size];
    let b = &corners[scalar_size..2 * scalar_size];
    let c = &corners[2 * scalar_size..3 * scalar_size];
    let d = &corners[3 * scalar_size..4 * scalar_size];
    (0..scalar_size)
        .map(|i| reyes_math::bilerp(a[i], b[i], c[i], d[i], u, v))
        .collect()
}

/// A bilinear patch: the hull of four control points, with a set of
/// constant/uniform/varying/vertex primvars over the single face. Splitting
/// never reinterpolates the original corner data — it only narrows the
/// `(u, v)` sub-range dicing and further splitting are evaluated over, which
/// is equivalent for a bilinear surface.
#[derive(Clone)]
pub struct BilinearPatch {
    corners: [Vec3; 4],
    primvars: Arc<PrimvarStore>,
    u_range: (f32, f32),
    v_range: (f32, f32),
    force_count: u32,
}

impl BilinearPatch {
    pub fn new(corners: [Vec3; 4], primvars: PrimvarStore) -> Self {
        Self {
            corners,
            primvars: Arc::new(primvars),
            u_range: (0.0, 1.0),
            v_range: (0.0, 1.0),
            force_count: 0,
        }
    }

    fn corner_floats(&self) -> [f32; 12] {
        let mut out = [0.0f32; 12];
        for (i, c) in self.corners.iter().enumerate() {
            out[i * 3] = c.x;
            out[i * 3 + 1] = c.y;
            out[i * 3 + 2] = c.z;
        }
        out
    }

    fn eval_p(&self, u: f32, v: f32) -> Vec3 {
        let floats = self.corner_floats();
        let r = bilerp_corners(&floats, 3, u, v);
        Vec3::new(r[0], r[1], r[2])
    }

    /// Corner points of the current sub-range, in `(u0,v0), (u1,v0),
    /// (u0,v1), (u1,v1)` order.
    fn sub_range_corners(&self) -> [Vec3; 4] {
        let (u0, u1) = self.u_range;
        let (v0, v1) = self.v_range;
        [
            self.eval_p(u0, v0),
            self.eval_p(u1, v0),
            self.eval_p(u0, v1),
            self.eval_p(u1, v1),
        ]
    }

    fn split_child(&self, u_range: (f32, f32), v_range: (f32, f32), force_count: u32) -> Self {
        Self {
            corners: self.corners,
            primvars: self.primvars.clone(),
            u_range,
            v_range,
            force_count,
        }
    }
}

impl Geometry for BilinearPatch {
    fn bound(&self) -> Box3 {
        Box3::from_points(self.corners)
    }

    fn motion_compatible(&self, other: &dyn Geometry) -> bool {
        other.as_any().downcast_ref::<BilinearPatch>().is_some()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn tessellate(&self, trans: Mat4, ctx: &mut dyn TessellationContext) -> anyhow::Result<()> {
        let [p00, p10, p01, p11] = self.sub_range_corners();
        let tp = |p: Vec3| trans.transform_point3(p);
        let (t00, t10, t01, t11) = (tp(p00), tp(p10), tp(p01), tp(p11));

        let lu = (t10 - t00).length().max((t11 - t01).length()) / ctx.poly_length();
        let lv = (t01 - t00).length().max((t11 - t10).length()) / ctx.poly_length();
        let grid_size = ctx.grid_size() as f32;

        if !ctx.force_split() && lu <= grid_size && lv <= grid_size {
            let nu = (lu.ceil() as u32 + 2).max(2) as usize;
            let nv = (lv.ceil() as u32 + 2).max(2) as usize;
            self.dice(nu, nv, ctx)
        } else {
            let split_u = if ctx.force_split() {
                ctx.force_split_count() % 2 == 0
            } else {
                lu >= lv
            };
            self.split(split_u, ctx)
        }
    }

    fn transform(&mut self, m: Mat4) {
        for c in &mut self.corners {
            *c = m.transform_point3(*c);
        }
    }
}

impl BilinearPatch {
    fn split(&self, split_u: bool, ctx: &mut dyn TessellationContext) -> anyhow::Result<()> {
        let next_force_count = self.force_count + 1;
        let (left, right) = if split_u {
            let (u0, u1) = self.u_range;
            let mid = 0.5 * (u0 + u1);
            (
                self.split_child((u0, mid), self.v_range, next_force_count),
                self.split_child((mid, u1), self.v_range, next_force_count),
            )
        } else {
            let (v0, v1) = self.v_range;
            let mid = 0.5 * (v0 + v1);
            (
                self.split_child(self.u_range, (v0, mid), next_force_count),
                self.split_child(self.u_range, (mid, v1), next_force_count),
            )
        };
        ctx.push_geometry(Arc::new(left));
        ctx.push_geometry(Arc::new(right));
        Ok(())
    }

    fn dice(&self, nu: usize, nv: usize, ctx: &mut dyn TessellationContext) -> anyhow::Result<()> {
        let mut builder = std::mem::take(ctx.grid_storage_builder());
        builder.set_from_geom();
        builder.add(Stdvar::p(), StorClass::Varying);
        for var in self.primvars.iter() {
            let class = match var.class {
                InterpClass::Constant | InterpClass::Uniform => StorClass::Uniform,
                _ => StorClass::Varying,
            };
            builder.add(var.spec.clone(), class);
        }
        let storage = builder.build(nu * nv);
        let mut grid = Grid::new(nu, nv, storage);

        let (u0, u1) = self.u_range;
        let (v0, v1) = self.v_range;
        let p_view = grid.storage().view_for(&Stdvar::p()).unwrap();
        for vi in 0..nv {
            let v = v0 + (v1 - v0) * (vi as f32 / (nv - 1) as f32);
            for ui in 0..nu {
                let u = u0 + (u1 - u0) * (ui as f32 / (nu - 1) as f32);
                let p = self.eval_p(u, v);
                let idx = grid.index(ui, vi);
                let slot = p_view.get_mut(grid.storage_mut().raw_mut(), idx);
                slot.copy_from_slice(&[p.x, p.y, p.z]);
            }
        }

        for var in self.primvars.iter() {
            let view = grid.storage().view_for(&var.spec).unwrap();
            let scalar_size = var.spec.scalar_size();
            match var.class {
                InterpClass::Constant | InterpClass::Uniform => {
                    let slot = view.get_mut(grid.storage_mut().raw_mut(), 0);
                    slot.copy_from_slice(var.data());
                }
                _ => {
                    for vi in 0..nv {
                        let v = v0 + (v1 - v0) * (vi as f32 / (nv - 1) as f32);
                        for ui in 0..nu {
                            let u = u0 + (u1 - u0) * (ui as f32 / (nu - 1) as f32);
                            let values = bilerp_corners(var.data(), scalar_size, u, v);
                            let idx = grid.index(ui, vi);
                            let slot = view.get_mut(grid.storage_mut().raw_mut(), idx);
                            slot.copy_from_slice(&values);
                        }
                    }
                }
            }
        }

        ctx.push_grid(grid);
        Ok(())
    }
}
