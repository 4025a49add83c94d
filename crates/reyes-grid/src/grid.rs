use glam::{Mat4, Vec3};
use reyes_varspec::StdId;

use crate::storage::GridStorage;

/// The four shading-point indices of one micropolygon, in the convention
/// `(u,v), (u+1,v), (u+1,v+1), (u,v+1)` (lower-left, lower-right,
/// upper-right, upper-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicroQuadIndices {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

/// A rectangular `(nu x nv)` lattice of shading points backed by one
/// [`GridStorage`].
///
/// Invariant: `nu >= 2 && nv >= 2` — a grid always has at least one row and
/// column of micropolygons.
#[derive(Debug, Clone)]
pub struct Grid {
    nu: usize,
    nv: usize,
    storage: GridStorage,
}

impl Grid {
    pub fn new(nu: usize, nv: usize, storage: GridStorage) -> Self {
        assert!(nu >= 2 && nv >= 2, "grid must have nu, nv >= 2, got ({nu}, {nv})");
        assert_eq!(storage.nverts(), nu * nv);
        Self { nu, nv, storage }
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn nv(&self) -> usize {
        self.nv
    }

    pub fn storage(&self) -> &GridStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut GridStorage {
        &mut self.storage
    }

    /// Vertex index of lattice position `(u, v)` in the flattened storage.
    pub fn index(&self, u: usize, v: usize) -> usize {
        self.nu * v + u
    }

    /// The four corner indices of the micropolygon whose lower-left lattice
    /// position is `(u, v)`, for `u in 0..nu-1`, `v in 0..nv-1`.
    pub fn quad_indices(&self, u: usize, v: usize) -> MicroQuadIndices {
        MicroQuadIndices {
            a: self.index(u, v),
            b: self.index(u + 1, v),
            c: self.index(u + 1, v + 1),
            d: self.index(u, v + 1),
        }
    }

    /// Iterate the `(nu-1) x (nv-1)` micropolygons in row-major order.
    pub fn iter_quads(&self) -> impl Iterator<Item = (usize, usize, MicroQuadIndices)> + '_ {
        (0..self.nv - 1).flat_map(move |v| {
            (0..self.nu - 1).map(move |u| (u, v, self.quad_indices(u, v)))
        })
    }

    /// Recompute the geometric normal `N` at every lattice point from the
    /// cross product of the local `u`/`v` tangents of `P`.
    ///
    /// Edge lattice points (where a forward or backward difference would run
    /// off the grid) use the available one-sided difference.
    pub fn calculate_normals(&mut self) {
        let p_view = self.storage.p();
        let n_view = match self.storage.view_for_std(StdId::N) {
            Some(v) => v,
            None => return,
        };
        let nu = self.nu;
        let nv = self.nv;

        let mut normals = vec![Vec3::ZERO; nu * nv];
        for v in 0..nv {
            for u in 0..nu {
                let p_at = |uu: usize, vv: usize| -> Vec3 {
                    let slice = p_view.get(self.storage.raw(), self.index(uu, vv));
                    Vec3::new(slice[0], slice[1], slice[2])
                };
                let p0 = p_at(u, v);
                let du = if u + 1 < nu {
                    p_at(u + 1, v) - p0
                } else {
                    p0 - p_at(u - 1, v)
                };
                let dv = if v + 1 < nv {
                    p_at(u, v + 1) - p0
                } else {
                    p0 - p_at(u, v - 1)
                };
                normals[self.index(u, v)] = du.cross(dv);
            }
        }
        for (i, n) in normals.into_iter().enumerate() {
            let slot = n_view.get_mut(self.storage.raw_mut(), i);
            slot.copy_from_slice(&[n.x, n.y, n.z]);
        }
    }

    /// Project every `P` value by `m`, preserving camera-space `z` (needed
    /// downstream for depth sorting and occlusion even after the point has
    /// moved into raster space).
    pub fn project(&mut self, m: Mat4) {
        let p_view = self.storage.p();
        let n = self.nu * self.nv;
        for i in 0..n {
            let slot = p_view.get_mut(self.storage.raw_mut(), i);
            let z = slot[2];
            let projected = m.transform_point3(Vec3::new(slot[0], slot[1], slot[2]));
            slot[0] = projected.x;
            slot[1] = projected.y;
            slot[2] = z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GridStorageBuilder, StorClass};
    use reyes_varspec::Stdvar;

    fn flat_grid(nu: usize, nv: usize) -> Grid {
        let mut builder = GridStorageBuilder::new();
        builder.add(Stdvar::p(), StorClass::Varying);
        builder.add(Stdvar::n(), StorClass::Varying);
        let mut storage = builder.build(nu * nv);
        let p_view = storage.view_for(&Stdvar::p()).unwrap();
        for v in 0..nv {
            for u in 0..nu {
                let i = nu * v + u;
                let slot = p_view.get_mut(storage.raw_mut(), i);
                slot.copy_from_slice(&[u as f32, v as f32, 0.0]);
            }
        }
        Grid::new(nu, nv, storage)
    }

    #[test]
    fn quad_indices_follow_row_major_layout() {
        let grid = flat_grid(3, 2);
        assert_eq!(
            grid.quad_indices(1, 0),
            MicroQuadIndices { a: 1, b: 2, c: 5, d: 4 }
        );
    }

    #[test]
    fn iter_quads_covers_nu_minus_one_by_nv_minus_one_polys() {
        let grid = flat_grid(4, 3);
        let count = grid.iter_quads().count();
        assert_eq!(count, 3 * 2);
    }

    #[test]
    fn calculate_normals_points_along_z_for_planar_xy_grid() {
        let mut grid = flat_grid(3, 3);
        grid.calculate_normals();
        let n_view = grid.storage().view_for_std(StdId::N).unwrap();
        let slot = n_view.get(grid.storage().raw(), grid.index(1, 1));
        assert!(slot[2].abs() > 0.0);
    }

    #[test]
    #[should_panic]
    fn new_rejects_degenerate_dimension() {
        let mut builder = GridStorageBuilder::new();
        builder.add(Stdvar::p(), StorClass::Varying);
        let storage = builder.build(2);
        Grid::new(1, 2, storage);
    }
}
