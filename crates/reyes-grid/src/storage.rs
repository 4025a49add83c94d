use reyes_varspec::{StdId, VarSet, VarSpec};

/// A view onto one variable's slice of a [`GridStorage`] buffer: `offset`
/// into the buffer, `el_size` scalars per element, and `stride` scalars
/// between elements (`0` for a uniform variable, so every element reads the
/// same `el_size` floats).
#[derive(Debug, Clone, Copy)]
pub struct FvecView {
    pub offset: usize,
    pub el_size: usize,
    pub stride: usize,
}

impl FvecView {
    /// Slice of the `i`th element's scalars within `storage`.
    pub fn get<'a>(&self, storage: &'a [f32], i: usize) -> &'a [f32] {
        let start = self.offset + self.stride * i;
        &storage[start..start + self.el_size]
    }

    pub fn get_mut<'a>(&self, storage: &'a mut [f32], i: usize) -> &'a mut [f32] {
        let start = self.offset + self.stride * i;
        &mut storage[start..start + self.el_size]
    }

    pub fn is_uniform(&self) -> bool {
        self.stride == 0
    }
}

/// Whether a grid variable's storage class is uniform (constant across the
/// grid) or varying (one value per shading point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorClass {
    Uniform,
    Varying,
}

/// Packed storage for every variable attached to one dice grid: a single
/// contiguous `float` buffer plus a per-variable [`FvecView`] into it.
///
/// Built exclusively through [`GridStorageBuilder`]; once built, the set of
/// variables and their offsets are fixed — only the floats may be
/// overwritten.
#[derive(Debug, Clone)]
pub struct GridStorage {
    storage: Vec<f32>,
    views: Vec<FvecView>,
    vars: VarSet,
    nverts: usize,
}

impl GridStorage {
    pub fn var_set(&self) -> &VarSet {
        &self.vars
    }

    pub fn nverts(&self) -> usize {
        self.nverts
    }

    pub fn view(&self, i: usize) -> FvecView {
        self.views[i]
    }

    pub fn view_for(&self, spec: &VarSpec) -> Option<FvecView> {
        self.vars.find(spec).map(|i| self.views[i])
    }

    pub fn view_for_std(&self, id: StdId) -> Option<FvecView> {
        self.vars.find_std(id).map(|i| self.views[i])
    }

    pub fn raw(&self) -> &[f32] {
        &self.storage
    }

    pub fn raw_mut(&mut self) -> &mut [f32] {
        &mut self.storage
    }

    pub fn get(&self, i: usize, vert: usize) -> &[f32] {
        self.views[i].get(&self.storage, vert)
    }

    pub fn get_mut(&mut self, i: usize, vert: usize) -> &mut [f32] {
        self.views[i].get_mut(&mut self.storage, vert)
    }

    /// Maximum number of scalars needed to hold any one variable's element,
    /// used to size scratch buffers during dicing (e.g. a `matrix` primvar
    /// needs 16 floats of scratch, a `color` only 3).
    pub fn max_aggregate_size(&self) -> usize {
        self.views.iter().map(|v| v.el_size).max().unwrap_or(0)
    }

    /// Convenience accessor for the standard position variable; panics if
    /// `P` isn't present, which should never happen for a grid that reached
    /// the sampler (every grid's storage is built with `P` required).
    pub fn p(&self) -> FvecView {
        self.view_for_std(StdId::P)
            .expect("grid storage missing required P variable")
    }
}

struct GvarInitSpec {
    spec: VarSpec,
    uniform: bool,
    precedence: u32,
}

impl GvarInitSpec {
    fn storage_size(&self, nverts: usize) -> usize {
        (if self.uniform { 1 } else { nverts }) * self.spec.scalar_size()
    }
}

/// Collects the set of variables a grid needs before allocating its packed
/// storage in one shot.
///
/// Variables may be added twice (once from the shader's declared
/// requirements, once from the geometry's dice step); on a spec clash the
/// variable added after calling [`GridStorageBuilder::set_from_geom`] wins,
/// so the geometry always controls whether a standard variable ends up
/// uniform or varying on the grid.
pub struct GridStorageBuilder {
    vars: Vec<GvarInitSpec>,
    precedence: u32,
}

impl GridStorageBuilder {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            precedence: 0,
        }
    }

    /// Subsequent `add` calls come from the geometry's dice step and take
    /// precedence over earlier (shader-declared) additions of the same spec.
    pub fn set_from_geom(&mut self) {
        self.precedence = 1;
    }

    pub fn add(&mut self, spec: VarSpec, class: StorClass) {
        self.vars.push(GvarInitSpec {
            spec,
            uniform: class == StorClass::Uniform,
            precedence: self.precedence,
        });
    }

    pub fn build(mut self, nverts: usize) -> GridStorage {
        self.vars.sort_by(|a, b| a.spec.cmp(&b.spec));
        // Dedup by spec equality, keeping the higher-precedence entry.
        let mut deduped: Vec<GvarInitSpec> = Vec::with_capacity(self.vars.len());
        for var in self.vars {
            match deduped.last_mut() {
                Some(last) if last.spec == var.spec => {
                    if var.precedence > last.precedence {
                        *last = var;
                    }
                }
                _ => deduped.push(var),
            }
        }

        let total: usize = deduped.iter().map(|v| v.storage_size(nverts)).sum();
        let storage = vec![0.0f32; total];
        let mut views = Vec::with_capacity(deduped.len());
        let mut offset = 0;
        for var in &deduped {
            let el_size = var.spec.scalar_size();
            let stride = if var.uniform { 0 } else { el_size };
            views.push(FvecView {
                offset,
                el_size,
                stride,
            });
            offset += var.storage_size(nverts);
        }
        debug_assert_eq!(offset, total);

        let vars = VarSet::from_sorted(deduped.into_iter().map(|v| v.spec).collect());
        GridStorage {
            storage,
            views,
            vars,
            nverts,
        }
    }
}

impl Default for GridStorageBuilder {
    fn default() -> Self {
        Self::new()
    }
}
