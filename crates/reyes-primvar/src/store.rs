use reyes_varspec::{VarSpec, VarType};

use crate::class::{InterpClass, Topology};

#[derive(Debug, thiserror::Error)]
pub enum PrimvarError {
    #[error("primvar {spec} has {actual} scalar values, expected {expected} for class {class:?} over this topology")]
    LengthMismatch {
        spec: VarSpec,
        class: InterpClass,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate primvar {0}")]
    Duplicate(VarSpec),
}

/// One typed, interpolation-class-tagged variable array attached to a
/// surface.
#[derive(Debug, Clone)]
pub struct Primvar {
    pub spec: VarSpec,
    pub class: InterpClass,
    data: Vec<f32>,
}

impl Primvar {
    pub fn new(
        spec: VarSpec,
        class: InterpClass,
        data: Vec<f32>,
        topology: &dyn Topology,
    ) -> Result<Self, PrimvarError> {
        let expected = spec.scalar_size() * topology.elem_count(class);
        if data.len() != expected {
            return Err(PrimvarError::LengthMismatch {
                spec,
                class,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { spec, class, data })
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn element_count(&self) -> usize {
        self.data.len() / self.spec.scalar_size()
    }

    /// Project homogeneous-point (`x,y,z,w`) data down to `point` (`x/w,
    /// y/w, z/w`) data in place. Called on any `Hpoint` primvar before
    /// dicing, per the renderer's input convention that homogeneous points
    /// never reach the grid.
    pub fn project_hpoint_to_point(&mut self) {
        assert_eq!(self.spec.var_type, VarType::Hpoint);
        let n = self.element_count();
        let mut projected = Vec::with_capacity(n * 3);
        for i in 0..n {
            let base = i * 4;
            let w = self.data[base + 3];
            projected.push(self.data[base] / w);
            projected.push(self.data[base + 1] / w);
            projected.push(self.data[base + 2] / w);
        }
        self.spec = VarSpec::new(VarType::Point, self.spec.array_size, self.spec.name.clone());
        self.data = projected;
    }
}

/// The set of primvars attached to one surface, keyed by spec.
#[derive(Debug, Clone, Default)]
pub struct PrimvarStore {
    vars: Vec<Primvar>,
}

impl PrimvarStore {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn insert(&mut self, var: Primvar) -> Result<(), PrimvarError> {
        if self.vars.iter().any(|v| v.spec == var.spec) {
            return Err(PrimvarError::Duplicate(var.spec));
        }
        self.vars.push(var);
        Ok(())
    }

    pub fn get(&self, spec: &VarSpec) -> Option<&Primvar> {
        self.vars.iter().find(|v| &v.spec == spec)
    }

    pub fn get_mut(&mut self, spec: &VarSpec) -> Option<&mut Primvar> {
        self.vars.iter_mut().find(|v| &v.spec == spec)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primvar> {
        self.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Project every `Hpoint` primvar in the store to `Point`, per the
    /// renderer's "Hpoint never reaches the grid" convention.
    pub fn project_hpoints(&mut self) {
        for v in &mut self.vars {
            if v.spec.var_type == VarType::Hpoint {
                v.project_hpoint_to_point();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::PatchTopology;
    use reyes_varspec::Stdvar;

    #[test]
    fn new_rejects_wrong_length_for_class() {
        let err = Primvar::new(Stdvar::p(), InterpClass::Vertex, vec![0.0; 6], &PatchTopology)
            .unwrap_err();
        assert!(matches!(err, PrimvarError::LengthMismatch { expected: 12, actual: 6, .. }));
    }

    #[test]
    fn constant_class_holds_one_element() {
        let cs = Primvar::new(Stdvar::cs(), InterpClass::Constant, vec![1.0, 1.0, 1.0], &PatchTopology)
            .unwrap();
        assert_eq!(cs.element_count(), 1);
    }

    #[test]
    fn store_rejects_duplicate_spec() {
        let mut store = PrimvarStore::new();
        let p = Primvar::new(
            Stdvar::p(),
            InterpClass::Vertex,
            vec![0.0; 12],
            &PatchTopology,
        )
        .unwrap();
        store.insert(p.clone()).unwrap();
        assert!(matches!(store.insert(p), Err(PrimvarError::Duplicate(_))));
    }

    #[test]
    fn project_hpoint_divides_by_w() {
        use reyes_varspec::VarType;
        let hp = VarSpec::scalar(VarType::Hpoint, "P");
        let mut var = Primvar::new(hp, InterpClass::Vertex, vec![2.0, 4.0, 6.0, 2.0], &PatchTopologyOne)
            .unwrap();
        var.project_hpoint_to_point();
        assert_eq!(var.spec.var_type, VarType::Point);
        assert_eq!(var.data(), &[1.0, 2.0, 3.0]);
    }

    struct PatchTopologyOne;
    impl Topology for PatchTopologyOne {
        fn elem_count(&self, _class: InterpClass) -> usize {
            1
        }
    }
}
