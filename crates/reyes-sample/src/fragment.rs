use reyes_varspec::{StdId, VarSet};

/// A fixed-layout output record: one `f32` slot per scalar component of the
/// render's output variables, at the offsets `VarSet`'s backing views
/// assign. Defaults to all zeros except `z`, which defaults to `+inf` to
/// match a sample that's never been hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    data: Vec<f32>,
}

impl Fragment {
    /// Builds a zeroed fragment sized to `output_vars`'s total scalar size,
    /// seeding the `z` slot (if present) to `+inf`.
    pub fn new(output_vars: &VarSet) -> Self {
        let len: usize = output_vars.iter().map(|v| v.scalar_size()).sum();
        let mut data = vec![0.0f32; len];
        if let Some(z_spec) = output_vars.find_std(StdId::Z) {
            let offset = offset_of(output_vars, z_spec);
            data[offset] = f32::INFINITY;
        }
        Self { data }
    }

    pub fn reset(&mut self, output_vars: &VarSet) {
        self.data.fill(0.0);
        if let Some(z_spec) = output_vars.find_std(StdId::Z) {
            let offset = offset_of(output_vars, z_spec);
            self.data[offset] = f32::INFINITY;
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

fn offset_of(vars: &VarSet, index: usize) -> usize {
    vars.iter().take(index).map(|v| v.scalar_size()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_varspec::{Stdvar, VarSpec, VarType};

    #[test]
    fn fragment_defaults_z_to_infinity_and_others_to_zero() {
        let vars = VarSet::from_unsorted(vec![Stdvar::ci(), Stdvar::z()]);
        let frag = Fragment::new(&vars);
        let z_spec = vars.get(vars.find_std(StdId::Z).unwrap());
        let z_offset = offset_of(&vars, vars.find(z_spec).unwrap());
        assert_eq!(frag.as_slice()[z_offset], f32::INFINITY);
        assert_eq!(frag.as_slice().iter().filter(|&&x| x == 0.0).count(), 3);
    }

    #[test]
    fn fragment_length_matches_total_scalar_size() {
        let vars = VarSet::from_unsorted(vec![VarSpec::scalar(VarType::Color, "Ci")]);
        let frag = Fragment::new(&vars);
        assert_eq!(frag.as_slice().len(), 3);
    }
}
