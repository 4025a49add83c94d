use crate::spec::VarSpec;
use crate::stdvar::Stdvar;

/// Closed set of standard variables addressable in O(1) via [`StdIndices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum StdId {
    P,
    N,
    Ng,
    I,
    Cs,
    Cl,
    Os,
    Oi,
    S,
    T,
    U,
    V,
    Du,
    Dv,
    DPdu,
    DPdv,
    E,
    Time,
    Ncomps,
    Alpha,
    Ci,
    Z,
    St,
}

impl StdId {
    const COUNT: usize = 23;
}

/// Side table mapping each well-known [`StdId`] to its index within a
/// [`VarSet`], or `None` if that standard variable isn't present.
///
/// Built once when a `VarSet` is constructed; after that, looking up a
/// standard variable's slot is a single array read instead of a binary
/// search.
#[derive(Debug, Clone)]
pub struct StdIndices {
    indices: [Option<usize>; StdId::COUNT],
}

impl StdIndices {
    fn empty() -> Self {
        Self {
            indices: [None; StdId::COUNT],
        }
    }

    fn add(&mut self, index: usize, var: &VarSpec) {
        let id = if *var == Stdvar::p() {
            StdId::P
        } else if *var == Stdvar::n() {
            StdId::N
        } else if *var == Stdvar::ng() {
            StdId::Ng
        } else if *var == Stdvar::i() {
            StdId::I
        } else if *var == Stdvar::cs() {
            StdId::Cs
        } else if *var == Stdvar::cl() {
            StdId::Cl
        } else if *var == Stdvar::os() {
            StdId::Os
        } else if *var == Stdvar::oi() {
            StdId::Oi
        } else if *var == Stdvar::s() {
            StdId::S
        } else if *var == Stdvar::t() {
            StdId::T
        } else if *var == Stdvar::u() {
            StdId::U
        } else if *var == Stdvar::v() {
            StdId::V
        } else if *var == Stdvar::du() {
            StdId::Du
        } else if *var == Stdvar::dv() {
            StdId::Dv
        } else if *var == Stdvar::d_pdu() {
            StdId::DPdu
        } else if *var == Stdvar::d_pdv() {
            StdId::DPdv
        } else if *var == Stdvar::e() {
            StdId::E
        } else if *var == Stdvar::time() {
            StdId::Time
        } else if *var == Stdvar::ncomps() {
            StdId::Ncomps
        } else if *var == Stdvar::alpha() {
            StdId::Alpha
        } else if *var == Stdvar::ci() {
            StdId::Ci
        } else if *var == Stdvar::z() {
            StdId::Z
        } else if *var == Stdvar::st() {
            StdId::St
        } else {
            return;
        };
        self.indices[id as usize] = Some(index);
    }

    pub fn get(&self, id: StdId) -> Option<usize> {
        self.indices[id as usize]
    }

    pub fn contains(&self, id: StdId) -> bool {
        self.indices[id as usize].is_some()
    }
}

/// An immutable, sorted set of [`VarSpec`]s with O(1) lookup of the standard
/// variables and O(log n) lookup of arbitrary ones.
///
/// Construction sorts and deduplicates; callers that already have a sorted,
/// unique sequence should prefer [`VarSet::from_sorted`] to skip the sort.
#[derive(Debug, Clone)]
pub struct VarSet {
    vars: Vec<VarSpec>,
    std_indices: StdIndices,
}

impl VarSet {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            std_indices: StdIndices::empty(),
        }
    }

    /// Build a set from an unsorted, possibly-duplicate sequence of specs.
    pub fn from_unsorted(mut vars: Vec<VarSpec>) -> Self {
        vars.sort();
        vars.dedup();
        Self::from_sorted(vars)
    }

    /// Build a set from a sequence already sorted by `Ord`, with no
    /// duplicates. Debug-asserts the precondition; violating it in release
    /// builds produces a set with unreliable binary-search lookup.
    pub fn from_sorted(vars: Vec<VarSpec>) -> Self {
        debug_assert!(vars.windows(2).all(|w| w[0] < w[1]));
        let mut std_indices = StdIndices::empty();
        for (i, v) in vars.iter().enumerate() {
            std_indices.add(i, v);
        }
        Self { vars, std_indices }
    }

    pub fn std_indices(&self) -> &StdIndices {
        &self.std_indices
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VarSpec> {
        self.vars.iter()
    }

    pub fn get(&self, i: usize) -> &VarSpec {
        &self.vars[i]
    }

    /// Binary-search lookup by spec; `O(log n)`.
    pub fn find(&self, var: &VarSpec) -> Option<usize> {
        self.vars.binary_search(var).ok()
    }

    /// O(1) lookup by well-known id.
    pub fn find_std(&self, id: StdId) -> Option<usize> {
        self.std_indices.get(id)
    }

    pub fn contains(&self, var: &VarSpec) -> bool {
        self.vars.binary_search(var).is_ok()
    }

    pub fn contains_std(&self, id: StdId) -> bool {
        self.std_indices.contains(id)
    }
}

impl Default for VarSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a VarSet {
    type Item = &'a VarSpec;
    type IntoIter = std::slice::Iter<'a, VarSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::VarType;

    #[test]
    fn from_unsorted_sorts_and_dedups() {
        let set = VarSet::from_unsorted(vec![
            Stdvar::v(),
            Stdvar::p(),
            Stdvar::u(),
            Stdvar::p(),
        ]);
        assert_eq!(set.len(), 3);
        assert!(set.iter().is_sorted());
    }

    #[test]
    fn std_lookup_is_present_only_for_included_vars() {
        let set = VarSet::from_unsorted(vec![Stdvar::p(), Stdvar::u()]);
        assert!(set.contains_std(StdId::P));
        assert!(set.contains_std(StdId::U));
        assert!(!set.contains_std(StdId::N));
        assert!(set.find_std(StdId::V).is_none());
    }

    #[test]
    fn find_locates_non_standard_variable() {
        let custom = VarSpec::scalar(VarType::Float, "roughness");
        let set = VarSet::from_unsorted(vec![Stdvar::p(), custom.clone()]);
        assert!(set.contains(&custom));
        assert_eq!(set.get(set.find(&custom).unwrap()), &custom);
    }
}
