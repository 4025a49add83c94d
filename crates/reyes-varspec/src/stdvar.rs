use crate::spec::{VarSpec, VarType};

/// Constructors for the renderer's standard environment variables.
///
/// These aren't `const`/`static` because [`VarSpec::name`] is an `Arc<str>`;
/// call sites that need the same standard variable spec repeatedly (e.g. the
/// geometry interface's attribute accessors) should cache the result rather
/// than call these in a loop.
pub struct Stdvar;

macro_rules! stdvar {
    ($fn_name:ident, $var_type:expr, $name:expr) => {
        pub fn $fn_name() -> VarSpec {
            VarSpec::scalar($var_type, $name)
        }
    };
}

impl Stdvar {
    stdvar!(alpha, VarType::Float, "alpha");
    stdvar!(ci, VarType::Color, "Ci");
    stdvar!(cl, VarType::Color, "Cl");
    stdvar!(cs, VarType::Color, "Cs");
    stdvar!(d_pdu, VarType::Vector, "dPdu");
    stdvar!(d_pdv, VarType::Vector, "dPdv");
    stdvar!(du, VarType::Float, "du");
    stdvar!(dv, VarType::Float, "dv");
    stdvar!(e, VarType::Point, "E");
    stdvar!(i, VarType::Vector, "I");
    stdvar!(l, VarType::Vector, "L");
    stdvar!(ncomps, VarType::Float, "ncomps");
    stdvar!(ng, VarType::Normal, "Ng");
    stdvar!(ns, VarType::Normal, "Ns");
    stdvar!(n, VarType::Normal, "N");
    stdvar!(oi, VarType::Color, "Oi");
    stdvar!(ol, VarType::Color, "Ol");
    stdvar!(os, VarType::Color, "Os");
    stdvar!(p, VarType::Point, "P");
    stdvar!(ps, VarType::Point, "Ps");
    stdvar!(s, VarType::Float, "s");
    stdvar!(time, VarType::Float, "time");
    stdvar!(t, VarType::Float, "t");
    stdvar!(u, VarType::Float, "u");
    stdvar!(v, VarType::Float, "v");
    stdvar!(st, VarType::Float, "st");
    stdvar!(z, VarType::Float, "z");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_variables_have_expected_types() {
        assert_eq!(Stdvar::p().var_type, VarType::Point);
        assert_eq!(Stdvar::n().var_type, VarType::Normal);
        assert_eq!(Stdvar::cs().var_type, VarType::Color);
        assert_eq!(Stdvar::u().scalar_size(), 1);
    }
}
