use reyes_grid::Grid;
use reyes_varspec::StdId;

/// Fill in the standard variables a geometry's dice step left unset:
/// `Ng` from finite differences of `P`, `N` aliased to `Ng` (or computed
/// from `P` if `Ng` isn't present either), and `I` from `P` under the
/// camera-at-origin perspective convention.
pub fn derive_standard_variables(grid: &mut Grid) {
    let has_ng = grid.storage().view_for_std(StdId::Ng).is_some();
    let has_n = grid.storage().view_for_std(StdId::N).is_some();

    if has_ng {
        // `Ng` is always computed from finite differences of `P`, even if
        // the geometry also diced it: the grid's tangents are the
        // authoritative source.
        grid.calculate_normals();
    }
    if !has_n {
        // Nothing to alias into — `N` wasn't requested for this grid.
        return;
    }
    if has_ng {
        alias_n_to_ng(grid);
    } else {
        grid.calculate_normals();
    }
}

fn alias_n_to_ng(grid: &mut Grid) {
    let ng_view = grid.storage().view_for_std(StdId::Ng).unwrap();
    let n_view = grid.storage().view_for_std(StdId::N).unwrap();
    let n = grid.nu() * grid.nv();
    for i in 0..n {
        let ng = ng_view.get(grid.storage().raw(), i).to_vec();
        let slot = n_view.get_mut(grid.storage_mut().raw_mut(), i);
        slot.copy_from_slice(&ng);
    }
}
