use std::path::Path;

use npyz::{Order, npz::NpzArchive};

use super::NamedArray;
use crate::{MlErr, Result};

/// Reads every `f32` array of a NumPy `.npz` archive, in archive order.
pub(super) fn read(path: &Path) -> Result<Vec<NamedArray>> {
    let mut archive = NpzArchive::open(path).map_err(|source| MlErr::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let names: Vec<String> = archive.array_names().map(str::to_owned).collect();

    names
        .into_iter()
        .map(|name| {
            let npy = archive
                .by_name(&name)
                .map_err(|e| invalid(path, format!("'{name}': {e}")))?
                .ok_or_else(|| invalid(path, format!("'{name}' is listed but missing")))?;

            if npy.order() != Order::C {
                return Err(invalid(path, format!("'{name}' is stored in Fortran order")));
            }

            let shape = npy.shape().iter().map(|&d| d as usize).collect();
            let data = npy
                .into_vec::<f32>()
                .map_err(|e| invalid(path, format!("'{name}': {e}")))?;

            Ok((name, shape, data))
        })
        .collect()
}

fn invalid(path: &Path, reason: String) -> MlErr {
    MlErr::InvalidArchive {
        path: path.to_path_buf(),
        reason,
    }
}
