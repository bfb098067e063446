use std::{fs, path::Path};

use safetensors::{Dtype, SafeTensors, View};

use super::NamedArray;
use crate::{MlErr, Result};

/// Reads every tensor of a `.safetensors` file, all of which must be `F32`.
pub(super) fn read(path: &Path) -> Result<Vec<NamedArray>> {
    let bytes = fs::read(path).map_err(|source| MlErr::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| MlErr::InvalidArchive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    tensors
        .tensors()
        .into_iter()
        .map(|(name, view)| {
            if view.dtype() != Dtype::F32 {
                return Err(MlErr::InvalidArchive {
                    path: path.to_path_buf(),
                    reason: format!("'{name}' is {:?}, expected F32", view.dtype()),
                });
            }

            let shape = View::shape(&view).to_vec();
            let data = decode_le(view.data());
            Ok((name, shape, data))
        })
        .collect()
}

/// Safetensors stores little endian values with no alignment guarantee.
fn decode_le(bytes: &[u8]) -> Vec<f32> {
    if cfg!(target_endian = "little") {
        if let Ok(values) = bytemuck::try_cast_slice::<u8, f32>(bytes) {
            return values.to_vec();
        }
    }

    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
