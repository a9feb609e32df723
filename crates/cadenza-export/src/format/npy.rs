//! NumPy `.npy` array files
//!
//! Feature maps are stored as float32 NPY in C order through `ndarray-npy`,
//! so training code can `np.load` or memory-map them directly. Reading
//! accepts any 2-D `f4` array, including Fortran-ordered ones.

use crate::atomic::atomic_write;
use crate::error::{ExportError, Result};
use cadenza_core::SpectralMap;
use ndarray::{Array2, ArrayView2};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Write a map as a `(frequency_bins, time_frames)` float32 array.
pub fn write_npy(path: &Path, map: &SpectralMap) -> Result<()> {
    atomic_write(path, |w| encode_npy(w, map))
}

/// Encode a map into NPY bytes.
pub fn encode_npy<W: Write>(out: W, map: &SpectralMap) -> Result<()> {
    let view = ArrayView2::from_shape(map.shape(), map.as_slice())
        .map_err(|e| ExportError::InvalidData(e.to_string()))?;
    view.write_npy(out)?;
    Ok(())
}

/// Load a 2-D float32 NPY file written by [`write_npy`] (or NumPy).
pub fn read_npy(path: &Path) -> Result<SpectralMap> {
    let file = File::open(path)?;
    decode_npy(BufReader::new(file))
}

/// Decode NPY bytes into a map.
pub fn decode_npy<R: Read>(input: R) -> Result<SpectralMap> {
    let array = Array2::<f32>::read_npy(input)?;
    let (bins, frames) = array.dim();
    // Logical order, whatever the stored layout
    let data = array.iter().copied().collect();
    Ok(SpectralMap::from_vec(bins, frames, data)?)
}
