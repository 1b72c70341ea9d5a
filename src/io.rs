// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::path::Path;

use ndarray::{Array2, ShapeBuilder};

use crate::error::{EikonalError, Result};
use crate::field::{ArrivalTimeField, VelocityField};

/// MAT variable read by [`load_velocity`].
pub const VELOCITY_VAR: &str = "velocity";
/// MAT variable written by [`save_arrival_times`].
pub const TRAVELTIME_VAR: &str = "traveltime";

/// Supported file formats for field I/O.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// NumPy .npy format.
    Npy,
    /// MATLAB .mat format (Level 5).
    Mat,
}

/// Infer file format from extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => Ok(FileFormat::Npy),
        Some("mat") => Ok(FileFormat::Mat),
        Some(ext) => Err(EikonalError::UnsupportedFileFormat(ext.to_string())),
        None => Err(EikonalError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Load a 2D velocity field from a .npy file (f64, or f32 promoted to f64).
pub fn load_npy_velocity(path: &Path) -> Result<VelocityField> {
    let arr: Array2<f64> = match ndarray_npy::read_npy(path) {
        Ok(a) => a,
        Err(_) => {
            let arr32: Array2<f32> = ndarray_npy::read_npy(path)
                .map_err(|e| EikonalError::UnsupportedDtype(format!("{}", e)))?;
            arr32.mapv(f64::from)
        }
    };
    VelocityField::from_array(arr)
}

/// Load a 2D velocity field stored under `variable_name` in a .mat file.
///
/// MAT data is column-major; the returned field is indexed `(row, column)`
/// exactly as in MATLAB.
pub fn load_mat_velocity(path: &Path, variable_name: &str) -> Result<VelocityField> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mat = matfile::MatFile::parse(&mut reader)
        .map_err(|e| EikonalError::Other(format!("MAT parse error: {}", e)))?;

    let array = mat
        .find_by_name(variable_name)
        .ok_or_else(|| EikonalError::MatVariableNotFound {
            expected: variable_name.to_string(),
            available: mat.arrays().iter().map(|a| a.name().to_string()).collect(),
        })?;

    let data: Vec<f64> = match array.data() {
        matfile::NumericData::Double { real, imag: _ } => real.clone(),
        matfile::NumericData::Single { real, imag: _ } => {
            real.iter().map(|&v| f64::from(v)).collect()
        }
        _ => {
            return Err(EikonalError::UnsupportedDtype(
                "MAT file array is not f64 or f32".to_string(),
            ))
        }
    };

    let size: Vec<usize> = array.size().to_vec();
    if size.len() != 2 {
        return Err(EikonalError::Other(format!(
            "expected a 2D MAT array, got shape {:?}",
            size
        )));
    }

    let len = data.len();
    let arr = Array2::from_shape_vec((size[0], size[1]).f(), data).map_err(|_| {
        EikonalError::ShapeMismatch {
            expected: size.clone(),
            got: vec![len],
        }
    })?;
    VelocityField::from_array(arr)
}

/// Load a velocity field, inferring format from the extension.
/// MAT files must hold a variable named `velocity`.
pub fn load_velocity(path: &Path) -> Result<VelocityField> {
    match infer_format(path)? {
        FileFormat::Npy => load_npy_velocity(path),
        FileFormat::Mat => load_mat_velocity(path, VELOCITY_VAR),
    }
}

/// Save arrival times to a .npy file. Unreached cells are written as +inf.
pub fn save_npy(times: &ArrivalTimeField, path: &Path) -> Result<()> {
    ndarray_npy::write_npy(path, &times.to_array())
        .map_err(|e| EikonalError::Other(format!("npy write error: {}", e)))
}

/// Save arrival times to an uncompressed MAT Level 5 file as a single
/// `H x W` double matrix named `var_name`.
///
/// The `matfile` crate only reads, so the writer is implemented here.
/// See the MAT-File Format documentation:
/// <https://www.mathworks.com/help/pdf_doc/matlab/matfile_format.pdf>
pub fn save_mat(times: &ArrivalTimeField, path: &Path, var_name: &str) -> Result<()> {
    let arr = times.to_array();
    // Column-major: iterate the transposed view in logical order.
    let col_major: Vec<f64> = arr.t().iter().copied().collect();
    let [h, w] = times.shape();

    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    write_mat_level5(&mut out, var_name, &[h, w], &col_major)?;
    out.flush()?;
    Ok(())
}

/// Save arrival times, inferring format from the extension.
pub fn save_arrival_times(times: &ArrivalTimeField, path: &Path) -> Result<()> {
    match infer_format(path)? {
        FileFormat::Npy => save_npy(times, path),
        FileFormat::Mat => save_mat(times, path, TRAVELTIME_VAR),
    }
}

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;

/// Data elements are padded to 8-byte boundaries.
fn padded_len(len: usize) -> usize {
    len.div_ceil(8) * 8
}

/// Append one tagged data element (8-byte tag, payload, zero padding).
fn push_element(buf: &mut Vec<u8>, data_type: u32, payload: &[u8]) {
    buf.extend_from_slice(&data_type.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf.resize(buf.len() + padded_len(payload.len()) - payload.len(), 0);
}

fn write_mat_level5<W: Write>(
    w: &mut W,
    var_name: &str,
    dimensions: &[usize],
    data: &[f64],
) -> Result<()> {
    // 128-byte header: 116 bytes text, 8 bytes subsystem offset,
    // version 0x0100, endian indicator "IM" (little-endian).
    let mut header = [b' '; 128];
    let desc = b"MATLAB 5.0 MAT-file, created by eikonal-fsm";
    header[..desc.len()].copy_from_slice(desc);
    header[116..124].fill(0);
    header[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
    header[126..128].copy_from_slice(b"IM");
    w.write_all(&header)?;

    let mut body = Vec::with_capacity(64 + var_name.len() + data.len() * 8);

    let mut flags = Vec::with_capacity(8);
    flags.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
    flags.extend_from_slice(&0u32.to_le_bytes());
    push_element(&mut body, MI_UINT32, &flags);

    let dims: Vec<u8> = dimensions
        .iter()
        .flat_map(|&d| (d as i32).to_le_bytes())
        .collect();
    push_element(&mut body, MI_INT32, &dims);

    push_element(&mut body, MI_INT8, var_name.as_bytes());

    let real: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    push_element(&mut body, MI_DOUBLE, &real);

    w.write_all(&MI_MATRIX.to_le_bytes())?;
    w.write_all(&(body.len() as u32).to_le_bytes())?;
    w.write_all(&body)?;
    Ok(())
}
