//! Propagator S-matrices for homogeneous slabs.
//!
//! A slab of thickness h and refractive indices (n_x, n_y) transmits each
//! polarization channel with the phase factor exp(i n h 2 pi / lambda) and
//! reflects nothing, so its S-matrix is diagonal with entries
//! (p_x, p_y, p_x, p_y). A zero-thickness slab is the identity.

use nalgebra::{Complex, Matrix4, Vector4};
use ndarray::Array1;
use std::f32::consts::PI;

use crate::smatrix::SMat;


/// Builds the propagator S-matrix of a slab of thickness `height` across the
/// wavelength sweep.
pub fn slab(
    n_x: &Array1<Complex<f32>>,
    n_y: &Array1<Complex<f32>>,
    height: f32,
    wavelengths: &Array1<f32>,
) -> SMat {
    let slices = wavelengths
        .iter()
        .zip(n_x.iter().zip(n_y.iter()))
        .map(|(&wav, (&nx, &ny))| {
            let phase = 2.0 * PI * height / wav;
            let p_x = (Complex::new(0.0, 1.0) * nx * phase).exp();
            let p_y = (Complex::new(0.0, 1.0) * ny * phase).exp();
            Matrix4::from_diagonal(&Vector4::new(p_x, p_y, p_x, p_y))
        })
        .collect();
    SMat { slices }
}
