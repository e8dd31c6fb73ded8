//! Fresnel-like interface matrices between adjacent media.
//!
//! This module builds the local S-matrix of an abrupt boundary between two
//! media at normal incidence. The x and y polarization channels are
//! independent, so anisotropic media reduce to two scalar Fresnel problems
//! per wavelength.
//!
//! The interface construction provides:
//! - Transmission and reflection blocks from the normal-incidence Fresnel
//!   formulas, per wavelength and per channel
//! - Complex refractive index support for absorbing media
//! - Explicit detection of vanishing index-sum denominators
//! - The rotated-interface construction for media whose local coordinate
//!   frames differ by an in-plane rotation

use anyhow::Result;
use nalgebra::{Complex, Matrix4};
use ndarray::Array1;

use crate::config;
use crate::smatrix::SMat;
use crate::star;
use crate::symmetry;


/// Builds the interface S-matrix between an upstream medium (n1_x, n1_y)
/// and a downstream medium (n2_x, n2_y), per wavelength.
///
/// **Context**: At an abrupt boundary the field amplitudes on either side
/// are related by the normal-incidence Fresnel coefficients. Each
/// polarization channel sees its own index pair, so the matrix couples no
/// channels and every quadrant is diagonal.
///
/// **How it Works**: Per wavelength, T1 = 2 n1 / (n1 + n2) transmits
/// forward, T2 = 2 n2 / (n1 + n2) transmits backward, and
/// R = (n1 - n2) / (n1 + n2) reflects, entering the forward reflection
/// block with a sign flip. A vanishing denominator (perfectly opposite
/// indices) is surfaced as an error rather than propagating NaN.
pub fn plain(
    n1_x: &Array1<Complex<f32>>,
    n1_y: &Array1<Complex<f32>>,
    n2_x: &Array1<Complex<f32>>,
    n2_y: &Array1<Complex<f32>>,
) -> Result<SMat> {
    let mut slices = Vec::with_capacity(n1_x.len());
    for i in 0..n1_x.len() {
        let denom_x = n1_x[i] + n2_x[i];
        let denom_y = n1_y[i] + n2_y[i];
        if denom_x.norm_sqr() == 0.0 || denom_y.norm_sqr() == 0.0 {
            return Err(anyhow::anyhow!(
                "vanishing index sum at wavelength index {}: n1 + n2 = 0",
                i
            ));
        }
        let t1_x = n1_x[i] * 2.0 / denom_x;
        let t1_y = n1_y[i] * 2.0 / denom_y;
        let t2_x = n2_x[i] * 2.0 / denom_x;
        let t2_y = n2_y[i] * 2.0 / denom_y;
        let r_x = (n1_x[i] - n2_x[i]) / denom_x;
        let r_y = (n1_y[i] - n2_y[i]) / denom_y;
        let zero = Complex::ZERO;
        slices.push(Matrix4::new(
            t1_x, zero, r_x, zero, //
            zero, t1_y, zero, r_y, //
            -r_x, zero, t2_x, zero, //
            zero, -r_y, zero, t2_y, //
        ));
    }
    SMat::new(slices)
}

/// Builds the interface S-matrix between two media whose local coordinate
/// frames are rotated in-plane by `angle_1` and `angle_2`.
///
/// **Context**: The plain Fresnel formula assumes both media share one
/// coordinate frame. When either adjacent layer is rotated the frames
/// differ and the formula no longer applies directly.
///
/// **How it Works**: A zero-thickness reference medium of unit index is
/// sandwiched between the media. Each half interface is built against the
/// reference, rotated into its own layer's frame, and the two halves are
/// merged with the star product. The reference slab has no thickness, so it
/// contributes no phase and the construction reduces to the plain interface
/// when both angles vanish.
pub fn rotated(
    n1_x: &Array1<Complex<f32>>,
    n1_y: &Array1<Complex<f32>>,
    angle_1: f32,
    n2_x: &Array1<Complex<f32>>,
    n2_y: &Array1<Complex<f32>>,
    angle_2: f32,
) -> Result<SMat> {
    let reference = Array1::from_elem(n1_x.len(), config::REFERENCE_INDEX);
    let upstream = symmetry::rotate(plain(n1_x, n1_y, &reference, &reference)?, angle_1);
    let downstream = symmetry::rotate(plain(&reference, &reference, n2_x, n2_y)?, angle_2);
    star::combine(&upstream, &downstream)
}
