//! Wavelength-resolved scattering matrices.
//!
//! An [`SMat`] holds one 4x4 complex scattering matrix per wavelength of
//! the sweep. The port order is (x-forward, y-forward, x-backward,
//! y-backward): the upper-left and lower-right 2x2 blocks are the forward
//! and backward transmission sub-blocks, the upper-right and lower-left
//! blocks are the reflection sub-blocks.

use anyhow::Result;
use nalgebra::{Complex, Matrix2, Matrix4};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;


/// Scattering matrix resolved along the wavelength sweep, one 4x4 slice per
/// wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SMat {
    pub slices: Vec<Matrix4<Complex<f32>>>,
}

impl SMat {
    /// Creates a wavelength-resolved S-matrix from its per-wavelength slices.
    pub fn new(slices: Vec<Matrix4<Complex<f32>>>) -> Result<Self> {
        if slices.is_empty() {
            return Err(anyhow::anyhow!(
                "an S-matrix must contain at least one wavelength slice"
            ));
        }
        Ok(Self { slices })
    }

    /// The identity S-matrix (unit transmission, zero reflection) repeated
    /// over `len` wavelengths.
    pub fn identity(len: usize) -> Self {
        Self {
            slices: vec![Matrix4::identity(); len],
        }
    }

    /// Number of wavelength slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Expands a length-1 S-matrix across a sweep of length `len`. A matrix
    /// already of length `len` passes through unchanged.
    pub fn broadcast(self, len: usize) -> Result<Self> {
        if self.len() == len {
            Ok(self)
        } else if self.len() == 1 {
            Ok(Self {
                slices: vec![self.slices[0]; len],
            })
        } else {
            Err(anyhow::anyhow!(
                "cannot broadcast S-matrix of {} slices to sweep length {}",
                self.len(),
                len
            ))
        }
    }

    /// Intensity transmittance of the forward x and y channels, shape
    /// [len, 2]. Cross-polarized power is attributed to the incident
    /// channel.
    pub fn transmittance(&self) -> Array2<f32> {
        Array2::from_shape_fn((self.len(), 2), |(i, j)| {
            let tf = self.slices[i].fixed_view::<2, 2>(0, 0).into_owned();
            tf.column(j).iter().map(|c| c.norm_sqr()).sum()
        })
    }

    /// Intensity reflectance of the forward x and y channels, shape
    /// [len, 2].
    pub fn reflectance(&self) -> Array2<f32> {
        Array2::from_shape_fn((self.len(), 2), |(i, j)| {
            let rf = self.slices[i].fixed_view::<2, 2>(2, 0).into_owned();
            rf.column(j).iter().map(|c| c.norm_sqr()).sum()
        })
    }
}

impl Index<usize> for SMat {
    type Output = Matrix4<Complex<f32>>;

    fn index(&self, i: usize) -> &Self::Output {
        &self.slices[i]
    }
}

/// The four 2x2 quadrants of a single S-matrix slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Blocks {
    /// Forward transmission, rows 0..2, cols 0..2.
    pub tf: Matrix2<Complex<f32>>,
    /// Backward-to-forward reflection, rows 0..2, cols 2..4.
    pub rb: Matrix2<Complex<f32>>,
    /// Forward-to-backward reflection, rows 2..4, cols 0..2.
    pub rf: Matrix2<Complex<f32>>,
    /// Backward transmission, rows 2..4, cols 2..4.
    pub tb: Matrix2<Complex<f32>>,
}

/// Splits a slice into its four quadrants.
pub fn split(m: &Matrix4<Complex<f32>>) -> Blocks {
    Blocks {
        tf: m.fixed_view::<2, 2>(0, 0).into_owned(),
        rb: m.fixed_view::<2, 2>(0, 2).into_owned(),
        rf: m.fixed_view::<2, 2>(2, 0).into_owned(),
        tb: m.fixed_view::<2, 2>(2, 2).into_owned(),
    }
}

/// Reassembles a slice from its four quadrants.
pub fn assemble(blocks: &Blocks) -> Matrix4<Complex<f32>> {
    let mut m = Matrix4::zeros();
    m.fixed_view_mut::<2, 2>(0, 0).copy_from(&blocks.tf);
    m.fixed_view_mut::<2, 2>(0, 2).copy_from(&blocks.rb);
    m.fixed_view_mut::<2, 2>(2, 0).copy_from(&blocks.rf);
    m.fixed_view_mut::<2, 2>(2, 2).copy_from(&blocks.tb);
    m
}
