//! Symmetry transforms on scattering matrices.
//!
//! Three pure transforms map a layer's local S-matrix to its mirrored,
//! flipped, or in-plane rotated equivalent. They act only on the port role
//! assignment and preserve the quadrant block structure, so reciprocity and
//! energy relations of the input carry over. Whenever a layer's local
//! matrix is produced the transforms are applied in the fixed order
//! mirror, flip, rotate.

use nalgebra::{Complex, Matrix4};

use crate::layer::Symmetry;
use crate::smatrix::SMat;


/// Applies a layer's symmetry state in the fixed pipeline order
/// mirror, flip, rotate.
pub fn apply(mut s: SMat, symmetry: &Symmetry) -> SMat {
    if symmetry.mirror {
        s = mirror(s);
    }
    if symmetry.flip {
        s = flip(s);
    }
    rotate(s, symmetry.angle)
}

/// Mirrors an S-matrix about the interface normal.
///
/// Time-reversal of a reciprocal element exchanges the roles of each pair
/// of counter-propagating ports, which on the matrix is the transpose: the
/// two reflection quadrants trade places and the transmission quadrants are
/// transposed in place.
pub fn mirror(s: SMat) -> SMat {
    SMat {
        slices: s.slices.iter().map(|m| m.transpose()).collect(),
    }
}

/// Reverses the propagation direction end-to-end: the upstream and
/// downstream faces of the element swap.
///
/// Conjugation by the forward/backward block-swap permutation exchanges the
/// two transmission quadrants and the two reflection quadrants. For a
/// symmetric slab this is an identity on transmission.
pub fn flip(s: SMat) -> SMat {
    let p = swap_permutation();
    SMat {
        slices: s.slices.iter().map(|m| p * m * p).collect(),
    }
}

/// Rotates an S-matrix in-plane by `angle` radians, mixing the x and y
/// channels of every quadrant jointly.
///
/// The transform is conjugation by blockdiag(R, R) with R the 2x2 rotation.
/// An angle of exactly zero returns the input unchanged, bit for bit.
pub fn rotate(s: SMat, angle: f32) -> SMat {
    if angle == 0.0 {
        return s;
    }
    let (sin, cos) = angle.sin_cos();
    let d = rotation_operator(cos, sin);
    let d_t = d.transpose();
    SMat {
        slices: s.slices.iter().map(|m| d * m * d_t).collect(),
    }
}

/// Permutation exchanging the forward and backward port pairs.
fn swap_permutation() -> Matrix4<Complex<f32>> {
    Matrix4::from_fn(|i, j| {
        if (i + 2) % 4 == j {
            Complex::new(1.0, 0.0)
        } else {
            Complex::ZERO
        }
    })
}

/// blockdiag(R, R) for the in-plane rotation R = [[c, -s], [s, c]].
fn rotation_operator(cos: f32, sin: f32) -> Matrix4<Complex<f32>> {
    Matrix4::new(
        cos, -sin, 0.0, 0.0, //
        sin, cos, 0.0, 0.0, //
        0.0, 0.0, cos, -sin, //
        0.0, 0.0, sin, cos, //
    )
    .map(|x| Complex::new(x, 0.0))
}
