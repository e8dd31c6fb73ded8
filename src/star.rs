//! Redheffer star product for cascading scattering matrices.
//!
//! Two elements in series exchange an infinite series of internal
//! round-trip reflections. The star product sums that series in closed
//! form: with the front element's blocks (TF1, RB1, RF1, TB1) and the back
//! element's (TF2, RB2, RF2, TB2),
//!
//! ```text
//! TF = TF2 (I - RB1 RF2)^-1 TF1
//! RB = RB2 + TF2 (I - RB1 RF2)^-1 RB1 TB2
//! RF = RF1 + TB1 RF2 (I - RB1 RF2)^-1 TF1
//! TB = TB1 (I - RF2 RB1)^-1 TB2
//! ```
//!
//! The product is associative but not commutative; the identity S-matrix is
//! a two-sided unit. A singular round-trip operator I - RB1 RF2 marks a
//! resonant, physically degenerate pairing and is surfaced as an error.
//!
//! Each wavelength cascades independently of every other, so the reduction
//! runs in parallel across the wavelength axis.

use anyhow::Result;
use nalgebra::{Complex, Matrix2, Matrix4};
use rayon::prelude::*;

use crate::smatrix::{self, Blocks, SMat};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface;
    use crate::propagator;
    use ndarray::Array1;

    const TOL: f32 = 1e-5;

    fn index(re: f32, im: f32, len: usize) -> Array1<Complex<f32>> {
        Array1::from_elem(len, Complex::new(re, im))
    }

    fn max_diff(a: &SMat, b: &SMat) -> f32 {
        a.slices
            .iter()
            .zip(b.slices.iter())
            .flat_map(|(x, y)| x.iter().zip(y.iter()))
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f32::max)
    }

    #[test]
    fn identity_is_a_two_sided_unit() {
        let n1 = index(1.0, 0.0, 2);
        let n2 = index(1.5, 0.02, 2);
        let s = interface::plain(&n1, &n1, &n2, &n2).unwrap();
        let id = SMat::identity(2);
        assert!(max_diff(&combine(&id, &s).unwrap(), &s) < TOL);
        assert!(max_diff(&combine(&s, &id).unwrap(), &s) < TOL);
    }

    #[test]
    fn associative() {
        let wav = Array1::from_vec(vec![0.5, 0.7]);
        let n1 = index(1.0, 0.0, 2);
        let n2 = index(1.5, 0.1, 2);
        let n3 = index(2.2, 0.0, 2);
        let a = interface::plain(&n1, &n1, &n2, &n2).unwrap();
        let b = propagator::slab(&n2, &n2, 0.3, &wav);
        let c = interface::plain(&n2, &n2, &n3, &n3).unwrap();
        let left = combine(&combine(&a, &b).unwrap(), &c).unwrap();
        let right = combine(&a, &combine(&b, &c).unwrap()).unwrap();
        assert!(max_diff(&left, &right) < TOL);
    }

    #[test]
    fn zero_thickness_intermediate_medium_cancels() {
        // Entering and immediately leaving a medium is a no-op.
        let n1 = index(1.0, 0.0, 1);
        let n2 = index(1.8, 0.0, 1);
        let into = interface::plain(&n1, &n1, &n2, &n2).unwrap();
        let out_of = interface::plain(&n2, &n2, &n1, &n1).unwrap();
        let net = combine(&into, &out_of).unwrap();
        assert!(max_diff(&net, &SMat::identity(1)) < TOL);
    }

    #[test]
    fn cascade_of_one_is_unchanged() {
        let n1 = index(1.0, 0.0, 2);
        let n2 = index(1.5, 0.0, 2);
        let s = interface::plain(&n1, &n1, &n2, &n2).unwrap();
        assert_eq!(cascade(std::slice::from_ref(&s)).unwrap(), s);
        assert!(cascade(&[]).is_err());
    }

    #[test]
    fn mismatched_sweep_lengths_rejected() {
        let a = SMat::identity(2);
        let b = SMat::identity(3);
        assert!(combine(&a, &b).is_err());
    }
}

/// Combines two S-matrices in series with the Redheffer star product:
/// `front` faces the cladding, `back` faces the substrate.
pub fn combine(front: &SMat, back: &SMat) -> Result<SMat> {
    if front.len() != back.len() {
        return Err(anyhow::anyhow!(
            "cannot combine S-matrices of {} and {} wavelength slices",
            front.len(),
            back.len()
        ));
    }
    let slices = front
        .slices
        .iter()
        .zip(back.slices.iter())
        .map(|(f, b)| combine_slice(f, b))
        .collect::<Result<Vec<_>>>()?;
    SMat::new(slices)
}

/// Star product of two single-wavelength slices.
pub fn combine_slice(
    front: &Matrix4<Complex<f32>>,
    back: &Matrix4<Complex<f32>>,
) -> Result<Matrix4<Complex<f32>>> {
    let s1 = smatrix::split(front);
    let s2 = smatrix::split(back);
    let id = Matrix2::identity();

    let round_trip = round_trip_inverse(&(id - s1.rb * s2.rf))?;
    let round_trip_rev = round_trip_inverse(&(id - s2.rf * s1.rb))?;

    let blocks = Blocks {
        tf: s2.tf * round_trip * s1.tf,
        rb: s2.rb + s2.tf * round_trip * s1.rb * s2.tb,
        rf: s1.rf + s1.tb * s2.rf * round_trip * s1.tf,
        tb: s1.tb * round_trip_rev * s2.tb,
    };
    Ok(smatrix::assemble(&blocks))
}

/// Left-to-right reduction of an ordered matrix sequence, in physical
/// top-to-bottom order. A single-element sequence is returned unchanged.
pub fn cascade(mats: &[SMat]) -> Result<SMat> {
    let first = mats
        .first()
        .ok_or_else(|| anyhow::anyhow!("cannot cascade an empty matrix sequence"))?;
    let len = first.len();
    if let Some(bad) = mats.iter().find(|m| m.len() != len) {
        return Err(anyhow::anyhow!(
            "cascade sequence mixes sweep lengths {} and {}",
            len,
            bad.len()
        ));
    }

    let slices = (0..len)
        .into_par_iter()
        .map(|i| {
            let mut acc = first.slices[i];
            for m in &mats[1..] {
                acc = combine_slice(&acc, &m.slices[i])?;
            }
            Ok(acc)
        })
        .collect::<Result<Vec<_>>>()?;
    SMat::new(slices)
}

fn round_trip_inverse(m: &Matrix2<Complex<f32>>) -> Result<Matrix2<Complex<f32>>> {
    m.try_inverse().ok_or_else(|| {
        anyhow::anyhow!("singular round-trip operator in star product: {:?}", m)
    })
}
