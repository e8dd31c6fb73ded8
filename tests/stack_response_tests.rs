use std::f32::consts::PI;

use lamina::layer::{Height, IndexProfile, Layer};
use lamina::smatrix::SMat;
use lamina::stack::Stack;
use ndarray::Array1;
use num_complex::Complex32;

// Tolerance for comparing S-matrix elements
const TOL: f32 = 1e-5;

fn constant(re: f32) -> IndexProfile {
    IndexProfile::Constant(Complex32::new(re, 0.0))
}

fn max_diff(a: &SMat, b: &SMat) -> f32 {
    assert_eq!(a.len(), b.len());
    a.slices
        .iter()
        .zip(b.slices.iter())
        .flat_map(|(x, y)| x.iter().zip(y.iter()))
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f32::max)
}

#[test]
fn matched_media_reduce_to_the_bare_propagator() {
    // Layer, cladding, and substrate all share n = 1.5, so no boundary
    // reflects and the net matrix is the propagator phase alone, once per
    // what-if height.
    let wav = Array1::from_vec(vec![0.5, 0.75, 1.0]);
    let heights = [1.0, 2.0];
    let layer = Layer::slab(Height::Swept(heights.to_vec()), &[constant(1.5)]).unwrap();
    let stack = Stack::new(vec![layer], wav.clone(), constant(1.5), constant(1.5)).unwrap();

    let response = stack.build().unwrap();
    assert_eq!(response.len(), 2);

    for (&h, s) in heights.iter().zip(response.iter()) {
        for (i, &lambda) in wav.iter().enumerate() {
            let expected = (Complex32::new(0.0, 1.0) * 1.5 * h * 2.0 * PI / lambda).exp();
            for j in 0..4 {
                assert!((s[i][(j, j)] - expected).norm() < TOL);
            }
            assert!((s[i][(0, 0)].norm() - 1.0).abs() < TOL);
        }
    }
}

#[test]
fn lossless_slab_conserves_energy() {
    // Glass slab in vacuum: transmitted plus reflected intensity is unity
    // at every wavelength.
    let wav = Array1::from_vec(vec![0.4, 0.5, 0.6, 0.7, 0.8]);
    let layer = Layer::slab(Height::Single(0.35), &[constant(1.5)]).unwrap();
    let stack = Stack::new(vec![layer], wav, constant(1.0), constant(1.0)).unwrap();

    let response = stack.build().unwrap().remove(0);
    let t = response.transmittance();
    let r = response.reflectance();
    for i in 0..5 {
        for j in 0..2 {
            assert!(
                (t[(i, j)] + r[(i, j)] - 1.0).abs() < TOL,
                "channel {} at wavelength index {}: T = {}, R = {}",
                j,
                i,
                t[(i, j)],
                r[(i, j)]
            );
        }
    }
}

#[test]
fn slab_matches_airy_transmission() {
    // Analytic Fabry-Perot transmission of a single slab:
    // t = t12 t21 p / (1 - r21^2 p^2) with p the one-pass phase factor.
    let n: f32 = 1.5;
    let h = 0.42;
    let wav = Array1::from_vec(vec![0.633]);
    let layer = Layer::slab(Height::Single(h), &[constant(n)]).unwrap();
    let stack = Stack::new(vec![layer], wav, constant(1.0), constant(1.0)).unwrap();

    let response = stack.build().unwrap().remove(0);
    let t12 = 2.0 / (1.0 + n);
    let t21 = 2.0 * n / (1.0 + n);
    let r21 = (n - 1.0) / (1.0 + n);
    let p = (Complex32::new(0.0, 1.0) * n * h * 2.0 * PI / 0.633).exp();
    let expected = p * t12 * t21 / (Complex32::new(1.0, 0.0) - p * p * r21 * r21);
    assert!((response[0][(0, 0)] - expected).norm() < TOL);
}

#[test]
fn identity_meta_layer_is_transparent() {
    // A meta layer with an identity S-matrix and embedding indices matching
    // its neighbors changes nothing.
    let wav = Array1::from_vec(vec![0.5, 0.6]);
    let slab_a = Layer::slab(Height::Single(0.2), &[constant(1.5)]).unwrap();
    let slab_b = Layer::slab(Height::Single(0.3), &[constant(2.0)]).unwrap();
    let meta = Layer::meta(SMat::identity(2), constant(1.5), constant(1.5));

    let with_meta = Stack::new(
        vec![slab_a.clone(), meta, slab_b.clone()],
        wav.clone(),
        constant(1.0),
        constant(1.0),
    )
    .unwrap();
    let without_meta =
        Stack::new(vec![slab_a, slab_b], wav, constant(1.0), constant(1.0)).unwrap();

    let a = with_meta.build().unwrap().remove(0);
    let b = without_meta.build().unwrap().remove(0);
    assert!(max_diff(&a, &b) < TOL);
}

#[test]
fn isotropic_stack_is_rotation_invariant() {
    // Rotating an isotropic layer must not change the response; this drives
    // the rotated-interface path and checks it against the plain one.
    let wav = Array1::from_vec(vec![0.5, 0.7]);
    let plain = Layer::slab(Height::Single(0.25), &[constant(1.8)]).unwrap();
    let mut turned = plain.clone();
    turned.rotate(0.6);

    let reference = Stack::new(vec![plain], wav.clone(), constant(1.0), constant(1.0)).unwrap();
    let rotated = Stack::new(vec![turned], wav, constant(1.0), constant(1.0)).unwrap();

    let a = reference.build().unwrap().remove(0);
    let b = rotated.build().unwrap().remove(0);
    assert!(max_diff(&a, &b) < TOL);
}

#[test]
fn quarter_turn_swaps_anisotropic_channels() {
    // Rotating a birefringent slab by 90 degrees exchanges its x and y
    // indices.
    let wav = Array1::from_vec(vec![0.6]);
    let ordinary = constant(1.5);
    let extraordinary = constant(1.7);

    let mut turned = Layer::slab(
        Height::Single(0.3),
        &[ordinary.clone(), extraordinary.clone()],
    )
    .unwrap();
    turned.rotate(PI / 2.0);
    let swapped = Layer::slab(Height::Single(0.3), &[extraordinary, ordinary]).unwrap();

    let a = Stack::new(vec![turned], wav.clone(), constant(1.0), constant(1.0))
        .unwrap()
        .build()
        .unwrap()
        .remove(0);
    let b = Stack::new(vec![swapped], wav, constant(1.0), constant(1.0))
        .unwrap()
        .build()
        .unwrap()
        .remove(0);
    assert!(max_diff(&a, &b) < TOL);
}

#[test]
fn three_index_profiles_fail_construction() {
    let profiles = [constant(1.1), constant(1.2), constant(1.3)];
    assert!(Layer::slab(Height::Single(0.5), &profiles).is_err());
}
