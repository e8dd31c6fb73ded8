use nalgebra::Complex;

/// Refractive index of the zero-thickness reference medium used to decouple
/// the coordinate frames on either side of a rotated interface.
pub const REFERENCE_INDEX: Complex<f32> = Complex { re: 1.0, im: 0.0 };
