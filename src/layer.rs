//! Layer model for planar multilayer stacks.
//!
//! A layer is either a homogeneous (possibly anisotropic) slab described by
//! refractive indices and a thickness, or a meta layer whose scattering
//! matrix is supplied directly. Both variants carry an explicit symmetry
//! record (mirror, flip, in-plane rotation angle) that is applied whenever
//! the layer's local S-matrix is produced.

use anyhow::Result;
use nalgebra::Complex;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::smatrix::SMat;


/// Which face of a layer an interface is built against: the upstream face
/// looks toward the cladding, the downstream face toward the substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Upstream,
    Downstream,
}

/// Symmetry state of a layer, applied in the order mirror, flip, rotate
/// whenever the layer's local S-matrix is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Symmetry {
    pub mirror: bool,
    pub flip: bool,
    /// In-plane rotation angle in radians. Zero means no rotation.
    pub angle: f32,
}

impl Default for Symmetry {
    fn default() -> Self {
        Self {
            mirror: false,
            flip: false,
            angle: 0.0,
        }
    }
}

/// Slab thickness: a single value, or a sweep of independent "what-if"
/// thicknesses evaluated side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Height {
    Single(f32),
    Swept(Vec<f32>),
}

impl Height {
    pub fn count(&self) -> usize {
        match self {
            Height::Single(_) => 1,
            Height::Swept(heights) => heights.len(),
        }
    }

    /// Height value at sweep position `i`; a single height broadcasts.
    pub fn at(&self, i: usize) -> f32 {
        match self {
            Height::Single(h) => *h,
            Height::Swept(heights) => heights[i],
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Height::Single(h) if *h < 0.0 => {
                Err(anyhow::anyhow!("negative layer height: {}", h))
            }
            Height::Swept(heights) if heights.is_empty() => {
                Err(anyhow::anyhow!("height sweep must not be empty"))
            }
            Height::Swept(heights) if heights.iter().any(|h| *h < 0.0) => {
                Err(anyhow::anyhow!("negative layer height in sweep"))
            }
            _ => Ok(()),
        }
    }
}

/// A refractive index given either as a single value broadcast over the
/// sweep, or resolved per wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexProfile {
    Constant(Complex<f32>),
    PerWavelength(Vec<Complex<f32>>),
}

impl IndexProfile {
    /// Resolves the profile against a sweep of length `len`. Per-wavelength
    /// profiles must have length 1 or `len`.
    pub fn resolve(&self, len: usize) -> Result<Array1<Complex<f32>>> {
        match self {
            IndexProfile::Constant(n) => Ok(Array1::from_elem(len, *n)),
            IndexProfile::PerWavelength(values) if values.len() == len => {
                Ok(Array1::from_vec(values.clone()))
            }
            IndexProfile::PerWavelength(values) if values.len() == 1 => {
                Ok(Array1::from_elem(len, values[0]))
            }
            IndexProfile::PerWavelength(values) => Err(anyhow::anyhow!(
                "index profile has {} values but the sweep has {} wavelengths",
                values.len(),
                len
            )),
        }
    }
}

/// A homogeneous slab layer. Isotropic when constructed from a single index
/// profile, anisotropic when constructed from two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonMetaLayer {
    pub height: Height,
    pub n_x: IndexProfile,
    pub n_y: IndexProfile,
    pub symmetry: Symmetry,
}

impl NonMetaLayer {
    /// Creates a slab layer from one (isotropic) or two (anisotropic) index
    /// profiles. Any other count is a construction error.
    pub fn new(height: Height, indices: &[IndexProfile]) -> Result<Self> {
        height.validate()?;
        let (n_x, n_y) = match indices {
            [n] => (n.clone(), n.clone()),
            [n_x, n_y] => (n_x.clone(), n_y.clone()),
            _ => {
                return Err(anyhow::anyhow!(
                    "expected one or two refractive index profiles, got {}",
                    indices.len()
                ))
            }
        };
        Ok(Self {
            height,
            n_x,
            n_y,
            symmetry: Symmetry::default(),
        })
    }
}

/// A layer whose local S-matrix is supplied directly, e.g. a metasurface
/// unit cell. `cladding` and `substrate` are the effective indices seen at
/// its upstream and downstream faces when an interface is built against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaLayer {
    pub s_mat: SMat,
    pub cladding: IndexProfile,
    pub substrate: IndexProfile,
    pub symmetry: Symmetry,
}

impl MetaLayer {
    pub fn new(s_mat: SMat, cladding: IndexProfile, substrate: IndexProfile) -> Self {
        Self {
            s_mat,
            cladding,
            substrate,
            symmetry: Symmetry::default(),
        }
    }
}

/// A layer of the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    NonMeta(NonMetaLayer),
    Meta(MetaLayer),
}

impl Layer {
    /// Creates a slab layer, see [`NonMetaLayer::new`].
    pub fn slab(height: Height, indices: &[IndexProfile]) -> Result<Self> {
        Ok(Layer::NonMeta(NonMetaLayer::new(height, indices)?))
    }

    /// Creates a meta layer, see [`MetaLayer::new`].
    pub fn meta(s_mat: SMat, cladding: IndexProfile, substrate: IndexProfile) -> Self {
        Layer::Meta(MetaLayer::new(s_mat, cladding, substrate))
    }

    pub fn symmetry(&self) -> &Symmetry {
        match self {
            Layer::NonMeta(layer) => &layer.symmetry,
            Layer::Meta(layer) => &layer.symmetry,
        }
    }

    fn symmetry_mut(&mut self) -> &mut Symmetry {
        match self {
            Layer::NonMeta(layer) => &mut layer.symmetry,
            Layer::Meta(layer) => &mut layer.symmetry,
        }
    }

    /// Mirrors the layer about the interface normal.
    pub fn mirror(&mut self) {
        self.symmetry_mut().mirror = true;
    }

    /// Reverses the layer's propagation direction end-to-end.
    pub fn flip(&mut self) {
        self.symmetry_mut().flip = true;
    }

    /// Sets the in-plane rotation angle in radians. Non-cumulative: the last
    /// call wins.
    pub fn rotate(&mut self, angle: f32) {
        self.symmetry_mut().angle = angle;
    }
}
