//! Stack orchestrator: from an ordered layer sequence to the global
//! S-matrix.
//!
//! A [`Stack`] owns the layer sequence, the wavelength sweep, and the
//! semi-infinite cladding and substrate media. `build()` resolves every
//! index profile against the sweep, constructs zero-height pseudo-layers
//! for the two boundary media, and works on a new extended sequence, so the
//! stored stack is never mutated and repeated builds are safe.

use anyhow::Result;
use itertools::Itertools;
use nalgebra::Complex;
use ndarray::Array1;

use crate::interface;
use crate::layer::{IndexProfile, Layer, Side, Symmetry};
use crate::propagator;
use crate::smatrix::SMat;
use crate::star;
use crate::symmetry;


/// A planar multilayer stack bounded by semi-infinite cladding and
/// substrate media, sharing one wavelength sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    pub layers: Vec<Layer>,
    pub wavelengths: Array1<f32>,
    pub cladding: IndexProfile,
    pub substrate: IndexProfile,
}

/// A layer with all index profiles resolved against the sweep. Boundary
/// media become zero-height isotropic slabs.
enum Resolved {
    Slab {
        heights: Vec<f32>,
        n_x: Array1<Complex<f32>>,
        n_y: Array1<Complex<f32>>,
        symmetry: Symmetry,
    },
    Meta {
        s_mat: SMat,
        cladding: Array1<Complex<f32>>,
        substrate: Array1<Complex<f32>>,
        symmetry: Symmetry,
    },
}

impl Resolved {
    fn from_layer(layer: &Layer, sweep_len: usize) -> Result<Self> {
        match layer {
            Layer::NonMeta(slab) => Ok(Resolved::Slab {
                heights: (0..slab.height.count()).map(|i| slab.height.at(i)).collect(),
                n_x: slab.n_x.resolve(sweep_len)?,
                n_y: slab.n_y.resolve(sweep_len)?,
                symmetry: slab.symmetry,
            }),
            Layer::Meta(meta) => Ok(Resolved::Meta {
                s_mat: meta.s_mat.clone().broadcast(sweep_len)?,
                cladding: meta.cladding.resolve(sweep_len)?,
                substrate: meta.substrate.resolve(sweep_len)?,
                symmetry: meta.symmetry,
            }),
        }
    }

    fn boundary(profile: &IndexProfile, sweep_len: usize) -> Result<Self> {
        let n = profile.resolve(sweep_len)?;
        Ok(Resolved::Slab {
            heights: vec![0.0],
            n_x: n.clone(),
            n_y: n,
            symmetry: Symmetry::default(),
        })
    }

    fn angle(&self) -> f32 {
        match self {
            Resolved::Slab { symmetry, .. } | Resolved::Meta { symmetry, .. } => symmetry.angle,
        }
    }

    fn height_count(&self) -> usize {
        match self {
            Resolved::Slab { heights, .. } => heights.len(),
            Resolved::Meta { .. } => 1,
        }
    }

    /// Effective indices (x, y) seen at the given face of this layer.
    fn index(&self, side: Side) -> (&Array1<Complex<f32>>, &Array1<Complex<f32>>) {
        match self {
            Resolved::Slab { n_x, n_y, .. } => (n_x, n_y),
            Resolved::Meta {
                cladding,
                substrate,
                ..
            } => match side {
                Side::Upstream => (cladding, cladding),
                Side::Downstream => (substrate, substrate),
            },
        }
    }

    /// Local S-matrix of this layer with its symmetry transforms applied.
    /// For a slab this is the propagator at height-sweep position
    /// `height_idx` (a single height broadcasts); for a meta layer it is
    /// the supplied matrix.
    fn local(&self, wavelengths: &Array1<f32>, height_idx: usize) -> SMat {
        match self {
            Resolved::Slab {
                heights,
                n_x,
                n_y,
                symmetry,
            } => {
                let height = heights[height_idx.min(heights.len() - 1)];
                symmetry::apply(propagator::slab(n_x, n_y, height, wavelengths), symmetry)
            }
            Resolved::Meta {
                s_mat, symmetry, ..
            } => symmetry::apply(s_mat.clone(), symmetry),
        }
    }
}

impl Stack {
    /// Creates a stack over a strictly positive, non-empty wavelength sweep.
    pub fn new(
        layers: Vec<Layer>,
        wavelengths: Array1<f32>,
        cladding: IndexProfile,
        substrate: IndexProfile,
    ) -> Result<Self> {
        if wavelengths.is_empty() {
            return Err(anyhow::anyhow!("wavelength sweep must not be empty"));
        }
        if wavelengths.iter().any(|w| *w <= 0.0) {
            return Err(anyhow::anyhow!("wavelengths must be strictly positive"));
        }
        Ok(Self {
            layers,
            wavelengths,
            cladding,
            substrate,
        })
    }

    /// Cascades the whole stack into its global S-matrix, one entry of the
    /// returned vector per what-if height of the height sweep. Stacks
    /// without a height sweep produce a single entry.
    ///
    /// The layer sequence runs cladding to substrate: the cladding
    /// interface first, then each layer's propagator followed by the
    /// interface to its successor, terminated by the substrate boundary.
    /// An interface adjoining a rotated layer is built through the
    /// zero-thickness reference medium, all others with the plain Fresnel
    /// formula.
    pub fn build(&self) -> Result<Vec<SMat>> {
        let sweep_len = self.wavelengths.len();
        let cladding = Resolved::boundary(&self.cladding, sweep_len)?;

        // New working sequence; the stored layer list stays untouched.
        let mut working = self
            .layers
            .iter()
            .map(|layer| Resolved::from_layer(layer, sweep_len))
            .collect::<Result<Vec<_>>>()?;
        working.push(Resolved::boundary(&self.substrate, sweep_len)?);

        let height_count = working.iter().try_fold(1, |acc, layer| {
            match (acc, layer.height_count()) {
                (acc, 1) => Ok(acc),
                (1, n) => Ok(n),
                (acc, n) if acc == n => Ok(acc),
                (acc, n) => Err(anyhow::anyhow!(
                    "height sweeps of different lengths in one stack: {} vs {}",
                    acc,
                    n
                )),
            }
        })?;

        let mut interfaces = Vec::with_capacity(working.len());
        interfaces.push(interface_between(&cladding, &working[0])?);
        for (current, next) in working.iter().tuple_windows() {
            interfaces.push(interface_between(current, next)?);
        }

        (0..height_count)
            .map(|height_idx| {
                let mut chain = Vec::with_capacity(2 * working.len());
                chain.push(interfaces[0].clone());
                for (i, layer) in working.iter().enumerate().take(working.len() - 1) {
                    chain.push(layer.local(&self.wavelengths, height_idx));
                    chain.push(interfaces[i + 1].clone());
                }
                star::cascade(&chain)
            })
            .collect()
    }
}

/// Interface between the downstream face of `current` and the upstream face
/// of `next`. The reference-medium construction is only invoked when one of
/// the two layers is rotated.
fn interface_between(current: &Resolved, next: &Resolved) -> Result<SMat> {
    let (n1_x, n1_y) = current.index(Side::Downstream);
    let (n2_x, n2_y) = next.index(Side::Upstream);
    if current.angle() != 0.0 || next.angle() != 0.0 {
        interface::rotated(n1_x, n1_y, current.angle(), n2_x, n2_y, next.angle())
    } else {
        interface::plain(n1_x, n1_y, n2_x, n2_y)
    }
}
