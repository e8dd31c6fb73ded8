//! Scattering-matrix method for planar multilayer stacks at normal incidence.
//!
//! A stack is an ordered sequence of layers bounded by semi-infinite
//! cladding and substrate media. Each layer is either a homogeneous
//! (possibly anisotropic) slab described by refractive indices and a
//! thickness, or a meta layer whose scattering matrix is supplied directly,
//! e.g. a metasurface unit cell. For every wavelength in the sweep the
//! engine builds local 4x4 complex S-matrices for each layer and each
//! inter-layer interface, applies per-layer symmetry transforms (mirror,
//! flip, in-plane rotation), and cascades the full sequence with the
//! Redheffer star product into one global S-matrix for the whole stack.
//!
//! The crate provides:
//! - Slab propagator and Fresnel-like interface matrix construction
//! - Mirror, flip, and in-plane rotation transforms on S-matrices
//! - The closed-form Redheffer star product and ordered cascading
//! - A stack orchestrator producing the global response per wavelength
//!
//! Port order is (x-forward, y-forward, x-backward, y-backward); the
//! diagonal 2x2 blocks of an S-matrix are the forward/backward transmission
//! sub-blocks and the off-diagonal 2x2 blocks are the reflection sub-blocks.

pub mod config;
pub mod interface;
pub mod layer;
pub mod propagator;
pub mod smatrix;
pub mod stack;
pub mod star;
pub mod symmetry;
