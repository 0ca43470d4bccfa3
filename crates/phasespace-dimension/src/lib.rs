//! Phase-space dimension distributions and their dependency tree.
//!
//! Each phase-space dimension of a source particle is sampled by one node:
//!
//! - [`IndependentDistribution`]: a one-dimensional distribution.
//! - [`DependentDistribution`]: a two-dimensional table conditioned on the
//!   coordinate of a parent dimension.
//! - [`ImportanceSampledIndependentDistribution`] and
//!   [`ImportanceSampledDependentDistribution`]: sampled from an importance
//!   distribution and weighted back to the true one.
//!
//! Nodes implement [`PhaseSpaceDimensionDistribution`] and know nothing of
//! each other. A [`DimensionTreeBuilder`] wires dependent nodes below the
//! nodes of their parent dimensions; the resulting [`DimensionTree`]
//! cascades evaluation and sampling from each independent root down
//! through its dependents, so a parent coordinate is always set before a
//! child reads it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dependent;
pub mod independent;
pub mod node;
pub mod tree;
mod weight;

pub use dependent::{DependentDistribution, ImportanceSampledDependentDistribution};
pub use independent::{IndependentDistribution, ImportanceSampledIndependentDistribution};
pub use node::PhaseSpaceDimensionDistribution;
pub use tree::{DimensionTree, DimensionTreeBuilder, NodeId, NodeRef};
