//! Dimension tree assembly and cascading evaluation and sampling.
//!
//! Nodes live in an arena owned by the tree and refer to each other by
//! [`NodeId`]. [`DimensionTreeBuilder`] wires children below parents and
//! validates the result; [`DimensionTree`] is immutable and can be shared
//! across sampling threads.

use crate::node::PhaseSpaceDimensionDistribution;
use phasespace_core::{
    ConfigurationError, DimensionCounterMap, DomainError, PhaseSpaceDimension, PhaseSpacePoint,
    RandomNumberGenerator,
};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Index of a node in a [`DimensionTreeBuilder`] or [`DimensionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

type NodeList = SmallVec<[NodeId; 4]>;

struct Slot {
    node: Arc<dyn PhaseSpaceDimensionDistribution>,
    parent: Option<NodeId>,
    children: NodeList,
}

impl Slot {
    fn dimension(&self) -> PhaseSpaceDimension {
        self.node.dimension()
    }
}

fn debug_slots(slots: &[Slot], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
        .entries(slots.iter().map(|s| {
            (
                s.dimension(),
                s.node.distribution_type_name(),
                s.parent.map(|p| p.0),
            )
        }))
        .finish()
}

// ── Builder ────────────────────────────────────────────────────────

/// Collects dimension nodes and their parent/child wiring.
///
/// Wiring is checked edge by edge in
/// [`add_dependent_distribution`](Self::add_dependent_distribution); the
/// tree as a whole is checked in [`build`](Self::build).
#[derive(Default)]
pub struct DimensionTreeBuilder {
    slots: Vec<Slot>,
}

impl fmt::Debug for DimensionTreeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_slots(&self.slots, f)
    }
}

impl DimensionTreeBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, unwired.
    pub fn add_node<N: PhaseSpaceDimensionDistribution>(&mut self, node: N) -> NodeId {
        self.add_shared(Arc::new(node))
    }

    /// Add a node that is already shared, unwired.
    pub fn add_shared(&mut self, node: Arc<dyn PhaseSpaceDimensionDistribution>) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot {
            node,
            parent: None,
            children: NodeList::new(),
        });
        id
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no node has been added.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node behind `id`, if it exists.
    pub fn node(&self, id: NodeId) -> Option<&Arc<dyn PhaseSpaceDimensionDistribution>> {
        self.slots.get(id.0 as usize).map(|s| &s.node)
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, ConfigurationError> {
        self.slots
            .get(id.0 as usize)
            .ok_or(ConfigurationError::UnknownNode { index: id.0 })
    }

    /// Wire `child` below `parent`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnknownNode`] if either id is foreign.
    /// - [`ConfigurationError::SelfDependency`] if the ids are equal.
    /// - [`ConfigurationError::IndependentChild`] if `child` has no parent
    ///   dimension.
    /// - [`ConfigurationError::AlreadyWired`] if `child` already has a
    ///   parent.
    /// - [`ConfigurationError::ParentDimensionMismatch`] if `child`
    ///   depends on a dimension other than `parent`'s.
    /// - [`ConfigurationError::CyclicDependency`] if `child` is already an
    ///   ancestor of `parent`.
    pub fn add_dependent_distribution(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<(), ConfigurationError> {
        let parent_slot = self.slot(parent)?;
        let child_slot = self.slot(child)?;
        let child_dimension = child_slot.dimension();
        if parent == child {
            return Err(ConfigurationError::SelfDependency {
                dimension: child_dimension,
            });
        }
        let Some(declared_parent) = child_slot.node.parent_dimension() else {
            return Err(ConfigurationError::IndependentChild {
                child: child_dimension,
            });
        };
        if child_slot.parent.is_some() {
            return Err(ConfigurationError::AlreadyWired {
                child: child_dimension,
            });
        }
        let wired_parent = parent_slot.dimension();
        if declared_parent != wired_parent {
            return Err(ConfigurationError::ParentDimensionMismatch {
                child: child_dimension,
                declared_parent,
                wired_parent,
            });
        }
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(ConfigurationError::CyclicDependency {
                    child: child_dimension,
                    parent: wired_parent,
                });
            }
            ancestor = self.slots[id.0 as usize].parent;
        }

        self.slots[child.0 as usize].parent = Some(parent);
        self.slots[parent.0 as usize].children.push(child);
        Ok(())
    }

    /// Detach every child wired directly below `node`.
    ///
    /// The children keep their own sub-trees and must be wired again
    /// before [`build`](Self::build).
    pub fn remove_dependent_distributions(
        &mut self,
        node: NodeId,
    ) -> Result<(), ConfigurationError> {
        self.slot(node)?;
        let children = std::mem::take(&mut self.slots[node.0 as usize].children);
        for child in children {
            self.slots[child.0 as usize].parent = None;
        }
        Ok(())
    }

    /// Discard the current wiring and wire every dependent node below the
    /// first node of its declared parent dimension.
    ///
    /// Nodes whose parent dimension has no node stay unwired and are
    /// reported by [`build`](Self::build).
    pub fn construct_dependency_tree(&mut self) -> Result<(), ConfigurationError> {
        for slot in &mut self.slots {
            slot.parent = None;
            slot.children.clear();
        }
        for index in 0..self.slots.len() {
            let Some(declared) = self.slots[index].node.parent_dimension() else {
                continue;
            };
            let parent = self.slots.iter().position(|s| s.dimension() == declared);
            if let Some(parent) = parent {
                self.add_dependent_distribution(NodeId(parent as u32), NodeId(index as u32))?;
            }
        }
        Ok(())
    }

    /// Validate and freeze the tree.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::DuplicateDimension`] if two nodes share a
    ///   dimension.
    /// - [`ConfigurationError::OrphanedDimension`] if a dependent node was
    ///   never wired.
    pub fn build(self) -> Result<DimensionTree, ConfigurationError> {
        let mut seen = [false; PhaseSpaceDimension::COUNT];
        for slot in &self.slots {
            let dimension = slot.dimension();
            if std::mem::replace(&mut seen[dimension.index()], true) {
                return Err(ConfigurationError::DuplicateDimension { dimension });
            }
        }

        let mut roots = NodeList::new();
        for (index, slot) in self.slots.iter().enumerate() {
            match (slot.node.parent_dimension(), slot.parent) {
                (None, _) => roots.push(NodeId(index as u32)),
                (Some(parent), None) => {
                    return Err(ConfigurationError::OrphanedDimension {
                        dimension: slot.dimension(),
                        parent,
                    })
                }
                (Some(_), Some(_)) => {}
            }
        }

        Ok(DimensionTree {
            slots: self.slots,
            roots,
        })
    }
}

// ── Tree ───────────────────────────────────────────────────────────

/// A validated forest of dimension nodes.
///
/// Every dependent node is reachable from exactly one independent root, and
/// every dimension has at most one node.
pub struct DimensionTree {
    slots: Vec<Slot>,
    roots: NodeList,
}

// Compile-time assertion: trees are shared across sampling threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<DimensionTree>();
};

impl fmt::Debug for DimensionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_slots(&self.slots, f)
    }
}

impl DimensionTree {
    /// Start assembling a tree.
    pub fn builder() -> DimensionTreeBuilder {
        DimensionTreeBuilder::new()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node behind `id`.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (self.slots.len() > id.0 as usize).then_some(NodeRef { tree: self, id })
    }

    /// The node sampling `dimension`.
    pub fn node_for(&self, dimension: PhaseSpaceDimension) -> Option<NodeRef<'_>> {
        self.slots
            .iter()
            .position(|s| s.dimension() == dimension)
            .map(|i| NodeRef {
                tree: self,
                id: NodeId(i as u32),
            })
    }

    /// Independent nodes, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().map(move |&id| NodeRef { tree: self, id })
    }

    /// Every node, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        (0..self.slots.len()).map(move |i| NodeRef {
            tree: self,
            id: NodeId(i as u32),
        })
    }

    fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.0 as usize]
    }
}

/// A node of a [`DimensionTree`] together with its position in the tree.
///
/// Cascading operations act on the node and then on every node below it,
/// depth first, children in wiring order.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DimensionTree,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("dimension", &self.dimension())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    /// Position of the node in the tree.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's own distribution.
    pub fn node(&self) -> &'a dyn PhaseSpaceDimensionDistribution {
        self.tree.slot(self.id).node.as_ref()
    }

    /// The dimension the node samples.
    pub fn dimension(&self) -> PhaseSpaceDimension {
        self.node().dimension()
    }

    /// The node this one is wired below.
    pub fn parent_distribution(&self) -> Option<NodeRef<'a>> {
        self.tree.slot(self.id).parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Nodes wired directly below this one.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.slot(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Every dimension in the sub-tree below this node.
    pub fn dependent_dimensions(&self) -> BTreeSet<PhaseSpaceDimension> {
        let mut out = BTreeSet::new();
        self.collect_dependent_dimensions(&mut out);
        out
    }

    fn collect_dependent_dimensions(&self, out: &mut BTreeSet<PhaseSpaceDimension>) {
        for child in self.children() {
            out.insert(child.dimension());
            child.collect_dependent_dimensions(out);
        }
    }

    /// The node's own conditional density at `point`.
    pub fn evaluate_without_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        self.node().evaluate_without_cascade(point)
    }

    /// The product of the conditional densities of this node and every
    /// node below it.
    ///
    /// A zero factor ends the walk, so nodes below a zero-density parent
    /// value are never evaluated.
    pub fn evaluate_with_cascade(&self, point: &PhaseSpacePoint) -> Result<f64, DomainError> {
        let mut value = self.evaluate_without_cascade(point)?;
        for child in self.children() {
            if value == 0.0 {
                break;
            }
            value *= child.evaluate_with_cascade(point)?;
        }
        Ok(value)
    }

    /// Draw the node's own coordinate.
    pub fn sample_without_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        self.node().sample_without_cascade(point, rng)
    }

    /// Draw this node's coordinate, then every coordinate below it.
    pub fn sample_with_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
    ) -> Result<(), DomainError> {
        self.sample_without_cascade(point, rng)?;
        for child in self.children() {
            child.sample_with_cascade(point, rng)?;
        }
        Ok(())
    }

    /// Draw as [`sample_with_cascade`](Self::sample_with_cascade), adding
    /// each node's trials to its dimension's counter.
    pub fn sample_and_record_trials_with_cascade(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut DimensionCounterMap,
    ) -> Result<(), DomainError> {
        let counter = trials.entry(self.dimension()).or_insert(0);
        self.node()
            .sample_and_record_trials_without_cascade(point, rng, counter)?;
        for child in self.children() {
            child.sample_and_record_trials_with_cascade(point, rng, trials)?;
        }
        Ok(())
    }

    /// Force the node's own coordinate to `value` and weight it.
    pub fn set_dimension_value_and_apply_weight(
        &self,
        point: &mut PhaseSpacePoint,
        value: f64,
    ) -> Result<(), DomainError> {
        self.node().set_dimension_value_and_apply_weight(point, value)
    }

    /// Sample the sub-tree, forcing `dimension` to `value` wherever it
    /// occurs.
    ///
    /// Only the forced dimension's weight is corrected; every other
    /// coordinate is drawn as usual.
    pub fn sample_with_cascade_using_dimension_value(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        dimension: PhaseSpaceDimension,
        value: f64,
    ) -> Result<(), DomainError> {
        if self.dimension() == dimension {
            self.set_dimension_value_and_apply_weight(point, value)?;
        } else {
            self.sample_without_cascade(point, rng)?;
        }
        for child in self.children() {
            child.sample_with_cascade_using_dimension_value(point, rng, dimension, value)?;
        }
        Ok(())
    }

    /// Sample as
    /// [`sample_with_cascade_using_dimension_value`](Self::sample_with_cascade_using_dimension_value),
    /// recording trials for every drawn dimension. The forced dimension
    /// takes no trials.
    pub fn sample_and_record_trials_with_cascade_using_dimension_value(
        &self,
        point: &mut PhaseSpacePoint,
        rng: &mut dyn RandomNumberGenerator,
        trials: &mut DimensionCounterMap,
        dimension: PhaseSpaceDimension,
        value: f64,
    ) -> Result<(), DomainError> {
        if self.dimension() == dimension {
            self.set_dimension_value_and_apply_weight(point, value)?;
        } else {
            let counter = trials.entry(self.dimension()).or_insert(0);
            self.node()
                .sample_and_record_trials_without_cascade(point, rng, counter)?;
        }
        for child in self.children() {
            child.sample_and_record_trials_with_cascade_using_dimension_value(
                point, rng, trials, dimension, value,
            )?;
        }
        Ok(())
    }
}
