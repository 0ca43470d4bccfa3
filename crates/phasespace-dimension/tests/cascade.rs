//! Cascade behaviour across mixed real and mock nodes.

use phasespace_core::{
    DimensionCounterMap, DomainError, PhaseSpaceDimension, PhaseSpacePoint, ReplayRng,
};
use phasespace_dimension::{
    DependentDistribution, DimensionTree, IndependentDistribution,
    PhaseSpaceDimensionDistribution,
};
use phasespace_test_utils::nodes::{FailingNode, FixedNode};
use phasespace_test_utils::{assert_close, tables};
use phasespace_univariate::Uniform;
use proptest::prelude::*;
use std::sync::Arc;

const X: PhaseSpaceDimension = PhaseSpaceDimension::PrimarySpatial;
const E: PhaseSpaceDimension = PhaseSpaceDimension::Energy;
const T: PhaseSpaceDimension = PhaseSpaceDimension::Time;
const W: PhaseSpaceDimension = PhaseSpaceDimension::Weight;

#[test]
fn failure_stops_the_cascade_unchanged() {
    let time = Arc::new(FixedNode::new(T, 2.0).below(E));
    let weight = Arc::new(FixedNode::new(W, 1.0).below(X));

    let mut builder = DimensionTree::builder();
    let x = builder.add_node(FixedNode::new(X, 0.5));
    let e = builder.add_node(FailingNode::new(E, 0).below(X));
    let t = builder.add_shared(time.clone());
    let w = builder.add_shared(weight.clone());
    builder.add_dependent_distribution(x, e).unwrap();
    builder.add_dependent_distribution(e, t).unwrap();
    builder.add_dependent_distribution(x, w).unwrap();
    let tree = builder.build().unwrap();

    let mut point = PhaseSpacePoint::default();
    let mut rng = ReplayRng::new(vec![0.5]);
    let err = tree
        .get(x)
        .unwrap()
        .sample_with_cascade(&mut point, &mut rng)
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::ZeroDensity {
            dimension: E,
            value: 0.0
        }
    );
    assert_eq!(point.coordinate(X), 0.5);
    assert_eq!(time.samples(), 0);
    assert_eq!(weight.samples(), 0);
}

#[test]
fn cascade_density_is_the_product_of_conditionals() {
    let mut builder = DimensionTree::builder();
    builder.add_node(FixedNode::new(X, 0.5).with_density(2.0));
    builder.add_node(FixedNode::new(E, 1.0).below(X).with_density(3.0));
    builder.add_node(FixedNode::new(T, 4.0).below(E).with_density(0.5));
    builder.construct_dependency_tree().unwrap();
    let tree = builder.build().unwrap();
    let root = tree.node_for(X).unwrap();

    let mut point = PhaseSpacePoint::default();
    let mut rng = ReplayRng::new(vec![0.5]);
    root.sample_with_cascade(&mut point, &mut rng).unwrap();
    assert_eq!(root.evaluate_with_cascade(&point), Ok(3.0));
    assert_eq!(tree.node_for(E).unwrap().evaluate_with_cascade(&point), Ok(1.5));

    point.set_coordinate(E, 7.0);
    assert_eq!(root.evaluate_with_cascade(&point), Ok(0.0));
}

#[test]
fn forced_dimension_deep_in_the_tree() {
    let mut builder = DimensionTree::builder();
    builder.add_node(FixedNode::new(X, 0.5));
    builder.add_node(FixedNode::new(E, 1.0).below(X));
    builder.add_node(FixedNode::new(T, 4.0).below(E).with_density(0.25));
    builder.construct_dependency_tree().unwrap();
    let tree = builder.build().unwrap();

    let mut point = PhaseSpacePoint::default();
    let mut rng = ReplayRng::new(vec![0.5]);
    let mut trials = DimensionCounterMap::new();
    tree.node_for(X)
        .unwrap()
        .sample_and_record_trials_with_cascade_using_dimension_value(
            &mut point, &mut rng, &mut trials, T, 9.0,
        )
        .unwrap();
    assert_eq!(point.coordinate(T), 9.0);
    assert_eq!(point.coordinate_weight(T), 0.25);
    assert_eq!(point.coordinate(E), 1.0);
    assert_eq!(trials.get(&X), Some(&1));
    assert_eq!(trials.get(&E), Some(&1));
    assert_eq!(trials.get(&T), None);
}

#[test]
fn node_queries_pass_through_the_tree() {
    let mut builder = DimensionTree::builder();
    let x = builder.add_node(IndependentDistribution::new(
        X,
        Arc::new(Uniform::new(0.1, 0.9, 0.5).unwrap()),
    ));
    let e = builder.add_node(
        DependentDistribution::new(X, E, Arc::new(tables::histogram_table())).unwrap(),
    );
    builder.add_dependent_distribution(x, e).unwrap();
    let tree = builder.build().unwrap();

    let root = tree.get(x).unwrap().node();
    assert!(root.is_independent());
    assert!(root.is_uniform());
    assert_eq!(root.distribution_type_name(), "Uniform Distribution");
    let child = tree.get(e).unwrap().node();
    assert!(child.is_dependent_on_dimension(X));
    assert_eq!(child.distribution_type_name(), "BasicBivariateDistribution");
}

fn real_tree() -> DimensionTree {
    let mut builder = DimensionTree::builder();
    builder.add_node(IndependentDistribution::new(
        X,
        Arc::new(Uniform::new(0.1, 0.9, 0.5).unwrap()),
    ));
    builder.add_node(
        DependentDistribution::new(X, E, Arc::new(tables::histogram_table())).unwrap(),
    );
    builder.add_node(
        DependentDistribution::new(E, T, Arc::new(tables::histogram_table())).unwrap(),
    );
    builder.construct_dependency_tree().unwrap();
    builder.build().unwrap()
}

proptest! {
    #[test]
    fn sampled_points_have_positive_density(
        draws in prop::collection::vec(0.0f64..1.0, 3),
    ) {
        let tree = real_tree();
        let root = tree.node_for(X).unwrap();
        let mut point = PhaseSpacePoint::default();
        let mut rng = ReplayRng::new(draws);
        root.sample_with_cascade(&mut point, &mut rng).unwrap();

        let x = point.coordinate(X);
        let e = point.coordinate(E);
        prop_assert!((0.1..=0.9).contains(&x));
        if x < 0.5 {
            prop_assert!((0.5..=0.9).contains(&e));
        } else {
            prop_assert!((0.6..=0.8).contains(&e));
        }
        let density = root.evaluate_with_cascade(&point).unwrap();
        prop_assert!(density > 0.0);
        assert_close(point.weight_of_coordinates(), 1.0, 1e-12);
    }
}
