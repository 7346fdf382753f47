//! Property-based tests for the optimizer on generated trees.
use std::collections::HashSet;

use proptest::prelude::*;
use vopt_core::{Location, LogContext, NodeId, Optimizer, Scalar, Tree, VariantMap, literal};

const KEYS: [&str; 3] = ["qx.debug", "qx.mobile", "qx.theme"];

/// A statement shape the generated programs are made of.
#[derive(Debug, Clone)]
enum Stmt {
    Call(&'static str),
    /// `select(key, {"on": E1, "off|false": E2, "default": E3})`
    Select(usize),
    /// `if (get(key) <op> compared) {...} else {...}`, or `if (get(key))`
    /// without a comparison.
    IfGet {
        key: usize,
        comparison: Option<(&'static str, Scalar)>,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    /// `if (isSet(key, candidates)) {...} else {...}`
    IfIsSet {
        key: usize,
        candidates: &'static str,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
}

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::from("on")),
        Just(Scalar::from("off")),
        Just(Scalar::from("x")),
        Just(Scalar::Bool(true)),
        Just(Scalar::Bool(false)),
        (0i64..3).prop_map(Scalar::Int),
        Just(Scalar::Null),
    ]
}

fn arb_stmt() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["A", "B", "C"]).prop_map(Stmt::Call),
        (0..KEYS.len()).prop_map(Stmt::Select),
    ];
    leaf.prop_recursive(3, 32, 3, |inner| {
        let body = prop::collection::vec(inner, 0..3);
        prop_oneof![
            (
                0..KEYS.len(),
                prop::option::of((
                    prop::sample::select(vec!["EQ", "SHEQ", "NE", "SHNE"]),
                    arb_scalar()
                )),
                body.clone(),
                body.clone(),
            )
                .prop_map(|(key, comparison, then, otherwise)| Stmt::IfGet {
                    key,
                    comparison,
                    then,
                    otherwise,
                }),
            (
                0..KEYS.len(),
                prop::sample::select(vec!["on", "off", "on|x"]),
                body.clone(),
                body,
            )
                .prop_map(|(key, candidates, then, otherwise)| Stmt::IfIsSet {
                    key,
                    candidates,
                    then,
                    otherwise,
                }),
        ]
    })
}

fn build(tree: &mut Tree, stmt: &Stmt) -> NodeId {
    match stmt {
        Stmt::Call(name) => tree.call_expr(name, []),
        Stmt::Select(key) => {
            let key = tree.string_literal(KEYS[*key]);
            let branches = ["E1", "E2", "E3"].map(|name| tree.call_expr(name, []));
            let map = tree.map_literal(["on", "off|false", "default"].into_iter().zip(branches));
            tree.call_expr("qx.core.Environment.select", [key, map])
        }
        Stmt::IfGet {
            key,
            comparison,
            then,
            otherwise,
        } => {
            let key = tree.string_literal(KEYS[*key]);
            let mut condition = tree.call_expr("qx.core.Environment.get", [key]);
            if let Some((operator, compared)) = comparison {
                let compared =
                    literal::materialize(tree, compared, None, Location::default).unwrap();
                condition = tree.operation(operator, condition, compared);
            }
            if_statement(tree, condition, then, otherwise)
        }
        Stmt::IfIsSet {
            key,
            candidates,
            then,
            otherwise,
        } => {
            let key = tree.string_literal(KEYS[*key]);
            let candidates = tree.string_literal(candidates);
            let condition = tree.call_expr("qx.core.Variant.isSet", [key, candidates]);
            if_statement(tree, condition, then, otherwise)
        }
    }
}

fn if_statement(tree: &mut Tree, condition: NodeId, then: &[Stmt], otherwise: &[Stmt]) -> NodeId {
    let then = then.iter().map(|stmt| build(tree, stmt)).collect::<Vec<_>>();
    let otherwise = otherwise.iter().map(|stmt| build(tree, stmt)).collect::<Vec<_>>();
    tree.if_statement(condition, then, Some(otherwise))
}

fn build_tree(program: &[Stmt]) -> Tree {
    let mut tree = Tree::default();
    let statements = program.iter().map(|stmt| build(&mut tree, stmt)).collect::<Vec<_>>();
    tree.push_statements(statements);
    tree
}

fn variant_map(values: Vec<Option<Scalar>>) -> VariantMap {
    KEYS.iter()
        .zip(values)
        .filter_map(|(key, value)| Some((*key, value?)))
        .collect()
}

fn assert_consistent(tree: &Tree) -> Result<(), TestCaseError> {
    prop_assert_eq!(tree.parent(tree.root()), None);
    let mut seen = HashSet::new();
    for id in tree.descendants(tree.root()) {
        prop_assert!(seen.insert(id), "node reachable twice");
        for &child in tree.children(id) {
            prop_assert_eq!(tree.parent(child), Some(id));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_fully_configured_trees_resolve_completely(
        program in prop::collection::vec(arb_stmt(), 1..4),
        values in prop::collection::vec(arb_scalar(), KEYS.len()),
    ) {
        let mut tree = build_tree(&program);
        let variants = variant_map(values.into_iter().map(Some).collect());
        let optimizer = Optimizer::default();

        optimizer.optimize(&mut tree, &variants, &mut LogContext::default()).unwrap();

        assert_consistent(&tree)?;
        prop_assert!(optimizer.call_sites(&tree).is_empty());
    }

    #[test]
    fn test_second_pass_is_a_no_op(
        program in prop::collection::vec(arb_stmt(), 1..4),
        values in prop::collection::vec(prop::option::of(arb_scalar()), KEYS.len()),
    ) {
        let mut tree = build_tree(&program);
        let variants = variant_map(values);
        let optimizer = Optimizer::default();

        optimizer.optimize(&mut tree, &variants, &mut LogContext::default()).unwrap();
        let resolved = tree.sexp(tree.root());
        let mut log = LogContext::default();
        let modified = optimizer.optimize(&mut tree, &variants, &mut log).unwrap();

        prop_assert!(!modified);
        prop_assert_eq!(tree.sexp(tree.root()), resolved);
        prop_assert!(log.warnings().next().is_none());
        assert_consistent(&tree)?;
    }
}
