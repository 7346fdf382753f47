#![cfg(feature = "tree-json")]

use vopt_core::{LogContext, NodeKind, Optimizer, Scalar, Tree, VariantMap, attr};

const IF_GET_JSON: &str = r#"{
  "type": "file",
  "children": [
    {
      "type": "loop",
      "attributes": {"loopType": "IF", "line": 3},
      "children": [
        {"type": "expression", "children": [
          {"type": "call", "attributes": {"line": 3}, "children": [
            {"type": "operand", "children": [
              {"type": "variable", "children": [
                {"type": "identifier", "attributes": {"name": "qx"}},
                {"type": "identifier", "attributes": {"name": "core"}},
                {"type": "identifier", "attributes": {"name": "Environment"}},
                {"type": "identifier", "attributes": {"name": "get"}}
              ]}
            ]},
            {"type": "params", "children": [
              {"type": "constant", "attributes": {"constantType": "string", "value": "qx.debug", "detail": "doublequotes"}}
            ]}
          ]}
        ]},
        {"type": "statement", "children": [
          {"type": "block", "children": [
            {"type": "call", "children": [
              {"type": "operand", "children": [
                {"type": "variable", "children": [{"type": "identifier", "attributes": {"name": "debug"}}]}
              ]},
              {"type": "params"}
            ]}
          ]}
        ]}
      ]
    }
  ]
}"#;

#[test]
fn test_from_json() {
    let tree = Tree::from_json(IF_GET_JSON).unwrap();
    let root = tree.root();
    let loop_node = tree.first_child(root, true).unwrap();

    assert_eq!(tree.kind(root), NodeKind::File);
    assert_eq!(tree.kind(loop_node), NodeKind::Loop);
    assert_eq!(tree.node(loop_node).get(attr::LINE), Some(&Scalar::Int(3)));
    assert_eq!(
        tree.sexp(root),
        r#"(file (loop:IF (expression (call (operand qx.core.Environment.get) (params "qx.debug"))) (statement (block (call (operand debug) (params))))))"#
    );
}

#[test]
fn test_optimize_json_tree() {
    let mut tree = Tree::from_json(IF_GET_JSON).unwrap();
    let variants = VariantMap::from_json(r#"{"qx.debug": "off"}"#).unwrap();

    let modified = Optimizer::default()
        .optimize(&mut tree, &variants, &mut LogContext::default())
        .unwrap();

    assert!(modified);
    let json: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "file",
            "children": [{"type": "block", "attributes": {"line": 3}}]
        })
    );
}

#[test]
fn test_json_round_trip_keeps_attributes() {
    let tree = Tree::from_json(IF_GET_JSON).unwrap();
    let pretty = tree.to_json_pretty().unwrap();
    let reparsed = Tree::from_json(&pretty).unwrap();

    assert_eq!(reparsed.sexp(reparsed.root()), tree.sexp(tree.root()));
    assert_eq!(reparsed.arena_len(), tree.arena_len());
}

#[test]
fn test_from_json_deeply_nested() {
    let depth = 500;
    let json = format!(
        r#"{{"type": "file", "children": [{}{{"type": "constant", "attributes": {{"constantType": "number", "value": 1}}}}{}]}}"#,
        r#"{"type": "group", "children": ["#.repeat(depth),
        "]}".repeat(depth)
    );

    let tree = Tree::from_json(&json).unwrap();
    let nodes = tree.descendants(tree.root()).collect::<Vec<_>>();

    assert_eq!(nodes.len(), depth + 2);
    assert_eq!(tree.kind(nodes[depth + 1]), NodeKind::Constant);
    assert_eq!(
        tree.skip_groups(tree.first_child(tree.root(), true).unwrap()),
        nodes[depth + 1]
    );

    let reparsed = Tree::from_json(&tree.to_json().unwrap()).unwrap();
    assert_eq!(reparsed.arena_len(), depth + 2);
}

#[test]
fn test_variant_map_from_json() {
    let variants =
        VariantMap::from_json(r#"{"a": "on", "b": true, "c": 2, "d": 0.5, "e": null}"#).unwrap();

    assert_eq!(variants.lookup("a"), Some(&Scalar::from("on")));
    assert_eq!(variants.lookup("b"), Some(&Scalar::Bool(true)));
    assert_eq!(variants.lookup("c"), Some(&Scalar::Int(2)));
    assert_eq!(variants.lookup("d"), Some(&Scalar::Float(0.5)));
    assert_eq!(variants.lookup("e"), Some(&Scalar::Null));
}
