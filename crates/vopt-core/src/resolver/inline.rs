//! Structural context queries and the branch-inlining rewrites shared by the
//! `isSet` and `get` resolvers.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::tree::{NodeId, NodeKind, Tree, attr};

const IF_LOOP_TYPE: &str = "IF";
const HOOK_OPERATOR: &str = "HOOK";

/// Returns the nearest non-group ancestor of `node` if `node` is its only
/// content, looking through single-child groups.
pub(super) fn sole_content_parent(tree: &Tree, node: NodeId) -> Option<NodeId> {
    let parent = tree.nearest_non_group_ancestor(node, None)?;
    let sole = tree.children_len(parent, true) == 1
        && tree
            .first_child(parent, true)
            .map(|child| tree.skip_groups(child))
            == Some(node);
    sole.then_some(parent)
}

/// If `node` is the whole condition of an `if`, returns the `loop` node.
pub(super) fn enclosing_if(tree: &Tree, node: NodeId) -> Option<NodeId> {
    let expression = sole_content_parent(tree, node)?;
    if !tree.node(expression).is(NodeKind::Expression) {
        return None;
    }
    let loop_node = tree.parent(expression)?;
    let node = tree.node(loop_node);
    (node.is(NodeKind::Loop) && node.get_str(attr::LOOP_TYPE) == Some(IF_LOOP_TYPE))
        .then_some(loop_node)
}

/// If `node` is the whole condition of a ternary, returns the `operation` node.
pub(super) fn enclosing_hook(tree: &Tree, node: NodeId) -> Option<NodeId> {
    let first = sole_content_parent(tree, node)?;
    if !tree.node(first).is(NodeKind::First) {
        return None;
    }
    let operation = tree.parent(first)?;
    let node = tree.node(operation);
    (node.is(NodeKind::Operation) && node.get_str(attr::OPERATOR) == Some(HOOK_OPERATOR))
        .then_some(operation)
}

/// Replaces an `if` with the statements of the branch `condition` selects.
///
/// With nothing left to keep the `if` becomes an empty block. `var`
/// declarations of the dropped branch that the kept branch does not repeat
/// survive as bare definitions, so hoisted names stay declared.
pub(super) fn inline_if(tree: &mut Tree, loop_node: NodeId, condition: bool) {
    let then_branch = tree.child_by_kind(loop_node, NodeKind::Statement);
    let else_branch = tree.child_by_kind(loop_node, NodeKind::ElseStatement);
    let (kept, dropped) = if condition {
        (then_branch, else_branch)
    } else {
        (else_branch, then_branch)
    };
    let line = tree.node(loop_node).line();

    let mut replacement = kept
        .map(|kept| tree.children(kept).to_vec())
        .unwrap_or_default();

    if let Some(dropped) = dropped {
        let kept_names = kept
            .map(|kept| {
                declarations(tree, kept)
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect::<FxHashSet<_>>()
            })
            .unwrap_or_default();
        let mut seen = FxHashSet::default();
        let lost = declarations(tree, dropped)
            .into_iter()
            .filter(|(name, _)| !kept_names.contains(name) && seen.insert(name.clone()))
            .collect::<Vec<_>>();

        if !lost.is_empty() {
            let definitions = lost
                .into_iter()
                .map(|(name, definition_line)| {
                    let definition = tree.create(NodeKind::Definition);
                    let node = tree.node_mut(definition);
                    node.set(attr::IDENTIFIER, name);
                    if let Some(definition_line) = definition_line {
                        node.set(attr::LINE, definition_line);
                    }
                    definition
                })
                .collect::<Vec<_>>();
            let list = tree.create_with_children(NodeKind::DefinitionList, definitions);
            if let Some(line) = line {
                tree.at_line(list, line);
            }
            replacement.push(list);
        }
    }

    if replacement.is_empty() {
        let block = tree.create(NodeKind::Block);
        if let Some(line) = line {
            tree.at_line(block, line);
        }
        replacement.push(block);
    }

    tree.replace_node_with_sequence(loop_node, &replacement);
}

/// Replaces a ternary with the contents of the slot `condition` selects.
pub(super) fn inline_hook(tree: &mut Tree, operation: NodeId, condition: bool) {
    let slot = if condition {
        NodeKind::Second
    } else {
        NodeKind::Third
    };
    let replacement = tree
        .child_by_kind(operation, slot)
        .map(|slot| tree.children(slot).to_vec())
        .unwrap_or_default();
    tree.replace_node_with_sequence(operation, &replacement);
}

/// `var` declarations directly in the function scope of `root`, i.e. not
/// inside a nested function, in source order.
fn declarations(tree: &Tree, root: NodeId) -> Vec<(SmolStr, Option<i64>)> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        match node.kind {
            NodeKind::Function => continue,
            NodeKind::Definition => {
                if let Some(name) = node.get_str(attr::IDENTIFIER) {
                    found.push((SmolStr::from(name), node.line()));
                }
            }
            _ => {}
        }
        stack.extend(tree.children(id).iter().rev().copied());
    }
    found
}
