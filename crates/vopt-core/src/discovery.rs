//! Finds the variant primitive calls in a tree.

use itertools::Itertools;
use smol_str::SmolStr;
use strum::{Display, EnumString};

use crate::tree::{NodeId, NodeKind, Tree, attr};

/// Namespace roots the primitives are historically reachable through.
pub const DEFAULT_NAMESPACES: [&str; 2] = ["qx.core.Variant", "qx.core.Environment"];

/// The recognized primitive methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum VariantMethod {
    Select,
    IsSet,
    CompilerIsSet,
    Get,
}

/// A call of one of the primitives, e.g. `qx.core.Environment.get("qx.debug")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// The `call` node.
    pub call: NodeId,
    pub method: VariantMethod,
    /// The full callee name, e.g. `qx.core.Environment.get`.
    pub callee: SmolStr,
}

/// Collects all primitive call sites under the root, in pre-order.
///
/// A `variable` node qualifies when its identifiers spell `<root>.<method>`
/// for one of `namespaces`, `<method>` is a [`VariantMethod`], and the
/// variable is the callee operand of a `call` (`call/operand/variable`).
pub fn find_call_sites(tree: &Tree, namespaces: &[SmolStr]) -> Vec<CallSite> {
    tree.descendants(tree.root())
        .filter(|&id| tree.node(id).is(NodeKind::Variable))
        .filter_map(|variable| {
            let segments = tree
                .children(variable)
                .iter()
                .map(|&child| {
                    let node = tree.node(child);
                    node.is(NodeKind::Identifier)
                        .then(|| node.get_str(attr::NAME))
                        .flatten()
                })
                .collect::<Option<Vec<_>>>()?;
            let (method, prefix) = segments.split_last()?;

            let dotted_prefix = prefix.iter().join(".");
            if !namespaces.iter().any(|root| root == dotted_prefix.as_str()) {
                return None;
            }
            let method = method.parse::<VariantMethod>().ok()?;
            let call = callee_call(tree, variable)?;

            Some(CallSite {
                call,
                method,
                callee: SmolStr::from(segments.iter().join(".")),
            })
        })
        .collect()
}

/// Returns the `call` node when `variable` sits in `call/operand/variable`.
fn callee_call(tree: &Tree, variable: NodeId) -> Option<NodeId> {
    let operand = tree.parent(variable)?;
    if !tree.node(operand).is(NodeKind::Operand) {
        return None;
    }
    let call = tree.parent(operand)?;
    tree.node(call).is(NodeKind::Call).then_some(call)
}

/// The argument nodes of a call, comments skipped.
pub fn call_args(tree: &Tree, call: NodeId) -> Vec<NodeId> {
    tree.child_by_kind(call, NodeKind::Params)
        .map(|params| tree.children_iter(params, true).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn namespaces() -> Vec<SmolStr> {
        DEFAULT_NAMESPACES.iter().map(|ns| SmolStr::from(*ns)).collect()
    }

    #[rstest]
    #[case::environment_get("qx.core.Environment.get", Some(VariantMethod::Get))]
    #[case::variant_select("qx.core.Variant.select", Some(VariantMethod::Select))]
    #[case::variant_is_set("qx.core.Variant.isSet", Some(VariantMethod::IsSet))]
    #[case::compiler_is_set("qx.core.Environment.compilerIsSet", Some(VariantMethod::CompilerIsSet))]
    #[case::unknown_method("qx.core.Environment.add", None)]
    #[case::other_namespace("qx.core.Setting.get", None)]
    #[case::too_deep("qx.core.Environment.get.call", None)]
    #[case::root_only("qx.core.Environment", None)]
    fn test_find_call_sites_by_callee(
        #[case] callee: &str,
        #[case] expected: Option<VariantMethod>,
    ) {
        let mut tree = Tree::default();
        let key = tree.string_literal("qx.debug");
        let call = tree.call_expr(callee, [key]);
        tree.push_statements([call]);

        let sites = find_call_sites(&tree, &namespaces());
        assert_eq!(sites.first().map(|site| site.method), expected);
        if expected.is_some() {
            assert_eq!(sites[0].call, call);
            assert_eq!(sites[0].callee, callee);
        }
    }

    #[test]
    fn test_reference_without_call_is_ignored() {
        let mut tree = Tree::default();
        let variable = tree.variable("qx.core.Environment.get");
        tree.push_statements([variable]);

        assert!(find_call_sites(&tree, &namespaces()).is_empty());
    }

    #[test]
    fn test_argument_position_is_ignored() {
        let mut tree = Tree::default();
        let reference = tree.variable("qx.core.Environment.get");
        let call = tree.call_expr("foo", [reference]);
        tree.push_statements([call]);

        assert!(find_call_sites(&tree, &namespaces()).is_empty());
    }

    #[test]
    fn test_traversal_order_and_nesting() {
        let mut tree = Tree::default();
        let inner_key = tree.string_literal("b");
        let inner = tree.call_expr("qx.core.Environment.get", [inner_key]);
        let outer_key = tree.string_literal("a");
        let branches = tree.map_literal([("on", inner)]);
        let outer = tree.call_expr("qx.core.Variant.select", [outer_key, branches]);
        let last_key = tree.string_literal("c");
        let last = tree.call_expr("qx.core.Environment.get", [last_key]);
        tree.push_statements([outer, last]);

        let calls = find_call_sites(&tree, &namespaces())
            .into_iter()
            .map(|site| site.call)
            .collect::<Vec<_>>();
        assert_eq!(calls, vec![outer, inner, last]);
    }

    #[test]
    fn test_custom_namespace() {
        let mut tree = Tree::default();
        let key = tree.string_literal("a");
        let call = tree.call_expr("app.Env.get", [key]);
        tree.push_statements([call]);

        assert!(find_call_sites(&tree, &namespaces()).is_empty());
        assert_eq!(find_call_sites(&tree, &[SmolStr::from("app.Env")]).len(), 1);
    }

    #[test]
    fn test_call_args_skip_comments() {
        let mut tree = Tree::default();
        let comment = tree.create(NodeKind::Comment);
        let key = tree.string_literal("a");
        let call = tree.call_expr("f", [comment, key]);

        assert_eq!(call_args(&tree, call), vec![key]);
    }
}
