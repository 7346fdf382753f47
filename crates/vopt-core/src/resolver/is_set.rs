use super::{
    Resolver,
    inline::{enclosing_hook, enclosing_if, inline_hook, inline_if},
    key_arguments,
};
use crate::{
    discovery::CallSite,
    error::Error,
    literal,
    scalar::Scalar,
    tree::attr,
};

/// Whether the configured value is one of the `|`-separated `candidates`.
///
/// Plain string comparison: only a string setting can match, and the
/// `on`/`true` aliases of `select` do not apply.
pub(crate) fn is_set_match(candidates: &str, configured: &Scalar) -> bool {
    configured
        .as_str()
        .is_some_and(|configured| candidates.split('|').any(|part| part == configured))
}

impl Resolver<'_> {
    pub(super) fn is_set(&mut self, site: &CallSite) -> Result<bool, Error> {
        let Some((key, args)) = key_arguments(self.tree, self.log, site, 2) else {
            return Ok(false);
        };
        let Some(configured) = self.variants.lookup(&key) else {
            return Ok(false);
        };

        let candidates = args[1];
        if !literal::is_string_literal(self.tree, candidates) {
            self.log.warn(
                self.tree,
                candidates,
                format!(
                    "The second parameter of {} must be a string literal. Ignoring this occurrence.",
                    site.callee
                ),
            );
            return Ok(false);
        }
        let matched = is_set_match(
            self.tree
                .node(candidates)
                .get_str(attr::VALUE)
                .unwrap_or_default(),
            configured,
        );

        if let Some(loop_node) = enclosing_if(self.tree, site.call) {
            self.log.info(
                self.tree,
                loop_node,
                format!("Inlined if for variant ({key}:{configured}), taking the {} branch", branch_name(matched)),
            );
            inline_if(self.tree, loop_node, matched);
        } else if let Some(operation) = enclosing_hook(self.tree, site.call) {
            self.log.info(
                self.tree,
                operation,
                format!("Inlined ternary for variant ({key}:{configured}), taking the {} branch", branch_name(matched)),
            );
            inline_hook(self.tree, operation, matched);
        } else {
            let line = self.tree.node(site.call).line();
            let constant = literal::boolean(self.tree, matched, line);
            self.tree.replace_node(site.call, constant);
        }
        Ok(true)
    }
}

fn branch_name(matched: bool) -> &'static str {
    if matched { "then" } else { "else" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Optimizer,
        diagnostic::LogContext,
        tree::{NodeId, Tree},
        variant::VariantMap,
    };
    use rstest::rstest;

    const IS_SET: &str = "qx.core.Variant.isSet";

    #[rstest]
    #[case::exact("on", Scalar::from("on"), true)]
    #[case::pipe_part("gecko|webkit", Scalar::from("webkit"), true)]
    #[case::no_part("gecko|webkit", Scalar::from("mshtml"), false)]
    #[case::no_alias("true", Scalar::from("on"), false)]
    #[case::bool_is_not_a_string("true", Scalar::Bool(true), false)]
    #[case::number_is_not_a_string("1", Scalar::Int(1), false)]
    #[case::case_sensitive("On", Scalar::from("on"), false)]
    fn test_is_set_match(#[case] candidates: &str, #[case] configured: Scalar, #[case] expected: bool) {
        assert_eq!(is_set_match(candidates, &configured), expected);
    }

    fn is_set_call(tree: &mut Tree, callee: &str, value: &str) -> NodeId {
        let key = tree.string_literal("qx.debug");
        let value = tree.string_literal(value);
        tree.call_expr(callee, [key, value])
    }

    fn run(tree: &mut Tree, value: &str) -> (bool, LogContext) {
        let variants = VariantMap::from_iter([("qx.debug", value)]);
        let mut log = LogContext::default();
        let modified = Optimizer::default()
            .optimize(tree, &variants, &mut log)
            .unwrap();
        (modified, log)
    }

    #[rstest]
    #[case::matched("on", "(file (block (call (operand A) (params))))")]
    #[case::unmatched("off", "(file (block (call (operand B) (params))))")]
    fn test_is_set_in_if(#[case] configured: &str, #[case] expected: &str) {
        let mut tree = Tree::default();
        let call = is_set_call(&mut tree, IS_SET, "on");
        let a = tree.call_expr("A", []);
        let b = tree.call_expr("B", []);
        let loop_node = tree.if_statement(call, [a], Some(vec![b]));
        tree.push_statements([loop_node]);

        let (modified, _) = run(&mut tree, configured);

        assert!(modified);
        assert_eq!(tree.sexp(tree.root()), expected);
    }

    #[test]
    fn test_compiler_is_set_in_grouped_if() {
        let mut tree = Tree::default();
        let call = is_set_call(&mut tree, "qx.core.Environment.compilerIsSet", "on");
        let group = tree.group(call);
        let a = tree.call_expr("A", []);
        let loop_node = tree.if_statement(group, [a], None);
        tree.push_statements([loop_node]);

        let (modified, _) = run(&mut tree, "off");

        assert!(modified);
        assert_eq!(tree.sexp(tree.root()), "(file (block))");
    }

    #[rstest]
    #[case::matched("on", "(file a)")]
    #[case::unmatched("off", "(file b)")]
    fn test_is_set_in_ternary(#[case] configured: &str, #[case] expected: &str) {
        let mut tree = Tree::default();
        let call = is_set_call(&mut tree, IS_SET, "on");
        let a = tree.identifier("a");
        let b = tree.identifier("b");
        let hook = tree.hook(call, a, b);
        tree.push_statements([hook]);

        run(&mut tree, configured);

        assert_eq!(tree.sexp(tree.root()), expected);
    }

    #[test]
    fn test_is_set_in_general_context() {
        let mut tree = Tree::default();
        let call = is_set_call(&mut tree, IS_SET, "on|debug");
        tree.at_line(call, 9);
        let other = tree.identifier("ready");
        let operation = tree.operation("AND", call, other);
        let var = tree.var_statement([("x", Some(operation))]);
        tree.push_statements([var]);

        run(&mut tree, "debug");

        assert_eq!(
            tree.sexp(tree.root()),
            "(file (var (definition:x (assignment (left x) (right (operation:AND (first true) (second ready)))))))"
        );
        let constant = tree
            .descendants(tree.root())
            .find(|&id| literal::is_constant(&tree, id))
            .unwrap();
        assert_eq!(tree.node(constant).line(), Some(9));
    }

    #[test]
    fn test_is_set_requires_string_value() {
        let mut tree = Tree::default();
        let key = tree.string_literal("qx.debug");
        let value = tree.identifier("mode");
        let call = tree.call_expr(IS_SET, [key, value]);
        tree.push_statements([call]);

        let (modified, log) = run(&mut tree, "on");

        assert!(!modified);
        assert!(tree.is_attached(call));
        assert_eq!(
            log.warnings().next().map(|w| w.message.as_str()),
            Some("The second parameter of qx.core.Variant.isSet must be a string literal. Ignoring this occurrence.")
        );
    }

    #[test]
    fn test_is_set_unknown_key() {
        let mut tree = Tree::default();
        let key = tree.string_literal("qx.other");
        let value = tree.identifier("mode");
        let call = tree.call_expr(IS_SET, [key, value]);
        tree.push_statements([call]);

        let (modified, log) = run(&mut tree, "on");

        assert!(!modified);
        assert!(log.diagnostics().is_empty());
    }
}
