use strum::EnumString;

use super::{
    Resolver,
    inline::{enclosing_if, inline_if},
    key_arguments,
};
use crate::{
    discovery::CallSite,
    error::Error,
    literal,
    scalar::Scalar,
    tree::{NodeId, NodeKind, Tree, attr},
};

/// The comparison operators folded between two literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
enum EqualityOperator {
    Eq,
    Sheq,
    Ne,
    Shne,
}

impl EqualityOperator {
    fn apply(self, left: &Scalar, right: &Scalar) -> bool {
        let equal = left.loose_eq(right);
        match self {
            EqualityOperator::Eq | EqualityOperator::Sheq => equal,
            EqualityOperator::Ne | EqualityOperator::Shne => !equal,
        }
    }
}

impl Resolver<'_> {
    pub(super) fn get(&mut self, site: &CallSite) -> Result<bool, Error> {
        let Some((key, _)) = key_arguments(self.tree, self.log, site, 1) else {
            return Ok(false);
        };
        let Some(value) = self.variants.lookup(&key) else {
            return Ok(false);
        };

        let line = self.tree.node(site.call).line();
        let location = self.log.location(self.tree, site.call);
        let mut constant = literal::materialize(self.tree, value, line, || location)?;
        self.tree.replace_node(site.call, constant);
        self.log.info(
            self.tree,
            constant,
            format!("Replaced {} with its value ({key}:{value})", site.callee),
        );

        while let Some(folded) = fold_equality(self.tree, constant) {
            constant = folded;
        }

        if let Some(loop_node) = enclosing_if(self.tree, constant)
            && let Some(condition) = condition_value(self.tree, constant)
        {
            self.log.info(
                self.tree,
                loop_node,
                format!("Inlined if with constant condition {condition}"),
            );
            inline_if(self.tree, loop_node, condition);
        }
        Ok(true)
    }
}

/// Folds the equality operation `constant` is a direct operand of, if the
/// other operand is a literal too, returning the boolean literal that
/// replaced the operation.
fn fold_equality(tree: &mut Tree, constant: NodeId) -> Option<NodeId> {
    let slot = tree.nearest_non_group_ancestor(constant, None)?;
    if !matches!(tree.kind(slot), NodeKind::First | NodeKind::Second) {
        return None;
    }
    let operation = tree.parent(slot)?;
    let node = tree.node(operation);
    if !node.is(NodeKind::Operation) {
        return None;
    }
    let operator = node.get_str(attr::OPERATOR)?.parse::<EqualityOperator>().ok()?;

    let other_slot = if tree.kind(slot) == NodeKind::First {
        NodeKind::Second
    } else {
        NodeKind::First
    };
    let other = tree
        .child_by_kind(operation, other_slot)
        .and_then(|other| tree.first_child(other, true))
        .map(|other| tree.skip_groups(other))?;

    let left = comparison_operand(literal::decode(tree, constant)?);
    let right = comparison_operand(literal::decode(tree, other)?);
    let result = operator.apply(&left, &right);

    let line = tree.node(operation).line();
    let folded = literal::boolean(tree, result, line);
    tree.replace_node(operation, folded);
    Some(folded)
}

/// Legacy: `"on"`/`"off"` compare as `true`/`false`.
fn comparison_operand(value: Scalar) -> Scalar {
    match value.as_str() {
        Some("on") => Scalar::Bool(true),
        Some("off") => Scalar::Bool(false),
        _ => value,
    }
}

/// The truth value an `if` takes for a literal condition.
///
/// Legacy: the strings `"off"` and `"false"` count as false.
fn condition_value(tree: &Tree, constant: NodeId) -> Option<bool> {
    let value = literal::decode(tree, constant)?;
    Some(match value.as_str() {
        Some("off" | "false") => false,
        _ => value.is_truthy(),
    })
}
