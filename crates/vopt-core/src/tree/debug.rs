use itertools::Itertools;

use super::{NodeId, NodeKind, Tree, attr};

impl Tree {
    /// Renders a subtree as an S-expression for diagnostics and tests.
    ///
    /// Constants print as their literal text (strings quoted), identifiers as
    /// their name and variables as the dotted path. Every other node prints as
    /// `(kind[:label] children...)` where the label is the operator, loop type,
    /// map key or declared identifier when the node carries one.
    pub fn sexp(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.kind {
            NodeKind::Constant => match node.get_str(attr::CONSTANT_TYPE) {
                Some("string") => format!("{:?}", node.get_str(attr::VALUE).unwrap_or_default()),
                _ => node.get_str(attr::VALUE).unwrap_or_default().to_string(),
            },
            NodeKind::Identifier => node.get_str(attr::NAME).unwrap_or_default().to_string(),
            NodeKind::Variable => self
                .children(id)
                .iter()
                .filter_map(|&child| self.node(child).get_str(attr::NAME))
                .join("."),
            kind => {
                let label = match kind {
                    NodeKind::Operation => node.get_str(attr::OPERATOR),
                    NodeKind::Loop => node.get_str(attr::LOOP_TYPE),
                    NodeKind::KeyValue => node.get_str(attr::KEY),
                    NodeKind::Definition => node.get_str(attr::IDENTIFIER),
                    _ => None,
                };
                let head = match label {
                    Some(label) => format!("{kind}:{label}"),
                    None => kind.to_string(),
                };

                let body = std::iter::once(head)
                    .chain(self.children(id).iter().map(|&child| self.sexp(child)))
                    .join(" ");
                format!("({body})")
            }
        }
    }
}
