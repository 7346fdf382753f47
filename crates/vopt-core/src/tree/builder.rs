//! Construction helpers for the node shapes the optimizer understands.
//!
//! Parser glue and tests use these to build trees without spelling out every
//! slot node by hand. All helpers return detached nodes unless noted.

use smol_str::SmolStr;

use super::{NodeId, NodeKind, Tree, attr};
use crate::literal::{ConstantType, NumberDetail};

impl Tree {
    pub fn identifier(&mut self, name: &str) -> NodeId {
        let id = self.create(NodeKind::Identifier);
        self.node_mut(id).set(attr::NAME, name);
        id
    }

    /// A dotted name such as `qx.core.Environment.get` as a `variable` node
    /// holding one `identifier` per segment.
    pub fn variable(&mut self, dotted: &str) -> NodeId {
        let identifiers = dotted
            .split('.')
            .map(|segment| self.identifier(segment))
            .collect::<Vec<_>>();
        self.create_with_children(NodeKind::Variable, identifiers)
    }

    /// `callee(args...)` as `call(operand(variable), params(args...))`.
    pub fn call_expr(&mut self, callee: &str, args: impl IntoIterator<Item = NodeId>) -> NodeId {
        let variable = self.variable(callee);
        let operand = self.create_with_children(NodeKind::Operand, [variable]);
        let params = self.create_with_children(NodeKind::Params, args);
        self.create_with_children(NodeKind::Call, [operand, params])
    }

    pub fn string_literal(&mut self, value: &str) -> NodeId {
        let id = self.constant(ConstantType::String, value);
        self.node_mut(id).set(attr::DETAIL, "doublequotes");
        id
    }

    pub fn int_literal(&mut self, value: i64) -> NodeId {
        let id = self.constant(ConstantType::Number, &value.to_string());
        self.node_mut(id).set(attr::DETAIL, NumberDetail::Int.as_str());
        id
    }

    pub fn float_literal(&mut self, value: f64) -> NodeId {
        let id = self.constant(ConstantType::Number, &format!("{value:?}"));
        self.node_mut(id).set(attr::DETAIL, NumberDetail::Float.as_str());
        id
    }

    pub fn bool_literal(&mut self, value: bool) -> NodeId {
        self.constant(ConstantType::Boolean, if value { "true" } else { "false" })
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.constant(ConstantType::Null, "null")
    }

    fn constant(&mut self, constant_type: ConstantType, value: &str) -> NodeId {
        let id = self.create(NodeKind::Constant);
        let node = self.node_mut(id);
        node.set(attr::CONSTANT_TYPE, constant_type.as_str());
        node.set(attr::VALUE, value);
        id
    }

    /// An object literal; each entry becomes `keyvalue[key](value(expr))`.
    pub fn map_literal<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, NodeId)>,
    ) -> NodeId {
        let pairs = entries
            .into_iter()
            .map(|(key, expr)| {
                let value = self.create_with_children(NodeKind::Value, [expr]);
                let pair = self.create_with_children(NodeKind::KeyValue, [value]);
                self.node_mut(pair).set(attr::KEY, key);
                pair
            })
            .collect::<Vec<_>>();
        self.create_with_children(NodeKind::Map, pairs)
    }

    pub fn group(&mut self, inner: NodeId) -> NodeId {
        self.create_with_children(NodeKind::Group, [inner])
    }

    pub fn block(&mut self, statements: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.create_with_children(NodeKind::Block, statements)
    }

    /// A binary operation `first <operator> second`.
    pub fn operation(&mut self, operator: &str, first: NodeId, second: NodeId) -> NodeId {
        let first = self.create_with_children(NodeKind::First, [first]);
        let second = self.create_with_children(NodeKind::Second, [second]);
        let id = self.create_with_children(NodeKind::Operation, [first, second]);
        self.node_mut(id).set(attr::OPERATOR, operator);
        id
    }

    /// The ternary `condition ? then : otherwise`.
    pub fn hook(&mut self, condition: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        let first = self.create_with_children(NodeKind::First, [condition]);
        let second = self.create_with_children(NodeKind::Second, [then]);
        let third = self.create_with_children(NodeKind::Third, [otherwise]);
        let id = self.create_with_children(NodeKind::Operation, [first, second, third]);
        self.node_mut(id).set(attr::OPERATOR, "HOOK");
        id
    }

    /// `if (condition) then [else otherwise]`, each branch wrapped in a block.
    pub fn if_statement(
        &mut self,
        condition: NodeId,
        then: impl IntoIterator<Item = NodeId>,
        otherwise: Option<Vec<NodeId>>,
    ) -> NodeId {
        let expression = self.create_with_children(NodeKind::Expression, [condition]);
        let then_block = self.block(then);
        let statement = self.create_with_children(NodeKind::Statement, [then_block]);
        let mut children = vec![expression, statement];
        if let Some(otherwise) = otherwise {
            let else_block = self.block(otherwise);
            children.push(self.create_with_children(NodeKind::ElseStatement, [else_block]));
        }
        let id = self.create_with_children(NodeKind::Loop, children);
        self.node_mut(id).set(attr::LOOP_TYPE, "IF");
        id
    }

    /// `var a, b = init, ...`; pass `None` for a declaration without initializer.
    pub fn var_statement<'a>(
        &mut self,
        definitions: impl IntoIterator<Item = (&'a str, Option<NodeId>)>,
    ) -> NodeId {
        let definitions = definitions
            .into_iter()
            .map(|(name, init)| {
                let definition = self.create(NodeKind::Definition);
                self.node_mut(definition)
                    .set(attr::IDENTIFIER, SmolStr::from(name));
                if let Some(init) = init {
                    let target = self.identifier(name);
                    let left = self.create_with_children(NodeKind::Left, [target]);
                    let right = self.create_with_children(NodeKind::Right, [init]);
                    let assignment =
                        self.create_with_children(NodeKind::Assignment, [left, right]);
                    self.append_child(definition, assignment);
                }
                definition
            })
            .collect::<Vec<_>>();
        self.create_with_children(NodeKind::Var, definitions)
    }

    /// `function (params) { body }`.
    pub fn function_expr(&mut self, body: impl IntoIterator<Item = NodeId>) -> NodeId {
        let params = self.create(NodeKind::Params);
        let block = self.block(body);
        let body = self.create_with_children(NodeKind::Body, [block]);
        self.create_with_children(NodeKind::Function, [params, body])
    }

    /// Sets the `line` attribute and returns the node for chaining.
    pub fn at_line(&mut self, id: NodeId, line: i64) -> NodeId {
        self.node_mut(id).set(attr::LINE, line);
        id
    }

    /// Attaches `statements` to the root in order.
    pub fn push_statements(&mut self, statements: impl IntoIterator<Item = NodeId>) {
        let root = self.root();
        for statement in statements {
            self.append_child(root, statement);
        }
    }
}
