use std::collections::BTreeMap;

#[cfg(feature = "tree-json")]
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use strum::{AsRefStr, Display, EnumString};

use crate::{arena::ArenaId, scalar::Scalar};

pub type NodeId = ArenaId<Node>;
pub type Attributes = BTreeMap<SmolStr, Scalar>;

/// Attribute names the optimizer reads or writes.
pub mod attr {
    pub const CONSTANT_TYPE: &str = "constantType";
    pub const DETAIL: &str = "detail";
    pub const IDENTIFIER: &str = "identifier";
    pub const KEY: &str = "key";
    pub const LINE: &str = "line";
    pub const LOOP_TYPE: &str = "loopType";
    pub const NAME: &str = "name";
    pub const OPERATOR: &str = "operator";
    pub const VALUE: &str = "value";
}

/// The closed vocabulary of node tags.
#[cfg_attr(feature = "tree-json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "tree-json", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum NodeKind {
    File,
    Block,
    EmptyStatement,
    Statement,
    ElseStatement,
    Expression,
    Loop,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Throw,
    Call,
    Operand,
    Params,
    Variable,
    Identifier,
    Accessor,
    Key,
    Map,
    #[cfg_attr(feature = "tree-json", serde(rename = "keyvalue"))]
    #[strum(serialize = "keyvalue")]
    KeyValue,
    Value,
    Array,
    Constant,
    Operation,
    First,
    Second,
    Third,
    Group,
    Assignment,
    Left,
    Right,
    Function,
    Body,
    Instantiation,
    Var,
    Definition,
    DefinitionList,
    Comment,
    CommentsBefore,
    CommentsAfter,
}

impl NodeKind {
    /// Comment nodes are ignored by "sole child" checks.
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            NodeKind::Comment | NodeKind::CommentsBefore | NodeKind::CommentsAfter
        )
    }
}

/// A syntax tree node stored in a [`Tree`](super::Tree).
///
/// `children` and `parent` are only changed through the tree's mutation
/// primitives so the two directions never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub attributes: Attributes,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Attributes::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.attributes.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Scalar::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Scalar>) {
        self.attributes.insert(SmolStr::from(name), value.into());
    }

    pub fn line(&self) -> Option<i64> {
        self.get(attr::LINE).and_then(Scalar::as_int)
    }

    #[inline(always)]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }
}
