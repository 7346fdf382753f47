//! Encoding of scalar values as `constant` nodes and back.
//!
//! A constant carries `constantType` (`string`, `number`, `boolean`, `null`),
//! its literal text in `value` and, for numbers, `detail` (`int`/`float`).
//! The text mirrors JavaScript literal syntax since the code generator emits
//! it verbatim.

use smol_str::SmolStr;
use strum::{AsRefStr, EnumString, IntoStaticStr};

use crate::{
    diagnostic::Location,
    error::Error,
    scalar::Scalar,
    tree::{NodeId, NodeKind, Tree, attr},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConstantType {
    String,
    Number,
    Boolean,
    Null,
}

impl ConstantType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum NumberDetail {
    Int,
    Float,
}

impl NumberDetail {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

pub fn is_constant(tree: &Tree, id: NodeId) -> bool {
    tree.node(id).is(NodeKind::Constant)
}

pub fn is_string_literal(tree: &Tree, id: NodeId) -> bool {
    constant_type(tree, id) == Some(ConstantType::String)
}

pub fn constant_type(tree: &Tree, id: NodeId) -> Option<ConstantType> {
    let node = tree.node(id);
    if !node.is(NodeKind::Constant) {
        return None;
    }
    node.get_str(attr::CONSTANT_TYPE)?.parse().ok()
}

/// Builds a detached constant node for `value`, tagged with `line`.
///
/// Fails for values JavaScript literal syntax cannot express (non-finite
/// floats).
pub fn materialize(
    tree: &mut Tree,
    value: &Scalar,
    line: Option<i64>,
    location: impl FnOnce() -> Location,
) -> Result<NodeId, Error> {
    let id = match value {
        Scalar::String(s) => tree.string_literal(s),
        // Booleans are matched before numbers so `true` never turns into `1`.
        Scalar::Bool(b) => tree.bool_literal(*b),
        Scalar::Int(n) => tree.int_literal(*n),
        Scalar::Float(f) if f.is_finite() => tree.float_literal(*f),
        Scalar::Float(f) => {
            return Err(Error::UnsupportedValue {
                value: f.to_string(),
                location: location(),
            });
        }
        Scalar::Null => tree.null_literal(),
    };
    if let Some(line) = line {
        tree.at_line(id, line);
    }
    Ok(id)
}

/// Builds a detached boolean constant tagged with `line`.
pub fn boolean(tree: &mut Tree, value: bool, line: Option<i64>) -> NodeId {
    let id = tree.bool_literal(value);
    if let Some(line) = line {
        tree.at_line(id, line);
    }
    id
}

/// Decodes a constant node into the scalar its literal denotes.
///
/// Returns `None` for non-constants and for literal text that does not parse
/// (e.g. hex or exponent forms the optimizer does not interpret).
pub fn decode(tree: &Tree, id: NodeId) -> Option<Scalar> {
    let node = tree.node(id);
    let text = node.get_str(attr::VALUE);
    match constant_type(tree, id)? {
        ConstantType::String => Some(Scalar::String(SmolStr::from(text.unwrap_or_default()))),
        ConstantType::Boolean => match text? {
            "true" => Some(Scalar::Bool(true)),
            "false" => Some(Scalar::Bool(false)),
            _ => None,
        },
        ConstantType::Null => Some(Scalar::Null),
        ConstantType::Number => {
            let text = text?;
            match node
                .get_str(attr::DETAIL)
                .and_then(|detail| detail.parse::<NumberDetail>().ok())
            {
                Some(NumberDetail::Int) => text.parse().ok().map(Scalar::Int),
                Some(NumberDetail::Float) => text.parse().ok().map(Scalar::Float),
                None => text
                    .parse()
                    .map(Scalar::Int)
                    .or_else(|_| text.parse().map(Scalar::Float))
                    .ok(),
            }
        }
    }
}
