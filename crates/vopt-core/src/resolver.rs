//! Rewrites for the individual primitives.
//!
//! Each resolver inspects one call site and either rewrites the tree and
//! returns `Ok(true)`, leaves it alone and returns `Ok(false)` (malformed
//! usage is reported as a warning, unknown keys are silent), or fails the
//! whole run with an [`Error`].

use smol_str::SmolStr;

use crate::{
    diagnostic::LogContext,
    discovery::{CallSite, VariantMethod, call_args},
    error::Error,
    literal,
    tree::{NodeId, NodeKind, Tree, attr},
    variant::VariantMap,
};

mod get;
mod inline;
mod is_set;
mod select;

pub use select::{Branch, SelectArgs, select_branches};

pub(crate) struct Resolver<'a> {
    tree: &'a mut Tree,
    variants: &'a VariantMap,
    log: &'a mut LogContext,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(tree: &'a mut Tree, variants: &'a VariantMap, log: &'a mut LogContext) -> Self {
        Self { tree, variants, log }
    }

    pub(crate) fn tree(&self) -> &Tree {
        self.tree
    }

    pub(crate) fn resolve(&mut self, site: &CallSite) -> Result<bool, Error> {
        match site.method {
            VariantMethod::Select => self.select(site),
            VariantMethod::IsSet | VariantMethod::CompilerIsSet => self.is_set(site),
            VariantMethod::Get => self.get(site),
        }
    }
}

/// Checks the argument count and that the first argument is a string
/// literal, warning and returning `None` otherwise.
///
/// On success returns the key text and all arguments.
pub(crate) fn key_arguments(
    tree: &Tree,
    log: &mut LogContext,
    site: &CallSite,
    expected: usize,
) -> Option<(SmolStr, Vec<NodeId>)> {
    let args = call_args(tree, site.call);
    if args.len() != expected {
        let at = tree
            .child_by_kind(site.call, NodeKind::Params)
            .unwrap_or(site.call);
        let count = match expected {
            1 => "one argument",
            2 => "two arguments",
            _ => "a different number of arguments",
        };
        log.warn(
            tree,
            at,
            format!(
                "Expecting exactly {count} for {}. Ignoring this occurrence.",
                site.callee
            ),
        );
        return None;
    }

    let key = args[0];
    if !literal::is_string_literal(tree, key) {
        log.warn(
            tree,
            key,
            "First argument must be a string literal! Ignoring this occurrence.",
        );
        return None;
    }
    let key = tree.node(key).get_str(attr::VALUE).unwrap_or_default();
    Some((SmolStr::from(key), args))
}
