use smol_str::SmolStr;

use super::{Resolver, key_arguments};
use crate::{
    diagnostic::LogContext,
    discovery::CallSite,
    error::Error,
    scalar::Scalar,
    tree::{NodeId, NodeKind, Tree, attr},
};

const DEFAULT_BRANCH: &str = "default";

/// One entry of a `select` branch map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// The entry key, possibly listing alternatives separated by `|`.
    pub keys: SmolStr,
    /// The expression the call is replaced with when this entry matches.
    pub value: NodeId,
}

/// The parsed arguments of `select(key, { ... })`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectArgs {
    pub key: SmolStr,
    pub branches: Vec<Branch>,
}

/// Parses a `select` call without rewriting anything.
///
/// Performs the same validation as the resolver, warning through `log` and
/// returning `None` for malformed calls.
pub fn select_branches(tree: &Tree, log: &mut LogContext, site: &CallSite) -> Option<SelectArgs> {
    let (key, args) = key_arguments(tree, log, site, 2)?;
    let branches = branch_map(tree, log, site, args[1])?;
    Some(SelectArgs { key, branches })
}

fn branch_map(
    tree: &Tree,
    log: &mut LogContext,
    site: &CallSite,
    map: NodeId,
) -> Option<Vec<Branch>> {
    if !tree.node(map).is(NodeKind::Map) {
        log.warn(
            tree,
            map,
            format!(
                "The second parameter of {} must be a map. Ignoring this occurrence.",
                site.callee
            ),
        );
        return None;
    }

    let branches = tree
        .children(map)
        .iter()
        .filter(|&&entry| tree.node(entry).is(NodeKind::KeyValue))
        .filter_map(|&entry| {
            let keys = tree.node(entry).get_str(attr::KEY)?;
            let value = tree.child_by_kind(entry, NodeKind::Value)?;
            Some(Branch {
                keys: SmolStr::from(keys),
                value: tree.first_child(value, true)?,
            })
        })
        .collect();
    Some(branches)
}

/// Picks the branch for `value`: the first entry with a matching key part,
/// else the entry keyed `default`.
pub(crate) fn choose_branch(branches: &[Branch], value: &Scalar) -> Option<NodeId> {
    let value = value.to_js_string();
    let mut default = None;
    for branch in branches {
        for key in branch.keys.split('|') {
            if key_matches(key, &value) {
                return Some(branch.value);
            }
            if key == DEFAULT_BRANCH {
                default = Some(branch.value);
            }
        }
    }
    default
}

fn key_matches(key: &str, value: &str) -> bool {
    // `on`/`off` are deprecated spellings of `true`/`false`.
    const ON: [&str; 2] = ["on", "true"];
    const OFF: [&str; 2] = ["off", "false"];

    key == value
        || (ON.contains(&key) && ON.contains(&value))
        || (OFF.contains(&key) && OFF.contains(&value))
}

impl Resolver<'_> {
    pub(super) fn select(&mut self, site: &CallSite) -> Result<bool, Error> {
        let Some((key, args)) = key_arguments(self.tree, self.log, site, 2) else {
            return Ok(false);
        };
        let Some(value) = self.variants.lookup(&key) else {
            return Ok(false);
        };
        let Some(branches) = branch_map(self.tree, self.log, site, args[1]) else {
            return Ok(false);
        };

        match choose_branch(&branches, value) {
            Some(branch) => {
                self.log.info(
                    self.tree,
                    site.call,
                    format!("Selected branch for variant ({key}:{value})"),
                );
                self.tree.replace_node(site.call, branch);
                Ok(true)
            }
            None => Err(Error::NoMatchingBranch {
                key: key.to_string(),
                value: value.to_js_string().to_string(),
                location: self.log.location(self.tree, site.call),
            }),
        }
    }
}
