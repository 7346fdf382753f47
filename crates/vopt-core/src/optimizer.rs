use smol_str::SmolStr;

use crate::{
    diagnostic::LogContext,
    discovery::{CallSite, DEFAULT_NAMESPACES, find_call_sites},
    error::Error,
    resolver::Resolver,
    tree::Tree,
    variant::VariantMap,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Namespace roots the primitives are looked up under, e.g. `qx.core.Environment`.
    pub namespaces: Vec<SmolStr>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            namespaces: DEFAULT_NAMESPACES
                .into_iter()
                .map(SmolStr::new_static)
                .collect(),
        }
    }
}

/// The `Optimizer` resolves variant primitive calls against a [`VariantMap`]
/// and removes the code that becomes dead as a result.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    options: Options,
}

impl Optimizer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The primitive call sites currently in `tree`, in pre-order.
    pub fn call_sites(&self, tree: &Tree) -> Vec<CallSite> {
        find_call_sites(tree, &self.options.namespaces)
    }

    /// Runs one discovery and resolution pass over `tree`.
    ///
    /// Call sites are collected up front and resolved in order; a site that an
    /// earlier rewrite removed from the tree is skipped. Returns whether the
    /// tree changed. On a fatal error the rewrites made for preceding sites are
    /// kept.
    pub fn optimize(
        &self,
        tree: &mut Tree,
        variants: &VariantMap,
        log: &mut LogContext,
    ) -> Result<bool, Error> {
        let sites = self.call_sites(tree);
        let mut resolver = Resolver::new(tree, variants, log);
        let mut modified = false;

        for site in &sites {
            if !resolver.tree().is_attached(site.call) {
                log::trace!("Skipping detached call site {}", site.callee);
                continue;
            }
            modified |= resolver.resolve(site)?;
        }

        Ok(modified)
    }

    /// Repeats [`Optimizer::optimize`] while it reports a change, at most
    /// `max_passes` times, and returns the number of passes that changed the
    /// tree.
    pub fn optimize_until_stable(
        &self,
        tree: &mut Tree,
        variants: &VariantMap,
        log: &mut LogContext,
        max_passes: usize,
    ) -> Result<usize, Error> {
        let mut changed = 0;
        while changed < max_passes && self.optimize(tree, variants, log)? {
            changed += 1;
        }
        Ok(changed)
    }
}

/// Runs one pass with the default namespaces.
pub fn optimize(tree: &mut Tree, variants: &VariantMap, log: &mut LogContext) -> Result<bool, Error> {
    Optimizer::default().optimize(tree, variants, log)
}
