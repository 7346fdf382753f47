//! `vopt-core` resolves build-time variant calls in a JavaScript syntax tree.
//!
//! Calls to `select`, `isSet`, `compilerIsSet` and `get` under the
//! `qx.core.Environment` / `qx.core.Variant` namespaces are replaced by the
//! values a fixed [`VariantMap`] gives them. Equality comparisons that become
//! constant are folded and `if`/ternary branches that become dead are removed.
//!
//! ## Examples
//!
//! ```rust
//! use vopt_core::{LogContext, Optimizer, Tree, VariantMap};
//!
//! // if (qx.core.Environment.get("qx.debug")) { log() } else { run() }
//! let mut tree = Tree::default();
//! let key = tree.string_literal("qx.debug");
//! let get = tree.call_expr("qx.core.Environment.get", [key]);
//! let debug = tree.call_expr("log", []);
//! let release = tree.call_expr("run", []);
//! let branch = tree.if_statement(get, [debug], Some(vec![release]));
//! tree.push_statements([branch]);
//!
//! let variants = VariantMap::from_iter([("qx.debug", false)]);
//! let mut log = LogContext::new(Some("app.Application"));
//! let modified = Optimizer::default()
//!     .optimize(&mut tree, &variants, &mut log)
//!     .unwrap();
//!
//! assert!(modified);
//! assert_eq!(tree.sexp(tree.root()), "(file (block (call (operand run) (params))))");
//! ```
mod arena;
mod diagnostic;
mod discovery;
mod error;
pub mod literal;
mod optimizer;
mod resolver;
mod scalar;
pub mod tree;
mod variant;

pub use arena::{Arena, ArenaId};
pub use diagnostic::{Diagnostic, Location, LogContext, Severity};
pub use discovery::{CallSite, DEFAULT_NAMESPACES, VariantMethod, call_args, find_call_sites};
pub use error::Error;
pub use optimizer::{Optimizer, Options, optimize};
pub use resolver::{Branch, SelectArgs, select_branches};
pub use scalar::Scalar;
pub use tree::{Attributes, Node, NodeId, NodeKind, Tree, attr};
pub use variant::{ENV_KEY_PREFIX, VariantMap};
