use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use itertools::Itertools;
use miette::{IntoDiagnostic, miette};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use vopt_core::{
    CallSite, LogContext, Optimizer, Options, Scalar, Tree, VariantMap, VariantMethod, attr,
    call_args, literal, select_branches,
};

use crate::config;

#[derive(Parser, Debug)]
#[command(name = "vopt")]
#[command(version)]
#[command(after_help = "Examples:\n\n\
    To resolve variants in a tree:\n\
    $ vopt optimize tree.json --variants variants.json\n\n\
    To override a single variant:\n\
    $ vopt optimize tree.json --set qx.debug=false -o optimized.json\n\n\
    To list the variant calls of a tree:\n\
    $ vopt keys tree.json")]
#[command(
    about = "vopt resolves build-time variant calls in JavaScript syntax trees and removes the dead branches they leave behind.",
    long_about = None
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Commands,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

#[derive(Clone, Debug, clap::Args)]
struct VariantArgs {
    /// Load variants from JSON or TOML files; later files win
    #[arg(long = "variants", value_name = "FILE")]
    variant_files: Vec<PathBuf>,

    /// Set a single variant, overriding the files
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = config::parse_assignment)]
    assignments: Vec<(String, Scalar)>,

    /// Namespace roots the variant calls live under
    #[arg(long = "namespace", value_name = "ROOT")]
    namespaces: Vec<String>,
}

#[derive(Clone, Debug, clap::Args)]
struct OutputArgs {
    /// Compact instead of pretty-printed output
    #[clap(short, long, default_value_t = false)]
    compact: bool,

    /// Output to the specified file
    #[clap(short = 'o', long = "output", value_name = "FILE")]
    output_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve variant calls in a JSON syntax tree
    Optimize {
        /// The tree to optimize, `-` for stdin
        #[arg(value_name = "TREE", default_value = "-")]
        tree: PathBuf,

        #[clap(flatten)]
        variants: VariantArgs,

        #[clap(flatten)]
        output: OutputArgs,

        /// File identity shown in diagnostics
        #[arg(long, value_name = "ID")]
        file_id: Option<String>,

        /// Repeat the optimization up to N times while it changes the tree
        #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        passes: u32,
    },
    /// List the variant calls of a JSON syntax tree
    Keys {
        /// The tree to inspect, `-` for stdin
        #[arg(value_name = "TREE", default_value = "-")]
        tree: PathBuf,

        /// Namespace roots the variant calls live under
        #[arg(long = "namespace", value_name = "ROOT")]
        namespaces: Vec<String>,
    },
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        match &self.commands {
            Commands::Optimize {
                tree,
                variants,
                output,
                file_id,
                passes,
            } => {
                let mut syntax_tree = read_tree(tree)?;
                let variant_map = variants.load()?;
                let optimizer = Optimizer::new(options(&variants.namespaces));
                let mut log = LogContext::new(file_id.as_deref().or_else(|| file_stem(tree)))
                    .with_verbose(self.verbose.log_level_filter() >= log::LevelFilter::Info);

                let changed = optimizer.optimize_until_stable(
                    &mut syntax_tree,
                    &variant_map,
                    &mut log,
                    *passes as usize,
                )?;
                log::info!(
                    "{} pass(es) changed the tree, {} warning(s)",
                    changed,
                    log.warnings().count()
                );

                let json = if output.compact {
                    syntax_tree.to_json()
                } else {
                    syntax_tree.to_json_pretty()
                }
                .into_diagnostic()?;
                write_output(output.output_file.as_deref(), &format!("{json}\n"))
            }
            Commands::Keys { tree, namespaces } => {
                let syntax_tree = read_tree(tree)?;
                let optimizer = Optimizer::new(options(namespaces));
                let mut log = LogContext::new(file_stem(tree));

                let lines = optimizer
                    .call_sites(&syntax_tree)
                    .iter()
                    .map(|site| describe(&syntax_tree, &mut log, site))
                    .collect::<Vec<_>>();
                let listing = if lines.is_empty() {
                    String::new()
                } else {
                    format!("{}\n", lines.join("\n"))
                };
                write_output(None, &listing)
            }
        }
    }
}

impl VariantArgs {
    fn load(&self) -> miette::Result<VariantMap> {
        let mut variants = VariantMap::new();
        for file in &self.variant_files {
            let loaded = config::load_variants(file)?;
            log::debug!("{} variant(s) in {}", loaded.len(), file.display());
            variants.extend(loaded.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        variants.extend(self.assignments.iter().cloned());
        log::debug!("{} variant(s) loaded", variants.len());
        Ok(variants)
    }
}

fn options(namespaces: &[String]) -> Options {
    if namespaces.is_empty() {
        Options::default()
    } else {
        Options {
            namespaces: namespaces.iter().map(|ns| ns.as_str().into()).collect(),
        }
    }
}

fn file_stem(path: &Path) -> Option<&str> {
    if path.as_os_str() == "-" {
        return None;
    }
    path.file_stem().and_then(|stem| stem.to_str())
}

fn read_tree(path: &Path) -> miette::Result<Tree> {
    let content = if path.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).into_diagnostic()?;
        input
    } else {
        if !path.exists() {
            return Err(miette!("File not found: {}", path.display()));
        }
        fs::read_to_string(path).into_diagnostic()?
    };
    Tree::from_json(&content).into_diagnostic()
}

fn write_output(path: Option<&Path>, content: &str) -> miette::Result<()> {
    match path {
        Some(path) => fs::write(path, content).into_diagnostic(),
        None => {
            let stdout = io::stdout();
            let mut handle = BufWriter::new(stdout.lock());
            handle.write_all(content.as_bytes()).into_diagnostic()?;
            handle.flush().into_diagnostic()
        }
    }
}

/// One listing line: `line<TAB>method<TAB>key[<TAB>branch keys]`.
fn describe(tree: &Tree, log: &mut LogContext, site: &CallSite) -> String {
    let line = tree
        .node(site.call)
        .line()
        .map_or_else(|| "-".to_string(), |line| line.to_string());
    let key = call_args(tree, site.call)
        .first()
        .filter(|&&arg| literal::is_string_literal(tree, arg))
        .and_then(|&arg| tree.node(arg).get_str(attr::VALUE))
        .unwrap_or("?")
        .to_string();

    let mut fields = vec![line, site.method.to_string(), key];
    if site.method == VariantMethod::Select
        && let Some(args) = select_branches(tree, log, site)
    {
        fields.push(args.branches.iter().map(|branch| branch.keys.as_str()).join(","));
    }
    fields.join("\t")
}
