//! sqli: the condition compiler CLI
//!
//! Compiles a JSON condition tree against a schema file and prints the SQL
//! fragment with its bindings.
//!
//! # Usage
//!
//! ```bash
//! # Compile (schema as JSON or TOML)
//! sqli compile conditions.json --schema schema.toml --table Cat
//!
//! # Joined aliases and numbered placeholders
//! sqli compile conditions.json -s schema.toml -t Cat -a o=Owner --dialect postgres
//!
//! # Show what the filter stage prunes
//! sqli explain conditions.json -s schema.toml -t Cat
//! ```

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use sqli::prelude::*;
use sqli::transpiler::defuse;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqli")]
#[command(version)]
#[command(about = "Compile condition trees into parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqli compile where.json -s schema.toml -t Cat
    sqli compile where.json -s schema.json -t Cat -a o=Owner --dialect postgres -f json
    sqli defuse \"x'; drop table cat;\"")]
struct Cli {
    /// Config file (default: <config dir>/sqli/sqli.toml)
    #[arg(long, env = "SQLI_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct TreeArgs {
    /// JSON file with the condition list ("-" reads stdin)
    conditions: PathBuf,

    /// Schema file (.json or .toml)
    #[arg(short, long)]
    schema: PathBuf,

    /// Schema of unaliased keys
    #[arg(short, long)]
    table: String,

    /// Alias mapping, e.g. `-a o=Owner`
    #[arg(short, long = "alias", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and compile a condition tree
    Compile {
        #[command(flatten)]
        tree: TreeArgs,

        /// Placeholder dialect (overrides the config file)
        #[arg(short, long)]
        dialect: Option<Dialect>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the tree before and after pruning
    Explain {
        #[command(flatten)]
        tree: TreeArgs,
    },
    /// Apply the inline-literal injection filter to a string
    Defuse {
        text: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Compile {
            tree,
            dialect,
            format,
        } => compile(&cli, tree, *dialect, format),
        Commands::Explain { tree } => explain(&cli, tree),
        Commands::Defuse { text } => {
            println!("{}", defuse(text));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sqli=debug" } else { "sqli=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((alias, schema)) if !alias.is_empty() && !schema.is_empty() => {
            Ok((alias.trim().to_string(), schema.trim().to_string()))
        }
        _ => Err(format!("expected ALIAS=SCHEMA, got '{}'", raw)),
    }
}

/// Everything one tree needs: its blocks, schema and alias map.
struct Loaded {
    blocks: Vec<BuildingBlock>,
    schema: Schema,
    aliases: HashMap<String, String>,
}

fn load(tree: &TreeArgs) -> Result<Loaded> {
    let schema = Schema::from_file(&tree.schema)
        .with_context(|| format!("failed to load schema {}", tree.schema.display()))?;
    if schema.table(&tree.table).is_none() {
        bail!("schema file has no table '{}'", tree.table);
    }

    let blocks = read_conditions(&tree.conditions)?;
    let aliases = tree.aliases.iter().cloned().collect();

    Ok(Loaded {
        blocks,
        schema,
        aliases,
    })
}

fn read_conditions(path: &Path) -> Result<Vec<BuildingBlock>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).context("invalid condition tree")
}

fn compile(
    cli: &Cli,
    tree: &TreeArgs,
    dialect: Option<Dialect>,
    format: &OutputFormat,
) -> Result<()> {
    let mut config = CompilerConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(dialect) = dialect {
        config.dialect = dialect;
    }

    let Loaded {
        mut blocks,
        schema,
        aliases,
    } = load(tree)?;

    if cli.verbose {
        println!(
            "{} {} node(s), dialect {}",
            "Input:".dimmed(),
            count(&blocks).to_string().yellow(),
            config.dialect.to_string().yellow()
        );
    }

    let ctx = FilterContext::new(&schema, &tree.table, &aliases);
    let compiled = ConditionCompiler::with_config(ctx, &config).compile(&mut blocks)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            if compiled.is_empty() {
                println!("{}", "(no conditions)".dimmed());
            } else {
                println!("{}", compiled.sql.white());
            }

            if !compiled.params.is_empty() {
                println!();
                println!("{}", "Bindings:".cyan());
                for (i, v) in compiled.params.iter().enumerate() {
                    println!(
                        "  {} = {} {}",
                        config.dialect.placeholder(i + 1),
                        format_value(v).yellow(),
                        format!("({})", v.kind_name()).dimmed()
                    );
                }
            }

            if compiled.placeholders != compiled.params.len() {
                println!();
                println!(
                    "{}",
                    format!(
                        "⚠ {} placeholder(s) but {} binding(s): check raw fragments",
                        compiled.placeholders,
                        compiled.params.len()
                    )
                    .yellow()
                );
            }
        }
    }
    Ok(())
}

fn explain(cli: &Cli, tree: &TreeArgs) -> Result<()> {
    let config = CompilerConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let Loaded {
        mut blocks,
        schema,
        aliases,
    } = load(tree)?;

    println!("{}", "Condition Tree:".green().bold());
    print_tree(&blocks, 1);
    let before = count(&blocks);

    let ctx = FilterContext::new(&schema, &tree.table, &aliases).with_max_depth(config.max_depth);
    filter_blocks(&mut blocks, &ctx)?;

    println!();
    println!("{}", "After Pruning:".green().bold());
    if blocks.is_empty() {
        println!("  {}", "(empty)".dimmed());
    } else {
        print_tree(&blocks, 1);
    }
    println!();
    println!(
        "{} of {} node(s) pruned",
        (before - count(&blocks)).to_string().cyan(),
        before
    );
    Ok(())
}

fn count(blocks: &[BuildingBlock]) -> usize {
    blocks.iter().map(BuildingBlock::node_count).sum()
}

fn print_tree(blocks: &[BuildingBlock], indent: usize) {
    let pad = "  ".repeat(indent);
    for block in blocks {
        let conj = block.conjunction.to_string();
        match block.predicate {
            Predicate::Sub => {
                println!("{}{} {}", pad, conj.cyan(), "(".white());
                print_tree(&block.sub_list, indent + 1);
                println!("{}{}", pad, ")".white());
            }
            p if p.is_null_check() => {
                println!("{}{} {} {}", pad, conj.cyan(), block.key.to_string().white(), block.predicate);
            }
            _ => {
                println!(
                    "{}{} {} {} {}",
                    pad,
                    conj.cyan(),
                    block.key.to_string().white(),
                    block.predicate,
                    format_value(&block.value).yellow()
                );
            }
        }
    }
}

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => format!("'{}'", s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}
