//! Sieve CLI
//!
//! Tokenize selectors and run them against JSON-described documents.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use sieve_common::warning::{clear_warnings, warn_once};
use sieve_dom::{DomTree, NodeId, NodeType, load_document};
use sieve_select::{MacroTable, RuleKind, RuleTable, Scanner, Selection, Tokenizer};

#[derive(Parser, Debug)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show how a selector is tokenized
    sieve tokens 'ul#menu li.item a'

    # Query a document stored as JSON
    sieve query '#menu li' page.json

    # Query an inline document and print the text of the matches
    sieve query --text 'li' --json '{"tag": "ul", "children": [{"tag": "li", "children": [{"text": "One"}]}]}'

    # Print the compiled scanner
    sieve rules --expanded
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a selector into classified tokens
    Tokens {
        /// The selector to tokenize
        selector: String,
    },

    /// Resolve a selector against a JSON document
    Query {
        /// The selector to resolve
        selector: String,

        /// Path to a JSON document
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Parse a JSON document string directly instead of a file
        #[arg(long, value_name = "JSON", conflicts_with = "path")]
        json: Option<String>,

        /// Start the search below the element with this id
        #[arg(long, value_name = "ID")]
        within: Option<String>,

        /// Print the text content of each match instead of a summary
        #[arg(short, long)]
        text: bool,
    },

    /// Print the selector rules and the compiled scanner
    Rules {
        /// Also print every macro with its references expanded
        #[arg(long)]
        expanded: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens { selector } => print_tokens(&selector),
        Command::Query {
            selector,
            path,
            json,
            within,
            text,
        } => {
            let source = match (path, json) {
                (Some(path), None) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                (None, Some(json)) => json,
                _ => bail!("query requires a file path or --json"),
            };
            clear_warnings();
            let tree = load_document(&source).context("failed to load document")?;
            run_query(&tree, &selector, within.as_deref(), text)
        }
        Command::Rules { expanded } => print_rules(expanded),
    }
}

fn print_tokens(selector: &str) -> Result<()> {
    let mut tokenizer = Tokenizer::new(Scanner::standard()?, selector);
    tokenizer.run();

    for fragment in tokenizer.skipped() {
        let _ = warn_once("Selector", &format!("skipped unsupported text '{fragment}'"));
    }

    println!("=== Tokens ({}) ===", tokenizer.input());
    for token in tokenizer.tokens() {
        println!("  {:<16} {}", token.finder.cyan(), token.identity);
    }
    println!("\n{} tokens", tokenizer.tokens().len());
    Ok(())
}

fn run_query(tree: &DomTree, selector: &str, within: Option<&str>, text: bool) -> Result<()> {
    let matches = match within {
        Some(id) => {
            let Some(root) = tree.element_by_id(NodeId::ROOT, id) else {
                bail!("no element with id '{id}'");
            };
            Selection::from_nodes(vec![root]).find(tree, selector)?
        }
        None => Selection::select(tree, selector)?,
    };

    for node in &matches {
        if text {
            println!("{}", tree.text_content(node));
        } else {
            println!("{}", describe(tree, node).green());
        }
    }
    println!("\n{} matches", matches.len());
    Ok(())
}

fn print_rules(expanded: bool) -> Result<()> {
    let macros = MacroTable::standard();
    let rules = RuleTable::standard();

    println!("=== Rules ===");
    for kind in RuleKind::PRIORITY {
        if let Some(pattern) = rules.get(kind) {
            println!("  {:<16} {pattern}", kind.cyan());
        }
    }

    if expanded {
        println!("\n=== Macros ===");
        for (name, fragment) in macros.expand_all()?.entries() {
            println!("  {:<10} {fragment}", name.cyan());
        }
    }

    println!("\n=== Scanner ===");
    println!("{}", Scanner::standard()?.pattern());
    Ok(())
}

/// One-line summary of a node: `tag#id.class1.class2` for elements.
fn describe(tree: &DomTree, node: NodeId) -> String {
    let Some(n) = tree.get(node) else {
        return String::from("(detached)");
    };
    match &n.node_type {
        NodeType::Document => String::from("#document"),
        NodeType::Text(text) => format!("#text {text:?}"),
        NodeType::Comment(comment) => format!("<!-- {comment} -->"),
        NodeType::Element(data) => {
            let mut summary = data.tag_name.clone();
            if let Some(id) = data.id() {
                summary.push('#');
                summary.push_str(id);
            }
            for class in data.class_name().split_ascii_whitespace() {
                summary.push('.');
                summary.push_str(class);
            }
            summary
        }
    }
}
