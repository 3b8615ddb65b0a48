use std::{fs, path::PathBuf};

use clap::Parser;
use ts_blank_space::{Dialect, parse::parse};

#[derive(Parser, Debug)]
#[command(name = "parse")]
#[command(about = "Parse a TypeScript file with tree-sitter and print the CST", long_about = None)]
struct Args {
    /// Path to the source file to parse
    input: PathBuf,

    /// Override the dialect instead of inferring it from the file extension
    #[arg(long, short)]
    dialect: Option<Dialect>,

    /// Print the tree in S-expression format instead of the default dump format
    #[arg(long, short)]
    sexp: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let dialect = args
        .dialect
        .or_else(|| Dialect::from_path(&args.input))
        .unwrap_or_default();

    let source = fs::read_to_string(&args.input)?;
    let tree = parse(&source, dialect)?;
    let root = tree.root_node();

    if args.sexp {
        println!("{}", root.to_sexp());
    } else {
        dump_tree(&source, root, 0);
    }

    Ok(())
}

fn dump_tree(source: &str, node: tree_sitter::Node<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    let start = node.start_position();
    let text = source
        .get(node.byte_range())
        .unwrap_or_default()
        .replace('\n', "\\n");

    let field = node
        .parent()
        .and_then(|p| {
            let mut cursor = p.walk();
            p.children(&mut cursor)
                .position(|c| c == node)
                .and_then(|i| p.field_name_for_child(i as u32))
        })
        .map(|f| format!("{f}: "))
        .unwrap_or_default();

    println!(
        "{indent}{field}{kind}{extra} [{range:?}] {row}:{col} \"{text}\"",
        kind = node.kind(),
        extra = if node.is_extra() { " (extra)" } else { "" },
        range = node.byte_range(),
        row = start.row + 1,
        col = start.column + 1,
        text = truncate(&text, 80),
    );

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        dump_tree(source, child, depth + 1);
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => format!("{}…", &s[..end]),
        None => s.to_string(),
    }
}
