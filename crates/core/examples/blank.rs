use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use ts_blank_space::{Dialect, blank_space_with};

#[derive(Parser, Debug)]
#[command(name = "blank")]
#[command(about = "Replace TypeScript syntax with whitespace, keeping every line and column", long_about = None)]
struct Args {
    /// Path to the .ts/.tsx file to transform
    input: PathBuf,

    /// Output path for the JavaScript (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Override the dialect instead of inferring it from the file extension
    #[arg(long, short)]
    dialect: Option<Dialect>,

    /// Exit with an error when a construct could not be erased
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let dialect = match args.dialect {
        Some(dialect) => dialect,
        None => Dialect::from_path(&args.input).ok_or_else(|| {
            std::io::Error::other(format!(
                "could not infer dialect from {}; pass --dialect",
                args.input.display()
            ))
        })?,
    };

    let source = fs::read_to_string(&args.input)?;

    let mut reported = 0usize;
    let out = blank_space_with(&source, dialect, |u| {
        reported += 1;
        eprintln!(
            "{}:{}: {}: `{}`",
            args.input.display(),
            u.position,
            u.kind,
            u.text(&source).lines().next().unwrap_or_default()
        );
    })?;

    match &args.out {
        None => print!("{out}"),
        Some(path) => fs::write(path, out)?,
    }

    if args.strict && reported > 0 {
        eprintln!("{reported} construct(s) left untouched");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
