use std::{fs, path::PathBuf};

use clap::Parser;
use ts_blank_space::{Dialect, blank_space_strict};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Create or validate fixture files", long_about = None)]
struct Args {
    /// Write fixtures instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory (defaults to "./fixtures")
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut inputs = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        if filename.contains(".out.") {
            continue;
        }
        if let Some(dialect) = Dialect::from_path(&path) {
            inputs.push((path.clone(), dialect));
        }
    }
    inputs.sort_by(|a, b| a.0.cmp(&b.0));

    println!(
        "{} fixtures...",
        if args.write { "Creating" } else { "Validating" }
    );
    let mut mismatches = Vec::new();

    for (input_path, dialect) in &inputs {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        let basename = filename
            .rsplit_once('.')
            .ok_or("filename missing extension")?
            .0;
        let out_path = args
            .dir
            .join(format!("{basename}.out.{}", dialect.output_extension()));

        let source = fs::read_to_string(input_path)?;
        let code = match blank_space_strict(&source, *dialect) {
            Ok(code) => code,
            Err(e) => {
                mismatches.push(format!("{filename}: {e}"));
                continue;
            }
        };

        if args.write {
            fs::write(&out_path, &code)?;
            println!("  Created {}", out_path.display());
        } else if !out_path.exists() {
            mismatches.push(format!(
                "{filename}: missing output file {}",
                out_path.display()
            ));
        } else if fs::read(&out_path)? != code.as_bytes() {
            mismatches.push(format!("{filename}: code mismatch"));
        } else {
            println!("  ✓ {filename}");
        }
    }

    if !mismatches.is_empty() {
        eprintln!("\nFixtures failed:");
        for mismatch in &mismatches {
            eprintln!("  ✗ {mismatch}");
        }
        return Err(format!("{} fixture error(s)", mismatches.len()).into());
    }

    println!("\nAll {} fixtures done.", inputs.len());
    Ok(())
}
