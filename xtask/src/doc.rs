use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

/// Rendered entry point, relative to the workspace root.
const INDEX: &str = "target/doc/board/index.html";

/// Build the board docs with broken intra-doc links treated as errors, since
/// the module docs cross-reference the manifest tables heavily.
pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building board documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["doc", "-p", "board", "--no-deps", "--features", "std"])
        .env("RUSTDOCFLAGS", "-D rustdoc::broken_intra_doc_links");
    if open {
        cmd.arg("--open");
    }

    let output = cmd.output().context("Failed to run cargo doc")?;
    if !output.status.success() {
        eprintln!("{}", "✗ Documentation build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Documentation build failed");
    }

    if !Path::new(INDEX).exists() {
        anyhow::bail!("cargo doc succeeded but {INDEX} is missing");
    }

    println!(
        "{}",
        format!("✓ Documentation built in {:.2}s", start.elapsed().as_secs_f64()).green()
    );
    if !open {
        println!("   {}", format!("Open {INDEX} in your browser").dimmed());
    }
    println!();

    Ok(())
}
