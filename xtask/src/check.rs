use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Embedded target the board crate must build for.
const TARGET: &str = "thumbv7em-none-eabihf";

/// How a failing step is reported.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnFail {
    Abort,
    Warn,
}

struct Step {
    label: &'static str,
    args: &'static [&'static str],
    on_fail: OnFail,
}

const STEPS: &[Step] = &[
    Step {
        label: "board crate (no_std, Cortex-M4F)",
        args: &["check", "-p", "board", "--target", TARGET, "--no-default-features"],
        on_fail: OnFail::Abort,
    },
    Step {
        label: "board crate (no_std + defmt)",
        args: &["check", "-p", "board", "--target", TARGET, "--features", "defmt"],
        on_fail: OnFail::Abort,
    },
    Step {
        label: "host build (std)",
        args: &["check", "--workspace", "--all-targets", "--features", "board/std"],
        on_fail: OnFail::Abort,
    },
    Step {
        label: "clippy lints",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        on_fail: OnFail::Warn,
    },
    Step {
        label: "code formatting",
        args: &["fmt", "--all", "--check"],
        on_fail: OnFail::Warn,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking board crate...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        run_step(step)?;
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn run_step(step: &Step) -> Result<()> {
    println!("{}", format!("  Checking {}...", step.label).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(step.args)
        .output()
        .with_context(|| format!("Failed to run cargo for {}", step.label))?;

    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                step.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
        return Ok(());
    }

    match step.on_fail {
        OnFail::Abort => {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        }
        OnFail::Warn => {
            eprintln!("{}", format!("  ⚠ {} reported issues", step.label).yellow().bold());
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            println!();
            Ok(())
        }
    }
}
