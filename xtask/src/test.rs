use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running board tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        let output = cargo_test(&["--lib"]).context("Failed to run unit tests")?;
        report("Unit tests", &output, total_start)?;
    }

    if !unit_only {
        let start = Instant::now();
        let output = cargo_test(&["--test", "*"])
            .context("Failed to run integration tests")?;
        report("Integration tests", &output, start)?;
    }

    // Doc examples double as API usage checks; a failure is reported but
    // does not fail the run.
    let start = Instant::now();
    let output = cargo_test(&["--doc"]).context("Failed to run doc tests")?;
    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ Doc tests passed {} in {:.2}s",
                extract_test_summary(&String::from_utf8_lossy(&output.stdout)),
                start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Doc tests failed".yellow().bold());
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn cargo_test(extra: &[&str]) -> std::io::Result<Output> {
    Command::new("cargo")
        .args(["test", "-p", "board", "--features", "std"])
        .args(extra)
        .output()
}

fn report(kind: &str, output: &Output, start: Instant) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {kind} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        anyhow::bail!("{kind} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {kind} passed {} in {:.2}s",
            extract_test_summary(&stdout),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

/// Sum the `test result:` lines cargo prints once per test binary.
fn extract_test_summary(output: &str) -> String {
    let mut passed = 0u64;
    let mut failed = 0u64;
    let mut binaries = 0u64;
    for line in output.lines() {
        let Some(result) = line.split("test result:").nth(1) else {
            continue;
        };
        binaries += 1;
        for part in result.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(label), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u64>() else {
                continue;
            };
            match label {
                "passed" => passed += count,
                "failed" => failed += count,
                _ => {}
            }
        }
    }
    if binaries == 0 {
        return "(summary not available)".to_string();
    }
    format!("({passed} passed; {failed} failed across {binaries} binaries)")
}

#[cfg(test)]
mod tests {
    use super::extract_test_summary;

    #[test]
    fn summary_sums_all_binaries() {
        let out = "\
test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out
test result: ok. 3 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out";
        assert_eq!(
            extract_test_summary(out),
            "(8 passed; 1 failed across 2 binaries)"
        );
    }

    #[test]
    fn summary_without_results() {
        assert_eq!(extract_test_summary("compiling"), "(summary not available)");
    }
}
