use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    let run_unit = !integration_only;
    let run_integration = !unit_only;

    // Unit tests: #[cfg(test)] modules in platform, ecc and firmware
    if run_unit {
        if let Some(output) = step(
            "Unit tests",
            &["test", "--lib", "--workspace"],
            OnFailure::Abort,
        )? {
            print_summary(&String::from_utf8_lossy(&output.stdout));
        }
    }

    // Integration tests: every crate's tests/ directory, including the
    // simulator end-to-end runs and the property tests
    if run_integration {
        if let Some(output) = step(
            "Integration tests",
            &["test", "--workspace", "--test", "*"],
            OnFailure::Abort,
        )? {
            print_summary(&String::from_utf8_lossy(&output.stdout));
        }
    }

    // Doc tests never fail the task
    step(
        "Doc tests",
        &["test", "--doc", "--workspace"],
        OnFailure::Warn,
    )?;

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

fn print_summary(output: &str) {
    let (passed, failed, ignored) = extract_test_totals(output);
    println!(
        "   {}",
        format!("{passed} passed; {failed} failed; {ignored} ignored").dimmed()
    );
    println!();
}

/// Sum the counts of every "test result:" line (one per test binary).
fn extract_test_totals(output: &str) -> (u32, u32, u32) {
    let mut totals: (u32, u32, u32) = (0, 0, 0);
    for line in output.lines() {
        let Some(summary) = line.split("test result:").nth(1) else {
            continue;
        };
        for part in summary.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u32>() else {
                continue;
            };
            match kind {
                "passed" => totals.0 = totals.0.saturating_add(count),
                "failed" => totals.1 = totals.1.saturating_add(count),
                "ignored" => totals.2 = totals.2.saturating_add(count),
                _ => {}
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_over_all_binaries() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.01s
running 7 tests
test result: FAILED. 5 passed; 2 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.20s
";
        assert_eq!(extract_test_totals(output), (8, 2, 1));
    }

    #[test]
    fn no_result_lines_gives_zero() {
        assert_eq!(extract_test_totals("Compiling ecc v0.1.0"), (0, 0, 0));
    }
}
