//! Console report text.
//!
//! Everything here is `core::fmt`, so the same text goes to a UART on target
//! and to stdout in the emulator.
//!
//! ```text
//! Test step 2: Inject parity with 1-bit error to test correctable ECC fault
//! - Injected parity: 0x5e
//! P-DMA correctable ECC fault detected:
//! - Word address: 0xb
//! - ECC syndrome: 0x1
//! - Expected: correctable, observed: correctable
//! TEST OK!
//! ```

use core::fmt::{self, Display, Write};

use ecc::{FaultClass, TestOutcome, ValidationReport, Verdict};
use platform::config;

/// Display adapter for a full validation report.
pub struct ConsoleReport<'a>(pub &'a ValidationReport);

/// Display adapter for a single step.
pub struct StepReport<'a>(pub &'a TestOutcome);

/// Classification as printed in the expected/observed line.
pub fn class_name(class: Option<FaultClass>) -> &'static str {
    class.map_or("no fault", FaultClass::label)
}

impl Display for StepReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        let scenario = outcome.scenario;
        writeln!(f, "Test step {}: {}", scenario.step(), scenario.title())?;
        writeln!(f, "- Injected parity: {}", outcome.injected)?;

        if let Some(event) = outcome.observed {
            match event.class {
                FaultClass::Unexpected(source) => writeln!(
                    f,
                    "TEST ERROR: Unexpected fault source (0x{:x}) detected!",
                    source.get()
                )?,
                class => {
                    writeln!(f, "P-DMA {} ECC fault detected:", class.label())?;
                    writeln!(f, "- Word address: 0x{:x}", event.word_address)?;
                    writeln!(f, "- ECC syndrome: 0x{:x}", event.syndrome)?;
                }
            }
        }

        writeln!(
            f,
            "- Expected: {}, observed: {}",
            class_name(scenario.expected()),
            class_name(outcome.observed.map(|e| e.class))
        )?;

        match outcome.verdict {
            Verdict::Pass => writeln!(f, "TEST OK!"),
            Verdict::Fail(reason) => writeln!(f, "TEST ERROR: {}", reason.message()),
        }
    }
}

impl Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{}", config::banner())?;
        writeln!(f)?;
        writeln!(f, "Info about P-DMA test")?;
        writeln!(
            f,
            "- Test value (descriptor address): 0x{:08x}",
            report.test_value
        )?;
        writeln!(f, "- Correct ECC Parity:              {}", report.correct_parity)?;
        writeln!(f)?;

        for outcome in &report.outcomes {
            write!(f, "{}", StepReport(outcome))?;
            writeln!(f)?;
        }

        if report.all_passed() {
            writeln!(f, "All test steps passed.")
        } else {
            writeln!(
                f,
                "{} of {} test steps FAILED.",
                report.failures(),
                report.outcomes.len()
            )
        }
    }
}

/// Console buffer a full report is rendered into.
pub const REPORT_CAPACITY: usize = 4096;

/// Render the report into a fixed-capacity buffer (no allocator on target).
pub fn render<const N: usize>(report: &ValidationReport) -> Result<heapless::String<N>, fmt::Error> {
    let mut out = heapless::String::new();
    write!(out, "{}", ConsoleReport(report))?;
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use ecc::{FailReason, FaultEvent, ParityCode, Scenario};

    const VALUE: u32 = 0x2800_4A60;

    fn outcome(
        scenario: Scenario,
        observed: Option<FaultEvent>,
        read_value: u32,
    ) -> TestOutcome {
        let p = ParityCode::new(0x5f).flip(scenario.parity_flip());
        TestOutcome::judge(scenario, VALUE, p, observed, read_value)
    }

    fn event(class: FaultClass, syndrome: u32) -> Option<FaultEvent> {
        Some(FaultEvent {
            class,
            word_address: 11,
            syndrome,
        })
    }

    fn passing_report() -> ValidationReport {
        ValidationReport {
            test_value: VALUE,
            correct_parity: ParityCode::new(0x5f),
            outcomes: [
                outcome(Scenario::Baseline, None, VALUE),
                outcome(Scenario::SingleBit, event(FaultClass::Correctable, 1), VALUE),
                outcome(
                    Scenario::DoubleBit,
                    event(FaultClass::NonCorrectable, 3),
                    VALUE,
                ),
            ],
        }
    }

    #[test]
    fn step_header_matches_step_number() {
        let text = StepReport(&outcome(Scenario::Baseline, None, VALUE)).to_string();
        assert!(text.starts_with(
            "Test step 1: Inject correct parity to prove correctness of ECC parity calculation"
        ));
        assert!(text.contains("- Expected: no fault, observed: no fault"));
        assert!(text.ends_with("TEST OK!\n"));
    }

    #[test]
    fn fault_details_are_printed_in_hex() {
        let step = outcome(Scenario::SingleBit, event(FaultClass::Correctable, 1), VALUE);
        let text = StepReport(&step).to_string();
        assert!(text.contains("- Injected parity: 0x5e"));
        assert!(text.contains("P-DMA correctable ECC fault detected:"));
        assert!(text.contains("- Word address: 0xb"));
        assert!(text.contains("- ECC syndrome: 0x1"));
    }

    #[test]
    fn failure_prints_reason() {
        let step = outcome(Scenario::DoubleBit, None, VALUE);
        assert_eq!(step.verdict, Verdict::Fail(FailReason::NoFault));
        let text = StepReport(&step).to_string();
        assert!(text.contains("- Expected: non-correctable, observed: no fault"));
        assert!(text.contains("TEST ERROR: Fault IRQ has not occurred!"));
    }

    #[test]
    fn unexpected_source_is_called_out() {
        let observed = event(FaultClass::Unexpected(platform::FaultSource(0x44)), 1);
        let text = StepReport(&outcome(Scenario::SingleBit, observed, VALUE)).to_string();
        assert!(text.contains("TEST ERROR: Unexpected fault source (0x44) detected!"));
        assert!(text.contains("TEST ERROR: Fault IRQ has occurred, but not for the expected fault source!"));
    }

    #[test]
    fn full_report_has_banner_info_and_summary() {
        let text = ConsoleReport(&passing_report()).to_string();
        assert!(text.starts_with(config::banner()));
        assert!(text.contains("- Test value (descriptor address): 0x28004a60"));
        assert!(text.contains("- Correct ECC Parity:              0x5f"));
        assert_eq!(text.matches("TEST OK!").count(), 3);
        assert!(text.ends_with("All test steps passed.\n"));
    }

    #[test]
    fn summary_counts_failures() {
        let mut report = passing_report();
        report.outcomes[1] = outcome(Scenario::SingleBit, None, VALUE);
        let text = ConsoleReport(&report).to_string();
        assert!(text.ends_with("1 of 3 test steps FAILED.\n"));
    }

    #[test]
    fn renders_into_fixed_buffer() {
        let text: heapless::String<2048> = render(&passing_report()).unwrap();
        assert_eq!(text.as_str(), ConsoleReport(&passing_report()).to_string());
    }

    #[test]
    fn too_small_buffer_is_an_error() {
        assert!(render::<16>(&passing_report()).is_err());
    }
}
