//! Scenarios, verdicts and the validation report.

use crate::monitor::{FaultClass, FaultEvent};
use crate::parity::ParityCode;

/// The three validation steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scenario {
    /// Correct parity: no fault, data intact.
    Baseline,
    /// One parity bit flipped: correctable fault, data corrected.
    SingleBit,
    /// Two parity bits flipped: non-correctable fault.
    DoubleBit,
}

impl Scenario {
    /// Run order.
    pub const ALL: [Self; 3] = [Self::Baseline, Self::SingleBit, Self::DoubleBit];

    /// Parity bits inverted to build this scenario's injected parity.
    pub const fn parity_flip(self) -> u8 {
        match self {
            Self::Baseline => 0b000_0000,
            Self::SingleBit => 0b000_0001,
            Self::DoubleBit => 0b000_0011,
        }
    }

    /// Fault class the hardware must report, `None` for no fault.
    pub const fn expected(self) -> Option<FaultClass> {
        match self {
            Self::Baseline => None,
            Self::SingleBit => Some(FaultClass::Correctable),
            Self::DoubleBit => Some(FaultClass::NonCorrectable),
        }
    }

    /// Step number as printed (1-based).
    pub const fn step(self) -> u8 {
        match self {
            Self::Baseline => 1,
            Self::SingleBit => 2,
            Self::DoubleBit => 3,
        }
    }

    /// What the step does, as printed in the step header.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Baseline => "Inject correct parity to prove correctness of ECC parity calculation",
            Self::SingleBit => "Inject parity with 1-bit error to test correctable ECC fault",
            Self::DoubleBit => "Inject parity with 2-bit error to test non-correctable ECC fault",
        }
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailReason {
    /// Baseline saw a fault.
    UnexpectedFault,
    /// Baseline read back something other than the test value.
    DataMismatch,
    /// No fault notification within the settle interval.
    NoFault,
    /// A fault arrived but of the wrong class.
    WrongClass,
    /// Correctable fault reported but the read value was not corrected.
    NotCorrected,
}

impl FailReason {
    /// Console message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnexpectedFault => "Unexpected fault occurred!",
            Self::DataMismatch => "Incorrect data read!",
            Self::NoFault => "Fault IRQ has not occurred!",
            Self::WrongClass => "Fault IRQ has occurred, but not for the expected fault source!",
            Self::NotCorrected => "Read data has not been corrected by ECC logic!",
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Hardware behaved as expected.
    Pass,
    /// Hardware did not.
    Fail(FailReason),
}

impl Verdict {
    /// Whether this is [`Verdict::Pass`].
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Judge one step from what was observed after the settle interval.
pub fn evaluate(
    scenario: Scenario,
    test_value: u32,
    observed: Option<FaultEvent>,
    read_value: u32,
) -> Verdict {
    let class = observed.map(|e| e.class);
    match scenario {
        Scenario::Baseline => {
            if class.is_some() {
                Verdict::Fail(FailReason::UnexpectedFault)
            } else if read_value != test_value {
                Verdict::Fail(FailReason::DataMismatch)
            } else {
                Verdict::Pass
            }
        }
        Scenario::SingleBit => match class {
            None => Verdict::Fail(FailReason::NoFault),
            Some(FaultClass::Correctable) if read_value == test_value => Verdict::Pass,
            Some(FaultClass::Correctable) => Verdict::Fail(FailReason::NotCorrected),
            Some(_) => Verdict::Fail(FailReason::WrongClass),
        },
        Scenario::DoubleBit => match class {
            None => Verdict::Fail(FailReason::NoFault),
            Some(FaultClass::NonCorrectable) => Verdict::Pass,
            Some(_) => Verdict::Fail(FailReason::WrongClass),
        },
    }
}

/// Everything recorded about one step. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TestOutcome {
    /// Which step.
    pub scenario: Scenario,
    /// Parity that was injected.
    pub injected: ParityCode,
    /// Fault taken from the slot after the settle interval.
    pub observed: Option<FaultEvent>,
    /// Value returned by the triggering access.
    pub read_value: u32,
    /// Verdict.
    pub verdict: Verdict,
}

impl TestOutcome {
    /// Build an outcome, judging it with [`evaluate`].
    pub fn judge(
        scenario: Scenario,
        test_value: u32,
        injected: ParityCode,
        observed: Option<FaultEvent>,
        read_value: u32,
    ) -> Self {
        Self {
            scenario,
            injected,
            observed,
            read_value,
            verdict: evaluate(scenario, test_value, observed, read_value),
        }
    }

    /// Whether the step passed.
    pub const fn passed(&self) -> bool {
        self.verdict.is_pass()
    }
}

/// Result of a full validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValidationReport {
    /// Value stored at the test location.
    pub test_value: u32,
    /// Correct parity of the test value at the test location.
    pub correct_parity: ParityCode,
    /// One outcome per [`Scenario`], in run order.
    pub outcomes: [TestOutcome; 3],
}

impl ValidationReport {
    /// Whether every step passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(TestOutcome::passed)
    }

    /// Outcome of `scenario`.
    pub fn outcome(&self, scenario: Scenario) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.scenario == scenario)
    }

    /// Number of failed steps.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }
}
