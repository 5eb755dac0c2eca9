//! Three-step ECC validation sequence.
//!
//! ```text
//! prepare ─► compute parity ─► Baseline ─► restore ─► SingleBit ─► restore ─► DoubleBit ─► restore
//! ```
//!
//! Each step: inject `correct ^ flip`, quiesce the fault slot, one
//! triggering access, settle, take the slot, judge. Steps never gate each
//! other and nothing is retried.
//!
//! A fault that arrives after the settle interval is indistinguishable from
//! no fault. That holds for both [`SettleStrategy`] variants.

use embassy_time::{with_timeout, Duration, Timer};
use platform::config::{SETTLE_INTERVAL, TEST_CHANNEL, TEST_INSTANCE, TEST_VALUE, TEST_WORD};
use platform::{DwInstance, PdmaEcc, SramWord};

use crate::inject::InjectionController;
use crate::location::{LocationError, StorageLocation};
use crate::monitor::{FaultEvent, FaultMonitor};
use crate::outcome::{Scenario, TestOutcome, ValidationReport};
use crate::parity::{compute_parity, ParityCode};

/// How the sequencer waits for a fault notification after the access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettleStrategy {
    /// Always wait the full settle interval, then read the slot.
    #[default]
    FixedDelay,
    /// Return as soon as a fault is recorded, at most after the interval.
    UntilFault,
}

/// What to test and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// P-DMA instance under test. Selects the fault sources.
    pub instance: DwInstance,
    /// SRAM word that gets corrupted.
    pub location: StorageLocation,
    /// Value stored at `location` for every step.
    pub test_value: u32,
    /// Time allowed for the fault interrupt after the access.
    pub settle: Duration,
    /// Settle behaviour.
    pub strategy: SettleStrategy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            instance: TEST_INSTANCE,
            location: StorageLocation::unchecked(TEST_CHANNEL, TEST_WORD),
            test_value: TEST_VALUE,
            settle: SETTLE_INTERVAL,
            strategy: SettleStrategy::FixedDelay,
        }
    }
}

/// Runs the validation steps against one P-DMA instance.
///
/// `monitor` must be the handler registered for the instance's fault
/// interrupt; the sequencer only reads and resets its slot.
pub struct Sequencer<'m, D: PdmaEcc> {
    dev: D,
    monitor: &'m FaultMonitor,
    config: ValidationConfig,
    injector: InjectionController,
}

impl<'m, D: PdmaEcc> Sequencer<'m, D> {
    /// Sequencer for `dev`. Fails if the configured channel does not exist.
    pub fn new(
        dev: D,
        monitor: &'m FaultMonitor,
        config: ValidationConfig,
    ) -> Result<Self, LocationError> {
        let location = config.location;
        StorageLocation::new(location.channel(), location.word(), dev.channel_count())?;
        Ok(Self {
            dev,
            monitor,
            config,
            injector: InjectionController::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Give the device back.
    pub fn into_inner(self) -> D {
        self.dev
    }

    /// Correct parity of the test value at the test location.
    pub fn correct_parity(&self) -> ParityCode {
        compute_parity(self.config.location.logical_address(), self.config.test_value)
    }

    /// Run all steps and collect the report.
    pub async fn run(&mut self) -> ValidationReport {
        self.prepare();
        let correct = self.correct_parity();

        #[cfg(feature = "defmt")]
        defmt::info!(
            "ECC validation: value 0x{=u32:08x}, correct parity 0x{=u8:02x}",
            self.config.test_value,
            correct.get()
        );
        #[cfg(feature = "tracing")]
        tracing::info!(
            test_value = self.config.test_value,
            correct_parity = correct.get(),
            channel = self.config.location.channel(),
            word = self.config.location.word().index(),
            "ECC validation started"
        );

        let baseline = self.step(Scenario::Baseline, correct).await;
        self.restore();
        let single = self.step(Scenario::SingleBit, correct).await;
        self.restore();
        let double = self.step(Scenario::DoubleBit, correct).await;
        self.restore();

        ValidationReport {
            test_value: self.config.test_value,
            correct_parity: correct,
            outcomes: [baseline, single, double],
        }
    }

    /// Zero both SRAM words of the test channel, then store the test value.
    pub fn prepare(&mut self) {
        let channel = self.config.location.channel();
        self.dev.set_sram_data(channel, SramWord::Word0, 0);
        self.dev.set_sram_data(channel, SramWord::Word1, 0);
        self.restore();
    }

    /// Run one step against the current device state.
    pub async fn step(&mut self, scenario: Scenario, correct: ParityCode) -> TestOutcome {
        let location = self.config.location;
        let injected = correct.flip(scenario.parity_flip());

        self.injector.inject(&mut self.dev, location, injected);
        self.monitor.quiesce();
        let read_value = self.access();
        self.injector.on_access();
        let observed = self.settle().await;

        let outcome = TestOutcome::judge(
            scenario,
            self.config.test_value,
            injected,
            observed,
            read_value,
        );

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Step {=u8}: injected 0x{=u8:02x}, verdict {}",
            scenario.step(),
            injected.get(),
            outcome.verdict
        );
        #[cfg(feature = "tracing")]
        tracing::info!(
            step = scenario.step(),
            injected = injected.get(),
            observed = observed.map_or("none", |e| e.class.label()),
            read_value,
            passed = outcome.passed(),
            "ECC validation step finished"
        );

        outcome
    }

    /// Triggering access: a read of the test word through the ECC decoder.
    fn access(&mut self) -> u32 {
        let location = self.config.location;
        match location.word() {
            SramWord::Word1 => self.dev.current_descriptor(location.channel()),
            SramWord::Word0 => self.dev.sram_data(location.channel(), SramWord::Word0),
        }
    }

    /// Rewrite the test value with freshly computed parity.
    fn restore(&mut self) {
        let location = self.config.location;
        let value = self.config.test_value;
        match location.word() {
            SramWord::Word1 => self.dev.set_descriptor(location.channel(), value),
            SramWord::Word0 => self
                .dev
                .set_sram_data(location.channel(), SramWord::Word0, value),
        }
    }

    async fn settle(&self) -> Option<FaultEvent> {
        match self.config.strategy {
            SettleStrategy::FixedDelay => {
                Timer::after(self.config.settle).await;
                self.monitor.take()
            }
            SettleStrategy::UntilFault => {
                with_timeout(self.config.settle, self.monitor.wait()).await.ok()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::mocks::{SimOp, SimulatedPdma};
    use crate::outcome::Verdict;
    use platform::{FaultIrq, FaultStruct, FaultStructConfig, IrqConfig};

    fn wired<'h>(monitor: &'h FaultMonitor) -> SimulatedPdma<'h> {
        let mut sim = SimulatedPdma::new(8);
        sim.set_mask(platform::FaultSource::DW0_C_ECC);
        sim.set_mask(platform::FaultSource::DW0_NC_ECC);
        sim.set_interrupt_mask();
        sim.init(&FaultStructConfig::IRQ_ONLY).unwrap();
        sim.register(IrqConfig::fault_irq(), monitor).unwrap();
        sim.enable_irq();
        sim
    }

    #[test]
    fn default_config_targets_channel_five_word_one() {
        let config = ValidationConfig::default();
        assert_eq!(config.location.channel(), 5);
        assert_eq!(config.location.word(), SramWord::Word1);
        assert_eq!(config.location.logical_address().get(), 11);
        assert_eq!(config.strategy, SettleStrategy::FixedDelay);
    }

    #[test]
    fn channel_beyond_device_is_rejected() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let sim = SimulatedPdma::new(4);
        let result = Sequencer::new(sim, &monitor, ValidationConfig::default());
        assert!(matches!(
            result,
            Err(LocationError::ChannelOutOfRange { channel: 5, .. })
        ));
    }

    #[test]
    fn prepare_zeroes_both_words_then_writes_descriptor() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = SimulatedPdma::new(8);
        let mut seq = Sequencer::new(&mut sim, &monitor, ValidationConfig::default()).unwrap();
        seq.prepare();
        drop(seq);

        assert_eq!(
            sim.ops(),
            &[
                SimOp::SramWrite {
                    channel: 5,
                    word: SramWord::Word0,
                    value: 0
                },
                SimOp::SramWrite {
                    channel: 5,
                    word: SramWord::Word1,
                    value: 0
                },
                SimOp::DescriptorWrite {
                    channel: 5,
                    value: TEST_VALUE
                },
            ]
        );
    }

    #[tokio::test]
    async fn all_steps_pass_on_healthy_hardware() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let mut seq = Sequencer::new(&mut sim, &monitor, ValidationConfig::default()).unwrap();

        let report = seq.run().await;

        assert!(report.all_passed(), "{report:?}");
        assert_eq!(report.outcomes[1].injected, report.correct_parity.flip(0x01));
        assert_eq!(report.outcomes[2].injected, report.correct_parity.flip(0x03));
    }

    #[tokio::test]
    async fn word_zero_uses_the_sram_register() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let config = ValidationConfig {
            location: StorageLocation::new(2, SramWord::Word0, 8).unwrap(),
            test_value: 0x0BAD_CAFE,
            ..ValidationConfig::default()
        };
        let mut seq = Sequencer::new(&mut sim, &monitor, config).unwrap();

        let report = seq.run().await;

        assert!(report.all_passed(), "{report:?}");
        assert_eq!(sim.raw_word(2, SramWord::Word0).0, 0x0BAD_CAFE);
    }

    #[tokio::test]
    async fn until_fault_returns_the_event() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let config = ValidationConfig {
            strategy: SettleStrategy::UntilFault,
            ..ValidationConfig::default()
        };
        let mut seq = Sequencer::new(&mut sim, &monitor, config).unwrap();

        let report = seq.run().await;

        assert!(report.all_passed(), "{report:?}");
    }

    #[tokio::test]
    async fn steps_run_even_when_baseline_fails() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let mut seq = Sequencer::new(&mut sim, &monitor, ValidationConfig::default()).unwrap();
        seq.prepare();

        // A wrong "correct" parity makes the baseline fault.
        let bogus = seq.correct_parity().flip(0x01);
        let outcome = seq.step(Scenario::Baseline, bogus).await;

        assert!(matches!(outcome.verdict, Verdict::Fail(_)));
        let report = seq.run().await;
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn fault_raised_by_the_injection_read_is_discarded() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let mut seq = Sequencer::new(&mut sim, &monitor, ValidationConfig::default()).unwrap();
        seq.prepare();
        let correct = seq.correct_parity();

        let single = seq.step(Scenario::SingleBit, correct).await;
        assert!(single.passed(), "{single:?}");

        // No restore: the word still carries the 1-bit parity error, so the
        // read-modify-write inside the next injection faults on its own.
        let baseline = seq.step(Scenario::Baseline, correct).await;
        drop(seq);

        assert_eq!(baseline.verdict, Verdict::Pass);
        assert_eq!(baseline.observed, None);
        let latched = sim
            .ops()
            .iter()
            .filter(|op| matches!(op, SimOp::FaultLatched(_)))
            .count();
        assert_eq!(latched, 2);
    }

    #[tokio::test]
    async fn test_word_is_healed_after_run() {
        let monitor = FaultMonitor::new(DwInstance::Dw0);
        let mut sim = wired(&monitor);
        let mut seq = Sequencer::new(&mut sim, &monitor, ValidationConfig::default()).unwrap();
        let correct = seq.correct_parity();

        seq.run().await;
        drop(seq);

        assert_eq!(sim.raw_word(5, SramWord::Word1), (TEST_VALUE, correct));
    }
}
