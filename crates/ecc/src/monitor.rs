//! Fault notification channel for P-DMA ECC faults.
//!
//! [`FaultMonitor`] is the fault structure interrupt handler and the
//! single-slot mailbox the sequencer reads afterwards. One monitor serves one
//! P-DMA instance: it knows that instance's correctable and non-correctable
//! fault source IDs.
//!
//! # Protocol
//!
//! ```text
//!  Idle ──(fault IRQ)──► Signaled ──(sequencer take / quiesce)──► Idle
//! ```
//!
//! The sequencer calls [`FaultMonitor::quiesce`] immediately before the
//! triggering access and [`FaultMonitor::take`] only after the settle
//! interval. A second fault arriving before `take` overwrites the first;
//! each test step provokes at most one.
//!
//! # Interrupt safety
//!
//! The slot is an embassy-sync [`Signal`] over [`CriticalSectionRawMutex`].
//! The handler only ever calls `signal()`, a bounded copy inside a critical
//! section; it never blocks or retries.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use platform::sysfault::BYTES_PER_32_BIT_WORD;
use platform::{DwInstance, FaultData, FaultHandler, FaultSource, FaultStruct};

/// Classification of a fault reported by the fault structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultClass {
    /// Single-bit error, corrected by hardware on read.
    Correctable,
    /// Multi-bit error, detected but not repairable.
    NonCorrectable,
    /// Source matched neither ECC class of the monitored instance.
    Unexpected(FaultSource),
}

impl FaultClass {
    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Correctable => "correctable",
            Self::NonCorrectable => "non-correctable",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// One serviced fault interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultEvent {
    /// Classification by source ID.
    pub class: FaultClass,
    /// Faulting SRAM word address (DATA0 / 4).
    pub word_address: u32,
    /// ECC syndrome (DATA1).
    pub syndrome: u32,
}

/// Flag view of the last fault: "any fault" plus one flag per ECC class.
///
/// An unexpected source only sets `occurred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultFlags {
    /// A fault interrupt was serviced.
    pub occurred: bool,
    /// It was a correctable ECC fault.
    pub correctable: bool,
    /// It was a non-correctable ECC fault.
    pub non_correctable: bool,
}

impl From<Option<FaultEvent>> for FaultFlags {
    fn from(event: Option<FaultEvent>) -> Self {
        match event {
            None => Self::default(),
            Some(event) => Self {
                occurred: true,
                correctable: event.class == FaultClass::Correctable,
                non_correctable: event.class == FaultClass::NonCorrectable,
            },
        }
    }
}

/// Fault interrupt handler and last-fault slot for one P-DMA instance.
pub struct FaultMonitor {
    instance: DwInstance,
    correctable: FaultSource,
    non_correctable: FaultSource,
    slot: Signal<CriticalSectionRawMutex, FaultEvent>,
}

impl FaultMonitor {
    /// Monitor for ECC faults of `instance`. `const` so it can live in a `static`.
    pub const fn new(instance: DwInstance) -> Self {
        Self {
            instance,
            correctable: instance.correctable_ecc_source(),
            non_correctable: instance.non_correctable_ecc_source(),
            slot: Signal::new(),
        }
    }

    /// Instance whose fault sources this monitor recognises.
    pub const fn instance(&self) -> DwInstance {
        self.instance
    }

    /// Map a fault source to its class for this instance.
    pub fn classify(&self, source: FaultSource) -> FaultClass {
        if source == self.correctable {
            FaultClass::Correctable
        } else if source == self.non_correctable {
            FaultClass::NonCorrectable
        } else {
            FaultClass::Unexpected(source)
        }
    }

    /// Drop any fault recorded so far. Call right before a test access.
    pub fn quiesce(&self) {
        if self.is_signaled() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Discarding fault recorded before the test access");
            #[cfg(feature = "tracing")]
            tracing::debug!("discarding fault recorded before the test access");
        }
        self.slot.reset();
    }

    /// Take the last fault, leaving the slot empty.
    pub fn take(&self) -> Option<FaultEvent> {
        self.slot.try_take()
    }

    /// Take the last fault as flags.
    pub fn take_flags(&self) -> FaultFlags {
        FaultFlags::from(self.take())
    }

    /// Whether a fault is waiting in the slot.
    pub fn is_signaled(&self) -> bool {
        self.slot.signaled()
    }

    /// Wait until a fault is recorded and take it.
    pub async fn wait(&self) -> FaultEvent {
        self.slot.wait().await
    }

    /// Publish `event` to the slot, overwriting any unconsumed one.
    pub fn record(&self, event: FaultEvent) {
        self.slot.signal(event);
    }
}

impl FaultHandler for FaultMonitor {
    #[allow(clippy::arithmetic_side_effects)] // Safety: divisor is the non-zero constant 4
    fn on_fault_irq(&self, regs: &mut dyn FaultStruct) {
        let fault_address = regs.fault_data(FaultData::Data0);
        let fault_info = regs.fault_data(FaultData::Data1);
        let source = regs.error_source();

        let event = FaultEvent {
            class: self.classify(source),
            word_address: fault_address / BYTES_PER_32_BIT_WORD,
            syndrome: fault_info,
        };

        match event.class {
            FaultClass::Correctable | FaultClass::NonCorrectable => {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "P-DMA {=str} ECC fault: word address 0x{=u32:x}, syndrome 0x{=u32:x}",
                    event.class.label(),
                    event.word_address,
                    event.syndrome
                );
                #[cfg(feature = "tracing")]
                tracing::info!(
                    class = event.class.label(),
                    word_address = event.word_address,
                    syndrome = event.syndrome,
                    "P-DMA ECC fault detected"
                );
            }
            FaultClass::Unexpected(_source) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Unexpected fault source 0x{=u16:x} detected", _source.get());
                #[cfg(feature = "tracing")]
                tracing::error!(source = _source.get(), "unexpected fault source detected");
            }
        }

        self.record(event);

        regs.clear_status();
        regs.clear_interrupt();
    }
}
