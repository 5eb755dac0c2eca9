//! Fault interrupt routing.
//!
//! The fault structure interrupt is a system interrupt multiplexed onto one
//! of the CPU's NVIC lines. Registration binds it to a [`FaultHandler`]
//! that runs preemptively relative to the test thread.

use crate::sysfault::{FaultInitError, FaultStruct};

/// Interrupt routing for the fault structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqConfig {
    /// NVIC multiplexer line (CPU IRQ number).
    pub nvic_mux: u8,
    /// Interrupt priority.
    pub priority: u8,
}

impl IrqConfig {
    /// Routing used by the ECC test: NVIC mux 3, priority 2.
    pub const fn fault_irq() -> Self {
        Self {
            nvic_mux: crate::config::FAULT_IRQ_NVIC_MUX,
            priority: crate::config::FAULT_IRQ_PRIORITY,
        }
    }
}

/// Handler invoked in interrupt context when the fault structure fires.
///
/// Must be bounded and non-blocking: read registers, classify, publish,
/// clear status and interrupt.
pub trait FaultHandler: Sync {
    /// Service one fault interrupt.
    fn on_fault_irq(&self, regs: &mut dyn FaultStruct);
}

/// Interrupt controller view of the fault structure interrupt.
///
/// `'h` is how long the registered handler stays borrowed; on target it is
/// `'static`.
pub trait FaultIrq<'h> {
    /// Route the fault interrupt to `handler`.
    fn register(
        &mut self,
        config: IrqConfig,
        handler: &'h dyn FaultHandler,
    ) -> Result<(), FaultInitError>;

    /// Unmask the NVIC line.
    fn enable_irq(&mut self);
}
