//! Fault handling bring-up.
//!
//! Initialization order (MUST be respected):
//!   1. Clear fault status (a fault latched earlier would block every later one)
//!   2. Mask in the instance's correctable and non-correctable ECC sources
//!   3. Enable the fault structure interrupt reaction
//!   4. Init the fault structure: IRQ only, no reset / output / trigger
//!   5. Register the fault handler on the CPU interrupt line
//!   6. Enable the line
//!
//! Any failure is fatal: the validation cannot produce meaningful verdicts
//! without a working fault path.

use platform::{
    DwInstance, FaultHandler, FaultInitError, FaultIrq, FaultStruct, FaultStructConfig, IrqConfig,
};

/// Ordered list of bring-up steps for documentation and testing.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Fault status: clear anything latched before the test",
    "2. Fault masks: route the instance's C_ECC and NC_ECC sources",
    "3. Interrupt mask: enable the fault structure IRQ reaction",
    "4. Fault structure: init IRQ only (reset, output, trigger disabled)",
    "5. Fault IRQ: register handler (NVIC mux 3, priority 2)",
    "6. Fault IRQ: enable NVIC line",
];

/// Route P-DMA ECC faults of `instance` to `handler`.
pub fn init_fault_handling<'h, H>(
    hw: &mut H,
    instance: DwInstance,
    handler: &'h dyn FaultHandler,
) -> Result<(), FaultInitError>
where
    H: FaultStruct + FaultIrq<'h> + ?Sized,
{
    hw.clear_status();
    hw.set_mask(instance.correctable_ecc_source());
    hw.set_mask(instance.non_correctable_ecc_source());
    hw.set_interrupt_mask();

    if let Err(e) = hw.init(&FaultStructConfig::IRQ_ONLY) {
        #[cfg(feature = "defmt")]
        defmt::error!("Fault structure init failed: {}", e);
        #[cfg(feature = "tracing")]
        tracing::error!(error = %e, "fault structure init failed");
        return Err(e);
    }

    let irq = IrqConfig::fault_irq();
    if let Err(e) = hw.register(irq, handler) {
        #[cfg(feature = "defmt")]
        defmt::error!("Fault IRQ registration failed: {}", e);
        #[cfg(feature = "tracing")]
        tracing::error!(error = %e, "fault IRQ registration failed");
        return Err(e);
    }
    hw.enable_irq();

    #[cfg(feature = "defmt")]
    defmt::info!(
        "Fault handling ready for {=str} (NVIC mux {=u8}, priority {=u8})",
        instance.name(),
        irq.nvic_mux,
        irq.priority
    );
    #[cfg(feature = "tracing")]
    tracing::info!(
        instance = instance.name(),
        nvic_mux = irq.nvic_mux,
        priority = irq.priority,
        "fault handling ready"
    );

    Ok(())
}
