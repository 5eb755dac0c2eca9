//! Single entry point: bring up fault handling, run the validation.

use ecc::{FaultMonitor, LocationError, Sequencer, ValidationConfig, ValidationReport};
use platform::{DwInstance, FaultInitError, FaultIrq, FaultStruct, PdmaEcc};

/// Reasons the validation could not run at all. All fatal; no step ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    /// Fault handling bring-up failed.
    FaultInit(FaultInitError),
    /// The configured test location does not exist on the device.
    Location(LocationError),
    /// The monitor watches a different P-DMA instance than the one configured.
    InstanceMismatch {
        /// Instance in the validation config.
        configured: DwInstance,
        /// Instance the monitor recognises.
        monitored: DwInstance,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for AppError {}

impl core::fmt::Display for AppError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::FaultInit(e) => write!(f, "Fault handling bring-up failed: {e}"),
            Self::Location(e) => write!(f, "Invalid test location: {e}"),
            Self::InstanceMismatch {
                configured,
                monitored,
            } => write!(
                f,
                "Monitor watches {} but the test targets {}",
                monitored.name(),
                configured.name()
            ),
        }
    }
}

impl From<FaultInitError> for AppError {
    fn from(e: FaultInitError) -> Self {
        Self::FaultInit(e)
    }
}

impl From<LocationError> for AppError {
    fn from(e: LocationError) -> Self {
        Self::Location(e)
    }
}

/// Bring up fault handling on `hw` with `monitor` as the handler, then run
/// the three validation steps.
///
/// Returns the report whatever the verdicts; only setup problems are errors.
pub async fn run_validation<'h, H>(
    hw: &mut H,
    monitor: &'h FaultMonitor,
    config: ValidationConfig,
) -> Result<ValidationReport, AppError>
where
    H: PdmaEcc + FaultStruct + FaultIrq<'h>,
{
    if monitor.instance() != config.instance {
        return Err(AppError::InstanceMismatch {
            configured: config.instance,
            monitored: monitor.instance(),
        });
    }

    crate::boot::init_fault_handling(hw, config.instance, monitor)?;

    let mut sequencer = Sequencer::new(&mut *hw, monitor, config)?;
    let report = sequencer.run().await;

    #[cfg(feature = "defmt")]
    defmt::info!(
        "ECC validation finished: {=usize} of 3 steps failed",
        report.failures()
    );
    #[cfg(feature = "tracing")]
    tracing::info!(
        failures = report.failures(),
        passed = report.all_passed(),
        "ECC validation finished"
    );

    Ok(report)
}
