//! System fault structure abstraction.
//!
//! The fault structure latches the first masked fault it sees: the source
//! ID, up to four data words, and a status bit. It stays latched until
//! software clears the status; the interrupt condition is cleared
//! separately. Forgetting either leaves the line asserted and starves every
//! later notification.
//!
//! For P-DMA ECC faults the data words carry:
//!
//! | Register | Contents                                  |
//! |----------|-------------------------------------------|
//! | DATA0    | Byte address of the faulting SRAM word    |
//! | DATA1    | ECC syndrome                              |

/// Number of bytes in a 32-bit word. DATA0 holds a byte address.
pub const BYTES_PER_32_BIT_WORD: u32 = 4;

/// System fault source identifier (index into the fault mask).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct FaultSource(pub u16);

impl FaultSource {
    /// P-DMA instance #0 correctable ECC error.
    pub const DW0_C_ECC: Self = Self(66);
    /// P-DMA instance #0 non-correctable ECC error.
    pub const DW0_NC_ECC: Self = Self(67);
    /// P-DMA instance #1 correctable ECC error.
    pub const DW1_C_ECC: Self = Self(68);
    /// P-DMA instance #1 non-correctable ECC error.
    pub const DW1_NC_ECC: Self = Self(69);

    /// Raw source ID.
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Fault data register selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultData {
    /// DATA0: faulting address
    Data0,
    /// DATA1: fault specific information (ECC syndrome)
    Data1,
    /// DATA2
    Data2,
    /// DATA3
    Data3,
}

/// Fault structure reactions besides the interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStructConfig {
    /// Reset the device on a fault.
    pub reset_enable: bool,
    /// Drive the fault output pin.
    pub output_enable: bool,
    /// Emit a trigger to other peripherals.
    pub trigger_enable: bool,
}

impl FaultStructConfig {
    /// Interrupt only: no reset, no output pin, no trigger.
    pub const IRQ_ONLY: Self = Self {
        reset_enable: false,
        output_enable: false,
        trigger_enable: false,
    };
}

/// Fault handling bring-up errors. All of them are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultInitError {
    /// The fault structure rejected its configuration.
    StructInit,
    /// The fault interrupt could not be registered.
    IrqRegistration,
    /// The fault interrupt was registered twice.
    AlreadyRegistered,
}

#[cfg(feature = "std")]
impl std::error::Error for FaultInitError {}

impl core::fmt::Display for FaultInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StructInit => write!(f, "Fault structure initialization failed"),
            Self::IrqRegistration => write!(f, "Fault interrupt registration failed"),
            Self::AlreadyRegistered => write!(f, "Fault interrupt already registered"),
        }
    }
}

/// System fault structure (status, data, masks).
pub trait FaultStruct {
    /// Read one of the latched fault data registers.
    fn fault_data(&self, which: FaultData) -> u32;

    /// Source of the latched fault.
    fn error_source(&self) -> FaultSource;

    /// Clear the latched status so the structure can capture the next fault.
    fn clear_status(&mut self);

    /// Clear the pending interrupt condition.
    fn clear_interrupt(&mut self);

    /// Let faults from `source` reach this structure.
    fn set_mask(&mut self, source: FaultSource);

    /// Enable the interrupt reaction.
    fn set_interrupt_mask(&mut self);

    /// Apply the reaction configuration and enable the structure.
    fn init(&mut self, config: &FaultStructConfig) -> Result<(), FaultInitError>;
}
