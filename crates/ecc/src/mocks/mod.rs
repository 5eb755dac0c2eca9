//! Host model of a P-DMA instance and the system fault structure
//!
//! [`SimulatedPdma`] implements [`PdmaEcc`], [`FaultStruct`] and
//! [`FaultIrq`] in one object, so a test can hand the same simulator to the
//! bring-up code, the injection controller and the sequencer.
//!
//! Every SRAM word is stored with a 7-bit parity. Reads decode it the way
//! the hardware does:
//!
//! | Syndrome                      | Result                              |
//! |-------------------------------|-------------------------------------|
//! | zero                          | clean                               |
//! | weight 1 (parity bit flipped) | correctable, data returned as is    |
//! | a data column of the matrix   | correctable, that data bit flipped  |
//! | anything else                 | non-correctable, raw data returned  |
//!
//! A decode error latches a fault and, depending on [`DeliveryMode`], calls
//! the registered [`FaultHandler`] before the read returns.

#![cfg(any(test, feature = "std"))]

use heapless::Vec;
use platform::{
    DwInstance, FaultData, FaultHandler, FaultInitError, FaultIrq, FaultSource, FaultStruct,
    FaultStructConfig, IrqConfig, PdmaEcc, SramWord,
};

use crate::location::LogicalAddress;
use crate::parity::{compute_parity, data_bit_for_syndrome, syndrome, ParityCode};

/// Largest channel count the simulator models.
pub const MAX_CHANNELS: usize = 32;

/// Operations kept in the access log.
pub const OP_LOG_CAPACITY: usize = 64;

/// When a latched fault reaches the registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// The handler runs before the faulting read returns.
    Immediate,
    /// The fault stays pending until [`SimulatedPdma::deliver_pending_irq`].
    /// Models a notification that arrives after the settle interval.
    Deferred,
    /// The interrupt never fires. Models a broken fault path.
    Masked,
}

/// One register-level operation seen by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    /// `ECC_CTL` written.
    EccCtl {
        /// Target SRAM word address.
        word_addr: u32,
        /// Parity to inject.
        parity: u8,
    },
    /// `CTL.ECC_INJ_EN` written.
    Injection(bool),
    /// `SRAM_DATAx` read.
    SramRead {
        /// Channel.
        channel: u8,
        /// Word.
        word: SramWord,
    },
    /// `SRAM_DATAx` written.
    SramWrite {
        /// Channel.
        channel: u8,
        /// Word.
        word: SramWord,
        /// Value written.
        value: u32,
    },
    /// Current descriptor set.
    DescriptorWrite {
        /// Channel.
        channel: u8,
        /// Descriptor written.
        value: u32,
    },
    /// Current descriptor read.
    DescriptorRead {
        /// Channel.
        channel: u8,
    },
    /// A fault was latched.
    FaultLatched(FaultSource),
    /// Fault status cleared.
    StatusCleared,
    /// Fault interrupt cleared.
    InterruptCleared,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    value: u32,
    parity: ParityCode,
}

#[derive(Debug, Clone, Copy, Default)]
struct Latch {
    source: FaultSource,
    data: [u32; 4],
}

/// Simulated P-DMA instance with ECC-protected channel SRAM and a fault
/// structure.
///
/// `'h` is the lifetime of the registered fault handler.
pub struct SimulatedPdma<'h> {
    instance: DwInstance,
    channel_count: u8,
    cells: Vec<[Cell; 2], MAX_CHANNELS>,

    ecc_word_addr: u32,
    ecc_parity: u8,
    injection: bool,

    masks: Vec<FaultSource, 8>,
    interrupt_mask: bool,
    reaction: Option<FaultStructConfig>,
    status: bool,
    latch: Latch,
    irq_pending: bool,
    dropped_faults: usize,

    handler: Option<&'h dyn FaultHandler>,
    irq_config: Option<IrqConfig>,
    irq_enabled: bool,
    delivery: DeliveryMode,
    init_failure: Option<FaultInitError>,

    ops: Vec<SimOp, OP_LOG_CAPACITY>,
}

impl<'h> SimulatedPdma<'h> {
    /// DW0 with `channel_count` channels (capped at [`MAX_CHANNELS`]),
    /// all SRAM words zero with valid parity.
    pub fn new(channel_count: u8) -> Self {
        Self::with_instance(DwInstance::Dw0, channel_count)
    }

    /// Simulator for `instance`.
    #[allow(clippy::cast_possible_truncation)] // MAX_CHANNELS fits in u8
    pub fn with_instance(instance: DwInstance, channel_count: u8) -> Self {
        let channel_count = channel_count.min(MAX_CHANNELS as u8);
        let mut cells = Vec::new();
        for channel in 0..channel_count {
            let word = |w: SramWord| Cell {
                value: 0,
                parity: compute_parity(address_of(channel, w), 0),
            };
            let _ = cells.push([word(SramWord::Word0), word(SramWord::Word1)]);
        }

        Self {
            instance,
            channel_count,
            cells,
            ecc_word_addr: 0,
            ecc_parity: 0,
            injection: false,
            masks: Vec::new(),
            interrupt_mask: false,
            reaction: None,
            status: false,
            latch: Latch::default(),
            irq_pending: false,
            dropped_faults: 0,
            handler: None,
            irq_config: None,
            irq_enabled: false,
            delivery: DeliveryMode::Immediate,
            init_failure: None,
            ops: Vec::new(),
        }
    }

    /// Choose when latched faults reach the handler.
    pub fn set_delivery(&mut self, mode: DeliveryMode) {
        self.delivery = mode;
    }

    /// Make bring-up fail with `error`.
    ///
    /// [`FaultInitError::StructInit`] fails [`FaultStruct::init`]; the other
    /// variants fail [`FaultIrq::register`].
    pub fn fail_init(&mut self, error: FaultInitError) {
        self.init_failure = Some(error);
    }

    /// Stored value and parity of one SRAM word, bypassing the decoder.
    pub fn raw_word(&self, channel: u8, word: SramWord) -> (u32, ParityCode) {
        self.cell(channel, word)
            .map_or((0, ParityCode::default()), |c| (c.value, c.parity))
    }

    /// Whether `CTL.ECC_INJ_EN` is currently set.
    pub fn injection_enabled(&self) -> bool {
        self.injection
    }

    /// Whether a fault is latched (status not cleared yet).
    pub fn fault_latched(&self) -> bool {
        self.status
    }

    /// Whether the fault interrupt is pending.
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// Faults lost because an earlier one was still latched.
    pub fn dropped_faults(&self) -> usize {
        self.dropped_faults
    }

    /// Routing passed to [`FaultIrq::register`], if any.
    pub fn irq_config(&self) -> Option<IrqConfig> {
        self.irq_config
    }

    /// Reaction configuration passed to [`FaultStruct::init`], if any.
    pub fn reaction(&self) -> Option<FaultStructConfig> {
        self.reaction
    }

    /// Whether faults from `source` reach the fault structure.
    pub fn is_masked(&self, source: FaultSource) -> bool {
        self.masks.contains(&source)
    }

    /// Whether the interrupt reaction is enabled.
    pub fn interrupt_mask_set(&self) -> bool {
        self.interrupt_mask
    }

    /// Whether the NVIC line is enabled.
    pub fn irq_enabled(&self) -> bool {
        self.irq_enabled
    }

    /// Access log since creation or the last [`clear_ops`](Self::clear_ops).
    pub fn ops(&self) -> &[SimOp] {
        &self.ops
    }

    /// Empty the access log.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Latch a fault as if the hardware had detected it.
    pub fn raise_fault(&mut self, source: FaultSource, data0: u32, data1: u32) {
        if !self.is_masked(source) {
            return;
        }
        if self.status {
            self.dropped_faults = self.dropped_faults.saturating_add(1);
            return;
        }

        self.status = true;
        self.latch = Latch {
            source,
            data: [data0, data1, 0, 0],
        };
        self.log(SimOp::FaultLatched(source));

        if self.interrupt_mask && self.reaction.is_some() {
            self.irq_pending = true;
            if self.delivery == DeliveryMode::Immediate {
                self.deliver_pending_irq();
            }
        }
    }

    /// Run the handler for a pending fault interrupt.
    ///
    /// Returns `false` when nothing was delivered: no interrupt pending, no
    /// handler, line disabled, or [`DeliveryMode::Masked`].
    pub fn deliver_pending_irq(&mut self) -> bool {
        if !self.irq_pending || !self.irq_enabled || self.delivery == DeliveryMode::Masked {
            return false;
        }
        let Some(handler) = self.handler else {
            return false;
        };
        handler.on_fault_irq(self);
        true
    }

    fn log(&mut self, op: SimOp) {
        if self.ops.len() < self.ops.capacity() {
            let _ = self.ops.push(op);
        }
    }

    fn cell(&self, channel: u8, word: SramWord) -> Option<&Cell> {
        self.cells
            .get(usize::from(channel))
            .and_then(|pair| pair.get(usize::from(word.index())))
    }

    fn cell_mut(&mut self, channel: u8, word: SramWord) -> Option<&mut Cell> {
        self.cells
            .get_mut(usize::from(channel))
            .and_then(|pair| pair.get_mut(usize::from(word.index())))
    }

    fn store(&mut self, channel: u8, word: SramWord, value: u32) {
        let address = address_of(channel, word);
        #[allow(clippy::cast_possible_truncation)] // channel <= 255
        let injected = self.injection && self.ecc_word_addr == address.get() as u32;
        let parity = if injected {
            ParityCode::new(self.ecc_parity)
        } else {
            compute_parity(address, value)
        };
        if let Some(cell) = self.cell_mut(channel, word) {
            *cell = Cell { value, parity };
        }
    }

    /// Read through the ECC decoder, latching a fault on any error.
    #[allow(clippy::arithmetic_side_effects)] // Safety: word address <= 511, times 4 fits in u32
    #[allow(clippy::cast_possible_truncation)] // word address <= 511
    fn load(&mut self, channel: u8, word: SramWord) -> u32 {
        let Some(&Cell { value, parity }) = self.cell(channel, word) else {
            return 0;
        };
        let address = address_of(channel, word);
        let syn = syndrome(address, value, parity);
        if syn == 0 {
            return value;
        }

        let (source, data) = if syn.count_ones() == 1 {
            (self.instance.correctable_ecc_source(), value)
        } else if let Some(bit) = data_bit_for_syndrome(syn) {
            (self.instance.correctable_ecc_source(), value ^ (1 << bit))
        } else {
            (self.instance.non_correctable_ecc_source(), value)
        };

        let byte_address = address.get() as u32 * platform::sysfault::BYTES_PER_32_BIT_WORD;
        self.raise_fault(source, byte_address, u32::from(syn));
        data
    }
}

#[allow(clippy::arithmetic_side_effects)] // Safety: u8 * 2 + 1 fits in u64
fn address_of(channel: u8, word: SramWord) -> LogicalAddress {
    LogicalAddress::new(u64::from(channel) * 2 + u64::from(word.index()))
}

impl PdmaEcc for SimulatedPdma<'_> {
    fn channel_count(&self) -> u8 {
        self.channel_count
    }

    fn set_descriptor(&mut self, channel: u8, descriptor: u32) {
        self.log(SimOp::DescriptorWrite {
            channel,
            value: descriptor,
        });
        self.store(channel, SramWord::Word1, descriptor);
    }

    fn current_descriptor(&mut self, channel: u8) -> u32 {
        self.log(SimOp::DescriptorRead { channel });
        self.load(channel, SramWord::Word1)
    }

    fn set_ecc_ctl(&mut self, word_addr: u32, parity: u8) {
        self.log(SimOp::EccCtl { word_addr, parity });
        self.ecc_word_addr = word_addr;
        self.ecc_parity = parity;
    }

    fn set_ecc_injection(&mut self, enabled: bool) {
        self.log(SimOp::Injection(enabled));
        self.injection = enabled;
    }

    fn sram_data(&mut self, channel: u8, word: SramWord) -> u32 {
        self.log(SimOp::SramRead { channel, word });
        self.load(channel, word)
    }

    fn set_sram_data(&mut self, channel: u8, word: SramWord, value: u32) {
        self.log(SimOp::SramWrite {
            channel,
            word,
            value,
        });
        self.store(channel, word, value);
    }
}

impl FaultStruct for SimulatedPdma<'_> {
    fn fault_data(&self, which: FaultData) -> u32 {
        let [d0, d1, d2, d3] = self.latch.data;
        match which {
            FaultData::Data0 => d0,
            FaultData::Data1 => d1,
            FaultData::Data2 => d2,
            FaultData::Data3 => d3,
        }
    }

    fn error_source(&self) -> FaultSource {
        self.latch.source
    }

    fn clear_status(&mut self) {
        self.log(SimOp::StatusCleared);
        self.status = false;
    }

    fn clear_interrupt(&mut self) {
        self.log(SimOp::InterruptCleared);
        self.irq_pending = false;
    }

    fn set_mask(&mut self, source: FaultSource) {
        if !self.masks.contains(&source) {
            let _ = self.masks.push(source);
        }
    }

    fn set_interrupt_mask(&mut self) {
        self.interrupt_mask = true;
    }

    fn init(&mut self, config: &FaultStructConfig) -> Result<(), FaultInitError> {
        if self.init_failure == Some(FaultInitError::StructInit) {
            return Err(FaultInitError::StructInit);
        }
        self.reaction = Some(*config);
        Ok(())
    }
}

impl<'h> FaultIrq<'h> for SimulatedPdma<'h> {
    fn register(
        &mut self,
        config: IrqConfig,
        handler: &'h dyn FaultHandler,
    ) -> Result<(), FaultInitError> {
        if let Some(err @ (FaultInitError::IrqRegistration | FaultInitError::AlreadyRegistered)) =
            self.init_failure
        {
            return Err(err);
        }
        if self.handler.is_some() {
            return Err(FaultInitError::AlreadyRegistered);
        }
        self.handler = Some(handler);
        self.irq_config = Some(config);
        Ok(())
    }

    fn enable_irq(&mut self) {
        self.irq_enabled = true;
    }
}
