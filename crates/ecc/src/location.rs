//! Storage locations inside a P-DMA instance's channel SRAM.

use platform::SramWord;

/// SRAM word address inside a P-DMA instance: `channel * 2 + word`.
///
/// Only used as parity encoder input and as the `ECC_CTL` target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct LogicalAddress(u64);

impl LogicalAddress {
    /// Wrap a raw SRAM word address.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw address.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Error building a [`StorageLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocationError {
    /// Channel index is not below the instance's channel count.
    ChannelOutOfRange {
        /// Requested channel.
        channel: u8,
        /// Channels in the instance.
        channel_count: u8,
    },
    /// Word selector other than 0 or 1.
    InvalidWord(u8),
}

#[cfg(feature = "std")]
impl std::error::Error for LocationError {}

impl core::fmt::Display for LocationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChannelOutOfRange {
                channel,
                channel_count,
            } => write!(
                f,
                "channel {channel} out of range (instance has {channel_count} channels)"
            ),
            Self::InvalidWord(word) => write!(f, "SRAM word {word} does not exist (0 or 1)"),
        }
    }
}

/// One ECC-protected SRAM word: a channel and one of its two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageLocation {
    channel: u8,
    word: SramWord,
}

impl StorageLocation {
    /// Location of `word` in `channel`, checked against `channel_count`.
    pub const fn new(
        channel: u8,
        word: SramWord,
        channel_count: u8,
    ) -> Result<Self, LocationError> {
        if channel >= channel_count {
            return Err(LocationError::ChannelOutOfRange {
                channel,
                channel_count,
            });
        }
        Ok(Self { channel, word })
    }

    /// Location without a channel range check, for compile-time defaults.
    /// Checked against the device when a sequencer is built.
    pub(crate) const fn unchecked(channel: u8, word: SramWord) -> Self {
        Self { channel, word }
    }

    /// Like [`new`](Self::new) with a raw word selector.
    pub const fn from_raw(channel: u8, word: u8, channel_count: u8) -> Result<Self, LocationError> {
        match SramWord::from_index(word) {
            Some(word) => Self::new(channel, word, channel_count),
            None => Err(LocationError::InvalidWord(word)),
        }
    }

    /// Channel index.
    pub const fn channel(self) -> u8 {
        self.channel
    }

    /// Word selector.
    pub const fn word(self) -> SramWord {
        self.word
    }

    /// SRAM word address the ECC logic uses for this location.
    #[allow(clippy::arithmetic_side_effects)] // Safety: u8 * 2 + 1 cannot overflow u64
    pub const fn logical_address(self) -> LogicalAddress {
        LogicalAddress(self.channel as u64 * 2 + self.word.index() as u64)
    }
}
