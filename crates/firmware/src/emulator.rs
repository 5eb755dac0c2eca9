//! Desktop emulator configuration.
//!
//! The emulator runs the full validation against [`ecc::mocks::SimulatedPdma`].
//! The defaults reproduce the on-target setup; these environment variables
//! override single fields:
//!
//! | Variable         | Meaning                           | Example      |
//! |------------------|-----------------------------------|--------------|
//! | `ECC_CHANNEL`    | Channel under test                | `5`          |
//! | `ECC_WORD`       | SRAM word under test (0 or 1)     | `1`          |
//! | `ECC_TEST_VALUE` | Test value, decimal or `0x` hex   | `0x28004A60` |
//! | `ECC_SETTLE_MS`  | Settle interval in milliseconds   | `1`          |

use anyhow::{Context, Result};
use ecc::{StorageLocation, ValidationConfig};
use embassy_time::Duration;

/// Channels modelled by the emulated P-DMA instance.
pub const EMULATED_CHANNEL_COUNT: u8 = 29;

/// Build the validation config from `lookup` (normally `std::env::var`).
pub fn config_from_lookup<F>(lookup: F) -> Result<ValidationConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ValidationConfig::default();

    let channel = match lookup("ECC_CHANNEL") {
        Some(raw) => parse_u32(&raw)
            .and_then(|v| u8::try_from(v).ok())
            .with_context(|| format!("ECC_CHANNEL: invalid channel {raw:?}"))?,
        None => config.location.channel(),
    };
    let word = match lookup("ECC_WORD") {
        Some(raw) => parse_u32(&raw)
            .and_then(|v| u8::try_from(v).ok())
            .with_context(|| format!("ECC_WORD: invalid word {raw:?}"))?,
        None => config.location.word().index(),
    };
    config.location = StorageLocation::from_raw(channel, word, EMULATED_CHANNEL_COUNT)
        .context("ECC_CHANNEL / ECC_WORD")?;

    if let Some(raw) = lookup("ECC_TEST_VALUE") {
        config.test_value =
            parse_u32(&raw).with_context(|| format!("ECC_TEST_VALUE: invalid value {raw:?}"))?;
    }

    if let Some(raw) = lookup("ECC_SETTLE_MS") {
        let ms = raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("ECC_SETTLE_MS: invalid interval {raw:?}"))?;
        config.settle = Duration::from_millis(ms);
    }

    Ok(config)
}

/// Read the validation config from the process environment.
pub fn config_from_env() -> Result<ValidationConfig> {
    config_from_lookup(|key| std::env::var(key).ok())
}

fn parse_u32(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::SramWord;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_variables_gives_default_config() {
        let config = config_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn overrides_location_value_and_settle() {
        let config = config_from_lookup(lookup(&[
            ("ECC_CHANNEL", "12"),
            ("ECC_WORD", "0"),
            ("ECC_TEST_VALUE", "0xDEAD_BEEF"),
            ("ECC_SETTLE_MS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.location.channel(), 12);
        assert_eq!(config.location.word(), SramWord::Word0);
        assert_eq!(config.test_value, 0xDEAD_BEEF);
        assert_eq!(config.settle, Duration::from_millis(5));
    }

    #[test]
    fn decimal_test_value_is_accepted() {
        let config = config_from_lookup(lookup(&[("ECC_TEST_VALUE", "42")])).unwrap();
        assert_eq!(config.test_value, 42);
    }

    #[test]
    fn channel_beyond_instance_is_rejected() {
        assert!(config_from_lookup(lookup(&[("ECC_CHANNEL", "29")])).is_err());
    }

    #[test]
    fn word_two_is_rejected() {
        assert!(config_from_lookup(lookup(&[("ECC_WORD", "2")])).is_err());
    }

    #[test]
    fn garbage_settle_is_rejected() {
        let err = config_from_lookup(lookup(&[("ECC_SETTLE_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("ECC_SETTLE_MS"));
    }
}
