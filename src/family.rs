//! Known UF2 family identifiers
//!
//! The family ID is an opaque 32-bit pass-through as far as patching is
//! concerned; this registry exists so the CLI can accept target names and
//! label `info` output. Unknown IDs are carried through untouched.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

/// Well-known target families
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    VariantNames,
    Deserialize,
    Serialize,
)]
#[non_exhaustive]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Family {
    /// ESP8266
    Esp8266,
    /// ESP32-S2
    Esp32s2,
    /// ESP32-S3
    Esp32s3,
    /// i.MX RT10xx
    Mimxrt10xx,
    /// nRF52840
    Nrf52840,
    /// RP2040
    #[default]
    Rp2040,
    /// SAMD21
    Samd21,
    /// SAMD51
    Samd51,
    /// STM32F4
    Stm32f4,
}

impl Family {
    /// The ID carried in the `family_id` field of a UF2 block.
    pub fn id(self) -> u32 {
        match self {
            Family::Esp8266 => 0x7eab_61ed,
            Family::Esp32s2 => 0xbfdd_4eee,
            Family::Esp32s3 => 0xc47e_5767,
            Family::Mimxrt10xx => 0x4fb2_d5bd,
            Family::Nrf52840 => 0xada5_2840,
            Family::Rp2040 => 0xe48b_ff56,
            Family::Samd21 => 0x68ed_2b88,
            Family::Samd51 => 0x5511_4460,
            Family::Stm32f4 => 0x5775_5a57,
        }
    }

    /// Look up a known family by its ID.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::iter().find(|family| family.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn ids_are_unique() {
        for family in Family::iter() {
            assert_eq!(Family::from_id(family.id()), Some(family));
        }
    }

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(Family::from_str("rp2040"), Ok(Family::Rp2040));
        assert_eq!(Family::from_str("nrf52840"), Ok(Family::Nrf52840));
        assert!(Family::from_str("rp9999").is_err());
    }

    #[test]
    fn unknown_ids_stay_opaque() {
        assert_eq!(Family::from_id(0xdead_beef), None);
    }
}
