use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

use crate::error::{Result, StakingError};
use crate::BASE_CURRENCY_TYPE;

/// Address at the start of a type tag or of one of its type parameters.
static TYPE_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[<,]\s*)(?:0x)?([0-9a-fA-F]{1,64})::").expect("static regex")
});

/// Left-pads an address to 64 hex digits and adds the `0x` prefix.
pub fn normalize_address(address: &str) -> String {
    let hex_part = address
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    format!("0x{:0>64}", hex_part.to_ascii_lowercase())
}

/// Validates and normalizes a 32-byte address.
pub fn parse_address(address: &str) -> Result<String> {
    let normalized = normalize_address(address);
    let bytes = hex::decode(&normalized[2..])
        .map_err(|e| StakingError::malformed(format!("invalid address {address}: {e}")))?;
    if bytes.len() != 32 {
        return Err(StakingError::malformed(format!(
            "invalid address {address}: expected 32 bytes"
        )));
    }
    Ok(normalized)
}

/// Normalizes every address inside a type tag, e.g. `2::sui::SUI` becomes
/// `0x000..002::sui::SUI`. Event payloads report type names without the `0x`
/// prefix, configuration usually carries short addresses.
pub fn normalize_type_tag(type_tag: &str) -> String {
    let normalized: Cow<'_, str> = TYPE_ADDRESS.replace_all(type_tag.trim(), |caps: &Captures| {
        format!("{}{}::", &caps[1], normalize_address(&caps[2]))
    });
    normalized.into_owned()
}

pub fn is_base_currency(asset_type: &str) -> bool {
    normalize_type_tag(asset_type) == normalize_type_tag(BASE_CURRENCY_TYPE)
}

/// Scales a raw on-chain amount by the asset's decimals.
///
/// Returns `None` when the amount exceeds the 96-bit mantissa or the scale
/// exceeds 28 digits.
pub fn to_display_amount(raw: u128, decimals: u8) -> Option<Decimal> {
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, u32::from(decimals)).ok()
}

/// Accepts ledger integers encoded either as decimal strings or JSON numbers.
pub fn deserialize_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
        Raw::Number(number) => number.to_string().parse().map_err(de::Error::custom),
    }
}

/// Serializes a `u128` as a decimal string, the way the ledger reports it.
pub fn serialize_number<S>(value: &u128, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}
