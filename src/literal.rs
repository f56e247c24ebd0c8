// Hexadecimal literal handling for the command-line layer.
//
// Values are read the way hardware test vectors are usually written:
// base 16, optional 0x prefix, underscores allowed as group separators.

use crate::errors::{ConvertError, ConvertResult};

pub fn parse_literal(text: &str) -> ConvertResult<u128> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    if digits.is_empty() {
        return Err(ConvertError::InvalidArgument(format!(
            "empty literal {:?}",
            text
        )));
    }
    u128::from_str_radix(digits, 16).map_err(|_| {
        ConvertError::InvalidArgument(format!("not a hexadecimal literal: {:?}", text))
    })
}

pub fn to_hex(value: u128) -> String {
    format!("{:#x}", value)
}
