//! Numeric coercion shared by every argument decoder.
//!
//! Clients send quantities in three shapes: JSON numbers, decimal strings and
//! `0x`-prefixed hexadecimal strings. All of them converge here on a single
//! arbitrary precision [`BigInt`], so `123`, `"123"` and `"0x7b"` decode to
//! the same value wherever a number is accepted.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::{Number, Value};

use crate::errors::RpcError;

/// Block height sentinel for the genesis block.
pub const EARLIEST_BLOCK: i64 = 0;
/// Block height sentinel for the current head.
pub const LATEST_BLOCK: i64 = -1;
/// Block height sentinel for the block being assembled.
pub const PENDING_BLOCK: i64 = -2;

/// Largest decimal exponent a JSON number may expand to.
const MAX_DECIMAL_SCALE: i64 = 1024;

/// Coerces a JSON number or numeric string into a [`BigInt`].
///
/// JSON numbers are decoded from their literal digits, so integers wider
/// than `u64` keep every digit. Fractional numbers are truncated toward zero
/// and exponents are applied before truncating.
///
/// # Errors
///
/// Returns `InvalidType(field, "not a number or string")` for other JSON
/// types and `InvalidType(field, "not a valid number")` for strings that are
/// neither decimal nor hexadecimal.
pub fn parse_number(field: &str, value: &Value) -> Result<BigInt, RpcError> {
    match value {
        Value::Number(number) => {
            number_to_bigint(number).ok_or_else(|| RpcError::invalid_type(field, "not a valid number"))
        }
        Value::String(text) => {
            parse_numeric_str(text).ok_or_else(|| RpcError::invalid_type(field, "not a valid number"))
        }
        _ => Err(RpcError::invalid_type(field, "not a number or string")),
    }
}

/// Parses a decimal or `0x`/`0X` hexadecimal string with an optional sign.
///
/// Returns `None` for empty digit runs, stray characters, or a bare `0x`.
#[must_use]
pub fn parse_numeric_str(text: &str) -> Option<BigInt> {
    let (negative, unsigned) = if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    };

    let magnitude = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => parse_digits(hex, 16)?,
        None => parse_digits(unsigned, 10)?,
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Narrows a decoded number to `i64`.
///
/// # Errors
///
/// Returns `InvalidType(field, "out of range")` when the value does not fit.
pub fn to_i64(field: &str, value: &BigInt) -> Result<i64, RpcError> {
    value
        .to_i64()
        .ok_or_else(|| RpcError::invalid_type(field, "out of range"))
}

/// Decodes a block height.
///
/// Accepts everything [`parse_number`] accepts plus the named heights
/// `earliest`, `latest` and `pending`, which map to [`EARLIEST_BLOCK`],
/// [`LATEST_BLOCK`] and [`PENDING_BLOCK`].
///
/// # Errors
///
/// Returns `InvalidType(field, "is not a valid string")` for unrecognised
/// strings, `InvalidType(field, "not a number or string")` for other JSON
/// types, and `InvalidType(field, "out of range")` for heights beyond `i64`.
pub fn parse_block_height(field: &str, value: &Value) -> Result<i64, RpcError> {
    match value {
        Value::Number(_) => to_i64(field, &parse_number(field, value)?),
        Value::String(text) => match text.as_str() {
            "earliest" => Ok(EARLIEST_BLOCK),
            "latest" => Ok(LATEST_BLOCK),
            "pending" => Ok(PENDING_BLOCK),
            other => {
                let height = parse_numeric_str(other)
                    .ok_or_else(|| RpcError::invalid_type(field, "is not a valid string"))?;
                to_i64(field, &height)
            }
        },
        _ => Err(RpcError::invalid_type(field, "not a number or string")),
    }
}

fn number_to_bigint(number: &Number) -> Option<BigInt> {
    let text = number.as_str();
    let (mantissa, exponent) = match text.split_once(|c| c == 'e' || c == 'E') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (text, 0),
    };
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits = format!("{whole}{fraction}");
    let scale = exponent.checked_sub(i64::try_from(fraction.len()).ok()?)?;
    if scale > MAX_DECIMAL_SCALE {
        return None;
    }
    let shift = usize::try_from(scale.unsigned_abs()).ok()?;
    if scale >= 0 {
        digits.push_str(&"0".repeat(shift));
    } else {
        digits.truncate(digits.len().saturating_sub(shift));
    }
    if digits.is_empty() {
        digits.push('0');
    }

    let magnitude = parse_digits(&digits, 10)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_digits(digits: &str, radix: u32) -> Option<BigInt> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::number(json!(123))]
    #[case::decimal(json!("123"))]
    #[case::hex(json!("0x7b"))]
    #[case::upper_hex(json!("0X7B"))]
    #[case::float(json!(123.9))]
    fn all_shapes_converge(#[case] value: Value) {
        assert_eq!(parse_number("n", &value).expect("number"), BigInt::from(123));
    }

    #[test]
    fn json_numbers_beyond_u64_keep_every_digit() {
        let value: Value =
            serde_json::from_str("123456789012345678901234567890").expect("json number");
        let from_number = parse_number("n", &value).expect("number");
        let from_string =
            parse_number("n", &json!("123456789012345678901234567890")).expect("string");
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.to_string(), "123456789012345678901234567890");
    }

    #[rstest]
    #[case::exponent("1.5e3", 1500)]
    #[case::upper_exponent("2E2", 200)]
    #[case::negative_exponent("12345e-2", 123)]
    #[case::below_one("0.75", 0)]
    #[case::negative_fraction("-7.9", -7)]
    #[case::vanishing("5e-30", 0)]
    fn json_numbers_apply_exponent_then_truncate(#[case] text: &str, #[case] expected: i64) {
        let value: Value = serde_json::from_str(text).expect("json number");
        assert_eq!(parse_number("n", &value).expect("number"), BigInt::from(expected));
    }

    #[test]
    fn rejects_runaway_exponents() {
        let value: Value = serde_json::from_str("1e100000").expect("json number");
        let error = parse_number("Price", &value).expect_err("too large");
        assert_eq!(error.to_string(), "invalid type on field Price: not a valid number");
    }

    #[test]
    fn keeps_values_beyond_machine_words() {
        let value = json!("0x10000000000000000000000000000000000");
        let parsed = parse_number("n", &value).expect("number");
        assert_eq!(parsed, BigInt::from(1) << 136_u32);
    }

    #[rstest]
    #[case("-5", -5)]
    #[case("+5", 5)]
    #[case("-0x10", -16)]
    #[case("0", 0)]
    fn accepts_signed_strings(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_numeric_str(input), Some(BigInt::from(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("12a")]
    #[case("0xzz")]
    #[case("--5")]
    #[case(" 5")]
    #[case("1_000")]
    fn rejects_malformed_strings(#[case] input: &str) {
        assert_eq!(parse_numeric_str(input), None);
    }

    #[rstest]
    #[case(json!(true))]
    #[case(json!(null))]
    #[case(json!([1]))]
    #[case(json!({"n": 1}))]
    fn rejects_non_numeric_types(#[case] value: Value) {
        let error = parse_number("Threads", &value).expect_err("not numeric");
        assert!(matches!(
            error,
            RpcError::InvalidType { ref field, ref reason }
                if field == "Threads" && reason == "not a number or string"
        ));
    }

    #[rstest]
    #[case(json!("earliest"), EARLIEST_BLOCK)]
    #[case(json!("latest"), LATEST_BLOCK)]
    #[case(json!("pending"), PENDING_BLOCK)]
    #[case(json!(30000), 30000)]
    #[case(json!("30000"), 30000)]
    #[case(json!("0x7530"), 30000)]
    fn decodes_block_heights(#[case] value: Value, #[case] expected: i64) {
        assert_eq!(parse_block_height("BlockNumber", &value).expect("height"), expected);
    }

    #[test]
    fn rejects_unknown_block_tag() {
        let error = parse_block_height("BlockNumber", &json!("finalized")).expect_err("unknown tag");
        assert_eq!(
            error.to_string(),
            "invalid type on field BlockNumber: is not a valid string"
        );
    }

    #[test]
    fn rejects_heights_beyond_i64() {
        let error = parse_block_height("BlockNumber", &json!("0x10000000000000000"))
            .expect_err("too large");
        assert!(error.to_string().ends_with("out of range"));
    }
}
