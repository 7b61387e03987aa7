//! Scalar argument validators.
//!
//! Each validator returns the accepted (possibly normalized) value or an
//! [`Error::InvalidArgument`]. Rejections are logged at debug level and never
//! reach the network.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{PortRange, Protocol, MAX_PORT, MIN_PORT};

/// Minimum length of an accepted callback URL.
pub const MIN_URL_LENGTH: usize = 8;

/// Maximum length of a performance report description.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Smallest amount accepted for a wallet top-up.
pub const MIN_AMOUNT: f64 = 1.00;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d{2}$").expect("valid regex"))
}

fn reject<T>(field: &str, reason: impl Into<String>) -> Result<T> {
    let reason = reason.into();
    debug!(field, %reason, "rejected argument");
    Err(Error::InvalidArgument(format!("{field}: {reason}")))
}

/// Validate an identifier-like string.
///
/// All whitespace is stripped; the remainder must not be empty.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for empty or whitespace-only input.
pub fn validate_string(field: &str, input: &str) -> Result<String> {
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return reject(field, "must not be empty");
    }
    Ok(stripped)
}

/// Validate a redirect or webhook URL.
///
/// Whitespace is stripped; the result needs an `http://` or `https://`
/// prefix, at least [`MIN_URL_LENGTH`] characters and a `.` after the first
/// character.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if any rule fails.
pub fn validate_url(field: &str, input: &str) -> Result<String> {
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.len() < MIN_URL_LENGTH {
        return reject(field, format!("Invalid Url! `{input}` is too short"));
    }
    if !(stripped.starts_with("http://") || stripped.starts_with("https://")) {
        return reject(field, format!("Invalid Url! `{input}` must use http or https"));
    }
    match stripped.find('.') {
        Some(dot) if dot >= 1 => Ok(stripped),
        _ => reject(field, format!("Invalid Url! `{input}` has no domain")),
    }
}

/// Validate a monetary amount such as `"13.37"`.
///
/// The whole string must be digits, a dot and exactly two decimals, and the
/// value must be at least [`MIN_AMOUNT`]. The input is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the format or value is rejected.
pub fn validate_amount(input: &str) -> Result<String> {
    if !amount_pattern().is_match(input) {
        return reject("amount", format!("Invalid Amount! `{input}` needs two decimal places"));
    }
    let value: f64 = match input.parse() {
        Ok(value) => value,
        Err(_) => return reject("amount", format!("Invalid Amount! `{input}`")),
    };
    if !value.is_finite() {
        return reject("amount", format!("Invalid Amount! `{input}` is not finite"));
    }
    if value < MIN_AMOUNT {
        return reject("amount", format!("Invalid Amount! `{input}` is below 1.00"));
    }
    Ok(input.to_string())
}

/// Validate a dynamically typed port range object.
///
/// The value must be an object with exactly the keys `from` and `to`, both
/// integers within `1..=65535`, and `from <= to`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the shape or bounds are rejected.
pub fn validate_ports(value: &Value) -> Result<PortRange> {
    let Some(object) = value.as_object() else {
        return reject("ports", "Invalid Ports! expected an object");
    };
    if object.len() != 2 || !object.contains_key("from") || !object.contains_key("to") {
        return reject("ports", "Invalid Ports! expected exactly `from` and `to`");
    }

    let bound = |key: &str| -> Result<u16> {
        let Some(number) = object.get(key).and_then(integral) else {
            return reject("ports", format!("Invalid Ports! `{key}` must be an integer"));
        };
        match u16::try_from(number) {
            Ok(port) if port >= MIN_PORT => Ok(port),
            _ => reject(
                "ports",
                format!("Invalid Ports! Range: {MIN_PORT}-{MAX_PORT}"),
            ),
        }
    };

    let from = bound("from")?;
    let to = bound("to")?;
    PortRange::new(from, to).map_err(|err| {
        debug!(field = "ports", %err, "rejected argument");
        err
    })
}

/// Integer value of a JSON number, accepting floats without a fractional part.
#[allow(clippy::cast_possible_truncation)]
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|number| number.is_finite() && number.fract() == 0.0)
            .map(|number| number as i64)
    })
}

/// Validate a whitelist protocol name.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the name is not in the fixed list.
pub fn validate_protocol(input: &str) -> Result<Protocol> {
    input.parse().map_err(|err: Error| {
        debug!(field = "protocol", %err, "rejected argument");
        err
    })
}

/// Validate a performance report description.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if empty or longer than
/// [`MAX_DESCRIPTION_LENGTH`] characters.
pub fn validate_description(input: &str) -> Result<String> {
    if input.is_empty() {
        return reject("description", "must not be empty");
    }
    if input.chars().count() > MAX_DESCRIPTION_LENGTH {
        return reject(
            "description",
            format!("must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        );
    }
    Ok(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_strips_whitespace() {
        assert_eq!(validate_string("id", " ab c\t1\n").unwrap(), "abc1");
        assert_eq!(validate_string("id", "KU2X").unwrap(), "KU2X");
    }

    #[test]
    fn string_rejects_empty_and_blank() {
        assert!(validate_string("id", "").is_err());
        assert!(validate_string("id", "   \t\n").is_err());
        let err = validate_string("vpsId", " ").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref msg) if msg.starts_with("vpsId")));
    }

    #[test]
    fn url_accepts_http_and_https() {
        assert_eq!(
            validate_url("redirectUrl", "https://example.com/ok").unwrap(),
            "https://example.com/ok"
        );
        assert_eq!(
            validate_url("webhookUrl", " http://a.io ").unwrap(),
            "http://a.io"
        );
    }

    #[test]
    fn url_rejects_bad_input() {
        assert!(validate_url("u", "http://").is_err());
        assert!(validate_url("u", "ftp://example.com").is_err());
        assert!(validate_url("u", "https://localhost").is_err());
        assert!(validate_url("u", "example.com/path").is_err());
        assert!(validate_url("u", "").is_err());
    }

    #[test]
    fn amount_accepts_two_decimal_strings() {
        for amount in ["1.00", "13.37", "10.50", "100.00", "99999.99"] {
            assert_eq!(validate_amount(amount).unwrap(), amount);
        }
    }

    #[test]
    fn amount_rejects_malformed_and_small() {
        for amount in [
            "", "1", "1.0", "1.000", "0.99", "0.00", "abc", "-5.00", "1e3", " 5.00", "x12.34",
            "12.34x", "12.34.56",
        ] {
            assert!(validate_amount(amount).is_err(), "accepted {amount:?}");
        }
    }

    #[test]
    fn ports_accept_valid_ranges() {
        let range = validate_ports(&json!({"from": 1, "to": 65535})).unwrap();
        assert_eq!(range, PortRange { from: 1, to: 65535 });
        let range = validate_ports(&json!({"to": 27015, "from": 27015})).unwrap();
        assert_eq!(range.from, 27015);
    }

    #[test]
    fn ports_accept_integral_floats() {
        let range = validate_ports(&json!({"from": 1.0, "to": 80.0})).unwrap();
        assert_eq!(range, PortRange { from: 1, to: 80 });
        assert!(validate_ports(&json!({"from": 0.0, "to": 80})).is_err());
        assert!(validate_ports(&json!({"from": 1, "to": 65536.0})).is_err());
        assert!(validate_ports(&json!({"from": 1, "to": 1e300})).is_err());
    }

    #[test]
    fn ports_reject_out_of_range_or_inverted() {
        let rejected = [
            json!({"from": 0, "to": 10}),
            json!({"from": 1, "to": 65536}),
            json!({"from": -1, "to": 10}),
            json!({"from": 200, "to": 100}),
            json!({"from": 1.5, "to": 10}),
            json!({"from": "1", "to": 10}),
            json!({"from": 1}),
            json!({"from": 1, "to": 2, "protocol": "rust"}),
            json!({"start": 1, "end": 2}),
            json!([1, 2]),
            json!(null),
        ];
        for value in rejected {
            assert!(validate_ports(&value).is_err(), "accepted {value}");
        }
    }

    #[test]
    fn protocol_accepts_fixed_list() {
        assert_eq!(validate_protocol("teamspeak3").unwrap(), Protocol::Teamspeak3);
        assert_eq!(validate_protocol("other").unwrap(), Protocol::Other);
    }

    #[test]
    fn protocol_rejects_unlisted() {
        assert!(validate_protocol("quake").is_err());
        assert!(validate_protocol("OTHER").is_err());
    }

    #[test]
    fn description_length_limits() {
        assert!(validate_description("23% drop (37/164)").is_ok());
        assert!(validate_description(&"x".repeat(255)).is_ok());
        assert!(validate_description(&"x".repeat(256)).is_err());
        assert!(validate_description("").is_err());
    }
}
