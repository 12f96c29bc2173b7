use crate::error::AgentError;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static WISH_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^LV\.?\s*(\d+)$").unwrap());

static BEST_FLOOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Floor\s*(\d+)").unwrap());

static CLAIMED_FLOOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*F\b").unwrap());

/// OCR text was found but did not carry the expected number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} in '{text}'")]
pub struct ParseError {
    pub text: String,
    pub expected: &'static str,
}

/// Strip one pair of matching single or double quotes
/// `"'Frost Orb'"` → `Frost Orb`; anything else passes through unchanged
pub fn unquote(param: &str) -> &str {
    let bytes = param.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'\'' || bytes[0] == b'"')
    {
        return &param[1..param.len() - 1];
    }
    param
}

/// Derive a sub-query node name: `prefix_qualifier`
pub fn sub_node(prefix: &str, qualifier: &str) -> String {
    format!("{}_{}", prefix, qualifier)
}

/// Split a wish parameter like `Credit,1` into (type, ticket slot)
/// Returns `Ok(None)` for an empty parameter
pub fn parse_wish_param(param: &str) -> Result<Option<(String, String)>, AgentError> {
    let param = unquote(param.trim());
    if param.is_empty() {
        return Ok(None);
    }

    let (wish_type, slot) = param
        .split_once(',')
        .ok_or_else(|| AgentError::MalformedParam(format!("expected 'Type,slot', got '{}'", param)))?;

    let wish_type = wish_type.trim();
    let slot = slot.trim();
    if wish_type.is_empty() || slot.is_empty() {
        return Err(AgentError::MalformedParam(format!(
            "expected 'Type,slot', got '{}'",
            param
        )));
    }

    Ok(Some((wish_type.to_string(), slot.to_string())))
}

/// OCR pattern for the remaining-ticket counter of a slot
/// Slot 1 is usable while 3 tickets remain, slot 2 at 2, slot 3 at 1
pub fn ticket_marker(slot: &str) -> Result<&'static str, AgentError> {
    match slot {
        "1" => Ok("^3"),
        "2" => Ok("^2"),
        "3" => Ok("^1"),
        other => Err(AgentError::MalformedParam(format!(
            "ticket slot must be 1, 2 or 3, got '{}'",
            other
        ))),
    }
}

/// Parse a wish level label: "Lv.55", "LV. 55", "lv55"
/// The whole label must match; "Lv.4O" is a misread, not level 4
pub fn parse_wish_level(text: &str) -> Result<u32, ParseError> {
    capture_number(&WISH_LEVEL, text, "'Lv.<n>'")
}

/// Parse the best-floor marker: "Floor 28"
pub fn parse_best_floor(text: &str) -> Result<u32, ParseError> {
    capture_number(&BEST_FLOOR, text, "'Floor <n>'")
}

/// Parse the claimed-floor marker: "Claimed 25F", falling back to "Floor 25"
pub fn parse_claimed_floor(text: &str) -> Result<u32, ParseError> {
    capture_number(&CLAIMED_FLOOR, text, "'<n>F'")
        .or_else(|_| capture_number(&BEST_FLOOR, text, "'<n>F' or 'Floor <n>'"))
}

fn capture_number(re: &Regex, text: &str, expected: &'static str) -> Result<u32, ParseError> {
    let err = || ParseError {
        text: text.to_string(),
        expected,
    };

    re.captures(text.trim())
        .and_then(|caps| caps.get(1))
        .ok_or_else(err)?
        .as_str()
        .parse::<u32>()
        .map_err(|_| err())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Param handling
    // ============================================================

    #[test]
    fn test_unquote_single_and_double() {
        assert_eq!(unquote("'Frost Orb'"), "Frost Orb");
        assert_eq!(unquote("\"Frost Orb\""), "Frost Orb");
    }

    #[test]
    fn test_unquote_passthrough_and_idempotent() {
        for name in ["Frost Orb", "Deity of Weaving", "x", ""] {
            assert_eq!(unquote(name), name);
            assert_eq!(unquote(unquote(name)), name);
        }
    }

    #[test]
    fn test_unquote_round_trip() {
        for name in ["Shade Of False Dreams", "Potion", "A,1", ""] {
            for quote in ['\'', '"'] {
                let wrapped = format!("{quote}{name}{quote}");
                assert_eq!(unquote(&wrapped), name);
            }
        }
    }

    #[test]
    fn test_unquote_mismatched_quotes() {
        assert_eq!(unquote("'Frost Orb\""), "'Frost Orb\"");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("''"), "");
    }

    #[test]
    fn test_sub_node() {
        assert_eq!(sub_node("SelectBounty", "Frost Orb"), "SelectBounty_Frost Orb");
    }

    #[test]
    fn test_parse_wish_param() {
        let (wish_type, slot) = parse_wish_param("'Credit,1'").unwrap().unwrap();
        assert_eq!(wish_type, "Credit");
        assert_eq!(slot, "1");

        assert_eq!(parse_wish_param("").unwrap(), None);
        assert_eq!(parse_wish_param("''").unwrap(), None);
    }

    #[test]
    fn test_parse_wish_param_malformed() {
        let err = parse_wish_param("Credit").unwrap_err();
        assert!(err.is_config_error());
        assert!(parse_wish_param("Credit,").is_err());
    }

    #[test]
    fn test_ticket_marker() {
        assert_eq!(ticket_marker("1").unwrap(), "^3");
        assert_eq!(ticket_marker("2").unwrap(), "^2");
        assert_eq!(ticket_marker("3").unwrap(), "^1");
        assert!(ticket_marker("4").unwrap_err().is_config_error());
    }

    // ============================================================
    // Numeric markers
    // ============================================================

    #[test]
    fn test_parse_wish_level() {
        assert_eq!(parse_wish_level("Lv.55").unwrap(), 55);
        assert_eq!(parse_wish_level("LV. 126").unwrap(), 126);
        assert_eq!(parse_wish_level(" lv40 ").unwrap(), 40);
    }

    #[test]
    fn test_parse_wish_level_invalid() {
        let err = parse_wish_level("Lv.").unwrap_err();
        assert_eq!(err.text, "Lv.");
        assert!(parse_wish_level("Credit").is_err());
        assert!(parse_wish_level("").is_err());
    }

    #[test]
    fn test_parse_wish_level_rejects_partial_numbers() {
        for text in ["Lv.4O", "Lv.5x", "Lv.55 Lv.60", "Stage Lv.40", "Lv.99999999999"] {
            let err = parse_wish_level(text).unwrap_err();
            assert_eq!(err.text, text);
        }
        assert_eq!(parse_wish_level("Lv.12345").unwrap(), 12345);
    }

    #[test]
    fn test_parse_best_floor() {
        assert_eq!(parse_best_floor("Floor 28").unwrap(), 28);
        assert_eq!(parse_best_floor("Best: floor28").unwrap(), 28);
        assert!(parse_best_floor("Floor X").is_err());
    }

    #[test]
    fn test_parse_claimed_floor() {
        assert_eq!(parse_claimed_floor("Claimed 25F").unwrap(), 25);
        assert_eq!(parse_claimed_floor("25 F").unwrap(), 25);
        assert_eq!(parse_claimed_floor("Claimed: Floor 25").unwrap(), 25);
        assert!(parse_claimed_floor("Claimed").is_err());
    }
}
