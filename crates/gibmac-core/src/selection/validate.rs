// ── Input validation ──

use thiserror::Error;

use crate::model::MLB_LEN;

const BOARD_PREFIX: &str = "Mac-";
const BOARD_HEX_LENGTHS: [usize; 2] = [8, 16];

/// Why a line of user input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{choice} is not between 1 and {count}")]
    OutOfRange { choice: usize, count: usize },

    #[error("board ids need 8 or 16 hex digits after 'Mac-', got {len}")]
    BoardIdLength { len: usize },

    #[error("board ids may only contain hexadecimal digits")]
    BoardIdNotHex,

    #[error("MLBs may only contain letters and digits")]
    MlbNotAlphanumeric,
}

/// Parse a 1-based menu choice into a 0-based index below `count`.
pub fn parse_menu_index(input: &str, count: usize) -> Result<usize, InvalidInput> {
    let trimmed = input.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| InvalidInput::NotANumber(trimmed.to_owned()))?;
    if choice == 0 || choice > count {
        return Err(InvalidInput::OutOfRange { choice, count });
    }
    Ok(choice - 1)
}

/// Normalize a board id to `Mac-` + uppercase hex.
///
/// The `Mac-` prefix is optional and matched case-insensitively; the hex
/// part must be 8 or 16 digits.
pub fn parse_board_id(input: &str) -> Result<String, InvalidInput> {
    let hex = input
        .get(..BOARD_PREFIX.len())
        .filter(|head| head.eq_ignore_ascii_case(BOARD_PREFIX))
        .map_or(input, |_| &input[BOARD_PREFIX.len()..]);
    let hex = hex.to_uppercase();

    let len = hex.chars().count();
    if !BOARD_HEX_LENGTHS.contains(&len) {
        return Err(InvalidInput::BoardIdLength { len });
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvalidInput::BoardIdNotHex);
    }
    Ok(format!("{BOARD_PREFIX}{hex}"))
}

/// Normalize an MLB: uppercase, left-padded with `0` to 17 characters.
///
/// Longer values pass through untouched rather than being truncated.
pub fn parse_mlb(input: &str) -> Result<String, InvalidInput> {
    if input.is_empty() || !input.chars().all(char::is_alphanumeric) {
        return Err(InvalidInput::MlbNotAlphanumeric);
    }
    let upper = input.to_uppercase();
    Ok(format!("{upper:0>MLB_LEN$}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_index_is_one_based() {
        assert_eq!(parse_menu_index("1", 3), Ok(0));
        assert_eq!(parse_menu_index(" 3 ", 3), Ok(2));
    }

    #[test]
    fn menu_index_rejects_out_of_range() {
        assert_eq!(
            parse_menu_index("0", 3),
            Err(InvalidInput::OutOfRange { choice: 0, count: 3 })
        );
        assert_eq!(
            parse_menu_index("4", 3),
            Err(InvalidInput::OutOfRange { choice: 4, count: 3 })
        );
    }

    #[test]
    fn menu_index_rejects_non_numeric() {
        assert_eq!(
            parse_menu_index("two", 3),
            Err(InvalidInput::NotANumber("two".into()))
        );
        assert!(parse_menu_index("-1", 3).is_err());
        assert!(parse_menu_index("1.5", 3).is_err());
    }

    #[test]
    fn board_id_accepts_sixteen_hex_with_prefix() {
        assert_eq!(
            parse_board_id("Mac-1E7BA9F00D307329"),
            Ok("Mac-1E7BA9F00D307329".into())
        );
    }

    #[test]
    fn board_id_accepts_eight_hex_without_prefix() {
        assert_eq!(parse_board_id("a1B2c3D4"), Ok("Mac-A1B2C3D4".into()));
    }

    #[test]
    fn board_id_prefix_is_case_insensitive() {
        assert_eq!(parse_board_id("MAC-a1b2c3d4"), Ok("Mac-A1B2C3D4".into()));
        assert_eq!(parse_board_id("mac-a1b2c3d4"), Ok("Mac-A1B2C3D4".into()));
    }

    #[test]
    fn board_id_rejects_non_hex() {
        assert_eq!(
            parse_board_id("Mac-XYZ12345"),
            Err(InvalidInput::BoardIdNotHex)
        );
    }

    #[test]
    fn board_id_rejects_wrong_length() {
        assert_eq!(
            parse_board_id("Mac-123"),
            Err(InvalidInput::BoardIdLength { len: 3 })
        );
        assert_eq!(
            parse_board_id("Mac-"),
            Err(InvalidInput::BoardIdLength { len: 0 })
        );
        assert!(parse_board_id("Mac-123456789").is_err());
    }

    #[test]
    fn mlb_is_padded_to_seventeen() {
        assert_eq!(parse_mlb("abc123"), Ok("00000000000ABC123".into()));
        assert_eq!(parse_mlb("abc123").map(|m| m.len()), Ok(MLB_LEN));
    }

    #[test]
    fn mlb_at_full_width_is_unchanged() {
        assert_eq!(
            parse_mlb("c02123456789abcde"),
            Ok("C02123456789ABCDE".into())
        );
    }

    #[test]
    fn mlb_longer_than_width_is_not_truncated() {
        assert_eq!(
            parse_mlb("C02123456789ABCDEFG"),
            Ok("C02123456789ABCDEFG".into())
        );
    }

    #[test]
    fn mlb_rejects_punctuation_and_empty() {
        assert_eq!(parse_mlb("abc-123"), Err(InvalidInput::MlbNotAlphanumeric));
        assert_eq!(parse_mlb(""), Err(InvalidInput::MlbNotAlphanumeric));
        assert_eq!(parse_mlb("abc 123"), Err(InvalidInput::MlbNotAlphanumeric));
    }
}
