//! Hint intake parsing.
//!
//! A hinter types the clue and the number of related keywords in one line,
//! e.g. `りんご5`, `りんご５`, `りんご五` or `3りんご`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHint {
    pub text: String,
    /// `None` when no numeral was found; the amount must be asked for.
    pub count: Option<u32>,
}

const ZENKAKU: [char; 10] = ['０', '１', '２', '３', '４', '５', '６', '７', '８', '９'];
const KANJI: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Map an ASCII, full-width or kanji digit to its value.
pub fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    ZENKAKU
        .iter()
        .position(|&z| z == c)
        .or_else(|| KANJI.iter().position(|&k| k == c))
        .map(|d| d as u32)
}

/// Parse a run of numeral characters.
pub fn parse_count(chars: &[char]) -> Option<u32> {
    if chars.is_empty() {
        return None;
    }
    chars.iter().try_fold(0u32, |acc, &c| {
        let d = digit_value(c)?;
        acc.checked_mul(10)?.checked_add(d)
    })
}

/// Split one numeral character off an end of `chars`. The first character that
/// parses fixes the count, so `ねこ12` is the hint `ねこ1` for two keywords.
fn split_numeral(chars: &[char], from_end: bool) -> Option<(String, u32)> {
    if chars.len() < 2 {
        return None;
    }
    let (numeral, rest) = if from_end {
        (&chars[chars.len() - 1..], &chars[..chars.len() - 1])
    } else {
        (&chars[..1], &chars[1..])
    };
    let count = parse_count(numeral)?;
    let text: String = rest.iter().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| (text.to_owned(), count))
}

pub fn parse_hint(raw: &str) -> ParsedHint {
    let trimmed = raw.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    match split_numeral(&chars, true).or_else(|| split_numeral(&chars, false)) {
        Some((text, count)) => ParsedHint {
            text,
            count: Some(count),
        },
        None => ParsedHint {
            text: trimmed.to_owned(),
            count: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(text: &str, count: Option<u32>) -> ParsedHint {
        ParsedHint {
            text: text.to_owned(),
            count,
        }
    }

    #[test]
    fn trailing_ascii_digit() {
        assert_eq!(parse_hint("りんご5"), hint("りんご", Some(5)));
    }

    #[test]
    fn no_numeral_keeps_whole_text() {
        assert_eq!(parse_hint("りんご"), hint("りんご", None));
    }

    #[test]
    fn localized_numerals() {
        assert_eq!(parse_hint("りんご５"), hint("りんご", Some(5)));
        assert_eq!(parse_hint("りんご三"), hint("りんご", Some(3)));
        assert_eq!(parse_hint("ねこ１２"), hint("ねこ１", Some(2)));
    }

    #[test]
    fn first_trailing_numeral_fixes_the_count() {
        assert_eq!(parse_hint("ねこ12"), hint("ねこ1", Some(2)));
        assert_eq!(parse_hint("  ねこ 2 "), hint("ねこ", Some(2)));
    }

    #[test]
    fn prepended_numeral() {
        assert_eq!(parse_hint("3りんご"), hint("りんご", Some(3)));
    }

    #[test]
    fn bare_number_splits_its_last_digit() {
        assert_eq!(parse_hint("42"), hint("4", Some(2)));
    }

    #[test]
    fn lone_numeral_is_text_without_a_count() {
        assert_eq!(parse_hint("7"), hint("7", None));
        assert_eq!(parse_hint(" "), hint("", None));
    }
}
