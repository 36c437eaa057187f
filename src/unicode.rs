//! Typing characters given as 4-hex-digit code point groups.
//!
//! `"011156F2C11A"` types U+0111 U+56F2 U+C11A. Without a hex string, random
//! groups from the Basic Multilingual Plane are generated instead.

use rand::Rng;

use crate::routine::{Routine, Step};

/// Random groups generated when no hex string is given.
pub const DEFAULT_BLOCKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnicodeError {
    #[error("Invalid hex string length {0}: must be a multiple of 4")]
    InvalidLength(usize),
}

/// Split `hex` into upper-cased 4-character groups.
pub fn parse_groups(hex: &str) -> Result<Vec<String>, UnicodeError> {
    let chars: Vec<char> = hex.trim().to_uppercase().chars().collect();
    if chars.len() % 4 != 0 {
        return Err(UnicodeError::InvalidLength(chars.len()));
    }
    Ok(chars
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect())
}

/// `blocks` random groups, never in the surrogate range.
pub fn random_groups<R: Rng>(rng: &mut R, blocks: usize) -> Vec<String> {
    let mut groups = Vec::with_capacity(blocks);
    while groups.len() < blocks {
        let cp: u32 = rng.gen_range(0..=0xFFFF);
        if (0xD800..=0xDFFF).contains(&cp) {
            continue;
        }
        groups.push(format!("{cp:04X}"));
    }
    groups
}

/// Character for one group.
///
/// U+0000 becomes a space so consumers never see a NUL. Groups that are not
/// hex or name no valid scalar value become U+FFFD.
pub fn decode_group(group: &str) -> char {
    if group.is_empty() || !group.chars().all(|c| c.is_ascii_hexdigit()) {
        return char::REPLACEMENT_CHARACTER;
    }
    match u32::from_str_radix(group, 16) {
        Ok(0) => ' ',
        Ok(cp) => char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER),
        Err(_) => char::REPLACEMENT_CHARACTER,
    }
}

pub fn decode(groups: &[String]) -> String {
    groups.iter().map(|group| decode_group(group)).collect()
}

/// Types `text` in one go.
pub fn routine(text: &str) -> Routine {
    Routine::new("unicode", vec![Step::Text(text.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_groups() {
        assert_eq!(
            parse_groups(" 011156f2c11a\n").unwrap(),
            vec!["0111", "56F2", "C11A"]
        );
        assert_eq!(parse_groups("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_parse_groups_rejects_partial_group() {
        assert_eq!(parse_groups("01115"), Err(UnicodeError::InvalidLength(5)));
    }

    #[test]
    fn test_decode() {
        let groups = parse_groups("011156F2C11A").unwrap();
        assert_eq!(decode(&groups), "\u{0111}\u{56F2}\u{C11A}");
    }

    #[test]
    fn test_decode_special_groups() {
        assert_eq!(decode_group("0000"), ' ');
        assert_eq!(decode_group("D800"), char::REPLACEMENT_CHARACTER);
        assert_eq!(decode_group("ZZZZ"), char::REPLACEMENT_CHARACTER);
        assert_eq!(decode_group("+01A"), char::REPLACEMENT_CHARACTER);
        assert_eq!(decode_group("0041"), 'A');
    }

    #[test]
    fn test_random_groups_skip_surrogates() {
        let mut rng = StdRng::seed_from_u64(5);
        let groups = random_groups(&mut rng, 500);
        assert_eq!(groups.len(), 500);
        for group in &groups {
            assert_eq!(group.len(), 4);
            let cp = u32::from_str_radix(group, 16).unwrap();
            assert!(!(0xD800..=0xDFFF).contains(&cp));
        }
    }

    #[test]
    fn test_routine_types_text() {
        let routine = routine("ab");
        assert_eq!(routine.steps, vec![Step::Text("ab".to_string())]);
    }
}
