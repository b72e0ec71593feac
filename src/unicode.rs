//! Offset conversion between UTF-16 code units and Unicode scalar values.
//!
//! Browsers report selection offsets in UTF-16 code units while the engine
//! counts `char`s. The two agree for Latin and Thaana, and differ once a
//! field holds characters outside the Basic Multilingual Plane.

/// Converts a UTF-16 offset into `s` to a char offset. An offset that falls
/// inside a surrogate pair rounds up to the following char; offsets past the
/// end clamp to the char length.
pub fn utf16_to_char_offset(s: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.chars().enumerate() {
        if units >= utf16_offset {
            return i;
        }
        units += c.len_utf16();
    }
    s.chars().count()
}

/// Converts a char offset into `s` to a UTF-16 offset, clamping past the end.
pub fn char_to_utf16_offset(s: &str, char_offset: usize) -> usize {
    s.chars().take(char_offset).map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmp_offsets_agree() {
        let s = "ހަކ abc";
        for i in 0..=s.chars().count() {
            assert_eq!(utf16_to_char_offset(s, i), i);
            assert_eq!(char_to_utf16_offset(s, i), i);
        }
    }

    #[test]
    fn test_astral_offsets() {
        // U+1F600 takes two UTF-16 units.
        let s = "a😀b";
        assert_eq!(char_to_utf16_offset(s, 2), 3);
        assert_eq!(char_to_utf16_offset(s, 3), 4);
        assert_eq!(utf16_to_char_offset(s, 3), 2);
        assert_eq!(utf16_to_char_offset(s, 2), 2);
        assert_eq!(utf16_to_char_offset(s, 4), 3);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(utf16_to_char_offset("ab", 10), 2);
        assert_eq!(char_to_utf16_offset("ab", 10), 2);
        assert_eq!(utf16_to_char_offset("", 0), 0);
    }
}
