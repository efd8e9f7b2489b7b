//! QMK keycode names and display labels.
//!
//! Covers the common keycode set plus the layer keys (MO/TG) that
//! dynamic keymaps typically contain; anything else renders as hex.

pub const KC_NO: u16 = 0x0000;
pub const KC_TRANSPARENT: u16 = 0x0001;
pub const KC_A: u16 = 0x0004;
pub const KC_Z: u16 = 0x001D;
pub const KC_1: u16 = 0x001E;
pub const KC_0: u16 = 0x0027;
pub const KC_F1: u16 = 0x003A;
pub const KC_F12: u16 = 0x0045;

/// Keycode name table, mirroring the QMK names.
static NAMES: &[(u16, &str)] = &[
    (0x0000, "KC_NO"),
    (0x0001, "KC_TRANSPARENT"),
    (0x0028, "KC_ENTER"),
    (0x0029, "KC_ESCAPE"),
    (0x002A, "KC_BACKSPACE"),
    (0x002B, "KC_TAB"),
    (0x002C, "KC_SPACE"),
    (0x002D, "KC_MINUS"),
    (0x002E, "KC_EQUAL"),
    (0x002F, "KC_LEFT_BRACKET"),
    (0x0030, "KC_RIGHT_BRACKET"),
    (0x0031, "KC_BACKSLASH"),
    (0x0033, "KC_SEMICOLON"),
    (0x0034, "KC_QUOTE"),
    (0x0035, "KC_GRAVE"),
    (0x0036, "KC_COMMA"),
    (0x0037, "KC_DOT"),
    (0x0038, "KC_SLASH"),
    (0x0039, "KC_CAPS_LOCK"),
    (0x0046, "KC_PRINT_SCREEN"),
    (0x0047, "KC_SCROLL_LOCK"),
    (0x0048, "KC_PAUSE"),
    (0x0049, "KC_INSERT"),
    (0x004A, "KC_HOME"),
    (0x004B, "KC_PAGE_UP"),
    (0x004C, "KC_DELETE"),
    (0x004D, "KC_END"),
    (0x004E, "KC_PAGE_DOWN"),
    (0x004F, "KC_RIGHT"),
    (0x0050, "KC_LEFT"),
    (0x0051, "KC_DOWN"),
    (0x0052, "KC_UP"),
    (0x00A8, "KC_MUTE"),
    (0x00A9, "KC_VOL_UP"),
    (0x00AA, "KC_VOL_DOWN"),
    (0x00B4, "KC_MEDIA_PLAY_PAUSE"),
    (0x00B5, "KC_MEDIA_NEXT_TRACK"),
    (0x00B6, "KC_MEDIA_PREV_TRACK"),
    (0x00E0, "KC_LEFT_CTRL"),
    (0x00E1, "KC_LEFT_SHIFT"),
    (0x00E2, "KC_LEFT_ALT"),
    (0x00E3, "KC_LEFT_GUI"),
    (0x00E4, "KC_RIGHT_CTRL"),
    (0x00E5, "KC_RIGHT_SHIFT"),
    (0x00E6, "KC_RIGHT_ALT"),
    (0x00E7, "KC_RIGHT_GUI"),
    (0x5220, "MO_0"),
    (0x5221, "MO_1"),
    (0x5222, "MO_2"),
    (0x5223, "MO_3"),
    (0x5240, "TG_0"),
    (0x5241, "TG_1"),
    (0x5242, "TG_2"),
    (0x5243, "TG_3"),
];

/// QMK name for a keycode, if this client knows it.
pub fn name(code: u16) -> Option<&'static str> {
    if let Some(&(_, name)) = NAMES.iter().find(|&&(c, _)| c == code) {
        return Some(name);
    }
    None
}

/// Short display label for keymap dumps.
pub fn label(code: u16) -> String {
    match code {
        KC_NO => String::new(),
        KC_TRANSPARENT => "▽".into(),
        KC_A..=KC_Z => char::from(b'A' + (code - KC_A) as u8).to_string(),
        KC_1..=KC_0 => {
            let digit = (code - KC_1 + 1) % 10;
            digit.to_string()
        }
        KC_F1..=KC_F12 => format!("F{}", code - KC_F1 + 1),
        0x5220..=0x5223 => format!("MO({})", code - 0x5220),
        0x5240..=0x5243 => format!("TG({})", code - 0x5240),
        _ => match name(code) {
            Some(name) => name.trim_start_matches("KC_").to_string(),
            None => format!("0x{code:04X}"),
        },
    }
}

/// Parse a keycode from a QMK name, single character, or number
/// (`0x`-prefixed hex or decimal).
pub fn parse(input: &str) -> Option<u16> {
    let trimmed = input.trim();
    if let Some(hex) = trimmed.strip_prefix("0x").or(trimmed.strip_prefix("0X")) {
        return u16::from_str_radix(hex, 16).ok();
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
        if trimmed.len() == 1 {
            // A single digit names the key, not the code.
            let digit = trimmed.as_bytes()[0] - b'0';
            return Some(if digit == 0 { KC_0 } else { KC_1 + digit as u16 - 1 });
        }
        return trimmed.parse().ok();
    }
    if trimmed.len() == 1 {
        let c = trimmed.chars().next()?.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            return Some(KC_A + (c as u16 - 'A' as u16));
        }
    }
    let upper = trimmed.to_ascii_uppercase().replace(['(', ')'], "_");
    let canonical = upper.trim_end_matches('_');
    if let Some(&(code, _)) = NAMES.iter().find(|(_, name)| {
        *name == canonical || name.trim_start_matches("KC_") == canonical
    }) {
        return Some(code);
    }
    // Computed ranges the name table leaves out: letters, digits, and
    // function keys, with or without the KC_ prefix.
    let bare = canonical.strip_prefix("KC_").unwrap_or(canonical);
    if bare.len() == 1 {
        let c = bare.as_bytes()[0];
        if c.is_ascii_uppercase() {
            return Some(KC_A + (c - b'A') as u16);
        }
        if c.is_ascii_digit() {
            let digit = (c - b'0') as u16;
            return Some(if digit == 0 { KC_0 } else { KC_1 + digit - 1 });
        }
    }
    bare.strip_prefix('F')
        .and_then(|n| n.parse::<u16>().ok())
        .filter(|&n| (1..=12).contains(&n))
        .map(|n| KC_F1 + n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_cover_computed_ranges() {
        assert_eq!(label(KC_A), "A");
        assert_eq!(label(0x001D), "Z");
        assert_eq!(label(KC_1), "1");
        assert_eq!(label(KC_0), "0");
        assert_eq!(label(KC_F12), "F12");
        assert_eq!(label(0x5221), "MO(1)");
        assert_eq!(label(0x0029), "ESCAPE");
        assert_eq!(label(0x1234), "0x1234");
    }

    #[test]
    fn parse_accepts_names_chars_and_numbers() {
        assert_eq!(parse("KC_ESCAPE"), Some(0x0029));
        assert_eq!(parse("escape"), Some(0x0029));
        assert_eq!(parse("a"), Some(KC_A));
        assert_eq!(parse("7"), Some(0x0024));
        assert_eq!(parse("0x5221"), Some(0x5221));
        assert_eq!(parse("F5"), Some(0x003E));
        assert_eq!(parse("MO(2)"), Some(0x5222));
        assert_eq!(parse("bogus"), None);
    }

    #[test]
    fn parse_accepts_prefixed_computed_range_names() {
        assert_eq!(parse("KC_A"), Some(KC_A));
        assert_eq!(parse("kc_z"), Some(0x001D));
        assert_eq!(parse("KC_4"), Some(0x0021));
        assert_eq!(parse("KC_0"), Some(KC_0));
        assert_eq!(parse("KC_F5"), Some(0x003E));
        assert_eq!(parse("KC_F13"), None);
    }
}
