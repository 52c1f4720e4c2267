//! Hex colour helpers for gift tags.

use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

/// Pattern every stored tag colour must match.
pub const HEX_COLOR_PATTERN: &str = "^#[0-9A-F]{6}$";

fn hex_color_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HEX_COLOR_PATTERN).ok()).as_ref()
}

/// Returns `true` for upper-case `#RRGGBB` colours.
pub fn is_hex_color(value: &str) -> bool {
    hex_color_regex().is_some_and(|re| re.is_match(value))
}

/// A random colour in `#RRGGBB` form.
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (r, g, b): (u8, u8, u8) = (rng.gen(), rng.gen(), rng.gen());
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// Parses `#RRGGBB`, `RRGGBB` or the `#RGB` shorthand, in either case.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let digits = value.trim().trim_start_matches('#');
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };

    let channel = |at: usize| u8::from_str_radix(expanded.get(at..at + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Text colour that stays readable on the `background` colour.
///
/// Uses perceived luminance: light backgrounds get `"black"`, dark ones
/// `"white"`. Unparseable input is treated as a light background.
pub fn contrast_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex_color(background) else {
        return "black";
    };
    let luminance =
        (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
    if luminance > 0.5 {
        "black"
    } else {
        "white"
    }
}
