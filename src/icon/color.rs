//! # 颜色解析
//!
//! 支持 `#RGB` / `#ARGB` / `#RRGGBB` / `#AARRGGBB`、少量颜色名，以及整数形式的
//! ARGB 值（十进制，可为负的 32 位有符号值；或 `0x` 前缀十六进制）。
//! 无法解析时返回完全透明，合成流程不会因为颜色字符串而失败。

use image::Rgba;

/// 完全透明。
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// 解析颜色字符串，失败时回退为透明。
pub fn parse_color(value: &str) -> Rgba<u8> {
    match try_parse_color(value) {
        Some(color) => color,
        None => {
            log::warn!("⚠️ 无法解析颜色 '{}'，回退为透明背景", value);
            TRANSPARENT
        }
    }
}

/// 解析颜色字符串，无法识别时返回 `None`。
pub fn try_parse_color(value: &str) -> Option<Rgba<u8>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(argb) = named_color(&trimmed.to_ascii_lowercase()) {
        return Some(argb_to_rgba(argb));
    }

    parse_raw_integer(trimmed)
}

fn named_color(name: &str) -> Option<u32> {
    let argb = match name {
        "red" => 0xFFFF_0000,
        "blue" => 0xFF00_00FF,
        "green" => 0xFF00_FF00,
        "black" => 0xFF00_0000,
        "white" => 0xFFFF_FFFF,
        "gray" | "grey" => 0xFF88_8888,
        "yellow" => 0xFFFF_FF00,
        "cyan" => 0xFF00_FFFF,
        "magenta" => 0xFFFF_00FF,
        "transparent" => 0x0000_0000,
        _ => return None,
    };
    Some(argb)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    // 顺序为 A, R, G, B
    let [a, r, g, b] = match hex.len() {
        3 => [0xFF, nibble(0)?, nibble(1)?, nibble(2)?],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [0xFF, byte(0)?, byte(2)?, byte(4)?],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };

    Some(Rgba([r, g, b, a]))
}

fn parse_raw_integer(value: &str) -> Option<Rgba<u8>> {
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        return u32::from_str_radix(hex, 16).ok().map(argb_to_rgba);
    }

    let parsed = value.parse::<i64>().ok()?;
    if parsed < i32::MIN as i64 || parsed > u32::MAX as i64 {
        return None;
    }
    Some(argb_to_rgba(parsed as u32))
}

fn argb_to_rgba(argb: u32) -> Rgba<u8> {
    let [a, r, g, b] = argb.to_be_bytes();
    Rgba([r, g, b, a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_all_hex_forms() {
        assert_eq!(parse_color("#FF0000"), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#80FF0000"), Rgba([255, 0, 0, 0x80]));
        assert_eq!(parse_color("#f00"), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#8f00"), Rgba([255, 0, 0, 0x88]));
    }

    #[test]
    fn parses_named_colors_case_insensitively() {
        assert_eq!(parse_color("Red"), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("grey"), parse_color("GRAY"));
        assert_eq!(parse_color("transparent"), TRANSPARENT);
        assert_eq!(parse_color(" cyan "), Rgba([0, 255, 255, 255]));
    }

    #[test]
    fn parses_raw_integers_as_argb() {
        assert_eq!(parse_color("-65536"), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("4294901760"), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("0xFF00FF00"), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn unparsable_colors_fall_back_to_transparent() {
        assert_eq!(parse_color("not-a-color"), TRANSPARENT);
        assert_eq!(parse_color("#12345"), TRANSPARENT);
        assert_eq!(parse_color("#GG0000"), TRANSPARENT);
        assert_eq!(parse_color(""), TRANSPARENT);
        assert_eq!(parse_color("99999999999"), TRANSPARENT);
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(input in ".*") {
            let _ = parse_color(&input);
        }

        #[test]
        fn rrggbb_is_always_opaque(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = parse_color(&format!("#{:02X}{:02x}{:02X}", r, g, b));
            prop_assert_eq!(color, Rgba([r, g, b, 255]));
        }
    }
}
