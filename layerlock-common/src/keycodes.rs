//! USB HID keyboard usage ids (usage page 0x07) used by layerlock bindings.
//!
//! Only the usages that carry meaning for a JIS/US dual layout are named; any other usage can
//! still be bound by its raw value.

pub mod key_range {
    pub const BASIC_MIN: u16 = 0x04;
    pub const BASIC_MAX: u16 = 0xa4;
    pub const MODIFIER_MIN: u16 = 0xe0;
    pub const MODIFIER_MAX: u16 = 0xe7;

    pub fn is_modifier(code: u16) -> bool {
        (MODIFIER_MIN..=MODIFIER_MAX).contains(&code)
    }

    /// Bit of `code` in a HID modifier byte. Zero when `code` is not a modifier.
    ///
    /// ```
    /// use layerlock_common::keycodes::{key_range::modifier_bit, usage};
    /// assert_eq!(modifier_bit(usage::LSFT), 0b10);
    /// assert_eq!(modifier_bit(usage::A), 0);
    /// ```
    pub fn modifier_bit(code: u16) -> u8 {
        if is_modifier(code) {
            1 << (code - MODIFIER_MIN)
        } else {
            0
        }
    }
}

pub mod usage {
    pub const NO: u16 = 0x00;

    pub const A: u16 = 0x04;
    pub const B: u16 = 0x05;
    pub const C: u16 = 0x06;
    pub const D: u16 = 0x07;
    pub const E: u16 = 0x08;
    pub const F: u16 = 0x09;
    pub const G: u16 = 0x0a;
    pub const H: u16 = 0x0b;
    pub const I: u16 = 0x0c;
    pub const J: u16 = 0x0d;
    pub const K: u16 = 0x0e;
    pub const L: u16 = 0x0f;
    pub const M: u16 = 0x10;
    pub const N: u16 = 0x11;
    pub const O: u16 = 0x12;
    pub const P: u16 = 0x13;
    pub const Q: u16 = 0x14;
    pub const R: u16 = 0x15;
    pub const S: u16 = 0x16;
    pub const T: u16 = 0x17;
    pub const U: u16 = 0x18;
    pub const V: u16 = 0x19;
    pub const W: u16 = 0x1a;
    pub const X: u16 = 0x1b;
    pub const Y: u16 = 0x1c;
    pub const Z: u16 = 0x1d;

    pub const N1: u16 = 0x1e;
    pub const N2: u16 = 0x1f;
    pub const N3: u16 = 0x20;
    pub const N4: u16 = 0x21;
    pub const N5: u16 = 0x22;
    pub const N6: u16 = 0x23;
    pub const N7: u16 = 0x24;
    pub const N8: u16 = 0x25;
    pub const N9: u16 = 0x26;
    pub const N0: u16 = 0x27;

    pub const ENTER: u16 = 0x28;
    pub const ESCAPE: u16 = 0x29;
    pub const BACKSPACE: u16 = 0x2a;
    pub const TAB: u16 = 0x2b;
    pub const SPACE: u16 = 0x2c;
    pub const MINUS: u16 = 0x2d;
    pub const EQUAL: u16 = 0x2e;
    pub const LEFT_BRACKET: u16 = 0x2f;
    pub const RIGHT_BRACKET: u16 = 0x30;
    pub const BACKSLASH: u16 = 0x31;
    pub const NON_US_HASH: u16 = 0x32;
    pub const SEMICOLON: u16 = 0x33;
    pub const QUOTE: u16 = 0x34;
    pub const GRAVE: u16 = 0x35;
    pub const COMMA: u16 = 0x36;
    pub const DOT: u16 = 0x37;
    pub const SLASH: u16 = 0x38;
    pub const CAPS_LOCK: u16 = 0x39;

    pub const F1: u16 = 0x3a;
    pub const PRINT_SCREEN: u16 = 0x46;
    pub const HOME: u16 = 0x4a;
    pub const PAGE_UP: u16 = 0x4b;
    pub const DELETE: u16 = 0x4c;
    pub const END: u16 = 0x4d;
    pub const PAGE_DOWN: u16 = 0x4e;
    pub const RIGHT: u16 = 0x4f;
    pub const LEFT: u16 = 0x50;
    pub const DOWN: u16 = 0x51;
    pub const UP: u16 = 0x52;

    pub const KP_SLASH: u16 = 0x54;
    pub const KP_ASTERISK: u16 = 0x55;
    pub const KP_MINUS: u16 = 0x56;
    pub const KP_PLUS: u16 = 0x57;
    pub const POWER: u16 = 0x66;
    pub const KP_EQUAL: u16 = 0x67;
    pub const MUTE: u16 = 0x7f;
    pub const VOLUME_UP: u16 = 0x80;
    pub const VOLUME_DOWN: u16 = 0x81;

    /// International1: ろ, `\` and `_` on JIS.
    pub const INTERNATIONAL1: u16 = 0x87;
    /// International3: ¥ and `|` on JIS.
    pub const INTERNATIONAL3: u16 = 0x89;

    /// International4: 変換 on Windows.
    pub const HENKAN: u16 = 0x8a;
    /// International5: 無変換 on Windows.
    pub const MUHENKAN: u16 = 0x8b;
    /// LANG1: かな on macOS.
    pub const LANG1: u16 = 0x90;
    /// LANG2: 英数 on macOS.
    pub const LANG2: u16 = 0x91;

    pub const LCTL: u16 = 0xe0;
    pub const LSFT: u16 = 0xe1;
    pub const LALT: u16 = 0xe2;
    pub const LGUI: u16 = 0xe3;
    pub const RCTL: u16 = 0xe4;
    pub const RSFT: u16 = 0xe5;
    pub const RALT: u16 = 0xe6;
    pub const RGUI: u16 = 0xe7;
}

/// Usages as a host set to the JIS layout interprets them.
pub mod jis {
    use super::usage;

    pub const SEMICOLON: u16 = usage::SEMICOLON;
    /// On a JIS board the key right of `;` produces `:`.
    pub const COLON: u16 = usage::QUOTE;
    /// Shift+2 on JIS.
    pub const DOUBLE_QUOTE: u16 = usage::N2;
    /// Shift+7 on JIS.
    pub const QUOTE: u16 = usage::N7;
    /// 半角/全角
    pub const ZENKAKU_HANKAKU: u16 = usage::GRAVE;
    pub const AT: u16 = usage::LEFT_BRACKET;
    pub const CIRCUMFLEX: u16 = usage::EQUAL;
    pub const LEFT_BRACKET: u16 = usage::RIGHT_BRACKET;
    pub const RIGHT_BRACKET: u16 = usage::NON_US_HASH;
    pub const YEN: u16 = usage::INTERNATIONAL3;
    pub const RO: u16 = usage::INTERNATIONAL1;
}

pub const SHIFT_MASK: u8 = (1 << (usage::LSFT - key_range::MODIFIER_MIN))
    | (1 << (usage::RSFT - key_range::MODIFIER_MIN));
