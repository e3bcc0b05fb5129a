//! Keymap for a 4x12 Planck board used with hosts set to either the JIS or the US layout.
//!
//! The JIS base layer expects the host to treat the board as a JIS keyboard with Control and
//! Command swapped on macOS, and 無変換/変換 mapped to IME off/on on Windows. Hosts that can
//! only do US (iOS) use the US base layer instead; switch between them from Adjust.

use layerlock_common::{
    feedback::{LedPattern, SoundCue},
    keycodes::{jis, usage as u},
    LayerId,
};

use crate::{
    config::{Config, ConfigError},
    event::KeyId,
    keymap::{Action, DualRole, Emit, HoldRole, Keymap, LayerFeedback, LayerMap, LayerTarget},
};

pub const JIS: LayerId = LayerId(0);
pub const US: LayerId = LayerId(1);
pub const LOWER: LayerId = LayerId(2);
pub const RAISE: LayerId = LayerId(3);
pub const RAISE_US: LayerId = LayerId(4);
pub const FUNC1: LayerId = LayerId(5);
pub const FUNC2: LayerId = LayerId(6);
pub const ADJUST: LayerId = LayerId(7);

pub const PRIORITY: [LayerId; 8] = [JIS, US, LOWER, RAISE, RAISE_US, FUNC1, FUNC2, ADJUST];

macro_rules! codes {
    ($($code:expr),+) => {
        Action::EmitCodes(&[$($code),+])
    };
}

const fn k(row: u8, col: u8) -> KeyId {
    KeyId::matrix(row, col)
}

const XXX: Action = Action::NoOp;
const ___: Action = Action::Transparent;

/// Raise for the current base layout.
const RAISE_FOR: &[(LayerId, LayerId)] = &[(JIS, RAISE), (US, RAISE_US)];

const FN2_TAB: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::TAB]),
    hold: HoldRole::Layer(LayerTarget::Fixed(FUNC2)),
    double_tap: None,
});
const FN1_ESC: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::ESCAPE]),
    hold: HoldRole::Layer(LayerTarget::Fixed(FUNC1)),
    double_tap: None,
});
/// `;`, or `:` with shift lifted.
const WN_SCLN: Action = Action::Tap(Emit::shift_aware(&[jis::SEMICOLON], &[jis::COLON], true));
/// Tap for `'`, or `"` when another shift is down; hold for right shift.
const SFT_JQT: Action = Action::DualRole(DualRole {
    tap: Emit::shift_aware(&[jis::QUOTE], &[jis::DOUBLE_QUOTE], false),
    hold: HoldRole::Codes(&[u::RSFT]),
    double_tap: None,
});
const RSFT_QT: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::QUOTE]),
    hold: HoldRole::Codes(&[u::RSFT]),
    double_tap: None,
});
/// Left shift; a double tap locks Lower.
const TAP_L: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::LSFT]),
    hold: HoldRole::Codes(&[u::LSFT]),
    double_tap: Some(LayerTarget::Fixed(LOWER)),
});
const CTL_ZH: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[jis::ZENKAKU_HANKAKU]),
    hold: HoldRole::Codes(&[u::LGUI]),
    double_tap: None,
});
/// 英数 on macOS and 無変換 on Windows; hold for Lower.
const M_EMHL: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::MUHENKAN, u::LANG2]),
    hold: HoldRole::Layer(LayerTarget::Fixed(LOWER)),
    double_tap: None,
});
/// かな on macOS and 変換 on Windows; hold for Raise.
const M_KHKR: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::HENKAN, u::LANG1]),
    hold: HoldRole::Layer(LayerTarget::Fixed(RAISE)),
    double_tap: None,
});
const M_KHRU: Action = Action::DualRole(DualRole {
    tap: Emit::codes(&[u::HENKAN, u::LANG1]),
    hold: HoldRole::Layer(LayerTarget::Fixed(RAISE_US)),
    double_tap: None,
});
const ADJ: Action = Action::Momentary(LayerTarget::Fixed(ADJUST));
const TGL_LOW: Action = Action::ToggleLayer(LayerTarget::Fixed(LOWER));
const TGL_RIS: Action = Action::ToggleLayer(LayerTarget::FollowDefault(RAISE_FOR));
const WN_CAPS: Action = Action::Cue(&[u::LSFT, u::CAPS_LOCK], SoundCue::CapsLock);
/// Backlight steps are applied by the host; the key only clicks.
const BL_STEP: Action = Action::Cue(&[], SoundCue::Push);

const MY_VOLD: Action = codes!(u::LALT, u::LSFT, u::VOLUME_DOWN);
const MY_VOLU: Action = codes!(u::LALT, u::LSFT, u::VOLUME_UP);
const MUTE: Action = codes!(u::MUTE);

static JIS_MAP: [(KeyId, Action); 48] = [
    (k(0, 0), FN2_TAB),
    (k(0, 1), codes!(u::Q)),
    (k(0, 2), codes!(u::W)),
    (k(0, 3), codes!(u::E)),
    (k(0, 4), codes!(u::R)),
    (k(0, 5), codes!(u::T)),
    (k(0, 6), codes!(u::Y)),
    (k(0, 7), codes!(u::U)),
    (k(0, 8), codes!(u::I)),
    (k(0, 9), codes!(u::O)),
    (k(0, 10), codes!(u::P)),
    (k(0, 11), codes!(u::BACKSPACE)),
    (k(1, 0), FN1_ESC),
    (k(1, 1), codes!(u::A)),
    (k(1, 2), codes!(u::S)),
    (k(1, 3), codes!(u::D)),
    (k(1, 4), codes!(u::F)),
    (k(1, 5), codes!(u::G)),
    (k(1, 6), codes!(u::H)),
    (k(1, 7), codes!(u::J)),
    (k(1, 8), codes!(u::K)),
    (k(1, 9), codes!(u::L)),
    (k(1, 10), WN_SCLN),
    (k(1, 11), codes!(u::ENTER)),
    (k(2, 0), TAP_L),
    (k(2, 1), codes!(u::Z)),
    (k(2, 2), codes!(u::X)),
    (k(2, 3), codes!(u::C)),
    (k(2, 4), codes!(u::V)),
    (k(2, 5), codes!(u::B)),
    (k(2, 6), codes!(u::N)),
    (k(2, 7), codes!(u::M)),
    (k(2, 8), codes!(u::COMMA)),
    (k(2, 9), codes!(u::DOT)),
    (k(2, 10), codes!(u::SLASH)),
    (k(2, 11), SFT_JQT),
    (k(3, 0), CTL_ZH),
    (k(3, 1), ADJ),
    (k(3, 2), codes!(u::LALT)),
    (k(3, 3), codes!(u::LCTL)),
    (k(3, 4), M_EMHL),
    (k(3, 5), codes!(u::SPACE)),
    (k(3, 6), codes!(u::SPACE)),
    (k(3, 7), M_KHKR),
    (k(3, 8), codes!(u::LEFT)),
    (k(3, 9), codes!(u::DOWN)),
    (k(3, 10), codes!(u::UP)),
    (k(3, 11), codes!(u::RIGHT)),
];

static US_MAP: [(KeyId, Action); 48] = [
    (k(0, 0), FN2_TAB),
    (k(0, 1), codes!(u::Q)),
    (k(0, 2), codes!(u::W)),
    (k(0, 3), codes!(u::E)),
    (k(0, 4), codes!(u::R)),
    (k(0, 5), codes!(u::T)),
    (k(0, 6), codes!(u::Y)),
    (k(0, 7), codes!(u::U)),
    (k(0, 8), codes!(u::I)),
    (k(0, 9), codes!(u::O)),
    (k(0, 10), codes!(u::P)),
    (k(0, 11), codes!(u::BACKSPACE)),
    (k(1, 0), FN1_ESC),
    (k(1, 1), codes!(u::A)),
    (k(1, 2), codes!(u::S)),
    (k(1, 3), codes!(u::D)),
    (k(1, 4), codes!(u::F)),
    (k(1, 5), codes!(u::G)),
    (k(1, 6), codes!(u::H)),
    (k(1, 7), codes!(u::J)),
    (k(1, 8), codes!(u::K)),
    (k(1, 9), codes!(u::L)),
    (k(1, 10), codes!(u::SEMICOLON)),
    (k(1, 11), codes!(u::ENTER)),
    (k(2, 0), codes!(u::LSFT)),
    (k(2, 1), codes!(u::Z)),
    (k(2, 2), codes!(u::X)),
    (k(2, 3), codes!(u::C)),
    (k(2, 4), codes!(u::V)),
    (k(2, 5), codes!(u::B)),
    (k(2, 6), codes!(u::N)),
    (k(2, 7), codes!(u::M)),
    (k(2, 8), codes!(u::COMMA)),
    (k(2, 9), codes!(u::DOT)),
    (k(2, 10), codes!(u::SLASH)),
    (k(2, 11), RSFT_QT),
    (k(3, 0), CTL_ZH),
    (k(3, 1), ADJ),
    (k(3, 2), codes!(u::LALT)),
    (k(3, 3), codes!(u::LGUI)),
    (k(3, 4), M_EMHL),
    (k(3, 5), codes!(u::SPACE)),
    (k(3, 6), codes!(u::SPACE)),
    (k(3, 7), M_KHRU),
    (k(3, 8), codes!(u::LEFT)),
    (k(3, 9), codes!(u::DOWN)),
    (k(3, 10), codes!(u::UP)),
    (k(3, 11), codes!(u::RIGHT)),
];

// media transport keys live on the consumer page and are left as NoOp
static LOWER_MAP: [(KeyId, Action); 36] = [
    (k(0, 0), ___),
    (k(0, 1), codes!(u::N1)),
    (k(0, 2), codes!(u::N2)),
    (k(0, 3), codes!(u::N3)),
    (k(0, 4), codes!(u::N4)),
    (k(0, 5), codes!(u::N5)),
    (k(0, 6), codes!(u::N6)),
    (k(0, 7), codes!(u::N7)),
    (k(0, 8), codes!(u::N8)),
    (k(0, 9), codes!(u::N9)),
    (k(0, 10), codes!(u::N0)),
    (k(0, 11), codes!(u::BACKSPACE)),
    (k(1, 0), FN1_ESC),
    (k(1, 1), XXX),
    (k(1, 2), MY_VOLD),
    (k(1, 3), MY_VOLU),
    (k(1, 4), MUTE),
    (k(1, 5), codes!(u::DOT)),
    (k(1, 6), codes!(u::KP_MINUS)),
    (k(1, 7), codes!(u::N4)),
    (k(1, 8), codes!(u::N5)),
    (k(1, 9), codes!(u::N6)),
    (k(1, 10), codes!(u::KP_ASTERISK)),
    (k(2, 1), XXX),
    (k(2, 2), XXX),
    (k(2, 3), XXX),
    (k(2, 4), XXX),
    (k(2, 5), codes!(u::COMMA)),
    (k(2, 6), codes!(u::KP_PLUS)),
    (k(2, 7), codes!(u::N1)),
    (k(2, 8), codes!(u::N2)),
    (k(2, 9), codes!(u::N3)),
    (k(2, 10), codes!(u::KP_SLASH)),
    (k(2, 11), codes!(u::KP_EQUAL)),
    (k(3, 7), codes!(u::N0)),
    (k(3, 11), ___),
];

static RAISE_MAP: [(KeyId, Action); 34] = [
    (k(0, 1), codes!(u::LSFT, u::N1)),
    (k(0, 2), codes!(jis::AT)),
    (k(0, 3), codes!(u::LSFT, u::N3)),
    (k(0, 4), codes!(u::LSFT, u::N4)),
    (k(0, 5), codes!(u::LSFT, u::N5)),
    (k(0, 6), codes!(jis::CIRCUMFLEX)),
    (k(0, 7), codes!(u::LSFT, u::N6)),
    (k(0, 8), codes!(u::LSFT, jis::COLON)),
    (k(0, 9), codes!(u::LSFT, u::N8)),
    (k(0, 10), codes!(u::LSFT, u::N9)),
    (k(0, 11), codes!(u::BACKSPACE)),
    (k(1, 1), XXX),
    (k(1, 2), MY_VOLD),
    (k(1, 3), MY_VOLU),
    (k(1, 4), MUTE),
    (k(1, 5), codes!(jis::YEN)),
    (k(1, 6), codes!(u::LSFT, jis::AT)),
    (k(1, 7), codes!(u::MINUS)),
    (k(1, 8), codes!(u::LSFT, u::MINUS)),
    (k(1, 9), codes!(jis::LEFT_BRACKET)),
    (k(1, 10), codes!(jis::RIGHT_BRACKET)),
    (k(2, 0), WN_CAPS),
    (k(2, 1), XXX),
    (k(2, 2), XXX),
    (k(2, 3), XXX),
    (k(2, 4), XXX),
    (k(2, 5), codes!(u::LSFT, jis::YEN)),
    (k(2, 6), codes!(u::LSFT, jis::CIRCUMFLEX)),
    (k(2, 7), codes!(u::LSFT, jis::RO)),
    (k(2, 8), codes!(u::LSFT, jis::SEMICOLON)),
    (k(2, 9), codes!(u::LSFT, jis::LEFT_BRACKET)),
    (k(2, 10), codes!(u::LSFT, jis::RIGHT_BRACKET)),
    (k(2, 11), WN_CAPS),
    (k(3, 4), XXX),
];

static RAISE_US_MAP: [(KeyId, Action); 34] = [
    (k(0, 1), codes!(u::LSFT, u::N1)),
    (k(0, 2), codes!(u::LSFT, u::N2)),
    (k(0, 3), codes!(u::LSFT, u::N3)),
    (k(0, 4), codes!(u::LSFT, u::N4)),
    (k(0, 5), codes!(u::LSFT, u::N5)),
    (k(0, 6), codes!(u::LSFT, u::N6)),
    (k(0, 7), codes!(u::LSFT, u::N7)),
    (k(0, 8), codes!(u::LSFT, u::N8)),
    (k(0, 9), codes!(u::LSFT, u::N9)),
    (k(0, 10), codes!(u::LSFT, u::N0)),
    (k(0, 11), codes!(u::BACKSPACE)),
    (k(1, 1), XXX),
    (k(1, 2), MY_VOLD),
    (k(1, 3), MY_VOLU),
    (k(1, 4), MUTE),
    (k(1, 5), codes!(u::BACKSLASH)),
    (k(1, 6), codes!(u::GRAVE)),
    (k(1, 7), codes!(u::MINUS)),
    (k(1, 8), codes!(u::EQUAL)),
    (k(1, 9), codes!(u::LEFT_BRACKET)),
    (k(1, 10), codes!(u::RIGHT_BRACKET)),
    (k(2, 0), WN_CAPS),
    (k(2, 1), XXX),
    (k(2, 2), XXX),
    (k(2, 3), XXX),
    (k(2, 4), XXX),
    (k(2, 5), codes!(u::LSFT, u::BACKSLASH)),
    (k(2, 6), codes!(u::LSFT, u::GRAVE)),
    (k(2, 7), codes!(u::LSFT, u::MINUS)),
    (k(2, 8), codes!(u::LSFT, u::EQUAL)),
    (k(2, 9), codes!(u::LSFT, u::LEFT_BRACKET)),
    (k(2, 10), codes!(u::LSFT, u::RIGHT_BRACKET)),
    (k(2, 11), WN_CAPS),
    (k(3, 4), XXX),
];

static FUNC1_MAP: [(KeyId, Action); 31] = [
    (k(0, 0), codes!(u::LALT, u::PRINT_SCREEN)),
    (k(0, 1), XXX),
    (k(0, 2), XXX),
    (k(0, 3), XXX),
    (k(0, 4), XXX),
    (k(0, 5), XXX),
    (k(0, 6), codes!(u::END)),
    (k(0, 7), codes!(u::PAGE_DOWN)),
    (k(0, 8), codes!(u::PAGE_UP)),
    (k(0, 9), codes!(u::HOME)),
    (k(0, 10), XXX),
    (k(0, 11), codes!(u::DELETE)),
    (k(1, 5), codes!(u::LCTL, u::F1)),
    (k(1, 6), codes!(u::LEFT)),
    (k(1, 7), codes!(u::DOWN)),
    (k(1, 8), codes!(u::UP)),
    (k(1, 9), codes!(u::RIGHT)),
    (k(1, 10), XXX),
    (k(2, 5), codes!(u::LGUI, u::LSFT, u::TAB)),
    (k(2, 6), codes!(u::LGUI, u::TAB)),
    (k(2, 7), XXX),
    (k(2, 8), XXX),
    (k(2, 9), XXX),
    (k(2, 10), XXX),
    (k(2, 11), XXX),
    (k(3, 4), TGL_LOW),
    (k(3, 7), TGL_RIS),
    (k(3, 8), codes!(u::END)),
    (k(3, 9), codes!(u::PAGE_DOWN)),
    (k(3, 10), codes!(u::PAGE_UP)),
    (k(3, 11), codes!(u::HOME)),
];

// unlisted keys fall through to the base layer
static FUNC2_MAP: [(KeyId, Action); 3] = [
    (
        k(0, 6),
        Action::RunMacro(&[
            u::T, u::H, u::I, u::S, u::SPACE, u::I, u::S, u::SPACE, u::A, u::SPACE, u::T, u::E,
            u::S, u::T, u::DOT,
        ]),
    ),
    (
        k(0, 7),
        Action::RunMacro(&[
            u::K, u::O, u::R, u::E, u::H, u::A, u::T, u::E, u::S, u::U, u::T, u::O, u::D, u::E,
            u::S, u::U, u::DOT,
        ]),
    ),
    (
        k(0, 8),
        Action::RunMacro(&[
            u::S, u::U, u::K, u::I, u::N, u::A, u::M, u::O, u::J, u::I, u::W, u::O, u::I, u::R,
            u::E, u::T, u::E, u::K, u::U, u::D, u::A, u::S, u::A, u::I, u::DOT,
        ]),
    ),
];

static ADJUST_MAP: [(KeyId, Action); 8] = [
    (k(0, 0), codes!(u::LCTL, u::LALT, u::DELETE)),
    (k(1, 0), codes!(u::POWER)),
    (k(1, 7), Action::SetDefaultLayer(JIS)),
    (k(1, 8), Action::SetDefaultLayer(US)),
    (k(2, 7), BL_STEP),
    (k(2, 8), BL_STEP),
    (k(2, 9), BL_STEP),
    (k(2, 10), BL_STEP),
];

static LAYERS: [LayerMap; 8] = [
    LayerMap::new(JIS, &JIS_MAP),
    LayerMap::new(US, &US_MAP),
    LayerMap::new(LOWER, &LOWER_MAP),
    LayerMap::new(RAISE, &RAISE_MAP),
    LayerMap::new(RAISE_US, &RAISE_US_MAP),
    LayerMap::new(FUNC1, &FUNC1_MAP),
    LayerMap::new(FUNC2, &FUNC2_MAP),
    LayerMap::new(ADJUST, &ADJUST_MAP),
];

static FEEDBACK: [LayerFeedback; 6] = [
    LayerFeedback::led(LOWER, LedPattern::new(3, true)),
    LayerFeedback::led(RAISE, LedPattern::new(1, false)),
    LayerFeedback::led(RAISE_US, LedPattern::new(1, false)),
    LayerFeedback::led(FUNC1, LedPattern::new(4, true)),
    LayerFeedback::led(FUNC2, LedPattern::new(2, true)),
    LayerFeedback::hold_cues(ADJUST, SoundCue::HoldOn, SoundCue::HoldOff),
];

pub fn keymap() -> Result<Keymap, ConfigError> {
    Keymap::new(&PRIORITY, &LAYERS, &FEEDBACK)
}

/// JIS default, 135 ms tapping term, every capability on.
pub fn config() -> Config {
    Config::new(JIS)
}

#[cfg(test)]
#[path = "planck_test.rs"]
mod test;
