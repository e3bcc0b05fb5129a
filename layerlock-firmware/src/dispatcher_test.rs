use layerlock_common::keycodes::usage;

use crate::{
    keymap::{LayerFeedback, LayerMap, LayerTarget},
    tap_hold::TapHoldConfig,
};

use super::*;

extern crate std;
use std::vec::Vec;

const BASE: LayerId = LayerId(0);
const US: LayerId = LayerId(1);
const LOWER: LayerId = LayerId(2);
const RAISE: LayerId = LayerId(3);
const ADJUST: LayerId = LayerId(7);

const A_KEY: KeyId = KeyId::matrix(0, 0);
const SHIFT: KeyId = KeyId::matrix(0, 1);
const LT_LOWER: KeyId = KeyId::matrix(0, 2);
const SFT_QT: KeyId = KeyId::matrix(0, 3);
const TD_RAISE: KeyId = KeyId::matrix(0, 4);
const SCLN: KeyId = KeyId::matrix(0, 5);
const TGL_LOWER: KeyId = KeyId::matrix(0, 6);
const TGL_BASE: KeyId = KeyId::matrix(0, 7);
const ADJ: KeyId = KeyId::matrix(0, 8);
const MAC: KeyId = KeyId::matrix(0, 9);
const CAPS: KeyId = KeyId::matrix(0, 10);
const SHIFT2: KeyId = KeyId::matrix(1, 1);
const UNBOUND: KeyId = KeyId::matrix(3, 3);

static BASE_MAP: [(KeyId, Action); 12] = [
    (A_KEY, Action::EmitCodes(&[usage::A])),
    (SHIFT, Action::EmitCodes(&[usage::LSFT])),
    (SHIFT2, Action::EmitCodes(&[usage::LSFT])),
    (
        LT_LOWER,
        Action::DualRole(DualRole {
            tap: Emit::codes(&[usage::ESCAPE]),
            hold: HoldRole::Layer(LayerTarget::Fixed(LOWER)),
            double_tap: None,
        }),
    ),
    (
        SFT_QT,
        Action::DualRole(DualRole {
            tap: Emit::shift_aware(&[usage::N7], &[usage::N2], false),
            hold: HoldRole::Codes(&[usage::RSFT]),
            double_tap: None,
        }),
    ),
    (
        TD_RAISE,
        Action::DualRole(DualRole {
            tap: Emit::codes(&[usage::TAB]),
            hold: HoldRole::Layer(LayerTarget::Fixed(RAISE)),
            double_tap: Some(LayerTarget::Fixed(RAISE)),
        }),
    ),
    (
        SCLN,
        Action::Tap(Emit::shift_aware(&[usage::SEMICOLON], &[usage::QUOTE], true)),
    ),
    (TGL_LOWER, Action::ToggleLayer(LayerTarget::Fixed(LOWER))),
    (TGL_BASE, Action::ToggleLayer(LayerTarget::Fixed(BASE))),
    (ADJ, Action::Momentary(LayerTarget::Fixed(ADJUST))),
    (MAC, Action::RunMacro(&[usage::H, usage::I])),
    (CAPS, Action::Cue(&[usage::CAPS_LOCK], SoundCue::CapsLock)),
];
static US_MAP: [(KeyId, Action); 1] = [(A_KEY, Action::EmitCodes(&[usage::B]))];
static LOWER_MAP: [(KeyId, Action); 1] = [(A_KEY, Action::EmitCodes(&[usage::N1]))];
static ADJUST_MAP: [(KeyId, Action); 2] = [
    (A_KEY, Action::SetDefaultLayer(US)),
    (SCLN, Action::SetDefaultLayer(BASE)),
];
static LAYERS: [LayerMap; 4] = [
    LayerMap::new(BASE, &BASE_MAP),
    LayerMap::new(US, &US_MAP),
    LayerMap::new(LOWER, &LOWER_MAP),
    LayerMap::new(ADJUST, &ADJUST_MAP),
];
static FEEDBACK: [LayerFeedback; 3] = [
    LayerFeedback::led(LOWER, LedPattern::new(3, true)),
    LayerFeedback::led(RAISE, LedPattern::new(1, false)),
    LayerFeedback::hold_cues(ADJUST, SoundCue::HoldOn, SoundCue::HoldOff),
];

const LOWER_LED: LedRequest = LedRequest::on(LedPattern::new(3, true));
const RAISE_LED: LedRequest = LedRequest::on(LedPattern::new(1, false));

fn keymap() -> Keymap {
    Keymap::new(&[BASE, US, LOWER, RAISE, ADJUST], &LAYERS, &FEEDBACK).unwrap()
}

#[derive(Default)]
struct Hid(Vec<HidEvent>);

impl HidSink for Hid {
    fn report(&mut self, event: HidEvent) {
        self.0.push(event);
    }
}

impl Hid {
    fn take(&mut self) -> Vec<HidEvent> {
        core::mem::take(&mut self.0)
    }
}

#[derive(Default)]
struct Lights {
    sounds: Vec<SoundCue>,
    leds: Vec<LedRequest>,
}

impl FeedbackSink for Lights {
    fn play(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    fn backlight(&mut self, request: LedRequest) {
        self.leds.push(request);
    }
}

#[derive(Default)]
struct Store {
    layer: Option<LayerId>,
    loads: usize,
    saves: usize,
}

impl LayerStore for Store {
    fn load(&mut self) -> Option<LayerId> {
        self.loads += 1;
        self.layer
    }

    fn save(&mut self, layer: LayerId) {
        self.saves += 1;
        self.layer = Some(layer);
    }
}

type TestDispatcher<'k> = Dispatcher<'k, Hid, Lights, Store, 8>;

fn dispatcher(keymap: &Keymap) -> TestDispatcher<'_> {
    Dispatcher::new(
        keymap,
        Config::new(BASE),
        Hid::default(),
        Lights::default(),
        Store::default(),
    )
    .unwrap()
}

fn press<H: HidSink, F: FeedbackSink, S: LayerStore, const K: usize>(
    d: &mut Dispatcher<'_, H, F, S, K>,
    key: KeyId,
    ms: u64,
) -> Result<Outcome, Misuse> {
    d.key_event(KeyEvent::press(key, Instant::from_millis(ms)))
}

fn release<H: HidSink, F: FeedbackSink, S: LayerStore, const K: usize>(
    d: &mut Dispatcher<'_, H, F, S, K>,
    key: KeyId,
    ms: u64,
) -> Result<Outcome, Misuse> {
    d.key_event(KeyEvent::release(key, Instant::from_millis(ms)))
}

use HidEvent::{Press, Release};

#[test]
fn emit_codes_follow_the_key() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    let outcome = press(&mut d, A_KEY, 0).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Idle);
    assert_eq!(outcome.action, Some(Action::EmitCodes(&[usage::A])));
    assert_eq!(d.hid_mut().take(), [Press(usage::A)]);

    release(&mut d, A_KEY, 500).unwrap();
    assert_eq!(d.hid_mut().take(), [Release(usage::A)]);
}

#[test]
fn second_press_releases_the_first() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, A_KEY, 0).unwrap();
    press(&mut d, A_KEY, 10).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::A), Release(usage::A), Press(usage::A)]
    );

    release(&mut d, A_KEY, 20).unwrap();
    assert_eq!(d.hid_mut().take(), [Release(usage::A)]);
    assert_eq!(
        release(&mut d, A_KEY, 30),
        Err(Misuse::UnmatchedRelease(A_KEY))
    );
}

#[test]
fn unbound_key_is_silent() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    let outcome = press(&mut d, UNBOUND, 0).unwrap();
    assert_eq!(outcome.action, None);
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    assert_eq!(release(&mut d, UNBOUND, 10).unwrap().action, None);
    assert!(d.hid().0.is_empty());
}

#[test]
fn unmatched_release() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    assert_eq!(
        release(&mut d, A_KEY, 0),
        Err(Misuse::UnmatchedRelease(A_KEY))
    );
    assert!(d.hid().0.is_empty());
    assert_eq!(*d.layers(), LayerState::new(BASE));
}

#[test]
fn layer_tap_emits_on_short_release() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    let outcome = press(&mut d, LT_LOWER, 0).unwrap();
    assert!(d.layers().is_momentary(LOWER));
    assert_eq!(outcome.feedback, FeedbackEvent::led(LOWER_LED));
    assert!(d.hid().0.is_empty());

    let outcome = release(&mut d, LT_LOWER, 100).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Tap);
    assert_eq!(outcome.feedback, FeedbackEvent::led(LedRequest::OFF));
    assert!(!d.layers().is_on(LOWER));
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::ESCAPE), Release(usage::ESCAPE)]
    );
    assert_eq!(d.feedback_sink().leds, [LOWER_LED, LedRequest::OFF]);
}

#[test]
fn layer_hold_switches_bindings() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, LT_LOWER, 0).unwrap();
    press(&mut d, A_KEY, 200).unwrap();
    release(&mut d, A_KEY, 250).unwrap();

    let outcome = release(&mut d, LT_LOWER, 300).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Hold);
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::N1), Release(usage::N1)]
    );
}

#[test]
fn release_uses_binding_from_press() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, LT_LOWER, 0).unwrap();
    press(&mut d, A_KEY, 200).unwrap();
    release(&mut d, LT_LOWER, 300).unwrap();
    release(&mut d, A_KEY, 350).unwrap();

    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::N1), Release(usage::N1)]
    );
}

#[test]
fn interrupting_press_forces_hold() {
    let keymap = keymap();
    let config = Config::new(BASE).with_tap_hold(TapHoldConfig::new(135, true).unwrap());
    let mut d: TestDispatcher =
        Dispatcher::new(&keymap, config, Hid::default(), Lights::default(), Store::default())
            .unwrap();

    press(&mut d, LT_LOWER, 0).unwrap();
    press(&mut d, A_KEY, 20).unwrap();
    release(&mut d, A_KEY, 30).unwrap();

    let outcome = release(&mut d, LT_LOWER, 60).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Hold);
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::N1), Release(usage::N1)]
    );
}

#[test]
fn without_interrupt_a_quick_roll_still_taps() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, LT_LOWER, 0).unwrap();
    press(&mut d, A_KEY, 20).unwrap();
    release(&mut d, A_KEY, 30).unwrap();

    assert_eq!(
        release(&mut d, LT_LOWER, 60).unwrap().gesture,
        GestureResult::Tap
    );
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::N1),
            Release(usage::N1),
            Press(usage::ESCAPE),
            Release(usage::ESCAPE)
        ]
    );
}

#[test]
fn mod_tap_emits_before_releasing_hold_codes() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, SFT_QT, 0).unwrap();
    release(&mut d, SFT_QT, 50).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::RSFT),
            Press(usage::N7),
            Release(usage::N7),
            Release(usage::RSFT)
        ]
    );

    press(&mut d, SHIFT, 1000).unwrap();
    press(&mut d, SFT_QT, 1010).unwrap();
    release(&mut d, SFT_QT, 1050).unwrap();
    release(&mut d, SHIFT, 1100).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::LSFT),
            Press(usage::RSFT),
            Press(usage::N2),
            Release(usage::N2),
            Release(usage::RSFT),
            Release(usage::LSFT)
        ]
    );
}

#[test]
fn mod_tap_hold_only_sends_modifier() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, SFT_QT, 0).unwrap();
    press(&mut d, A_KEY, 200).unwrap();
    release(&mut d, A_KEY, 210).unwrap();
    assert_eq!(
        release(&mut d, SFT_QT, 300).unwrap().gesture,
        GestureResult::Hold
    );
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::RSFT),
            Press(usage::A),
            Release(usage::A),
            Release(usage::RSFT)
        ]
    );
}

#[test]
fn shift_aware_tap_suspends_shift() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, SCLN, 0).unwrap();
    release(&mut d, SCLN, 10).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::SEMICOLON), Release(usage::SEMICOLON)]
    );

    press(&mut d, SHIFT, 100).unwrap();
    press(&mut d, SCLN, 110).unwrap();
    release(&mut d, SCLN, 120).unwrap();
    release(&mut d, SHIFT, 130).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::LSFT),
            Release(usage::LSFT),
            Press(usage::QUOTE),
            Release(usage::QUOTE),
            Press(usage::LSFT),
            Release(usage::LSFT)
        ]
    );
}

#[test]
fn modifiers_are_counted() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, SHIFT, 0).unwrap();
    press(&mut d, SHIFT2, 10).unwrap();
    release(&mut d, SHIFT, 20).unwrap();
    assert_eq!(d.hid_mut().take(), [Press(usage::LSFT)]);

    release(&mut d, SHIFT2, 30).unwrap();
    assert_eq!(d.hid_mut().take(), [Release(usage::LSFT)]);
}

#[test]
fn toggle_lock_feedback() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    let outcome = press(&mut d, TGL_LOWER, 0).unwrap();
    assert_eq!(
        outcome.feedback,
        FeedbackEvent {
            sound: Some(SoundCue::LayerLockOn),
            led: Some(LOWER_LED),
        }
    );
    assert!(d.layers().is_locked(LOWER));
    assert_eq!(
        release(&mut d, TGL_LOWER, 10).unwrap().feedback,
        FeedbackEvent::NONE
    );

    let outcome = press(&mut d, TGL_LOWER, 20).unwrap();
    assert_eq!(
        outcome.feedback,
        FeedbackEvent {
            sound: Some(SoundCue::LayerLockOff),
            led: Some(LedRequest::OFF),
        }
    );
    assert!(!d.layers().is_on(LOWER));
    assert_eq!(
        d.feedback_sink().sounds,
        [SoundCue::LayerLockOn, SoundCue::LayerLockOff]
    );
}

#[test]
fn toggling_default_is_reported_and_ignored() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    assert_eq!(
        press(&mut d, TGL_BASE, 0),
        Err(Misuse::DefaultLayerToggle(BASE))
    );
    assert_eq!(*d.layers(), LayerState::new(BASE));
    assert!(d.feedback_sink().sounds.is_empty());

    // release is swallowed and later events still work
    assert!(release(&mut d, TGL_BASE, 10).is_ok());
    press(&mut d, A_KEY, 20).unwrap();
    assert_eq!(d.hid_mut().take(), [Press(usage::A)]);
}

#[test]
fn double_tap_locks_layer() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, TD_RAISE, 0).unwrap();
    let first = release(&mut d, TD_RAISE, 50).unwrap();
    assert_eq!(first.gesture, GestureResult::Tap);
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::TAB), Release(usage::TAB)]
    );

    press(&mut d, TD_RAISE, 100).unwrap();
    let second = release(&mut d, TD_RAISE, 150).unwrap();
    assert_eq!(second.gesture, GestureResult::DoubleTap);
    assert_eq!(
        second.feedback,
        FeedbackEvent {
            sound: Some(SoundCue::LayerLockOn),
            led: Some(RAISE_LED),
        }
    );
    assert!(d.hid().0.is_empty());
    assert!(d.layers().is_locked(RAISE));
    assert!(!d.layers().is_momentary(RAISE));
}

#[test]
fn hold_key_releases_its_own_lock() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, TGL_LOWER, 0).unwrap();
    release(&mut d, TGL_LOWER, 10).unwrap();
    assert!(d.layers().is_locked(LOWER));

    let outcome = press(&mut d, LT_LOWER, 1000).unwrap();
    assert_eq!(
        outcome.feedback,
        FeedbackEvent {
            sound: Some(SoundCue::LayerLockOff),
            led: Some(LedRequest::OFF),
        }
    );
    assert!(!d.layers().is_on(LOWER));

    let outcome = release(&mut d, LT_LOWER, 1050).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Idle);
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    assert!(d.hid().0.is_empty());
}

#[test]
fn tap_after_double_tap_keeps_the_lock() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, TD_RAISE, 0).unwrap();
    release(&mut d, TD_RAISE, 20).unwrap();
    press(&mut d, TD_RAISE, 40).unwrap();
    release(&mut d, TD_RAISE, 60).unwrap();
    assert!(d.layers().is_locked(RAISE));
    d.hid_mut().take();
    d.feedback_sink_mut().sounds.clear();

    let outcome = press(&mut d, TD_RAISE, 80).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    let outcome = release(&mut d, TD_RAISE, 100).unwrap();
    assert_eq!(outcome.gesture, GestureResult::Hold);
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);

    assert!(d.layers().is_locked(RAISE));
    assert!(!d.layers().is_momentary(RAISE));
    assert!(d.hid().0.is_empty());
    assert!(d.feedback_sink().sounds.is_empty());

    // a later press still releases the lock
    let outcome = press(&mut d, TD_RAISE, 1000).unwrap();
    assert_eq!(outcome.feedback.sound, Some(SoundCue::LayerLockOff));
    assert!(!d.layers().is_on(RAISE));
}

#[test]
fn hold_led_only_when_nothing_locked() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, TD_RAISE, 0).unwrap();
    release(&mut d, TD_RAISE, 10).unwrap();
    press(&mut d, TD_RAISE, 20).unwrap();
    release(&mut d, TD_RAISE, 30).unwrap();
    assert!(d.layers().is_locked(RAISE));

    let outcome = press(&mut d, LT_LOWER, 1000).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    let outcome = release(&mut d, LT_LOWER, 1500).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    assert!(d.layers().is_locked(RAISE));
}

#[test]
fn tap_dance_capability_off() {
    let keymap = keymap();
    let config = Config::new(BASE).with_capabilities(Capabilities {
        tap_dance: false,
        ..Capabilities::ALL
    });
    let mut d: TestDispatcher =
        Dispatcher::new(&keymap, config, Hid::default(), Lights::default(), Store::default())
            .unwrap();

    press(&mut d, TD_RAISE, 0).unwrap();
    release(&mut d, TD_RAISE, 50).unwrap();
    press(&mut d, TD_RAISE, 100).unwrap();
    let second = release(&mut d, TD_RAISE, 150).unwrap();

    assert_eq!(second.gesture, GestureResult::Tap);
    assert!(!d.layers().is_locked(RAISE));
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::TAB),
            Release(usage::TAB),
            Press(usage::TAB),
            Release(usage::TAB)
        ]
    );
}

#[test]
fn feedback_is_gated_by_capabilities() {
    let keymap = keymap();
    let config = Config::new(BASE).with_capabilities(Capabilities {
        audio: false,
        backlight: false,
        ..Capabilities::ALL
    });
    let mut d: TestDispatcher =
        Dispatcher::new(&keymap, config, Hid::default(), Lights::default(), Store::default())
            .unwrap();

    let outcome = press(&mut d, TGL_LOWER, 0).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::NONE);
    assert!(d.layers().is_locked(LOWER));
    assert!(d.feedback_sink().sounds.is_empty());
    assert!(d.feedback_sink().leds.is_empty());
}

#[test]
fn momentary_hold_cues() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    let outcome = press(&mut d, ADJ, 0).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::sound(SoundCue::HoldOn));
    assert!(d.layers().is_momentary(ADJUST));

    let outcome = release(&mut d, ADJ, 400).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::sound(SoundCue::HoldOff));
    assert!(!d.layers().is_on(ADJUST));
}

#[test]
fn set_default_layer_resets_and_persists() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, TGL_LOWER, 0).unwrap();
    release(&mut d, TGL_LOWER, 10).unwrap();
    press(&mut d, ADJ, 100).unwrap();

    let outcome = press(&mut d, A_KEY, 200).unwrap();
    assert_eq!(outcome.action, Some(Action::SetDefaultLayer(US)));
    assert_eq!(outcome.feedback, FeedbackEvent::led(LedRequest::OFF));
    assert_eq!(d.layers().default_layer(), US);
    assert!(d.layers().locked().is_empty());
    assert!(d.layers().momentary().is_empty());
    assert_eq!(d.store().layer, Some(US));
    assert_eq!(d.store().saves, 1);

    release(&mut d, A_KEY, 250).unwrap();
    release(&mut d, ADJ, 300).unwrap();
    assert!(d.hid().0.is_empty());

    press(&mut d, A_KEY, 400).unwrap();
    assert_eq!(d.hid_mut().take(), [Press(usage::B)]);
}

#[test]
fn stored_default_is_restored() {
    let keymap = keymap();
    let store = Store {
        layer: Some(US),
        ..Default::default()
    };
    let d: TestDispatcher =
        Dispatcher::new(&keymap, Config::new(BASE), Hid::default(), Lights::default(), store)
            .unwrap();
    assert_eq!(d.layers().default_layer(), US);

    let store = Store {
        layer: Some(LayerId(9)),
        ..Default::default()
    };
    let d: TestDispatcher =
        Dispatcher::new(&keymap, Config::new(BASE), Hid::default(), Lights::default(), store)
            .unwrap();
    assert_eq!(d.layers().default_layer(), BASE);
}

#[test]
fn persist_off_skips_store() {
    let keymap = keymap();
    let config = Config::new(BASE).with_capabilities(Capabilities {
        persist: false,
        ..Capabilities::ALL
    });
    let store = Store {
        layer: Some(US),
        ..Default::default()
    };
    let mut d: TestDispatcher =
        Dispatcher::new(&keymap, config, Hid::default(), Lights::default(), store).unwrap();
    assert_eq!(d.layers().default_layer(), BASE);
    assert_eq!(d.store().loads, 0);

    press(&mut d, ADJ, 0).unwrap();
    press(&mut d, A_KEY, 10).unwrap();
    assert_eq!(d.layers().default_layer(), US);
    assert_eq!(d.store().saves, 0);
}

#[test]
fn default_layer_must_be_ordered() {
    let keymap = keymap();
    let result: Result<TestDispatcher, _> = Dispatcher::new(
        &keymap,
        Config::new(LayerId(9)),
        Hid::default(),
        Lights::default(),
        Store::default(),
    );
    assert_eq!(result.err(), Some(ConfigError::UnknownDefaultLayer(LayerId(9))));
}

#[test]
fn macro_and_cue_keys() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, MAC, 0).unwrap();
    release(&mut d, MAC, 10).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [
            Press(usage::H),
            Release(usage::H),
            Press(usage::I),
            Release(usage::I)
        ]
    );

    let outcome = press(&mut d, CAPS, 20).unwrap();
    assert_eq!(outcome.feedback, FeedbackEvent::sound(SoundCue::CapsLock));
    release(&mut d, CAPS, 30).unwrap();
    assert_eq!(
        d.hid_mut().take(),
        [Press(usage::CAPS_LOCK), Release(usage::CAPS_LOCK)]
    );
}

#[test]
fn clear_all_forgets_everything() {
    let keymap = keymap();
    let mut d = dispatcher(&keymap);

    press(&mut d, SHIFT, 0).unwrap();
    press(&mut d, LT_LOWER, 10).unwrap();
    d.clear_all();

    assert_eq!(d.hid_mut().take(), [Press(usage::LSFT), HidEvent::Clear]);
    assert!(!d.layers().is_on(LOWER));
    assert_eq!(
        release(&mut d, LT_LOWER, 20),
        Err(Misuse::UnmatchedRelease(LT_LOWER))
    );

    // shift count was reset too
    press(&mut d, SHIFT, 30).unwrap();
    assert_eq!(d.hid_mut().take(), [Press(usage::LSFT)]);
}

#[test]
fn too_many_keys_down() {
    let keymap = keymap();
    let mut d: Dispatcher<Hid, Lights, Store, 2> = Dispatcher::new(
        &keymap,
        Config::new(BASE),
        Hid::default(),
        Lights::default(),
        Store::default(),
    )
    .unwrap();

    press(&mut d, A_KEY, 0).unwrap();
    press(&mut d, SHIFT, 1).unwrap();
    assert_eq!(press(&mut d, MAC, 2), Err(Misuse::KeyCapacity(MAC)));

    release(&mut d, A_KEY, 3).unwrap();
    assert!(press(&mut d, MAC, 4).is_ok());
}

#[test]
fn borrowed_sinks() {
    let keymap = keymap();
    let mut hid = Hid::default();
    let mut lights = Lights::default();
    {
        let mut d: Dispatcher<&mut Hid, &mut Lights, (), 4> =
            Dispatcher::new(&keymap, Config::new(BASE), &mut hid, &mut lights, ()).unwrap();
        press(&mut d, TGL_LOWER, 0).unwrap();
        press(&mut d, A_KEY, 10).unwrap();
    }
    assert_eq!(hid.0, [Press(usage::N1)]);
    assert_eq!(lights.sounds, [SoundCue::LayerLockOn]);

    #[derive(Default)]
    struct Events(Vec<FeedbackEvent>);
    impl FeedbackSink for Events {
        fn feedback(&mut self, event: FeedbackEvent) {
            self.0.push(event);
        }
    }

    let mut events = Events::default();
    {
        let mut d: Dispatcher<Hid, &mut Events, (), 4> =
            Dispatcher::new(&keymap, Config::new(BASE), Hid::default(), &mut events, ()).unwrap();
        press(&mut d, TGL_LOWER, 0).unwrap();
    }
    assert_eq!(
        events.0,
        [FeedbackEvent {
            sound: Some(SoundCue::LayerLockOn),
            led: Some(LOWER_LED),
        }]
    );
}
