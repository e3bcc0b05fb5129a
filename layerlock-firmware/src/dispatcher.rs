use embassy_time::Instant;
use heapless::Vec;
use layerlock_common::{
    feedback::{LedPattern, LedRequest, SoundCue},
    keycodes::{key_range, SHIFT_MASK},
    LayerId,
};

use crate::{
    config::{Capabilities, Config, ConfigError},
    event::{KeyEvent, KeyId, Misuse},
    feedback::{FeedbackEvent, FeedbackSink},
    keymap::{Action, DualRole, Emit, HoldRole, Keymap},
    layer::LayerState,
    report::{HidEvent, HidSink},
    store::LayerStore,
    tap_hold::{DanceState, GestureResult, Resolver},
};

/// Result of dispatching one [KeyEvent].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outcome {
    /// Resolved gesture of a dual-role key; `Idle` for presses and for other keys.
    pub gesture: GestureResult,
    /// Binding found at press time; `None` for an unbound key.
    pub action: Option<Action>,
    /// Feedback passed to the [FeedbackSink], already gated by [Capabilities].
    pub feedback: FeedbackEvent,
}

impl Outcome {
    fn new(gesture: GestureResult, action: Option<Action>, feedback: FeedbackEvent) -> Self {
        Self {
            gesture,
            action,
            feedback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveKey {
    key: KeyId,
    action: Option<Action>,
    /// Momentary layer engaged by this key.
    layer: Option<LayerId>,
    /// Shift state sampled at press.
    shifted: bool,
    /// Release does nothing.
    consumed: bool,
}

impl ActiveKey {
    fn new(key: KeyId, action: Option<Action>) -> Self {
        Self {
            key,
            action,
            layer: None,
            shifted: false,
            consumed: false,
        }
    }
}

/// Turns key events into HID output, layer changes and feedback. Sole owner of the
/// [LayerState]. `KEYS` bounds how many keys may be down at once.
pub struct Dispatcher<'k, H: HidSink, F: FeedbackSink, S: LayerStore, const KEYS: usize> {
    keymap: &'k Keymap,
    capabilities: Capabilities,
    layers: LayerState,
    resolver: Resolver<KEYS>,
    active: Vec<ActiveKey, KEYS>,
    modifier_count: [u8; 8],
    hid: H,
    feedback: F,
    store: S,
}

impl<'k, H: HidSink, F: FeedbackSink, S: LayerStore, const KEYS: usize>
    Dispatcher<'k, H, F, S, KEYS>
{
    pub fn new(
        keymap: &'k Keymap,
        config: Config,
        hid: H,
        feedback: F,
        mut store: S,
    ) -> Result<Self, ConfigError> {
        if !keymap.contains_layer(config.default_layer) {
            return Err(ConfigError::UnknownDefaultLayer(config.default_layer));
        }

        let mut default_layer = config.default_layer;
        if config.capabilities.persist {
            match store.load() {
                Some(layer) if keymap.contains_layer(layer) => {
                    crate::info!("restored default layer {:?}", layer);
                    default_layer = layer;
                }
                Some(layer) => crate::warn!("ignoring stored default layer {:?}", layer),
                None => {}
            }
        }

        Ok(Self {
            keymap,
            capabilities: config.capabilities,
            layers: LayerState::new(default_layer),
            resolver: Resolver::new(config.tap_hold),
            active: Vec::new(),
            modifier_count: [0; 8],
            hid,
            feedback,
            store,
        })
    }

    pub fn key_event(&mut self, event: KeyEvent) -> Result<Outcome, Misuse> {
        if event.pressed {
            self.press(event.key, event.timestamp)
        } else {
            self.release(event.key, event.timestamp)
        }
    }

    pub fn layers(&self) -> &LayerState {
        &self.layers
    }

    pub fn keymap(&self) -> &'k Keymap {
        self.keymap
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn hid(&self) -> &H {
        &self.hid
    }

    pub fn hid_mut(&mut self) -> &mut H {
        &mut self.hid
    }

    pub fn feedback_sink(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_sink_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forget every held key, gesture, layer and modifier and tell the host to release
    /// everything. The default layer is kept.
    pub fn clear_all(&mut self) {
        self.resolver.clear();
        self.active.clear();
        self.modifier_count = [0; 8];
        self.layers.reset();
        self.hid.report(HidEvent::Clear);
    }

    fn press(&mut self, key: KeyId, now: Instant) -> Result<Outcome, Misuse> {
        if self.active.iter().any(|a| a.key == key) {
            crate::warn!("{:?} pressed twice; releasing first", key);
            if let Err(misuse) = self.release(key, now) {
                crate::warn!("release of {:?} failed: {:?}", key, misuse);
            }
        }
        if self.active.is_full() {
            crate::warn!("too many keys down; ignoring {:?}", key);
            return Err(Misuse::KeyCapacity(key));
        }

        let action = self.layers.lookup(key, self.keymap).map(|(_, a)| a);
        let mut entry = ActiveKey::new(key, action);

        let result = match action {
            Some(Action::DualRole(dual)) => self.press_dual(&mut entry, dual, now),
            Some(action) => {
                self.resolver.interrupt(now);
                self.press_action(&mut entry, action)
            }
            None => Ok(FeedbackEvent::NONE),
        };

        if self.active.push(entry).is_err() {
            return Err(Misuse::KeyCapacity(key));
        }

        let feedback = result?;
        Ok(Outcome::new(GestureResult::Idle, action, feedback))
    }

    fn press_action(
        &mut self,
        entry: &mut ActiveKey,
        action: Action,
    ) -> Result<FeedbackEvent, Misuse> {
        let default_layer = self.layers.default_layer();
        let feedback = match action {
            Action::Transparent | Action::NoOp | Action::DualRole(_) => FeedbackEvent::NONE,
            Action::EmitCodes(codes) => {
                self.press_codes(codes);
                FeedbackEvent::NONE
            }
            Action::Tap(emit) => {
                self.emit(emit, self.shift_held());
                FeedbackEvent::NONE
            }
            Action::Cue(codes, cue) => {
                self.press_codes(codes);
                FeedbackEvent::sound(cue)
            }
            Action::RunMacro(codes) => {
                self.tap_codes(codes);
                FeedbackEvent::NONE
            }
            Action::ToggleLayer(target) => match target.resolve(default_layer) {
                Some(layer) => match self.toggle_lock(layer) {
                    Ok(feedback) => feedback,
                    Err(err) => {
                        entry.consumed = true;
                        return Err(err);
                    }
                },
                None => FeedbackEvent::NONE,
            },
            Action::SetDefaultLayer(layer) => self.change_default_layer(layer),
            Action::Momentary(target) => match target.resolve(default_layer) {
                Some(layer) => {
                    entry.layer = Some(layer);
                    self.hold_layer(layer)
                }
                None => FeedbackEvent::NONE,
            },
        };
        Ok(self.send_feedback(feedback))
    }

    fn press_dual(
        &mut self,
        entry: &mut ActiveKey,
        dual: DualRole,
        now: Instant,
    ) -> Result<FeedbackEvent, Misuse> {
        let hold_layer = match dual.hold {
            HoldRole::Layer(target) => target.resolve(self.layers.default_layer()),
            HoldRole::Codes(_) => None,
        };

        // a tap straight after a double tap is absorbed, not an unlock
        let absorbed = matches!(
            self.resolver.dance_state(entry.key, now),
            DanceState::Resolved { .. }
        );
        if let Some(layer) = hold_layer.filter(|l| !absorbed && self.layers.is_locked(*l)) {
            self.resolver.interrupt(now);
            entry.consumed = true;
            let feedback = self.toggle_lock(layer)?;
            return Ok(self.send_feedback(feedback));
        }

        let double_tap = dual.double_tap.is_some() && self.capabilities.tap_dance;
        let interrupted = match self.resolver.on_press(entry.key, double_tap, now) {
            Ok(interrupted) => interrupted,
            Err(err) => {
                entry.consumed = true;
                return Err(err);
            }
        };
        for key in interrupted {
            crate::debug!("{:?} interrupted by {:?}", key, entry.key);
        }

        entry.shifted = self.shift_held();
        let feedback = match dual.hold {
            HoldRole::Layer(_) => match hold_layer {
                Some(layer) => {
                    entry.layer = Some(layer);
                    self.hold_layer(layer)
                }
                None => FeedbackEvent::NONE,
            },
            HoldRole::Codes(codes) => {
                self.press_codes(codes);
                FeedbackEvent::NONE
            }
        };
        Ok(self.send_feedback(feedback))
    }

    fn release(&mut self, key: KeyId, now: Instant) -> Result<Outcome, Misuse> {
        let Some(idx) = self.active.iter().position(|a| a.key == key) else {
            crate::warn!("release of {:?} without press", key);
            return Err(Misuse::UnmatchedRelease(key));
        };
        let entry = self.active.swap_remove(idx);

        if entry.consumed {
            return Ok(Outcome::new(
                GestureResult::Idle,
                entry.action,
                FeedbackEvent::NONE,
            ));
        }

        let mut gesture = GestureResult::Idle;
        let feedback = match entry.action {
            Some(Action::EmitCodes(codes)) | Some(Action::Cue(codes, _)) => {
                self.release_codes(codes);
                Ok(FeedbackEvent::NONE)
            }
            Some(Action::Momentary(_)) => Ok(entry
                .layer
                .map(|layer| self.unhold_layer(layer))
                .unwrap_or(FeedbackEvent::NONE)),
            Some(Action::DualRole(dual)) => {
                gesture = match self.resolver.on_release(key, now) {
                    Ok(gesture) => gesture,
                    Err(_) => GestureResult::Hold,
                };
                self.release_dual(&entry, dual, gesture)
            }
            _ => Ok(FeedbackEvent::NONE),
        }?;

        let feedback = self.send_feedback(feedback);
        Ok(Outcome::new(gesture, entry.action, feedback))
    }

    fn release_dual(
        &mut self,
        entry: &ActiveKey,
        dual: DualRole,
        gesture: GestureResult,
    ) -> Result<FeedbackEvent, Misuse> {
        let tap = match gesture {
            GestureResult::Tap => true,
            GestureResult::DoubleTap => dual.double_tap.is_none(),
            GestureResult::Hold | GestureResult::Idle => false,
        };

        let mut feedback = FeedbackEvent::NONE;
        match dual.hold {
            HoldRole::Codes(codes) => {
                if tap {
                    self.emit(dual.tap, entry.shifted);
                }
                self.release_codes(codes);
            }
            HoldRole::Layer(_) => {
                if let Some(layer) = entry.layer {
                    feedback = self.unhold_layer(layer);
                }
                if tap {
                    self.emit(dual.tap, entry.shifted);
                }
            }
        }

        if let (GestureResult::DoubleTap, Some(target)) = (gesture, dual.double_tap) {
            if let Some(layer) = target.resolve(self.layers.default_layer()) {
                feedback = self.toggle_lock(layer)?;
            }
        }

        Ok(feedback)
    }

    fn toggle_lock(&mut self, layer: LayerId) -> Result<FeedbackEvent, Misuse> {
        let on = self.layers.toggle_lock(layer).inspect_err(|_| {
            crate::warn!("cannot lock the default layer {:?}", layer);
        })?;
        crate::debug!("layer {:?} locked: {:?}", layer, on);

        Ok(if on {
            FeedbackEvent {
                sound: Some(SoundCue::LayerLockOn),
                led: self.led_pattern(layer).map(LedRequest::on),
            }
        } else {
            FeedbackEvent {
                sound: Some(SoundCue::LayerLockOff),
                led: Some(LedRequest::OFF),
            }
        })
    }

    fn hold_layer(&mut self, layer: LayerId) -> FeedbackEvent {
        self.layers.set_momentary(layer, true);
        crate::debug!("layer {:?} held", layer);
        let sound = self.keymap.feedback(layer).and_then(|f| f.hold_on);
        let led = self
            .led_pattern(layer)
            .filter(|_| self.layers.locked().is_empty())
            .map(LedRequest::on);
        FeedbackEvent { sound, led }
    }

    fn unhold_layer(&mut self, layer: LayerId) -> FeedbackEvent {
        self.layers.set_momentary(layer, false);
        crate::debug!("layer {:?} released", layer);
        let sound = self.keymap.feedback(layer).and_then(|f| f.hold_off);
        let led = self
            .led_pattern(layer)
            .filter(|_| self.layers.locked().is_empty())
            .map(|_| LedRequest::OFF);
        FeedbackEvent { sound, led }
    }

    fn change_default_layer(&mut self, layer: LayerId) -> FeedbackEvent {
        self.layers.set_default_layer(layer);
        self.layers.reset();
        crate::debug!("default layer {:?}", layer);
        if self.capabilities.persist {
            self.store.save(layer);
        }
        FeedbackEvent::led(LedRequest::OFF)
    }

    fn led_pattern(&self, layer: LayerId) -> Option<LedPattern> {
        self.keymap.feedback(layer).and_then(|f| f.led)
    }

    fn send_feedback(&mut self, feedback: FeedbackEvent) -> FeedbackEvent {
        let feedback = feedback.gate(&self.capabilities);
        self.feedback.feedback(feedback);
        feedback
    }

    fn shift_held(&self) -> bool {
        self.held_modifiers() & SHIFT_MASK != 0
    }

    fn held_modifiers(&self) -> u8 {
        self.modifier_count
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .fold(0, |bits, (i, _)| bits | 1 << i)
    }

    /// Send the output of `emit`. With `suspend_shift` the held shift modifiers are lifted
    /// around shifted output.
    fn emit(&mut self, emit: Emit, shifted: bool) {
        let codes = emit.select(shifted);
        let suspend = if emit.suspend_shift && shifted && emit.shifted.is_some() {
            self.held_modifiers() & SHIFT_MASK
        } else {
            0
        };

        self.report_modifiers(suspend, false);
        self.tap_codes(codes);
        self.report_modifiers(suspend, true);
    }

    fn report_modifiers(&mut self, bits: u8, down: bool) {
        for i in 0..8u16 {
            if bits & (1 << i) != 0 {
                let code = key_range::MODIFIER_MIN + i;
                self.hid.report(if down {
                    HidEvent::Press(code)
                } else {
                    HidEvent::Release(code)
                });
            }
        }
    }

    fn press_codes(&mut self, codes: &[u16]) {
        for &code in codes {
            self.press_code(code);
        }
    }

    fn release_codes(&mut self, codes: &[u16]) {
        for &code in codes.iter().rev() {
            self.release_code(code);
        }
    }

    fn tap_codes(&mut self, codes: &[u16]) {
        for &code in codes {
            self.press_code(code);
            self.release_code(code);
        }
    }

    /// Modifiers are counted; only the first press is reported.
    fn press_code(&mut self, code: u16) {
        if key_range::is_modifier(code) {
            let count = &mut self.modifier_count[(code - key_range::MODIFIER_MIN) as usize];
            *count = count.saturating_add(1);
            if *count > 1 {
                return;
            }
        }
        self.hid.report(HidEvent::Press(code));
    }

    /// Modifiers are counted; only the last release is reported.
    fn release_code(&mut self, code: u16) {
        if key_range::is_modifier(code) {
            let count = &mut self.modifier_count[(code - key_range::MODIFIER_MIN) as usize];
            if *count == 0 {
                return;
            }
            *count -= 1;
            if *count > 0 {
                return;
            }
        }
        self.hid.report(HidEvent::Release(code));
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod test;
