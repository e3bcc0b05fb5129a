use layerlock_common::feedback::{LedRequest, SoundCue};

use crate::config::Capabilities;

/// Feedback produced by one dispatched event. Not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedbackEvent {
    pub sound: Option<SoundCue>,
    pub led: Option<LedRequest>,
}

impl FeedbackEvent {
    pub const NONE: Self = Self {
        sound: None,
        led: None,
    };

    pub fn sound(cue: SoundCue) -> Self {
        Self {
            sound: Some(cue),
            led: None,
        }
    }

    pub fn led(led: LedRequest) -> Self {
        Self {
            sound: None,
            led: Some(led),
        }
    }

    pub fn is_none(&self) -> bool {
        self.sound.is_none() && self.led.is_none()
    }

    /// Drop the parts the board has no collaborator for.
    pub fn gate(self, capabilities: &Capabilities) -> Self {
        Self {
            sound: self.sound.filter(|_| capabilities.audio),
            led: self.led.filter(|_| capabilities.backlight),
        }
    }
}

/// Audio and backlight collaborators. Both default to doing nothing.
pub trait FeedbackSink {
    fn play(&mut self, _cue: SoundCue) {}

    fn backlight(&mut self, _request: LedRequest) {}

    fn feedback(&mut self, event: FeedbackEvent) {
        if let Some(cue) = event.sound {
            self.play(cue);
        }
        if let Some(request) = event.led {
            self.backlight(request);
        }
    }
}

/// Board without audio or backlight.
impl FeedbackSink for () {}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn play(&mut self, cue: SoundCue) {
        (**self).play(cue);
    }

    fn backlight(&mut self, request: LedRequest) {
        (**self).backlight(request);
    }

    fn feedback(&mut self, event: FeedbackEvent) {
        (**self).feedback(event);
    }
}

#[cfg(test)]
#[path = "feedback_test.rs"]
mod test;
