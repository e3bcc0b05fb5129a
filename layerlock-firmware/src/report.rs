use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};

/// Key state change for the host's HID stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidEvent {
    Press(u16),
    Release(u16),
    /// Release everything.
    Clear,
}

pub trait HidSink {
    fn report(&mut self, event: HidEvent);

    fn press_all(&mut self, codes: &[u16]) {
        for &code in codes {
            self.report(HidEvent::Press(code));
        }
    }

    /// Release in reverse press order.
    fn release_all(&mut self, codes: &[u16]) {
        for &code in codes.iter().rev() {
            self.report(HidEvent::Release(code));
        }
    }

    fn tap_all(&mut self, codes: &[u16]) {
        for &code in codes {
            self.report(HidEvent::Press(code));
            self.report(HidEvent::Release(code));
        }
    }
}

impl<T: HidSink + ?Sized> HidSink for &mut T {
    fn report(&mut self, event: HidEvent) {
        (**self).report(event);
    }

    fn press_all(&mut self, codes: &[u16]) {
        (**self).press_all(codes);
    }

    fn release_all(&mut self, codes: &[u16]) {
        (**self).release_all(codes);
    }

    fn tap_all(&mut self, codes: &[u16]) {
        (**self).tap_all(codes);
    }
}

/// Bounded queue between the dispatcher and the task that writes HID reports.
pub struct ReportChannel<M: RawMutex, const N: usize>(Channel<M, HidEvent, N>);

impl<M: RawMutex, const N: usize> Default for ReportChannel<M, N> {
    fn default() -> Self {
        Self(Channel::new())
    }
}

impl<M: RawMutex, const N: usize> ReportChannel<M, N> {
    pub async fn receive(&self) -> HidEvent {
        self.0.receive().await
    }

    pub fn try_receive(&self) -> Option<HidEvent> {
        self.0.try_receive().ok()
    }

    /// Queue `event`. When the queue is full everything pending is dropped and replaced by
    /// [HidEvent::Clear] so no key is left stuck down.
    pub fn report(&self, event: HidEvent) {
        if self.0.try_send(event).is_err() {
            crate::warn!("report queue full; clearing");
            self.0.clear();
            let _ = self.0.try_send(HidEvent::Clear);
        }
    }
}

impl<M: RawMutex, const N: usize> HidSink for &ReportChannel<M, N> {
    fn report(&mut self, event: HidEvent) {
        ReportChannel::report(*self, event);
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod test;
