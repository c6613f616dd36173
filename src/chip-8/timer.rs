/// Rate at which the delay and sound timers count down, independent of the CPU clock.
pub const TIMER_HZ: u32 = 60;

/// An 8 bit countdown that floors at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timer {
    pub fn current_value(&self) -> u8 {
        self.value
    }

    pub fn set_value(&mut self, new_value: u8) {
        self.value = new_value;
    }

    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

/// The delay and sound timers, ticked together once per 60Hz period by [`crate::CPU`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay.tick();
        self.sound.tick();
    }

    /// A non-zero sound timer means the tone should be playing.
    pub fn is_sound_playing(&self) -> bool {
        self.sound.is_active()
    }
}
