pub const KEY_COUNT: usize = 16;

/// State of the 16 key hex keypad as last reported by the host.
///
/// The host either pushes individual `press`/`release` events or overwrites all 16 states per
/// poll with `set_all`. Either way a key going from up to down is latched as a fresh press,
/// which is what `FX0A` waits for.
#[derive(Debug, Default, Clone)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    fresh_press: Option<u8>,
}

impl Keypad {
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn press(&mut self, key: u8) {
        self.set(key & 0xF, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key & 0xF, false);
    }

    pub fn set_all(&mut self, states: [bool; KEY_COUNT]) {
        for (key, &down) in states.iter().enumerate() {
            self.set(key as u8, down);
        }
    }

    /// Take the most recent up-to-down transition, if any.
    pub fn take_fresh_press(&mut self) -> Option<u8> {
        self.fresh_press.take()
    }

    /// Forget any press latched before a key wait started.
    pub fn clear_fresh_press(&mut self) {
        self.fresh_press = None;
    }

    fn set(&mut self, key: u8, down: bool) {
        let slot = &mut self.keys[key as usize];
        if down && !*slot {
            self.fresh_press = Some(key);
        }
        *slot = down;
    }
}
