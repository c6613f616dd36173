use std::time::Duration;

use log::{debug, info};

use crate::config::Config;
use crate::cpu::{Cycle, CPU};
use crate::display::Framebuffer;
use crate::error::Result;
use crate::input::KEY_COUNT;
use crate::random::{RandomNumberProvider, WallClockRng};
use crate::timer::TIMER_HZ;

/// Most wall time a single [`Emulator::advance`] will try to catch up on. Anything beyond this,
/// say after the host was suspended, is dropped.
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// What happened during one call to [`Emulator::advance`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub cycles: u32,
    pub timer_ticks: u32,
    pub awaiting_key: bool,
    /// The framebuffer changed since the host last called [`Emulator::clear_dirty`].
    pub dirty: bool,
}

/// Owed CPU cycles and timer ticks, measured in wall time.
#[derive(Debug, Clone)]
struct Clock {
    cycle_period: Duration,
    timer_period: Duration,
    cycle_debt: Duration,
    timer_debt: Duration,
}

enum Event {
    Cycle,
    TimerTick,
}

impl Clock {
    fn new(cycles_per_second: u32) -> Self {
        Self {
            cycle_period: Duration::from_secs(1) / cycles_per_second,
            timer_period: Duration::from_secs(1) / TIMER_HZ,
            cycle_debt: Duration::default(),
            timer_debt: Duration::default(),
        }
    }

    fn accumulate(&mut self, elapsed: Duration) {
        self.cycle_debt = (self.cycle_debt + elapsed).min(MAX_CATCH_UP);
        self.timer_debt = (self.timer_debt + elapsed).min(MAX_CATCH_UP);
    }

    /// The earliest owed event, if any, with its debt already paid.
    fn next_event(&mut self) -> Option<Event> {
        let cycle_due = self.cycle_debt.checked_sub(self.cycle_period);
        let timer_due = self.timer_debt.checked_sub(self.timer_period);

        // Whichever has the larger remaining debt fell due first.
        match (cycle_due, timer_due) {
            (None, None) => None,
            (Some(remaining), None) => {
                self.cycle_debt = remaining;
                Some(Event::Cycle)
            }
            (None, Some(remaining)) => {
                self.timer_debt = remaining;
                Some(Event::TimerTick)
            }
            (Some(cycle_remaining), Some(timer_remaining)) => {
                if cycle_remaining >= timer_remaining {
                    self.cycle_debt = cycle_remaining;
                    Some(Event::Cycle)
                } else {
                    self.timer_debt = timer_remaining;
                    Some(Event::TimerTick)
                }
            }
        }
    }

    fn reset(&mut self) {
        self.cycle_debt = Duration::default();
        self.timer_debt = Duration::default();
    }
}

/// A [`CPU`] plus the program it runs and the wall clock schedule that drives it.
///
/// The host calls [`Emulator::advance`] with however much time passed since the last call,
/// renders [`Emulator::framebuffer`] when it is dirty and plays a tone while
/// [`Emulator::is_sound_playing`].
pub struct Emulator {
    cpu: CPU,
    clock: Clock,
    current_rom: Vec<u8>,
    is_initial_state: bool,
}

impl Emulator {
    pub fn new(rom: Vec<u8>, config: Config) -> Result<Self> {
        Self::with_random_number_provider(rom, config, Box::new(WallClockRng::new()))
    }

    pub fn with_random_number_provider(
        rom: Vec<u8>,
        config: Config,
        random_number_provider: Box<dyn RandomNumberProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let mut cpu = CPU::new(random_number_provider, config.quirks);
        cpu.load_program(&rom)?;
        info!(
            "Emulator running at {} Hz with {:?}",
            config.cycles_per_second, config.quirks
        );

        Ok(Self {
            cpu,
            clock: Clock::new(config.cycles_per_second),
            current_rom: rom,
            is_initial_state: true,
        })
    }

    pub fn is_initial_state(&self) -> bool {
        self.is_initial_state
    }

    /// Power cycle the machine and load the current ROM again.
    pub fn reset(&mut self) -> Result<()> {
        self.cpu.reset();
        self.cpu.load_program(&self.current_rom)?;
        self.clock.reset();
        self.is_initial_state = true;

        Ok(())
    }

    /// Run the CPU cycles and timer ticks owed for `elapsed` wall time, in the order they fell
    /// due. Timers keep ticking while the CPU waits on a key.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Frame> {
        self.clock.accumulate(elapsed);
        let mut frame = Frame::default();

        while let Some(event) = self.clock.next_event() {
            match event {
                Event::Cycle => {
                    self.step()?;
                    frame.cycles += 1;
                }
                Event::TimerTick => {
                    self.cpu.tick_timers();
                    frame.timer_ticks += 1;
                }
            }
        }
        frame.awaiting_key = self.cpu.is_awaiting_key();
        frame.dirty = self.cpu.framebuffer().is_dirty();
        debug!(
            "Advanced {:?}: {} cycles, {} timer ticks",
            elapsed, frame.cycles, frame.timer_ticks
        );

        Ok(frame)
    }

    /// Run a single instruction cycle outside of the wall clock schedule.
    pub fn step(&mut self) -> Result<Cycle> {
        self.is_initial_state = false;

        self.cpu.step()
    }

    pub fn tick_timers(&mut self) {
        self.cpu.tick_timers();
    }

    pub fn press_key(&mut self, key: u8) {
        self.cpu.keypad_mut().press(key);
    }

    pub fn release_key(&mut self, key: u8) {
        self.cpu.keypad_mut().release(key);
    }

    pub fn set_keys(&mut self, states: [bool; KEY_COUNT]) {
        self.cpu.keypad_mut().set_all(states);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.cpu.framebuffer()
    }

    /// Mark the current framebuffer as rendered.
    pub fn clear_dirty(&mut self) {
        self.cpu.framebuffer_mut().clear_dirty();
    }

    pub fn sound_timer(&self) -> u8 {
        self.cpu.sound_timer()
    }

    pub fn is_sound_playing(&self) -> bool {
        self.cpu.is_sound_playing()
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }
}
