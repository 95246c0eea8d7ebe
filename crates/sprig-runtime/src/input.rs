//! Input device managers
//!
//! The host feeds raw device events into these managers between frames; game
//! code queries them during the update. Edge-triggered state (pressed /
//! released) lasts for exactly one update and is cleared by `end_step`.

use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, warn};
use winit::keyboard::KeyCode;

/// The query surface every device manager exposes to game code
pub trait InputDevice {
    type Code: Copy + Eq + Hash;

    /// Start listening for device events
    fn attach(&mut self);

    /// Stop listening and drop all held state
    fn detach(&mut self);

    /// Is `code` held down?
    fn check(&self, code: Self::Code) -> bool;

    /// Did `code` go down during the current step?
    fn check_pressed(&self, code: Self::Code) -> bool;

    /// Did `code` go up during the current step?
    fn check_released(&self, code: Self::Code) -> bool;

    /// Clear edge-triggered state for the step that just finished
    fn end_step(&mut self);

    /// Pull pending events from devices that must be polled
    fn poll(&mut self) {}
}

/// Held / pressed / released bookkeeping shared by the button devices
#[derive(Debug)]
struct ButtonSet<C> {
    down: HashSet<C>,
    pressed: HashSet<C>,
    released: HashSet<C>,
}

impl<C> Default for ButtonSet<C> {
    fn default() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<C: Copy + Eq + Hash> ButtonSet<C> {
    fn press(&mut self, code: C) {
        if self.down.insert(code) {
            self.pressed.insert(code);
        }
    }

    fn release(&mut self, code: C) {
        if self.down.remove(&code) {
            self.released.insert(code);
        }
    }

    fn end_step(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    fn clear(&mut self) {
        self.down.clear();
        self.end_step();
    }
}

/// Keyboard state keyed by physical key
#[derive(Debug, Default)]
pub struct KeyboardManager {
    keys: ButtonSet<KeyCode>,
    attached: bool,
}

impl KeyboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Process a key press event. Auto-repeat does not re-trigger `check_pressed`.
    pub fn process_key_down(&mut self, key: KeyCode) {
        if self.attached {
            self.keys.press(key);
        }
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        if self.attached {
            self.keys.release(key);
        }
    }

    /// Is any key held?
    pub fn any_key(&self) -> bool {
        !self.keys.down.is_empty()
    }
}

impl InputDevice for KeyboardManager {
    type Code = KeyCode;

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.keys.clear();
    }

    fn check(&self, code: KeyCode) -> bool {
        self.keys.down.contains(&code)
    }

    fn check_pressed(&self, code: KeyCode) -> bool {
        self.keys.pressed.contains(&code)
    }

    fn check_released(&self, code: KeyCode) -> bool {
        self.keys.released.contains(&code)
    }

    fn end_step(&mut self) {
        self.keys.end_step();
    }
}

/// Mouse buttons (0 = left, 1 = right, 2 = middle) and cursor position
#[derive(Debug, Default)]
pub struct MouseManager {
    buttons: ButtonSet<u32>,
    /// Current mouse position in room pixels
    pub position: (f64, f64),
    /// Wheel movement this step; positive is away from the user
    wheel: f64,
    attached: bool,
}

impl MouseManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_button_down(&mut self, button: u32) {
        if self.attached {
            self.buttons.press(button);
        }
    }

    pub fn process_button_up(&mut self, button: u32) {
        if self.attached {
            self.buttons.release(button);
        }
    }

    pub fn process_move(&mut self, x: f64, y: f64) {
        if self.attached {
            self.position = (x, y);
        }
    }

    pub fn process_wheel(&mut self, delta: f64) {
        if self.attached {
            self.wheel += delta;
        }
    }

    pub fn wheel(&self) -> f64 {
        self.wheel
    }
}

impl InputDevice for MouseManager {
    type Code = u32;

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.buttons.clear();
        self.wheel = 0.0;
    }

    fn check(&self, code: u32) -> bool {
        self.buttons.down.contains(&code)
    }

    fn check_pressed(&self, code: u32) -> bool {
        self.buttons.pressed.contains(&code)
    }

    fn check_released(&self, code: u32) -> bool {
        self.buttons.released.contains(&code)
    }

    fn end_step(&mut self) {
        self.buttons.end_step();
        self.wheel = 0.0;
    }
}

/// Gamepad buttons, aggregated over every connected pad.
///
/// Backed by gilrs once attached. Without a backend (no gamepad subsystem on
/// this platform, or not attached) it simply reports nothing held.
#[derive(Default)]
pub struct GamepadManager {
    backend: Option<gilrs::Gilrs>,
    buttons: ButtonSet<gilrs::Button>,
    attached: bool,
}

impl GamepadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn process_button_down(&mut self, button: gilrs::Button) {
        if self.attached {
            self.buttons.press(button);
        }
    }

    pub fn process_button_up(&mut self, button: gilrs::Button) {
        if self.attached {
            self.buttons.release(button);
        }
    }
}

impl InputDevice for GamepadManager {
    type Code = gilrs::Button;

    fn attach(&mut self) {
        self.attached = true;
        if self.backend.is_none() {
            match gilrs::Gilrs::new() {
                Ok(gilrs) => self.backend = Some(gilrs),
                Err(e) => warn!("gamepad support unavailable: {}", e),
            }
        }
    }

    fn detach(&mut self) {
        self.attached = false;
        self.backend = None;
        self.buttons.clear();
    }

    fn check(&self, code: gilrs::Button) -> bool {
        self.buttons.down.contains(&code)
    }

    fn check_pressed(&self, code: gilrs::Button) -> bool {
        self.buttons.pressed.contains(&code)
    }

    fn check_released(&self, code: gilrs::Button) -> bool {
        self.buttons.released.contains(&code)
    }

    fn end_step(&mut self) {
        self.buttons.end_step();
    }

    fn poll(&mut self) {
        let mut events = Vec::new();
        if let Some(gilrs) = self.backend.as_mut() {
            while let Some(gilrs::Event { event, .. }) = gilrs.next_event() {
                events.push(event);
            }
        }
        for event in events {
            match event {
                gilrs::EventType::ButtonPressed(button, _) => self.process_button_down(button),
                gilrs::EventType::ButtonReleased(button, _) => self.process_button_up(button),
                gilrs::EventType::Disconnected => {
                    debug!("gamepad disconnected, releasing held buttons");
                    let held: Vec<_> = self.buttons.down.iter().copied().collect();
                    for button in held {
                        self.buttons.release(button);
                    }
                }
                _ => {}
            }
        }
    }
}

/// The set of managers wired up by [`Game::init_input`](crate::Game::init_input)
#[derive(Default)]
pub struct InputManagers {
    pub keyboard: KeyboardManager,
    pub mouse: MouseManager,
    pub gamepad: GamepadManager,
}

impl InputManagers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_all(&mut self) {
        self.keyboard.attach();
        self.mouse.attach();
        self.gamepad.attach();
    }

    /// Top-of-update poll; only the gamepad needs it
    pub fn poll(&mut self) {
        self.gamepad.poll();
    }

    pub fn end_step(&mut self) {
        self.keyboard.end_step();
        self.mouse.end_step();
        self.gamepad.end_step();
    }
}
