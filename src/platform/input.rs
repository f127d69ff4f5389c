//! Keyboard and gamepad mapping
//!
//! Arrow keys move, comma holds the gun trigger, period holds the cannon
//! trigger, shift raises the shield and escape toggles pause. Gamepads use the
//! left stick or d-pad to move, the south and east face buttons for the two
//! triggers, a shoulder button for the shield and start for pause.

use glam::Vec2;

use crate::sim::{Axis, Command, Direction, TickInput, WeaponKind};

/// Stick deflection below this is ignored
pub const DEFAULT_DEAD_ZONE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Comma,
    Period,
    Shift,
    Escape,
    /// Any key without a binding; still counts as input on the splash screen
    Other,
}

impl Key {
    /// Parse a host key name such as `"left"` or `"ArrowLeft"`
    pub fn from_name(name: &str) -> Key {
        match name.to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            "comma" | "," => Key::Comma,
            "period" | "." => Key::Period,
            "shift" => Key::Shift,
            "escape" | "esc" => Key::Escape,
            _ => Key::Other,
        }
    }

    fn movement(self) -> Option<(Axis, Direction)> {
        match self {
            Key::Left => Some((Axis::X, Direction::Negative)),
            Key::Right => Some((Axis::X, Direction::Positive)),
            Key::Up => Some((Axis::Y, Direction::Negative)),
            Key::Down => Some((Axis::Y, Direction::Positive)),
            _ => None,
        }
    }

    fn weapon(self) -> Option<WeaponKind> {
        match self {
            Key::Comma => Some(WeaponKind::Gun),
            Key::Period => Some(WeaponKind::Cannon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn up(key: Key) -> Self {
        Self { key, pressed: false }
    }
}

/// Snapshot of one gamepad, polled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadState {
    /// Left stick, each axis in [-1, 1], y down
    pub stick: Vec2,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    /// Gun trigger
    pub south: bool,
    /// Cannon trigger
    pub east: bool,
    /// Shield
    pub shoulder: bool,
    pub start: bool,
}

impl GamepadState {
    fn any_active(&self, dead_zone: f32) -> bool {
        self.stick.x.abs() > dead_zone
            || self.stick.y.abs() > dead_zone
            || self.dpad_left
            || self.dpad_right
            || self.dpad_up
            || self.dpad_down
            || self.south
            || self.east
            || self.shoulder
            || self.start
    }

    fn direction(&self, axis: Axis, dead_zone: f32) -> Option<Direction> {
        let (value, neg, pos) = match axis {
            Axis::X => (self.stick.x, self.dpad_left, self.dpad_right),
            Axis::Y => (self.stick.y, self.dpad_up, self.dpad_down),
        };
        if neg || value < -dead_zone {
            Some(Direction::Negative)
        } else if pos || value > dead_zone {
            Some(Direction::Positive)
        } else {
            None
        }
    }
}

/// Collects device events between ticks and turns them into a [`TickInput`]
#[derive(Debug, Clone)]
pub struct InputMapper {
    held: Vec<Key>,
    pending: Vec<Command>,
    pad: GamepadState,
    pad_active: bool,
    dead_zone: f32,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self::with_dead_zone(DEFAULT_DEAD_ZONE)
    }

    pub fn with_dead_zone(dead_zone: f32) -> Self {
        Self {
            held: Vec::new(),
            pending: Vec::new(),
            pad: GamepadState::default(),
            pad_active: false,
            dead_zone: dead_zone.clamp(0.0, 0.95),
        }
    }

    /// Feed a keyboard event; auto-repeat presses of a held key are ignored
    pub fn key_event(&mut self, event: KeyEvent) {
        let key = event.key;
        if event.pressed {
            if self.held.contains(&key) {
                return;
            }
            self.held.push(key);
            if let Some((axis, dir)) = key.movement() {
                self.pending.push(Command::Move { axis, dir });
            } else if let Some(weapon) = key.weapon() {
                self.pending.push(Command::Trigger { weapon, down: true });
            } else if key == Key::Shift {
                self.pending.push(Command::Shield(true));
            } else if key == Key::Escape {
                self.pending.push(Command::TogglePause);
            }
        } else {
            self.held.retain(|k| *k != key);
            if let Some((axis, dir)) = key.movement() {
                self.pending.push(Command::Stop { axis, dir });
            } else if let Some(weapon) = key.weapon() {
                self.pending.push(Command::Trigger { weapon, down: false });
            } else if key == Key::Shift {
                self.pending.push(Command::Shield(false));
            }
        }
    }

    /// Feed the latest gamepad snapshot; commands are emitted on changes only
    pub fn gamepad(&mut self, pad: GamepadState) {
        let prev = self.pad;
        for axis in [Axis::X, Axis::Y] {
            let before = prev.direction(axis, self.dead_zone);
            let now = pad.direction(axis, self.dead_zone);
            if before == now {
                continue;
            }
            if let Some(dir) = before {
                self.pending.push(Command::Stop { axis, dir });
            }
            if let Some(dir) = now {
                self.pending.push(Command::Move { axis, dir });
            }
        }

        for (weapon, before, now) in [
            (WeaponKind::Gun, prev.south, pad.south),
            (WeaponKind::Cannon, prev.east, pad.east),
        ] {
            if before != now {
                self.pending.push(Command::Trigger { weapon, down: now });
            }
        }
        if prev.shoulder != pad.shoulder {
            self.pending.push(Command::Shield(pad.shoulder));
        }
        if pad.start && !prev.start {
            self.pending.push(Command::TogglePause);
        }

        self.pad_active = pad.any_active(self.dead_zone);
        self.pad = pad;
    }

    /// True while any key or gamepad control is held
    pub fn any_held(&self) -> bool {
        !self.held.is_empty() || self.pad_active
    }

    /// Drain the commands gathered since the last call
    pub fn take(&mut self) -> TickInput {
        let commands = std::mem::take(&mut self.pending);
        let any_input = !commands.is_empty() || self.any_held();
        TickInput { commands, any_input }
    }
}
