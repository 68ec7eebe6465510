//! Button input
//!
//! The device has six buttons read as a bitmask. A poller (GPIO task on the
//! device, keyboard in the simulator) publishes the latest snapshot; the frame
//! loop reads whatever snapshot is current when `update` runs. There is no
//! event queue, so presses shorter than a frame can be missed.

mod buttons;
mod state;

pub use buttons::{Buttons, EdgeDetector};
pub use state::{InputPublisher, SharedInput};

/// Source of the current button snapshot
pub trait InputSource {
    fn read_input(&mut self) -> Buttons;
}

/// Always reports no buttons held
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn read_input(&mut self) -> Buttons {
        Buttons::empty()
    }
}

/// Reports the same fixed set of buttons every frame
impl InputSource for Buttons {
    fn read_input(&mut self) -> Buttons {
        *self
    }
}

/// Plays back one snapshot per read, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: std::collections::VecDeque<Buttons>,
    last: Buttons,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Buttons>) -> Self {
        Self { frames: frames.into_iter().collect(), last: Buttons::empty() }
    }
}

impl InputSource for ScriptedInput {
    fn read_input(&mut self) -> Buttons {
        if let Some(next) = self.frames.pop_front() {
            self.last = next;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_repeats_last() {
        let mut input = ScriptedInput::new([Buttons::UP, Buttons::A | Buttons::B]);
        assert_eq!(input.read_input(), Buttons::UP);
        assert_eq!(input.read_input(), Buttons::A | Buttons::B);
        assert_eq!(input.read_input(), Buttons::A | Buttons::B);
    }

    #[test]
    fn test_constant_sources() {
        assert!(NoInput.read_input().is_empty());
        let mut held = Buttons::LEFT;
        assert_eq!(held.read_input(), Buttons::LEFT);
    }
}
