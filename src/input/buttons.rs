//! Button bitmask

use bitflags::bitflags;

bitflags! {
    /// Buttons held in one input snapshot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        /// Primary action
        const A = 1 << 4;
        /// Secondary action
        const B = 1 << 5;
    }
}

/// Turns held-state snapshots into press events.
///
/// A combination counts as pressed on the first snapshot where all of its
/// buttons are held after at least one snapshot where they were not.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    prev: Buttons,
}

impl EdgeDetector {
    /// Buttons that went down since the previous call
    pub fn update(&mut self, current: Buttons) -> Buttons {
        let pressed = current & !self.prev;
        self.prev = current;
        pressed
    }

    /// Whether `combo` became fully held with this snapshot.
    ///
    /// Must be called before [`EdgeDetector::update`] for the same snapshot.
    pub fn combo_pressed(&self, current: Buttons, combo: Buttons) -> bool {
        current.contains(combo) && !self.prev.contains(combo)
    }
}
