//! Held-key snapshot sampled once per tick.

/// Logical keys read by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move toward decreasing y.
    Up,
    /// Move toward increasing y.
    Down,
    /// Move toward decreasing x.
    Left,
    /// Move toward increasing x.
    Right,
    /// Trigger the dash ability.
    Dash,
}

impl Key {
    /// Every logical key in a stable order.
    pub const ALL: [Key; 5] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Dash];

    const fn mask(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Down => 1 << 1,
            Self::Left => 1 << 2,
            Self::Right => 1 << 3,
            Self::Dash => 1 << 4,
        }
    }
}

/// Set of keys currently held down.
///
/// Hosts update the set from their input callbacks; the last write for a key
/// wins and ordering between keys is irrelevant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    held: u8,
}

impl InputState {
    /// Creates a snapshot with the provided keys held.
    #[must_use]
    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        let mut state = Self::default();
        for key in keys {
            state.press(key);
        }
        state
    }

    /// Records that a key went down.
    pub fn press(&mut self, key: Key) {
        self.held |= key.mask();
    }

    /// Records that a key went up.
    pub fn release(&mut self, key: Key) {
        self.held &= !key.mask();
    }

    /// Records the provided held state for a key.
    pub fn set(&mut self, key: Key, held: bool) {
        if held {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub const fn is_held(&self, key: Key) -> bool {
        self.held & key.mask() != 0
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.held = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_each_key_independently() {
        let mut input = InputState::with_keys([Key::Up, Key::Left]);
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Left));
        assert!(!input.is_held(Key::Dash));

        input.release(Key::Up);
        input.set(Key::Dash, true);
        assert!(!input.is_held(Key::Up));
        assert!(input.is_held(Key::Dash));

        input.clear();
        assert!(Key::ALL.iter().all(|key| !input.is_held(*key)));
    }
}
