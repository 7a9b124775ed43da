/*
 * Input Module
 *
 * Discrete key triggers delivered to the scene graph. The core only compares
 * them for identity; which physical key is an "increase" or "decrease"
 * trigger is configuration.
 */

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
    Char(char),
    Function(u8),
}

impl Key {
    // Default trigger pair for rotation controllers
    pub const DEFAULT_INCREASE: Key = Key::Right;
    pub const DEFAULT_DECREASE: Key = Key::Left;
}
