/// Keys the engine knows how to poll
///
/// Platform layers map their own key codes onto this set. Keys without a
/// mapping are dropped before they reach `InputState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    LeftShift,
    LeftControl,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

/// Mouse buttons, numbered the way windowing systems usually do
/// (button 1 = left, button 2 = right, button 3 = middle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// 1-based button number
    pub fn number(&self) -> u16 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 3,
            MouseButton::Other(n) => *n,
        }
    }
}
