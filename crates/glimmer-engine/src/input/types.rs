/// Physical key, named by its position on a US layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// `a`..=`z`, lowercase.
    Letter(char),
    /// Top-row digit, 0..=9.
    Digit(u8),
    /// Any other key, carrying the backend key code when it has one.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Backend-independent input event. Pointer positions are physical window pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Button { button: MouseButton, pressed: bool },
    Key { key: Key, pressed: bool, repeat: bool },
    Focused(bool),
}
