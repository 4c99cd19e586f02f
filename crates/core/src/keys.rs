/// Global session shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Space: submit the draft, or advance once feedback is showing.
    SubmitOrAdvance,
    /// R: read the current question aloud again.
    RepeatQuestion,
    /// P
    TogglePause,
}

impl Shortcut {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            ' ' => Some(Shortcut::SubmitOrAdvance),
            'r' | 'R' => Some(Shortcut::RepeatQuestion),
            'p' | 'P' => Some(Shortcut::TogglePause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Shortcut::from_key(' '), Some(Shortcut::SubmitOrAdvance));
        assert_eq!(Shortcut::from_key('R'), Some(Shortcut::RepeatQuestion));
        assert_eq!(Shortcut::from_key('p'), Some(Shortcut::TogglePause));
        assert_eq!(Shortcut::from_key('x'), None);
    }
}
