//! Interaction state flags carried by every element.

bitflags::bitflags! {
    /// Pseudo-states tested by pseudo-class selectors.
    ///
    /// `ROOT` is never set by the host: the cascade forces it on an element
    /// while matching the stylesheets attached to that element.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PseudoStates: u32 {
        /// Pointer is pressed on the element.
        const ACTIVE   = 1 << 0;
        /// Pointer is over the element.
        const HOVER    = 1 << 1;
        /// Toggle-like element is on.
        const CHECKED  = 1 << 3;
        /// Element does not accept input.
        const DISABLED = 1 << 5;
        /// Element has keyboard focus.
        const FOCUS    = 1 << 6;
        /// Element owns the stylesheet being matched.
        const ROOT     = 1 << 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(PseudoStates::default().is_empty());
    }

    #[test]
    fn test_combined_states() {
        let states = PseudoStates::HOVER | PseudoStates::FOCUS;
        assert!(states.contains(PseudoStates::HOVER));
        assert!(!states.contains(PseudoStates::ACTIVE));
    }
}
