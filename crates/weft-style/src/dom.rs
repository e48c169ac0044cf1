//! [`QueryElement`] for the `weft-dom` element tree.

use weft_dom::{ElementRef, PseudoStates};

use crate::selector::{QueryElement, StyleSubject};

impl StyleSubject for ElementRef<'_> {
    fn type_name(&self) -> &str {
        &self.data().type_name
    }

    fn name(&self) -> Option<&str> {
        self.data().name.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.data().has_class(class)
    }

    fn pseudo_states(&self) -> PseudoStates {
        self.data().pseudo_states
    }
}

impl QueryElement for ElementRef<'_> {
    fn parent(&self) -> Option<Self> {
        ElementRef::parent(self)
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.data().classes.iter().map(String::as_str)
    }
}
