use std::cell::{Cell, RefCell};

use crate::filter::Filter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(usize),
}

impl ModalState {
    pub fn is_open(self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn index(self) -> Option<usize> {
        match self {
            ModalState::Open(index) => Some(index),
            ModalState::Closed => None,
        }
    }
}

/// Per-load UI state shared by the controllers. Only mutated synchronously
/// inside a single handler, so plain `Cell`/`RefCell` is enough.
#[derive(Debug, Default)]
pub struct Session {
    modal: Cell<ModalState>,
    menu_open: Cell<bool>,
    active_filter: RefCell<Filter>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> ModalState {
        self.modal.get()
    }

    pub fn set_modal(&self, state: ModalState) {
        self.modal.set(state);
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open.get()
    }

    pub fn set_menu_open(&self, open: bool) {
        self.menu_open.set(open);
    }

    pub fn active_filter(&self) -> Filter {
        self.active_filter.borrow().clone()
    }

    pub fn set_active_filter(&self, filter: Filter) {
        *self.active_filter.borrow_mut() = filter;
    }
}
