//! Tunable value types and host-side handles
//!
//! The registry and the host share storage through `Rc` cells: the registry
//! writes re-parsed values in, the host reads them out through a [`Tuned`]
//! or [`TunedStr`] handle. Nothing here is `Send` or `Sync` - live tuning is
//! a single-thread affair, and the handle types enforce that at compile time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Value type identifier for registered tunable sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    F32,
    I32,
    Bool,
    Char,
    Str,
}

impl ValueType {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::F32 => "f32",
            ValueType::I32 => "i32",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::Str => "str",
        }
    }
}

/// Typed shared storage for one registered site.
///
/// Strings live in a `RefCell` because re-parsing can resize them; the
/// scalars are plain `Cell`s.
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    F32(Rc<Cell<f32>>),
    I32(Rc<Cell<i32>>),
    Bool(Rc<Cell<bool>>),
    Char(Rc<Cell<char>>),
    Str(Rc<RefCell<String>>),
}

impl Slot {
    /// Get the value type this slot stores
    pub(crate) fn value_type(&self) -> ValueType {
        match self {
            Slot::F32(_) => ValueType::F32,
            Slot::I32(_) => ValueType::I32,
            Slot::Bool(_) => ValueType::Bool,
            Slot::Char(_) => ValueType::Char,
            Slot::Str(_) => ValueType::Str,
        }
    }
}

/// Live handle to a tunable scalar (`f32`, `i32`, `bool` or `char`).
///
/// The handle and the registry entry share one cell: after an update pass
/// rewrites the cell, `get` returns the edited value. Cloning the handle
/// clones the reference, not the value.
#[derive(Debug, Clone)]
pub struct Tuned<T: Copy>(pub(crate) Rc<Cell<T>>);

impl<T: Copy> Tuned<T> {
    /// Create an unregistered handle.
    ///
    /// Used by the `tune_global_*!` declaration macros; the handle starts
    /// live once it is passed to a `tune_register_global_*!` call.
    pub fn new(value: T) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// Overwrite from host code. The next source edit wins again.
    pub fn set(&self, value: T) {
        self.0.set(value);
    }
}

/// Live handle to a tunable string.
#[derive(Debug, Clone)]
pub struct TunedStr(pub(crate) Rc<RefCell<String>>);

impl TunedStr {
    /// Create an unregistered handle (see [`Tuned::new`]).
    pub fn new(value: &str) -> Self {
        Self(Rc::new(RefCell::new(value.to_owned())))
    }

    /// Current value, cloned out.
    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Overwrite from host code.
    pub fn set(&self, value: &str) {
        value.clone_into(&mut self.0.borrow_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(ValueType::F32.type_name(), "f32");
        assert_eq!(ValueType::I32.type_name(), "i32");
        assert_eq!(ValueType::Bool.type_name(), "bool");
        assert_eq!(ValueType::Char.type_name(), "char");
        assert_eq!(ValueType::Str.type_name(), "str");
    }

    #[test]
    fn test_scalar_handle_shares_storage() {
        let a = Tuned::new(5.0f32);
        let b = a.clone();
        a.set(7.5);
        assert_eq!(b.get(), 7.5);
    }

    #[test]
    fn test_string_handle() {
        let title = TunedStr::new("paddle");
        assert_eq!(title.get(), "paddle");
        title.set("pong");
        assert_eq!(title.with(str::len), 4);
    }

    #[test]
    fn test_slot_value_type() {
        let slot = Slot::Bool(Rc::new(Cell::new(true)));
        assert_eq!(slot.value_type(), ValueType::Bool);
        let slot = Slot::Str(Rc::new(RefCell::new(String::new())));
        assert_eq!(slot.value_type(), ValueType::Str);
    }
}
