//! Declaration macros
//!
//! Thin wrappers over the [`TuneRegistry`](crate::TuneRegistry) methods that
//! capture `file!()` and `line!()` so the registry knows which physical
//! source line to re-parse. Because the update engine reads the line back
//! out of the file, every macro call must sit on its own source line, and
//! the literal has to be written out at the call site (no named constants).
//!
//! `file!()` paths are relative to the directory the compiler ran in - the
//! workspace root under cargo - so run the host from there (or registration
//! returns a path-resolution error).

/// Build a [`Site`](crate::Site) for the current source location.
#[macro_export]
macro_rules! site {
    () => {
        $crate::Site {
            file: file!(),
            line: line!(),
        }
    };
}

/// Declare an adjustable `f32` site.
///
/// ```ignore
/// let gravity = tune_f32!(reg, -9.81)?;
/// ```
///
/// Edit `-9.81` in the source while the game runs; `gravity.get()` returns
/// the new value after the next update pass.
#[macro_export]
macro_rules! tune_f32 {
    ($reg:expr, $value:expr) => {
        $reg.register_f32($value, $crate::site!())
    };
}

/// Declare an adjustable `i32` site (see [`tune_f32!`]).
#[macro_export]
macro_rules! tune_i32 {
    ($reg:expr, $value:expr) => {
        $reg.register_i32($value, $crate::site!())
    };
}

/// Declare an adjustable `bool` site (see [`tune_f32!`]).
#[macro_export]
macro_rules! tune_bool {
    ($reg:expr, $value:expr) => {
        $reg.register_bool($value, $crate::site!())
    };
}

/// Declare an adjustable `char` site (see [`tune_f32!`]).
#[macro_export]
macro_rules! tune_char {
    ($reg:expr, $value:expr) => {
        $reg.register_char($value, $crate::site!())
    };
}

/// Declare an adjustable string site (see [`tune_f32!`]).
#[macro_export]
macro_rules! tune_str {
    ($reg:expr, $value:expr) => {
        $reg.register_str($value, $crate::site!())
    };
}

/// Adjustable `f32` used inline in an expression.
///
/// The literal comes first so it sits right after the parenthesis on the
/// source line, where the update engine expects it:
///
/// ```ignore
/// let speed = tune_lit_f32!(4.5, reg)?;
/// ```
///
/// Call it every frame; the slot is allocated once and re-read afterwards.
#[macro_export]
macro_rules! tune_lit_f32 {
    ($value:expr, $reg:expr) => {
        $reg.fetch_f32($value, $crate::site!())
    };
}

/// Adjustable `i32` used inline in an expression (see [`tune_lit_f32!`]).
#[macro_export]
macro_rules! tune_lit_i32 {
    ($value:expr, $reg:expr) => {
        $reg.fetch_i32($value, $crate::site!())
    };
}

/// Adjustable `bool` used inline in an expression (see [`tune_lit_f32!`]).
#[macro_export]
macro_rules! tune_lit_bool {
    ($value:expr, $reg:expr) => {
        $reg.fetch_bool($value, $crate::site!())
    };
}

/// Adjustable `char` used inline in an expression (see [`tune_lit_f32!`]).
#[macro_export]
macro_rules! tune_lit_char {
    ($value:expr, $reg:expr) => {
        $reg.fetch_char($value, $crate::site!())
    };
}

/// Adjustable string used inline in an expression (see [`tune_lit_f32!`]).
#[macro_export]
macro_rules! tune_lit_str {
    ($value:expr, $reg:expr) => {
        $reg.fetch_str($value, $crate::site!())
    };
}

/// Declare an adjustable `f32` handle without registering it.
///
/// The identifier is repeated inside the call so the later
/// [`tune_register_global_f32!`] can find this line by scanning the file:
///
/// ```ignore
/// let gravity = tune_global_f32!(gravity, -9.81);
/// // ... later, with registry access:
/// tune_register_global_f32!(reg, gravity)?;
/// ```
#[macro_export]
macro_rules! tune_global_f32 {
    ($name:ident, $value:expr) => {
        $crate::Tuned::<f32>::new($value)
    };
}

/// Declare an adjustable `i32` handle without registering it (see
/// [`tune_global_f32!`]).
#[macro_export]
macro_rules! tune_global_i32 {
    ($name:ident, $value:expr) => {
        $crate::Tuned::<i32>::new($value)
    };
}

/// Declare an adjustable `bool` handle without registering it (see
/// [`tune_global_f32!`]).
#[macro_export]
macro_rules! tune_global_bool {
    ($name:ident, $value:expr) => {
        $crate::Tuned::<bool>::new($value)
    };
}

/// Declare an adjustable `char` handle without registering it (see
/// [`tune_global_f32!`]).
#[macro_export]
macro_rules! tune_global_char {
    ($name:ident, $value:expr) => {
        $crate::Tuned::<char>::new($value)
    };
}

/// Declare an adjustable string handle without registering it (see
/// [`tune_global_f32!`]).
#[macro_export]
macro_rules! tune_global_str {
    ($name:ident, $value:expr) => {
        $crate::TunedStr::new($value)
    };
}

/// Register a handle declared with [`tune_global_f32!`]. The binding named
/// here must match the identifier inside the declaration, and both calls
/// must live in the same source file.
#[macro_export]
macro_rules! tune_register_global_f32 {
    ($reg:expr, $name:ident) => {
        $reg.register_named_f32(&$name, stringify!($name), file!())
    };
}

/// Register a handle declared with [`tune_global_i32!`] (see
/// [`tune_register_global_f32!`]).
#[macro_export]
macro_rules! tune_register_global_i32 {
    ($reg:expr, $name:ident) => {
        $reg.register_named_i32(&$name, stringify!($name), file!())
    };
}

/// Register a handle declared with [`tune_global_bool!`] (see
/// [`tune_register_global_f32!`]).
#[macro_export]
macro_rules! tune_register_global_bool {
    ($reg:expr, $name:ident) => {
        $reg.register_named_bool(&$name, stringify!($name), file!())
    };
}

/// Register a handle declared with [`tune_global_char!`] (see
/// [`tune_register_global_f32!`]).
#[macro_export]
macro_rules! tune_register_global_char {
    ($reg:expr, $name:ident) => {
        $reg.register_named_char(&$name, stringify!($name), file!())
    };
}

/// Register a handle declared with [`tune_global_str!`] (see
/// [`tune_register_global_f32!`]).
#[macro_export]
macro_rules! tune_register_global_str {
    ($reg:expr, $name:ident) => {
        $reg.register_named_str(&$name, stringify!($name), file!())
    };
}
