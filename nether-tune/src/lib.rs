//! Nether-Tune: live literal tuning for Nethercore game development
//!
//! Declare a value inline in source, run the game, edit the literal in your
//! editor, save - the running game picks the new value up on its next update
//! pass. No recompile, no restart, no asset pipeline round-trip: the source
//! text itself is the tuning UI.
//!
//! This is the source-driven sibling of the debug inspection panel: instead
//! of editing values in an overlay and exporting them back to code, you edit
//! the code and the values follow.
//!
//! # Usage
//!
//! ```ignore
//! use nether_tune::{TuneRegistry, tune_f32, tune_i32, tune_lit_f32};
//!
//! fn main() -> Result<(), nether_tune::TuneError> {
//!     let mut reg = TuneRegistry::new();
//!
//!     // Declared sites: register once, keep the handle.
//!     let gravity = tune_f32!(reg, -9.81)?;
//!     let max_enemies = tune_i32!(reg, 16)?;
//!
//!     loop {
//!         // Re-parses only files whose mtime advanced; cheap when idle.
//!         reg.update();
//!
//!         apply_gravity(gravity.get());
//!         spawn_up_to(max_enemies.get());
//!
//!         // Expression sites: fetched fresh every frame, allocated once.
//!         let wobble = tune_lit_f32!(0.25, reg)?;
//!         let _ = wobble;
//!     }
//! }
//! ```
//!
//! Globals work in two steps, declaration and named registration:
//!
//! ```ignore
//! let speed = tune_global_f32!(speed, 5.0);
//! // later, once a registry is in reach:
//! tune_register_global_f32!(reg, speed)?;
//! ```
//!
//! # How it works
//!
//! Each macro records its `file!()` and `line!()` with the registry. An
//! update pass stats every registered file; when a modification time has
//! advanced, the file is streamed once from top to bottom, each registered
//! line is located, the literal argument after the call-site delimiter is
//! re-parsed for the registered type, and the new value is written into the
//! shared cell behind the host's handle.
//!
//! Supported types: `f32`, `i32`, `bool`, `char` and strings.
//!
//! # Limitations
//!
//! - Every tunable call must occupy its own source line, and the literal
//!   must be written at the call site. Reformatting a call across lines
//!   orphans its registration until the next restart.
//! - Line numbers are captured at compile time: inserting or deleting lines
//!   above a tunable site desynchronizes it until the next build. Editing
//!   literals in place is the supported workflow.
//! - Single-threaded by design. The registry hands out `Rc` cells and is
//!   `!Send`; drive it from the main loop.
//! - A malformed edit (saving mid-keystroke) is logged and skipped; the
//!   previous value stays until the line parses again.

mod error;
mod macros;
mod registry;
mod scan;
mod update;
mod value;

pub use error::TuneError;
pub use registry::{BindingKind, SiteInfo, TuneRegistry};
pub use update::UpdateOutcome;
pub use value::{Tuned, TunedStr, ValueType};

/// Source location of a tunable call site.
///
/// Normally produced by [`site!`]; built by hand when registering sites on
/// behalf of generated or fabricated sources (the integration tests do
/// this).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    /// Source path as the compiler reported it; resolved against the
    /// process working directory at registration time.
    pub file: &'a str,
    /// 1-based physical line of the literal argument.
    pub line: u32,
}

impl<'a> Site<'a> {
    pub fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }
}
