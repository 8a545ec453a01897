//! Tunable site registry and registration engine
//!
//! A [`TuneRegistry`] records which shared cells correspond to which
//! (source file, line) pairs. Files are keyed by canonical path and kept in
//! discovery order; within a file, entries are kept sorted by line number so
//! the update engine can walk each changed file top to bottom in one read.
//!
//! Three registration strategies exist:
//!
//! 1. **Declared-site** (`register_*`): the host declares a binding and
//!    keeps the returned handle. One registration per site, at startup.
//! 2. **Expression-site** (`fetch_*`): called inline, typically every frame.
//!    The first call for a (file, line) creates the entry; later calls just
//!    return the current value.
//! 3. **Global-site** (`register_named_*`): the host declared a handle
//!    earlier (see `tune_global_*!`) and registers it afterwards by
//!    identifier name; the declaration line is found by scanning the file.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use smallvec::SmallVec;

use crate::error::TuneError;
use crate::update::{self, UpdateOutcome};
use crate::value::{Slot, Tuned, TunedStr, ValueType};
use crate::Site;

/// Keyword the global-site scan looks for on declaration lines.
const GLOBAL_DECL_KEYWORD: &str = "tune_global_";

/// How a site was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Bound at a declaration whose handle the host keeps
    Declared,
    /// Temporary slot fetched inline by (file, line)
    Expression,
    /// Pre-declared handle registered later by identifier name
    Global,
}

/// One adjustable site within a source file
#[derive(Debug, Clone)]
pub(crate) struct ValueEntry {
    /// 1-based physical line of the literal argument
    pub line: u32,
    pub kind: BindingKind,
    pub slot: Slot,
}

/// Per-file record: canonical path, last seen mtime, entries sorted by line
#[derive(Debug)]
pub(crate) struct FileRecord {
    pub path: PathBuf,
    /// `None` until the first scan, so the first update pass re-parses
    pub last_update: Option<SystemTime>,
    pub entries: SmallVec<[ValueEntry; 4]>,
}

/// Registered-site snapshot for host tooling (overlay panels, dump commands)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub file: PathBuf,
    pub line: u32,
    pub kind: BindingKind,
    pub ty: ValueType,
}

/// Registry of tunable call sites.
///
/// Construct one at startup, register sites during init, call
/// [`update`](TuneRegistry::update) once per frame. The registry is
/// deliberately `!Send + !Sync` (it hands out `Rc` cells): live tuning
/// belongs to exactly one thread.
#[derive(Debug, Default)]
pub struct TuneRegistry {
    files: Vec<FileRecord>,
}

impl TuneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Declared-site registration
    // ========================================================================

    /// Register a declared `f32` site; returns the live handle.
    pub fn register_f32(&mut self, initial: f32, site: Site<'_>) -> Result<Tuned<f32>, TuneError> {
        let cell = Rc::new(Cell::new(initial));
        self.bind(Slot::F32(cell.clone()), BindingKind::Declared, site)?;
        Ok(Tuned(cell))
    }

    /// Register a declared `i32` site; returns the live handle.
    pub fn register_i32(&mut self, initial: i32, site: Site<'_>) -> Result<Tuned<i32>, TuneError> {
        let cell = Rc::new(Cell::new(initial));
        self.bind(Slot::I32(cell.clone()), BindingKind::Declared, site)?;
        Ok(Tuned(cell))
    }

    /// Register a declared `bool` site; returns the live handle.
    pub fn register_bool(&mut self, initial: bool, site: Site<'_>) -> Result<Tuned<bool>, TuneError> {
        let cell = Rc::new(Cell::new(initial));
        self.bind(Slot::Bool(cell.clone()), BindingKind::Declared, site)?;
        Ok(Tuned(cell))
    }

    /// Register a declared `char` site; returns the live handle.
    pub fn register_char(&mut self, initial: char, site: Site<'_>) -> Result<Tuned<char>, TuneError> {
        let cell = Rc::new(Cell::new(initial));
        self.bind(Slot::Char(cell.clone()), BindingKind::Declared, site)?;
        Ok(Tuned(cell))
    }

    /// Register a declared string site; the registry owns a heap copy of the
    /// initial text.
    pub fn register_str(&mut self, initial: &str, site: Site<'_>) -> Result<TunedStr, TuneError> {
        let cell = Rc::new(RefCell::new(initial.to_owned()));
        self.bind(Slot::Str(cell.clone()), BindingKind::Declared, site)?;
        Ok(TunedStr(cell))
    }

    // ========================================================================
    // Expression-site fetch
    // ========================================================================

    /// Fetch the `f32` value for an expression site, registering it first if
    /// this (file, line) has not been seen. Safe to call every frame;
    /// `initial` only matters on the first call.
    pub fn fetch_f32(&mut self, initial: f32, site: Site<'_>) -> Result<f32, TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        match hit {
            Some(Slot::F32(cell)) => Ok(cell.get()),
            Some(other) => Err(self.mismatch(file, site.line, ValueType::F32, &other)),
            None => {
                let slot = Slot::F32(Rc::new(Cell::new(initial)));
                self.occupy(file, at, site.line, BindingKind::Expression, slot);
                Ok(initial)
            }
        }
    }

    /// Fetch the `i32` value for an expression site (see [`fetch_f32`](Self::fetch_f32)).
    pub fn fetch_i32(&mut self, initial: i32, site: Site<'_>) -> Result<i32, TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        match hit {
            Some(Slot::I32(cell)) => Ok(cell.get()),
            Some(other) => Err(self.mismatch(file, site.line, ValueType::I32, &other)),
            None => {
                let slot = Slot::I32(Rc::new(Cell::new(initial)));
                self.occupy(file, at, site.line, BindingKind::Expression, slot);
                Ok(initial)
            }
        }
    }

    /// Fetch the `bool` value for an expression site (see [`fetch_f32`](Self::fetch_f32)).
    pub fn fetch_bool(&mut self, initial: bool, site: Site<'_>) -> Result<bool, TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        match hit {
            Some(Slot::Bool(cell)) => Ok(cell.get()),
            Some(other) => Err(self.mismatch(file, site.line, ValueType::Bool, &other)),
            None => {
                let slot = Slot::Bool(Rc::new(Cell::new(initial)));
                self.occupy(file, at, site.line, BindingKind::Expression, slot);
                Ok(initial)
            }
        }
    }

    /// Fetch the `char` value for an expression site (see [`fetch_f32`](Self::fetch_f32)).
    pub fn fetch_char(&mut self, initial: char, site: Site<'_>) -> Result<char, TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        match hit {
            Some(Slot::Char(cell)) => Ok(cell.get()),
            Some(other) => Err(self.mismatch(file, site.line, ValueType::Char, &other)),
            None => {
                let slot = Slot::Char(Rc::new(Cell::new(initial)));
                self.occupy(file, at, site.line, BindingKind::Expression, slot);
                Ok(initial)
            }
        }
    }

    /// Fetch the string value for an expression site (see [`fetch_f32`](Self::fetch_f32)).
    pub fn fetch_str(&mut self, initial: &str, site: Site<'_>) -> Result<String, TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        match hit {
            Some(Slot::Str(cell)) => Ok(cell.borrow().clone()),
            Some(other) => Err(self.mismatch(file, site.line, ValueType::Str, &other)),
            None => {
                let slot = Slot::Str(Rc::new(RefCell::new(initial.to_owned())));
                self.occupy(file, at, site.line, BindingKind::Expression, slot);
                Ok(initial.to_owned())
            }
        }
    }

    // ========================================================================
    // Global-site registration
    // ========================================================================

    /// Register a pre-declared `f32` handle by identifier name.
    ///
    /// Scans `file` for the first `tune_global_*!` declaration of `name` and
    /// registers the handle at that line. Declaration and registration must
    /// live in the same source file.
    pub fn register_named_f32(
        &mut self,
        handle: &Tuned<f32>,
        name: &str,
        file: &str,
    ) -> Result<(), TuneError> {
        let line = find_global_line(Path::new(file), name)?;
        self.bind(Slot::F32(handle.0.clone()), BindingKind::Global, Site::new(file, line))
    }

    /// Register a pre-declared `i32` handle by identifier name.
    pub fn register_named_i32(
        &mut self,
        handle: &Tuned<i32>,
        name: &str,
        file: &str,
    ) -> Result<(), TuneError> {
        let line = find_global_line(Path::new(file), name)?;
        self.bind(Slot::I32(handle.0.clone()), BindingKind::Global, Site::new(file, line))
    }

    /// Register a pre-declared `bool` handle by identifier name.
    pub fn register_named_bool(
        &mut self,
        handle: &Tuned<bool>,
        name: &str,
        file: &str,
    ) -> Result<(), TuneError> {
        let line = find_global_line(Path::new(file), name)?;
        self.bind(Slot::Bool(handle.0.clone()), BindingKind::Global, Site::new(file, line))
    }

    /// Register a pre-declared `char` handle by identifier name.
    pub fn register_named_char(
        &mut self,
        handle: &Tuned<char>,
        name: &str,
        file: &str,
    ) -> Result<(), TuneError> {
        let line = find_global_line(Path::new(file), name)?;
        self.bind(Slot::Char(handle.0.clone()), BindingKind::Global, Site::new(file, line))
    }

    /// Register a pre-declared string handle by identifier name.
    pub fn register_named_str(
        &mut self,
        handle: &TunedStr,
        name: &str,
        file: &str,
    ) -> Result<(), TuneError> {
        let line = find_global_line(Path::new(file), name)?;
        self.bind(Slot::Str(handle.0.clone()), BindingKind::Global, Site::new(file, line))
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Re-parse every registered file whose modification time advanced.
    ///
    /// Unchanged files are skipped on the mtime alone; this is the once-per
    /// frame call and is cheap in the steady state. Per-entry failures are
    /// logged, recorded in the outcome, and do not stop the pass.
    pub fn update(&mut self) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        for record in &mut self.files {
            outcome.files_checked += 1;
            let mtime = match fs::metadata(&record.path).and_then(|meta| meta.modified()) {
                Ok(mtime) => mtime,
                Err(source) => {
                    let error = TuneError::Stat {
                        path: record.path.clone(),
                        source,
                    };
                    log::warn!("{error}");
                    outcome.skipped.push(error);
                    continue;
                }
            };
            if record.last_update == Some(mtime) {
                continue;
            }
            record.last_update = Some(mtime);
            update::rescan(record, &mut outcome);
        }
        outcome
    }

    /// Re-parse one registered file unconditionally.
    ///
    /// For callers that already know which file changed. No mtime gate: the
    /// file is rescanned even if it looks untouched. The stored mtime is
    /// refreshed, so a following [`update`](Self::update) skips the file.
    pub fn update_file(&mut self, path: impl AsRef<Path>) -> Result<UpdateOutcome, TuneError> {
        let path = path.as_ref();
        let canonical = path.canonicalize().map_err(|source| TuneError::Canonicalize {
            path: path.to_owned(),
            source,
        })?;
        let Some(record) = self.files.iter_mut().find(|record| record.path == canonical) else {
            return Err(TuneError::FileNotRegistered(canonical));
        };

        let mut outcome = UpdateOutcome {
            files_checked: 1,
            ..UpdateOutcome::default()
        };
        if let Ok(mtime) = fs::metadata(&record.path).and_then(|meta| meta.modified()) {
            record.last_update = Some(mtime);
        }
        update::rescan(record, &mut outcome);
        Ok(outcome)
    }

    // ========================================================================
    // Introspection and lifecycle
    // ========================================================================

    /// Number of registered sites across all files
    pub fn len(&self) -> usize {
        self.files.iter().map(|record| record.entries.len()).sum()
    }

    /// Check if no sites are registered
    pub fn is_empty(&self) -> bool {
        self.files.iter().all(|record| record.entries.is_empty())
    }

    /// Number of registered source files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Snapshot of every registered site, file by file in line order
    pub fn sites(&self) -> Vec<SiteInfo> {
        self.files
            .iter()
            .flat_map(|record| {
                record.entries.iter().map(|entry| SiteInfo {
                    file: record.path.clone(),
                    line: entry.line,
                    kind: entry.kind,
                    ty: entry.slot.value_type(),
                })
            })
            .collect()
    }

    /// Drop every registration (for game reload). Outstanding handles keep
    /// their last values but stop receiving updates.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn canonicalize(file: &str) -> Result<PathBuf, TuneError> {
        Path::new(file)
            .canonicalize()
            .map_err(|source| TuneError::Canonicalize {
                path: PathBuf::from(file),
                source,
            })
    }

    /// Index of the record for `path`, creating it on first sight.
    fn file_index(&mut self, path: PathBuf) -> usize {
        match self.files.iter().position(|record| record.path == path) {
            Some(index) => index,
            None => {
                self.files.push(FileRecord {
                    path,
                    last_update: None,
                    entries: SmallVec::new(),
                });
                self.files.len() - 1
            }
        }
    }

    /// Resolve a site to (file index, insert position, slot already at that
    /// exact line if any).
    fn lookup(&mut self, site: Site<'_>) -> Result<(usize, usize, Option<Slot>), TuneError> {
        let path = Self::canonicalize(site.file)?;
        let file = self.file_index(path);
        let record = &self.files[file];
        let at = record.entries.partition_point(|entry| entry.line < site.line);
        let hit = record
            .entries
            .get(at)
            .filter(|entry| entry.line == site.line)
            .map(|entry| entry.slot.clone());
        Ok((file, at, hit))
    }

    /// Declared-site and global-site insertion: the line must be unoccupied.
    fn bind(&mut self, slot: Slot, kind: BindingKind, site: Site<'_>) -> Result<(), TuneError> {
        let (file, at, hit) = self.lookup(site)?;
        if hit.is_some() {
            return Err(TuneError::DuplicateLine {
                path: self.files[file].path.clone(),
                line: site.line,
            });
        }
        log::debug!(
            "{:?} {} binding at {}:{}",
            kind,
            slot.value_type().type_name(),
            site.file,
            site.line
        );
        self.occupy(file, at, site.line, kind, slot);
        Ok(())
    }

    /// Insert an entry at a position `lookup` reported free, keeping the
    /// line order intact.
    fn occupy(&mut self, file: usize, at: usize, line: u32, kind: BindingKind, slot: Slot) {
        self.files[file].entries.insert(at, ValueEntry { line, kind, slot });
    }

    fn mismatch(&self, file: usize, line: u32, expected: ValueType, found: &Slot) -> TuneError {
        TuneError::TypeMismatch {
            path: self.files[file].path.clone(),
            line,
            expected,
            found: found.value_type(),
        }
    }
}

/// Scan `path` for the first `tune_global_*!` declaration of `name`.
///
/// The identifier must immediately follow the opening parenthesis (leading
/// whitespace allowed) and be terminated by a comma, space or tab - so
/// `speed` never matches a line declaring `speed_multiplier`.
fn find_global_line(path: &Path, name: &str) -> Result<u32, TuneError> {
    let file = File::open(path).map_err(|source| TuneError::FileOpen {
        path: path.to_owned(),
        source,
    })?;
    let reader = BufReader::new(file);

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| TuneError::Read {
            path: path.to_owned(),
            line: index as u32 + 1,
            source,
        })?;
        if !(line.contains(GLOBAL_DECL_KEYWORD) && line.contains(name)) {
            continue;
        }
        let Some(paren) = line.find('(') else {
            continue;
        };
        let after = line[paren + 1..].trim_start_matches([' ', '\t']);
        if let Some(rest) = after.strip_prefix(name) {
            if matches!(rest.chars().next(), Some(',' | ' ' | '\t')) {
                return Ok(index as u32 + 1);
            }
        }
    }

    Err(TuneError::GlobalNotFound {
        name: name.to_owned(),
        path: path.to_owned(),
    })
}
