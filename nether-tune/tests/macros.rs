//! Macro surface tests
//!
//! `file!()` resolves relative to the directory the compiler ran in, while
//! `cargo test` executes from the package root - so registration through
//! the macros may or may not resolve a canonical path here. These tests pin
//! down expansion, site capture and handle behavior, and accept the
//! path-resolution error where it can legitimately occur.

use nether_tune::{
    site, tune_bool, tune_f32, tune_global_f32, tune_global_str, tune_lit_f32,
    tune_register_global_f32, TuneError, TuneRegistry,
};

#[test]
fn site_macro_captures_consecutive_lines() {
    let a = site!();
    let b = site!();
    assert!(a.file.ends_with("macros.rs"));
    assert_eq!(a.file, b.file);
    assert_eq!(b.line, a.line + 1);
}

#[test]
fn declaration_macros_expand() {
    let mut reg = TuneRegistry::new();
    match tune_f32!(reg, -9.81) {
        Ok(handle) => assert_eq!(handle.get(), -9.81),
        Err(TuneError::Canonicalize { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
    match tune_bool!(reg, true) {
        Ok(handle) => assert!(handle.get()),
        Err(TuneError::Canonicalize { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn expression_macro_expands() {
    let mut reg = TuneRegistry::new();
    match tune_lit_f32!(0.5, reg) {
        Ok(value) => assert_eq!(value, 0.5),
        Err(TuneError::Canonicalize { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn global_macros_declare_and_register() {
    let speed = tune_global_f32!(speed, 5.0);
    assert_eq!(speed.get(), 5.0);

    let title = tune_global_str!(title, "paddle");
    assert_eq!(title.get(), "paddle");

    // Registration scans this file for the declaration line above; whether
    // the relative path opens depends on the working directory.
    let mut reg = TuneRegistry::new();
    match tune_register_global_f32!(reg, speed) {
        Ok(()) => assert_eq!(reg.len(), 1),
        Err(TuneError::FileOpen { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}
