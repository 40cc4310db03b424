//! UniFFI bindings crate for the pigeon library
//!
//! This crate wraps the pigeon crate for UniFFI library mode binding
//! generation. It re-exports the FFI module and UniFFI scaffolding from the
//! pigeon crate.
//!
//! ## Building for Swift
//!
//! 1. Build the library for Apple platforms:
//!    ```bash
//!    cargo build --release -p pigeon-ffi --target aarch64-apple-darwin
//!    cargo build --release -p pigeon-ffi --target aarch64-apple-ios
//!    ```
//!
//! 2. Generate Swift bindings:
//!    ```bash
//!    cargo run -p pigeon-ffi --features bindgen --bin uniffi-bindgen generate \
//!        --library target/aarch64-apple-darwin/release/libpigeon_ffi.dylib \
//!        --language swift \
//!        --out-dir generated/swift
//!    ```

// Re-export everything from the pigeon crate's FFI module
pub use pigeon::ffi::*;

// Re-export the uniffi scaffolding from the pigeon crate
// This is needed for library mode to work correctly
pigeon::uniffi_reexport_scaffolding!();
