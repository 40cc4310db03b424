//! FFI bindings for UniFFI export
//!
//! This module provides Swift/Kotlin bindings for the pigeon crate via UniFFI.
//!
//! ## Usage from Swift
//!
//! ```swift
//! import PigeonFFI
//!
//! // Initialize logging first
//! initializeLogging(callback: myLogCallback, maxLevel: .info)
//!
//! // Create the service with the platform bridges
//! let service = try AppService(
//!     purchases: myPurchaseBridge,
//!     biometrics: myBiometricBridge
//! )
//!
//! // Resolve the startup session
//! let result = service.bootstrap()
//! if !result.authenticated {
//!     // show sign-in
//! } else if result.locked {
//!     // show PIN prompt
//! }
//! ```

mod logging;
mod service;
mod types;

// Re-export all FFI types and the AppService
pub use logging::{init_ffi_logger, set_log_callback, set_log_level};
pub use service::*;
pub use types::*;
