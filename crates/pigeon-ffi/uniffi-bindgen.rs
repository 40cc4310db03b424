//! UniFFI bindgen binary for library-mode binding generation
//!
//! Usage:
//!   cargo run -p pigeon-ffi --features bindgen --bin uniffi-bindgen generate \
//!       --library <path-to-built-lib> --language swift --out-dir generated/swift

fn main() {
    uniffi::uniffi_bindgen_main()
}
