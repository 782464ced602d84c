//! Translation subsystem
//!
//! A read-through TTL cache in front of the translation tables. The
//! clock and the backing source are injected so expiry behavior is
//! testable without waiting.

pub mod cache;

pub use cache::{
    Clock, DbTranslationSource, SystemClock, TranslationCache, TranslationSource,
};
