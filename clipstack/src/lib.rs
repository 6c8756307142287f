//! # clipstack - bounded clipping history with a movable cursor
//!
//! The engine behind a pasteboard history: a newest-first store of text
//! clippings that is size-bounded by count and saved to disk after every
//! change, plus a stack that keeps a cursor into it for keyboard navigation.
//!
//! ## Key Features
//! - Capacity with a floor of 10, evicting the oldest clipping first
//! - Full-rewrite persistence that tolerates missing or corrupted files
//! - Wraparound and bulk, non-wrapping cursor movement
//! - Deletion that keeps the cursor on a valid clipping

pub mod clipping;
pub mod config;
pub mod error;
pub mod persistence;
pub mod stack;
pub mod store;

pub use clipping::{Clipping, PREVIEW_LEN};
pub use config::{AcceptPolicy, MIN_CAPACITY, StoreConfig};
pub use error::{ClipError, ClipResult};
pub use persistence::{SavedEngine, SavedItem, StoreFile};
pub use stack::ClippingStack;
pub use store::ClippingStore;
