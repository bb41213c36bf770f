// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that the text formats plug
//! into. They are implemented by codecs in the adapters layer.

pub mod codec;

// Re-export commonly used types
pub use codec::PayloadCodec;
