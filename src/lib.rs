//! This crate implements the receiving end of a RepRap style gcode link.
//!
//! Bytes are fed one at a time to a [`Parser`]. Fields (a letter followed by a decimal number)
//! are decoded into fixed point integers without any floating point arithmetic and stored into a
//! [`CommandRecord`]. When a line terminator is received, the line is checked against the
//! optional line number and checksum requirements and is either handed over to an [`Executor`]
//! and acknowledged with `ok`, or dropped with a resend request.
//!
//! ## Cargo Features
//!
//! - `std`: build against the standard library (default).
//! - `require-line-number`: every line must carry a monotonic `N` field by default.
//! - `require-checksum`: every line must carry a valid `*` checksum by default.
//! - `checksum-includes-marker`: the `*` byte is part of the checksum by default.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod config;
mod stream;
mod types;
mod utils;

mod parser;

pub use config::{Calibration, ChecksumPolicy, Config};
pub use parser::{Executor, Parser};
pub use stream::{ByteStreamExt, Lines};
pub use types::{Axes, Command, CommandRecord, Seen};
pub use utils::xor_sum;

#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum Error {
    #[error("resend, expected line number {0}")]
    UnexpectedLineNumber(i32),
    #[error("resend, expected checksum {0}")]
    BadChecksum(u8),
    #[error("reply channel rejected a write")]
    Reply,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Reply
    }
}
