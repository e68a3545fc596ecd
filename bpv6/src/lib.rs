/*!
A decoder for Bundle Protocol version 6 (RFC 5050) bundles.

[`bundle::ParsedBundle::parse`] walks a single serialized bundle: the
primary block (in either the version 4 or the version 5/6 layout), the
dictionary or its CBHE (RFC 6260) replacement, and the chain of canonical
blocks up to the block flagged as last. Administrative records carried in
the payload and the common extension blocks are decoded into structured
values.

Malformed input never panics. Problems that do not prevent decoding are
reported as [`diagnostic::Diagnostic`]s tied to the byte range they concern;
a failure inside one block or administrative record abandons only that
structure.
*/

#![no_std]
extern crate alloc;

use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec::Vec,
};
use core::ops::Range;
use diagnostic::Diagnostic;
use error::{CaptureFieldErr, Error, ErrorKind};
use hardy_sdnv::decode::Reader;

pub mod admin_record;
pub mod block;
pub mod bundle;
pub mod config;
pub mod creation_timestamp;
pub mod diagnostic;
pub mod dictionary;
pub mod dtn_time;
pub mod eid;
pub mod error;
pub mod extension;
pub mod payload;
