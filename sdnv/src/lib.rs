#![no_std]
extern crate alloc;

pub mod decode;
pub mod encode;
