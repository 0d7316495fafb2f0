#![no_std]
extern crate alloc;

pub mod domain;
pub mod errors;
pub mod fft;
pub mod field;
pub mod poly;
