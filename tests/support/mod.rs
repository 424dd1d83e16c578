#![allow(dead_code)]

pub mod sonomatch_env;
pub mod wav;
