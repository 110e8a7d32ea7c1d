//! Core math modules.

pub mod interp;
pub mod interval;
pub mod stable;
