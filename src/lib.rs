#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc)]

pub mod assemble;
pub mod consts;
pub mod error;
pub mod host;
pub mod inspect;
pub mod opc;
pub mod references;
pub mod rewrite;
pub mod vba;
