//! Data models for the INHELP directory.
//!
//! Wire names follow the JSON document shared with the remote endpoint and the web client.

mod dataset;
mod event;
mod help;
mod record;
mod region;
mod seed;

pub use dataset::*;
pub use event::*;
pub use help::*;
pub use record::*;
pub use region::*;
pub use seed::*;
