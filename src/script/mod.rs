// src/script/mod.rs

//! Embedded Lua runtime for job scripts.
//!
//! Job configs are ordinary Lua chunks that return a table:
//!
//! ```lua
//! -- jobs.lua
//! local build = { name = "build" }
//!
//! local shards = {}
//! for i = 1, 3 do
//!   shards[#shards + 1] = { name = "test-" .. i }
//! end
//! shards.depends_on = build
//!
//! return {
//!   build = build,
//!   test = shards,
//! }
//! ```
//!
//! - [`state`] owns the Lua instance for the duration of one load.
//! - [`table`] reads tables the way the config loader interprets them.

pub mod state;
pub mod table;

pub use state::ScriptState;
pub use table::{describe, field, is_array, sequence, string_field, type_name, TableKey};
