// src/script/state.rs

use std::fs;
use std::path::Path;

use mlua::{Lua, Value};
use tracing::{debug, trace};

use crate::errors::{JobdagError, Result};

/// One Lua instance, opened for a single load.
///
/// Values returned by [`ScriptState::do_file`] and
/// [`ScriptState::do_string`] belong to this instance and must be dropped
/// before it is closed. The instance is released by [`ScriptState::close`]
/// or when it goes out of scope.
pub struct ScriptState {
    lua: Lua,
}

impl ScriptState {
    pub fn new() -> Self {
        debug!("script state opened");
        Self { lua: Lua::new() }
    }

    /// Read and run a script file, returning the value of its `return`.
    pub fn do_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| JobdagError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.do_string(&source, &path.display().to_string())
    }

    /// Run a chunk held in memory, returning the value of its `return`
    /// (nil when the chunk has none).
    ///
    /// `chunk_name` prefixes Lua's error positions and the resulting
    /// [`JobdagError::Script`].
    pub fn do_string(&self, source: &str, chunk_name: &str) -> Result<Value> {
        trace!(chunk = chunk_name, bytes = source.len(), "evaluating chunk");
        self.lua
            .load(source)
            .set_name(format!("={chunk_name}"))
            .call(())
            .map_err(|err| JobdagError::Script {
                chunk: chunk_name.to_string(),
                message: err.to_string(),
            })
    }

    /// Release the Lua instance. Dropping the state has the same effect.
    pub fn close(self) {
        debug!(memory = self.lua.used_memory(), "script state closed");
    }
}

impl Default for ScriptState {
    fn default() -> Self {
        Self::new()
    }
}
