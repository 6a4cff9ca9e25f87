// src/script/table.rs

//! How the config loader reads Lua tables.
//!
//! All reads are raw: metatables on job tables are ignored.

use std::fmt;

use mlua::{Table, Value};

/// Reference identity of a Lua table.
///
/// Two tables built from identical constructors have different keys; a
/// table bound to a variable keeps its key wherever the variable is used.
/// Only meaningful while the table is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey(usize);

impl TableKey {
    pub fn of(table: &Table) -> Self {
        Self(table.to_pointer() as usize)
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table: {:#x}", self.0)
    }
}

/// A table is sequence-shaped (a group) when `t[1]` is not nil.
pub fn is_array(table: &Table) -> bool {
    let first: Value = table.raw_get(1).unwrap_or(Value::Nil);
    !matches!(first, Value::Nil)
}

/// `t[key]`, nil when absent.
pub fn field(table: &Table, key: &str) -> Value {
    table.raw_get(key).unwrap_or(Value::Nil)
}

/// `t[key]` when it is a string.
pub fn string_field(table: &Table, key: &str) -> Option<String> {
    match field(table, key) {
        Value::String(s) => Some(s.to_string_lossy().into()),
        _ => None,
    }
}

/// `t[1], t[2], ...` up to the first nil.
pub fn sequence(table: &Table) -> Vec<Value> {
    table.clone().sequence_values().filter_map(|v| v.ok()).collect()
}

/// Lua's name for the value's type.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Integer(_) | Value::Number(_) => "number",
        other => other.type_name(),
    }
}

/// Short rendering of a value for error messages: scalars as Lua prints
/// them, anything else by type.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => format!("{n:.1}"),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.to_string_lossy().into(),
        other => type_name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    fn eval_table(lua: &Lua, source: &str) -> Table {
        lua.load(source).eval().unwrap()
    }

    #[test]
    fn array_heuristic_looks_at_index_one() {
        let lua = Lua::new();

        assert!(is_array(&eval_table(&lua, "return { {}, name = 'g' }")));
        assert!(!is_array(&eval_table(&lua, "return { name = 'job' }")));
        assert!(!is_array(&eval_table(&lua, "return { [2] = {} }")));
    }

    #[test]
    fn sequence_stops_at_first_hole() {
        let lua = Lua::new();
        let t = eval_table(&lua, "local t = { 'a', 'b' } t[4] = 'd' return t");

        let items: Vec<String> = sequence(&t).iter().map(describe).collect();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn identity_follows_the_table_not_its_content() {
        let lua = Lua::new();
        let t = eval_table(&lua, "local x = {} return { x, x, {} }");
        let items = sequence(&t);

        let keys: Vec<TableKey> = items
            .iter()
            .filter_map(|v| match v {
                Value::Table(t) => Some(TableKey::of(t)),
                _ => None,
            })
            .collect();
        assert_eq!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn describes_scalars_like_lua() {
        assert_eq!(describe(&Value::Integer(42)), "42");
        assert_eq!(describe(&Value::Number(2.0)), "2.0");
        assert_eq!(describe(&Value::Number(2.5)), "2.5");
        assert_eq!(describe(&Value::Boolean(true)), "true");
        assert_eq!(type_name(&Value::Integer(1)), "number");
    }
}
