//! Writer for the Lua table constructors the simulator stores its sections in.
//!
//! Output follows the editor's own layout: one entry per line, nested tables
//! opened on their own line and closed with `}, -- end of [key]`, so that
//! identical tables always serialize to identical text.

use std::fmt::Write as _;

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LuaKey {
    Name(String),
    Index(i64),
}

impl LuaKey {
    fn render(&self) -> String {
        match self {
            LuaKey::Name(name) => format!("[{}]", quote(name)),
            LuaKey::Index(idx) => format!("[{idx}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    Bool(bool),
    Int(i64),
    Number(f64),
    Str(String),
    Table(LuaTable),
}

impl From<bool> for LuaValue {
    fn from(value: bool) -> Self {
        LuaValue::Bool(value)
    }
}

impl From<i64> for LuaValue {
    fn from(value: i64) -> Self {
        LuaValue::Int(value)
    }
}

impl From<i32> for LuaValue {
    fn from(value: i32) -> Self {
        LuaValue::Int(value.into())
    }
}

impl From<u32> for LuaValue {
    fn from(value: u32) -> Self {
        LuaValue::Int(value.into())
    }
}

impl From<u8> for LuaValue {
    fn from(value: u8) -> Self {
        LuaValue::Int(value.into())
    }
}

impl From<f64> for LuaValue {
    fn from(value: f64) -> Self {
        LuaValue::Number(value)
    }
}

impl From<&str> for LuaValue {
    fn from(value: &str) -> Self {
        LuaValue::Str(value.to_string())
    }
}

impl From<String> for LuaValue {
    fn from(value: String) -> Self {
        LuaValue::Str(value)
    }
}

impl From<LuaTable> for LuaValue {
    fn from(value: LuaTable) -> Self {
        LuaValue::Table(value)
    }
}

/// Ordered table; entries serialize in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LuaTable {
    entries: Vec<(LuaKey, LuaValue)>,
    next_index: i64,
}

impl LuaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence table from values, indexed from 1.
    pub fn sequence<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LuaValue>,
    {
        let mut table = Self::new();
        for value in values {
            table.push(value);
        }
        table
    }

    /// Set a named field, replacing any earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<LuaValue>) -> &mut Self {
        self.put(LuaKey::Name(name.into()), value.into());
        self
    }

    /// Builder form of [`LuaTable::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<LuaValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Append at the next sequence index.
    pub fn push(&mut self, value: impl Into<LuaValue>) -> &mut Self {
        self.next_index += 1;
        self.entries
            .push((LuaKey::Index(self.next_index), value.into()));
        self
    }

    /// Set an explicit integer key, e.g. an airdrome id.
    pub fn set_index(&mut self, index: i64, value: impl Into<LuaValue>) -> &mut Self {
        self.put(LuaKey::Index(index), value.into());
        self.next_index = self.next_index.max(index);
        self
    }

    fn put(&mut self, key: LuaKey, value: LuaValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LuaValue> {
        self.entries.iter().find_map(|(key, value)| match key {
            LuaKey::Name(existing) if existing == name => Some(value),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(LuaKey, LuaValue)> {
        self.entries.iter()
    }

    fn write_body(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        for (key, value) in &self.entries {
            let key = key.render();
            match value {
                LuaValue::Table(table) => {
                    let _ = writeln!(out, "{pad}{key} = ");
                    let _ = writeln!(out, "{pad}{{");
                    table.write_body(out, depth + 1);
                    let _ = writeln!(out, "{pad}}}, -- end of {key}");
                }
                scalar => {
                    let _ = writeln!(out, "{pad}{key} = {},", render_scalar(scalar));
                }
            }
        }
    }
}

/// Serialize `table` as the top-level assignment `name = { ... } -- end of name`.
pub fn write_section(name: &str, table: &LuaTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{name} = ");
    out.push_str("{\n");
    table.write_body(&mut out, 1);
    let _ = writeln!(out, "}} -- end of {name}");
    out
}

fn render_scalar(value: &LuaValue) -> String {
    match value {
        LuaValue::Bool(value) => value.to_string(),
        LuaValue::Int(value) => value.to_string(),
        LuaValue::Number(value) => format_number(*value),
        LuaValue::Str(text) => quote(text),
        LuaValue::Table(_) => "{}".to_string(),
    }
}

/// Shortest text that reads back to the same `f64`; non-finite values become `0`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() {
        // `Display` for f64 is the shortest round-trip form without exponent
        value.to_string()
    } else {
        "0".to_string()
    }
}

/// Double-quoted Lua string literal; newlines are written as backslash-newline.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\{:03}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tables_close_with_key_comments() {
        let mut inner = LuaTable::new();
        inner.push(1).push("two");
        let table = LuaTable::new()
            .with("name", "Test")
            .with("list", inner)
            .with("flag", true);
        let text = write_section("mission", &table);
        let expected = "mission = \n{\n    [\"name\"] = \"Test\",\n    [\"list\"] = \n    {\n        [1] = 1,\n        [2] = \"two\",\n    }, -- end of [\"list\"]\n    [\"flag\"] = true,\n} -- end of mission\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn strings_escape_quotes_backslashes_and_newlines() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote("line1\nline2"), "\"line1\\\nline2\"");
        assert_eq!(quote("bell\u{7}"), "\"bell\\007\"");
    }

    #[test]
    fn numbers_use_shortest_round_trip_form() {
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(1234567.125), "1234567.125");
        assert_eq!(format_number(f64::NAN), "0");
        let x = -281_234.567_891_234_5;
        assert_eq!(format_number(x).parse::<f64>().unwrap(), x);
    }

    #[test]
    fn set_replaces_in_place_and_indices_continue() {
        let mut table = LuaTable::new();
        table.set("a", 1).set("b", 2).set("a", 3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), Some(&LuaValue::Int(3)));

        let mut airports = LuaTable::new();
        airports.set_index(22, "x");
        airports.push("y");
        let keys: Vec<_> = airports.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, [LuaKey::Index(22), LuaKey::Index(23)]);
    }

    #[test]
    fn sequence_starts_at_one() {
        let table = LuaTable::sequence(["a", "b"]);
        let text = write_section("t", &table);
        assert!(text.contains("[1] = \"a\","));
        assert!(text.contains("[2] = \"b\","));
    }
}
