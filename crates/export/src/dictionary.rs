//! Localization dictionary and map-resource key allocation.

use std::collections::HashSet;

use crate::lua::LuaTable;

/// Text keyed as `DictKey_<Category>_<n>` with one counter shared by all categories.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    entries: Vec<(String, String)>,
    keys: HashSet<String>,
    counter: u32,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` and return the key the mission table should reference.
    pub fn add(&mut self, category: &str, text: impl Into<String>) -> String {
        self.counter += 1;
        let key = format!("DictKey_{category}_{}", self.counter);
        self.keys.insert(key.clone());
        self.entries.push((key.clone(), text.into()));
        key
    }

    /// Last allocated counter value, written as `maxDictId`.
    pub fn max_id(&self) -> u32 {
        self.counter
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, text)| text.as_str())
    }

    pub fn to_table(&self) -> LuaTable {
        let mut table = LuaTable::new();
        for (key, text) in &self.entries {
            table.set(key.clone(), text.as_str());
        }
        table
    }
}

/// Resource keys `ResKey_<Category>_<n>` mapped to packaged file names.
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    entries: Vec<(String, String)>,
    counter: u32,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: &str, file_name: impl Into<String>) -> String {
        self.counter += 1;
        let key = format!("ResKey_{category}_{}", self.counter);
        self.entries.push((key.clone(), file_name.into()));
        key
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_table(&self) -> LuaTable {
        let mut table = LuaTable::new();
        for (key, file) in &self.entries {
            table.set(key.clone(), file.as_str());
        }
        table
    }
}

/// Every `<prefix><Category>_<n>` token in `text`, in order of appearance.
pub fn referenced_keys<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
    let mut keys = Vec::new();
    let mut rest = text;
    let mut offset = 0;
    while let Some(pos) = rest.find(prefix) {
        let start = offset + pos;
        let len = text[start..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(text.len() - start);
        keys.push(&text[start..start + len]);
        offset = start + len.max(prefix.len());
        rest = &text[offset..];
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua::write_section;

    #[test]
    fn keys_share_one_counter() {
        let mut dict = DictionaryBuilder::new();
        assert_eq!(dict.add("descriptionText", "Go"), "DictKey_descriptionText_1");
        assert_eq!(dict.add("UnitName", "Enfield 1-1"), "DictKey_UnitName_2");
        assert_eq!(dict.max_id(), 2);
        assert_eq!(dict.get("DictKey_UnitName_2"), Some("Enfield 1-1"));
        assert!(!dict.contains("DictKey_UnitName_3"));
    }

    #[test]
    fn dictionary_section_preserves_insertion_order() {
        let mut dict = DictionaryBuilder::new();
        dict.add("b", "second");
        dict.add("a", "first");
        let text = write_section("dictionary", &dict.to_table());
        let b = text.find("DictKey_b_1").unwrap();
        let a = text.find("DictKey_a_2").unwrap();
        assert!(b < a);
    }

    #[test]
    fn reference_scan_finds_embedded_keys() {
        let text = "[\"name\"] = \"DictKey_GroupName_3\",\n a_out_text_delay(getValueDictByKey(\"DictKey_ActionText_12\"), 20)";
        assert_eq!(
            referenced_keys(text, "DictKey_"),
            ["DictKey_GroupName_3", "DictKey_ActionText_12"]
        );
        assert!(referenced_keys("nothing here", "DictKey_").is_empty());
    }

    #[test]
    fn resource_keys_map_to_file_names() {
        let mut resources = ResourceMap::new();
        assert_eq!(resources.add("ImageBriefing", "brief.png"), "ResKey_ImageBriefing_1");
        let text = write_section("mapResource", &resources.to_table());
        assert!(text.contains("[\"ResKey_ImageBriefing_1\"] = \"brief.png\","));
    }
}
