//! Table-language sections of the archive and their cross-reference check.

pub mod mission;
pub mod options;
pub mod warehouses;

use forge_mission::Mission;

use crate::dictionary::{DictionaryBuilder, ResourceMap, referenced_keys};
use crate::lua::write_section;
use crate::miz::ExportError;

pub const MISSION_ENTRY: &str = "mission";
pub const OPTIONS_ENTRY: &str = "options";
pub const WAREHOUSES_ENTRY: &str = "warehouses";
pub const THEATRE_ENTRY: &str = "theatre";
pub const DICTIONARY_ENTRY: &str = "l10n/DEFAULT/dictionary";
pub const MAP_RESOURCE_ENTRY: &str = "l10n/DEFAULT/mapResource";
/// Directory resources are packaged under.
pub const RESOURCE_DIR: &str = "l10n/DEFAULT";

/// Serialized text entries, in archive order.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSet {
    pub entries: Vec<(&'static str, String)>,
    pub dictionary_entries: usize,
}

impl SectionSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, text)| text.as_str())
    }
}

/// Serialize every section for `mission`; `briefing_images` are packaged resource file names.
pub fn build_sections(
    mission: &Mission,
    briefing_images: &[String],
) -> Result<SectionSet, ExportError> {
    let mut dict = DictionaryBuilder::new();
    let mut resources = ResourceMap::new();
    let image_keys: Vec<String> = briefing_images
        .iter()
        .map(|file| resources.add("ImageBriefing", file.as_str()))
        .collect();

    let mission_text = write_section(
        MISSION_ENTRY,
        &mission::mission_table(mission, &mut dict, &image_keys),
    );
    let options_text = write_section(OPTIONS_ENTRY, &options::options_table(mission));
    let warehouses_text =
        write_section(WAREHOUSES_ENTRY, &warehouses::warehouses_table(mission));

    for (section, text) in [
        (MISSION_ENTRY, &mission_text),
        (OPTIONS_ENTRY, &options_text),
        (WAREHOUSES_ENTRY, &warehouses_text),
    ] {
        verify_references(section, text, &dict, &resources)?;
    }

    Ok(SectionSet {
        entries: vec![
            (MISSION_ENTRY, mission_text),
            (OPTIONS_ENTRY, options_text),
            (WAREHOUSES_ENTRY, warehouses_text),
            (THEATRE_ENTRY, mission.theater.dcs_name.clone()),
            (DICTIONARY_ENTRY, write_section("dictionary", &dict.to_table())),
            (MAP_RESOURCE_ENTRY, write_section("mapResource", &resources.to_table())),
        ],
        dictionary_entries: dict.len(),
    })
}

/// Fail on the first dictionary or resource key in `text` that was never allocated.
pub fn verify_references(
    section: &str,
    text: &str,
    dict: &DictionaryBuilder,
    resources: &ResourceMap,
) -> Result<(), ExportError> {
    let dangling = referenced_keys(text, "DictKey_")
        .into_iter()
        .find(|key| !dict.contains(key))
        .or_else(|| {
            referenced_keys(text, "ResKey_")
                .into_iter()
                .find(|key| !resources.contains(key))
        });
    match dangling {
        Some(key) => Err(ExportError::DanglingReference {
            section: section.to_string(),
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}
