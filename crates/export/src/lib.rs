//! Writers for generated missions: the simulator's `.miz` archive and the
//! standalone briefing document.

pub mod briefing;
pub mod dictionary;
pub mod lua;
pub mod miz;
pub mod sections;

pub use briefing::{
    BriefingError, BriefingFormat, RasterOptions, export_briefing, export_briefing_to,
    write_html_page,
};
pub use miz::{ExportError, ExportReport, MizExporter, Resource, ResourceSource, suggested_file_name};

#[cfg(test)]
pub(crate) mod test_support {
    use forge_config::Library;
    use forge_mission::Mission;
    use forge_template::MissionTemplate;

    /// Mission generated from the bundled library with the default template.
    pub fn mission(seed: u64) -> Mission {
        let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs");
        let library = Library::load(root).expect("bundled library");
        forge_generator::generate_seeded(&MissionTemplate::default(), &library, seed)
            .expect("mission")
    }
}
