//! Re-exported APIs for consumers of the generator crate.

pub use crate::generation::briefing::failure_html;
pub use crate::generation::resolve::ResolvedParameters;
pub use crate::generation::validation::{TemplateIssue, validate};
pub use crate::generation::{GenerationError, Generator, generate, generate_seeded};
pub use forge_config::Library;
pub use forge_mission::Mission;
pub use forge_template::MissionTemplate;
