//! DDL rendering layer: template catalog, quoting, policy renderers

pub mod params;
pub mod quote;
pub mod statement;
pub mod template;

pub use statement::{MigrationReport, RenderedStatement};
pub use template::{ParamMap, TemplateId};
