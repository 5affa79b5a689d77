//! CLI command implementations.

pub(crate) mod consent;
pub(crate) mod content;
pub(crate) mod render;
pub(crate) mod sanitize;

pub(crate) use consent::ConsentCommand;
pub(crate) use content::ContentArgs;
pub(crate) use render::RenderArgs;
pub(crate) use sanitize::SanitizeArgs;
