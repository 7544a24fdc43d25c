//! Landing-page section content.
//!
//! The public landing page is made of six independently editable sections.
//! Each section is stored as a JSON document; updates are partial and are
//! merged onto the stored document by [`merge::merge_section`].

pub mod merge;
pub mod schema;

pub use merge::{merge_section, MediaFiles};
pub use schema::{CardSchema, Section, SectionSchema, MAX_CARDS};
