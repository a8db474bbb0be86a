//! Configuration loading and typed access.

mod bind;
mod coerce;
mod de;
mod document;
mod error;
mod parser;
mod section;

pub use bind::{Field, SectionData};
pub use coerce::FromValue;
pub use de::DeserializeError;
pub use document::Document;
pub use error::ConfigError;
pub use section::Section;
