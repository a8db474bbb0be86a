pub mod config;

pub use config::{
    ConfigError, DeserializeError, Document, Field, FromValue, Section, SectionData,
};
