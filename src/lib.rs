//! Reader and writer for Event Horizon asset containers.
//!
//! ```no_run
//! use ehfile::{decode, encode, HeaderLayout};
//!
//! let bytes = std::fs::read("ship.asset")?;
//! let container = decode(&bytes)?;
//! let edited = container.json.replace("\"Faction\":1", "\"Faction\":2");
//! std::fs::write("ship.asset", encode(&container.header, &edited, HeaderLayout::VersionTable)?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod field;
pub mod header;
pub mod container;
pub mod record;
pub mod files;
pub mod database;
pub mod editor;
pub mod compare;
pub mod translate;

pub use header::{Header, HeaderLayout, HEADER_SIZE};
pub use container::{decode, encode, is_container, try_decode, Container, ContainerError, MalformedKind};
pub use record::{ItemType, Record, RecordKey};
pub use database::Database;
pub use files::ToolError;
