//! Container file format support.
//!
//! A container file is a 16-byte header followed by the encoded tree.
//! Array payloads are stored little-endian and optionally zlib-deflated
//! per dataset.
//!
//! # Example
//!
//! ```ignore
//! use cylgrid_io::format::ContainerFile;
//!
//! let mut file = ContainerFile::create("model.cyl")?;
//! file.root_mut().require_group("Geometry")?;
//! file.flush()?;
//!
//! let file = ContainerFile::open("model.cyl")?;
//! assert!(file.root().contains("Geometry"));
//! ```

pub mod codec;
pub mod file;
pub mod header;

pub use codec::{load_container, save_container};
pub use file::ContainerFile;
pub use header::{ContainerHeader, CYLG_MAGIC, FORMAT_VERSION, HEADER_SIZE};
