//! Container tree encoding.
//!
//! # Format
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ HEADER (16 bytes)                                                  │
//! │  0-3:   Magic "CYLG"                                               │
//! │  4-5:   version (u16 LE)                                           │
//! │  6-7:   flags (u16 LE)                                             │
//! │  8-15:  reserved                                                   │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ TREE (bincode)                                                     │
//! │  GroupRecord { attrs, children: [(name, NodeRecord)] }             │
//! │  NodeRecord = Group | Dataset | Link { filename, path }            │
//! │  DatasetRecord { precision, shape, field, compressed, attrs,       │
//! │                  payload }                                         │
//! ├────────────────────────────────────────────────────────────────────┤
//! │ PAYLOAD                                                            │
//! │  Row-major little-endian values, zlib-deflated if compressed       │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use cylgrid_core::ExternalLink;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use super::header::{ContainerHeader, HEADER_SIZE};
use crate::container::{ArrayData, Attributes, Dataset, Group, Node, Precision};
use crate::error::{IoError, Result};

#[derive(Serialize, Deserialize)]
struct GroupRecord {
    attrs: Attributes,
    children: Vec<(String, NodeRecord)>,
}

#[derive(Serialize, Deserialize)]
enum NodeRecord {
    Group(GroupRecord),
    Dataset(DatasetRecord),
    Link { filename: String, path: String },
}

#[derive(Serialize, Deserialize)]
struct DatasetRecord {
    precision: Precision,
    shape: Vec<u64>,
    field: Option<String>,
    compressed: bool,
    attrs: Attributes,
    payload: Vec<u8>,
}

/// Write a container tree, header first.
pub fn save_container<W: Write>(root: &Group, writer: &mut W) -> Result<()> {
    writer.write_all(&ContainerHeader::new().to_bytes())?;
    let record = encode_group(root)?;
    bincode::serialize_into(&mut *writer, &record)?;
    Ok(())
}

/// Read a container tree written by [`save_container`].
///
/// # Errors
/// Returns `InvalidFormat` for a bad header or a payload that does not
/// match its declared shape.
pub fn load_container<R: Read>(reader: &mut R) -> Result<Group> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = ContainerHeader::from_bytes(&header_bytes);

    if !header.is_valid() {
        return Err(IoError::InvalidFormat {
            message: format!(
                "bad header (magic {:?}, version {}), expected CYLG version {}",
                header.magic,
                header.version,
                super::header::FORMAT_VERSION
            ),
        });
    }

    let record: GroupRecord = bincode::deserialize_from(&mut *reader)?;
    decode_group(record)
}

fn encode_group(group: &Group) -> Result<GroupRecord> {
    let children = group
        .children()
        .iter()
        .map(|(name, node)| Ok((name.clone(), encode_node(node)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupRecord {
        attrs: group.attrs().clone(),
        children,
    })
}

fn encode_node(node: &Node) -> Result<NodeRecord> {
    Ok(match node {
        Node::Group(group) => NodeRecord::Group(encode_group(group)?),
        Node::Dataset(dataset) => NodeRecord::Dataset(encode_dataset(dataset)?),
        Node::Link(link) => {
            let filename = link
                .filename
                .to_str()
                .ok_or_else(|| IoError::InvalidFormat {
                    message: format!("link filename {} is not UTF-8", link.filename.display()),
                })?
                .to_string();
            NodeRecord::Link {
                filename,
                path: link.path.clone(),
            }
        }
    })
}

fn encode_dataset(dataset: &Dataset) -> Result<DatasetRecord> {
    let data = dataset.data();
    let raw = match data {
        ArrayData::F32(array) => {
            let mut bytes = Vec::with_capacity(array.len() * 4);
            for value in array.iter() {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes
        }
        ArrayData::F64(array) => {
            let mut bytes = Vec::with_capacity(array.len() * 8);
            for value in array.iter() {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes
        }
    };

    let payload = if dataset.is_compressed() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?
    } else {
        raw
    };

    Ok(DatasetRecord {
        precision: data.precision(),
        shape: data.shape().iter().map(|&n| n as u64).collect(),
        field: dataset.field().map(str::to_string),
        compressed: dataset.is_compressed(),
        attrs: dataset.attrs().clone(),
        payload,
    })
}

fn decode_group(record: GroupRecord) -> Result<Group> {
    let mut group = Group::new();
    for (name, value) in record.attrs {
        group.set_attr(name, value);
    }
    for (name, child) in record.children {
        match child {
            NodeRecord::Group(sub) => {
                group.insert_group(name, decode_group(sub)?);
            }
            NodeRecord::Dataset(dataset) => {
                group.insert_dataset(name, decode_dataset(dataset)?);
            }
            NodeRecord::Link { filename, path } => {
                group.insert_link(name, ExternalLink::new(PathBuf::from(filename), path));
            }
        }
    }
    Ok(group)
}

fn decode_dataset(record: DatasetRecord) -> Result<Dataset> {
    let shape = record
        .shape
        .iter()
        .map(|&n| usize::try_from(n))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| invalid("dataset dimension does not fit in usize"))?;
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| invalid("dataset size overflows usize"))?;

    let expected = count
        .checked_mul(record.precision.size())
        .ok_or_else(|| invalid("dataset size overflows usize"))?;

    // Inflate at most one byte past the declared size
    let raw = if record.compressed {
        let decoder = ZlibDecoder::new(record.payload.as_slice());
        let mut raw = Vec::new();
        decoder
            .take((expected as u64).saturating_add(1))
            .read_to_end(&mut raw)?;
        raw
    } else {
        record.payload
    };

    if raw.len() != expected {
        return Err(IoError::InvalidFormat {
            message: format!(
                "payload holds {}{} bytes, shape {:?} at {:?} needs {}",
                if raw.len() > expected { "more than " } else { "" },
                raw.len().min(expected),
                shape,
                record.precision,
                expected
            ),
        });
    }

    let data = match record.precision {
        Precision::F32 => {
            let values = raw
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            ArrayData::F32(
                ArrayD::from_shape_vec(IxDyn(&shape), values)
                    .map_err(|e| invalid(&e.to_string()))?,
            )
        }
        Precision::F64 => {
            let values = raw
                .chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect();
            ArrayData::F64(
                ArrayD::from_shape_vec(IxDyn(&shape), values)
                    .map_err(|e| invalid(&e.to_string()))?,
            )
        }
    };

    Ok(Dataset::from_parts(
        data,
        record.field,
        record.compressed,
        record.attrs,
    ))
}

fn invalid(message: &str) -> IoError {
    IoError::InvalidFormat {
        message: message.to_string(),
    }
}
