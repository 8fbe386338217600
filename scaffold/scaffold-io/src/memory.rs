//! In-memory region resources.
//!
//! A [`MemoryResource`] holds an encoded region, optionally restricted to one
//! group, without touching the filesystem. It is used to check what a
//! group-scoped write would contain before committing a file.

use std::path::Path;

use scaffold_types::{FieldError, Region};
use tracing::debug;

use crate::document;
use crate::error::RegionIoResult;

const MEMORY_ORIGIN: &str = "<memory>";

/// An encoded region held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryResource {
    group_name: Option<String>,
    buffer: Vec<u8>,
}

impl MemoryResource {
    /// Group the resource was restricted to, if any.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    /// Encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Size of the encoded region in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Encode a whole region into memory.
///
/// # Errors
///
/// Returns an error if the region cannot be serialized.
pub fn write_region_to_memory(region: &Region) -> RegionIoResult<MemoryResource> {
    let mut buffer = Vec::new();
    document::encode(region, &mut buffer, Path::new(MEMORY_ORIGIN))?;
    Ok(MemoryResource {
        group_name: None,
        buffer,
    })
}

/// Encode the portion of a region belonging to a group.
///
/// Only the group's nodes and, per dimension, the group's elements are kept.
/// All fields are kept, restricted to those nodes.
///
/// # Errors
///
/// Returns an error if the group does not exist, is not a group, or the
/// restricted region cannot be serialized.
///
/// # Example
///
/// ```
/// use scaffold_io::{read_region_from_memory, write_group_to_memory};
/// use scaffold_types::unit_cube_region;
///
/// let mut cube = unit_cube_region("heart");
/// cube.find_or_create_group("apex").unwrap();
/// cube.add_node_to_group("apex", 5).unwrap();
///
/// let resource = write_group_to_memory(&cube, "apex").unwrap();
/// assert_eq!(resource.group_name(), Some("apex"));
///
/// let portion = read_region_from_memory(&resource).unwrap();
/// assert_eq!(portion.nodes().len(), 1);
/// assert!(portion.highest_dimension_mesh().is_none());
/// ```
pub fn write_group_to_memory(region: &Region, group: &str) -> RegionIoResult<MemoryResource> {
    let field = region.field(group).ok_or_else(|| FieldError::FieldNotFound {
        name: group.to_string(),
    })?;
    let Some(members) = field.as_group() else {
        return Err(FieldError::WrongKind {
            name: group.to_string(),
            kind: field.kind().name(),
            expected: "group",
        }
        .into());
    };
    let members = members.clone();

    let mut portion = region.clone();
    portion.retain_nodes(|id| members.node_group().is_some_and(|n| n.contains(&id)));
    for dimension in 1..=3 {
        portion.retain_elements(dimension, |id| {
            members
                .mesh_group(dimension)
                .is_some_and(|e| e.contains(&id))
        })?;
    }

    let mut buffer = Vec::new();
    document::encode(&portion, &mut buffer, Path::new(MEMORY_ORIGIN))?;
    debug!(group, bytes = buffer.len(), "Wrote group to memory resource");

    Ok(MemoryResource {
        group_name: Some(group.to_string()),
        buffer,
    })
}

/// Decode a region from a memory resource.
///
/// # Errors
///
/// Returns an error if the buffer is not a valid region document.
pub fn read_region_from_memory(resource: &MemoryResource) -> RegionIoResult<Region> {
    document::decode(resource.buffer.as_slice(), Path::new(MEMORY_ORIGIN))
}
