//! Organ group tagging.
//!
//! Tagging adds a group named after the organ that covers every 3-D element
//! of the organ mesh, together with the faces, edges and nodes of those
//! elements, and rewrites the organ file.

use std::path::{Path, PathBuf};

use scaffold_io::{
    read_region, read_region_from_memory, write_group_to_memory, write_region_in_place,
};
use scaffold_types::{Field, Region, SubelementHandling};
use tracing::{debug, info};

use crate::{InsertError, InsertResult, OrganName};

/// Name of the conditional field that selects every element.
const SELECT_ALL: &str = "true";

/// Result of tagging one organ file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    /// File that was rewritten.
    pub path: PathBuf,
    /// Group name.
    pub group: String,
    /// 3-D elements in the group.
    pub elements: usize,
    /// 3-D elements newly added by this call.
    pub added: usize,
}

/// Add the organ group to a region.
///
/// Returns `(elements in group, elements newly added)`.
///
/// # Errors
///
/// Fails if a non-group field already has the organ's name.
pub fn tag_region(region: &mut Region, organ: &OrganName) -> InsertResult<(usize, usize)> {
    let name = organ.as_str();
    let group = region.find_or_create_group(name)?;
    if let Some(g) = group.as_group_mut() {
        g.set_subelement_handling(SubelementHandling::Full);
    }

    let added = region.add_elements_conditional(name, 3, &Field::constant(SELECT_ALL, [1.0]))?;
    let elements = region
        .field(name)
        .and_then(Field::as_group)
        .and_then(|g| g.mesh_group(3))
        .map_or(0, std::collections::BTreeSet::len);
    Ok((elements, added))
}

/// Tag the organ file at `path` and rewrite it.
///
/// The organ's group portion is first encoded to memory and read back; the
/// file is only rewritten if the decoded portion still holds the group with
/// all its elements. Tagging an already tagged file leaves the group
/// unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - It has no 3-D elements ([`InsertError::NoVolumeElements`])
/// - The group cannot be created or does not survive encoding
/// - The file cannot be rewritten
pub fn tag_organ_file(path: &Path, organ: &OrganName) -> InsertResult<TagOutcome> {
    let mut region = read_region(path)?;
    if region.mesh(3).is_none_or(scaffold_types::Mesh::is_empty) {
        return Err(InsertError::NoVolumeElements {
            path: path.to_path_buf(),
        });
    }

    let (elements, added) = tag_region(&mut region, organ)?;
    verify_group(&region, organ.as_str(), elements, path)?;
    write_region_in_place(&region, path)?;

    info!(
        path = %path.display(),
        group = organ.as_str(),
        elements,
        added,
        "Tagged organ"
    );

    Ok(TagOutcome {
        path: path.to_path_buf(),
        group: organ.as_str().to_string(),
        elements,
        added,
    })
}

fn verify_group(region: &Region, group: &str, elements: usize, path: &Path) -> InsertResult<()> {
    let resource = write_group_to_memory(region, group)?;
    debug!(group, bytes = resource.len(), "Encoded organ group");

    let portion = read_region_from_memory(&resource)?;
    let survived = portion
        .field(group)
        .and_then(Field::as_group)
        .and_then(|g| g.mesh_group(3))
        .is_some_and(|set| set.len() == elements);
    let mesh_kept = portion.mesh(3).is_some_and(|m| m.size() == elements);

    if survived && mesh_kept {
        Ok(())
    } else {
        Err(InsertError::TagVerification {
            path: path.to_path_buf(),
            group: group.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_io::write_region;
    use scaffold_types::{unit_cube_region, Element, ElementShape};
    use tempfile::tempdir;

    fn heart() -> OrganName {
        OrganName::Keyword("heart".to_string())
    }

    #[test]
    fn test_tag_region_covers_volume_and_nodes() {
        let mut region = unit_cube_region("heart");
        let (elements, added) = tag_region(&mut region, &heart()).unwrap();
        assert_eq!((elements, added), (1, 1));

        let group = region.field("heart").unwrap().as_group().unwrap();
        assert_eq!(group.subelement_handling(), SubelementHandling::Full);
        assert_eq!(group.node_group().unwrap().len(), 8);
    }

    #[test]
    fn test_tag_region_includes_faces() {
        let mut region = unit_cube_region("heart");
        region
            .mesh_mut(2)
            .unwrap()
            .add_element(Element::new(7, ElementShape::Square, vec![1, 2, 3, 4]))
            .unwrap();
        tag_region(&mut region, &heart()).unwrap();

        let group = region.field("heart").unwrap().as_group().unwrap();
        assert!(group.mesh_group(2).unwrap().contains(&7));
    }

    #[test]
    fn test_tagging_twice_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heart.exf");
        write_region(&unit_cube_region("heart"), &path).unwrap();

        let first = tag_organ_file(&path, &heart()).unwrap();
        let after_first = read_region(&path).unwrap();
        let second = tag_organ_file(&path, &heart()).unwrap();

        assert_eq!(first.elements, 1);
        assert_eq!(second.elements, 1);
        assert_eq!(second.added, 0);
        assert_eq!(read_region(&path).unwrap(), after_first);
    }

    #[test]
    fn test_retagging_keeps_geometry_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heart.exf");
        let mut region = unit_cube_region("heart");
        for node in 1..=8_u32 {
            let t = f64::from(node);
            let x = [t / 3.0 + 0.1, (t * 0.7).sin() * 41.3, 1.0 / (t + 0.123_456_789)];
            region.set_node_values("coordinates", node, &x).unwrap();
        }
        write_region(&region, &path).unwrap();
        let original = region.field("coordinates").unwrap().clone();

        for _ in 0..5 {
            tag_organ_file(&path, &heart()).unwrap();
            let tagged = read_region(&path).unwrap();
            assert_eq!(tagged.field("coordinates"), Some(&original));
        }
    }

    #[test]
    fn test_surface_only_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("skin.exf");
        let mut region = Region::new("skin");
        for node in 1..=3 {
            region.create_node(node);
        }
        region
            .mesh_mut(2)
            .unwrap()
            .add_element(Element::new(1, ElementShape::Triangle, vec![1, 2, 3]))
            .unwrap();
        write_region(&region, &path).unwrap();

        let err = tag_organ_file(&path, &OrganName::Basename("skin".to_string())).unwrap_err();
        assert!(matches!(err, InsertError::NoVolumeElements { .. }));
        assert_eq!(read_region(&path).unwrap(), region);
    }

    #[test]
    fn test_name_clash_with_other_field() {
        let mut region = unit_cube_region("heart");
        let err = tag_region(&mut region, &OrganName::Basename("coordinates".to_string()))
            .unwrap_err();
        assert!(matches!(err, InsertError::Field(_)));
    }
}
