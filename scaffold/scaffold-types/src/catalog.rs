//! Ordered, name-indexed collection of fields.
//!
//! A [`FieldCatalog`] keeps fields in insertion order, which is also the
//! order they are stored in region files. Discovery code that picks "the
//! first field that qualifies" relies on this order being stable.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Field, FieldError, FieldResult};

/// The fields of a region.
///
/// # Example
///
/// ```
/// use scaffold_types::{Field, FieldCatalog};
///
/// let mut catalog = FieldCatalog::new();
/// catalog.add(Field::coordinates("coordinates")).unwrap();
/// catalog.add(Field::stored_string("marker_name")).unwrap();
///
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.contains("marker_name"));
/// assert_eq!(
///     catalog.names().collect::<Vec<_>>(),
///     vec!["coordinates", "marker_name"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Field>", into = "Vec<Field>"))]
pub struct FieldCatalog {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field at the end of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DuplicateField`] if the name is taken.
    pub fn add(&mut self, field: Field) -> FieldResult<()> {
        if self.index.contains_key(field.name()) {
            return Err(FieldError::DuplicateField {
                name: field.name().to_string(),
            });
        }
        self.index.insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a field by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.index.get(name).map(|&i| &mut self.fields[i])
    }

    /// Check whether a field exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate fields mutably in catalog order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// Iterate field names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    /// Iterate fields satisfying a structural predicate, in catalog order.
    pub fn matching<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Field>
    where
        P: Fn(&Field) -> bool + 'a,
    {
        self.fields.iter().filter(move |f| predicate(f))
    }

    /// The first field, in catalog order, satisfying a predicate.
    #[must_use]
    pub fn find_first(&self, predicate: impl Fn(&Field) -> bool) -> Option<&Field> {
        self.fields.iter().find(|f| predicate(f))
    }
}

impl From<Vec<Field>> for FieldCatalog {
    /// Build a catalog from an ordered list.
    ///
    /// Later fields with a name already seen are dropped.
    fn from(fields: Vec<Field>) -> Self {
        let mut catalog = Self::new();
        for field in fields {
            let _ = catalog.add(field);
        }
        catalog
    }
}

impl From<FieldCatalog> for Vec<Field> {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.fields
    }
}

impl<'a> IntoIterator for &'a FieldCatalog {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
