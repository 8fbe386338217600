//! Finite-element meshes of a fixed dimension.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{FieldError, FieldResult};

/// Shape and interpolation basis of an element.
///
/// Lagrange shapes (`Line`, `Square`, `Cube`) use a linear tensor-product
/// basis with local nodes ordered so that xi1 varies fastest. Simplex shapes
/// (`Triangle`, `Tetrahedron`) use a linear barycentric basis with local node
/// 0 at the origin and node `i` at unit xi`i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementShape {
    /// 1-D line, 2 nodes.
    Line,
    /// 2-D square, 4 nodes.
    Square,
    /// 3-D cube, 8 nodes.
    Cube,
    /// 2-D triangle, 3 nodes.
    Triangle,
    /// 3-D tetrahedron, 4 nodes.
    Tetrahedron,
}

impl ElementShape {
    /// Topological dimension of the shape.
    #[must_use]
    pub const fn dimension(self) -> u8 {
        match self {
            Self::Line => 1,
            Self::Square | Self::Triangle => 2,
            Self::Cube | Self::Tetrahedron => 3,
        }
    }

    /// Number of local nodes the basis needs.
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Line => 2,
            Self::Square | Self::Tetrahedron => 4,
            Self::Cube => 8,
            Self::Triangle => 3,
        }
    }

    /// True for the barycentric simplex shapes.
    #[must_use]
    pub const fn is_simplex(self) -> bool {
        matches!(self, Self::Triangle | Self::Tetrahedron)
    }

    /// Element-local coordinates of the shape's centroid.
    #[must_use]
    pub fn centre(self) -> [f64; 3] {
        let d = usize::from(self.dimension());
        let value = if self.is_simplex() {
            1.0 / f64::from(self.dimension() + 1)
        } else {
            0.5
        };
        let mut xi = [0.0; 3];
        for x in xi.iter_mut().take(d) {
            *x = value;
        }
        xi
    }

    /// Basis function weights at `xi`, one per local node.
    ///
    /// Only the first `dimension()` components of `xi` are used.
    ///
    /// # Example
    ///
    /// ```
    /// use scaffold_types::ElementShape;
    ///
    /// let w = ElementShape::Line.basis(&[0.25, 0.0, 0.0]);
    /// assert_eq!(w, vec![0.75, 0.25]);
    /// ```
    #[must_use]
    pub fn basis(self, xi: &[f64; 3]) -> Vec<f64> {
        if self.is_simplex() {
            let d = usize::from(self.dimension());
            let mut weights = Vec::with_capacity(d + 1);
            weights.push(1.0 - xi[..d].iter().sum::<f64>());
            weights.extend_from_slice(&xi[..d]);
            return weights;
        }

        let d = usize::from(self.dimension());
        (0..self.node_count())
            .map(|local| {
                (0..d)
                    .map(|axis| {
                        if (local >> axis) & 1 == 1 {
                            xi[axis]
                        } else {
                            1.0 - xi[axis]
                        }
                    })
                    .product::<f64>()
            })
            .collect()
    }
}

/// A single element: a shape plus the region nodes at its local node positions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Identifier, unique within its mesh.
    pub id: u32,
    /// Element shape.
    pub shape: ElementShape,
    /// Region node identifiers in local node order.
    pub nodes: Vec<u32>,
}

impl Element {
    /// Create an element.
    #[must_use]
    pub fn new(id: u32, shape: ElementShape, nodes: impl Into<Vec<u32>>) -> Self {
        Self {
            id,
            shape,
            nodes: nodes.into(),
        }
    }
}

/// All elements of one dimension in a region.
///
/// Elements are kept ordered by identifier, so [`Mesh::first_element`] and
/// iteration are deterministic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mesh {
    dimension: u8,
    elements: BTreeMap<u32, Element>,
}

impl Mesh {
    /// Create an empty mesh of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidDimension`] unless `dimension` is 1, 2 or 3.
    pub fn new(dimension: u8) -> FieldResult<Self> {
        if !(1..=3).contains(&dimension) {
            return Err(FieldError::InvalidDimension(dimension));
        }
        Ok(Self {
            dimension,
            elements: BTreeMap::new(),
        })
    }

    pub(crate) const fn empty(dimension: u8) -> Self {
        Self {
            dimension,
            elements: BTreeMap::new(),
        }
    }

    /// Mesh dimension.
    #[must_use]
    pub const fn dimension(&self) -> u8 {
        self.dimension
    }

    /// Number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// True if the mesh has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add an element.
    ///
    /// # Errors
    ///
    /// Fails if the shape's dimension differs from the mesh's, the node list
    /// length does not match the shape, or the identifier is taken.
    pub fn add_element(&mut self, element: Element) -> FieldResult<()> {
        if element.shape.dimension() != self.dimension {
            return Err(FieldError::InvalidDimension(element.shape.dimension()));
        }
        if element.nodes.len() != element.shape.node_count() {
            return Err(FieldError::InvalidElement {
                element: element.id,
                expected: element.shape.node_count(),
                got: element.nodes.len(),
            });
        }
        if self.elements.contains_key(&element.id) {
            return Err(FieldError::DuplicateElement {
                dimension: self.dimension,
                element: element.id,
            });
        }
        self.elements.insert(element.id, element);
        Ok(())
    }

    /// Look up an element by identifier.
    #[must_use]
    pub fn element(&self, id: u32) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// The element with the lowest identifier.
    #[must_use]
    pub fn first_element(&self) -> Option<&Element> {
        self.elements.values().next()
    }

    /// Iterate elements in identifier order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterate element identifiers in order.
    pub fn element_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.keys().copied()
    }

    /// Keep only elements whose identifier satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(u32) -> bool) {
        self.elements.retain(|id, _| keep(*id));
    }
}
