//! Tile definitions and painted face patterns
//!
//! A tile definition is the caller-authored description of one kind of
//! placeable content: the sub-cells it occupies, the paint on each outward
//! face, and the symmetry it is allowed to use. Face patterns support in-plane
//! rotation and reflection so that painted faces can follow their tile
//! through every orientation.

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::Cell;
use crate::spatial::rotation::{Direction, RotationGroup};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Paint index applied to one region of a face
pub type Paint = u16;

/// Paint used for regions nobody painted
pub const BLANK_PAINT: Paint = 0;

/// Row-major 3x3 coordinates of each square ring region
///
/// Ring order is the centre, then edges clockwise from the top, then corners
/// clockwise from the top-right.
const SQUARE_RING: [(usize, usize); 9] = [
    (1, 1),
    (0, 1),
    (1, 2),
    (2, 1),
    (1, 0),
    (0, 2),
    (2, 2),
    (2, 0),
    (0, 0),
];

/// Region layout of a single face
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaceLayout {
    /// Square face painted as a 3x3 grid
    Square,
    /// Hexagonal face with 13 regions
    Hex,
    /// Triangular face with 7 regions
    Triangle,
}

impl FaceLayout {
    /// Number of sides of the face polygon
    pub const fn sides(self) -> usize {
        match self {
            Self::Square => 4,
            Self::Hex => 6,
            Self::Triangle => 3,
        }
    }

    /// Number of paintable regions: centre, one per edge and one per corner
    pub const fn region_count(self) -> usize {
        1 + 2 * self.sides()
    }
}

/// In-plane transformation of a face pattern
///
/// The reflection (if any) is applied before the clockwise rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceTransform {
    /// Clockwise steps of one polygon side each
    pub steps: i32,
    /// Mirror left and right before rotating
    pub reflect: bool,
}

impl FaceTransform {
    /// Transformation that leaves the pattern unchanged
    pub const IDENTITY: Self = Self {
        steps: 0,
        reflect: false,
    };
}

/// Paint on one outward face of one sub-cell
///
/// Regions are stored in ring order: the centre, then the edge regions in
/// clockwise order, then the corner regions in clockwise order, where corner
/// `i` sits between edges `i` and `i + 1`. Every face is authored as seen from
/// outside its own cell.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacePattern {
    layout: FaceLayout,
    regions: Vec<Paint>,
}

impl FacePattern {
    /// Pattern with every region painted the same
    pub fn uniform(layout: FaceLayout, paint: Paint) -> Self {
        Self {
            layout,
            regions: vec![paint; layout.region_count()],
        }
    }

    /// Pattern from regions already in ring order
    ///
    /// # Errors
    ///
    /// Returns an error if the region count does not fit the layout
    pub fn from_regions(layout: FaceLayout, regions: Vec<Paint>) -> Result<Self> {
        if regions.len() != layout.region_count() {
            return Err(invalid_parameter(
                "regions",
                &regions.len(),
                &format!(
                    "{layout:?} faces have {} regions",
                    layout.region_count()
                ),
            ));
        }
        Ok(Self { layout, regions })
    }

    /// Square pattern from a row-major 3x3 grid, top row first
    pub fn square(rows: [[Paint; 3]; 3]) -> Self {
        let regions = SQUARE_RING
            .iter()
            .map(|&(row, col)| {
                rows.get(row)
                    .and_then(|r| r.get(col))
                    .copied()
                    .unwrap_or(BLANK_PAINT)
            })
            .collect();
        Self {
            layout: FaceLayout::Square,
            regions,
        }
    }

    /// Row-major 3x3 view of a square pattern
    pub fn to_square(&self) -> Option<[[Paint; 3]; 3]> {
        if self.layout != FaceLayout::Square {
            return None;
        }
        let mut rows = [[BLANK_PAINT; 3]; 3];
        for (&(row, col), &paint) in SQUARE_RING.iter().zip(&self.regions) {
            if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = paint;
            }
        }
        Some(rows)
    }

    /// Region layout of this pattern
    pub const fn layout(&self) -> FaceLayout {
        self.layout
    }

    /// Paint of every region in ring order
    pub fn regions(&self) -> &[Paint] {
        &self.regions
    }

    /// Paint of the centre region
    pub fn center(&self) -> Paint {
        self.regions.first().copied().unwrap_or(BLANK_PAINT)
    }

    /// Test whether all regions carry one paint
    pub fn is_uniform(&self) -> bool {
        self.regions.windows(2).all(|pair| pair.first() == pair.get(1))
    }

    /// Rotate clockwise by whole polygon sides
    #[must_use]
    pub fn rotated(&self, steps: i32) -> Self {
        let sides = self.layout.sides();
        let shift = steps.rem_euclid(sides as i32) as usize;
        if shift == 0 {
            return self.clone();
        }
        self.remapped(|i| (i + shift) % sides, |i| (i + shift) % sides)
    }

    /// Mirror left and right
    #[must_use]
    pub fn reflected(&self) -> Self {
        let sides = self.layout.sides();
        self.remapped(|i| (sides - i) % sides, |i| sides - 1 - i)
    }

    /// Apply an in-plane transformation
    #[must_use]
    pub fn transformed(&self, transform: FaceTransform) -> Self {
        if transform.reflect {
            self.reflected().rotated(transform.steps)
        } else {
            self.rotated(transform.steps)
        }
    }

    /// Test whether two faces may touch
    ///
    /// Both faces are authored from outside their own cell, so one of them
    /// is mirrored before the regions are compared.
    pub fn matches(&self, facing: &Self, palette: &Palette) -> bool {
        if self.layout != facing.layout {
            return false;
        }
        let mirrored = facing.reflected();
        self.regions
            .iter()
            .zip(&mirrored.regions)
            .all(|(&a, &b)| palette.matches(a, b))
    }

    fn remapped(&self, edge: impl Fn(usize) -> usize, corner: impl Fn(usize) -> usize) -> Self {
        let sides = self.layout.sides();
        let mut regions = self.regions.clone();
        for i in 0..sides {
            if let (Some(&paint), Some(target)) =
                (self.regions.get(1 + i), regions.get_mut(1 + edge(i)))
            {
                *target = paint;
            }
            if let (Some(&paint), Some(target)) = (
                self.regions.get(1 + sides + i),
                regions.get_mut(1 + sides + corner(i)),
            ) {
                *target = paint;
            }
        }
        Self {
            layout: self.layout,
            regions,
        }
    }
}

/// Paint compatibility table
///
/// Identical paints always match; further pairs can be declared and match
/// in both orders.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    pairs: BTreeSet<(Paint, Paint)>,
}

impl Palette {
    /// Palette where only identical paints match
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare two different paints compatible
    #[must_use]
    pub fn with_match(mut self, a: Paint, b: Paint) -> Self {
        self.pairs.insert((a.min(b), a.max(b)));
        self
    }

    /// Test whether two paints may touch
    pub fn matches(&self, a: Paint, b: Paint) -> bool {
        a == b || self.pairs.contains(&(a.min(b), a.max(b)))
    }
}

/// Index of a tile definition within the caller's tile set
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Caller-authored shape, paint and symmetry of one kind of tile
///
/// A single offset describes a simple tile; several offsets describe a big
/// tile occupying multiple grid cells rigidly. Faces that were never painted
/// read as blank.
#[derive(Clone, Debug)]
pub struct TileDefinition {
    name: String,
    offsets: Vec<Cell>,
    faces: BTreeMap<(Cell, Direction), FacePattern>,
    rotatable: bool,
    reflectable: bool,
    rotation_group: RotationGroup,
    symmetric: bool,
    weight: f64,
}

impl TileDefinition {
    /// Single-cell tile at the origin, free to rotate and reflect
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offsets: vec![[0, 0, 0]],
            faces: BTreeMap::new(),
            rotatable: true,
            reflectable: true,
            rotation_group: RotationGroup::Dihedral,
            symmetric: true,
            weight: 1.0,
        }
    }

    /// Replace the occupied sub-cells
    ///
    /// Duplicate offsets are collapsed and the rest kept in sorted order.
    #[must_use]
    pub fn with_offsets(mut self, offsets: impl IntoIterator<Item = Cell>) -> Self {
        let unique: BTreeSet<Cell> = offsets.into_iter().collect();
        self.offsets = unique.into_iter().collect();
        self
    }

    /// Paint one face of one sub-cell
    #[must_use]
    pub fn with_face(mut self, offset: Cell, direction: Direction, pattern: FacePattern) -> Self {
        self.faces.insert((offset, direction), pattern);
        self
    }

    /// Paint every listed direction of every sub-cell with one pattern
    #[must_use]
    pub fn with_all_faces(mut self, directions: &[Direction], pattern: &FacePattern) -> Self {
        for &offset in &self.offsets {
            for &direction in directions {
                self.faces.insert((offset, direction), pattern.clone());
            }
        }
        self
    }

    /// Allow or forbid rotation and reflection
    #[must_use]
    pub const fn with_symmetry(mut self, rotatable: bool, reflectable: bool) -> Self {
        self.rotatable = rotatable;
        self.reflectable = reflectable;
        self
    }

    /// Restrict the symmetry subgroup
    #[must_use]
    pub const fn with_rotation_group(mut self, group: RotationGroup) -> Self {
        self.rotation_group = group;
        self
    }

    /// Declare whether the paint captures the tile's true symmetry
    ///
    /// When false, orientations are never merged even if their paint agrees.
    #[must_use]
    pub const fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Set the relative placement frequency
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Occupied sub-cell offsets in sorted order
    pub fn offsets(&self) -> &[Cell] {
        &self.offsets
    }

    /// Whether the tile covers more than one cell
    pub fn is_big(&self) -> bool {
        self.offsets.len() > 1
    }

    /// Test whether an offset belongs to the tile
    pub fn occupies(&self, offset: Cell) -> bool {
        self.offsets.binary_search(&offset).is_ok()
    }

    /// Explicitly painted faces keyed by sub-cell and direction
    pub const fn faces(&self) -> &BTreeMap<(Cell, Direction), FacePattern> {
        &self.faces
    }

    /// Paint of one face, if it was authored
    pub fn face(&self, offset: Cell, direction: Direction) -> Option<&FacePattern> {
        self.faces.get(&(offset, direction))
    }

    /// Paint of one face, blank when it was never authored
    pub fn face_or_blank(&self, offset: Cell, direction: Direction, layout: FaceLayout) -> FacePattern {
        self.face(offset, direction)
            .cloned()
            .unwrap_or_else(|| FacePattern::uniform(layout, BLANK_PAINT))
    }

    /// Whether rotation is allowed
    pub const fn rotatable(&self) -> bool {
        self.rotatable
    }

    /// Whether reflection is allowed
    pub const fn reflectable(&self) -> bool {
        self.reflectable
    }

    /// Symmetry subgroup restriction
    pub const fn rotation_group(&self) -> RotationGroup {
        self.rotation_group
    }

    /// Whether paint-equivalent orientations may be merged
    pub const fn symmetric(&self) -> bool {
        self.symmetric
    }

    /// Relative placement frequency
    pub const fn weight(&self) -> f64 {
        self.weight
    }
}
