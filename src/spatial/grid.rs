//! Grid collaborator contract and the reference square and cubic grids
//!
//! The generation core never computes adjacency or rotations itself; it asks
//! a [`Grid`]. Two implementations are provided: a 2D square grid (optionally
//! wrapping at its edges) and a 3D cubic grid. Both rotate tiles about the
//! vertical axis with the dihedral group D4.

use crate::spatial::rotation::{Direction, Rotation, RotationGroup};
use crate::spatial::tiles::{FaceLayout, FacePattern, FaceTransform};

/// Integer cell coordinate `[x, y, z]`; also used for tile sub-cell offsets
pub type Cell = [i32; 3];

/// Towards increasing x
pub const X_PLUS: Direction = Direction(0);
/// Towards increasing y
pub const Y_PLUS: Direction = Direction(1);
/// Towards decreasing x
pub const X_MINUS: Direction = Direction(2);
/// Towards decreasing y
pub const Y_MINUS: Direction = Direction(3);
/// Towards increasing z (up)
pub const Z_PLUS: Direction = Direction(4);
/// Towards decreasing z (down)
pub const Z_MINUS: Direction = Direction(5);

// Horizontal directions are listed counterclockwise so a quarter turn maps index i to i + 1
const DIRECTION_VECTORS: [Cell; 6] = [
    [1, 0, 0],
    [0, 1, 0],
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

const SQUARE_DIRECTIONS: [Direction; 4] = [X_PLUS, Y_PLUS, X_MINUS, Y_MINUS];
const CUBE_DIRECTIONS: [Direction; 6] = [X_PLUS, Y_PLUS, X_MINUS, Y_MINUS, Z_PLUS, Z_MINUS];

/// Component-wise sum of two cells
pub const fn add_cells(a: Cell, b: Cell) -> Cell {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise difference of two cells
pub const fn sub_cells(a: Cell, b: Cell) -> Cell {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Cell enumeration, adjacency and symmetry algebra consumed by generation
///
/// Directions must be `Direction(0)..Direction(n)` so they can index tables.
pub trait Grid {
    /// Every outward direction of a cell
    fn directions(&self) -> &[Direction];

    /// Direction pointing back across the same face
    fn inverse(&self, direction: Direction) -> Direction;

    /// Region layout of every face in this grid
    fn face_layout(&self) -> FaceLayout;

    /// Number of cells
    fn cell_count(&self) -> usize;

    /// Dense index of a cell, if it lies in the grid
    fn index_of(&self, cell: Cell) -> Option<usize>;

    /// Cell with a given dense index
    fn cell_at(&self, index: usize) -> Option<Cell>;

    /// Neighbouring cell and the direction leading back, if the neighbour exists
    fn try_move(&self, cell: Cell, direction: Direction) -> Option<(Cell, Direction)>;

    /// Step across a face ignoring the grid bounds
    ///
    /// Used for tile sub-cell offsets, which live in an unbounded lattice.
    fn step_offset(&self, offset: Cell, direction: Direction) -> Cell;

    /// Rotations of the requested subgroup, identity first
    fn rotations(&self, group: RotationGroup) -> Vec<Rotation>;

    /// Rotate an offset about the origin
    fn rotate_offset(&self, rotation: Rotation, offset: Cell) -> Cell;

    /// Direction a face points after rotation
    fn rotate_direction(&self, rotation: Rotation, direction: Direction) -> Direction;

    /// In-plane change a face pattern undergoes when its tile is rotated
    fn face_transform(&self, rotation: Rotation, direction: Direction) -> FaceTransform;

    /// Image of a cell under a rotation about the origin and then a translation
    ///
    /// Returns `None` when the image lies outside the grid.
    fn apply_symmetry(&self, rotation: Rotation, translation: Cell, cell: Cell) -> Option<Cell> {
        let image = add_cells(self.rotate_offset(rotation, cell), translation);
        self.index_of(image).and_then(|index| self.cell_at(index))
    }

    /// Every cell in index order
    fn cells(&self) -> Vec<Cell> {
        (0..self.cell_count())
            .filter_map(|index| self.cell_at(index))
            .collect()
    }

    /// Test whether the grid knows a direction
    fn has_direction(&self, direction: Direction) -> bool {
        self.directions().contains(&direction)
    }

    /// Rotate a painted face, returning its new direction and pattern
    fn rotate_face(
        &self,
        rotation: Rotation,
        direction: Direction,
        pattern: &FacePattern,
    ) -> (Direction, FacePattern) {
        (
            self.rotate_direction(rotation, direction),
            pattern.transformed(self.face_transform(rotation, direction)),
        )
    }
}

fn direction_vector(direction: Direction) -> Cell {
    DIRECTION_VECTORS
        .get(direction.index())
        .copied()
        .unwrap_or([0, 0, 0])
}

fn direction_from_vector(vector: Cell) -> Option<Direction> {
    DIRECTION_VECTORS
        .iter()
        .position(|&v| v == vector)
        .map(|index| Direction(index as u8))
}

const fn inverse_direction(direction: Direction) -> Direction {
    match direction.0 {
        0 => X_MINUS,
        1 => Y_MINUS,
        2 => X_PLUS,
        3 => Y_PLUS,
        4 => Z_MINUS,
        _ => Z_PLUS,
    }
}

const fn rotate_vertical_axis(rotation: Rotation, cell: Cell) -> Cell {
    let [x, y] = rotation.apply_xy([cell[0], cell[1]]);
    [x, y, cell[2]]
}

fn rotate_direction_vertical_axis(rotation: Rotation, direction: Direction) -> Direction {
    direction_from_vector(rotate_vertical_axis(rotation, direction_vector(direction)))
        .unwrap_or(direction)
}

fn d4_rotations(group: RotationGroup) -> Vec<Rotation> {
    Rotation::all().filter(|&r| group.contains(r)).collect()
}

// Side faces are framed with up = +z, so turning about z leaves their paint
// in place and a mirror flips it. Top and bottom faces spin in opposite senses.
fn vertical_axis_face_transform(rotation: Rotation, direction: Direction) -> FaceTransform {
    let turns = i32::from(rotation.turns());
    let steps = match direction {
        Z_PLUS => -turns,
        Z_MINUS => turns,
        _ => 0,
    };
    FaceTransform {
        steps,
        reflect: rotation.is_reflection(),
    }
}

/// Two-dimensional grid of square cells lying in the `z = 0` plane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareGrid {
    width: usize,
    height: usize,
    periodic: bool,
}

impl SquareGrid {
    /// Bounded grid
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            periodic: false,
        }
    }

    /// Grid whose opposite edges are glued together
    pub const fn periodic(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            periodic: true,
        }
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether edges wrap around
    pub const fn is_periodic(&self) -> bool {
        self.periodic
    }
}

impl Grid for SquareGrid {
    fn directions(&self) -> &[Direction] {
        &SQUARE_DIRECTIONS
    }

    fn inverse(&self, direction: Direction) -> Direction {
        inverse_direction(direction)
    }

    fn face_layout(&self) -> FaceLayout {
        FaceLayout::Square
    }

    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let [x, y, z] = cell;
        let in_bounds = x >= 0
            && y >= 0
            && z == 0
            && (x as usize) < self.width
            && (y as usize) < self.height;
        in_bounds.then(|| x as usize + y as usize * self.width)
    }

    fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.cell_count())
            .then(|| [(index % self.width) as i32, (index / self.width) as i32, 0])
    }

    fn try_move(&self, cell: Cell, direction: Direction) -> Option<(Cell, Direction)> {
        if !self.has_direction(direction) || self.cell_count() == 0 {
            return None;
        }
        let mut dest = add_cells(cell, direction_vector(direction));
        if self.periodic {
            dest[0] = dest[0].rem_euclid(self.width as i32);
            dest[1] = dest[1].rem_euclid(self.height as i32);
        }
        self.index_of(dest)
            .map(|_| (dest, inverse_direction(direction)))
    }

    fn step_offset(&self, offset: Cell, direction: Direction) -> Cell {
        add_cells(offset, direction_vector(direction))
    }

    fn rotations(&self, group: RotationGroup) -> Vec<Rotation> {
        d4_rotations(group)
    }

    fn rotate_offset(&self, rotation: Rotation, offset: Cell) -> Cell {
        rotate_vertical_axis(rotation, offset)
    }

    fn rotate_direction(&self, rotation: Rotation, direction: Direction) -> Direction {
        rotate_direction_vertical_axis(rotation, direction)
    }

    fn face_transform(&self, rotation: Rotation, direction: Direction) -> FaceTransform {
        vertical_axis_face_transform(rotation, direction)
    }
}

/// Three-dimensional grid of cubes with z pointing up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubeGrid {
    width: usize,
    height: usize,
    depth: usize,
}

impl CubeGrid {
    /// Bounded grid of `width * height * depth` cubes
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extent along x, y and z
    pub const fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }
}

impl Grid for CubeGrid {
    fn directions(&self) -> &[Direction] {
        &CUBE_DIRECTIONS
    }

    fn inverse(&self, direction: Direction) -> Direction {
        inverse_direction(direction)
    }

    fn face_layout(&self) -> FaceLayout {
        FaceLayout::Square
    }

    fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let [x, y, z] = cell;
        let in_bounds = x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth;
        in_bounds.then(|| x as usize + self.width * (y as usize + self.height * z as usize))
    }

    fn cell_at(&self, index: usize) -> Option<Cell> {
        if index >= self.cell_count() {
            return None;
        }
        let layer = self.width * self.height;
        Some([
            (index % self.width) as i32,
            ((index % layer) / self.width) as i32,
            (index / layer) as i32,
        ])
    }

    fn try_move(&self, cell: Cell, direction: Direction) -> Option<(Cell, Direction)> {
        if !self.has_direction(direction) {
            return None;
        }
        let dest = add_cells(cell, direction_vector(direction));
        self.index_of(dest)
            .map(|_| (dest, inverse_direction(direction)))
    }

    fn step_offset(&self, offset: Cell, direction: Direction) -> Cell {
        add_cells(offset, direction_vector(direction))
    }

    fn rotations(&self, group: RotationGroup) -> Vec<Rotation> {
        d4_rotations(group)
    }

    fn rotate_offset(&self, rotation: Rotation, offset: Cell) -> Cell {
        rotate_vertical_axis(rotation, offset)
    }

    fn rotate_direction(&self, rotation: Rotation, direction: Direction) -> Direction {
        rotate_direction_vertical_axis(rotation, direction)
    }

    fn face_transform(&self, rotation: Rotation, direction: Direction) -> FaceTransform {
        vertical_axis_face_transform(rotation, direction)
    }
}
