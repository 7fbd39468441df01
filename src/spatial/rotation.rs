//! Dihedral rotation algebra shared by the square and cubic grids
//!
//! Both reference grids rotate tiles about the vertical axis only, so their
//! rotation group is D4: four quarter turns, each optionally preceded by a
//! mirror across the vertical plane `x = 0`.

use std::fmt;

/// An outward direction of a grid cell
///
/// Directions are indexed `0..n` by the owning grid, so the raw index can be
/// used to address per-direction tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Direction(pub u8);

impl Direction {
    /// Position of this direction in per-direction tables
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dir{}", self.0)
    }
}

/// Element of the dihedral group D4 acting on the horizontal plane
///
/// Maps a point by first mirroring `x -> -x` (when `reflect` is set) and
/// then applying `turns` counterclockwise quarter turns `(x, y) -> (-y, x)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rotation {
    reflect: bool,
    turns: u8,
}

impl Rotation {
    /// The identity element
    pub const IDENTITY: Self = Self {
        reflect: false,
        turns: 0,
    };

    /// Create a rotation from a quarter-turn count and reflection flag
    pub const fn new(turns: u8, reflect: bool) -> Self {
        Self {
            reflect,
            turns: turns % 4,
        }
    }

    /// Number of counterclockwise quarter turns, in `0..4`
    pub const fn turns(self) -> u8 {
        self.turns
    }

    /// Whether the rotation includes a mirror
    pub const fn is_reflection(self) -> bool {
        self.reflect
    }

    /// All eight group elements, proper rotations first
    pub fn all() -> impl Iterator<Item = Self> {
        [false, true]
            .into_iter()
            .flat_map(|reflect| (0..4).map(move |turns| Self::new(turns, reflect)))
    }

    /// Composition `self ∘ inner`: apply `inner` first, then `self`
    #[must_use]
    pub const fn compose(self, inner: Self) -> Self {
        // A mirror conjugates quarter turns into their inverses
        let inner_turns = if self.reflect {
            (4 - inner.turns) % 4
        } else {
            inner.turns
        };
        Self::new(self.turns + inner_turns, self.reflect ^ inner.reflect)
    }

    /// Group inverse
    #[must_use]
    pub const fn inverse(self) -> Self {
        if self.reflect {
            self
        } else {
            Self::new((4 - self.turns) % 4, false)
        }
    }

    /// Apply the rotation to a point of the horizontal plane
    pub const fn apply_xy(self, point: [i32; 2]) -> [i32; 2] {
        let mut x = if self.reflect { -point[0] } else { point[0] };
        let mut y = point[1];
        let mut remaining = self.turns;
        while remaining > 0 {
            let rotated_x = -y;
            y = x;
            x = rotated_x;
            remaining -= 1;
        }
        [x, y]
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees = u32::from(self.turns) * 90;
        if self.reflect {
            write!(f, "mirror+{degrees}°")
        } else {
            write!(f, "{degrees}°")
        }
    }
}

/// Symmetry subgroup a tile is allowed to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RotationGroup {
    /// Only the authored orientation
    Identity,
    /// Authored orientation and its half turn
    HalfTurns,
    /// All four proper rotations
    QuarterTurns,
    /// Proper rotations and their mirror images
    #[default]
    Dihedral,
}

impl RotationGroup {
    /// Test whether a rotation belongs to this subgroup
    pub const fn contains(self, rotation: Rotation) -> bool {
        match self {
            Self::Identity => rotation.turns == 0 && !rotation.reflect,
            Self::HalfTurns => rotation.turns % 2 == 0 && !rotation.reflect,
            Self::QuarterTurns => !rotation.reflect,
            Self::Dihedral => true,
        }
    }
}
