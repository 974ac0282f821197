//! Die variants and the physical-face to value mapping.
//!
//! Every die reports a value in 1..=6 regardless of its physical face count.
//! Small dice only reach their own face count; large dice repeat low values,
//! over-weighting the wild face. Face value 1 is wild: it counts toward any
//! bid on a face other than 1.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of values in the bid domain (faces 1..=6).
pub const FACES: usize = 6;

/// The wild face. Counts toward every non-wild bid.
pub const WILD_FACE: u8 = 1;

/// Die variant, ordered by physical face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DieKind {
    D3,
    D4,
    D6,
    D8,
    D10,
}

impl DieKind {
    pub const ALL: [DieKind; 5] = [DieKind::D3, DieKind::D4, DieKind::D6, DieKind::D8, DieKind::D10];

    /// Mapping from physical faces to the 1..=6 value domain.
    pub fn face_table(self) -> &'static [u8] {
        match self {
            DieKind::D3 => &[1, 2, 3],
            DieKind::D4 => &[1, 2, 3, 4],
            DieKind::D6 => &[1, 2, 3, 4, 5, 6],
            DieKind::D8 => &[1, 2, 3, 4, 5, 6, 1, 2],
            DieKind::D10 => &[1, 2, 3, 4, 5, 6, 1, 2, 1, 1],
        }
    }

    pub fn sides(self) -> usize {
        self.face_table().len()
    }

    /// Probability of this kind showing `face` on a uniform roll.
    ///
    /// Out-of-domain faces have probability zero.
    pub fn face_probability(self, face: u8) -> f64 {
        let table = self.face_table();
        let hits = table.iter().filter(|&&v| v == face).count();
        hits as f64 / table.len() as f64
    }

    /// Next larger kind (saturates at D10).
    pub fn upgraded(self) -> DieKind {
        match self {
            DieKind::D3 => DieKind::D4,
            DieKind::D4 => DieKind::D6,
            DieKind::D6 => DieKind::D8,
            DieKind::D8 => DieKind::D10,
            DieKind::D10 => DieKind::D10,
        }
    }

    /// Next smaller kind (saturates at D3).
    pub fn downgraded(self) -> DieKind {
        match self {
            DieKind::D3 => DieKind::D3,
            DieKind::D4 => DieKind::D3,
            DieKind::D6 => DieKind::D4,
            DieKind::D8 => DieKind::D6,
            DieKind::D10 => DieKind::D8,
        }
    }
}

/// A single die: its variant and its current face value in 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub kind: DieKind,
    pub value: u8,
}

impl Die {
    /// Fresh die. The value is placeholder until the next round roll.
    pub fn new(kind: DieKind) -> Self {
        Self {
            kind,
            value: WILD_FACE,
        }
    }

    /// Roll uniformly over the kind's face table.
    pub fn roll(&mut self, rng: &mut impl Rng) {
        let table = self.kind.face_table();
        self.value = table[rng.random_range(0..table.len())];
    }

    /// Whether this die counts toward a bid on `face` (wild rule included).
    pub fn matches(self, face: u8) -> bool {
        self.value == face || (face != WILD_FACE && self.value == WILD_FACE)
    }
}

/// Roll a fresh die of the given kind.
pub fn roll_die(kind: DieKind, rng: &mut impl Rng) -> Die {
    let mut die = Die::new(kind);
    die.roll(rng);
    die
}
