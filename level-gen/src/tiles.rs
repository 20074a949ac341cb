//! Tile and section vocabulary shared by every phase.

use serde::{Deserialize, Serialize};
use wfc_rules::Symbol;

/// Coarse category of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TileArchetype {
    Air,
    Ground,
    Trap,
    /// Placeholder resolved by the special-tile pass.
    Wildcard,
    Treasure,
    Enemy,
    Start,
    End,
    /// "Not applicable"; never a real tile.
    #[default]
    None,
}

impl TileArchetype {
    /// Archetypes a wildcard may resolve to.
    pub const WILDCARD_CANDIDATES: [Self; 5] =
        [Self::Air, Self::Ground, Self::Trap, Self::Treasure, Self::Enemy];

    /// The concrete types legal for this archetype.
    pub const fn legal_types(self) -> &'static [TileType] {
        match self {
            Self::Start => &[TileType::House],
            Self::End => &[TileType::Flag],
            Self::Air => &[
                TileType::NormalAir,
                TileType::Flowers,
                TileType::Mushrooms,
                TileType::Weeds,
            ],
            Self::Ground => &[
                TileType::Dirt,
                TileType::Stone,
                TileType::Grass,
                TileType::Brick,
            ],
            Self::Trap => &[TileType::BlackRose, TileType::Boulder, TileType::Spikes],
            Self::Treasure => &[TileType::Gold, TileType::Chest],
            Self::Enemy => &[TileType::Skeleton],
            Self::Wildcard | Self::None => &[],
        }
    }
}

impl Symbol for TileArchetype {
    const ALPHABET: &'static [Self] = &[
        Self::Air,
        Self::Ground,
        Self::Trap,
        Self::Wildcard,
        Self::Treasure,
        Self::Enemy,
        Self::Start,
        Self::End,
    ];

    fn to_char(self) -> char {
        match self {
            Self::Air => '0',
            Self::Ground => '1',
            Self::Trap => '2',
            Self::Wildcard => '*',
            Self::Treasure => '@',
            Self::Enemy => '!',
            Self::Start => 'S',
            Self::End => 'X',
            Self::None => ' ',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Air),
            '1' => Some(Self::Ground),
            '2' => Some(Self::Trap),
            '*' => Some(Self::Wildcard),
            '@' => Some(Self::Treasure),
            '!' => Some(Self::Enemy),
            'S' => Some(Self::Start),
            'X' => Some(Self::End),
            _ => None,
        }
    }
}

/// Concrete renderable tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TileType {
    Dirt,
    Stone,
    Grass,
    Brick,
    Weeds,
    Mushrooms,
    Flowers,
    NormalAir,
    BlackRose,
    Boulder,
    Spikes,
    Chest,
    Gold,
    Skeleton,
    House,
    Flag,
    #[default]
    None,
}

impl TileType {
    /// The archetype family this type belongs to.
    pub const fn archetype(self) -> TileArchetype {
        match self {
            Self::Dirt | Self::Stone | Self::Grass | Self::Brick => TileArchetype::Ground,
            Self::Weeds | Self::Mushrooms | Self::Flowers | Self::NormalAir => TileArchetype::Air,
            Self::BlackRose | Self::Boulder | Self::Spikes => TileArchetype::Trap,
            Self::Chest | Self::Gold => TileArchetype::Treasure,
            Self::Skeleton => TileArchetype::Enemy,
            Self::House => TileArchetype::Start,
            Self::Flag => TileArchetype::End,
            Self::None => TileArchetype::None,
        }
    }
}

impl Symbol for TileType {
    const ALPHABET: &'static [Self] = &[
        Self::Dirt,
        Self::Stone,
        Self::Grass,
        Self::Brick,
        Self::Weeds,
        Self::Mushrooms,
        Self::Flowers,
        Self::NormalAir,
        Self::BlackRose,
        Self::Boulder,
        Self::Spikes,
        Self::Chest,
        Self::Gold,
        Self::Skeleton,
        Self::House,
        Self::Flag,
    ];

    fn to_char(self) -> char {
        match self {
            Self::Dirt => 'd',
            Self::Stone => 's',
            Self::Grass => 'g',
            Self::Brick => 'b',
            Self::Weeds => 'w',
            Self::Mushrooms => 'm',
            Self::Flowers => 'f',
            Self::NormalAir => 'a',
            Self::BlackRose => '.',
            Self::Boulder => 'o',
            Self::Spikes => '^',
            Self::Chest => 'c',
            Self::Gold => 'G',
            Self::Skeleton => '#',
            Self::House => 'H',
            Self::Flag => 'F',
            Self::None => ' ',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        Self::ALPHABET.iter().copied().find(|t| t.to_char() == c)
    }
}

/// Gameplay role of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SectionType {
    Side,
    Normal,
    Drop,
    Landing,
    Jump,
    JumpLanding,
    Through,
    #[default]
    None,
}

impl SectionType {
    /// Every real section type, in digit order.
    pub const ALL: [Self; 7] = [
        Self::Side,
        Self::Normal,
        Self::Drop,
        Self::Landing,
        Self::Jump,
        Self::JumpLanding,
        Self::Through,
    ];

    /// Digit used in section-grid dumps; `-` for `None`.
    pub const fn to_char(self) -> char {
        match self {
            Self::Side => '0',
            Self::Normal => '1',
            Self::Drop => '2',
            Self::Landing => '3',
            Self::Jump => '4',
            Self::JumpLanding => '5',
            Self::Through => '6',
            Self::None => '-',
        }
    }

    pub fn index(self) -> Option<usize> {
        Self::ALL.iter().position(|&t| t == self)
    }

    /// File stem of the prefab file for this section type.
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Normal => "normal",
            Self::Drop => "drop",
            Self::Landing => "landing",
            Self::Jump => "jump",
            Self::JumpLanding => "jump_landing",
            Self::Through => "through",
            Self::None => "none",
        }
    }
}
