use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Macro to help with defining bitset types
macro_rules! bitset_traits {
    ($name:ident) => {
        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits & rhs.bits,
                }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                Self {
                    bits: self.bits | rhs.bits,
                }
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.bits |= rhs.bits;
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self { bits: 0 }
            }
        }
    };
}

/// A set of players, e.g. the ones that have completed the match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSet {
    bits: u8,
}

bitset_traits!(PlayerSet);

impl PlayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn insert(self, player: PlayerId) -> Self {
        Self {
            bits: self.bits | (1 << player.index()),
        }
    }

    pub fn contains(self, player: PlayerId) -> bool {
        self.bits & (1 << player.index()) != 0
    }

    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = PlayerId> {
        PlayerId::ALL.into_iter().filter(move |&p| self.contains(p))
    }
}

impl FromIterator<PlayerId> for PlayerSet {
    fn from_iter<I: IntoIterator<Item = PlayerId>>(iter: I) -> Self {
        iter.into_iter()
            .fold(PlayerSet::new(), |set, player| set.insert(player))
    }
}
