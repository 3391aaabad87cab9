//! The two opposing sides of a match.

/// Side a unit, feature, or player belongs to.
///
/// Neutral objects (obstacles, map decorations) carry `Option<Side>::None`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Rat,
    Mouse,
}

impl Side {
    /// Returns the opposing side.
    pub const fn other(self) -> Self {
        match self {
            Side::Rat => Side::Mouse,
            Side::Mouse => Side::Rat,
        }
    }

    /// Encodes an optional side as a small integer (0 = neutral).
    ///
    /// Used by the state digest and by map loaders that store sides as numbers.
    pub const fn to_index(side: Option<Side>) -> u8 {
        match side {
            None => 0,
            Some(Side::Rat) => 1,
            Some(Side::Mouse) => 2,
        }
    }

    /// Inverse of [`Side::to_index`]. Unknown values decode to `None`.
    pub const fn from_index(value: u8) -> Option<Side> {
        match value {
            1 => Some(Side::Rat),
            2 => Some(Side::Mouse),
            _ => None,
        }
    }
}

/// One value per side, indexable by [`Side`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideMap<T> {
    pub rat: T,
    pub mouse: T,
}

impl<T> SideMap<T> {
    pub const fn new(rat: T, mouse: T) -> Self {
        Self { rat, mouse }
    }

    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            rat: f(Side::Rat),
            mouse: f(Side::Mouse),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Rat, &self.rat), (Side::Mouse, &self.mouse)].into_iter()
    }
}

impl<T> std::ops::Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Rat => &self.rat,
            Side::Mouse => &self.mouse,
        }
    }
}

impl<T> std::ops::IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Rat => &mut self.rat,
            Side::Mouse => &mut self.mouse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_side_is_involution() {
        assert_eq!(Side::Mouse.other(), Side::Rat);
        assert_eq!(Side::Rat.other(), Side::Mouse);
        assert_eq!(Side::Rat.other().other(), Side::Rat);
    }

    #[test]
    fn index_round_trips() {
        for side in [None, Some(Side::Rat), Some(Side::Mouse)] {
            assert_eq!(Side::from_index(Side::to_index(side)), side);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("RAT".parse::<Side>().unwrap(), Side::Rat);
        assert_eq!("mouse".parse::<Side>().unwrap(), Side::Mouse);
        assert_eq!(Side::Rat.to_string(), "rat");
    }

    #[test]
    fn side_map_indexes_by_side() {
        let mut map = SideMap::from_fn(|side| side.as_ref().len());
        assert_eq!(map[Side::Rat], 3);
        map[Side::Mouse] += 1;
        assert_eq!(map.mouse, 6);
    }
}
