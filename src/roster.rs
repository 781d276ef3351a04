//! Racing characters
//!
//! One character per lane, in lane order (top to bottom).

/// Static identity of a racer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    /// Stable key used for parameters and the sprite cache
    pub id: &'static str,
    /// Display name (its first letter is the fallback glyph)
    pub name: &'static str,
    /// CSS hex color (#rrggbb)
    pub color: &'static str,
    /// Sprite path relative to the page
    pub image: &'static str,
}

impl Character {
    /// Glyph drawn while the sprite is not available
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

pub const ROSTER: [Character; crate::consts::LANE_COUNT] = [
    Character {
        id: "blossom",
        name: "Blossom",
        color: "#ff69b4",
        image: "assets/blossom.png",
    },
    Character {
        id: "bubbles",
        name: "Bubbles",
        color: "#00d2ff",
        image: "assets/bubbles.png",
    },
    Character {
        id: "buttercup",
        name: "Buttercup",
        color: "#32cd32",
        image: "assets/buttercup.png",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_ids_unique() {
        for (i, a) in ROSTER.iter().enumerate() {
            for b in &ROSTER[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_initial_letter() {
        assert_eq!(ROSTER[0].initial(), 'B');
        assert_eq!(ROSTER[2].initial(), 'B');
    }
}
