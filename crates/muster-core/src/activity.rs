//! The two independent roster partition schemes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Activity type under which groups and parties are organized.
///
/// The two schemes are fully independent: a member may hold one slot per
/// activity type, and operations on one scheme never touch the other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Guild-war offense rosters.
    Offense,
    /// Guild-war defense rosters.
    Defense,
}

impl ActivityType {
    /// Both partition schemes, in serialization order.
    pub const ALL: [Self; 2] = [Self::Offense, Self::Defense];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offense => "offense",
            Self::Defense => "defense",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityType;

    #[test]
    fn serde_round_trip_uses_snake_case() {
        let json = serde_json::to_string(&ActivityType::Offense).expect("serialize");
        assert_eq!(json, "\"offense\"");
        let back: ActivityType = serde_json::from_str("\"defense\"").expect("deserialize");
        assert_eq!(back, ActivityType::Defense);
    }

    #[test]
    fn all_lists_both_schemes() {
        assert_eq!(ActivityType::ALL.len(), 2);
        assert_ne!(ActivityType::ALL[0], ActivityType::ALL[1]);
    }
}
