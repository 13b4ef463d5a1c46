use serde::{Deserialize, Serialize};

/// One of the two sides on the court.
///
/// Team One attacks the top hoop (toward y = 0), Team Two the bottom hoop
/// (toward y = 600).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    One,
    Two,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::One, TeamId::Two];

    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Numeric id used in labels and logs (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Whether this team attacks toward y = 0.
    pub fn attacks_up(self) -> bool {
        self == Self::One
    }

    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team {}", self.number())
    }
}

/// Team jersey color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TeamColor {
    pub const BLUE: TeamColor = TeamColor {
        r: 59,
        g: 130,
        b: 246,
    };
    pub const RED: TeamColor = TeamColor {
        r: 239,
        g: 68,
        b: 68,
    };
    pub const BALL: TeamColor = TeamColor {
        r: 255,
        g: 136,
        b: 0,
    };

    /// `#rrggbb` form for canvas-style renderers.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Display identity of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub color: TeamColor,
}

/// Both teams' identities, indexed by [`TeamId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    pub one: TeamInfo,
    pub two: TeamInfo,
}

impl Default for Teams {
    fn default() -> Self {
        Self {
            one: TeamInfo {
                name: "Team Blue".to_string(),
                color: TeamColor::BLUE,
            },
            two: TeamInfo {
                name: "Team Red".to_string(),
                color: TeamColor::RED,
            },
        }
    }
}

impl Teams {
    pub fn get(&self, team: TeamId) -> &TeamInfo {
        match team {
            TeamId::One => &self.one,
            TeamId::Two => &self.two,
        }
    }

    pub fn name(&self, team: TeamId) -> &str {
        &self.get(team).name
    }
}
