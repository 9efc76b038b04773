//! 轮胎配方查找表
//!
//! 0–8 的封闭表，未知 id 回退到基准配方 (Soft)。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tyre compound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TyreCompound {
    Hypersoft,
    Ultrasoft,
    Supersoft,
    /// Baseline compound
    #[default]
    Soft,
    Medium,
    Hard,
    Superhard,
    Intermediate,
    Wet,
}

impl TyreCompound {
    /// Every compound in wire-id order
    pub const ALL: [TyreCompound; 9] = [
        Self::Hypersoft,
        Self::Ultrasoft,
        Self::Supersoft,
        Self::Soft,
        Self::Medium,
        Self::Hard,
        Self::Superhard,
        Self::Intermediate,
        Self::Wet,
    ];

    /// Map a wire compound id; unknown ids fall back to the baseline
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .get(usize::from(id))
            .copied()
            .unwrap_or_default()
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hypersoft => "Hypersoft",
            Self::Ultrasoft => "Ultrasoft",
            Self::Supersoft => "Supersoft",
            Self::Soft => "Soft",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Superhard => "Superhard",
            Self::Intermediate => "Intermediate",
            Self::Wet => "Wet",
        }
    }
}

impl fmt::Display for TyreCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TyreCompound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown tyre compound '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_table() {
        assert_eq!(TyreCompound::from_id(0), TyreCompound::Hypersoft);
        assert_eq!(TyreCompound::from_id(3), TyreCompound::Soft);
        assert_eq!(TyreCompound::from_id(4), TyreCompound::Medium);
        assert_eq!(TyreCompound::from_id(8), TyreCompound::Wet);
    }

    #[test]
    fn test_unknown_id_is_baseline() {
        assert_eq!(TyreCompound::from_id(9), TyreCompound::Soft);
        assert_eq!(TyreCompound::from_id(42), TyreCompound::Soft);
        assert_eq!(TyreCompound::from_id(255), TyreCompound::Soft);
    }

    #[test]
    fn test_parse_name() {
        assert_eq!("medium".parse::<TyreCompound>(), Ok(TyreCompound::Medium));
        assert_eq!("Wet".parse::<TyreCompound>(), Ok(TyreCompound::Wet));
        assert!("C3".parse::<TyreCompound>().is_err());
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&TyreCompound::Intermediate).unwrap();
        assert_eq!(json, "\"Intermediate\"");
    }
}
