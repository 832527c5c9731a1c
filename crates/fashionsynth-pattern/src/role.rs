//! Semantic roles of garment parts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// What a pattern piece is, resolved once from its part name.
///
/// Every normalization, positioning and seam decision dispatches on this
/// value instead of on the name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartRole {
    /// Front body panel, authored as a half pattern.
    FrontPanel,
    /// Back body panel, authored as a half pattern.
    BackPanel,
    /// Sleeve.
    Sleeve,
    /// Cuff sewn to the end of a sleeve.
    SleeveCuff,
    /// Front pocket.
    Pocket,
    /// One half of a hood.
    Hood,
    /// Strip along the bottom hem.
    WaistBand,
    /// Strip around the neckline.
    NeckBinding,
}

impl PartRole {
    /// All roles.
    pub const ALL: [PartRole; 8] = [
        PartRole::FrontPanel,
        PartRole::BackPanel,
        PartRole::Sleeve,
        PartRole::SleeveCuff,
        PartRole::Pocket,
        PartRole::Hood,
        PartRole::WaistBand,
        PartRole::NeckBinding,
    ];

    /// Canonical part name.
    pub fn as_str(self) -> &'static str {
        match self {
            PartRole::FrontPanel => "front_panel",
            PartRole::BackPanel => "back_panel",
            PartRole::Sleeve => "sleeve",
            PartRole::SleeveCuff => "sleeve_cuff",
            PartRole::Pocket => "pocket",
            PartRole::Hood => "hood",
            PartRole::WaistBand => "waist_band",
            PartRole::NeckBinding => "neck_binding",
        }
    }

    /// Resolve a role from a part name such as `front_panel` or
    /// `hoodie_sleeve_cuff_2`.
    ///
    /// Exact names win. Otherwise the name is searched for a role
    /// keyword. Cuff is tested before sleeve so `sleeve_cuff` never
    /// resolves to [`PartRole::Sleeve`], and hood is tested last since
    /// `hoodie_` prefixes every hoodie instance name.
    pub fn from_part_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if let Some(role) = Self::ALL.iter().find(|r| r.as_str() == lower) {
            return Some(*role);
        }
        if lower == "waistband" {
            return Some(PartRole::WaistBand);
        }
        const KEYWORDS: [(&str, PartRole); 9] = [
            ("front_panel", PartRole::FrontPanel),
            ("back_panel", PartRole::BackPanel),
            ("cuff", PartRole::SleeveCuff),
            ("sleeve", PartRole::Sleeve),
            ("pocket", PartRole::Pocket),
            ("waist_band", PartRole::WaistBand),
            ("waistband", PartRole::WaistBand),
            ("neck_binding", PartRole::NeckBinding),
            ("hood", PartRole::Hood),
        ];
        KEYWORDS
            .iter()
            .find(|(kw, _)| lower.contains(kw))
            .map(|(_, role)| *role)
    }

    /// Body panels (front or back).
    pub fn is_panel(self) -> bool {
        matches!(self, PartRole::FrontPanel | PartRole::BackPanel)
    }

    /// Sleeve pieces are meshed in the YZ plane instead of XZ.
    pub fn uses_side_plane(self) -> bool {
        self == PartRole::Sleeve
    }
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartRole {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_part_name(s).ok_or_else(|| PatternError::UnknownPart(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names() {
        for role in PartRole::ALL {
            assert_eq!(PartRole::from_part_name(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_cuff_not_mistaken_for_sleeve() {
        assert_eq!(
            PartRole::from_part_name("hoodie_sleeve_cuff_2"),
            Some(PartRole::SleeveCuff)
        );
        assert_eq!(
            PartRole::from_part_name("hoodie_sleeve_1"),
            Some(PartRole::Sleeve)
        );
    }

    #[test]
    fn test_hoodie_prefix_does_not_mean_hood() {
        assert_eq!(
            PartRole::from_part_name("hoodie_waist_band"),
            Some(PartRole::WaistBand)
        );
        assert_eq!(PartRole::from_part_name("hoodie_hood_2"), Some(PartRole::Hood));
    }

    #[test]
    fn test_aliases_and_case() {
        assert_eq!(PartRole::from_part_name("WaistBand"), Some(PartRole::WaistBand));
        assert_eq!(
            PartRole::from_part_name("Tshirt_Neck_Binding"),
            Some(PartRole::NeckBinding)
        );
        assert!(PartRole::from_part_name("collar").is_none());
        assert!("zipper".parse::<PartRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&PartRole::SleeveCuff).unwrap();
        assert_eq!(json, "\"sleeve_cuff\"");
        let back: PartRole = serde_json::from_str("\"neck_binding\"").unwrap();
        assert_eq!(back, PartRole::NeckBinding);
    }
}
