//! Garment definition table.
//!
//! Maps each garment type to its ordered list of parts. Part order is
//! the order pieces are fetched and built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::role::PartRole;

/// IPFS gateway that serves the default pattern SVGs.
pub const INFURA_GATEWAY: &str = "https://thedial.infura-ipfs.io/ipfs/";

/// Garment types with a built-in part list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GarmentType {
    /// Hooded sweatshirt.
    Hoodie,
    /// T-shirt.
    Tshirt,
}

impl GarmentType {
    /// Lowercase identifier used in piece names.
    pub fn as_str(self) -> &'static str {
        match self {
            GarmentType::Hoodie => "hoodie",
            GarmentType::Tshirt => "tshirt",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            GarmentType::Hoodie => "hoodie",
            GarmentType::Tshirt => "t-shirt",
        }
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentType {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hoodie" => Ok(GarmentType::Hoodie),
            "tshirt" | "t-shirt" => Ok(GarmentType::Tshirt),
            other => Err(PatternError::UnknownGarment(other.to_string())),
        }
    }
}

/// One part of a garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Part name, e.g. `sleeve_cuff`.
    pub name: String,
    /// Role resolved from the name.
    pub role: PartRole,
    /// Content address of the pattern SVG.
    pub ipfs: String,
    /// Number of instances to build.
    pub quantity: u32,
    /// Human-readable name.
    pub display_name: String,
    /// Short description.
    pub description: String,
}

impl PartDefinition {
    /// Scene name of instance `index` (1-based).
    ///
    /// Parts with a single instance carry no index suffix.
    pub fn instance_name(&self, garment: GarmentType, index: u32) -> String {
        if self.quantity > 1 {
            format!("{}_{}_{}", garment, self.name, index)
        } else {
            format!("{}_{}", garment, self.name)
        }
    }

    /// Gateway URL of the pattern SVG.
    pub fn url(&self) -> String {
        ipfs_to_gateway_url(&self.ipfs)
    }
}

const HOODIE_PARTS: [(PartRole, &str, u32); 7] = [
    (PartRole::FrontPanel, "QmWwRYcuyNeXzNFbFHn6NomxerQJH7gpdv337uNkygvS3u", 1),
    (PartRole::BackPanel, "QmYpqS8Bvooy8VZuyYB4QCa4AEzyiKYaevLZxTMdSKQ8LW", 1),
    (PartRole::Hood, "QmZCiFkntv59eDymtZKpLbFuy1HHVBgWk7YxJbousgUhmE", 2),
    (PartRole::Pocket, "QmeRcLaAJt2tMEtc6fQs4awzZJHPLUGkGsk7sM4FijBa2S", 1),
    (PartRole::SleeveCuff, "QmR2aM7nPH6PmswKc4115GhdxbCEhwDhFAUqXBGrDZuCws", 2),
    (PartRole::Sleeve, "QmTEAfKjAnJ8Rm7BwgzGCtb1wE5H9J3BkSoEFgeBCeHU2a", 2),
    (PartRole::WaistBand, "QmZQFmPophwckf4UKDCD5YMLPeism2oYNkrgFhN33N52Q6", 1),
];

const TSHIRT_PARTS: [(PartRole, &str, u32); 4] = [
    (PartRole::BackPanel, "QmZR3yzYnKfbMMw48E7gRG71H7VGATgF6jkm3Q8LXAYehy", 1),
    (PartRole::FrontPanel, "QmdrXEuXshhPUDUTsfHKzNVMrmQn68H4oPA92vBbLxBBa4", 1),
    (PartRole::NeckBinding, "QmVkhYT7SfWt4TR2gx6t9fsT76rrmqbaeZmYHLzdaSs84m", 1),
    (PartRole::Sleeve, "Qmd8nXv1mn2D5V3nUYxpGdPmGfksAZkRru3YtRT3Nvf58j", 2),
];

fn display_name(role: PartRole) -> String {
    role.as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn description(role: PartRole, garment: GarmentType) -> String {
    if role == PartRole::NeckBinding {
        return format!("Neck binding pattern piece for {} collar", garment.noun());
    }
    let title = display_name(role);
    let name = format!("{}{}", &title[..1], title[1..].to_ascii_lowercase());
    let mut text = format!("{} pattern piece for {}", name, garment.noun());
    if role.is_panel() {
        text.push_str(" with fold cutting line");
    }
    text
}

/// Ordered part list of a garment type.
pub fn garment_defaults(garment: GarmentType) -> Vec<PartDefinition> {
    let table: &[(PartRole, &str, u32)] = match garment {
        GarmentType::Hoodie => &HOODIE_PARTS,
        GarmentType::Tshirt => &TSHIRT_PARTS,
    };
    table
        .iter()
        .map(|&(role, ipfs, quantity)| PartDefinition {
            name: role.as_str().to_string(),
            role,
            ipfs: ipfs.to_string(),
            quantity,
            display_name: display_name(role),
            description: description(role, garment),
        })
        .collect()
}

/// Gateway URL for an IPFS hash, with or without an `ipfs://` prefix.
pub fn ipfs_to_gateway_url(hash: &str) -> String {
    let hash = hash.strip_prefix("ipfs://").unwrap_or(hash);
    format!("{INFURA_GATEWAY}{hash}")
}
