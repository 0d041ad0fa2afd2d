//! Outfit preferences, the assembled outfit, and the selection algorithm.

mod selector;

pub use selector::build_outfit;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Casual,
    Work,
    Party,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Cold,
    Mild,
    Hot,
    Rainy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Minimal,
    Bold,
    Trendy,
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Occasion::Casual => "casual",
            Occasion::Work => "work",
            Occasion::Party => "party",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Weather::Cold => "cold",
            Weather::Mild => "mild",
            Weather::Hot => "hot",
            Weather::Rainy => "rainy",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Style::Minimal => "minimal",
            Style::Bold => "bold",
            Style::Trendy => "trendy",
        };
        f.write_str(s)
    }
}

/// Preferences collected by the outfit slot-filling flow. Retained after the
/// flow completes so "try another outfit" and style adjustments can rebuild
/// without re-asking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitPreferences {
    pub occasion: Option<Occasion>,
    pub weather: Option<Weather>,
    /// Up to three preferred colors.
    pub colors: Vec<String>,
    pub budget: Option<f64>,
    pub style: Option<Style>,
}

/// One assembled outfit. Complete iff top, bottom and shoes are all filled;
/// the accessory is an optional extra for work/party occasions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub top: Option<Product>,
    pub bottom: Option<Product>,
    pub shoes: Option<Product>,
    pub accessory: Option<Product>,
}

impl Outfit {
    pub fn is_complete(&self) -> bool {
        self.top.is_some() && self.bottom.is_some() && self.shoes.is_some()
    }

    pub fn total_price(&self) -> f64 {
        self.items().map(|(_, p)| p.price).sum()
    }

    /// Names of every picked item, used as the avoid-set when rebuilding.
    pub fn item_names(&self) -> Vec<String> {
        self.items().map(|(_, p)| p.name.clone()).collect()
    }

    /// Filled slots with their display labels, in wear order.
    pub fn items(&self) -> impl Iterator<Item = (&'static str, &Product)> {
        [
            ("Top", self.top.as_ref()),
            ("Bottom", self.bottom.as_ref()),
            ("Shoes", self.shoes.as_ref()),
            ("Accessory", self.accessory.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, item)| item.map(|p| (label, p)))
    }
}
