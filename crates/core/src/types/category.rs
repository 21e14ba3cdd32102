//! Closed set of product categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category name was not one of the known categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Product category.
///
/// Serialized with its display name (e.g. `"Casa e Jardim"`), which is also
/// the value accepted by the `category` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Eletrônicos")]
    Electronics,
    #[serde(rename = "Roupas")]
    Clothing,
    #[serde(rename = "Casa e Jardim")]
    HomeAndGarden,
    #[serde(rename = "Esportes")]
    Sports,
    #[serde(rename = "Livros")]
    Books,
    #[serde(rename = "Saúde e Beleza")]
    HealthAndBeauty,
    #[serde(rename = "Brinquedos")]
    Toys,
    #[serde(rename = "Automóveis")]
    Automotive,
}

impl ProductCategory {
    /// All categories in catalog display order.
    pub const ALL: [Self; 8] = [
        Self::Electronics,
        Self::Clothing,
        Self::HomeAndGarden,
        Self::Sports,
        Self::Books,
        Self::HealthAndBeauty,
        Self::Toys,
        Self::Automotive,
    ];

    /// Display name as shown in the catalog.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Electronics => "Eletrônicos",
            Self::Clothing => "Roupas",
            Self::HomeAndGarden => "Casa e Jardim",
            Self::Sports => "Esportes",
            Self::Books => "Livros",
            Self::HealthAndBeauty => "Saúde e Beleza",
            Self::Toys => "Brinquedos",
            Self::Automotive => "Automóveis",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
