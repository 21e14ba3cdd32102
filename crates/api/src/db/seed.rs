//! Seed catalog loaded at startup.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use vitrine_core::{Product, ProductCategory, ProductId};

use super::RepositoryError;

struct SeedRow {
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    cents: i64,
    category: ProductCategory,
    image: &'static str,
    stock: u32,
    rating: f64,
    featured: bool,
    created: (u32, u32, u32, u32),
}

const SEED: &[SeedRow] = &[
    SeedRow {
        name: "iPhone 15 Pro",
        description: "Smartphone Apple com chip A17 Pro e câmera de 48MP",
        cents: 899_999,
        category: ProductCategory::Electronics,
        image: "https://images.unsplash.com/photo-1592750475338-74b7b21085ab?w=400&h=300&fit=crop",
        stock: 25,
        rating: 4.8,
        featured: true,
        created: (1, 15, 10, 30),
    },
    SeedRow {
        name: "MacBook Air M3",
        description: "Notebook Apple ultrafino com chip M3 e 16GB de RAM",
        cents: 1_299_999,
        category: ProductCategory::Electronics,
        image: "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=400&h=300&fit=crop",
        stock: 15,
        rating: 4.9,
        featured: true,
        created: (1, 14, 14, 20),
    },
    SeedRow {
        name: "Camiseta Premium",
        description: "Camiseta 100% algodão orgânico, corte slim",
        cents: 8_999,
        category: ProductCategory::Clothing,
        image: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400&h=300&fit=crop",
        stock: 120,
        rating: 4.5,
        featured: false,
        created: (1, 13, 9, 0),
    },
    SeedRow {
        name: "Jaqueta Corta-Vento",
        description: "Jaqueta leve e impermeável para corrida",
        cents: 34_990,
        category: ProductCategory::Clothing,
        image: "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=400&h=300&fit=crop",
        stock: 40,
        rating: 4.3,
        featured: false,
        created: (1, 12, 16, 45),
    },
    SeedRow {
        name: "Jogo de Panelas Inox",
        description: "Conjunto com 5 panelas de aço inox e tampas de vidro",
        cents: 59_900,
        category: ProductCategory::HomeAndGarden,
        image: "https://images.unsplash.com/photo-1584990347449-a5d9f800a783?w=400&h=300&fit=crop",
        stock: 18,
        rating: 4.6,
        featured: true,
        created: (1, 11, 11, 10),
    },
    SeedRow {
        name: "Kit de Jardinagem",
        description: "Ferramentas de jardinagem com luvas e regador",
        cents: 12_990,
        category: ProductCategory::HomeAndGarden,
        image: "https://images.unsplash.com/photo-1416879595882-3373a0480b5b?w=400&h=300&fit=crop",
        stock: 35,
        rating: 4.1,
        featured: false,
        created: (1, 10, 8, 15),
    },
    SeedRow {
        name: "Bicicleta Mountain Bike",
        description: "Bicicleta aro 29 com 21 marchas e freio a disco",
        cents: 249_900,
        category: ProductCategory::Sports,
        image: "https://images.unsplash.com/photo-1576435728678-68d0fbf94e91?w=400&h=300&fit=crop",
        stock: 8,
        rating: 4.7,
        featured: true,
        created: (1, 9, 13, 0),
    },
    SeedRow {
        name: "Tênis de Corrida",
        description: "Tênis com amortecimento responsivo para longas distâncias",
        cents: 49_990,
        category: ProductCategory::Sports,
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=400&h=300&fit=crop",
        stock: 60,
        rating: 4.4,
        featured: false,
        created: (1, 8, 17, 30),
    },
    SeedRow {
        name: "O Senhor dos Anéis",
        description: "Edição única da trilogia completa de J.R.R. Tolkien",
        cents: 14_990,
        category: ProductCategory::Books,
        image: "https://images.unsplash.com/photo-1544947950-fa07a98d237f?w=400&h=300&fit=crop",
        stock: 50,
        rating: 4.9,
        featured: false,
        created: (1, 7, 10, 0),
    },
    SeedRow {
        name: "Kit Skincare Facial",
        description: "Limpador, tônico e hidratante para todos os tipos de pele",
        cents: 18_990,
        category: ProductCategory::HealthAndBeauty,
        image: "https://images.unsplash.com/photo-1556228578-8c89e6adf883?w=400&h=300&fit=crop",
        stock: 45,
        rating: 4.2,
        featured: false,
        created: (1, 6, 15, 20),
    },
    SeedRow {
        name: "LEGO Technic Carro Esportivo",
        description: "Kit de montar com 1.580 peças",
        cents: 89_990,
        category: ProductCategory::Toys,
        image: "https://images.unsplash.com/photo-1587654780291-39c9404d746b?w=400&h=300&fit=crop",
        stock: 12,
        rating: 4.8,
        featured: true,
        created: (1, 5, 12, 40),
    },
    SeedRow {
        name: "Aspirador Automotivo Portátil",
        description: "Aspirador sem fio com carregador veicular 12V",
        cents: 15_990,
        category: ProductCategory::Automotive,
        image: "https://images.unsplash.com/photo-1494976388531-d1058494cdd8?w=400&h=300&fit=crop",
        stock: 0,
        rating: 3.9,
        featured: false,
        created: (1, 4, 9, 5),
    },
];

/// The built-in catalog. IDs are `"1"` through `"12"`.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    SEED.iter()
        .zip(1_u32..)
        .map(|(row, id)| {
            let (month, day, hour, minute) = row.created;
            let created = seed_time(month, day, hour, minute);
            Product {
                id: ProductId::new(id.to_string()),
                name: row.name.to_owned(),
                description: row.description.to_owned(),
                price: Decimal::new(row.cents, 2),
                category: row.category,
                image: row.image.to_owned(),
                stock: row.stock,
                rating: row.rating,
                featured: row.featured,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

fn seed_time(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Load products from a JSON file holding an array of products.
///
/// # Errors
///
/// Returns `RepositoryError::SeedIo` if the file cannot be read,
/// `RepositoryError::SeedFormat` if it is not a product array, and
/// `RepositoryError::SeedInvalid` if ids repeat or a product has a blank
/// name or a non-positive price.
pub async fn load_seed_file(path: &Path) -> Result<Vec<Product>, RepositoryError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| RepositoryError::SeedIo {
            path: path.to_path_buf(),
            source,
        })?;

    let products: Vec<Product> =
        serde_json::from_slice(&raw).map_err(|source| RepositoryError::SeedFormat {
            path: path.to_path_buf(),
            source,
        })?;

    check_seed(&products).map_err(|reason| RepositoryError::SeedInvalid {
        path: path.to_path_buf(),
        reason,
    })?;

    tracing::info!(path = %path.display(), count = products.len(), "Loaded seed file");
    Ok(products)
}

fn check_seed(products: &[Product]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(&product.id) {
            return Err(format!("duplicate product id {}", product.id));
        }
        if product.name.trim().is_empty() {
            return Err(format!("product {} has a blank name", product.id));
        }
        if product.price <= Decimal::ZERO {
            return Err(format!("product {} has a non-positive price", product.id));
        }
    }
    Ok(())
}
