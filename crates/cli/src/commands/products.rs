//! Single-product and listing commands.
//!
//! # Usage
//!
//! ```bash
//! vitrine products list --search apple --page 2
//! vitrine products show 1
//! vitrine products create -n "Livro" -d "Romance" -p 49.90 -c Livros --stock 5
//! vitrine products update 1 --stock 0
//! vitrine products delete 1
//! vitrine categories
//! ```

use clap::Args;
use rust_decimal::Decimal;
use tracing::info;
use vitrine_core::{
    CreateProductData, Product, ProductCategory, ProductId, SortField, SortOrder,
    UpdateProductData,
};
use vitrine_dashboard::ProductsStore;

use super::{CommandError, connect};

/// Listing filters, sort and page.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Match against name, description and category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category display name, e.g. "Eletrônicos" (default: all)
    #[arg(short, long)]
    pub category: Option<ProductCategory>,

    /// Minimum price (inclusive)
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Maximum price (inclusive)
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// name, price, rating or createdAt
    #[arg(long, default_value = "name")]
    pub sort_by: SortField,

    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub sort_order: SortOrder,

    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Products per page (default: VITRINE_PAGE_SIZE)
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Fields of a new product.
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub description: String,

    #[arg(short, long)]
    pub price: Decimal,

    #[arg(short, long)]
    pub category: ProductCategory,

    /// Image URL (default: placeholder image)
    #[arg(long)]
    pub image: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    #[arg(long)]
    pub featured: bool,
}

impl CreateArgs {
    fn into_data(self) -> CreateProductData {
        CreateProductData {
            image: self.image,
            stock: Some(i64::from(self.stock)),
            featured: Some(self.featured),
            ..CreateProductData::new(self.name, self.description, self.price, self.category)
        }
    }
}

/// Fields to change; omitted fields are left untouched.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<Decimal>,

    #[arg(long)]
    pub category: Option<ProductCategory>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub stock: Option<u32>,

    #[arg(long)]
    pub featured: Option<bool>,
}

impl UpdateArgs {
    /// Build the update payload, rejecting one that changes nothing.
    pub fn into_data(self) -> Result<UpdateProductData, CommandError> {
        let data = UpdateProductData {
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category.map(|c| c.name().to_owned()),
            image: self.image,
            stock: self.stock.map(i64::from),
            featured: self.featured,
        };
        if data.is_empty() {
            return Err(CommandError::InvalidArguments(
                "Nothing to update: pass at least one field".to_string(),
            ));
        }
        Ok(data)
    }
}

fn log_product(product: &Product) {
    info!(
        "{} | {} | R$ {} | {} | stock {} | rating {}{}",
        product.id,
        product.name,
        product.price,
        product.category,
        product.stock,
        product.rating,
        if product.featured { " | featured" } else { "" }
    );
}

/// List one page of products.
pub async fn list(args: ListArgs) -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, args.limit.unwrap_or(config.page_size));

    store.update_filters(|filters| {
        filters.search = args.search.unwrap_or_default();
        filters.category = args.category;
        filters.min_price = args.min_price;
        filters.max_price = args.max_price;
    });
    store.update_sort(args.sort_by, args.sort_order);
    store.fetch_products(args.page).await;

    if let Some(error) = store.error() {
        return Err(CommandError::Request(error.to_string()));
    }

    for product in store.products() {
        log_product(product);
    }

    let meta = store.pagination();
    info!(
        "Page {} of {} ({} products)",
        meta.current_page, meta.total_pages, meta.total_items
    );
    Ok(())
}

/// Show a single product.
pub async fn show(id: &ProductId) -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, config.page_size);

    store.fetch_product(id).await;

    match store.current_product() {
        Some(product) => {
            log_product(product);
            info!("{}", product.description);
            info!("Image: {}", product.image);
            info!(
                "Created {} / updated {}",
                product.created_at.to_rfc3339(),
                product.updated_at.to_rfc3339()
            );
            Ok(())
        }
        None => Err(CommandError::Request(
            store
                .error()
                .unwrap_or("Product not found")
                .to_string(),
        )),
    }
}

/// Create a product.
pub async fn create(args: CreateArgs) -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, config.page_size);

    let product = store.create_product(&args.into_data()).await?;

    info!("Created product {}", product.id);
    log_product(&product);
    Ok(())
}

/// Update fields of a product.
pub async fn update(id: &ProductId, changes: UpdateArgs) -> Result<(), CommandError> {
    let data = changes.into_data()?;
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, config.page_size);

    let product = store.update_product(id, &data).await?;

    info!("Updated product {}", product.id);
    log_product(&product);
    Ok(())
}

/// Delete a product.
pub async fn delete(id: &ProductId) -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, config.page_size);

    let product = store.delete_product(id).await?;

    info!("Deleted product {} ({})", product.id, product.name);
    Ok(())
}

/// List the catalog's categories.
pub async fn categories() -> Result<(), CommandError> {
    let (config, service) = connect()?;
    let mut store = ProductsStore::new(service, config.page_size);

    store.fetch_categories().await;

    if let Some(error) = store.error() {
        return Err(CommandError::Request(error.to_string()));
    }
    for category in store.categories() {
        info!("{category}");
    }
    Ok(())
}
