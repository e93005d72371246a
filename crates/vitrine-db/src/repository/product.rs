//! # Product Repository
//!
//! CRUD over the `Produtos` table.
//!
//! ## Column Mapping
//! ```text
//! ┌──────────────┬──────────────────────┬──────────────────────────────────┐
//! │ Produtos     │ Product              │ Notes                            │
//! ├──────────────┼──────────────────────┼──────────────────────────────────┤
//! │ id           │ id                   │ AUTOINCREMENT, never reused      │
//! │ nome         │ name                 │                                  │
//! │ descicao     │ description          │ legacy spelling kept             │
//! │ preco        │ price                │ centavos                         │
//! │ imagem_url   │ image_url            │ NULL until an image is uploaded  │
//! └──────────────┴──────────────────────┴──────────────────────────────────┘
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use vitrine_core::{Money, NewProduct, Product, ProductChanges, ProductId};

/// Raw `Produtos` row.
#[derive(Debug, FromRow)]
struct ProdutoRow {
    id: i64,
    nome: String,
    descicao: String,
    preco: i64,
    imagem_url: Option<String>,
}

impl From<ProdutoRow> for Product {
    fn from(row: ProdutoRow) -> Self {
        Product {
            id: row.id,
            name: row.nome,
            description: row.descicao,
            price: Money::from_cents(row.preco),
            image_url: row.imagem_url,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let id = repo.create(&new_product).await?;
/// let product = repo.get_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns the generated id.
    pub async fn create(&self, product: &NewProduct) -> DbResult<ProductId> {
        debug!(name = %product.name, "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO Produtos (nome, descicao, preco, imagem_url)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.image_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        debug!(id, "Product inserted");
        Ok(id)
    }

    /// Lists every product ordered by id (insertion order).
    ///
    /// The carousel and the listing index into this order, so it must stay
    /// stable between two renders.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProdutoRow> = sqlx::query_as(
            r#"
            SELECT id, nome, descicao, preco, imagem_url
            FROM Produtos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let row: Option<ProdutoRow> = sqlx::query_as(
            r#"
            SELECT id, nome, descicao, preco, imagem_url
            FROM Produtos
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Overwrites name, description and price. The image URL is replaced
    /// only when `changes.image_url` is `Some`.
    ///
    /// ## Returns
    /// `false` when no row has that id (nothing is written).
    pub async fn update(&self, changes: &ProductChanges) -> DbResult<bool> {
        debug!(
            id = changes.id,
            new_image = changes.image_url.is_some(),
            "Updating product"
        );

        let result = sqlx::query(
            r#"
            UPDATE Produtos
            SET
                nome = ?2,
                descicao = ?3,
                preco = ?4,
                imagem_url = COALESCE(?5, imagem_url)
            WHERE id = ?1
            "#,
        )
        .bind(changes.id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price.cents())
        .bind(changes.image_url.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product. The stored image blob is left in place.
    ///
    /// ## Returns
    /// `false` when no row has that id.
    pub async fn delete(&self, id: ProductId) -> DbResult<bool> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM Produtos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products (for the seed tool and health checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Produtos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
