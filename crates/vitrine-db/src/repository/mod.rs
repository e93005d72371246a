//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront handler                                                     │
//! │       │                                                                 │
//! │       │  db.products().list()                                           │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── create(&self, new_product)      → generated id                     │
//! │  ├── list(&self)                     → every row, by id                 │
//! │  ├── get_by_id(&self, id)            → Option<Product>                  │
//! │  ├── update(&self, changes)          → row existed?                     │
//! │  └── delete(&self, id)               → row existed?                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite `Produtos`                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
