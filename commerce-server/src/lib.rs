//! Commerce Server - multi-store catalog and commerce backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): SQLite via sqlx, migrations, repositories
//! - **Catalog engine** (`catalog`): attribute grouping, set inference,
//!   variant generation
//! - **Translations** (`translations`): TTL cache over the translation tables
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! commerce-server/src/
//! ├── core/          # Config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # Attribute/variant engine
//! ├── translations/  # Translation cache
//! ├── utils/         # Logging, validation, response envelope
//! └── db/            # Database layer (models, repositories)
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod translations;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};
