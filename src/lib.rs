//! token-supplier: silent-first OAuth token acquisition
//!
//! Acquires an access token for the signed-in account by delegating to an
//! external identity library. Silent acquisition is tried first; when it
//! fails with an interaction-required error, the interactive (popup) flow is
//! used instead. The first successful response is held for the lifetime of
//! the consumer.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use token_supplier::prelude::*;
//!
//! # async fn example(client: Arc<dyn IdentityClient>) -> token_supplier::error::Result<()> {
//! let config = SupplierConfig::from_env()?;
//! let provider = IdentityProvider::new(client);
//! let supplier = Arc::new(TokenSupplier::from_config(config));
//! tokio::spawn(supplier.clone().run(provider.subscribe()));
//!
//! if let Some(response) = supplier.response() {
//!     println!("token type {}", response.token_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod util;
