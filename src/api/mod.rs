//! # HTTP Surface
//!
//! The REST plumbing around the compositing core: multipart upload handling,
//! catalog CRUD endpoints, and serving generated covers back to clients. The
//! core never sees any of this; handlers decode requests, call into the
//! library, and map errors to status codes.

pub mod routes;
pub mod server;
pub mod types;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::ModelCatalog;
use crate::generator::CoverGenerator;
use crate::storage::Storage;

/// Shared state handed to every request handler
///
/// The catalog sits behind an async lock; storage and the generator are
/// stateless handles and need none.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<ModelCatalog>>,
    pub storage: Arc<Storage>,
    pub generator: Arc<CoverGenerator>,
}

impl AppState {
    pub fn new(catalog: ModelCatalog, storage: Storage) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            generator: Arc::new(CoverGenerator::new(storage.clone())),
            storage: Arc::new(storage),
        }
    }
}
