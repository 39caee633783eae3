use std::sync::Arc;

use shared::domain::Status;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{error::FetchError, transport::StatusSource};

/// The fixed enumeration of known status codes, in the order the service
/// listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    statuses: Vec<Status>,
}

impl Catalog {
    pub fn new(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }

    /// Unknown codes resolve to an empty status; the service may introduce
    /// codes this client has never seen.
    pub fn lookup(&self, code: &str) -> Status {
        self.statuses
            .iter()
            .find(|status| status.code == code)
            .cloned()
            .unwrap_or_default()
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Process-wide status catalog with load-once semantics.
///
/// The first successful load is kept for the life of the value. A failed
/// load leaves nothing cached, so the next caller tries again. Loads are
/// serialized on the inner mutex: callers racing the first load wait for
/// it instead of issuing their own request.
pub struct StatusCatalog {
    source: Arc<dyn StatusSource>,
    cached: Mutex<Option<Arc<Catalog>>>,
}

impl StatusCatalog {
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> Result<Arc<Catalog>, FetchError> {
        let mut cached = self.cached.lock().await;
        if let Some(catalog) = cached.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let statuses = match self.source.fetch_statuses().await {
            Ok(statuses) => statuses,
            Err(err) => {
                warn!("status catalog load failed: {err}");
                return Err(err);
            }
        };
        info!(count = statuses.len(), "status catalog loaded");
        let catalog = Arc::new(Catalog::new(statuses));
        *cached = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    pub async fn resolve(&self, code: &str) -> Result<Status, FetchError> {
        Ok(self.load().await?.lookup(code))
    }

    /// The catalog if a load already succeeded; never touches the network.
    pub async fn cached(&self) -> Option<Arc<Catalog>> {
        self.cached.lock().await.clone()
    }
}
