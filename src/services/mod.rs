//! Business logic services

pub mod catalog;
pub mod loans;
pub mod patrons;

use std::sync::Arc;

use crate::{clock::Clock, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub patrons: patrons::PatronsService,
    pub loans: loans::LoansService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            patrons: patrons::PatronsService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), clock),
            repository,
        }
    }

    /// Check that the store answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
