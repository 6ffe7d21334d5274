use thiserror::Error;

use crate::model::{AppSettingsError, CatalogError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}
