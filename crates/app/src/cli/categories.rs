use std::io;

use storefront::catalog::{Catalog, DatastoreCatalog};

use crate::{config::StorageConfig, render};

pub(crate) fn run(storage: &StorageConfig) -> Result<(), String> {
    let datastore = storage.open_datastore()?;

    let categories = DatastoreCatalog::new(&datastore)
        .categories()
        .map_err(|error| format!("failed to list categories: {error}"))?;

    render::write_categories(&mut io::stdout().lock(), &categories)
        .map_err(|error| format!("failed to write output: {error}"))
}
