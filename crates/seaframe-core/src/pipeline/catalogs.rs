use std::collections::HashMap;
use std::sync::Arc;

use crate::calibration::CalibrationCatalog;

/// Catalogs loaded during one run, keyed by location.
///
/// Each location is read and parsed once. A failed load is remembered as
/// its error text so every frame pointing at it is rejected with the same
/// reason without touching the file again.
#[derive(Debug, Default)]
pub(crate) struct CatalogCache {
    loaded: HashMap<String, Result<Arc<CalibrationCatalog>, String>>,
}

impl CatalogCache {
    pub(crate) fn get(&mut self, location: &str) -> Result<Arc<CalibrationCatalog>, String> {
        self.loaded
            .entry(location.to_string())
            .or_insert_with(|| {
                tracing::debug!(location, "loading calibration catalog");
                CalibrationCatalog::parse(location)
                    .map(Arc::new)
                    .map_err(|err| err.to_string())
            })
            .clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.loaded.len()
    }
}
