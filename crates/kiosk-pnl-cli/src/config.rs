use kiosk_pnl_core::location::{default_catalog, LocationCatalog};

use crate::input;

/// Built-in catalog, or the JSON/YAML catalog at `path`. Either way the
/// catalog is validated before any command sees it.
pub fn load_catalog(path: Option<&str>) -> Result<LocationCatalog, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => input::file::read_structured(path)?,
        None => default_catalog(),
    };
    catalog.validate()?;
    tracing::debug!(
        locations = catalog.locations.len(),
        default = %catalog.default_id,
        "location catalog ready"
    );
    Ok(catalog)
}
