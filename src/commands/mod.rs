mod check;
mod fix;
mod kit;

pub use check::run_check;
pub use fix::run_fix;
pub use kit::run_kit;

use std::path::Path;

use brandcheck_lib::input::load_document;
use brandcheck_lib::{BrandError, BrandKit, BrandKitStore, JsonFileRepository};

use crate::cli::KitSource;

/// Resolve the brand kit named on the command line, from the store or a standalone file.
pub(crate) fn resolve_kit(source: &KitSource, store_path: &Path) -> Result<BrandKit, BrandError> {
    let kit = match (&source.kit, &source.kit_file) {
        (_, Some(path)) => load_document::<BrandKit>(path)?,
        (Some(id), None) => BrandKitStore::new(JsonFileRepository::new(store_path)).get(id)?,
        (None, None) => {
            return Err(BrandError::Config(
                "Either --kit or --kit-file is required".to_string(),
            ))
        }
    };
    kit.validate()?;
    Ok(kit)
}
