use std::path::PathBuf;
use std::process::ExitCode;

use brandcheck_lib::input::load_document;
use brandcheck_lib::output::BRAND_OUTPUT_VERSION;
use brandcheck_lib::{
    BrandError, BrandKit, BrandKitDraft, BrandKitPatch, BrandKitStore, BrandOutput, JsonFileRepository,
    KitListOutput, KitOutput,
};

use crate::cli::{KitAction, OutputFormat};
use crate::formatting::{render_error, write_output};
use crate::settings::{format_effective_config, load_config, resolve_settings};

/// Run a kit management subcommand against the JSON kit store.
pub async fn run_kit(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    store: Option<PathBuf>,
    format: OutputFormat,
    action: KitAction,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let settings = resolve_settings(raw_args, 0.0, store.as_deref(), true, &config);
    if verbose {
        eprintln!(
            "{}",
            format_effective_config(&config, &settings, config_path.as_deref())
        );
    }

    let store = BrandKitStore::new(JsonFileRepository::new(&settings.store_path));
    let body = match execute(&store, action) {
        Ok(body) => body,
        Err(err) => return render_error(err, format, None),
    };
    if let Err(err) = write_output(&body, format, None) {
        return render_error(BrandError::Config(err.to_string()), format, None);
    }
    ExitCode::SUCCESS
}

fn execute(
    store: &BrandKitStore<JsonFileRepository>,
    action: KitAction,
) -> Result<BrandOutput, BrandError> {
    let single = |kit: BrandKit| {
        BrandOutput::Kit(KitOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            kit,
        })
    };

    match action {
        KitAction::Create {
            owner,
            from,
            default,
        } => {
            let mut draft: BrandKitDraft = load_document(&from)?;
            draft.is_default |= default;
            Ok(single(store.create(&owner, draft)?))
        }
        KitAction::List { owner } => Ok(BrandOutput::KitList(KitListOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            kits: store.list(&owner)?,
            owner_id: owner,
        })),
        KitAction::Show { id } => Ok(single(store.get(&id)?)),
        KitAction::Update { id, from } => {
            let patch: BrandKitPatch = load_document(&from)?;
            Ok(single(store.update(&id, patch)?))
        }
        KitAction::Delete { id } => Ok(BrandOutput::KitDeleted(KitOutput {
            version: BRAND_OUTPUT_VERSION.to_string(),
            kit: store.delete(&id)?,
        })),
        KitAction::SetDefault { id } => Ok(single(store.set_default(&id)?)),
    }
}
