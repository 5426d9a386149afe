//! Brand kit store with injected persistence.
//!
//! The store is constructed once and passed by reference. It owns the
//! one-default-per-owner rule; repositories only load and save snapshots.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use crate::brand_kit::{BrandKit, BrandKitDraft, BrandKitPatch};
use crate::error::{BrandError, Result};

pub trait KitRepository {
    fn load_all(&self) -> Result<Vec<BrandKit>>;
    fn save_all(&self, kits: &[BrandKit]) -> Result<()>;
}

/// Kits stored as a pretty-printed JSON array. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KitRepository for JsonFileRepository {
    fn load_all(&self) -> Result<Vec<BrandKit>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save_all(&self, kits: &[BrandKit]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(kits)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    kits: Mutex<Vec<BrandKit>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KitRepository for MemoryRepository {
    fn load_all(&self) -> Result<Vec<BrandKit>> {
        let kits = self
            .kits
            .lock()
            .map_err(|_| BrandError::Unknown("kit repository lock poisoned".into()))?;
        Ok(kits.clone())
    }

    fn save_all(&self, kits: &[BrandKit]) -> Result<()> {
        let mut stored = self
            .kits
            .lock()
            .map_err(|_| BrandError::Unknown("kit repository lock poisoned".into()))?;
        *stored = kits.to_vec();
        Ok(())
    }
}

#[derive(Debug)]
pub struct BrandKitStore<R: KitRepository> {
    repository: R,
}

impl<R: KitRepository> BrandKitStore<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// The owner's first kit becomes their default.
    pub fn create(&self, owner_id: &str, draft: BrandKitDraft) -> Result<BrandKit> {
        if owner_id.trim().is_empty() {
            return Err(BrandError::invalid_kit("owner id must not be empty"));
        }
        let mut kits = self.repository.load_all()?;
        let now = Utc::now();
        let first_for_owner = !kits.iter().any(|k| k.owner_id == owner_id);
        let kit = BrandKit {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: draft.name,
            primary_color: draft.primary_color,
            secondary_color: draft.secondary_color,
            accent_color: draft.accent_color,
            background_color: draft.background_color,
            text_color: draft.text_color,
            colors: draft.colors,
            heading_font: draft.heading_font,
            body_font: draft.body_font,
            spacing_unit: draft.spacing_unit,
            enforce_strict: draft.enforce_strict,
            is_default: draft.is_default || first_for_owner,
            created_at: now,
            updated_at: now,
        };
        kit.validate()?;

        if kit.is_default {
            clear_defaults(&mut kits, owner_id);
        }
        kits.push(kit.clone());
        self.repository.save_all(&kits)?;
        tracing::debug!(kit = %kit.id, owner = owner_id, "brand kit created");
        Ok(kit)
    }

    pub fn get(&self, id: &str) -> Result<BrandKit> {
        self.repository
            .load_all()?
            .into_iter()
            .find(|k| k.id == id)
            .ok_or_else(|| BrandError::KitNotFound(id.to_string()))
    }

    /// Kits of one owner, oldest first.
    pub fn list(&self, owner_id: &str) -> Result<Vec<BrandKit>> {
        let mut kits: Vec<BrandKit> = self
            .repository
            .load_all()?
            .into_iter()
            .filter(|k| k.owner_id == owner_id)
            .collect();
        kits.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(kits)
    }

    pub fn update(&self, id: &str, patch: BrandKitPatch) -> Result<BrandKit> {
        let mut kits = self.repository.load_all()?;
        let index = position_of(&kits, id)?;

        let mut updated = kits[index].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        updated.updated_at = Utc::now();
        kits[index] = updated.clone();

        self.repository.save_all(&kits)?;
        tracing::debug!(kit = id, "brand kit updated");
        Ok(updated)
    }

    /// Removes a kit. No other kit is promoted when the default is deleted.
    pub fn delete(&self, id: &str) -> Result<BrandKit> {
        let mut kits = self.repository.load_all()?;
        let index = position_of(&kits, id)?;
        let removed = kits.remove(index);
        self.repository.save_all(&kits)?;
        tracing::debug!(kit = id, "brand kit deleted");
        Ok(removed)
    }

    /// Marks `id` as its owner's only default kit.
    pub fn set_default(&self, id: &str) -> Result<BrandKit> {
        let mut kits = self.repository.load_all()?;
        let index = position_of(&kits, id)?;
        let owner = kits[index].owner_id.clone();

        clear_defaults(&mut kits, &owner);
        let now = Utc::now();
        kits[index].is_default = true;
        kits[index].updated_at = now;

        self.repository.save_all(&kits)?;
        Ok(kits[index].clone())
    }

    pub fn default_for(&self, owner_id: &str) -> Result<Option<BrandKit>> {
        Ok(self
            .repository
            .load_all()?
            .into_iter()
            .find(|k| k.owner_id == owner_id && k.is_default))
    }
}

fn position_of(kits: &[BrandKit], id: &str) -> Result<usize> {
    kits.iter()
        .position(|k| k.id == id)
        .ok_or_else(|| BrandError::KitNotFound(id.to_string()))
}

fn clear_defaults(kits: &mut [BrandKit], owner_id: &str) {
    let now = Utc::now();
    for kit in kits.iter_mut().filter(|k| k.owner_id == owner_id && k.is_default) {
        kit.is_default = false;
        kit.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> BrandKitDraft {
        BrandKitDraft {
            name: name.to_string(),
            primary_color: "#6366f1".to_string(),
            heading_font: "Poppins".to_string(),
            body_font: "Inter".to_string(),
            spacing_unit: 8.0,
            ..Default::default()
        }
    }

    fn defaults(store: &BrandKitStore<MemoryRepository>, owner: &str) -> usize {
        store
            .list(owner)
            .unwrap()
            .iter()
            .filter(|k| k.is_default)
            .count()
    }

    #[test]
    fn first_kit_per_owner_becomes_default() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let first = store.create("alice", draft("Main")).unwrap();
        let second = store.create("alice", draft("Campaign")).unwrap();
        let other = store.create("bob", draft("Bob")).unwrap();

        assert!(first.is_default);
        assert!(!second.is_default);
        assert!(other.is_default);
        assert_eq!(store.default_for("alice").unwrap().unwrap().id, first.id);
    }

    #[test]
    fn creating_an_explicit_default_clears_the_previous_one() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let first = store.create("alice", draft("Main")).unwrap();
        let mut d = draft("New default");
        d.is_default = true;
        let second = store.create("alice", d).unwrap();

        assert_eq!(defaults(&store, "alice"), 1);
        assert!(!store.get(&first.id).unwrap().is_default);
        assert!(store.get(&second.id).unwrap().is_default);
    }

    #[test]
    fn set_default_keeps_one_default_per_owner() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let a = store.create("alice", draft("A")).unwrap();
        let b = store.create("alice", draft("B")).unwrap();
        let bob = store.create("bob", draft("Bob")).unwrap();

        store.set_default(&b.id).unwrap();
        assert_eq!(defaults(&store, "alice"), 1);
        assert!(!store.get(&a.id).unwrap().is_default);
        assert!(store.get(&b.id).unwrap().is_default);
        assert!(store.get(&bob.id).unwrap().is_default);
    }

    #[test]
    fn update_applies_patch_and_validates() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let kit = store.create("alice", draft("Main")).unwrap();

        let updated = store
            .update(
                &kit.id,
                BrandKitPatch {
                    accent_color: Some(Some("#f59e0b".into())),
                    enforce_strict: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.accent_color.as_deref(), Some("#f59e0b"));
        assert!(updated.enforce_strict);
        assert!(updated.updated_at >= kit.updated_at);

        let err = store
            .update(
                &kit.id,
                BrandKitPatch {
                    primary_color: Some("purple".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, BrandError::InvalidKit(_)));
        assert_eq!(store.get(&kit.id).unwrap().primary_color, "#6366f1");
    }

    #[test]
    fn create_rejects_invalid_drafts() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let mut bad = draft("Bad");
        bad.primary_color = "#12".into();
        assert!(store.create("alice", bad).is_err());
        assert!(store.create("", draft("No owner")).is_err());
        assert!(store.list("alice").unwrap().is_empty());
    }

    #[test]
    fn delete_removes_kit_and_reports_missing_ids() {
        let store = BrandKitStore::new(MemoryRepository::new());
        let kit = store.create("alice", draft("Main")).unwrap();
        let removed = store.delete(&kit.id).unwrap();
        assert_eq!(removed.id, kit.id);
        assert!(matches!(store.get(&kit.id), Err(BrandError::KitNotFound(_))));
        assert!(matches!(store.delete(&kit.id), Err(BrandError::KitNotFound(_))));
        assert!(store.default_for("alice").unwrap().is_none());
    }

    #[test]
    fn list_is_scoped_to_owner() {
        let store = BrandKitStore::new(MemoryRepository::new());
        store.create("alice", draft("A")).unwrap();
        store.create("alice", draft("B")).unwrap();
        store.create("bob", draft("C")).unwrap();
        let names: Vec<String> = store.list("alice").unwrap().into_iter().map(|k| k.name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"A".to_string()) && names.contains(&"B".to_string()));
    }

    #[test]
    fn json_file_repository_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kits.json");
        let store = BrandKitStore::new(JsonFileRepository::new(&path));
        assert!(store.list("alice").unwrap().is_empty());

        let kit = store.create("alice", draft("Main")).unwrap();
        assert!(path.exists());

        let reopened = BrandKitStore::new(JsonFileRepository::new(&path));
        assert_eq!(reopened.get(&kit.id).unwrap(), kit);
    }
}
