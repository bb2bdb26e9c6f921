//! A browsing session over the store.
//!
//! The session keeps the last loaded snapshot, the view parameters and the
//! selection. Mutations go to the store first; the snapshot is only touched
//! once the store call has succeeded.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::crewmate::{Crewmate, CrewmateDraft, CrewmateId, CrewmatePatch};
use crate::error::{Error, Result};
use crate::storage::CrewmateStore;
use crate::transfer;
use crate::view::{CollectionView, ViewParams};

/// A gallery session.
#[derive(Debug)]
pub struct Gallery<'s, S: CrewmateStore + ?Sized> {
    store: &'s S,
    crewmates: Vec<Crewmate>,
    params: ViewParams,
    selection: BTreeSet<CrewmateId>,
}

impl<'s, S: CrewmateStore + ?Sized> Gallery<'s, S> {
    /// Start a session and load the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: &'s S) -> Result<Self> {
        let crewmates = store.list()?;
        debug!("Gallery loaded {} crewmates", crewmates.len());
        Ok(Self {
            store,
            crewmates,
            params: ViewParams::default(),
            selection: BTreeSet::new(),
        })
    }

    /// Re-fetch the collection.
    ///
    /// Selected ids that no longer exist are dropped. On failure the previous
    /// snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn reload(&mut self) -> Result<()> {
        self.crewmates = self.store.list()?;
        let live: BTreeSet<&CrewmateId> = self.crewmates.iter().map(|c| &c.id).collect();
        self.selection.retain(|id| live.contains(id));
        Ok(())
    }

    /// The loaded snapshot, newest first.
    #[must_use]
    pub fn crewmates(&self) -> &[Crewmate] {
        &self.crewmates
    }

    /// Current view parameters.
    #[must_use]
    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Replace the view parameters.
    pub fn set_params(&mut self, params: ViewParams) {
        self.params = params;
    }

    /// The filtered and sorted snapshot.
    #[must_use]
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Crewmate> {
        self.params.apply(&self.crewmates, now)
    }

    /// The visible set with its aggregates.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> CollectionView {
        CollectionView::compute(&self.crewmates, &self.params, now)
    }

    /// Selected ids.
    #[must_use]
    pub fn selection(&self) -> &BTreeSet<CrewmateId> {
        &self.selection
    }

    /// Selected crewmates present in the snapshot, in snapshot order.
    #[must_use]
    pub fn selected(&self) -> Vec<&Crewmate> {
        self.crewmates
            .iter()
            .filter(|c| self.selection.contains(&c.id))
            .collect()
    }

    /// Add an id to the selection.
    pub fn select(&mut self, id: CrewmateId) {
        self.selection.insert(id);
    }

    /// Remove an id from the selection.
    pub fn deselect(&mut self, id: &CrewmateId) {
        self.selection.remove(id);
    }

    /// Select exactly the visible set.
    pub fn select_all(&mut self, now: DateTime<Utc>) {
        self.selection = self.visible_ids(now);
    }

    /// Select the visible set, or clear the selection if it already is the
    /// visible set.
    pub fn toggle_select_all(&mut self, now: DateTime<Utc>) {
        let visible = self.visible_ids(now);
        if self.selection == visible {
            self.selection.clear();
        } else {
            self.selection = visible;
        }
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn visible_ids(&self, now: DateTime<Utc>) -> BTreeSet<CrewmateId> {
        self.visible(now).into_iter().map(|c| c.id.clone()).collect()
    }

    /// Flip a crewmate's favorite flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the crewmate is not in the snapshot, or
    /// the store error; the snapshot is unchanged in both cases.
    pub fn toggle_favorite(&mut self, id: &CrewmateId) -> Result<&Crewmate> {
        let index = self
            .crewmates
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| Error::not_found(id.as_str()))?;
        let patch = CrewmatePatch::favorite(!self.crewmates[index].is_favorite);
        let updated = self.store.update(id, &patch)?;

        let local = &mut self.crewmates[index];
        patch.apply_to(local);
        local.updated_at = updated.updated_at;
        Ok(local)
    }

    /// Delete one crewmate.
    ///
    /// # Errors
    ///
    /// Returns the store error; the snapshot is unchanged in that case.
    pub fn delete(&mut self, id: &CrewmateId) -> Result<bool> {
        let removed = self.store.delete(id)?;
        self.crewmates.retain(|c| c.id != *id);
        self.selection.remove(id);
        Ok(removed)
    }

    /// Delete a set of crewmates in one store transaction.
    ///
    /// Returns the number the store removed.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is removed in that case.
    pub fn bulk_delete(&mut self, ids: &BTreeSet<CrewmateId>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let list: Vec<CrewmateId> = ids.iter().cloned().collect();
        let removed = self.store.delete_many(&list)?;
        self.crewmates.retain(|c| !ids.contains(&c.id));
        self.selection.retain(|id| !ids.contains(id));
        info!("Bulk deleted {removed} crewmates");
        Ok(removed)
    }

    /// Delete every selected crewmate.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is removed in that case.
    pub fn delete_selected(&mut self) -> Result<usize> {
        let ids = self.selection.clone();
        self.bulk_delete(&ids)
    }

    /// Validate and create a crewmate, then reload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] before any store call, or the store error.
    pub fn create(&mut self, draft: &CrewmateDraft) -> Result<Crewmate> {
        draft.validate()?;
        let created = self.store.create(draft)?;
        self.reload()?;
        Ok(created)
    }

    /// Validate and apply an edit, then reload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] before any store call, or the store error.
    pub fn update(&mut self, id: &CrewmateId, patch: &CrewmatePatch) -> Result<Crewmate> {
        patch.validate()?;
        let updated = self.store.update(id, patch)?;
        self.reload()?;
        Ok(updated)
    }

    /// Import a JSON batch, then reload.
    ///
    /// The batch is validated in full before anything is created.
    ///
    /// # Errors
    ///
    /// Returns the import validation error or the first store error.
    pub fn import(&mut self, text: &str) -> Result<Vec<Crewmate>> {
        let drafts = transfer::parse_import(text)?;
        let result = transfer::import_into(self.store, &drafts);
        self.reload()?;
        result
    }
}
