//! Generic admin manager.
//!
//! One [`ResourceManager`] per entity type owns the loaded list, the
//! create/edit dialog, the in-flight flags the view uses to disable controls,
//! and the toast queue. Every failure lands in the toast queue as well as the
//! returned `Result`; nothing is left unhandled.

use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

use cms_client::{
    ApiError, Draft, Entity, EntityId, PublishService, PublishToggle, Publishable, ResourceService,
};

use crate::filter::{ListFilter, Searchable};
use crate::form::{FormSchema, ValidationError};
use crate::image::ImageSelection;
use crate::notification::Notifications;
use crate::optimistic::{apply_optimistic, remove_by_id, restore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(EntityId),
}

/// Open create/edit form.
#[derive(Debug, Clone)]
pub struct DialogState<D> {
    pub mode: DialogMode,
    pub draft: D,
    pub image: ImageSelection,
    /// Inline error shown inside the dialog
    pub error: Option<String>,
}

/// How the list is reconciled after a successful create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfterCreate {
    /// Append the returned entity
    #[default]
    Append,
    /// Reload the whole list from the server
    Refetch,
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Another request is still in progress")]
    Busy,

    #[error("No loaded item with id {0}")]
    NotFound(EntityId),

    #[error("No form is open")]
    NoDialog,
}

pub struct ResourceManager<T: Entity, S> {
    service: S,
    items: Vec<T>,
    load_state: LoadState,
    dialog: Option<DialogState<T::Draft>>,
    submitting: bool,
    in_flight: HashSet<EntityId>,
    notifications: Notifications,
    after_create: AfterCreate,
}

impl<T, S> ResourceManager<T, S>
where
    T: Entity,
    T::Draft: FormSchema + Clone,
    S: ResourceService<T>,
{
    pub fn new(service: S) -> Self {
        Self {
            service,
            items: Vec::new(),
            load_state: LoadState::Idle,
            dialog: None,
            submitting: false,
            in_flight: HashSet::new(),
            notifications: Notifications::new(),
            after_create: AfterCreate::default(),
        }
    }

    pub fn with_after_create(mut self, policy: AfterCreate) -> Self {
        self.after_create = policy;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True while a mutation on this item is in flight.
    pub fn is_busy(&self, id: &EntityId) -> bool {
        self.in_flight.contains(id)
    }

    pub fn dialog(&self) -> Option<&DialogState<T::Draft>> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut DialogState<T::Draft>> {
        self.dialog.as_mut()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Filtered view of the loaded list.
    pub fn visible(&self, filter: &ListFilter) -> Vec<&T>
    where
        T: Searchable,
    {
        filter.apply(&self.items)
    }

    /// Fetch the full list. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), ManagerError> {
        self.load_state = LoadState::Loading;
        match self.service.list().await {
            Ok(items) => {
                info!(resource = T::PLURAL, count = items.len(), "Loaded list");
                self.items = items;
                self.load_state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(resource = T::PLURAL, error = %e, "Failed to load list");
                self.load_state = LoadState::LoadFailed(e.message().to_string());
                self.notifications.error(e.message());
                Err(e.into())
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ManagerError> {
        self.load().await
    }

    pub fn open_create(&mut self, draft: T::Draft) {
        self.dialog = Some(DialogState {
            mode: DialogMode::Create,
            draft,
            image: ImageSelection::empty(),
            error: None,
        });
    }

    /// Open the edit form prefilled from the loaded item.
    pub fn open_edit(&mut self, id: &EntityId) -> Result<(), ManagerError> {
        let item = self
            .find(id)
            .ok_or_else(|| ManagerError::NotFound(id.clone()))?;
        let draft = item.to_draft();
        let image = draft
            .image()
            .map(ImageSelection::from_input)
            .unwrap_or_default();
        self.dialog = Some(DialogState {
            mode: DialogMode::Edit(id.clone()),
            draft,
            image,
            error: None,
        });
        Ok(())
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validate and send the open form. The dialog closes on success and
    /// stays open with an inline error otherwise.
    pub async fn submit(&mut self) -> Result<T, ManagerError> {
        if self.submitting {
            return Err(ManagerError::Busy);
        }
        let Some(dialog) = self.dialog.as_mut() else {
            return Err(ManagerError::NoDialog);
        };

        let mut draft = dialog.draft.clone();
        draft.set_image(dialog.image.to_input());
        if let Err(e) = draft.validate() {
            dialog.error = Some(e.to_string());
            self.notifications.error(e.to_string());
            return Err(e.into());
        }
        dialog.error = None;
        let mode = dialog.mode.clone();

        if let DialogMode::Edit(id) = &mode {
            if self.in_flight.contains(id) {
                return Err(ManagerError::Busy);
            }
        }

        let result = {
            let _submitting = Submitting::start(&mut self.submitting);
            match &mode {
                DialogMode::Create => self.service.create(&draft).await,
                DialogMode::Edit(id) => self.service.update(id, &draft).await,
            }
        };

        match result {
            Ok(entity) => {
                let verb = match mode {
                    DialogMode::Create => {
                        self.reconcile_created(entity.clone()).await;
                        "created"
                    }
                    DialogMode::Edit(_) => {
                        self.splice(entity.clone());
                        "updated"
                    }
                };
                self.notifications
                    .success(format!("{} {} successfully", sentence_case(T::SINGULAR), verb));
                self.dialog = None;
                Ok(entity)
            }
            Err(e) => {
                warn!(resource = T::PLURAL, error = %e, "Submit failed");
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.error = Some(e.message().to_string());
                }
                self.notifications.error(e.message());
                Err(e.into())
            }
        }
    }

    /// Delete after the server confirms.
    pub async fn delete(&mut self, id: &EntityId) -> Result<(), ManagerError> {
        self.ensure_loaded(id)?;
        let result = {
            let _claim = Claim::take(&mut self.in_flight, id)?;
            self.service.delete(id).await
        };

        match result {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                self.notifications
                    .success(format!("{} deleted successfully", sentence_case(T::SINGULAR)));
                Ok(())
            }
            Err(e) => {
                warn!(resource = T::PLURAL, %id, error = %e, "Delete failed");
                self.notifications.error(e.message());
                Err(e.into())
            }
        }
    }

    /// Remove from the list first, then delete on the server. If the server
    /// call fails the item goes back where it was.
    pub async fn delete_optimistic(&mut self, id: &EntityId) -> Result<(), ManagerError> {
        self.ensure_loaded(id)?;
        let result = {
            let _claim = Claim::take(&mut self.in_flight, id)?;
            apply_optimistic(
                &mut self.items,
                |items| remove_by_id(items, id),
                self.service.delete(id),
                |items, removed| {
                    if let Some(removed) = removed {
                        restore(items, removed);
                    }
                },
            )
            .await
        };

        match result {
            Ok(()) => {
                self.notifications
                    .success(format!("{} deleted successfully", sentence_case(T::SINGULAR)));
                Ok(())
            }
            Err(e) => {
                warn!(resource = T::PLURAL, %id, error = %e, "Optimistic delete reverted");
                self.notifications.error(e.message());
                Err(e.into())
            }
        }
    }

    fn ensure_loaded(&self, id: &EntityId) -> Result<(), ManagerError> {
        if self.in_flight.contains(id) {
            return Err(ManagerError::Busy);
        }
        if self.find(id).is_none() {
            return Err(ManagerError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn reconcile_created(&mut self, entity: T) {
        if self.after_create == AfterCreate::Refetch {
            match self.service.list().await {
                Ok(items) => {
                    self.items = items;
                    self.load_state = LoadState::Loaded;
                    return;
                }
                Err(e) => {
                    warn!(resource = T::PLURAL, error = %e, "Refetch after create failed, appending locally");
                }
            }
        }
        self.splice(entity);
    }

    /// Replace the item with the same id in place, or append it.
    fn splice(&mut self, entity: T) {
        match self.items.iter().position(|item| item.id() == entity.id()) {
            Some(index) => self.items[index] = entity,
            None => self.items.push(entity),
        }
    }
}

impl<T, S> ResourceManager<T, S>
where
    T: PublishToggle,
    T::Draft: FormSchema + Clone,
    S: ResourceService<T> + PublishService<T>,
{
    /// Flip an item's visibility through the dedicated endpoint.
    pub async fn toggle_publish(&mut self, id: &EntityId) -> Result<T, ManagerError> {
        self.ensure_loaded(id)?;
        let published = self.find(id).map(Publishable::is_published).unwrap_or(false);
        let result = {
            let _claim = Claim::take(&mut self.in_flight, id)?;
            self.service.set_published(id, !published).await
        };

        match result {
            Ok(entity) => {
                self.splice(entity.clone());
                let state = if entity.is_published() { "published" } else { "unpublished" };
                self.notifications
                    .success(format!("{} {}", sentence_case(T::SINGULAR), state));
                Ok(entity)
            }
            Err(e) => {
                warn!(resource = T::PLURAL, %id, error = %e, "Publish toggle failed");
                self.notifications.error(e.message());
                Err(e.into())
            }
        }
    }
}

/// Holds the submit flag for the length of a request. Dropping the guard
/// clears it, so an abandoned submit future does not wedge the form.
struct Submitting<'a>(&'a mut bool);

impl<'a> Submitting<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Marks one item as mutating until dropped.
struct Claim<'a> {
    in_flight: &'a mut HashSet<EntityId>,
    id: EntityId,
}

impl<'a> Claim<'a> {
    fn take(in_flight: &'a mut HashSet<EntityId>, id: &EntityId) -> Result<Self, ManagerError> {
        if !in_flight.insert(id.clone()) {
            return Err(ManagerError::Busy);
        }
        Ok(Self {
            in_flight,
            id: id.clone(),
        })
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("news article"), "News article");
        assert_eq!(sentence_case("FAQ"), "FAQ");
        assert_eq!(sentence_case(""), "");
    }
}
