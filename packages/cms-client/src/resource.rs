//! Generic resource service.
//!
//! One [`Resource<T>`] per entity type replaces a hand-written service per
//! REST path. Each call reads the current credential from the shared store
//! and passes it to the client explicitly.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::credential::CredentialStore;
use crate::error::{ApiError, Result};
use crate::form::{FormData, ImageInput};
use crate::transport::ApiScope;
use crate::types::EntityId;

/// Writable fields of an entity, as submitted from a create/edit form.
pub trait Draft: Serialize + Send + Sync {
    /// The image choice, for resources that carry one.
    fn image(&self) -> Option<&ImageInput> {
        None
    }
}

/// A manageable resource type bound to one REST path.
pub trait Entity: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    type Draft: Draft;

    /// Path under the management API, e.g. `/news`
    const PATH: &'static str;
    /// Used in fallback error messages ("Failed to create {SINGULAR}")
    const SINGULAR: &'static str;
    /// Used in fallback error messages ("Failed to fetch {PLURAL}")
    const PLURAL: &'static str;

    fn id(&self) -> &EntityId;

    /// Prefill an edit form from a loaded entity.
    fn to_draft(&self) -> Self::Draft;
}

/// Entities with a visibility flag on the public site.
pub trait Publishable {
    fn is_published(&self) -> bool;
}

/// Entities whose visibility is flipped through a dedicated endpoint rather
/// than a full update.
pub trait PublishToggle: Entity + Publishable {}

/// Encode a draft as a multipart form, image included.
pub fn encode_draft<D: Draft>(draft: &D) -> Result<FormData> {
    let mut form = FormData::from_payload(draft).map_err(|e| ApiError::Encode {
        message: format!("Invalid form data: {}", e),
    })?;
    if let Some(image) = draft.image() {
        form.attach_image(image);
    }
    Ok(form)
}

/// List/create/update/delete contract the admin managers are written against.
#[async_trait]
pub trait ResourceService<T: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>>;
    async fn create(&self, draft: &T::Draft) -> Result<T>;
    async fn update(&self, id: &EntityId, draft: &T::Draft) -> Result<T>;
    async fn delete(&self, id: &EntityId) -> Result<()>;
}

/// Publish-flag contract for [`PublishToggle`] resources.
#[async_trait]
pub trait PublishService<T: PublishToggle>: Send + Sync {
    async fn set_published(&self, id: &EntityId, published: bool) -> Result<T>;
}

/// REST service for one entity type.
pub struct Resource<T> {
    client: ApiClient,
    credentials: Arc<CredentialStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            credentials: self.credentials.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Resource<T> {
    pub fn new(client: ApiClient, credentials: Arc<CredentialStore>) -> Self {
        Self {
            client,
            credentials,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &EntityId) -> String {
        format!("{}/{}", T::PATH, id)
    }

    /// Fetch the whole collection. Filtering is left to the caller.
    pub async fn list(&self) -> Result<Vec<T>> {
        let credential = self.credentials.get();
        let items: Vec<T> = self
            .client
            .get(
                ApiScope::Management,
                T::PATH,
                credential.as_ref(),
                &format!("Failed to fetch {}", T::PLURAL),
            )
            .await?;
        tracing::debug!(path = T::PATH, count = items.len(), "Fetched resource list");
        Ok(items)
    }

    pub async fn get(&self, id: &EntityId) -> Result<T> {
        let credential = self.credentials.get();
        self.client
            .get(
                ApiScope::Management,
                &Self::item_path(id),
                credential.as_ref(),
                &format!("Failed to fetch {}", T::SINGULAR),
            )
            .await
    }

    pub async fn create(&self, draft: &T::Draft) -> Result<T> {
        let fallback = format!("Failed to create {}", T::SINGULAR);
        let form = encode_draft(draft)?;
        let credential = self.credentials.get();
        let created: T = self
            .client
            .create(T::PATH, form, credential.as_ref(), &fallback)
            .await?;
        tracing::info!(path = T::PATH, id = %created.id(), "Created resource");
        Ok(created)
    }

    /// Replace the editable fields of an entity. An `ImageInput::Existing`
    /// URL leaves the stored image untouched.
    pub async fn update(&self, id: &EntityId, draft: &T::Draft) -> Result<T> {
        let fallback = format!("Failed to update {}", T::SINGULAR);
        let form = encode_draft(draft)?;
        let credential = self.credentials.get();
        let updated: T = self
            .client
            .update(&Self::item_path(id), form, credential.as_ref(), &fallback)
            .await?;
        tracing::info!(path = T::PATH, %id, "Updated resource");
        Ok(updated)
    }

    pub async fn delete(&self, id: &EntityId) -> Result<()> {
        let credential = self.credentials.get();
        self.client
            .delete(
                &Self::item_path(id),
                credential.as_ref(),
                &format!("Failed to delete {}", T::SINGULAR),
            )
            .await?;
        tracing::info!(path = T::PATH, %id, "Deleted resource");
        Ok(())
    }
}

impl<T: PublishToggle> Resource<T> {
    /// Flip visibility without resending the other fields.
    pub async fn toggle_publish(&self, id: &EntityId, published: bool) -> Result<T> {
        let path = format!("{}/toggle-publish", Self::item_path(id));
        let form = FormData::new().text("is_published", if published { "1" } else { "0" });
        let credential = self.credentials.get();
        let updated: T = self
            .client
            .patch(
                &path,
                form,
                credential.as_ref(),
                "Failed to update publish status",
            )
            .await?;
        tracing::info!(path = T::PATH, %id, published, "Toggled publish status");
        Ok(updated)
    }
}

#[async_trait]
impl<T: Entity> ResourceService<T> for Resource<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Resource::list(self).await
    }

    async fn create(&self, draft: &T::Draft) -> Result<T> {
        Resource::create(self, draft).await
    }

    async fn update(&self, id: &EntityId, draft: &T::Draft) -> Result<T> {
        Resource::update(self, id, draft).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        Resource::delete(self, id).await
    }
}

#[async_trait]
impl<T: PublishToggle> PublishService<T> for Resource<T> {
    async fn set_published(&self, id: &EntityId, published: bool) -> Result<T> {
        self.toggle_publish(id, published).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FileUpload, IMAGE_FIELD};
    use crate::types::{FaqDraft, TestimonialDraft};

    #[test]
    fn test_encode_draft_includes_upload() {
        let draft = TestimonialDraft {
            name: "Kofi".into(),
            content: "Got my loan in a week".into(),
            image: ImageInput::Upload(FileUpload::new("kofi.jpg", "image/jpeg", vec![9])),
            ..Default::default()
        };
        let form = encode_draft(&draft).unwrap();

        assert_eq!(form.get_text("name"), Some("Kofi"));
        assert_eq!(form.get_text("rating"), Some("5"));
        assert_eq!(form.get_text("is_published"), Some("0"));
        assert_eq!(form.get_text("position"), None);
        assert_eq!(form.file(IMAGE_FIELD).unwrap().file_name, "kofi.jpg");
    }

    #[test]
    fn test_encode_draft_without_image_support() {
        let draft = FaqDraft {
            question: "How do I apply?".into(),
            answer: "Online".into(),
            category_id: Some(EntityId::Number(2)),
            ..Default::default()
        };
        let form = encode_draft(&draft).unwrap();
        assert_eq!(form.get_text("category_id"), Some("2"));
        assert!(!form.has_files());
    }
}
