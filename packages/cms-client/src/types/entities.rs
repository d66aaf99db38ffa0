use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{flexible_bool, flexible_u32, published_serde, EntityId, PublishStatus};
use crate::form::ImageInput;
use crate::resource::{Draft, Entity, PublishToggle, Publishable};

published_serde!(Service, Slider, Faq, Testimonial, TeamMember);

fn existing_image(url: &Option<String>) -> ImageInput {
    match url {
        Some(url) if !url.is_empty() => ImageInput::Existing(url.clone()),
        _ => ImageInput::None,
    }
}

// =============================================================================
// News
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub status: PublishStatus,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Draft for NewsDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for News {
    type Draft = NewsDraft;
    const PATH: &'static str = "/news";
    const SINGULAR: &'static str = "news article";
    const PLURAL: &'static str = "news";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> NewsDraft {
        NewsDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            status: self.status,
            image: existing_image(&self.image),
        }
    }
}

impl Publishable for News {
    fn is_published(&self) -> bool {
        self.status.is_published()
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Service {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDraft {
    pub title: String,
    pub description: String,
    pub is_published: bool,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            is_published: true,
            image: ImageInput::None,
        }
    }
}

impl Draft for ServiceDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for Service {
    type Draft = ServiceDraft;
    const PATH: &'static str = "/services";
    const SINGULAR: &'static str = "service";
    const PLURAL: &'static str = "services";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> ServiceDraft {
        ServiceDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            is_published: self.is_published,
            image: existing_image(&self.image),
        }
    }
}

impl Publishable for Service {
    fn is_published(&self) -> bool {
        self.is_published
    }
}

// =============================================================================
// Min-services (short service blurbs on the home page)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinService {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MinServiceDraft {
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Draft for MinServiceDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for MinService {
    type Draft = MinServiceDraft;
    const PATH: &'static str = "/min-services";
    const SINGULAR: &'static str = "min service";
    const PLURAL: &'static str = "min services";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> MinServiceDraft {
        MinServiceDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            image: existing_image(&self.image),
        }
    }
}

// =============================================================================
// Sliders
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Slider {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub button_link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "order", deserialize_with = "flexible_u32")]
    pub sort_order: u32,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderDraft {
    pub title: String,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub sort_order: u32,
    pub is_published: bool,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Default for SliderDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            button_text: None,
            button_link: None,
            sort_order: 0,
            is_published: true,
            image: ImageInput::None,
        }
    }
}

impl Draft for SliderDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for Slider {
    type Draft = SliderDraft;
    const PATH: &'static str = "/sliders";
    const SINGULAR: &'static str = "slider";
    const PLURAL: &'static str = "sliders";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> SliderDraft {
        SliderDraft {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            button_text: self.button_text.clone(),
            button_link: self.button_link.clone(),
            sort_order: self.sort_order,
            is_published: self.is_published,
            image: existing_image(&self.image),
        }
    }
}

impl Publishable for Slider {
    fn is_published(&self) -> bool {
        self.is_published
    }
}

// =============================================================================
// FAQs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Faq {
    pub id: EntityId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
    pub category_id: Option<EntityId>,
    pub is_published: bool,
}

impl Default for FaqDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            category_id: None,
            is_published: true,
        }
    }
}

impl Draft for FaqDraft {}

impl Entity for Faq {
    type Draft = FaqDraft;
    const PATH: &'static str = "/faqs";
    const SINGULAR: &'static str = "FAQ";
    const PLURAL: &'static str = "FAQs";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> FaqDraft {
        FaqDraft {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category_id: self.category_id.clone(),
            is_published: self.is_published,
        }
    }
}

impl Publishable for Faq {
    fn is_published(&self) -> bool {
        self.is_published
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqCategory {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqCategoryDraft {
    pub name: String,
}

impl Draft for FaqCategoryDraft {}

impl Entity for FaqCategory {
    type Draft = FaqCategoryDraft;
    const PATH: &'static str = "/faq-categories";
    const SINGULAR: &'static str = "FAQ category";
    const PLURAL: &'static str = "FAQ categories";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> FaqCategoryDraft {
        FaqCategoryDraft {
            name: self.name.clone(),
        }
    }
}

// =============================================================================
// Testimonials
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Testimonial {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub content: String,
    #[serde(default, deserialize_with = "flexible_u32")]
    pub rating: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestimonialDraft {
    pub name: String,
    pub position: Option<String>,
    pub content: String,
    pub rating: u32,
    pub is_published: bool,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Default for TestimonialDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: None,
            content: String::new(),
            rating: 5,
            is_published: false,
            image: ImageInput::None,
        }
    }
}

impl Draft for TestimonialDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for Testimonial {
    type Draft = TestimonialDraft;
    const PATH: &'static str = "/testimonials";
    const SINGULAR: &'static str = "testimonial";
    const PLURAL: &'static str = "testimonials";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> TestimonialDraft {
        TestimonialDraft {
            name: self.name.clone(),
            position: self.position.clone(),
            content: self.content.clone(),
            rating: self.rating,
            is_published: self.is_published,
            image: existing_image(&self.image),
        }
    }
}

impl Publishable for Testimonial {
    fn is_published(&self) -> bool {
        self.is_published
    }
}

// =============================================================================
// Team members
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct TeamMember {
    pub id: EntityId,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMemberDraft {
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub is_published: bool,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Default for TeamMemberDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: String::new(),
            bio: None,
            is_published: true,
            image: ImageInput::None,
        }
    }
}

impl Draft for TeamMemberDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for TeamMember {
    type Draft = TeamMemberDraft;
    const PATH: &'static str = "/team-members";
    const SINGULAR: &'static str = "team member";
    const PLURAL: &'static str = "team members";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> TeamMemberDraft {
        TeamMemberDraft {
            name: self.name.clone(),
            position: self.position.clone(),
            bio: self.bio.clone(),
            is_published: self.is_published,
            image: existing_image(&self.image),
        }
    }
}

impl Publishable for TeamMember {
    fn is_published(&self) -> bool {
        self.is_published
    }
}

impl PublishToggle for TeamMember {}

// =============================================================================
// Core values
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreValue {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoreValueDraft {
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Draft for CoreValueDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for CoreValue {
    type Draft = CoreValueDraft;
    const PATH: &'static str = "/core-values";
    const SINGULAR: &'static str = "core value";
    const PLURAL: &'static str = "core values";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> CoreValueDraft {
        CoreValueDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            image: existing_image(&self.image),
        }
    }
}

// =============================================================================
// About content
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub vision: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AboutContentDraft {
    pub title: String,
    pub content: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Draft for AboutContentDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for AboutContent {
    type Draft = AboutContentDraft;
    const PATH: &'static str = "/about-us";
    const SINGULAR: &'static str = "about section";
    const PLURAL: &'static str = "about sections";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> AboutContentDraft {
        AboutContentDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            mission: self.mission.clone(),
            vision: self.vision.clone(),
            image: existing_image(&self.image),
        }
    }
}

/// The short "about us" block shown on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeAbout {
    pub id: EntityId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeAboutDraft {
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub image: ImageInput,
}

impl Draft for HomeAboutDraft {
    fn image(&self) -> Option<&ImageInput> {
        Some(&self.image)
    }
}

impl Entity for HomeAbout {
    type Draft = HomeAboutDraft;
    const PATH: &'static str = "/home-about-us";
    const SINGULAR: &'static str = "home about section";
    const PLURAL: &'static str = "home about sections";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> HomeAboutDraft {
        HomeAboutDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            image: existing_image(&self.image),
        }
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    /// Only sent when set; left empty on edit to keep the current password.
    pub password: Option<String>,
}

impl Draft for UserDraft {}

impl Entity for User {
    type Draft = UserDraft;
    const PATH: &'static str = "/users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_published_spelling_is_accepted() {
        let member: TeamMember = serde_json::from_value(json!({
            "id": 3,
            "name": "Ama",
            "position": "Loan officer",
            "isPublished": 1,
        }))
        .unwrap();
        assert!(member.is_published);

        // Only the canonical spelling goes back out
        let out = serde_json::to_value(&member).unwrap();
        assert_eq!(out["is_published"], json!(true));
        assert!(out.get("isPublished").is_none());
    }

    #[test]
    fn test_rows_carrying_both_published_spellings() {
        let faq: Faq = serde_json::from_value(json!({
            "id": 4,
            "question": "Can I repay early?",
            "answer": "Yes",
            "is_published": 1,
            "isPublished": false,
        }))
        .unwrap();
        assert!(faq.is_published);

        let rows: Vec<Testimonial> = serde_json::from_value(json!([
            {"id": 1, "name": "Ama", "content": "Fast", "is_published": 0, "isPublished": 1},
            {"id": 2, "name": "Kofi", "content": "Clear", "isPublished": "1"},
        ]))
        .unwrap();
        assert!(!rows[0].is_published);
        assert!(rows[1].is_published);
    }

    #[test]
    fn test_null_flags_read_as_defaults() {
        let slider: Slider = serde_json::from_value(json!({
            "id": 1,
            "title": "Fund your degree",
            "order": null,
            "is_published": null,
        }))
        .unwrap();
        assert_eq!(slider.sort_order, 0);
        assert!(!slider.is_published);

        let service: Service = serde_json::from_value(json!({
            "id": 2,
            "title": "Tuition loans",
            "description": "Cover fees",
            "is_published": null,
        }))
        .unwrap();
        assert!(!service.is_published);
    }

    #[test]
    fn test_to_draft_keeps_persisted_image_as_existing() {
        let slider: Slider = serde_json::from_value(json!({
            "id": 1,
            "title": "Fund your degree",
            "image": "/storage/sliders/hero.jpg",
            "order": "2",
            "is_published": "1",
        }))
        .unwrap();

        let draft = slider.to_draft();
        assert_eq!(draft.sort_order, 2);
        assert_eq!(
            draft.image,
            ImageInput::Existing("/storage/sliders/hero.jpg".into())
        );
    }

    #[test]
    fn test_draft_image_is_not_serialized() {
        let draft = ServiceDraft {
            title: "Tuition loans".into(),
            description: "Low interest".into(),
            image: ImageInput::Existing("/storage/a.png".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("image").is_none());
        assert_eq!(value["is_published"], json!(true));
    }

    #[test]
    fn test_news_status_maps_to_published() {
        let news: News = serde_json::from_value(json!({
            "id": "n-1",
            "title": "Rates drop",
            "content": "Good news",
            "status": "published",
            "created_at": "2024-05-01T10:00:00Z",
        }))
        .unwrap();
        assert!(news.is_published());
        assert_eq!(news.id, EntityId::Text("n-1".into()));
        assert!(news.created_at.is_some());
    }
}
