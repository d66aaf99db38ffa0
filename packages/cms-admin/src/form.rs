//! Required-field validation for create/edit forms.
//!
//! Runs before every submit. A failing form never reaches the network.

use cms_client::types::{
    AboutContentDraft, CoreValueDraft, FaqCategoryDraft, FaqDraft, HomeAboutDraft,
    MinServiceDraft, NewsDraft, ServiceDraft, SliderDraft, TeamMemberDraft, TestimonialDraft,
    UserDraft,
};
use cms_client::ImageInput;
use thiserror::Error;

/// Names of the required fields left empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in the required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// Form-field schema of a draft.
pub trait FormSchema {
    /// Required fields that are empty or whitespace-only, in form order.
    fn missing_fields(&self) -> Vec<&'static str>;

    /// Carry the dialog's image choice into the draft. Drafts without an
    /// image field ignore it.
    fn set_image(&mut self, _image: ImageInput) {}

    fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn collect(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, empty)| *empty)
        .map(|(name, _)| *name)
        .collect()
}

impl FormSchema for NewsDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("content", blank(&self.content)),
            (
                "category",
                self.category.as_deref().map(blank).unwrap_or(true),
            ),
        ])
    }
}

impl FormSchema for ServiceDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
        ])
    }
}

impl FormSchema for MinServiceDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
        ])
    }
}

impl FormSchema for SliderDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[("title", blank(&self.title))])
    }
}

impl FormSchema for FaqDraft {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("question", blank(&self.question)),
            ("answer", blank(&self.answer)),
            ("category", self.category_id.is_none()),
        ])
    }
}

impl FormSchema for FaqCategoryDraft {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[("name", blank(&self.name))])
    }
}

impl FormSchema for TestimonialDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("name", blank(&self.name)),
            ("content", blank(&self.content)),
            ("rating", !(1..=5).contains(&self.rating)),
        ])
    }
}

impl FormSchema for TeamMemberDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("name", blank(&self.name)),
            ("position", blank(&self.position)),
        ])
    }
}

impl FormSchema for CoreValueDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("description", blank(&self.description)),
        ])
    }
}

impl FormSchema for AboutContentDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("content", blank(&self.content)),
        ])
    }
}

impl FormSchema for HomeAboutDraft {
    fn set_image(&mut self, image: ImageInput) {
        self.image = image;
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", blank(&self.title)),
            ("content", blank(&self.content)),
        ])
    }
}

impl FormSchema for UserDraft {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("name", blank(&self.name)),
            ("email", blank(&self.email) || !self.email.contains('@')),
        ])
    }
}
