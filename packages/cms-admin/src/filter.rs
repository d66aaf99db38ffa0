//! Client-side search over an already-loaded list.
//!
//! Case-insensitive substring match on any of an item's text fields, AND-ed
//! with an optional exact category match. Never touches the source list.

use cms_client::types::{Faq, News, Service, TeamMember, Testimonial, User};
use cms_client::EntityId;

/// Items that can be searched from an admin list view.
pub trait Searchable {
    /// Text fields the query is matched against.
    fn search_text(&self) -> Vec<&str>;

    fn category_id(&self) -> Option<EntityId> {
        None
    }
}

/// Search box plus category dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub query: String,
    pub category: Option<EntityId>,
}

impl ListFilter {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
        }
    }

    pub fn in_category(mut self, category: impl Into<EntityId>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.category.is_none()
    }

    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if let Some(category) = &self.category {
            if item.category_id().as_ref() != Some(category) {
                return false;
            }
        }

        let needle = self.query.to_lowercase();
        needle.is_empty()
            || item
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching items in their original order.
    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

impl Searchable for Faq {
    fn search_text(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str()]
    }

    fn category_id(&self) -> Option<EntityId> {
        self.category_id.clone()
    }
}

impl Searchable for News {
    fn search_text(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.title.as_str(), self.content.as_str()];
        if let Some(category) = &self.category {
            fields.push(category);
        }
        fields
    }
}

impl Searchable for Testimonial {
    fn search_text(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.name.as_str(), self.content.as_str()];
        if let Some(position) = &self.position {
            fields.push(position);
        }
        fields
    }
}

impl Searchable for User {
    fn search_text(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.name.as_str(), self.email.as_str()];
        if let Some(role) = &self.role {
            fields.push(role);
        }
        fields
    }
}

impl Searchable for Service {
    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Searchable for TeamMember {
    fn search_text(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.position.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        text: String,
        category: u64,
    }

    impl Searchable for Row {
        fn search_text(&self) -> Vec<&str> {
            vec![self.text.as_str()]
        }

        fn category_id(&self) -> Option<EntityId> {
            Some(EntityId::Number(self.category))
        }
    }

    fn rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(
            ("[a-zA-Z ]{0,12}", 0u64..4).prop_map(|(text, category)| Row { text, category }),
            0..20,
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let items = vec![
            Row { text: "a".into(), category: 1 },
            Row { text: "b".into(), category: 2 },
        ];
        assert!(ListFilter::default().is_empty());
        assert_eq!(ListFilter::default().apply(&items).len(), 2);
    }

    #[test]
    fn test_case_insensitive_and_category() {
        let items = vec![
            Row { text: "Payment plans".into(), category: 1 },
            Row { text: "payment dates".into(), category: 2 },
            Row { text: "Eligibility".into(), category: 1 },
        ];

        let by_query = ListFilter::query("PAYMENT").apply(&items);
        assert_eq!(by_query.len(), 2);

        let both = ListFilter::query("payment").in_category(1u64).apply(&items);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].text, "Payment plans");
    }

    #[test]
    fn test_whitespace_is_part_of_the_query() {
        let items = vec![
            Row { text: "prepayment rules".into(), category: 1 },
            Row { text: "early payment".into(), category: 1 },
        ];

        let spaced = ListFilter::query(" payment").apply(&items);
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].text, "early payment");

        let blank = ListFilter::query("  ");
        assert!(!blank.is_empty());
        assert!(blank.apply(&items).is_empty());
    }

    proptest! {
        #[test]
        fn prop_filter_is_exact_subset(items in rows(), query in "[a-zA-Z ]{0,3}") {
            let filter = ListFilter::query(query.clone());
            let kept = filter.apply(&items);
            let needle = query.to_lowercase();

            for item in &items {
                let has = item.text.to_lowercase().contains(&needle);
                let included = kept.iter().any(|k| std::ptr::eq(*k, item));
                prop_assert_eq!(has, included);
            }
        }

        #[test]
        fn prop_filter_is_idempotent(items in rows(), query in "[a-zA-Z ]{0,3}", category in prop::option::of(0u64..4)) {
            let mut filter = ListFilter::query(query);
            filter.category = category.map(EntityId::Number);

            let once: Vec<Row> = filter.apply(&items).into_iter().cloned().collect();
            let twice: Vec<Row> = filter.apply(&once).into_iter().cloned().collect();

            prop_assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(twice.iter()) {
                prop_assert_eq!(&a.text, &b.text);
                prop_assert_eq!(a.category, b.category);
            }
        }
    }
}
