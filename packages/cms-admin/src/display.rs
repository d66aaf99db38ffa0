//! Read-only views for the public site.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use cms_client::types::{HomePage, Service, Slider, TeamMember, Testimonial};
use cms_client::{ApiError, Publishable, WebsiteClient};

use crate::carousel::Carousel;

/// One section of the public site, fetched at most once.
#[derive(Debug, Clone)]
pub struct PublicDisplay<T> {
    items: Option<Vec<T>>,
    error: Option<String>,
}

impl<T> Default for PublicDisplay<T> {
    fn default() -> Self {
        Self {
            items: None,
            error: None,
        }
    }
}

impl<T: Publishable> PublicDisplay<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a list that was already fetched elsewhere.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items: Some(items),
            error: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the list unless a previous fetch already succeeded.
    pub async fn load_once<F, Fut>(&mut self, fetch: F) -> Result<(), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        if self.items.is_some() {
            return Ok(());
        }
        match fetch().await {
            Ok(items) => {
                self.items = Some(items);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load public section");
                self.error = Some(e.message().to_string());
                Err(e)
            }
        }
    }

    /// Published items in server order.
    pub fn items(&self) -> Vec<&T> {
        self.items
            .iter()
            .flatten()
            .filter(|item| item.is_published())
            .collect()
    }
}

/// The home page's publishable sections plus its slider carousel.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub sliders: PublicDisplay<Slider>,
    pub services: PublicDisplay<Service>,
    pub testimonials: PublicDisplay<Testimonial>,
    pub team_members: PublicDisplay<TeamMember>,
    pub carousel: Carousel,
    pub page: HomePage,
}

impl HomeView {
    pub fn new(page: HomePage, interval: Duration) -> Self {
        let sliders = PublicDisplay::from_items(page.sliders.clone());
        let carousel = Carousel::new(sliders.items().len(), interval);
        Self {
            sliders,
            services: PublicDisplay::from_items(page.services.clone()),
            testimonials: PublicDisplay::from_items(page.testimonials.clone()),
            team_members: PublicDisplay::from_items(page.team_members.clone()),
            carousel,
            page,
        }
    }

    pub async fn load(website: &WebsiteClient, interval: Duration) -> Result<Self, ApiError> {
        let page = website.home().await?;
        Ok(Self::new(page, interval))
    }

    /// Slider currently shown, if any.
    pub fn current_slide(&self) -> Option<&Slider> {
        self.sliders.items().get(self.carousel.index()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_client::types::News;
    use serde_json::json;

    fn news(value: serde_json::Value) -> News {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_load_once_fetches_a_single_time() {
        let mut display = PublicDisplay::<News>::new();
        let mut calls = 0;

        for _ in 0..3 {
            display
                .load_once(|| {
                    calls += 1;
                    async {
                        Ok(vec![
                            news(json!({"id": 1, "title": "Live", "content": "x", "status": "published"})),
                            news(json!({"id": 2, "title": "Hidden", "content": "y", "status": "draft"})),
                        ])
                    }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls, 1);
        let titles: Vec<_> = display.items().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Live"]);
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let mut display = PublicDisplay::<News>::new();
        let err = display
            .load_once(|| async {
                Err(ApiError::Api {
                    status: 500,
                    message: "Failed to fetch news".into(),
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to fetch news");
        assert_eq!(display.error(), Some("Failed to fetch news"));
        assert!(!display.is_loaded());

        display.load_once(|| async { Ok(vec![]) }).await.unwrap();
        assert!(display.is_loaded());
        assert!(display.error().is_none());
    }

    #[test]
    fn test_home_view_sizes_carousel_to_published_sliders() {
        let page: HomePage = serde_json::from_value(json!({
            "sliders": [
                {"id": 1, "title": "One", "is_published": 1},
                {"id": 2, "title": "Two", "is_published": 0},
                {"id": 3, "title": "Three", "isPublished": true},
            ],
        }))
        .unwrap();

        let mut view = HomeView::new(page, Duration::from_secs(5));
        assert_eq!(view.carousel.len(), 2);
        assert_eq!(view.current_slide().unwrap().title, "One");

        view.carousel.tick();
        assert_eq!(view.current_slide().unwrap().title, "Three");
    }
}
