use serde::{Deserialize, Serialize};

use super::{AboutContent, CoreValue, Faq, HomeAbout, MinService, Service, Slider, TeamMember, Testimonial, User};

/// Everything the public home page renders, in one payload.
///
/// Sections the backend leaves out come back empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomePage {
    pub sliders: Vec<Slider>,
    pub services: Vec<Service>,
    #[serde(alias = "minServices")]
    pub min_services: Vec<MinService>,
    pub testimonials: Vec<Testimonial>,
    pub faqs: Vec<Faq>,
    #[serde(alias = "coreValues")]
    pub core_values: Vec<CoreValue>,
    #[serde(alias = "teamMembers")]
    pub team_members: Vec<TeamMember>,
    #[serde(alias = "aboutUs", alias = "home_about_us")]
    pub about: Option<HomeAbout>,
}

/// Public "about us" page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutPage {
    pub about: Option<AboutContent>,
    #[serde(alias = "coreValues")]
    pub core_values: Vec<CoreValue>,
    #[serde(alias = "teamMembers")]
    pub team_members: Vec<TeamMember>,
}

/// Response to a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}
