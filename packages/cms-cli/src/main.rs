//! `cms`: command-line access to the content API.
//!
//! Prints pretty JSON on stdout; logs go to stderr.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ResourceKind, WebsitePage};
use cms_client::types::{
    AboutContent, CoreValue, Faq, FaqCategory, HomeAbout, MinService, News, Service, Slider,
    TeamMember, Testimonial, User,
};
use cms_client::{ClientConfig, CmsClient, Entity, EntityId};

const DEFAULT_TOKEN_FILE: &str = ".cms-token.json";

/// Run a generic async fn with the entity type behind a [`ResourceKind`].
macro_rules! with_resource {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::News => $func::<News>($($arg),*).await,
            ResourceKind::Services => $func::<Service>($($arg),*).await,
            ResourceKind::MinServices => $func::<MinService>($($arg),*).await,
            ResourceKind::Sliders => $func::<Slider>($($arg),*).await,
            ResourceKind::Faqs => $func::<Faq>($($arg),*).await,
            ResourceKind::FaqCategories => $func::<FaqCategory>($($arg),*).await,
            ResourceKind::Testimonials => $func::<Testimonial>($($arg),*).await,
            ResourceKind::TeamMembers => $func::<TeamMember>($($arg),*).await,
            ResourceKind::CoreValues => $func::<CoreValue>($($arg),*).await,
            ResourceKind::AboutUs => $func::<AboutContent>($($arg),*).await,
            ResourceKind::HomeAboutUs => $func::<HomeAbout>($($arg),*).await,
            ResourceKind::Users => $func::<User>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cms=info,cms_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let cms = CmsClient::new(&config).context("Failed to load stored token")?;

    match cli.command {
        Commands::Login { email, password } => {
            let login = cms.auth().login(&email, &password).await?;
            match login.user {
                Some(user) => print_json(&user),
                None => print_json(&serde_json::json!({ "logged_in": true })),
            }
        }
        Commands::Logout => {
            cms.auth().logout()?;
            print_json(&serde_json::json!({ "logged_in": false }))
        }
        Commands::List { resource } => with_resource!(resource, list(&cms)),
        Commands::Show { resource, id } => with_resource!(resource, show(&cms, EntityId::from(id))),
        Commands::Delete { resource, id } => {
            with_resource!(resource, delete(&cms, EntityId::from(id)))
        }
        Commands::Publish { resource, id, off } => {
            let id = EntityId::from(id);
            match resource {
                ResourceKind::TeamMembers => {
                    let member = cms
                        .resource::<TeamMember>()
                        .toggle_publish(&id, !off)
                        .await?;
                    print_json(&member)
                }
                other => bail!("{other:?} has no publish toggle"),
            }
        }
        Commands::Website { page } => website(&cms, page).await,
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = match &cli.api_url {
        Some(url) => ClientConfig::new(url.clone())?,
        None => ClientConfig::from_env().context("Set CMS_API_URL or pass --api-url")?,
    };

    let token_file = cli
        .token_file
        .clone()
        .or_else(|| config.token_file.clone())
        .or_else(|| std::env::var("CMS_TOKEN_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));

    Ok(config.with_token_file(token_file))
}

async fn list<T: Entity>(cms: &CmsClient) -> Result<()> {
    let items = cms.resource::<T>().list().await?;
    tracing::info!(resource = T::PLURAL, count = items.len(), "Listed");
    print_json(&items)
}

async fn show<T: Entity>(cms: &CmsClient, id: EntityId) -> Result<()> {
    let item = cms.resource::<T>().get(&id).await?;
    print_json(&item)
}

async fn delete<T: Entity>(cms: &CmsClient, id: EntityId) -> Result<()> {
    cms.resource::<T>().delete(&id).await?;
    print_json(&serde_json::json!({ "deleted": id }))
}

async fn website(cms: &CmsClient, page: WebsitePage) -> Result<()> {
    let website = cms.website();
    match page {
        WebsitePage::Home => print_json(&website.home().await?),
        WebsitePage::MinServices => print_json(&website.min_services().await?),
        WebsitePage::About => print_json(&website.about_us().await?),
        WebsitePage::News => print_json(&website.news().await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{json}");
    Ok(())
}
