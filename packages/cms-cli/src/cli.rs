use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cms")]
#[command(about = "Manage the student-loan site's content from the terminal")]
pub struct Cli {
    /// Backend origin (overrides CMS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the login token is kept (overrides CMS_TOKEN_FILE)
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// Print every item of a resource
    List { resource: ResourceKind },

    /// Print one item
    Show { resource: ResourceKind, id: String },

    /// Delete one item
    Delete { resource: ResourceKind, id: String },

    /// Publish or unpublish one item
    Publish {
        resource: ResourceKind,
        id: String,
        /// Unpublish instead
        #[arg(long)]
        off: bool,
    },

    /// Print a public website payload
    Website { page: WebsitePage },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceKind {
    News,
    Services,
    MinServices,
    Sliders,
    Faqs,
    FaqCategories,
    Testimonials,
    TeamMembers,
    CoreValues,
    AboutUs,
    HomeAboutUs,
    Users,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WebsitePage {
    Home,
    MinServices,
    About,
    News,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_kebab_case_resources() {
        let cli = Cli::try_parse_from([
            "cms",
            "--api-url",
            "http://localhost:8000",
            "publish",
            "team-members",
            "3",
            "--off",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
        match cli.command {
            Commands::Publish { resource, id, off } => {
                assert!(matches!(resource, ResourceKind::TeamMembers));
                assert_eq!(id, "3");
                assert!(off);
            }
            _ => panic!("expected publish"),
        }
    }
}
