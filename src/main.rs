use anyhow::Context;
use nullbots::cli::{
    Args, Commands, ConfigDiscovery, NewsletterCommand, ProjectsCommand, SessionCommand,
};
use nullbots::site::{ContactForm, NewsletterSignup, Route};
use nullbots::{
    AnalyticsTracker, ApiClient, ClientConfig, FileSessionStore, MemorySessionStore, Project,
    ProjectFilter, SessionIdentity, SessionStore, env,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "nullbots=debug"
    } else {
        "nullbots=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = args.command else {
        anyhow::bail!("No command specified. Use 'nullbots --help' to see available commands.");
    };

    if let Commands::ShowConfig = command {
        ConfigDiscovery::show_discovery_info();
        return Ok(());
    }

    let mut config = ConfigDiscovery::resolve(args.config.as_deref(), args.api_url.as_deref())?;
    if let Some(referrer) = args.referrer {
        config = config.with_referrer(referrer);
    }

    let identity = open_session(&config, args.ephemeral_session)?;
    let client = ApiClient::from_config(&config, identity)?;
    info!("Using API at {}", client.base_url());

    run(command, client).await
}

fn open_session(config: &ClientConfig, ephemeral: bool) -> anyhow::Result<SessionIdentity> {
    if ephemeral {
        return Ok(SessionIdentity::new(Arc::new(MemorySessionStore::new())));
    }

    let path = match &config.session_file {
        Some(path) => path.clone(),
        None => {
            let root = match env::home_dir() {
                Some(home) => home,
                None => std::env::current_dir().context("Could not determine a session directory")?,
            };
            env::session_file_path(&root)
        }
    };

    let store: Arc<dyn SessionStore> = match FileSessionStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Session file unusable ({}), starting an in-memory session", e);
            Arc::new(MemorySessionStore::new())
        }
    };
    Ok(SessionIdentity::new(store))
}

async fn run(command: Commands, client: ApiClient) -> anyhow::Result<()> {
    match command {
        Commands::Health => {
            let body = client.health().check().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Commands::Projects { action } => run_projects(action, &client).await?,
        Commands::Contact {
            name,
            email,
            subject,
            message,
            mail_link,
        } => {
            let form = ContactForm::new(name, email, subject, message);
            let (tracker, mounted) = AnalyticsTracker::mount(client, Route::Contact.path());

            let tracking = if mail_link {
                let (link, tracking) = form.submit_via_mail(&tracker)?;
                println!("{}", link);
                tracking
            } else {
                let (ack, tracking) = form.submit_via_api(&tracker).await?;
                println!("✅ {}", ack.message.as_deref().unwrap_or("Message sent"));
                tracking
            };
            futures::future::join_all([mounted, tracking]).await;
        }
        Commands::Newsletter { action } => match action {
            NewsletterCommand::Subscribe { email } => {
                // The footer form is on every page; the landing page hosts it here
                let outcome =
                    NewsletterSignup::submit_on_page(client, &Route::Home.path(), &email).await;
                if !outcome.subscribed {
                    anyhow::bail!(outcome.message);
                }
                println!("✅ {}", outcome.message);
            }
            NewsletterCommand::Unsubscribe { email } => {
                let ack = client.newsletter().unsubscribe(&email).await?;
                println!("✅ {}", ack.message.as_deref().unwrap_or("Unsubscribed"));
            }
        },
        Commands::Track {
            event,
            page,
            project_id,
        } => {
            client
                .analytics()
                .track(&event, &page, project_id.as_deref())
                .await;
            println!("Sent {} for {}", event, page);
        }
        Commands::Browse { paths } => browse(client, paths).await,
        Commands::Session { action } => match action {
            SessionCommand::Show => println!("{}", client.session().session_id()),
            SessionCommand::Reset => {
                client.session().reset()?;
                println!("Session cleared");
            }
        },
        Commands::ShowConfig => ConfigDiscovery::show_discovery_info(),
    }

    Ok(())
}

async fn run_projects(action: ProjectsCommand, client: &ApiClient) -> anyhow::Result<()> {
    match action {
        ProjectsCommand::List { category, featured } => {
            let filter = ProjectFilter {
                category,
                featured: Some(featured),
            };
            let projects = client.projects().get_all(Some(&filter)).await?;
            println!("📁 {} projects", projects.len());
            for project in &projects {
                print_project_line(project);
            }
        }
        ProjectsCommand::Show { id } => {
            let project = client.projects().get_by_id(&id).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectsCommand::Categories => {
            for category in client.projects().get_categories().await? {
                println!("  {}", category.name());
            }
        }
        ProjectsCommand::Like { id } => {
            client.projects().like(&id).await?;
            println!("❤️  Liked {}", id);
        }
    }
    Ok(())
}

/// Walk the given routes like a visitor would, one page view per step
async fn browse(client: ApiClient, paths: Vec<String>) {
    let mut paths = paths.into_iter();
    let Some(landing) = paths.next() else {
        return;
    };

    let (mut tracker, mounted) = AnalyticsTracker::mount(client, landing);
    let mut pending = vec![mounted];
    describe_route(&tracker).await;

    for path in paths {
        pending.push(tracker.navigate(path));
        describe_route(&tracker).await;
    }

    // Let the page views land before the process exits
    futures::future::join_all(pending).await;
}

async fn describe_route(tracker: &AnalyticsTracker) {
    let route = Route::parse(tracker.current_path());
    println!("→ {}", route);

    if let Some(id) = route.project_id() {
        match tracker.client().projects().get_by_id(id).await {
            Ok(project) => print_project_line(&project),
            Err(e) => println!("    {}", e),
        }
    }
}

fn print_project_line(project: &Project) {
    let star = if project.featured { "★" } else { " " };
    println!(
        "  {} {} [{}] {} ({} likes)",
        star, project.id, project.category, project.title, project.likes
    );
}
