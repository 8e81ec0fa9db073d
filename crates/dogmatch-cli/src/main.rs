//! Dogmatch CLI
//!
//! Command-line front end: browse adoptable dogs, keep favorites and ask the
//! service for a match.

mod config;
mod render;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use config::DogmatchConfig;
use dogmatch_client::FetchConnector;
use dogmatch_core::{DogApi, LocationApi, LocationSearchParams, SortDirection};
use dogmatch_state::{
    BreedCatalog, FavoritesStore, FilterDraft, MatchFlow, MatchOutcome, PageChange,
    RefreshOutcome, Route, SearchController, SessionStore,
};
use dogmatch_storage::{FileStore, KeyValueStore, keys};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "dogmatch")]
#[command(about = "Dogmatch - find your adoptable match", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "DOGMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Remote service base URL (overrides config and environment)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Local state file (overrides config and environment)
    #[arg(long, global = true)]
    state_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the dog service
    Login {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,
    },
    /// Log out and forget the local session
    Logout,
    /// Show who is logged in
    Status,
    /// List dog breeds
    Breeds {
        /// Only breeds containing this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Search adoptable dogs
    Search {
        /// Breed to include (repeatable)
        #[arg(long = "breed")]
        breeds: Vec<String>,

        /// Zip code to include (repeatable)
        #[arg(long = "zip")]
        zip_codes: Vec<String>,

        #[arg(long)]
        age_min: Option<String>,

        #[arg(long)]
        age_max: Option<String>,

        /// Sort by breed: asc or desc
        #[arg(long)]
        sort: Option<SortDirection>,

        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Manage favorite dogs
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Ask the service to pick a match among your favorites
    Match,
    /// Show the pending match result
    ShowMatch,
    /// Look up locations by zip code, or search by city/state
    Locations {
        /// Zip codes to look up
        zip_codes: Vec<String>,

        #[arg(long)]
        city: Option<String>,

        /// Two-letter state code (repeatable)
        #[arg(long = "state")]
        states: Vec<String>,

        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Add dogs by id
    Add { ids: Vec<String> },
    /// Remove dogs by id
    Remove { ids: Vec<String> },
    /// List favorites
    List,
    /// Remove all favorites
    Clear,
}

/// Shared wiring for one CLI invocation
struct App {
    config: DogmatchConfig,
    connector: Arc<FetchConnector>,
    storage: Arc<FileStore>,
}

impl App {
    fn new(config: DogmatchConfig) -> anyhow::Result<Self> {
        let state_file = config.state_file();
        let storage = Arc::new(
            FileStore::open(&state_file)
                .with_context(|| format!("Failed to open state file {}", state_file.display()))?,
        );
        let connector = Arc::new(FetchConnector::new(config.fetch_config())?);

        if let Some(cookie) = storage.get(keys::AUTH_COOKIE)? {
            connector.restore_session_cookie(&cookie);
        }

        debug!(
            "Using {} with state in {}",
            connector.base_url(),
            state_file.display()
        );

        Ok(Self {
            config,
            connector,
            storage,
        })
    }

    fn api(&self) -> Arc<dyn DogApi> {
        self.connector.clone()
    }

    fn session(&self) -> SessionStore {
        SessionStore::new(self.api(), self.storage.clone())
    }

    fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(self.storage.clone())
    }

    /// Enter `route`, failing if the guard sends us elsewhere
    fn enter(&self, route: Route) -> anyhow::Result<()> {
        let resolved = self.session().guard(route);
        if resolved != route {
            debug!("Redirected from {} to {}", route, resolved);
            bail!("Not logged in. Run `dogmatch login --name <NAME> --email <EMAIL>` first.");
        }
        Ok(())
    }

    async fn login(&self, name: &str, email: &str) -> anyhow::Result<()> {
        let session = self.session();
        if session.guard(Route::Login) == Route::Search {
            if let Some(current) = session.session() {
                println!("Already logged in as {} <{}>", current.name, current.email);
            }
            return Ok(());
        }

        match session.login(name, email).await? {
            Some(next) => {
                match self.connector.session_cookie() {
                    Some(cookie) => self.storage.set(keys::AUTH_COOKIE, &cookie)?,
                    None => warn!("Service did not set a session cookie"),
                }
                println!("Logged in as {} <{}>", name, email);
                debug!("Navigating to {}", next);
                Ok(())
            }
            None => bail!(
                "{}",
                session.take_error().unwrap_or_else(|| "Login failed".to_string())
            ),
        }
    }

    async fn logout(&self) -> anyhow::Result<()> {
        let session = self.session();
        let logged_out = session.logout().await;

        if let Err(e) = self.storage.remove(keys::AUTH_COOKIE) {
            warn!("Failed to clear session cookie: {}", e);
        }
        if let Some(error) = session.take_error() {
            eprintln!("Warning: {}", error);
        }
        logged_out.context("Failed to clear the stored session")?;
        println!("Logged out");
        Ok(())
    }

    fn status(&self) {
        match self.session().session() {
            Some(session) => println!("Logged in as {} <{}>", session.name, session.email),
            None => println!("Not logged in"),
        }
    }

    async fn breeds(&self, filter: Option<&str>) -> anyhow::Result<()> {
        self.enter(Route::Search)?;

        let mut catalog = BreedCatalog::new();
        catalog.load(self.connector.as_ref()).await;
        if let Some(error) = catalog.error() {
            bail!("{}", error);
        }

        for breed in catalog.matching(filter.unwrap_or_default()) {
            println!("{}", breed);
        }
        Ok(())
    }

    async fn search(&self, draft: FilterDraft, page: u32) -> anyhow::Result<()> {
        self.enter(Route::Search)?;

        let controller = SearchController::new(self.api(), self.config.page_size()?);
        let mut outcome = controller.apply_filters(draft.to_filters()).await;

        if page != 1 && matches!(outcome, RefreshOutcome::Loaded { .. }) {
            match controller.set_page(page) {
                PageChange::Changed => outcome = controller.refresh().await,
                PageChange::Unchanged => {}
                PageChange::Rejected => bail!(
                    "Page {} is out of range (1-{})",
                    page,
                    controller.page().last_page()
                ),
            }
        }

        if let RefreshOutcome::Failed(e) = &outcome {
            debug!("Search failed: {}", e);
        }

        let favorites = self.favorites();
        print!("{}", render::search_page(&controller.snapshot(), &favorites));
        Ok(())
    }

    async fn favorites_action(&self, action: FavoritesAction) -> anyhow::Result<()> {
        self.enter(Route::Search)?;
        let mut favorites = self.favorites();

        match action {
            FavoritesAction::Add { ids } => {
                if ids.is_empty() {
                    bail!("No dog ids given");
                }
                let dogs = self
                    .connector
                    .fetch_dogs(&ids)
                    .await
                    .context("Failed to fetch dogs. Please try again.")?;

                for id in &ids {
                    match dogs.iter().find(|d| &d.id == id) {
                        Some(dog) => {
                            if favorites.add(dog.clone())? {
                                println!("Added {} ({})", dog.name, dog.id);
                            } else {
                                println!("{} is already a favorite", dog.id);
                            }
                        }
                        None => eprintln!("No dog with id {}", id),
                    }
                }
            }
            FavoritesAction::Remove { ids } => {
                for id in &ids {
                    if favorites.remove(id)? {
                        println!("Removed {}", id);
                    } else {
                        println!("{} is not a favorite", id);
                    }
                }
            }
            FavoritesAction::List => print!("{}", render::favorites(&favorites)),
            FavoritesAction::Clear => {
                favorites.clear()?;
                println!("Favorites cleared");
            }
        }
        Ok(())
    }

    fn match_flow(&self) -> MatchFlow {
        MatchFlow::new(self.api(), self.storage.clone())
    }

    async fn generate_match(&self) -> anyhow::Result<()> {
        self.enter(Route::Search)?;
        let favorites = self.favorites();

        match self.match_flow().generate(&favorites).await {
            MatchOutcome::NoFavorites => {
                println!("Add some favorites first: `dogmatch favorites add <ID>...`");
                Ok(())
            }
            MatchOutcome::Generated { navigate_to, .. } => self.show_match(navigate_to).await,
            MatchOutcome::Failed(e) => {
                Err(anyhow::Error::new(e).context("Failed to generate match. Please try again."))
            }
        }
    }

    async fn show_match(&self, route: Route) -> anyhow::Result<()> {
        self.enter(route)?;
        let view = self.match_flow().load_view().await;
        print!("{}", render::match_view(&view));
        Ok(())
    }

    async fn locations(
        &self,
        zip_codes: Vec<String>,
        city: Option<String>,
        states: Vec<String>,
        size: Option<u32>,
    ) -> anyhow::Result<()> {
        self.enter(Route::Search)?;

        if !zip_codes.is_empty() {
            let locations = self.connector.locations(&zip_codes).await?;
            for location in &locations {
                println!("{}", render::location_line(location));
            }
            return Ok(());
        }

        let params = LocationSearchParams {
            city,
            states: (!states.is_empty()).then_some(states),
            size,
            ..Default::default()
        };
        let result = self.connector.search_locations(&params).await?;
        for location in &result.results {
            println!("{}", render::location_line(location));
        }
        println!("{} locations found", result.total);
        Ok(())
    }
}

/// Filter form from the search flags; a breed given twice is selected once
fn build_draft(
    breeds: &[String],
    zip_codes: Vec<String>,
    age_min: Option<&str>,
    age_max: Option<&str>,
    sort: SortDirection,
) -> dogmatch_core::Result<FilterDraft> {
    let mut draft = FilterDraft::new();
    for breed in breeds {
        draft.select_breed(breed);
    }
    draft.set_zip_codes(zip_codes);
    if let Some(text) = age_min {
        draft.set_age_min(text)?;
    }
    if let Some(text) = age_max {
        draft.set_age_max(text)?;
    }
    if sort != draft.sort_direction() {
        draft.toggle_sort();
    }
    Ok(draft)
}

fn init_tracing(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let log_level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG wins over the configured level
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}", log_level)));

    if !config.log_http {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn"] {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Warning: invalid log directive '{}': {}", directive, e),
            }
        }
    }

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<DogmatchConfig> {
    let config_path = cli.config.clone().or_else(DogmatchConfig::default_path);
    let mut config = match &config_path {
        Some(path) => DogmatchConfig::from_file(path)?,
        None => DogmatchConfig::default(),
    };

    // Environment overrides the file, flags override both
    config.merge_env();
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(state_file) = &cli.state_file {
        config.storage.state_file = state_file.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_tracing(&config.logging)?;
    info!("Dogmatch {} against {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    let default_sort = config.search.sort_direction;
    let app = App::new(config)?;

    match cli.command {
        Commands::Login { name, email } => app.login(&name, &email).await?,
        Commands::Logout => app.logout().await?,
        Commands::Status => app.status(),
        Commands::Breeds { filter } => app.breeds(filter.as_deref()).await?,
        Commands::Search {
            breeds,
            zip_codes,
            age_min,
            age_max,
            sort,
            page,
        } => {
            let draft = build_draft(
                &breeds,
                zip_codes,
                age_min.as_deref(),
                age_max.as_deref(),
                sort.unwrap_or(default_sort),
            )?;
            app.search(draft, page).await?
        }
        Commands::Favorites { action } => app.favorites_action(action).await?,
        Commands::Match => app.generate_match().await?,
        Commands::ShowMatch => app.show_match(Route::Match).await?,
        Commands::Locations {
            zip_codes,
            city,
            states,
            size,
        } => app.locations(zip_codes, city, states, size).await?,
    }

    Ok(())
}
