//! Recipe Server
//! Mission: Serve recipe CRUD behind stateless JWT authentication
//!
//! Usage:
//!   cargo run --release -- serve
//!   cargo run --release -- add-user --username alice --password 'correct horse'

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipe_backend::{
    api::{create_router, AppState},
    auth::{AuthorizationGuard, TokenService, UserStore},
    config::{jwt_secret_from_env, load_env, AppConfig},
    recipes::{RecipeService, RecipeStore},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Recipe management backend
#[derive(Parser, Debug)]
#[command(name = "recipe-server")]
#[command(about = "Recipe CRUD API with JWT authentication")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Provision a user credential
    AddUser {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "RECIPE_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => serve(config, bind).await,
        Commands::AddUser { username, password } => add_user(&config, &username, &password),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_backend=debug,recipe_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: AppConfig, bind: Option<String>) -> Result<()> {
    info!("🚀 Recipe server starting");

    let jwt_secret = jwt_secret_from_env()?;

    let user_store = Arc::new(UserStore::new(&config.database_path, config.bcrypt_cost)?);
    let tokens = Arc::new(TokenService::new(
        user_store.clone(),
        jwt_secret.as_bytes(),
    ));
    info!("🔐 Authentication initialized at: {}", config.database_path);

    if user_store.count()? == 0 {
        info!("No users yet - provision one with `recipe-server add-user`");
    }

    let recipe_store = Arc::new(RecipeStore::new(&config.database_path)?);
    let recipes = Arc::new(RecipeService::new(
        recipe_store,
        AuthorizationGuard::permissive(),
    ));

    let app = create_router(AppState { recipes, tokens });

    let addr = bind.unwrap_or(config.bind_addr);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn add_user(config: &AppConfig, username: &str, password: &str) -> Result<()> {
    let store = UserStore::new(&config.database_path, config.bcrypt_cost)?;
    let user = store.create_user(username, password)?;
    info!("👤 User {} provisioned (id {})", user.username, user.id);
    Ok(())
}
