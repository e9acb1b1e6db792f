//! Mediadesk CLI
//!
//! Terminal front end for the media API:
//! - Log in and keep the session token
//! - Upload files
//! - List media and show the logged-in user

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use mediadesk::config::{generate_default_config, Config};
use mediadesk::logging::init_tracing;
use mediadesk::terminal::read_secret;
use mediadesk::{
    build_client, ClientResult, Credentials, FileTokenStore, GraphQlClient, HttpTransport,
    HttpUploader, PageController, Session, TerminalRenderer, UploadFile,
};

type TerminalPage = PageController<HttpTransport, HttpUploader, FileTokenStore, TerminalRenderer>;

#[derive(Parser)]
#[command(name = "mediadesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log in, upload files and browse media on a GraphQL media server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/mediadesk/config.toml or ./mediadesk.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// GraphQL endpoint, overrides the config file
    #[arg(long, global = true)]
    pub graphql_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the page: stored user and media list
    Open,

    /// Log in and store the session token
    Login {
        username: String,

        /// Password (default: first line of stdin)
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the user behind the stored token
    Whoami,

    /// List media items
    Media,

    /// Upload a file and register it as a media item
    Upload {
        /// File to upload
        path: PathBuf,
    },

    /// Forget the stored session token
    Logout,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &config)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };
    if let Some(url) = cli.graphql_url {
        config.api.graphql_url = url;
    }

    init_tracing(&config.logging);
    tracing::debug!(
        graphql = %config.api.graphql_url,
        token_file = %config.session.token_file,
        "Mediadesk v{}",
        env!("CARGO_PKG_VERSION")
    );

    let http = build_client(Duration::from_secs(config.api.request_timeout_secs))?;
    let page: TerminalPage = PageController::new(
        GraphQlClient::new(HttpTransport::new(
            http.clone(),
            config.api.graphql_endpoint()?,
        )),
        HttpUploader::new(http, config.api.upload_endpoint()?),
        FileTokenStore::new(&config.session.token_file),
        TerminalRenderer::new(),
    );

    let result = run(&page, cli.command).await;
    if result.is_err() {
        // Already reported by the controller
        std::process::exit(1);
    }

    Ok(())
}

async fn run(page: &TerminalPage, command: Commands) -> ClientResult<()> {
    match command {
        Commands::Open => {
            page.load().await;
        }

        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => {
                    eprint!("Password: ");
                    read_secret(std::io::stdin().lock()).map_err(|e| {
                        eprintln!("{}", e);
                        e
                    })?
                }
            };
            page.on_login_submit(Credentials::new(username, password))
                .await?;
        }

        Commands::Whoami => match page.restore_session().await {
            Ok(Some(user)) => {
                if let Some(level) = &user.level_name {
                    println!("Level:    {}", level);
                }
                if let Some(created) = user.created_at_utc() {
                    println!("Joined:   {}", created.format("%Y-%m-%d"));
                }
            }
            Ok(None) => {
                println!("Not logged in.");
                println!();
                println!("Log in with:");
                println!("  mediadesk login <username>");
            }
            Err(e) => {
                eprintln!("Session check failed: {}", e);
                return Err(e);
            }
        },

        Commands::Media => {
            if let Err(e) = page.refresh_media().await {
                eprintln!("Failed to fetch media: {}", e);
                return Err(e);
            }
        }

        Commands::Upload { path } => {
            let file = match UploadFile::read(&path).await {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("{}", e);
                    return Err(e);
                }
            };
            page.on_file_submit(Some(&file)).await?;
        }

        Commands::Logout => {
            Session::clear(page.store())?;
            println!("Logged out.");
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}
