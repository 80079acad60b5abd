use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use winrate_tracker::api::{build_router, state::AppState};
use winrate_tracker::config::AppConfig;
use winrate_tracker::models::{NewTeam, PlayerId, RiotId, TeamId};
use winrate_tracker::riot::RiotClient;
use winrate_tracker::service::{MatchCount, WinRateService, DEFAULT_MATCH_COUNT};
use winrate_tracker::storage::{JsonlTeamRepository, StorageConfig};

#[derive(Parser)]
#[command(name = "winrate-tracker")]
#[command(about = "League of Legends team and player win-rate tracker")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Match selection shared by the win-rate commands.
#[derive(Args)]
struct MatchArgs {
    /// Number of recent matches (1-100)
    #[arg(long, default_value = DEFAULT_MATCH_COUNT)]
    count: String,

    /// Match type filter (e.g. "ranked")
    #[arg(long = "type")]
    match_type: Option<String>,

    /// Queue id filter (e.g. 420)
    #[arg(long)]
    queue: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port number (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Compute one player's win rate
    PlayerWinrate {
        #[arg(long)]
        player: u64,

        #[command(flatten)]
        matches: MatchArgs,
    },

    /// Compute a team's win rate
    TeamWinrate {
        #[arg(long)]
        team: u64,

        #[command(flatten)]
        matches: MatchArgs,
    },

    /// Create a team, optionally with players
    CreateTeam {
        #[arg(long)]
        name: String,

        /// Riot ID as Name#TAG (repeatable)
        #[arg(long = "player")]
        players: Vec<String>,
    },

    /// Add a player to an existing team
    AddPlayer {
        #[arg(long)]
        team: u64,

        /// Riot ID as Name#TAG
        #[arg(long)]
        riot_id: String,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn parse_riot_id(raw: &str) -> Result<RiotId> {
    RiotId::parse(raw).ok_or_else(|| anyhow!("Invalid Riot ID {:?}, expected Name#TAG", raw))
}

fn build_service(config: &AppConfig) -> Result<WinRateService> {
    let api_key = config.api_key()?;
    let client = Arc::new(RiotClient::new(&config.riot, &api_key).context("Failed to build Riot client")?);
    let repo = Arc::new(JsonlTeamRepository::new(StorageConfig::new(config.data_dir.clone())));

    Ok(WinRateService::new(repo, client.clone(), client, &config.engine)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    init_tracing(
        cli.log_level.as_deref().unwrap_or(&config.log_level),
        cli.json_logs,
    );
    tracing::info!("Starting winrate-tracker v{}", env!("CARGO_PKG_VERSION"));

    let service = build_service(&config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let app = build_router(AppState::new(Arc::new(service)), &config.server);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::PlayerWinrate { player, matches } => {
            let count = MatchCount::parse(&matches.count)?;
            let filter = winrate_tracker::riot::MatchFilter::new(matches.match_type, matches.queue);
            let rate = service
                .compute_player_win_rate(PlayerId(player), count, &filter)
                .await?;

            println!("Player {}", player);
            println!("Win rate:    {:.2}%", rate.percentage);
            println!("Sample size: {}", rate.sample_size);
        }
        Commands::TeamWinrate { team, matches } => {
            let count = MatchCount::parse(&matches.count)?;
            let filter = winrate_tracker::riot::MatchFilter::new(matches.match_type, matches.queue);
            let result = service
                .compute_team_win_rate(TeamId(team), count, &filter)
                .await?;

            println!("Team {}", team);
            for p in &result.players {
                println!(
                    "  {:<20} {:>6.2}%  ({} matches)",
                    p.gamer_name, p.win_rate.percentage, p.win_rate.sample_size
                );
            }
            println!("Team win rate: {:.2}%", result.percentage);
        }
        Commands::CreateTeam { name, players } => {
            let players = players
                .iter()
                .map(|p| parse_riot_id(p))
                .collect::<Result<Vec<_>>>()?;
            let (team, players) = service.create_team(NewTeam { name, players }).await?;

            println!("Created team {} ({})", team.id, team.name);
            for p in &players {
                println!("  player {}: {}", p.id, p.riot_id());
            }
        }
        Commands::AddPlayer { team, riot_id } => {
            let riot_id = parse_riot_id(&riot_id)?;
            let player = service.add_player_to_team(TeamId(team), riot_id).await?;
            println!("Added player {} ({}) to team {}", player.id, player.riot_id(), team);
        }
    }

    Ok(())
}
