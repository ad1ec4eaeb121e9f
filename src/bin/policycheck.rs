use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use spinnaker_authz::repository::{MemoryRepository, Repository};
use spinnaker_authz::{Action, Actor, CapabilityTable, Decision, PolicyEngine, Resource, Role};

#[derive(Parser, Debug)]
#[command(author, version, about = "spinnaker policy inspection tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the capability matrix for every role
    Table,
    /// Evaluate one authorization check against a fixture file
    Can {
        /// Acting role (admin, manager, sailor, support)
        role: String,
        /// Dotted action name, e.g. client.update or event.assign_support
        action: String,
        /// Username of the acting user (ownership rules compare it)
        #[arg(long, default_value = "anonymous")]
        username: String,
        /// Id of the acting user (support assignment rules compare it)
        #[arg(long, default_value_t = 0)]
        actor_id: i64,
        /// JSON fixture file seeding the in-memory repository
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Target client id
        #[arg(long)]
        client: Option<i64>,
        /// Target contract id (also the parent contract for event.create)
        #[arg(long)]
        contract: Option<i64>,
        /// Target event id
        #[arg(long)]
        event: Option<i64>,
        /// Target user id
        #[arg(long)]
        user: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Try to load env from CWD; fall back to the crate-local `.env` when
    // the binary runs from a different directory.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Table => {
            print_table(&CapabilityTable::standard());
        }
        Commands::Can {
            role,
            action,
            username,
            actor_id,
            fixtures,
            client,
            contract,
            event,
            user,
        } => {
            let role: Role = role.parse()?;
            let action: Action = action.parse()?;
            let actor = Actor::new(actor_id, username, role);

            let repo = Arc::new(match fixtures {
                Some(path) => MemoryRepository::from_fixture_file(&path)?,
                None => MemoryRepository::new(),
            });
            let resource = load_resource(repo.as_ref(), client, contract, event, user).await?;
            let engine = PolicyEngine::with_standard_policy(repo);

            match engine.decide(&actor, action, resource.as_ref()).await? {
                Decision::Allow => println!("allow"),
                Decision::Deny(reason) => {
                    println!("deny: {reason}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

async fn load_resource(
    repo: &MemoryRepository,
    client: Option<i64>,
    contract: Option<i64>,
    event: Option<i64>,
    user: Option<i64>,
) -> anyhow::Result<Option<Resource>> {
    let selected = [client, contract, event, user]
        .iter()
        .filter(|id| id.is_some())
        .count();
    if selected > 1 {
        anyhow::bail!("pass at most one of --client, --contract, --event, --user");
    }

    if let Some(id) = client {
        let client = repo
            .find_client_by_id(id)
            .await?
            .with_context(|| format!("client {id} not in fixtures"))?;
        return Ok(Some(Resource::Client(client.to_ref())));
    }
    if let Some(id) = contract {
        let contract = repo
            .find_contract_by_id(id)
            .await?
            .with_context(|| format!("contract {id} not in fixtures"))?;
        return Ok(Some(Resource::Contract(contract.to_ref())));
    }
    if let Some(id) = event {
        let event = repo
            .find_event_by_id(id)
            .await?
            .with_context(|| format!("event {id} not in fixtures"))?;
        return Ok(Some(Resource::Event(event.to_ref())));
    }
    if let Some(id) = user {
        let user = repo
            .find_user_by_id(id)
            .await?
            .with_context(|| format!("user {id} not in fixtures"))?;
        return Ok(Some(Resource::User(user.to_ref())));
    }

    Ok(None)
}

fn print_table(table: &CapabilityTable) {
    use spinnaker_authz::ResourceKind;

    for role in Role::ALL {
        println!("{role}");
        for resource in ResourceKind::ALL {
            let row = table.row(role, resource);
            let kinds: Vec<&str> = row.iter().map(|kind| kind.as_str()).collect();
            let rendered = if kinds.is_empty() {
                "-".to_string()
            } else {
                kinds.join(" ")
            };
            println!("  {:<10} {rendered}", resource.as_str());
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
