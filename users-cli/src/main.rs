mod interactive;

use clap::{Parser, Subcommand, ValueEnum};
use users_client::{User, UserApi, UserClientHttp, UserId, UserInput};

#[derive(Parser, Debug)]
#[command(about = "Manage the user directory from a terminal")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:5000")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every user, newest first
    List,
    Get {
        id: UserId,
    },
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
    },
    Update {
        id: UserId,
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
    },
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    Health {
        #[clap(value_enum, default_value_t = Probe::Full)]
        probe: Probe,
    },
    /// Line-oriented session with a live list and an add/edit form
    Interactive,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Probe {
    Live,
    Ready,
    Full,
}

pub(crate) fn print_user(user: &User) {
    println!("- [{}] {} <{}>", user.id, user.name, user.email);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let client = UserClientHttp::connect(&args.server)?;

    match args.command {
        Command::List => {
            let users = client.list_users().await?;
            println!("Users ({})", users.len());
            for user in &users {
                print_user(user);
            }
        }
        Command::Get { id } => {
            let user = client.get_user(id).await?;
            print_user(&user);
            if let (Some(created), Some(updated)) = (user.created_at, user.updated_at) {
                println!("  created {created}, updated {updated}");
            }
        }
        Command::Create { name, email } => {
            let user = client.create_user(&UserInput { name, email }).await?;
            println!("User created! ID: {}", user.id);
        }
        Command::Update { id, name, email } => {
            let user = client.update_user(id, &UserInput { name, email }).await?;
            print!("User updated: ");
            print_user(&user);
        }
        Command::Delete { id, yes } => {
            if !yes && !interactive::confirm(&format!("Delete user {id}?")).await? {
                println!("Cancelled");
                return Ok(());
            }
            client.delete_user(id).await?;
            println!("User deleted!");
        }
        Command::Health { probe } => {
            let check = match probe {
                Probe::Live => client.liveness().await?,
                Probe::Ready => client.readiness().await?,
                Probe::Full => client.health().await?,
            };
            println!(
                "{} ({}): {}",
                if check.healthy { "up" } else { "down" },
                check.http_status,
                check.message.unwrap_or_default()
            );
            println!("{}", serde_json::to_string_pretty(&check.details)?);
            if !check.healthy {
                std::process::exit(1);
            }
        }
        Command::Interactive => interactive::run(client).await?,
    }

    Ok(())
}
