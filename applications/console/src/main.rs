/// Roster - terminal console for the user directory
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use roster_console::{views, AppContext, ConsoleConfig, Navigation, Route};
use roster_core::{Credentials, NewUser, UserId, UserPatch};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Manage the user directory from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep session and snapshot in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and start a session
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Start a session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// End the session
    Logout,
    /// Navigate to a view by path (e.g. /users, /edit/3)
    Open { path: String },
    /// List one page of users
    Users {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a user, or update the given fields
    Edit {
        id: UserId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a user
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Avatar URL; derived from the names when omitted
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete a user after confirmation
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; views own stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_sync=info,roster_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if cli.ephemeral {
        config.storage.ephemeral = true;
    }
    config.validate()?;

    let ctx = AppContext::build(&config).await?;

    match cli.command {
        Commands::Register { email, password } => {
            ctx.auth.register(&Credentials::new(email, password)).await?;
            println!("Registered.");
            render(&ctx, Route::Users, 1).await?;
        }
        Commands::Login { email, password } => {
            ctx.auth.login(&Credentials::new(email, password)).await?;
            println!("Logged in.");
            render(&ctx, Route::Users, 1).await?;
        }
        Commands::Logout => {
            ctx.auth.logout().await?;
            println!("Logged out.");
            print!("{}", views::static_view(Route::Entry));
        }
        Commands::Open { path } => {
            let navigation = ctx.guard.navigate(&path).await?;
            if let Navigation::Redirect(route) = navigation {
                eprintln!("Redirected to {}", route);
            }
            render(&ctx, navigation.route(), 1).await?;
        }
        Commands::Users { page } => {
            require_session(&ctx, Route::Users).await?;
            render(&ctx, Route::Users, page).await?;
        }
        Commands::Edit {
            id,
            first_name,
            last_name,
            email,
        } => {
            require_session(&ctx, Route::EditUser(id)).await?;
            let patch = UserPatch {
                first_name,
                last_name,
                email,
                avatar: None,
            };
            if patch.is_empty() {
                render(&ctx, Route::EditUser(id), 1).await?;
            } else {
                edit_user(&ctx, id, patch).await?;
            }
        }
        Commands::Add {
            first_name,
            last_name,
            email,
            avatar,
        } => {
            require_session(&ctx, Route::AddUser).await?;
            let mut new_user = NewUser::new(first_name, last_name, email);
            if let Some(avatar) = avatar {
                new_user = new_user.with_avatar(avatar);
            }
            let user = ctx.repository.create(new_user).await?;
            println!("Created user {}.", user.id);
            print!("{}", views::user_detail(&user));
        }
        Commands::Delete { id, yes } => {
            require_session(&ctx, Route::Users).await?;
            delete_user(&ctx, id, yes).await?;
        }
    }

    Ok(())
}

/// Stop with the entry view when there is no session
async fn require_session(ctx: &AppContext, route: Route) -> anyhow::Result<()> {
    if let Navigation::Redirect(target) = ctx.guard.check(route).await? {
        print!("{}", views::static_view(target));
        bail!("Not logged in");
    }
    Ok(())
}

/// Render a view that has already passed the guard
async fn render(ctx: &AppContext, route: Route, page: u32) -> anyhow::Result<()> {
    match route {
        Route::Users => {
            let mut directory = ctx.directory();
            directory.set_page(page).await;
            print!("{}", views::directory(&directory));
            if let Some(error) = directory.error() {
                bail!("{}", error);
            }
        }
        Route::EditUser(id) => {
            let user = ctx.repository.get(id).await?;
            print!("{}", views::user_detail(&user));
            print!("\n{}", views::static_view(route));
        }
        other => print!("{}", views::static_view(other)),
    }
    Ok(())
}

async fn edit_user(ctx: &AppContext, id: UserId, patch: UserPatch) -> anyhow::Result<()> {
    let mut user = ctx.repository.get(id).await?;
    let applied = ctx.repository.update(id, patch).await?;
    applied.apply_to(&mut user);
    println!("Updated user {}.", id);

    let directory = ctx.directory_after_edit(user).await;
    print!("{}", views::directory(&directory));
    Ok(())
}

async fn delete_user(ctx: &AppContext, id: UserId, yes: bool) -> anyhow::Result<()> {
    let user = ctx.repository.get(id).await?;

    let mut directory = ctx.directory();
    directory.set_page(ctx.page_holding(id).await).await;
    directory.request_delete(id);

    if !yes && !confirm(&views::delete_prompt(&user)).await? {
        directory.cancel_delete();
        println!("Cancelled.");
        return Ok(());
    }

    if directory.confirm_delete().await.is_none() {
        bail!("{}", directory.error().unwrap_or("Failed to delete user"));
    }
    println!("Deleted user {}.", id);
    print!("{}", views::directory(&directory));
    Ok(())
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read answer")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
