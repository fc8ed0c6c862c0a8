#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::{Color, Colorize};
use ohara::types::{Book, BooksResponse, InsertUser, LoginUser};
use ohara::{Error as OharaError, OharaClient, Session};
use oharaconfig::{format_last_opened, format_timestamp, OharaConfig, StoredSession};
use std::io::{self, IsTerminal, Write};
use std::process;

mod seed;

#[derive(Parser)]
#[command(name = "oharacli", about = "A CLI for the Ohara book library")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the session token
    Login {
        /// Username (prompted for when omitted)
        username: Option<String>,
    },
    /// End the session and clear the stored token
    Logout,
    /// Register a new account (the password is prompted for)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Show the logged-in user
    Whoami,
    /// List a page of the global catalog
    Books {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Free-text filter matched against title, author, and category
        #[arg(long)]
        filter: Option<String>,
        /// Category shortcut; takes precedence over --filter
        #[arg(long)]
        category: Option<String>,
    },
    /// List a page of your own books
    Mine {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Generate synthetic book records and post them to the API
    Seed {
        /// Number of books to generate
        #[arg(long, default_value_t = 50)]
        count: u32,
        /// Local JSON file the generated records are also written to
        #[arg(long, default_value = "books.json")]
        file: String,
    },
    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// The shell to generate completions for
        shell: Shell,
    },
}

/// Builds a session from the stored config, re-adopting a persisted token
/// when one is still live.
async fn get_session() -> Result<Session> {
    let config = OharaConfig::load().with_context(|| "Failed to load ohara config")?;
    let client = OharaClient::new().with_base_url(config.api_base_url);
    let mut session = Session::new(client);
    let stored = StoredSession::load().with_context(|| "Failed to load session store")?;
    if let Some((token, expires_at)) = stored.active() {
        let restored = session
            .restore(token.to_string(), expires_at)
            .await
            .with_context(|| "Failed to restore session")?;
        if restored.is_none() {
            StoredSession::clear().with_context(|| "Failed to clear stale session")?;
        }
    }
    Ok(session)
}

fn prompt(label: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        anyhow::bail!("stdin is not interactive; cannot prompt for {label}");
    }
    eprint!("{label}: ");
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn category_color(category: &str) -> Color {
    match category {
        "Fiction" => Color::Green,
        "Non-Fiction" => Color::Blue,
        "Self-Help" => Color::Magenta,
        "Memoir" => Color::Yellow,
        _ => Color::White,
    }
}

fn format_book(book: &Book) -> String {
    let title = format!("{:32}", book.title);
    let author = format!("{:24}", book.author);
    format!(
        "{title} {author} [{}] {:>3}%  {}",
        book.category,
        book.progress,
        format_last_opened(book.last_opened)
    )
    .color(category_color(&book.category))
    .to_string()
}

fn print_books(books: &BooksResponse) {
    if books.data.is_empty() {
        println!("No books found matching your criteria");
        return;
    }
    for book in &books.data {
        println!("{}", format_book(book));
    }
    println!(
        "Page {} of {} ({} books)",
        books.meta.current_page, books.meta.total_pages, books.meta.total_items
    );
}

fn handle_error(err: &anyhow::Error) -> ! {
    if let Some(OharaError::Api {
        status,
        reason,
        message,
    }) = err.downcast_ref::<OharaError>()
    {
        eprintln!("Ohara API error ({status} {reason}): {message}");
        process::exit(1);
    }
    eprintln!("{err:#}");
    process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        handle_error(&err);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Login { username } => {
            let mut session = get_session().await?;
            let username = match username {
                Some(username) => username,
                None => prompt("Username")?,
            };
            let password = prompt("Password")?;
            let user = session.login(&LoginUser { username, password }).await?;
            println!("Welcome back, {}!", user.username);
            if let (Some(token), Some(expires_at)) = (session.token(), session.expires_at()) {
                StoredSession::save(token, expires_at)
                    .with_context(|| "Failed to store session")?;
                println!("Session expires at {}.", format_timestamp(expires_at));
            }
        }
        Command::Logout => {
            let mut session = get_session().await?;
            let result = session.logout().await;
            StoredSession::clear().with_context(|| "Failed to clear stored session")?;
            if let Err(err) = result {
                eprintln!("Logout request failed: {err}");
            }
            println!("You have been successfully logged out.");
        }
        Command::Register {
            username,
            email,
            first_name,
            last_name,
        } => {
            let mut session = get_session().await?;
            let password = prompt("Password")?;
            let new_user = InsertUser {
                username,
                password,
                email,
                first_name,
                last_name,
            };
            let created = session.register(&new_user).await?;
            println!(
                "Registration successful for {}. Please login with your credentials.",
                created.username
            );
        }
        Command::Whoami => {
            let session = get_session().await?;
            match session.user() {
                Some(user) => {
                    println!("{} <{}>", user.username, user.email);
                    if let (Some(first), Some(last)) = (&user.first_name, &user.last_name) {
                        println!("{first} {last}");
                    }
                    if let Some(expires_at) = session.expires_at() {
                        println!("Session expires at {}.", format_timestamp(expires_at));
                    }
                }
                None => println!("Not logged in."),
            }
        }
        Command::Books {
            page,
            limit,
            filter,
            category,
        } => {
            let session = get_session().await?;
            let filter = category.or(filter);
            let books = session
                .client()
                .get_books(page, limit, filter.as_deref())
                .await?;
            print_books(&books);
        }
        Command::Mine { page, limit } => {
            let session = get_session().await?;
            match session.client().get_user_books(page, limit).await {
                Ok(books) => print_books(&books),
                Err(err) if err.is_status(401) => {
                    eprintln!("Please log in to view your books");
                    process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Seed { count, file } => {
            let session = get_session().await?;
            seed::seed_books(session.client(), count, &file).await?;
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "oharacli", &mut io::stdout());
        }
    }

    Ok(())
}
