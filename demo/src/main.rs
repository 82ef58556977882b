//! Replays a typical bookshop session and prints every result as JSON.

use anyhow::Result;
use bookshop_core::{Bookshop, Credentials, ReviewDraft, DEFAULT_BASE_URL};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookshop-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the bookshop API
    #[arg(default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print<T: Serialize>(label: &str, value: &T) -> Result<()> {
    println!("{label}: {}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "bookshop_demo=debug,bookshop_core=debug"
    } else {
        "bookshop_demo=info,bookshop_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let shop = Bookshop::new(&cli.base_url);
    let isbn = "978-3-16-148410-0";
    let author = "J.K. Rowling";
    let title = "Harry Potter";
    let book_id = "123456";
    let user = Credentials::new("john_doe", "password123");

    print("book list", &shop.get_book_list().await)?;
    print("books by ISBN", &shop.get_books_by_isbn(isbn).await)?;
    print("books by author", &shop.get_books_by_author(author).await)?;
    print("books by title", &shop.get_books_by_title(title).await)?;
    print("book review", &shop.get_book_review(book_id).await)?;
    print("registered user", &shop.register_new_user(&user).await)?;
    print("logged in user", &shop.login_user(&user).await)?;

    let draft = ReviewDraft {
        rating: 4,
        comment: "Great book!".to_string(),
    };
    print(
        "review added",
        &shop.add_modify_book_review(book_id, &draft).await,
    )?;
    print(
        "review deleted",
        &shop.delete_book_review(book_id, "7890").await,
    )?;
    print("all books", &shop.get_all_books().await)?;

    match shop.search_by_isbn(isbn).await {
        Ok(books) => print("search by ISBN", &books)?,
        Err(err) => eprintln!("search by ISBN failed: {err}"),
    }

    print("search by author", &shop.search_by_author(author).await)?;
    print("search by title", &shop.search_by_title(title).await)?;

    Ok(())
}
