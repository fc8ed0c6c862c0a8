use anyhow::{Context, Result};
use ohara::types::NewBook;
use ohara::OharaClient;
use rand::Rng;
use std::fs::File;
use std::io::Write;
use time::{Duration, OffsetDateTime};

const COVER_URL: &str =
    "https://images.pexels.com/photos/random/?query=book&orientation=landscape";

const TITLES: &[&str] = &[
    "The Silent Patient",
    "Where the Crawdads Sing",
    "The Midnight Library",
    "The Vanishing Half",
    "The Seven Husbands of Evelyn Hugo",
    "The Invisible Life of Addie LaRue",
    "Circe",
    "The Song of Achilles",
    "The Night Circus",
    "The Goldfinch",
    "Big Little Lies",
    "Little Fires Everywhere",
    "Normal People",
    "Educated",
    "The Tattooist of Auschwitz",
    "The Book Thief",
    "All the Light We Cannot See",
    "The Nightingale",
    "The Help",
    "The Girl on the Train",
    "Gone Girl",
    "Sharp Objects",
    "Before We Were Strangers",
    "The Rosie Project",
    "The Alchemist",
    "The Power of Habit",
    "Atomic Habits",
    "Sapiens",
    "Becoming",
    "The 5 AM Club",
    "The Four Agreements",
    "The Secret",
    "Rich Dad Poor Dad",
    "The Intelligent Investor",
    "The Lean Startup",
    "Start with Why",
    "Zero to One",
    "The Hard Thing About Hard Things",
    "Principles",
    "The Art of War",
    "Good to Great",
    "The Innovator's Dilemma",
    "The Lean Entrepreneur",
    "The Startup Owner's Manual",
    "The E-Myth Revisited",
    "The $100 Startup",
    "The Millionaire Next Door",
];

const AUTHORS: &[&str] = &[
    "Alex Michaelides",
    "Delia Owens",
    "Matt Haig",
    "Brit Bennett",
    "Taylor Jenkins Reid",
    "V.E. Schwab",
    "Madeline Miller",
    "Erin Morgenstern",
    "Donna Tartt",
    "Liane Moriarty",
    "Celeste Ng",
    "Sally Rooney",
    "Tara Westover",
    "Heather Morris",
    "Markus Zusak",
    "Anthony Doerr",
    "Kristin Hannah",
    "Kathryn Stockett",
    "Paula Hawkins",
    "Gillian Flynn",
    "Graeme Simsion",
    "Paulo Coelho",
    "Charles Duhigg",
    "James Clear",
    "Yuval Noah Harari",
    "Michelle Obama",
    "Robin Sharma",
    "Don Miguel Ruiz",
    "Rhonda Byrne",
    "Robert Kiyosaki",
    "Benjamin Graham",
    "Eric Ries",
    "Simon Sinek",
    "Peter Thiel",
    "Ben Horowitz",
    "Ray Dalio",
    "Sun Tzu",
    "Jim Collins",
    "Clayton Christensen",
    "Brant Cooper",
    "Steve Blank",
    "Michael Gerber",
    "Chris Guillebeau",
    "Thomas J. Stanley",
];

const CATEGORIES: &[&str] = &[
    "Fiction",
    "Mystery",
    "Fantasy",
    "Historical Fiction",
    "Romance",
    "Science Fiction",
    "Biography",
    "Self-Help",
    "Business",
    "Non-Fiction",
    "Thriller",
    "Young Adult",
    "Horror",
    "Adventure",
    "Science",
    "Philosophy",
    "Psychology",
    "Health",
    "Politics",
    "Economics",
    "Religion",
    "Travel",
    "Cookbook",
    "Art",
    "Music",
    "Poetry",
    "Graphic Novel",
    "Children's",
    "Humor",
    "Sports",
    "True Crime",
    "Parenting",
    "Education",
    "Technology",
    "Environment",
    "Spirituality",
    "Mindfulness",
    "Leadership",
    "Motivation",
    "Creativity",
    "Innovation",
    "Marketing",
    "Finance",
    "Investing",
    "Entrepreneurship",
];

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

/// Synthesizes `count` book records with random progress and a last-opened
/// instant within the past year.
pub fn generate_books<R: Rng>(rng: &mut R, count: u32) -> Vec<NewBook> {
    let now = OffsetDateTime::now_utc();
    (1..=count)
        .map(|id| NewBook {
            id: i64::from(id),
            title: pick(rng, TITLES).to_string(),
            author: pick(rng, AUTHORS).to_string(),
            category: pick(rng, CATEGORIES).to_string(),
            cover_url: COVER_URL.to_string(),
            last_opened: now - Duration::days(rng.gen_range(0..=365)),
            progress: rng.gen_range(0..=100),
        })
        .collect()
}

/// Generates books, saves them to `filename`, and posts them one by one.
/// The first failed post aborts the remaining ones.
pub async fn seed_books(client: &OharaClient, count: u32, filename: &str) -> Result<()> {
    let books = generate_books(&mut rand::thread_rng(), count);

    let json =
        serde_json::to_string_pretty(&books).with_context(|| "Failed to serialize books")?;
    let mut file =
        File::create(filename).with_context(|| format!("Failed to create file: {filename}"))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write books to {filename}"))?;
    println!("Saved {} books to {filename}", books.len());

    for book in &books {
        client.create_book(book).await.with_context(|| {
            format!("Failed to post book ID {}; aborting remaining posts", book.id)
        })?;
        println!("Posted book ID {}: {}", book.id, book.title);
    }

    println!("Seeding completed successfully!");
    Ok(())
}
