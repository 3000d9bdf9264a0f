//! Fixture generation for the mapping benchmarks.
//!
//! A run maps exactly one randomized `BookDto`. The random source is an
//! explicit `ChaCha8Rng`, so a fixed seed reproduces the same fixture:
//!
//! ```text
//! seed (CLI or OS entropy) -> ChaCha8Rng -> generate() -> validate() -> fixture
//! ```

use crate::error::{BenchError, Result};
use crate::model::{AuthorDto, BookDto};

use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Length of the generated ISBN.
pub const ISBN_LEN: usize = 13;

/// Inclusive page range.
pub const PAGES: (i32, i32) = (100, 1000);

/// Price range in cents, inclusive.
const PRICE_CENTS: (u32, u32) = (1_000, 10_000);

/// Ratings are drawn from `[0, MAX_RATING)`.
pub const MAX_RATING: f64 = 5.0;

const LOCALES: &[&str] = &[
    "en", "en_GB", "de", "fr", "es", "it", "nl", "pt_BR", "sv", "ja", "ko", "zh_CN",
];

/// Resolve the run seed: an explicit seed wins, otherwise draw one from OS entropy.
pub fn resolve_seed(seed: Option<u64>) -> Result<u64> {
    if let Some(seed) = seed {
        return Ok(seed);
    }

    let mut buf = [0u8; 8];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| BenchError::FixtureGeneration(format!("OS entropy unavailable: {e}")))?;
    Ok(u64::from_le_bytes(buf))
}

/// Build the generator for a resolved seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn published_date<R: Rng>(rng: &mut R) -> String {
    let year = rng.gen_range(2000..=2024);
    let month = rng.gen_range(1..=12);
    // Capped at 28 so every month is valid.
    let day = rng.gen_range(1..=28);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Generate one fully populated fixture.
pub fn generate<R: Rng>(rng: &mut R) -> Result<BookDto> {
    let title: String = Sentence(3..8).fake_with_rng(rng);
    let author: String = Name().fake_with_rng(rng);
    let published_date = published_date(rng);
    let isbn: String = (0..ISBN_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect();
    let pages = rng.gen_range(PAGES.0..=PAGES.1);
    let publisher: String = CompanyName().fake_with_rng(rng);
    let genre: String = Word().fake_with_rng(rng);
    let price = f64::from(rng.gen_range(PRICE_CENTS.0..=PRICE_CENTS.1)) / 100.0;
    let is_ebook = rng.gen_bool(0.5);
    let language = LOCALES
        .choose(rng)
        .map(|l| l.to_string())
        .ok_or_else(|| BenchError::FixtureGeneration("empty locale table".to_string()))?;
    let rating = rng.gen_range(0.0..MAX_RATING);

    let dto = BookDto {
        title,
        author: Some(AuthorDto { name: author }),
        published_date,
        isbn,
        pages,
        publisher,
        genre,
        price,
        is_ebook,
        language,
        rating,
    };

    validate(&dto)?;
    Ok(dto)
}

/// Check that a fixture is fully populated and within its domain ranges.
pub fn validate(dto: &BookDto) -> Result<()> {
    let invalid = |field: &str| -> Result<()> {
        Err(BenchError::FixtureGeneration(format!("field `{field}` is invalid")))
    };

    let strings = [
        ("title", &dto.title),
        ("published_date", &dto.published_date),
        ("publisher", &dto.publisher),
        ("genre", &dto.genre),
        ("language", &dto.language),
    ];
    for (field, value) in strings {
        if value.trim().is_empty() {
            return invalid(field);
        }
    }

    match &dto.author {
        Some(author) if !author.name.trim().is_empty() => {}
        _ => return invalid("author"),
    }
    if dto.isbn.len() != ISBN_LEN || !dto.isbn.chars().all(|c| c.is_ascii_alphanumeric()) {
        return invalid("isbn");
    }
    if !(PAGES.0..=PAGES.1).contains(&dto.pages) {
        return invalid("pages");
    }
    if !dto.price.is_finite() || dto.price <= 0.0 {
        return invalid("price");
    }
    if !(0.0..MAX_RATING).contains(&dto.rating) {
        return invalid("rating");
    }

    Ok(())
}

/// Hex SHA-256 of the fixture's bincode encoding.
pub fn fingerprint(dto: &BookDto) -> Result<String> {
    let bytes = bincode::serialize(dto)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}
