//! Dataset loading
//!
//! Fetches the titles CSV from its source, decodes it as Latin-1 and cleans it
//! into an immutable [`Catalog`]. Loaded catalogs are memoized per source in a
//! [`DatasetCache`] for the lifetime of the process.
//!
//! Cleaning order:
//! 1. Skip malformed lines (parser errors, more fields than the header)
//! 2. Drop rows missing any required field
//! 3. Exclude country `0`, genre `short`, platforms `canal+` / `m6`
//! 4. Coerce the year, dropping non-numeric values, and fix years above 3000
//! 5. Derive the decade and normalize text fields

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client as HttpClient;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{correct_year, normalize_text, CatalogOptions, TitleRecord},
};

const COL_YEAR: &str = "year";
const COL_PLATFORM: &str = "plateforme";
const COL_GENRE: &str = "genre_hierarchie";
const COL_COUNTRY: &str = "main_country";
const COL_TITLE: &str = "title";

const EXCLUDED_COUNTRY: &str = "0";
const EXCLUDED_GENRE: &str = "short";
const EXCLUDED_PLATFORMS: [&str; 2] = ["canal+", "m6"];

/// Cell values read as missing
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Where the raw dataset bytes come from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Stable key identifying this source in the cache
    fn identity(&self) -> String;

    /// Reads the whole raw file
    async fn fetch(&self) -> AppResult<Vec<u8>>;
}

/// Dataset served over HTTP(S)
pub struct HttpSource {
    http_client: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl DatasetSource for HttpSource {
    fn identity(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> AppResult<Vec<u8>> {
        tracing::info!(url = %self.url, "Downloading dataset");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;

        tracing::debug!(bytes = body.len(), "Dataset downloaded");
        Ok(body.to_vec())
    }
}

/// Dataset stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DatasetSource for FileSource {
    fn identity(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> AppResult<Vec<u8>> {
        tracing::info!(path = %self.path.display(), "Reading dataset");
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Picks the source implementation for a configured location
pub fn source_for(location: &str) -> Arc<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        Arc::new(FileSource::new(location))
    }
}

/// Row counts gathered while cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub malformed: usize,
    pub missing_fields: usize,
    pub excluded: usize,
    pub bad_year: usize,
    pub kept: usize,
}

/// The cleaned, read-only table of titles
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<TitleRecord>,
    report: LoadReport,
}

impl Catalog {
    pub fn from_records(records: Vec<TitleRecord>) -> Self {
        let report = LoadReport {
            rows_read: records.len(),
            kept: records.len(),
            ..LoadReport::default()
        };
        Self { records, report }
    }

    pub fn records(&self) -> &[TitleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Distinct decades, countries and genres, each sorted ascending
    pub fn options(&self) -> CatalogOptions {
        let mut decades = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut genres = BTreeSet::new();

        for record in &self.records {
            decades.insert(record.decade);
            countries.insert(record.main_country.as_str());
            genres.insert(record.genre_hierarchie.as_str());
        }

        CatalogOptions {
            decades: decades.into_iter().collect(),
            countries: countries.into_iter().map(str::to_string).collect(),
            genres: genres.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Why a row did not make it into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    MissingField,
    Excluded,
    BadYear,
}

struct Columns {
    year: usize,
    platform: usize,
    genre: usize,
    country: usize,
    title: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> AppResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| AppError::Dataset(format!("missing required column '{}'", name)))
        };

        Ok(Self {
            year: find(COL_YEAR)?,
            platform: find(COL_PLATFORM)?,
            genre: find(COL_GENRE)?,
            country: find(COL_COUNTRY)?,
            title: find(COL_TITLE)?,
        })
    }
}

/// Decodes and cleans a raw Latin-1 CSV into a catalog
pub fn parse_catalog(bytes: &[u8]) -> AppResult<Catalog> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::Dataset("dataset is empty".to_string()));
    }

    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in reader.records() {
        report.rows_read += 1;

        let row = match result {
            Ok(row) if row.len() <= headers.len() => row,
            Ok(row) => {
                tracing::trace!(line = ?row.position().map(|p| p.line()), "Skipping overlong line");
                report.malformed += 1;
                continue;
            }
            Err(e) => {
                tracing::trace!(error = %e, "Skipping malformed line");
                report.malformed += 1;
                continue;
            }
        };

        match clean_row(&row, &columns) {
            Ok(record) => records.push(record),
            Err(Rejection::MissingField) => report.missing_fields += 1,
            Err(Rejection::Excluded) => report.excluded += 1,
            Err(Rejection::BadYear) => report.bad_year += 1,
        }
    }

    report.kept = records.len();

    tracing::info!(
        rows_read = report.rows_read,
        malformed = report.malformed,
        missing_fields = report.missing_fields,
        excluded = report.excluded,
        bad_year = report.bad_year,
        kept = report.kept,
        "Dataset cleaned"
    );

    Ok(Catalog { records, report })
}

fn clean_row(row: &csv::StringRecord, columns: &Columns) -> Result<TitleRecord, Rejection> {
    let field = |idx: usize| {
        row.get(idx)
            .filter(|value| !NULL_TOKENS.contains(value))
            .ok_or(Rejection::MissingField)
    };

    let year = field(columns.year)?;
    let platform = field(columns.platform)?;
    let genre = field(columns.genre)?;
    let country = field(columns.country)?;
    let title = field(columns.title)?;

    let country = normalize_text(country);
    let genre = normalize_text(genre);
    let platform = platform.trim();

    if country == EXCLUDED_COUNTRY
        || genre == EXCLUDED_GENRE
        || EXCLUDED_PLATFORMS.contains(&platform.to_lowercase().as_str())
    {
        return Err(Rejection::Excluded);
    }

    let year = parse_year(year).ok_or(Rejection::BadYear)?;

    Ok(TitleRecord::new(
        title.trim(),
        correct_year(year),
        country,
        genre,
        platform,
    ))
}

/// Integer or float text, floats truncated toward zero
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i64>() {
        return i32::try_from(year).ok();
    }

    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return None;
    }
    Some(truncated as i32)
}

/// Process-wide memo of loaded catalogs keyed by source identity
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached catalog for `source`, loading it on first access
    pub async fn get_or_load(&self, source: &dyn DatasetSource) -> AppResult<Arc<Catalog>> {
        let key = source.identity();

        if let Some(catalog) = self.entries.read().await.get(&key) {
            tracing::debug!(source = %key, "Dataset cache hit");
            return Ok(catalog.clone());
        }

        let mut entries = self.entries.write().await;
        if let Some(catalog) = entries.get(&key) {
            return Ok(catalog.clone());
        }

        tracing::debug!(source = %key, "Dataset cache miss");
        let bytes = source.fetch().await?;
        let catalog = Arc::new(parse_catalog(&bytes)?);
        entries.insert(key, catalog.clone());

        Ok(catalog)
    }
}
