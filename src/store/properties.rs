use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the property store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("property {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Listing availability, a closed enum over the two states the site knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Soldout,
}

impl ListingStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "soldout" => Some(Self::Soldout),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Soldout => f.write_str("soldout"),
        }
    }
}

/// One property listing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub rate: f64,
    /// Key into the file store; always set by the upload path.
    pub image_path: Option<String>,
    pub status: ListingStatus,
    pub sqft: i64,
    pub beds: i64,
    pub baths: i64,
    pub rating: f64,
    pub booking: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new listing; the store assigns id and created_at.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub rate: f64,
    pub image_path: Option<String>,
    pub status: ListingStatus,
    pub sqft: i64,
    pub beds: i64,
    pub baths: i64,
    pub rating: f64,
    pub booking: ListingStatus,
}

/// Partial update. Only fields present are applied; the image reference and
/// store-assigned fields are not replaceable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rate: Option<f64>,
    pub status: Option<ListingStatus>,
    pub sqft: Option<i64>,
    pub beds: Option<i64>,
    pub baths: Option<i64>,
    pub rating: Option<f64>,
    pub booking: Option<ListingStatus>,
}

impl PropertyPatch {
    fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(rate) = self.rate {
            property.rate = rate;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(sqft) = self.sqft {
            property.sqft = sqft;
        }
        if let Some(beds) = self.beds {
            property.beds = beds;
        }
        if let Some(baths) = self.baths {
            property.baths = baths;
        }
        if let Some(rating) = self.rating {
            property.rating = rating;
        }
        if let Some(booking) = self.booking {
            property.booking = booking;
        }
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS properties (
    id BLOB PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    rate REAL NOT NULL,
    image_path TEXT,
    status TEXT NOT NULL,
    sqft INTEGER NOT NULL,
    beds INTEGER NOT NULL,
    baths INTEGER NOT NULL,
    rating REAL NOT NULL,
    booking TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const COLUMNS: &str =
    "id, title, description, rate, image_path, status, sqft, beds, baths, rating, booking, created_at";

/// SQLite-backed collection of property records. Single statements are
/// atomic; the partial update runs in a transaction.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    pool: SqlitePool,
}

impl PropertyStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        tracing::info!("Opened property store at {}", url);

        Ok(Self { pool })
    }

    pub async fn create(&self, new: NewProperty) -> Result<Property, StoreError> {
        let property = Property {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            rate: new.rate,
            image_path: new.image_path,
            status: new.status,
            sqft: new.sqft,
            beds: new.beds,
            baths: new.baths,
            rating: new.rating,
            booking: new.booking,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO properties (id, title, description, rate, image_path, status, sqft, beds, baths, rating, booking, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(property.id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.rate)
        .bind(&property.image_path)
        .bind(property.status)
        .bind(property.sqft)
        .bind(property.beds)
        .bind(property.baths)
        .bind(property.rating)
        .bind(property.booking)
        .bind(property.created_at)
        .execute(&self.pool)
        .await?;

        Ok(property)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Property>, StoreError> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {COLUMNS} FROM properties WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    pub async fn list(&self) -> Result<Vec<Property>, StoreError> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {COLUMNS} FROM properties ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    /// Apply a partial update and return the full updated record.
    pub async fn update(&self, id: Uuid, patch: PropertyPatch) -> Result<Property, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Property>(&format!(
            "SELECT {COLUMNS} FROM properties WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut property) = existing else {
            return Err(StoreError::NotFound(id));
        };

        patch.apply(&mut property);

        sqlx::query(
            "UPDATE properties
             SET title = ?2, description = ?3, rate = ?4, status = ?5,
                 sqft = ?6, beds = ?7, baths = ?8, rating = ?9, booking = ?10
             WHERE id = ?1",
        )
        .bind(property.id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(property.rate)
        .bind(property.status)
        .bind(property.sqft)
        .bind(property.beds)
        .bind(property.baths)
        .bind(property.rating)
        .bind(property.booking)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(property)
    }

    /// Remove a record. A second delete on the same id reports NotFound.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Pings the store to ensure connectivity.
    pub async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
