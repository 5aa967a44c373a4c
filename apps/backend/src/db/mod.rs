//! PostgreSQL database operations

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;
use vocab_core::{
    CoreError, EntitlementSource, NewVocabularyRecord, Order, RecordStore, Session, Subscription,
    VocabularyRecord,
};

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Word Repository ===

    /// All words for a user, newest first
    pub async fn get_words(&self, user_id: Uuid) -> Result<Vec<DbWord>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, word, meaning, example, synonyms, antonyms, user_id, created_at
            FROM words
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    pub async fn insert_word(&self, word: &NewVocabularyRecord) -> Result<DbWord> {
        let row = sqlx::query_as::<_, DbWord>(
            r#"
            INSERT INTO words (word, meaning, example, synonyms, antonyms, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, word, meaning, example, synonyms, antonyms, user_id, created_at
            "#,
        )
        .bind(&word.word)
        .bind(&word.meaning)
        .bind(&word.example)
        .bind(&word.synonyms)
        .bind(&word.antonyms)
        .bind(word.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a user's word. Returns the number of rows removed.
    pub async fn delete_word(&self, user_id: Uuid, id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM words
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // === Billing Read Model ===

    pub async fn get_subscription(&self, user_id: Uuid) -> Result<Option<DbSubscription>> {
        let sub = sqlx::query_as::<_, DbSubscription>(
            r#"
            SELECT subscription_status, price_id, current_period_end, cancel_at_period_end
            FROM stripe_user_subscriptions
            WHERE user_id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    /// Orders for a user, most recent first
    pub async fn get_orders(&self, user_id: Uuid) -> Result<Vec<DbOrder>> {
        let orders = sqlx::query_as::<_, DbOrder>(
            r#"
            SELECT order_id, checkout_session_id, payment_status, amount_total, currency, order_date
            FROM stripe_user_orders
            WHERE user_id = $1
            ORDER BY order_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

fn remote(err: ApiError) -> CoreError {
    CoreError::RemoteFailure(err.to_string())
}

#[async_trait]
impl RecordStore for Database {
    async fn list(&self, owner_id: Uuid) -> vocab_core::Result<Vec<VocabularyRecord>> {
        let rows = self.get_words(owner_id).await.map_err(remote)?;
        Ok(rows.into_iter().map(DbWord::into_record).collect())
    }

    async fn insert(&self, record: NewVocabularyRecord) -> vocab_core::Result<VocabularyRecord> {
        let row = self.insert_word(&record).await.map_err(remote)?;
        Ok(row.into_record())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> vocab_core::Result<()> {
        let removed = self.delete_word(owner_id, id).await.map_err(remote)?;
        tracing::debug!(%owner_id, %id, removed, "deleted word row");
        Ok(())
    }
}

#[async_trait]
impl EntitlementSource for Database {
    async fn subscription(&self, session: &Session) -> vocab_core::Result<Option<Subscription>> {
        let row = self
            .get_subscription(session.user_id)
            .await
            .map_err(remote)?;
        Ok(row.map(DbSubscription::into_subscription))
    }

    async fn orders(&self, session: &Session) -> vocab_core::Result<Vec<Order>> {
        let rows = self.get_orders(session.user_id).await.map_err(remote)?;
        Ok(rows.into_iter().map(DbOrder::into_order).collect())
    }
}
