/// Generic, timeout-bounded operations over named collections
///
/// Each entity lives in one document table; [`Collection`] is the single
/// code path for list/get/insert/update against it, parameterized by the
/// entity schema through the [`Document`] trait. Handlers receive their
/// collection handles through [`Store`], injected at construction.
///
/// Two deliberate properties of this layer:
///
/// - `update` is strict: a filter matching no record fails with
///   [`StoreError::NotFound`]. Create and update are separate operations,
///   so a mistyped filter can never silently create a ghost record.
/// - every operation is bounded by the configured per-operation timeout
///   and surfaces [`StoreError::Timeout`] instead of hanging the request.
///
/// # Example
///
/// ```no_run
/// use mesa_shared::db::store::{Collection, Filter};
/// use mesa_shared::models::menu::Menu;
/// use std::time::Duration;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let menus: Collection<Menu> = Collection::new(pool, Duration::from_secs(100));
/// let menu = menus.get(Filter::by("menu_id", "9f8a72c1e4b0")).await?;
/// println!("{} ({})", menu.name, menu.category);
/// # Ok(())
/// # }
/// ```
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;
use uuid::Uuid;

use crate::models::invoice::Invoice;
use crate::models::menu::Menu;
use crate::models::order::Order;
use crate::models::order_item::OrderItem;
use crate::models::table::Table;
use crate::models::user::User;

/// Entity schema stored in a named collection
///
/// Implementors carry their external ID inside the document; the store
/// never assigns identifiers.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin {
    /// Name of the backing collection table
    const COLLECTION: &'static str;

    /// The entity's external ID, derived once at creation
    fn external_id(&self) -> &str;
}

/// Error type for store operations
///
/// `NotFound` (zero matches on a `get`/`update`) is distinct from `Query`
/// (the store itself is unreachable or rejected the operation).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record matched the filter
    #[error("no matching record in `{collection}`")]
    NotFound { collection: &'static str },

    /// The operation exceeded the per-operation bound
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store failed or was unreachable
    #[error("store query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A stored document did not decode into the entity schema
    #[error("stored document is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Equality filter over document fields, AND-combined
///
/// An empty filter matches every record. Matching uses JSONB containment,
/// so a filter is just the partial document the record must contain.
#[derive(Debug, Clone, Default)]
pub struct Filter(serde_json::Map<String, Value>);

impl Filter {
    /// Matches every record in the collection
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches records whose `field` equals `value`
    pub fn by(field: &str, value: impl Into<Value>) -> Self {
        Self::default().and(field, value)
    }

    /// Adds another equality condition
    pub fn and(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Field-level merge of a patch document into a stored document
///
/// Fields present in the patch overwrite; absent fields are untouched.
/// Patch structs skip `None` fields during serialization, so an explicit
/// null never reaches this function through the public API; one showing
/// up anyway is treated as absent.
pub fn merge_fields(doc: &mut Value, patch: &Value) {
    if let (Value::Object(doc), Value::Object(patch)) = (doc, patch) {
        for (field, value) in patch {
            if !value.is_null() {
                doc.insert(field.clone(), value.clone());
            }
        }
    }
}

/// Handle to one named collection
pub struct Collection<T> {
    pool: PgPool,
    op_timeout: Duration,
    _marker: PhantomData<T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            op_timeout: self.op_timeout,
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self {
            pool,
            op_timeout,
            _marker: PhantomData,
        }
    }

    /// Runs a store future under the per-operation bound
    async fn bounded<O>(
        &self,
        fut: impl Future<Output = Result<O, StoreError>>,
    ) -> Result<O, StoreError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.op_timeout)),
        }
    }

    /// Returns all records matching `filter`, in insertion order
    ///
    /// Zero matches is an empty vec, never an error.
    pub async fn list(&self, filter: Filter) -> Result<Vec<T>, StoreError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY created_at, id",
            T::COLLECTION
        );
        self.bounded(async {
            let docs: Vec<Value> = sqlx::query_scalar(&sql)
                .bind(filter.to_value())
                .fetch_all(&self.pool)
                .await?;

            docs.into_iter()
                .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    /// Returns one window of matching records, for pagination
    pub async fn list_window(
        &self,
        filter: Filter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<T>, StoreError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY created_at, id LIMIT $2 OFFSET $3",
            T::COLLECTION
        );
        self.bounded(async {
            let docs: Vec<Value> = sqlx::query_scalar(&sql)
                .bind(filter.to_value())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

            docs.into_iter()
                .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }

    /// Counts records matching `filter`
    pub async fn count(&self, filter: Filter) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE doc @> $1", T::COLLECTION);
        self.bounded(async {
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(filter.to_value())
                .fetch_one(&self.pool)
                .await?;
            Ok(count)
        })
        .await
    }

    /// Returns the first matching record, if any
    pub async fn find(&self, filter: Filter) -> Result<Option<T>, StoreError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY created_at, id LIMIT 1",
            T::COLLECTION
        );
        self.bounded(async {
            let doc: Option<Value> = sqlx::query_scalar(&sql)
                .bind(filter.to_value())
                .fetch_optional(&self.pool)
                .await?;

            doc.map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    /// Returns the first matching record, failing with `NotFound` on zero
    /// matches
    pub async fn get(&self, filter: Filter) -> Result<T, StoreError> {
        self.find(filter).await?.ok_or(StoreError::NotFound {
            collection: T::COLLECTION,
        })
    }

    /// Inserts a record and returns its external ID
    ///
    /// The caller pre-populates the external ID; the store assigns
    /// nothing.
    pub async fn insert(&self, record: &T) -> Result<String, StoreError> {
        let sql = format!("INSERT INTO {} (doc) VALUES ($1)", T::COLLECTION);
        let doc = serde_json::to_value(record)?;
        let external_id = record.external_id().to_string();

        self.bounded(async {
            sqlx::query(&sql).bind(doc).execute(&self.pool).await?;
            Ok(external_id)
        })
        .await
    }

    /// Applies a field-level merge of `patch` to the first matching record
    ///
    /// Present patch fields overwrite, absent fields are untouched, and
    /// `updated_at` is always refreshed. Fails with `NotFound` when the
    /// filter matches nothing; update never creates records.
    pub async fn update<P: Serialize + Sync>(
        &self,
        filter: Filter,
        patch: &P,
    ) -> Result<T, StoreError> {
        let select_sql = format!(
            "SELECT id, doc FROM {} WHERE doc @> $1 ORDER BY created_at, id LIMIT 1",
            T::COLLECTION
        );
        let update_sql = format!(
            "UPDATE {} SET doc = $1, updated_at = NOW() WHERE id = $2 RETURNING doc",
            T::COLLECTION
        );
        let patch = serde_json::to_value(patch)?;

        self.bounded(async {
            let row: Option<(Uuid, Value)> = sqlx::query_as(&select_sql)
                .bind(filter.to_value())
                .fetch_optional(&self.pool)
                .await?;

            let (id, mut doc) = row.ok_or(StoreError::NotFound {
                collection: T::COLLECTION,
            })?;

            merge_fields(&mut doc, &patch);
            if let Value::Object(fields) = &mut doc {
                fields.insert("updated_at".to_string(), serde_json::json!(Utc::now()));
            }

            let updated: Value = sqlx::query_scalar(&update_sql)
                .bind(doc)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

            serde_json::from_value(updated).map_err(StoreError::from)
        })
        .await
    }
}

/// Collection handles for every entity, injected into handlers
///
/// Constructed once at startup; handlers never reach collections through
/// globals.
#[derive(Clone)]
pub struct Store {
    pub users: Collection<User>,
    pub menus: Collection<Menu>,
    pub tables: Collection<Table>,
    pub orders: Collection<Order>,
    pub order_items: Collection<OrderItem>,
    pub invoices: Collection<Invoice>,
}

impl Store {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self {
            users: Collection::new(pool.clone(), op_timeout),
            menus: Collection::new(pool.clone(), op_timeout),
            tables: Collection::new(pool.clone(), op_timeout),
            orders: Collection::new(pool.clone(), op_timeout),
            order_items: Collection::new(pool.clone(), op_timeout),
            invoices: Collection::new(pool, op_timeout),
        }
    }
}
