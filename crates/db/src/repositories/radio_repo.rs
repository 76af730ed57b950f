//! Repository for the `radios` table.

use radios_core::radio::{escape_like, NameMatch};
use radios_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::radio::{CreateRadio, Radio, RadioFilter, RadioLookup, RadioQuery, UpdateRadio};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, stream_url, image, genre, created_at, updated_at";

/// Provides CRUD operations for radios.
pub struct RadioRepo;

impl RadioRepo {
    /// Insert a new radio, returning the created row.
    ///
    /// A duplicate `stream_url` fails with a unique violation on
    /// `uq_radios_stream_url`.
    pub async fn create(pool: &PgPool, input: &CreateRadio) -> Result<Radio, sqlx::Error> {
        let query = format!(
            "INSERT INTO radios (name, stream_url, image, genre)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Radio>(&query)
            .bind(&input.name)
            .bind(&input.stream_url)
            .bind(&input.image)
            .bind(&input.genre)
            .fetch_one(pool)
            .await
    }

    /// Find a radio by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Radio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM radios WHERE id = $1");
        sqlx::query_as::<_, Radio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the first radio matching `lookup`, ignoring `exclude_id`.
    pub async fn find_one(
        pool: &PgPool,
        lookup: RadioLookup<'_>,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Radio>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM radios WHERE "));
        match lookup {
            RadioLookup::Name {
                name,
                mode: NameMatch::CaseInsensitive,
            } => {
                qb.push("LOWER(name) = LOWER(").push_bind(name.to_string()).push(")");
            }
            RadioLookup::Name {
                name,
                mode: NameMatch::Exact,
            } => {
                qb.push("name = ").push_bind(name.to_string());
            }
            RadioLookup::StreamUrl(url) => {
                qb.push("stream_url = ").push_bind(url.to_string());
            }
        }
        if let Some(id) = exclude_id {
            qb.push(" AND id <> ").push_bind(id);
        }
        qb.push(" ORDER BY id LIMIT 1");

        qb.build_query_as::<Radio>().fetch_optional(pool).await
    }

    /// List radios matching the filter, sorted and paginated.
    ///
    /// `id` is always appended to the ordering so pages are stable when the
    /// sort column has ties.
    pub async fn list(pool: &PgPool, query: &RadioQuery) -> Result<Vec<Radio>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM radios"));
        push_filter(&mut qb, &query.filter);
        qb.push(format!(
            " ORDER BY {} {}, id ASC",
            query.sort.field.column(),
            query.sort.order.sql()
        ));
        qb.push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.skip);

        qb.build_query_as::<Radio>().fetch_all(pool).await
    }

    /// Count radios matching the filter.
    pub async fn count(pool: &PgPool, filter: &RadioFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM radios");
        push_filter(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Replace all four fields of a radio.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateRadio,
    ) -> Result<Option<Radio>, sqlx::Error> {
        let query = format!(
            "UPDATE radios SET
                name = $2,
                stream_url = $3,
                image = $4,
                genre = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Radio>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.stream_url)
            .bind(&input.image)
            .bind(&input.genre)
            .fetch_optional(pool)
            .await
    }

    /// Update a radio. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn patch(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRadio,
    ) -> Result<Option<Radio>, sqlx::Error> {
        let query = format!(
            "UPDATE radios SET
                name = COALESCE($2, name),
                stream_url = COALESCE($3, stream_url),
                image = COALESCE($4, image),
                genre = COALESCE($5, genre)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Radio>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.stream_url)
            .bind(&input.image)
            .bind(&input.genre)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a radio, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Radio>, sqlx::Error> {
        let query = format!("DELETE FROM radios WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Radio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Append the `WHERE` clause for a [`RadioFilter`].
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RadioFilter) {
    qb.push(" WHERE TRUE");
    if let Some(genre) = &filter.genre {
        qb.push(" AND genre = ").push_bind(genre.clone());
    }
    if let Some(search) = &filter.search {
        qb.push(" AND name ILIKE '%' || ")
            .push_bind(escape_like(search))
            .push(" || '%' ESCAPE '\\'");
    }
}
