use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use radios_core::radio::{name_contains, SortField, SortOrder};
use radios_core::types::DbId;
use tokio::sync::RwLock;

use super::{RadioStore, StoreError, STREAM_URL_CONSTRAINT};
use crate::models::radio::{CreateRadio, Radio, RadioFilter, RadioLookup, RadioQuery, UpdateRadio};

/// In-process [`RadioStore`]. Filtering, pagination and stream URL
/// uniqueness match the PostgreSQL store. Text sorts case-folded first,
/// which approximates a locale collation but is not byte-identical to it.
/// Contents are lost on drop.
#[derive(Default)]
pub struct MemoryRadioStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: DbId,
    rows: BTreeMap<DbId, Radio>,
}

impl MemoryState {
    /// Mirror of `uq_radios_stream_url`.
    fn ensure_stream_url_free(&self, url: &str, exclude_id: Option<DbId>) -> Result<(), StoreError> {
        let taken = self
            .rows
            .values()
            .any(|r| r.stream_url == url && Some(r.id) != exclude_id);
        if taken {
            return Err(StoreError::UniqueViolation {
                constraint: STREAM_URL_CONSTRAINT.to_string(),
            });
        }
        Ok(())
    }

    fn filtered<'a>(&'a self, filter: &'a RadioFilter) -> impl Iterator<Item = &'a Radio> + 'a {
        self.rows.values().filter(move |r| matches_filter(r, filter))
    }
}

impl MemoryRadioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(radio: &Radio, filter: &RadioFilter) -> bool {
    if let Some(genre) = &filter.genre {
        if radio.genre != *genre {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        if !name_contains(&radio.name, search) {
            return false;
        }
    }
    true
}

/// Case-folded order, raw value as tie-break.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare(a: &Radio, b: &Radio, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Genre => compare_text(&a.genre, &b.genre),
        SortField::StreamUrl => compare_text(&a.stream_url, &b.stream_url),
        SortField::Image => compare_text(&a.image, &b.image),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl RadioStore for MemoryRadioStore {
    async fn find(&self, query: &RadioQuery) -> Result<Vec<Radio>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<&Radio> = state.filtered(&query.filter).collect();

        rows.sort_by(|a, b| {
            let ord = compare(a, b, query.sort.field);
            let ord = match query.sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        });

        Ok(rows
            .into_iter()
            .skip(to_usize(query.skip))
            .take(to_usize(query.limit))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &RadioFilter) -> Result<i64, StoreError> {
        let state = self.state.read().await;
        Ok(state.filtered(filter).count() as i64)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Radio>, StoreError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn find_one(
        &self,
        lookup: RadioLookup<'_>,
        exclude_id: Option<DbId>,
    ) -> Result<Option<Radio>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .find(|r| Some(r.id) != exclude_id && lookup.matches(r))
            .cloned())
    }

    async fn insert(&self, input: &CreateRadio) -> Result<Radio, StoreError> {
        let mut state = self.state.write().await;
        state.ensure_stream_url_free(&input.stream_url, None)?;

        state.last_id += 1;
        let now = Utc::now();
        let radio = Radio {
            id: state.last_id,
            name: input.name.clone(),
            stream_url: input.stream_url.clone(),
            image: input.image.clone(),
            genre: input.genre.clone(),
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(radio.id, radio.clone());
        Ok(radio)
    }

    async fn update(&self, id: DbId, input: &CreateRadio) -> Result<Option<Radio>, StoreError> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        state.ensure_stream_url_free(&input.stream_url, Some(id))?;

        let Some(radio) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        radio.name = input.name.clone();
        radio.stream_url = input.stream_url.clone();
        radio.image = input.image.clone();
        radio.genre = input.genre.clone();
        radio.updated_at = Utc::now();
        Ok(Some(radio.clone()))
    }

    async fn patch(&self, id: DbId, input: &UpdateRadio) -> Result<Option<Radio>, StoreError> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(url) = &input.stream_url {
            state.ensure_stream_url_free(url, Some(id))?;
        }

        let Some(radio) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            radio.name = name.clone();
        }
        if let Some(url) = &input.stream_url {
            radio.stream_url = url.clone();
        }
        if let Some(image) = &input.image {
            radio.image = image.clone();
        }
        if let Some(genre) = &input.genre {
            radio.genre = genre.clone();
        }
        radio.updated_at = Utc::now();
        Ok(Some(radio.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<Option<Radio>, StoreError> {
        Ok(self.state.write().await.rows.remove(&id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use radios_core::radio::{NameMatch, RadioSort};

    use super::*;

    fn radio(name: &str, url: &str, genre: &str) -> CreateRadio {
        CreateRadio {
            image: format!("https://img.example/{name}.png"),
            name: name.to_string(),
            stream_url: url.to_string(),
            genre: genre.to_string(),
        }
    }

    fn query(filter: RadioFilter, skip: i64, limit: i64) -> RadioQuery {
        RadioQuery {
            filter,
            sort: RadioSort::default(),
            skip,
            limit,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryRadioStore::new();
        let a = store.insert(&radio("A", "http://a", "Jazz")).await.unwrap();
        let b = store.insert(&radio("B", "http://b", "Jazz")).await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn duplicate_stream_url_is_a_unique_violation() {
        let store = MemoryRadioStore::new();
        store.insert(&radio("A", "http://a", "Jazz")).await.unwrap();
        let err = store.insert(&radio("B", "http://a", "Jazz")).await.unwrap_err();
        assert_matches!(err, StoreError::UniqueViolation { constraint } if constraint == STREAM_URL_CONSTRAINT);
    }

    #[tokio::test]
    async fn find_paginates_in_name_order() {
        let store = MemoryRadioStore::new();
        for i in (1..=12).rev() {
            store
                .insert(&radio(&format!("Radio {i:02}"), &format!("http://{i}"), "Pop"))
                .await
                .unwrap();
        }

        let page = store.find(&query(RadioFilter::default(), 5, 5)).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Radio 06", "Radio 07", "Radio 08", "Radio 09", "Radio 10"]);
        assert_eq!(store.count(&RadioFilter::default()).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn name_order_ignores_case() {
        let store = MemoryRadioStore::new();
        store.insert(&radio("Banana", "http://b", "Pop")).await.unwrap();
        store.insert(&radio("apple", "http://a", "Pop")).await.unwrap();
        store.insert(&radio("Cherry", "http://c", "Pop")).await.unwrap();

        let page = store.find(&query(RadioFilter::default(), 0, 10)).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["apple", "Banana", "Cherry"]);
    }

    #[tokio::test]
    async fn descending_sort_keeps_id_tie_breaker() {
        let store = MemoryRadioStore::new();
        let first = store.insert(&radio("A", "http://a", "Jazz")).await.unwrap();
        let second = store.insert(&radio("B", "http://b", "Jazz")).await.unwrap();
        store.insert(&radio("C", "http://c", "Blues")).await.unwrap();

        let mut q = query(RadioFilter::default(), 0, 10);
        q.sort = RadioSort::parse(Some("-genre")).unwrap();
        let ids: Vec<_> = store.find(&q).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(&ids[..2], &[first.id, second.id]);
    }

    #[tokio::test]
    async fn genre_filter_is_exact_and_search_is_case_insensitive() {
        let store = MemoryRadioStore::new();
        store.insert(&radio("Rock FM", "http://rock", "Rock")).await.unwrap();
        store.insert(&radio("Jazz Lounge", "http://jazz", "Jazz")).await.unwrap();
        store.insert(&radio("Smooth", "http://smooth", "jazz")).await.unwrap();

        let jazz = RadioFilter::new(Some("Jazz".into()), None);
        let found = store.find(&query(jazz.clone(), 0, 10)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Jazz Lounge");
        assert_eq!(store.count(&jazz).await.unwrap(), 1);

        let roc = RadioFilter::new(None, Some("roc".into()));
        let found = store.find(&query(roc, 0, 10)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Rock FM");
    }

    #[tokio::test]
    async fn find_one_honours_exclusion_and_case_mode() {
        let store = MemoryRadioStore::new();
        let rock = store.insert(&radio("Rock FM", "http://rock", "Rock")).await.unwrap();

        let insensitive = RadioLookup::Name {
            name: "ROCK fm",
            mode: NameMatch::CaseInsensitive,
        };
        assert!(store.find_one(insensitive, None).await.unwrap().is_some());
        assert!(store.find_one(insensitive, Some(rock.id)).await.unwrap().is_none());

        let exact = RadioLookup::Name {
            name: "ROCK fm",
            mode: NameMatch::Exact,
        };
        assert!(store.find_one(exact, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_return_none() {
        let store = MemoryRadioStore::new();
        assert!(store.update(42, &radio("A", "http://a", "Jazz")).await.unwrap().is_none());
        assert!(store.patch(42, &UpdateRadio::default()).await.unwrap().is_none());
        assert!(store.delete(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_changes_only_supplied_fields() {
        let store = MemoryRadioStore::new();
        let created = store.insert(&radio("A", "http://a", "Jazz")).await.unwrap();

        let patch = UpdateRadio {
            genre: Some("Blues".into()),
            ..Default::default()
        };
        let patched = store.patch(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(patched.genre, "Blues");
        assert_eq!(patched.name, created.name);
        assert_eq!(patched.stream_url, created.stream_url);
    }
}
