//! In-memory [`Store`] used by the handler and service tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::cmp::Ordering;
use std::sync::Mutex;

use super::store::*;
use crate::models::shop::fields::{DISTRICT, ID, MOBILE, STATUS, TOWN};
use crate::models::shop::SHOPS_COLLECTION;
use crate::models::user::fields::EMAIL;
use crate::models::user::USERS_COLLECTION;
use crate::models::ShopStatus;

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<Document>>,
    shops: Mutex<Vec<Document>>,
    /// Enforce unique `email`/`mobile` on insert, like the startup indexes.
    unique_keys: bool,
    /// Key lookups always miss, as when a concurrent insert lands between
    /// the duplicate check and the write.
    stale_lookups: bool,
    offline: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn racing() -> Self {
        Self {
            unique_keys: true,
            stale_lookups: true,
            ..Self::default()
        }
    }

    /// Store whose every operation fails, for error-path tests.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn seed_user(&self, mut user: Document) -> ObjectId {
        let id = assign_id(&mut user);
        self.users.lock().unwrap().push(user);
        id
    }

    pub fn seed_shop(&self, mut shop: Document) -> ObjectId {
        let id = assign_id(&mut shop);
        self.shops.lock().unwrap().push(shop);
        id
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn shop(&self, id: ObjectId) -> Option<Document> {
        self.shops
            .lock()
            .unwrap()
            .iter()
            .find(|shop| shop.get_object_id(ID).ok() == Some(id))
            .cloned()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store offline");
            return Err(StoreError::Database(mongodb::error::Error::from(io)));
        }
        Ok(())
    }
}

fn assign_id(doc: &mut Document) -> ObjectId {
    match doc.get_object_id(ID) {
        Ok(id) => id,
        Err(_) => {
            let id = ObjectId::new();
            doc.insert(ID, id);
            id
        }
    }
}

/// Equality as the server applies it to a top-level field; `null` also
/// matches a missing field.
fn field_matches(doc: &Document, field: &str, expected: &Bson) -> bool {
    match (doc.get(field), expected) {
        (None, Bson::Null) => true,
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    }
}

fn has_status(doc: &Document, status: ShopStatus) -> bool {
    doc.get_str(STATUS).ok() == Some(status.as_str())
}

/// Ascending order with missing/null first, then numbers, then strings.
fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    fn rank(value: Option<&Bson>) -> u8 {
        match value {
            None | Some(Bson::Null) => 0,
            Some(Bson::Int32(_)) | Some(Bson::Int64(_)) | Some(Bson::Double(_)) => 1,
            Some(Bson::String(_)) => 2,
            Some(_) => 3,
        }
    }

    fn number(value: &Bson) -> f64 {
        match value {
            Bson::Int32(n) => f64::from(*n),
            Bson::Int64(n) => *n as f64,
            Bson::Double(n) => *n,
            _ => 0.0,
        }
    }

    let (left, right) = (a.get(field), b.get(field));
    match rank(left).cmp(&rank(right)) {
        Ordering::Equal => match (left, right) {
            (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
            (Some(x), Some(y)) if rank(left) == 1 => {
                number(x).partial_cmp(&number(y)).unwrap_or(Ordering::Equal)
            }
            _ => Ordering::Equal,
        },
        other => other,
    }
}

fn page_of(mut docs: Vec<Document>, page: PageRequest, sort_field: &str) -> Vec<Document> {
    docs.sort_by(|a, b| compare_field(a, b, sort_field));
    docs.into_iter()
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

fn insert_unique(
    docs: &Mutex<Vec<Document>>,
    mut doc: Document,
    key: &str,
    unique: bool,
    collection: &'static str,
) -> StoreResult<InsertOutcome> {
    let mut docs = docs.lock().unwrap();
    if unique {
        if let Some(value) = doc.get(key) {
            if docs.iter().any(|existing| existing.get(key) == Some(value)) {
                return Err(StoreError::DuplicateKey { collection });
            }
        }
    }

    let id = assign_id(&mut doc);
    docs.push(doc);
    Ok(InsertOutcome {
        inserted_id: Bson::ObjectId(id),
    })
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_users(&self, page: PageRequest, sort_field: &str) -> StoreResult<Vec<Document>> {
        self.check_online()?;
        let users = self.users.lock().unwrap().clone();
        Ok(page_of(users, page, sort_field))
    }

    async fn count_users(&self) -> StoreResult<u64> {
        self.check_online()?;
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn find_user_by_email(&self, email: &Bson) -> StoreResult<Option<Document>> {
        self.check_online()?;
        if self.stale_lookups {
            return Ok(None);
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| field_matches(user, EMAIL, email))
            .cloned())
    }

    async fn insert_user(&self, user: Document) -> StoreResult<InsertOutcome> {
        self.check_online()?;
        insert_unique(&self.users, user, EMAIL, self.unique_keys, USERS_COLLECTION)
    }
}

#[async_trait]
impl ShopStore for InMemoryStore {
    async fn find_shops_by_status(
        &self,
        status: ShopStatus,
        page: Option<PageRequest>,
    ) -> StoreResult<Vec<Document>> {
        self.check_online()?;
        let shops: Vec<Document> = self
            .shops
            .lock()
            .unwrap()
            .iter()
            .filter(|shop| has_status(shop, status))
            .cloned()
            .collect();

        Ok(match page {
            Some(page) => page_of(shops, page, DISTRICT),
            None => shops,
        })
    }

    async fn count_shops_by_status(&self, status: ShopStatus) -> StoreResult<u64> {
        self.check_online()?;
        Ok(self
            .shops
            .lock()
            .unwrap()
            .iter()
            .filter(|shop| has_status(shop, status))
            .count() as u64)
    }

    async fn search_shops_by_town(&self, status: ShopStatus, town: &str) -> StoreResult<Vec<Document>> {
        self.check_online()?;
        let needle = town.to_lowercase();
        Ok(self
            .shops
            .lock()
            .unwrap()
            .iter()
            .filter(|shop| has_status(shop, status))
            .filter(|shop| {
                shop.get_str(TOWN)
                    .map(|t| t.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn find_shop_by_mobile(&self, mobile: &Bson) -> StoreResult<Option<Document>> {
        self.check_online()?;
        if self.stale_lookups {
            return Ok(None);
        }
        Ok(self
            .shops
            .lock()
            .unwrap()
            .iter()
            .find(|shop| field_matches(shop, MOBILE, mobile))
            .cloned())
    }

    async fn insert_shop(&self, shop: Document) -> StoreResult<InsertOutcome> {
        self.check_online()?;
        insert_unique(&self.shops, shop, MOBILE, self.unique_keys, SHOPS_COLLECTION)
    }

    async fn set_shop_status(&self, id: ObjectId, status: ShopStatus) -> StoreResult<UpdateOutcome> {
        self.check_online()?;
        let mut shops = self.shops.lock().unwrap();
        let (matched, modified) = match shops.iter_mut().find(|shop| shop.get_object_id(ID).ok() == Some(id)) {
            Some(shop) => {
                let modified = !has_status(shop, status);
                shop.insert(STATUS, status.as_str());
                (1, u64::from(modified))
            }
            None => (0, 0),
        };

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: matched,
            modified_count: modified,
            upserted_count: 0,
            upserted_id: None,
        })
    }

    async fn delete_shop(&self, id: ObjectId) -> StoreResult<DeleteOutcome> {
        self.check_online()?;
        let mut shops = self.shops.lock().unwrap();
        let before = shops.len();
        shops.retain(|shop| shop.get_object_id(ID).ok() != Some(id));

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: (before - shops.len()) as u64,
        })
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }
}
