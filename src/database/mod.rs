use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::models::shop::fields::{DISTRICT, ID, MOBILE, STATUS, TOWN};
use crate::models::shop::SHOPS_COLLECTION;
use crate::models::user::fields::EMAIL;
use crate::models::user::USERS_COLLECTION;
use crate::models::{bson_to_json, ShopStatus};

pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::*;

/// Server error code for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Builds the client. The driver connects lazily, so an unreachable
    /// cluster only surfaces on the first operation (see [`Store::ping`]).
    pub async fn new(uri: &str, db_name: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // Stable API v1, same settings the Atlas cluster was provisioned with
        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build();
        client_options.server_api = Some(server_api);
        client_options.app_name = Some("mobilesebaa-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Creates the indexes backing the uniqueness rules and the shop listing.
    /// Failures are logged and never abort startup.
    pub async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let users = self.collection::<Document>(USERS_COLLECTION);
        let email_index = IndexModel::builder()
            .keys(doc! { EMAIL: 1 })
            .options(unique())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let shops = self.collection::<Document>(SHOPS_COLLECTION);
        let mobile_index = IndexModel::builder()
            .keys(doc! { MOBILE: 1 })
            .options(unique())
            .build();

        match shops.create_index(mobile_index).await {
            Ok(_) => log::info!("   ✅ Index created: shops(mobile) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create shops(mobile) index: {}", e),
        }

        let listing_index = IndexModel::builder()
            .keys(doc! { STATUS: 1, DISTRICT: 1 })
            .build();

        match shops.create_index(listing_index).await {
            Ok(_) => log::info!("   ✅ Index created: shops(status, selectedDistrict)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn find_all(
        &self,
        collection: &str,
        filter: Document,
        options: Option<FindOptions>,
    ) -> StoreResult<Vec<Document>> {
        let cursor = self
            .collection::<Document>(collection)
            .find(filter)
            .with_options(options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn insert(&self, collection: &'static str, document: Document) -> StoreResult<InsertOutcome> {
        match self.collection::<Document>(collection).insert_one(document).await {
            Ok(result) => Ok(InsertOutcome {
                inserted_id: result.inserted_id,
            }),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey { collection }),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Case-insensitive containment on the town, with `town` escaped so regex
/// metacharacters match literally.
fn town_filter(status: ShopStatus, town: &str) -> Document {
    doc! {
        STATUS: status.as_str(),
        TOWN: { "$regex": regex::escape(town), "$options": "i" },
    }
}

fn paged_options(page: PageRequest, sort: Document) -> FindOptions {
    FindOptions::builder()
        .sort(sort)
        .skip(page.skip)
        .limit(page.limit as i64)
        .build()
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_users(&self, page: PageRequest, sort_field: &str) -> StoreResult<Vec<Document>> {
        let options = paged_options(page, doc! { sort_field: 1 });
        self.find_all(USERS_COLLECTION, doc! {}, Some(options)).await
    }

    async fn count_users(&self) -> StoreResult<u64> {
        Ok(self
            .collection::<Document>(USERS_COLLECTION)
            .count_documents(doc! {})
            .await?)
    }

    async fn find_user_by_email(&self, email: &Bson) -> StoreResult<Option<Document>> {
        Ok(self
            .collection::<Document>(USERS_COLLECTION)
            .find_one(doc! { EMAIL: email.clone() })
            .await?)
    }

    async fn insert_user(&self, user: Document) -> StoreResult<InsertOutcome> {
        self.insert(USERS_COLLECTION, user).await
    }
}

#[async_trait]
impl ShopStore for MongoDB {
    async fn find_shops_by_status(
        &self,
        status: ShopStatus,
        page: Option<PageRequest>,
    ) -> StoreResult<Vec<Document>> {
        let filter = doc! { STATUS: status.as_str() };
        let options = page.map(|page| paged_options(page, doc! { DISTRICT: 1 }));

        self.find_all(SHOPS_COLLECTION, filter, options).await
    }

    async fn count_shops_by_status(&self, status: ShopStatus) -> StoreResult<u64> {
        Ok(self
            .collection::<Document>(SHOPS_COLLECTION)
            .count_documents(doc! { STATUS: status.as_str() })
            .await?)
    }

    async fn search_shops_by_town(&self, status: ShopStatus, town: &str) -> StoreResult<Vec<Document>> {
        self.find_all(SHOPS_COLLECTION, town_filter(status, town), None).await
    }

    async fn find_shop_by_mobile(&self, mobile: &Bson) -> StoreResult<Option<Document>> {
        Ok(self
            .collection::<Document>(SHOPS_COLLECTION)
            .find_one(doc! { MOBILE: mobile.clone() })
            .await?)
    }

    async fn insert_shop(&self, shop: Document) -> StoreResult<InsertOutcome> {
        self.insert(SHOPS_COLLECTION, shop).await
    }

    async fn set_shop_status(&self, id: ObjectId, status: ShopStatus) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection::<Document>(SHOPS_COLLECTION)
            .update_one(
                doc! { ID: id },
                doc! { "$set": { STATUS: status.as_str() } },
            )
            .await?;

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(bson_to_json),
        })
    }

    async fn delete_shop(&self, id: ObjectId) -> StoreResult<DeleteOutcome> {
        let result = self
            .collection::<Document>(SHOPS_COLLECTION)
            .delete_one(doc! { ID: id })
            .await?;

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
