pub mod store;
#[cfg(test)]
pub mod memory;

pub use store::Store;

use mongodb::{bson::doc, options::IndexOptions, Client, Collection, Database, IndexModel};
use std::error::Error;

pub const USERS: &str = "users";
pub const PAYMENTS: &str = "payments";
pub const WORK_SHEETS: &str = "workSheets";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("employee-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Ping to confirm a successful connection
        client.database("admin").run_command(doc! { "ping": 1 }).await?;
        log::info!("✅ Pinged deployment, using database {}", db_name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS);

        // One account per email
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) unique index: {}", e),
        }

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "isVerified": 1 })
            .build();

        match users.create_index(role_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(role, isVerified)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let payments = self.collection::<mongodb::bson::Document>(PAYMENTS);

        let period_index = IndexModel::builder()
            .keys(doc! { "userEmail": 1, "paymentFor": 1 })
            .build();

        match payments.create_index(period_index).await {
            Ok(_) => log::info!("   ✅ Index created: payments(userEmail, paymentFor)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let payments_user_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match payments.create_index(payments_user_index).await {
            Ok(_) => log::info!("   ✅ Index created: payments(userId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let work_sheets = self.collection::<mongodb::bson::Document>(WORK_SHEETS);

        let owner_index = IndexModel::builder()
            .keys(doc! { "employeeEmail": 1, "createdAt": -1 })
            .build();

        match work_sheets.create_index(owner_index).await {
            Ok(_) => log::info!("   ✅ Index created: workSheets(employeeEmail, createdAt)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
