pub mod payment;
pub mod user;
pub mod work_sheet;

pub use payment::*;
pub use user::*;
pub use work_sheet::*;

use mongodb::bson::{oid::ObjectId, Bson};
use mongodb::results::{InsertOneResult, UpdateResult};
use serde::Serialize;

use crate::utils::AppError;

/// Shape of the driver's insertOne result, as answered by the insert endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Option<String>,
}

/// Shape of the driver's updateOne result.
#[derive(Debug, Serialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<InsertOneResult> for InsertOutcome {
    fn from(result: InsertOneResult) -> Self {
        InsertOutcome {
            acknowledged: true,
            inserted_id: Some(bson_id_to_string(&result.inserted_id)),
        }
    }
}

impl From<UpdateResult> for UpdateOutcome {
    fn from(result: UpdateResult) -> Self {
        UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.as_ref().map(bson_id_to_string),
        }
    }
}

pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidRequest(format!("invalid id: {}", raw)))
}
