use mongodb::bson::{oid::ObjectId, Bson, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::AppError;

const RESERVED_FIELDS: [&str; 3] = ["_id", "employeeEmail", "createdAt"];

/// Document of the `workSheets` collection.
///
/// Only the owner and the submission time are interpreted; task, hours, date and
/// anything else the client sends travel in `details` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkSheet {
    pub id: Option<ObjectId>,
    pub employee_email: String,
    pub created_at: Option<BsonDateTime>,
    pub details: Document,
}

impl WorkSheet {
    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        if let Some(id) = self.id {
            document.insert("_id", id);
        }
        document.insert("employeeEmail", self.employee_email);
        if let Some(created_at) = self.created_at {
            document.insert("createdAt", created_at);
        }
        for (key, value) in self.details {
            if !RESERVED_FIELDS.contains(&key.as_str()) {
                document.insert(key, value);
            }
        }
        document
    }

    pub fn from_document(mut document: Document) -> Result<Self, AppError> {
        let id = match document.remove("_id") {
            Some(Bson::ObjectId(oid)) => Some(oid),
            _ => None,
        };
        let employee_email = match document.remove("employeeEmail") {
            Some(Bson::String(email)) => email,
            _ => return Err(AppError::Database("work sheet without employeeEmail".to_string())),
        };
        let created_at = match document.remove("createdAt") {
            Some(Bson::DateTime(t)) => Some(t),
            _ => None,
        };

        Ok(WorkSheet {
            id,
            employee_email,
            created_at,
            details: document,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkSheetRequest {
    pub employee_email: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub details: Map<String, Value>,
}

impl CreateWorkSheetRequest {
    pub fn into_work_sheet(self) -> Result<WorkSheet, AppError> {
        let details = mongodb::bson::to_document(&self.details)
            .map_err(|e| AppError::InvalidRequest(format!("unsupported work sheet field: {}", e)))?;

        Ok(WorkSheet {
            id: None,
            employee_email: self.employee_email.trim().to_string(),
            created_at: Some(BsonDateTime::now()),
            details,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSheetResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_email: String,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl From<WorkSheet> for WorkSheetResponse {
    fn from(sheet: WorkSheet) -> Self {
        let details = match Bson::Document(sheet.details).into_relaxed_extjson() {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        WorkSheetResponse {
            id: sheet.id.map(|id| id.to_hex()).unwrap_or_default(),
            employee_email: sheet.employee_email,
            created_at: sheet.created_at.and_then(|t| t.try_to_rfc3339_string().ok()),
            details,
        }
    }
}
