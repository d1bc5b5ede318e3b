use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document of the `users` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_fired: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_account_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub role: Option<Role>,
    pub designation: Option<String>,
    pub bank_account_no: Option<String>,
    pub salary: Option<f64>,
}

impl RegisterUserRequest {
    /// Validates a self-registration and turns it into a fresh, unverified user.
    pub fn into_user(self) -> Result<User, AppError> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::InvalidRequest("email is required".to_string()));
        }

        let role = self.role.unwrap_or_default();
        if role == Role::Admin {
            return Err(AppError::InvalidRequest(
                "admin accounts cannot be self-registered".to_string(),
            ));
        }

        if let Some(salary) = self.salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(AppError::InvalidRequest("salary must be a non-negative number".to_string()));
            }
        }

        Ok(User {
            id: None,
            email,
            name: self.name,
            photo: self.photo,
            role,
            is_verified: false,
            is_fired: false,
            designation: self.designation,
            bank_account_no: self.bank_account_no,
            salary: self.salary,
            created_at: Some(BsonDateTime::now()),
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUserRequest {
    pub is_verified: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub is_fired: bool,
    pub designation: Option<String>,
    pub bank_account_no: Option<String>,
    pub salary: Option<f64>,
    pub created_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            name: user.name,
            photo: user.photo,
            role: user.role,
            is_verified: user.is_verified,
            is_fired: user.is_fired,
            designation: user.designation,
            bank_account_no: user.bank_account_no,
            salary: user.salary,
            created_at: user.created_at.and_then(|t| t.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    pub role: Role,
}

/// Which slice of the `users` collection a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListFilter {
    /// Everyone registered as an employee, verified or not (HR view).
    Employees,
    /// Verified employees and HR staff (admin view).
    VerifiedStaff,
}

impl UserListFilter {
    pub fn to_document(self) -> Document {
        match self {
            UserListFilter::Employees => doc! { "role": Role::Employee.as_str() },
            UserListFilter::VerifiedStaff => doc! {
                "isVerified": true,
                "role": { "$in": [Role::Employee.as_str(), Role::Hr.as_str()] },
            },
        }
    }
}

/// The `$set` mutations the HR and admin endpoints perform on a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserUpdate {
    Verify(bool),
    Fire,
    PromoteToHr,
}

impl UserUpdate {
    pub fn filter(self, id: ObjectId) -> Document {
        match self {
            // Only employees are promoted; an admin cannot be demoted through this path.
            UserUpdate::PromoteToHr => doc! { "_id": id, "role": Role::Employee.as_str() },
            _ => doc! { "_id": id },
        }
    }

    pub fn to_set_document(self) -> Document {
        let fields = match self {
            UserUpdate::Verify(verified) => doc! { "isVerified": verified },
            UserUpdate::Fire => doc! { "isFired": true },
            UserUpdate::PromoteToHr => doc! { "role": Role::Hr.as_str() },
        };
        doc! { "$set": fields }
    }
}
