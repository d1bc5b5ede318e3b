use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

use super::{MongoDB, PAYMENTS, USERS, WORK_SHEETS};
use crate::{
    models::{
        InsertOutcome, Payment, PaymentFilter, Role, UpdateOutcome, User, UserListFilter,
        UserUpdate, WorkSheet,
    },
    utils::AppError,
};

/// Every collection operation the HTTP layer performs. Each method maps to exactly
/// one driver call.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    /// Fails with `AppError::AlreadyExists` when the email is taken.
    async fn insert_user(&self, user: User) -> Result<InsertOutcome, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;
    /// Point lookup on `{email, role}`; any of `roles` matches.
    async fn find_user_with_roles(&self, email: &str, roles: &[Role]) -> Result<Option<User>, AppError>;
    async fn find_users(&self, filter: UserListFilter) -> Result<Vec<User>, AppError>;
    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<UpdateOutcome, AppError>;

    async fn insert_payment(&self, payment: Payment) -> Result<InsertOutcome, AppError>;
    async fn find_payment_for_period(&self, email: &str, payment_for: &str) -> Result<Option<Payment>, AppError>;
    /// Newest first.
    async fn find_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, AppError>;

    async fn insert_work_sheet(&self, sheet: WorkSheet) -> Result<InsertOutcome, AppError>;
    /// All sheets when `employee_email` is `None`. Newest first.
    async fn find_work_sheets(&self, employee_email: Option<&str>) -> Result<Vec<WorkSheet>, AppError>;
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn roles_filter(email: &str, roles: &[Role]) -> Document {
    match roles {
        [role] => doc! { "email": email, "role": role.as_str() },
        _ => {
            let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
            doc! { "email": email, "role": { "$in": names } }
        }
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> Result<(), AppError> {
        self.client()
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn insert_user(&self, user: User) -> Result<InsertOutcome, AppError> {
        let email = user.email.clone();
        match self.collection::<User>(USERS).insert_one(user).await {
            Ok(result) => Ok(result.into()),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?)
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn find_user_with_roles(&self, email: &str, roles: &[Role]) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(roles_filter(email, roles))
            .await?)
    }

    async fn find_users(&self, filter: UserListFilter) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection::<User>(USERS)
            .find(filter.to_document())
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<UpdateOutcome, AppError> {
        let result = self
            .collection::<User>(USERS)
            .update_one(update.filter(id), update.to_set_document())
            .await?;
        Ok(result.into())
    }

    async fn insert_payment(&self, payment: Payment) -> Result<InsertOutcome, AppError> {
        let result = self.collection::<Payment>(PAYMENTS).insert_one(payment).await?;
        Ok(result.into())
    }

    async fn find_payment_for_period(&self, email: &str, payment_for: &str) -> Result<Option<Payment>, AppError> {
        Ok(self
            .collection::<Payment>(PAYMENTS)
            .find_one(doc! { "userEmail": email, "paymentFor": payment_for })
            .await?)
    }

    async fn find_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, AppError> {
        let cursor = self
            .collection::<Payment>(PAYMENTS)
            .find(filter.to_document())
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_work_sheet(&self, sheet: WorkSheet) -> Result<InsertOutcome, AppError> {
        let result = self
            .collection::<Document>(WORK_SHEETS)
            .insert_one(sheet.into_document())
            .await?;
        Ok(result.into())
    }

    async fn find_work_sheets(&self, employee_email: Option<&str>) -> Result<Vec<WorkSheet>, AppError> {
        let filter = match employee_email {
            Some(email) => doc! { "employeeEmail": email },
            None => doc! {},
        };

        let documents: Vec<Document> = self
            .collection::<Document>(WORK_SHEETS)
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(WorkSheet::from_document).collect()
    }
}
