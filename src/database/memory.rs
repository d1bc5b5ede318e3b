//! In-memory `Store` used by the HTTP tests. Mirrors the filters and `$set`
//! semantics of the MongoDB implementation.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Mutex;

use super::Store;
use crate::{
    models::{
        InsertOutcome, Payment, PaymentFilter, Role, UpdateOutcome, User, UserListFilter,
        UserUpdate, WorkSheet,
    },
    utils::AppError,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    payments: Mutex<Vec<Payment>>,
    work_sheets: Mutex<Vec<WorkSheet>>,
}

fn inserted(id: ObjectId) -> InsertOutcome {
    InsertOutcome {
        acknowledged: true,
        inserted_id: Some(id.to_hex()),
    }
}

fn matches_list(filter: UserListFilter, user: &User) -> bool {
    match filter {
        UserListFilter::Employees => user.role == Role::Employee,
        UserListFilter::VerifiedStaff => {
            user.is_verified && matches!(user.role, Role::Employee | Role::Hr)
        }
    }
}

/// Applies the update and reports whether the document changed.
fn apply(update: UserUpdate, user: &mut User) -> bool {
    match update {
        UserUpdate::Verify(verified) => {
            std::mem::replace(&mut user.is_verified, verified) != verified
        }
        UserUpdate::Fire => !std::mem::replace(&mut user.is_fired, true),
        UserUpdate::PromoteToHr => std::mem::replace(&mut user.role, Role::Hr) != Role::Hr,
    }
}

impl MemoryStore {
    pub fn user(&self, id: ObjectId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == Some(id)).cloned()
    }

    pub fn work_sheet_count(&self) -> usize {
        self.work_sheets.lock().unwrap().len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.lock().unwrap().len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_user(&self, mut user: User) -> Result<InsertOutcome, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(user.email));
        }

        let id = user.id.unwrap_or_else(ObjectId::new);
        user.id = Some(id);
        users.push(user);
        Ok(inserted(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.user(id))
    }

    async fn find_user_with_roles(&self, email: &str, roles: &[Role]) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email && roles.contains(&u.role))
            .cloned())
    }

    async fn find_users(&self, filter: UserListFilter) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches_list(filter, u))
            .cloned()
            .collect())
    }

    async fn update_user(&self, id: ObjectId, update: UserUpdate) -> Result<UpdateOutcome, AppError> {
        let mut users = self.users.lock().unwrap();
        let target = users.iter_mut().find(|u| {
            u.id == Some(id) && (update != UserUpdate::PromoteToHr || u.role == Role::Employee)
        });

        let (matched, modified) = match target {
            Some(user) => (1, apply(update, user) as u64),
            None => (0, 0),
        };

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: matched,
            modified_count: modified,
            upserted_id: None,
        })
    }

    async fn insert_payment(&self, mut payment: Payment) -> Result<InsertOutcome, AppError> {
        let id = ObjectId::new();
        payment.id = Some(id);
        self.payments.lock().unwrap().push(payment);
        Ok(inserted(id))
    }

    async fn find_payment_for_period(&self, email: &str, payment_for: &str) -> Result<Option<Payment>, AppError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_email == email && p.payment_for == payment_for)
            .cloned())
    }

    async fn find_payments(&self, filter: PaymentFilter) -> Result<Vec<Payment>, AppError> {
        let payments = self.payments.lock().unwrap();
        Ok(payments
            .iter()
            .rev()
            .filter(|p| match &filter {
                PaymentFilter::ByUserId(user_id) => &p.user_id == user_id,
                PaymentFilter::ByEmail(email) => &p.user_email == email,
            })
            .cloned()
            .collect())
    }

    async fn insert_work_sheet(&self, mut sheet: WorkSheet) -> Result<InsertOutcome, AppError> {
        let id = ObjectId::new();
        sheet.id = Some(id);
        // Same reserved-field handling as the stored document.
        let sheet = WorkSheet::from_document(sheet.into_document())?;
        self.work_sheets.lock().unwrap().push(sheet);
        Ok(inserted(id))
    }

    async fn find_work_sheets(&self, employee_email: Option<&str>) -> Result<Vec<WorkSheet>, AppError> {
        let sheets = self.work_sheets.lock().unwrap();
        Ok(sheets
            .iter()
            .rev()
            .filter(|s| employee_email.map_or(true, |email| s.employee_email == email))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            id: None,
            email: email.to_string(),
            name: None,
            photo: None,
            role: Role::Employee,
            is_verified: false,
            is_fired: false,
            designation: None,
            bank_account_no: None,
            salary: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::default();
        store.insert_user(user("ana@example.com")).await.unwrap();

        let result = store.insert_user(user("ana@example.com")).await;
        assert!(matches!(result, Err(AppError::AlreadyExists(email)) if email == "ana@example.com"));
        assert_eq!(store.find_users(UserListFilter::Employees).await.unwrap().len(), 1);
    }
}
