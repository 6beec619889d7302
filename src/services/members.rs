//! Membership service

use tracing::{info, warn};

use crate::{
    error::{unique_violation, AppError, AppResult},
    models::member::{Member, MemberParams},
    repository::{abort, Repository},
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get member by ID
    pub async fn get(&self, id: i64) -> AppResult<Member> {
        self.repository
            .members
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list().await
    }

    /// Create a member; a taken email or phone yields `AlreadyExists`
    pub async fn create(&self, member: MemberParams) -> AppResult<Member> {
        let mut tx = self.repository.begin().await?;

        match self.repository.members.insert(&mut *tx, &member).await {
            Ok(created) => {
                tx.commit().await?;
                info!(member_id = created.id, "member_created");
                Ok(created)
            }
            Err(e) => {
                let err = identity_conflict(e, &member);
                abort(tx, err).await
            }
        }
    }

    pub async fn update(&self, id: i64, member: MemberParams) -> AppResult<Member> {
        let mut tx = self.repository.begin().await?;

        match self.repository.members.update(&mut *tx, id, &member).await {
            Ok(Some(updated)) => {
                tx.commit().await?;
                info!(member_id = updated.id, "member_updated");
                Ok(updated)
            }
            Ok(None) => {
                let err = AppError::NotFound(format!("Member with id {} not found", id));
                abort(tx, err).await
            }
            Err(e) => {
                let err = identity_conflict(e, &member);
                abort(tx, err).await
            }
        }
    }

    /// Delete a member who has no book out.
    ///
    /// Returns `Ok(false)` when no such member exists.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tx = self.repository.begin().await?;

        // Conflicts with the shared lock a borrow takes on the member
        if !self.repository.members.lock(&mut *tx, id).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        if self.repository.borrowings.has_active_for_member(&mut *tx, id).await? {
            warn!(member_id = id, "delete_member_blocked_by_active_borrowings");
            return abort(tx, AppError::CannotDeleteMemberWithBorrowings(id)).await;
        }

        let deleted = self.repository.members.delete(&mut *tx, id).await?;
        tx.commit().await?;
        info!(member_id = id, "member_deleted");
        Ok(deleted)
    }
}

fn identity_conflict(err: sqlx::Error, member: &MemberParams) -> AppError {
    match unique_violation(&err).as_deref() {
        Some("members_phone_key") => {
            warn!(phone = ?member.phone, "member_duplicate_phone");
            AppError::AlreadyExists("A member with this phone number already exists".to_string())
        }
        Some(_) => {
            warn!(email = ?member.email, "member_duplicate_email");
            AppError::AlreadyExists("A member with this email already exists".to_string())
        }
        None => {
            tracing::error!(error = %err, "member_write_failed");
            err.into()
        }
    }
}
