//! Vault user database operations (MediVault schema).

use rusqlite::{params, OptionalExtension, Row};

use super::{read_timestamp, DbError, DbResult, LiveQuery, MediVaultDatabase, VaultUserDao, USER_PROFILES_TABLE};
use crate::convert::date_to_timestamp;
use crate::models::VaultUser;

impl VaultUserDao for MediVaultDatabase {
    fn insert_user(&self, user: &VaultUser) -> DbResult<()> {
        self.database().conn()?.execute(
            r#"
            INSERT OR REPLACE INTO user_profiles (
                userId, name, email, phone, dateOfBirth, bloodType,
                allergies, emergencyContact, createdAt, updatedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                user.user_id,
                user.name,
                user.email,
                user.phone,
                user.date_of_birth.as_ref().map(date_to_timestamp),
                user.blood_type,
                user.allergies,
                user.emergency_contact,
                date_to_timestamp(&user.created_at),
                date_to_timestamp(&user.updated_at),
            ],
        )?;
        tracing::debug!(table = USER_PROFILES_TABLE, user_id = %user.user_id, "vault user stored");
        Ok(())
    }

    fn update_user(&self, user: &VaultUser) -> DbResult<usize> {
        let rows_affected = self.database().conn()?.execute(
            r#"
            UPDATE user_profiles SET
                name = ?2,
                email = ?3,
                phone = ?4,
                dateOfBirth = ?5,
                bloodType = ?6,
                allergies = ?7,
                emergencyContact = ?8,
                createdAt = ?9,
                updatedAt = ?10
            WHERE userId = ?1
            "#,
            params![
                user.user_id,
                user.name,
                user.email,
                user.phone,
                user.date_of_birth.as_ref().map(date_to_timestamp),
                user.blood_type,
                user.allergies,
                user.emergency_contact,
                date_to_timestamp(&user.created_at),
                date_to_timestamp(&user.updated_at),
            ],
        )?;
        tracing::debug!(table = USER_PROFILES_TABLE, user_id = %user.user_id, rows_affected, "vault user update");
        Ok(rows_affected)
    }

    fn delete_user(&self, user: &VaultUser) -> DbResult<usize> {
        self.delete_user_by_id(&user.user_id)
    }

    fn delete_user_by_id(&self, user_id: &str) -> DbResult<usize> {
        let rows_affected = self
            .database()
            .conn()?
            .execute("DELETE FROM user_profiles WHERE userId = ?", [user_id])?;
        tracing::debug!(table = USER_PROFILES_TABLE, user_id, rows_affected, "vault user delete");
        Ok(rows_affected)
    }

    fn get_user(&self, user_id: &str) -> DbResult<Option<VaultUser>> {
        self.database()
            .conn()?
            .query_row(
                r#"
                SELECT userId, name, email, phone, dateOfBirth, bloodType,
                       allergies, emergencyContact, createdAt, updatedAt
                FROM user_profiles
                WHERE userId = ?
                "#,
                [user_id],
                vault_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    fn list_users(&self) -> DbResult<Vec<VaultUser>> {
        let conn = self.database().conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT userId, name, email, phone, dateOfBirth, bloodType,
                   allergies, emergencyContact, createdAt, updatedAt
            FROM user_profiles
            ORDER BY name ASC, userId ASC
            "#,
        )?;

        let rows = stmt.query_map([], vault_user_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }

    fn observe_user(&self, user_id: &str) -> LiveQuery<Option<VaultUser>> {
        let handle = self.clone();
        let user_id = user_id.to_string();
        self.database()
            .observe(&[USER_PROFILES_TABLE], move || handle.get_user(&user_id))
    }

    fn observe_users(&self) -> LiveQuery<Vec<VaultUser>> {
        let handle = self.clone();
        self.database()
            .observe(&[USER_PROFILES_TABLE], move || handle.list_users())
    }
}

/// Intermediate row struct for database mapping.
struct VaultUserRow {
    user_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<i64>,
    blood_type: Option<String>,
    allergies: Option<String>,
    emergency_contact: Option<String>,
    created_at: i64,
    updated_at: i64,
}

fn vault_user_row(row: &Row<'_>) -> rusqlite::Result<VaultUserRow> {
    Ok(VaultUserRow {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        date_of_birth: row.get(4)?,
        blood_type: row.get(5)?,
        allergies: row.get(6)?,
        emergency_contact: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<VaultUserRow> for VaultUser {
    type Error = DbError;

    fn try_from(row: VaultUserRow) -> Result<Self, Self::Error> {
        Ok(VaultUser {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            date_of_birth: row
                .date_of_birth
                .map(|value| read_timestamp("dateOfBirth", value))
                .transpose()?,
            blood_type: row.blood_type,
            allergies: row.allergies,
            emergency_contact: row.emergency_contact,
            created_at: read_timestamp("createdAt", row.created_at)?,
            updated_at: read_timestamp("updatedAt", row.updated_at)?,
        })
    }
}
