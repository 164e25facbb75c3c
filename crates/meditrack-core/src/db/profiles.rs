//! User profile database operations (MediTrack schema).

use rusqlite::{params, OptionalExtension, Params, Row};

use super::{
    like_contains_pattern, read_timestamp, DbError, DbResult, LiveQuery, MediTrackDatabase,
    UserProfileDao, USER_PROFILES_TABLE,
};
use crate::convert::date_to_timestamp;
use crate::models::UserProfile;

const PROFILE_COLUMNS: &str = r#"
    id, firstName, lastName, dateOfBirth, gender, bloodType, height, weight,
    phone, email, address, emergencyContactName, emergencyContactPhone,
    emergencyContactRelation, allergies, chronicConditions, notes,
    isMainProfile, createdAt, updatedAt
"#;

const DEMOTE_OTHER_MAIN_PROFILES: &str =
    "UPDATE user_profiles SET isMainProfile = 0 WHERE isMainProfile = 1 AND id != ?1";

impl MediTrackDatabase {
    fn query_profiles<P: Params>(&self, filter: &str, params: P) -> DbResult<Vec<UserProfile>> {
        let conn = self.database().conn()?;
        let sql = format!(
            "SELECT {} FROM user_profiles {} ORDER BY firstName ASC, id ASC",
            PROFILE_COLUMNS, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params, profile_row)?;

        let mut profiles = Vec::new();
        for row in rows {
            profiles.push(row?.try_into()?);
        }
        Ok(profiles)
    }

    fn query_single_profile<P: Params>(&self, filter: &str, params: P) -> DbResult<Option<UserProfile>> {
        let conn = self.database().conn()?;
        let sql = format!("SELECT {} FROM user_profiles {} LIMIT 1", PROFILE_COLUMNS, filter);
        conn.query_row(&sql, params, profile_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

impl UserProfileDao for MediTrackDatabase {
    fn insert_profile(&self, profile: &UserProfile) -> DbResult<i64> {
        let mut conn = self.database().conn()?;
        let tx = conn.transaction()?;

        if profile.is_main_profile {
            tx.execute(DEMOTE_OTHER_MAIN_PROFILES, [profile.id])?;
        }

        let id = (profile.id != 0).then_some(profile.id);
        tx.execute(
            r#"
            INSERT OR REPLACE INTO user_profiles (
                id, firstName, lastName, dateOfBirth, gender, bloodType, height, weight,
                phone, email, address, emergencyContactName, emergencyContactPhone,
                emergencyContactRelation, allergies, chronicConditions, notes,
                isMainProfile, createdAt, updatedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            "#,
            params![
                id,
                profile.first_name,
                profile.last_name,
                date_to_timestamp(&profile.date_of_birth),
                profile.gender,
                profile.blood_type,
                profile.height,
                profile.weight,
                profile.phone,
                profile.email,
                profile.address,
                profile.emergency_contact_name,
                profile.emergency_contact_phone,
                profile.emergency_contact_relation,
                profile.allergies,
                profile.chronic_conditions,
                profile.notes,
                profile.is_main_profile,
                date_to_timestamp(&profile.created_at),
                date_to_timestamp(&profile.updated_at),
            ],
        )?;
        let stored_id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(table = USER_PROFILES_TABLE, id = stored_id, "profile stored");
        Ok(stored_id)
    }

    fn update_profile(&self, profile: &UserProfile) -> DbResult<usize> {
        let mut conn = self.database().conn()?;
        let tx = conn.transaction()?;

        if profile.is_main_profile {
            tx.execute(DEMOTE_OTHER_MAIN_PROFILES, [profile.id])?;
        }

        let rows_affected = tx.execute(
            r#"
            UPDATE user_profiles SET
                firstName = ?2,
                lastName = ?3,
                dateOfBirth = ?4,
                gender = ?5,
                bloodType = ?6,
                height = ?7,
                weight = ?8,
                phone = ?9,
                email = ?10,
                address = ?11,
                emergencyContactName = ?12,
                emergencyContactPhone = ?13,
                emergencyContactRelation = ?14,
                allergies = ?15,
                chronicConditions = ?16,
                notes = ?17,
                isMainProfile = ?18,
                createdAt = ?19,
                updatedAt = ?20
            WHERE id = ?1
            "#,
            params![
                profile.id,
                profile.first_name,
                profile.last_name,
                date_to_timestamp(&profile.date_of_birth),
                profile.gender,
                profile.blood_type,
                profile.height,
                profile.weight,
                profile.phone,
                profile.email,
                profile.address,
                profile.emergency_contact_name,
                profile.emergency_contact_phone,
                profile.emergency_contact_relation,
                profile.allergies,
                profile.chronic_conditions,
                profile.notes,
                profile.is_main_profile,
                date_to_timestamp(&profile.created_at),
                date_to_timestamp(&profile.updated_at),
            ],
        )?;

        // Unknown id: roll back any demotion.
        if rows_affected == 0 {
            return Ok(0);
        }
        tx.commit()?;

        tracing::debug!(table = USER_PROFILES_TABLE, id = profile.id, "profile updated");
        Ok(rows_affected)
    }

    fn delete_profile(&self, profile: &UserProfile) -> DbResult<usize> {
        self.delete_profile_by_id(profile.id)
    }

    fn delete_profile_by_id(&self, id: i64) -> DbResult<usize> {
        let rows_affected = self
            .database()
            .conn()?
            .execute("DELETE FROM user_profiles WHERE id = ?", [id])?;
        tracing::debug!(table = USER_PROFILES_TABLE, id, rows_affected, "profile delete");
        Ok(rows_affected)
    }

    fn get_profile(&self, id: i64) -> DbResult<Option<UserProfile>> {
        self.query_single_profile("WHERE id = ?1", [id])
    }

    fn get_main_profile(&self) -> DbResult<Option<UserProfile>> {
        self.query_single_profile("WHERE isMainProfile = 1", [])
    }

    fn set_main_profile(&self, id: i64) -> DbResult<bool> {
        let mut conn = self.database().conn()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM user_profiles WHERE id = ?", [id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Ok(false);
        }

        tx.execute(DEMOTE_OTHER_MAIN_PROFILES, [id])?;
        tx.execute("UPDATE user_profiles SET isMainProfile = 1 WHERE id = ?", [id])?;
        tx.commit()?;

        tracing::debug!(table = USER_PROFILES_TABLE, id, "main profile set");
        Ok(true)
    }

    fn list_profiles(&self) -> DbResult<Vec<UserProfile>> {
        self.query_profiles("", [])
    }

    fn search_profiles(&self, query: &str) -> DbResult<Vec<UserProfile>> {
        let pattern = like_contains_pattern(query);
        self.query_profiles(
            r"WHERE firstName LIKE ?1 ESCAPE '\' OR lastName LIKE ?1 ESCAPE '\'",
            [pattern],
        )
    }

    fn observe_profiles(&self) -> LiveQuery<Vec<UserProfile>> {
        let handle = self.clone();
        self.database()
            .observe(&[USER_PROFILES_TABLE], move || handle.list_profiles())
    }

    fn observe_profile_search(&self, query: &str) -> LiveQuery<Vec<UserProfile>> {
        let handle = self.clone();
        let query = query.to_string();
        self.database()
            .observe(&[USER_PROFILES_TABLE], move || handle.search_profiles(&query))
    }
}

/// Intermediate row struct for database mapping.
struct ProfileRow {
    id: i64,
    first_name: String,
    last_name: String,
    date_of_birth: i64,
    gender: String,
    blood_type: Option<String>,
    height: Option<f32>,
    weight: Option<f32>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    emergency_contact_name: Option<String>,
    emergency_contact_phone: Option<String>,
    emergency_contact_relation: Option<String>,
    allergies: Option<String>,
    chronic_conditions: Option<String>,
    notes: Option<String>,
    is_main_profile: bool,
    created_at: i64,
    updated_at: i64,
}

fn profile_row(row: &Row<'_>) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        blood_type: row.get(5)?,
        height: row.get(6)?,
        weight: row.get(7)?,
        phone: row.get(8)?,
        email: row.get(9)?,
        address: row.get(10)?,
        emergency_contact_name: row.get(11)?,
        emergency_contact_phone: row.get(12)?,
        emergency_contact_relation: row.get(13)?,
        allergies: row.get(14)?,
        chronic_conditions: row.get(15)?,
        notes: row.get(16)?,
        is_main_profile: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = DbError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: read_timestamp("dateOfBirth", row.date_of_birth)?,
            gender: row.gender,
            blood_type: row.blood_type,
            height: row.height,
            weight: row.weight,
            phone: row.phone,
            email: row.email,
            address: row.address,
            emergency_contact_name: row.emergency_contact_name,
            emergency_contact_phone: row.emergency_contact_phone,
            emergency_contact_relation: row.emergency_contact_relation,
            allergies: row.allergies,
            chronic_conditions: row.chronic_conditions,
            notes: row.notes,
            is_main_profile: row.is_main_profile,
            created_at: read_timestamp("createdAt", row.created_at)?,
            updated_at: read_timestamp("updatedAt", row.updated_at)?,
        })
    }
}
