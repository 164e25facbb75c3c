//! Medical record database operations (MediVault schema).

use rusqlite::{params, OptionalExtension, Params, Row};

use super::{
    read_timestamp, DbError, DbResult, LiveQuery, MediVaultDatabase, MedicalRecordDao,
    MEDICAL_RECORDS_TABLE,
};
use crate::convert::{date_to_timestamp, decode_string_list, encode_string_list};
use crate::models::{MedicalRecord, RecordType};

const RECORD_COLUMNS: &str =
    "id, userId, type, title, date, doctorName, description, attachments";

impl MediVaultDatabase {
    fn query_records<P: Params>(&self, filter: &str, params: P) -> DbResult<Vec<MedicalRecord>> {
        let conn = self.database().conn()?;
        let sql = format!(
            "SELECT {} FROM medical_records {} ORDER BY date DESC, id ASC",
            RECORD_COLUMNS, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params, record_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}

impl MedicalRecordDao for MediVaultDatabase {
    fn insert_record(&self, record: &MedicalRecord) -> DbResult<()> {
        let attachments_json = encode_string_list(&record.attachments)?;

        self.database().conn()?.execute(
            r#"
            INSERT OR REPLACE INTO medical_records (
                id, userId, type, title, date, doctorName, description, attachments
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.user_id,
                record.record_type.as_str(),
                record.title,
                date_to_timestamp(&record.date),
                record.doctor_name,
                record.description,
                attachments_json,
            ],
        )?;
        tracing::debug!(table = MEDICAL_RECORDS_TABLE, id = %record.id, "record stored");
        Ok(())
    }

    fn update_record(&self, record: &MedicalRecord) -> DbResult<usize> {
        let attachments_json = encode_string_list(&record.attachments)?;

        let rows_affected = self.database().conn()?.execute(
            r#"
            UPDATE medical_records SET
                userId = ?2,
                type = ?3,
                title = ?4,
                date = ?5,
                doctorName = ?6,
                description = ?7,
                attachments = ?8
            WHERE id = ?1
            "#,
            params![
                record.id,
                record.user_id,
                record.record_type.as_str(),
                record.title,
                date_to_timestamp(&record.date),
                record.doctor_name,
                record.description,
                attachments_json,
            ],
        )?;
        tracing::debug!(table = MEDICAL_RECORDS_TABLE, id = %record.id, rows_affected, "record update");
        Ok(rows_affected)
    }

    fn delete_record(&self, record: &MedicalRecord) -> DbResult<usize> {
        self.delete_record_by_id(&record.id)
    }

    fn delete_record_by_id(&self, id: &str) -> DbResult<usize> {
        let rows_affected = self
            .database()
            .conn()?
            .execute("DELETE FROM medical_records WHERE id = ?", [id])?;
        tracing::debug!(table = MEDICAL_RECORDS_TABLE, id, rows_affected, "record delete");
        Ok(rows_affected)
    }

    fn get_record(&self, id: &str) -> DbResult<Option<MedicalRecord>> {
        let sql = format!("SELECT {} FROM medical_records WHERE id = ?", RECORD_COLUMNS);
        self.database()
            .conn()?
            .query_row(&sql, [id], record_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    fn list_records_for_user(&self, user_id: &str) -> DbResult<Vec<MedicalRecord>> {
        self.query_records("WHERE userId = ?1", [user_id])
    }

    fn list_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> DbResult<Vec<MedicalRecord>> {
        self.query_records(
            "WHERE userId = ?1 AND type = ?2",
            [user_id, record_type.as_str()],
        )
    }

    fn count_records_for_user(&self, user_id: &str) -> DbResult<usize> {
        let count: i64 = self.database().conn()?.query_row(
            "SELECT COUNT(*) FROM medical_records WHERE userId = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn observe_records_for_user(&self, user_id: &str) -> LiveQuery<Vec<MedicalRecord>> {
        let handle = self.clone();
        let user_id = user_id.to_string();
        self.database().observe(&[MEDICAL_RECORDS_TABLE], move || {
            handle.list_records_for_user(&user_id)
        })
    }

    fn observe_records_by_type(
        &self,
        user_id: &str,
        record_type: &RecordType,
    ) -> LiveQuery<Vec<MedicalRecord>> {
        let handle = self.clone();
        let user_id = user_id.to_string();
        let record_type = record_type.clone();
        self.database().observe(&[MEDICAL_RECORDS_TABLE], move || {
            handle.list_records_by_type(&user_id, &record_type)
        })
    }
}

/// Intermediate row struct for database mapping.
struct RecordRow {
    id: String,
    user_id: String,
    record_type: String,
    title: String,
    date: i64,
    doctor_name: Option<String>,
    description: Option<String>,
    attachments: String,
}

fn record_row(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        record_type: row.get(2)?,
        title: row.get(3)?,
        date: row.get(4)?,
        doctor_name: row.get(5)?,
        description: row.get(6)?,
        attachments: row.get(7)?,
    })
}

impl TryFrom<RecordRow> for MedicalRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        Ok(MedicalRecord {
            id: row.id,
            user_id: row.user_id,
            record_type: RecordType::from(row.record_type),
            title: row.title,
            date: read_timestamp("date", row.date)?,
            doctor_name: row.doctor_name,
            description: row.description,
            attachments: decode_string_list(&row.attachments),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn setup_db() -> MediVaultDatabase {
        MediVaultDatabase::open_in_memory().unwrap()
    }

    fn make_record(id: &str, user_id: &str, record_type: RecordType) -> MedicalRecord {
        let mut record = MedicalRecord::new(user_id.into(), record_type, format!("Record {}", id))
            .dated(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        record.id = id.into();
        record.doctor_name = Some("Dr. Test".into());
        record.description = Some("Test description".into());
        record
    }

    fn ids(records: &[MedicalRecord]) -> HashSet<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_insert_and_get_record() {
        let db = setup_db();
        let mut record = make_record("test123", "user1", RecordType::Diagnosis);
        record.attachments = vec!["test.pdf".into()];

        db.insert_record(&record).unwrap();
        assert_eq!(db.get_record("test123").unwrap().unwrap(), record);
    }

    #[test]
    fn test_round_trip_with_null_optionals() {
        let db = setup_db();
        let mut record = make_record("bare", "user1", RecordType::LabResult);
        record.doctor_name = None;
        record.description = None;

        db.insert_record(&record).unwrap();
        assert_eq!(db.get_record("bare").unwrap().unwrap(), record);
    }

    #[test]
    fn test_attachments_with_commas_round_trip() {
        let db = setup_db();
        let mut record = make_record("commas", "user1", RecordType::Diagnosis);
        record.attachments = vec![
            "scans/knee, left.jpg".into(),
            "blood_test.pdf".into(),
            "".into(),
        ];

        db.insert_record(&record).unwrap();
        assert_eq!(
            db.get_record("commas").unwrap().unwrap().attachments,
            record.attachments
        );
    }

    #[test]
    fn test_legacy_attachment_column_decodes() {
        let db = setup_db();
        db.database()
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO medical_records (id, userId, type, title, date, attachments)
                 VALUES ('legacy', 'user1', 'Prescription', 'Old', 0, 'a.jpg,b.pdf')",
                [],
            )
            .unwrap();

        let record = db.get_record("legacy").unwrap().unwrap();
        assert_eq!(record.attachments, vec!["a.jpg", "b.pdf"]);
        assert_eq!(record.record_type, RecordType::other("Prescription"));
    }

    #[test]
    fn test_get_user_records() {
        let db = setup_db();
        db.insert_record(&make_record("rec1", "user1", RecordType::Diagnosis)).unwrap();
        db.insert_record(&make_record("rec2", "user1", RecordType::LabResult)).unwrap();
        db.insert_record(&make_record("rec3", "user2", RecordType::Prescription)).unwrap();

        let user1 = db.list_records_for_user("user1").unwrap();
        let expected: HashSet<String> = ["rec1", "rec2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids(&user1), expected);

        let user2 = db.list_records_for_user("user2").unwrap();
        assert_eq!(user2.len(), 1);
        assert_eq!(user2[0].id, "rec3");

        let lab = db.list_records_by_type("user1", &RecordType::LabResult).unwrap();
        assert_eq!(lab.len(), 1);
        assert_eq!(lab[0].id, "rec2");

        assert!(db
            .list_records_by_type("user2", &RecordType::LabResult)
            .unwrap()
            .is_empty());
        assert_eq!(db.count_records_for_user("user1").unwrap(), 2);
    }

    #[test]
    fn test_records_newest_first() {
        let db = setup_db();
        let base = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        let old = make_record("old", "user1", RecordType::Diagnosis).dated(base);
        let new = make_record("new", "user1", RecordType::Diagnosis).dated(base + Duration::days(3));
        let tie = make_record("a-tie", "user1", RecordType::Diagnosis).dated(base);

        db.insert_record(&old).unwrap();
        db.insert_record(&new).unwrap();
        db.insert_record(&tie).unwrap();

        let order: Vec<String> = db
            .list_records_for_user("user1")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(order, vec!["new", "a-tie", "old"]);
    }

    #[test]
    fn test_delete_record() {
        let db = setup_db();
        let record = make_record("toDelete", "user1", RecordType::Diagnosis);
        db.insert_record(&record).unwrap();

        assert_eq!(db.delete_record(&record).unwrap(), 1);
        assert!(db.get_record("toDelete").unwrap().is_none());
        assert_eq!(db.delete_record(&record).unwrap(), 0);
    }

    #[test]
    fn test_delete_record_by_id() {
        let db = setup_db();
        db.insert_record(&make_record("rec1", "user1", RecordType::Diagnosis)).unwrap();

        assert_eq!(db.delete_record_by_id("rec1").unwrap(), 1);
        assert!(db.get_record("rec1").unwrap().is_none());
        assert_eq!(db.delete_record_by_id("rec1").unwrap(), 0);
    }

    #[test]
    fn test_insert_replaces_whole_record() {
        let db = setup_db();
        let record = make_record("rec1", "user1", RecordType::Diagnosis);
        db.insert_record(&record).unwrap();

        let mut replacement = make_record("rec1", "user2", RecordType::Prescription);
        replacement.doctor_name = None;
        db.insert_record(&replacement).unwrap();

        assert_eq!(db.get_record("rec1").unwrap().unwrap(), replacement);
        assert!(db.list_records_for_user("user1").unwrap().is_empty());
    }

    #[test]
    fn test_update_record() {
        let db = setup_db();
        let mut record = make_record("rec1", "user1", RecordType::Diagnosis);
        assert_eq!(db.update_record(&record).unwrap(), 0);

        db.insert_record(&record).unwrap();
        record.title = "Updated".into();
        assert_eq!(db.update_record(&record).unwrap(), 1);
        assert_eq!(db.get_record("rec1").unwrap().unwrap().title, "Updated");
    }

    #[test]
    fn test_observe_records_emits_after_each_mutation() {
        let db = setup_db();
        let mut live = db.observe_records_for_user("user1");
        assert!(live.try_next().unwrap().unwrap().is_empty());

        let mut record = make_record("rec1", "user1", RecordType::Diagnosis);
        db.insert_record(&record).unwrap();
        assert_eq!(live.try_next().unwrap().unwrap().len(), 1);

        record.title = "Changed".into();
        db.update_record(&record).unwrap();
        assert_eq!(live.try_next().unwrap().unwrap()[0].title, "Changed");

        // Rows of other owners still trigger a re-emission
        db.insert_record(&make_record("rec3", "user2", RecordType::Diagnosis)).unwrap();
        assert_eq!(live.try_next().unwrap().unwrap().len(), 1);

        db.delete_record_by_id("rec1").unwrap();
        assert!(live.try_next().unwrap().unwrap().is_empty());
        assert!(live.try_next().is_none());
    }

    #[test]
    fn test_observe_by_type() {
        let db = setup_db();
        let mut live = db.observe_records_by_type("user1", &RecordType::LabResult);
        assert!(live.try_next().unwrap().unwrap().is_empty());

        db.insert_record(&make_record("rec2", "user1", RecordType::LabResult)).unwrap();
        let emitted = live.try_next().unwrap().unwrap();
        let expected: HashSet<String> = ["rec2".to_string()].into_iter().collect();
        assert_eq!(ids(&emitted), expected);
    }

    #[test]
    fn test_profile_writes_do_not_wake_record_queries() {
        let db = setup_db();
        let mut live = db.observe_records_for_user("user1");
        live.try_next();

        db.database()
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO user_profiles (userId, name, createdAt, updatedAt) VALUES ('u', 'n', 0, 0)",
                [],
            )
            .unwrap();
        assert!(live.try_next().is_none());
    }
}
