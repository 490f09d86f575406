use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::models::{CompanyFields, CompanyRecord};
use crate::db::sqlite::SqlitePool;
use crate::error::TrackerError;
use crate::types::Slot;
use crate::types::slot::{DATE_FORMAT, format_date, format_time, parse_time};

const SELECT_COLUMNS: &str = r#"SELECT id, user_id, company_name,
    pre_placement_talk, pre_placement_time,
    assessment_date, assessment_time, assessment_website,
    interview_date, interview_time, status
    FROM companies"#;

/// Per-user company records. Every statement filters on `user_id`.
#[derive(Clone)]
pub struct CompanyStore {
    pool: SqlitePool,
}

impl CompanyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records in insertion order.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CompanyRecord>, TrackerError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE user_id = ? ORDER BY id"))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    /// Records ordered by assessment date (undated first), for export.
    pub async fn list_for_export(&self, user_id: i64) -> Result<Vec<CompanyRecord>, TrackerError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE user_id = ? ORDER BY assessment_date, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn create(
        &self,
        user_id: i64,
        fields: CompanyFields,
    ) -> Result<CompanyRecord, TrackerError> {
        let cols = Columns::from(&fields);
        let result = sqlx::query(
            r#"INSERT INTO companies (
                company_name, pre_placement_talk, pre_placement_time,
                assessment_date, assessment_time, assessment_website,
                interview_date, interview_time, status, user_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&fields.company_name)
        .bind(cols.talk_date)
        .bind(cols.talk_time)
        .bind(cols.assessment_date)
        .bind(cols.assessment_time)
        .bind(&fields.assessment_website)
        .bind(cols.interview_date)
        .bind(cols.interview_time)
        .bind(&fields.status)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(record_from_fields(result.last_insert_rowid(), user_id, fields))
    }

    /// `None` both when the id is absent and when another user owns it.
    pub async fn get(&self, id: i64, user_id: i64) -> Result<Option<CompanyRecord>, TrackerError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? AND user_id = ?"))
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Full replace of the writable fields. Returns whether a row matched.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        fields: CompanyFields,
    ) -> Result<bool, TrackerError> {
        let cols = Columns::from(&fields);
        let result = sqlx::query(
            r#"UPDATE companies SET
                company_name = ?,
                pre_placement_talk = ?,
                pre_placement_time = ?,
                assessment_date = ?,
                assessment_time = ?,
                assessment_website = ?,
                interview_date = ?,
                interview_time = ?,
                status = ?
              WHERE id = ? AND user_id = ?"#,
        )
        .bind(&fields.company_name)
        .bind(cols.talk_date)
        .bind(cols.talk_time)
        .bind(cols.assessment_date)
        .bind(cols.assessment_time)
        .bind(&fields.assessment_website)
        .bind(cols.interview_date)
        .bind(cols.interview_time)
        .bind(&fields.status)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// No-op when nothing matches.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<(), TrackerError> {
        sqlx::query("DELETE FROM companies WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<CompanyRecord, TrackerError> {
        let id: i64 = row.try_get("id")?;
        let user_id: i64 = row.try_get("user_id")?;
        let company_name: String = row.try_get("company_name")?;
        let assessment_website: Option<String> = row.try_get("assessment_website")?;
        let status: String = row.try_get("status")?;

        Ok(CompanyRecord {
            id,
            user_id,
            company_name,
            pre_talk_date: decode_date(&row, "pre_placement_talk")?,
            pre_talk_time: decode_time(&row, "pre_placement_time")?,
            assessment_date: decode_date(&row, "assessment_date")?,
            assessment_time: decode_time(&row, "assessment_time")?,
            assessment_website,
            interview_date: decode_date(&row, "interview_date")?,
            interview_time: decode_time(&row, "interview_time")?,
            status,
        })
    }
}

/// Text encodings of the three slots, split into date and time columns.
struct Columns {
    talk_date: Option<String>,
    talk_time: Option<String>,
    assessment_date: Option<String>,
    assessment_time: Option<String>,
    interview_date: Option<String>,
    interview_time: Option<String>,
}

impl From<&CompanyFields> for Columns {
    fn from(f: &CompanyFields) -> Self {
        let (talk_date, talk_time) = encode_slot(f.talk);
        let (assessment_date, assessment_time) = encode_slot(f.assessment);
        let (interview_date, interview_time) = encode_slot(f.interview);
        Self {
            talk_date,
            talk_time,
            assessment_date,
            assessment_time,
            interview_date,
            interview_time,
        }
    }
}

fn encode_slot(slot: Option<Slot>) -> (Option<String>, Option<String>) {
    let (date, time) = Slot::split(slot);
    (date.map(format_date), time.map(format_time))
}

fn record_from_fields(id: i64, user_id: i64, f: CompanyFields) -> CompanyRecord {
    let (pre_talk_date, pre_talk_time) = Slot::split(f.talk);
    let (assessment_date, assessment_time) = Slot::split(f.assessment);
    let (interview_date, interview_time) = Slot::split(f.interview);
    CompanyRecord {
        id,
        user_id,
        company_name: f.company_name,
        pre_talk_date,
        pre_talk_time,
        assessment_date,
        assessment_time,
        assessment_website: f.assessment_website,
        interview_date,
        interview_time,
        status: f.status,
    }
}

fn decode_date(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>, TrackerError> {
    let raw: Option<String> = row.try_get(column)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)).into())
        })
        .transpose()
}

fn decode_time(row: &SqliteRow, column: &str) -> Result<Option<NaiveTime>, TrackerError> {
    let raw: Option<String> = row.try_get(column)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            parse_time(&s).ok_or_else(|| {
                sqlx::Error::Decode(format!("invalid time in {column}: {s}").into()).into()
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::connect_in_memory;
    use crate::db::users::UserStore;

    async fn setup() -> (CompanyStore, i64, i64) {
        let pool = connect_in_memory().await.unwrap();
        let users = UserStore::new(pool.clone());
        let a = users.create("alice", "h").await.unwrap().id;
        let b = users.create("bob", "h").await.unwrap().id;
        (CompanyStore::new(pool), a, b)
    }

    fn fields(name: &str, talk: Option<&str>, assessment: Option<&str>) -> CompanyFields {
        CompanyFields::new(
            name,
            Slot::parse_input(talk, "talk").unwrap(),
            Slot::parse_input(assessment, "assessment").unwrap(),
            None,
            None,
            "Applied",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn timestamps_are_split_on_store() {
        let (store, alice, _) = setup().await;
        let created = store
            .create(alice, fields("Acme", Some("2024-05-01T10:00"), None))
            .await
            .unwrap();

        let got = store.get(created.id, alice).await.unwrap().unwrap();
        assert_eq!(got, created);
        assert_eq!(got.pre_talk_date.map(format_date).as_deref(), Some("2024-05-01"));
        assert_eq!(got.pre_talk_time.map(format_time).as_deref(), Some("10:00"));
        assert_eq!(got.assessment_date, None);
        assert_eq!(got.assessment_time, None);

        let raw: (Option<String>, Option<String>) = sqlx::query_as(
            "SELECT pre_placement_talk, pre_placement_time FROM companies WHERE id = ?",
        )
        .bind(created.id)
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(raw, (Some("2024-05-01".into()), Some("10:00".into())));
    }

    #[tokio::test]
    async fn edit_then_reread() {
        let (store, alice, _) = setup().await;
        let created = store
            .create(alice, fields("Acme", Some("2024-05-01T10:00"), None))
            .await
            .unwrap();

        let updated = fields("Acme Corp", None, Some("2024-06-02T14:30"));
        assert!(store.update(created.id, alice, updated).await.unwrap());

        let got = store.get(created.id, alice).await.unwrap().unwrap();
        assert_eq!(got.company_name, "Acme Corp");
        assert_eq!(got.pre_talk_date, None);
        assert_eq!(got.assessment_input().as_deref(), Some("2024-06-02T14:30"));
    }

    #[tokio::test]
    async fn other_users_records_are_invisible() {
        let (store, alice, bob) = setup().await;
        let rec = store.create(alice, fields("Acme", None, None)).await.unwrap();

        assert_eq!(store.get(rec.id, bob).await.unwrap(), None);
        assert_eq!(store.get(rec.id + 100, bob).await.unwrap(), None);
        assert!(!store.update(rec.id, bob, fields("Hijack", None, None)).await.unwrap());
        store.delete(rec.id, bob).await.unwrap();

        let still = store.get(rec.id, alice).await.unwrap().unwrap();
        assert_eq!(still.company_name, "Acme");
        assert!(store.list_for_user(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, alice, _) = setup().await;
        let rec = store.create(alice, fields("Acme", None, None)).await.unwrap();
        store.delete(rec.id, alice).await.unwrap();
        store.delete(rec.id, alice).await.unwrap();
        assert_eq!(store.get(rec.id, alice).await.unwrap(), None);
    }

    #[tokio::test]
    async fn export_orders_by_assessment_date() {
        let (store, alice, _) = setup().await;
        store
            .create(alice, fields("Later", None, Some("2024-01-02T09:00")))
            .await
            .unwrap();
        store
            .create(alice, fields("Earlier", None, Some("2024-01-01T09:00")))
            .await
            .unwrap();

        let listed: Vec<_> = store
            .list_for_user(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.company_name)
            .collect();
        assert_eq!(listed, ["Later", "Earlier"]);

        let exported: Vec<_> = store
            .list_for_export(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.company_name)
            .collect();
        assert_eq!(exported, ["Earlier", "Later"]);
    }
}
