//! [`SqliteStore`]: the SQLite implementation of the directory store traits.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  field::PrivacyField,
  identity::{NewUser, User, UserCredentials, UserId},
  reference::{NewReference, NewStaff, ReferenceItem, ReferenceKind, Staff},
  setting::PrivacySetting,
  store::{IdentityStore, PrivacyStore, ReferenceStore, Store, StudentStore},
  student::{StudentFilter, StudentProfile, StudentRecord, StudentUpdate},
};

use crate::{
  Result,
  encode::{
    RawReference, RawSetting, RawStaff, RawStudent, RawUser, decode_settings, encode_dt,
    encode_json, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster directory backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single student by an arbitrary key column.
  async fn student_where(
    &self,
    column: &'static str,
    key: rusqlite::types::Value,
  ) -> Result<Option<StudentRecord>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM students WHERE {column} = ?1",
          RawStudent::COLUMNS
        );
        Ok(query_students(conn, &sql, [key])?.pop())
      })
      .await?;

    raw.map(RawStudent::into_record).transpose()
  }
}

// ─── Query helpers (run on the database thread) ──────────────────────────────

/// Run a `students` query and resolve the reference items each row points at.
fn query_students(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawStudent>> {
  let mut stmt = conn.prepare(sql)?;
  let mut raws = stmt
    .query_map(params, RawStudent::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  for raw in &mut raws {
    raw.campus = lookup_reference(conn, raw.campus_id.as_deref())?;
    raw.course = lookup_reference(conn, raw.course_id.as_deref())?;
    raw.major = lookup_reference(conn, raw.major_id.as_deref())?;
    raw.department = lookup_reference(conn, raw.department_id.as_deref())?;
  }
  Ok(raws)
}

fn lookup_reference(
  conn: &rusqlite::Connection,
  id: Option<&str>,
) -> rusqlite::Result<Option<RawReference>> {
  let Some(id) = id else { return Ok(None) };
  conn
    .query_row(
      &format!(
        "SELECT {} FROM reference_items WHERE item_id = ?1",
        RawReference::COLUMNS
      ),
      [id],
      RawReference::from_row,
    )
    .optional()
}

fn opt_uuid(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

// ─── Trait impls ─────────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;
}

// ── Privacy ───────────────────────────────────────────────────────────────────

impl PrivacyStore for SqliteStore {
  async fn settings_by_user(&self, user_id: UserId) -> Result<Vec<PrivacySetting>> {
    let raws: Vec<RawSetting> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, field_name, is_private FROM privacy_settings
           WHERE user_id = ?1
           ORDER BY setting_id",
        )?;
        let rows = stmt
          .query_map([user_id.0], RawSetting::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(decode_settings(raws))
  }

  async fn settings_by_student(&self, student_id: Uuid) -> Result<Vec<PrivacySetting>> {
    let id_str = encode_uuid(student_id);

    let raws: Vec<RawSetting> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.user_id, p.field_name, p.is_private
           FROM privacy_settings p
           JOIN students s ON s.user_id = p.user_id
           WHERE s.student_id = ?1
           ORDER BY p.setting_id",
        )?;
        let rows = stmt
          .query_map([id_str], RawSetting::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(decode_settings(raws))
  }

  async fn upsert_setting(
    &self,
    user_id:    UserId,
    field:      PrivacyField,
    is_private: bool,
  ) -> Result<PrivacySetting> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO privacy_settings (user_id, field_name, is_private, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id, field_name)
           DO UPDATE SET is_private = excluded.is_private,
                         updated_at = excluded.updated_at",
          rusqlite::params![user_id.0, field.as_str(), is_private, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(PrivacySetting { user_id, field_name: field, is_private })
  }

  async fn upsert_settings(
    &self,
    user_id: UserId,
    changes: Vec<(PrivacyField, bool)>,
  ) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO privacy_settings (user_id, field_name, is_private, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, field_name)
             DO UPDATE SET is_private = excluded.is_private,
                           updated_at = excluded.updated_at",
          )?;
          for (field, is_private) in &changes {
            stmt.execute(rusqlite::params![user_id.0, field.as_str(), is_private, at_str])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn batch_insert_settings(&self, rows: Vec<PrivacySetting>) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO privacy_settings
               (user_id, field_name, is_private, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.user_id.0,
              row.field_name.as_str(),
              row.is_private,
              at_str,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ── Identity ──────────────────────────────────────────────────────────────────

impl IdentityStore for SqliteStore {
  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let email      = input.email.trim().to_owned();
    let email_db   = email.clone();
    let role       = input.role;

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            [&email_db],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO users (email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![email_db, input.password_hash, role.as_str(), at_str],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    Ok(id.map(|id| User { id: UserId(id), email, role, created_at }))
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE user_id = ?1", RawUser::COLUMNS),
            [id.0],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<UserCredentials>> {
    let email = email.trim().to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", RawUser::COLUMNS),
            [email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_credentials).transpose()
  }

  async fn create_session(
    &self,
    token_hash: String,
    user_id:    UserId,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let at_str  = encode_dt(Utc::now());
    let exp_str = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Expired sessions are never read again.
        tx.execute("DELETE FROM sessions WHERE expires_at <= ?1", [&at_str])?;
        tx.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, user_id.0, at_str, exp_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_user(
    &self,
    token_hash: String,
    now:        DateTime<Utc>,
  ) -> Result<Option<User>> {
    let now_str = encode_dt(now);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT u.user_id, u.email, u.password_hash, u.role, u.created_at
             FROM sessions s
             JOIN users u ON u.user_id = s.user_id
             WHERE s.token_hash = ?1 AND s.expires_at > ?2",
            rusqlite::params![token_hash, now_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM sessions WHERE token_hash = ?1", [token_hash])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ── Students ──────────────────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  async fn create_student(
    &self,
    user_id: UserId,
    profile: StudentProfile,
  ) -> Result<StudentRecord> {
    let id_str           = encode_uuid(Uuid::new_v4());
    let at_str           = encode_dt(Utc::now());
    let co_curricular    = encode_json(&profile.student_co_curricular_interests)?;
    let extra_curricular = encode_json(&profile.student_extra_curricular_interests)?;
    let hobbies          = encode_json(&profile.student_hobbies)?;
    let internships      = encode_json(&profile.student_internships)?;
    let job_offers       = encode_json(&profile.student_job_offers)?;

    let raw: RawStudent = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (
             student_id, user_id, name, registered_number, year_of_admission,
             campus_id, course_id, major_id, department_id,
             mobile, personal_email, emergency_contact,
             present_address, permanent_address, photo_url,
             is_alumnus, created_at,
             co_curricular, extra_curricular, hobbies, internships, job_offers
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
          rusqlite::params![
            id_str,
            user_id.0,
            profile.name,
            profile.registered_number,
            profile.year_of_admission,
            opt_uuid(profile.campus_id),
            opt_uuid(profile.course_id),
            opt_uuid(profile.major_id),
            opt_uuid(profile.department_id),
            profile.mobile,
            profile.personal_email,
            profile.emergency_contact,
            profile.present_address,
            profile.permanent_address,
            profile.photo_url,
            profile.is_alumnus,
            at_str,
            co_curricular,
            extra_curricular,
            hobbies,
            internships,
            job_offers,
          ],
        )?;

        let sql = format!(
          "SELECT {} FROM students WHERE student_id = ?1",
          RawStudent::COLUMNS
        );
        query_students(conn, &sql, [&id_str])?
          .pop()
          .ok_or(rusqlite::Error::QueryReturnedNoRows.into())
      })
      .await?;

    raw.into_record()
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<StudentRecord>> {
    self.student_where("student_id", encode_uuid(id).into()).await
  }

  async fn student_by_user(&self, user_id: UserId) -> Result<Option<StudentRecord>> {
    self.student_where("user_id", user_id.0.into()).await
  }

  async fn update_student(
    &self,
    id:     Uuid,
    update: StudentUpdate,
  ) -> Result<Option<StudentRecord>> {
    let id_str           = encode_uuid(id);
    let co_curricular    = update.student_co_curricular_interests.as_ref().map(encode_json).transpose()?;
    let extra_curricular = update.student_extra_curricular_interests.as_ref().map(encode_json).transpose()?;
    let hobbies          = update.student_hobbies.as_ref().map(encode_json).transpose()?;
    let internships      = update.student_internships.as_ref().map(encode_json).transpose()?;
    let job_offers       = update.student_job_offers.as_ref().map(encode_json).transpose()?;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE students SET
             name              = COALESCE(?2,  name),
             registered_number = COALESCE(?3,  registered_number),
             year_of_admission = COALESCE(?4,  year_of_admission),
             campus_id         = COALESCE(?5,  campus_id),
             course_id         = COALESCE(?6,  course_id),
             major_id          = COALESCE(?7,  major_id),
             department_id     = COALESCE(?8,  department_id),
             mobile            = COALESCE(?9,  mobile),
             personal_email    = COALESCE(?10, personal_email),
             emergency_contact = COALESCE(?11, emergency_contact),
             present_address   = COALESCE(?12, present_address),
             permanent_address = COALESCE(?13, permanent_address),
             photo_url         = COALESCE(?14, photo_url),
             is_alumnus        = COALESCE(?15, is_alumnus),
             co_curricular     = COALESCE(?16, co_curricular),
             extra_curricular  = COALESCE(?17, extra_curricular),
             hobbies           = COALESCE(?18, hobbies),
             internships       = COALESCE(?19, internships),
             job_offers        = COALESCE(?20, job_offers)
           WHERE student_id = ?1",
          rusqlite::params![
            id_str,
            update.name,
            update.registered_number,
            update.year_of_admission,
            opt_uuid(update.campus_id),
            opt_uuid(update.course_id),
            opt_uuid(update.major_id),
            opt_uuid(update.department_id),
            update.mobile,
            update.personal_email,
            update.emergency_contact,
            update.present_address,
            update.permanent_address,
            update.photo_url,
            update.is_alumnus,
            co_curricular,
            extra_curricular,
            hobbies,
            internships,
            job_offers,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_student(id).await
  }

  async fn delete_student(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let user_id: Option<i64> = tx
          .query_row(
            "SELECT user_id FROM students WHERE student_id = ?1",
            [&id_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(user_id) = user_id else {
          return Ok(false);
        };

        tx.execute("DELETE FROM privacy_settings WHERE user_id = ?1", [user_id])?;
        tx.execute("DELETE FROM students WHERE student_id = ?1", [&id_str])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(deleted)
  }

  async fn list_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
  ) -> Result<Vec<StudentRecord>> {
    let campus_id      = opt_uuid(filter.campus_id);
    let course_id      = opt_uuid(filter.course_id);
    let major_id       = opt_uuid(filter.major_id);
    let department_id  = opt_uuid(filter.department_id);
    let year           = filter.year_of_admission;
    let include_alumni = filter.include_alumni;
    let limit_val      = filter.limit.map(|l| l as i64).unwrap_or(-1);
    let offset_val     = filter.offset.unwrap_or(0) as i64;

    let raws: Vec<RawStudent> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM students
           WHERE (?1 IS NULL OR campus_id = ?1)
             AND (?2 IS NULL OR course_id = ?2)
             AND (?3 IS NULL OR major_id = ?3)
             AND (?4 IS NULL OR department_id = ?4)
             AND (?5 IS NULL OR year_of_admission = ?5)
             AND (?6 OR is_alumnus = 0)
           ORDER BY name COLLATE NOCASE, student_id
           LIMIT ?7 OFFSET ?8",
          RawStudent::COLUMNS
        );
        Ok(query_students(
          conn,
          &sql,
          rusqlite::params![
            campus_id,
            course_id,
            major_id,
            department_id,
            year,
            include_alumni,
            limit_val,
            offset_val,
          ],
        )?)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_record).collect()
  }
}

// ── Reference data ────────────────────────────────────────────────────────────

impl ReferenceStore for SqliteStore {
  async fn create_reference(
    &self,
    kind:  ReferenceKind,
    input: NewReference,
  ) -> Result<ReferenceItem> {
    let item = ReferenceItem {
      id:          Uuid::new_v4(),
      kind,
      name:        input.name,
      description: input.description,
      parent_id:   input.parent_id,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(item.id);
    let name        = item.name.clone();
    let description = item.description.clone();
    let parent_str  = opt_uuid(item.parent_id);
    let at_str      = encode_dt(item.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reference_items (item_id, kind, name, description, parent_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, kind.as_str(), name, description, parent_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn list_references(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>> {
    let raws: Vec<RawReference> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM reference_items WHERE kind = ?1 ORDER BY name COLLATE NOCASE",
          RawReference::COLUMNS
        ))?;
        let rows = stmt
          .query_map([kind.as_str()], RawReference::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReference::into_item).collect()
  }

  async fn get_reference(
    &self,
    kind: ReferenceKind,
    id:   Uuid,
  ) -> Result<Option<ReferenceItem>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawReference> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM reference_items WHERE kind = ?1 AND item_id = ?2",
              RawReference::COLUMNS
            ),
            rusqlite::params![kind.as_str(), id_str],
            RawReference::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawReference::into_item).transpose()
  }

  async fn update_reference(
    &self,
    kind:  ReferenceKind,
    id:    Uuid,
    input: NewReference,
  ) -> Result<Option<ReferenceItem>> {
    let id_str     = encode_uuid(id);
    let parent_str = opt_uuid(input.parent_id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE reference_items
           SET name = ?3, description = ?4, parent_id = ?5
           WHERE kind = ?1 AND item_id = ?2",
          rusqlite::params![kind.as_str(), id_str, input.name, input.description, parent_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_reference(kind, id).await
  }

  async fn delete_reference(&self, kind: ReferenceKind, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM reference_items WHERE kind = ?1 AND item_id = ?2",
          rusqlite::params![kind.as_str(), id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn create_staff(&self, input: NewStaff) -> Result<Staff> {
    let staff = Staff {
      id:            Uuid::new_v4(),
      user_id:       input.user_id,
      full_name:     input.full_name,
      department_id: input.department_id,
      campus_id:     input.campus_id,
      designation:   input.designation,
      mobile:        input.mobile,
      email:         input.email,
      created_at:    Utc::now(),
    };

    let id_str  = encode_uuid(staff.id);
    let user_id = staff.user_id.map(|u| u.0);
    let name    = staff.full_name.clone();
    let dept    = opt_uuid(staff.department_id);
    let campus  = opt_uuid(staff.campus_id);
    let desig   = staff.designation.clone();
    let mobile  = staff.mobile.clone();
    let email   = staff.email.clone();
    let at_str  = encode_dt(staff.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO staff (
             staff_id, user_id, full_name, department_id, campus_id,
             designation, mobile, email, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![id_str, user_id, name, dept, campus, desig, mobile, email, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(staff)
  }

  async fn list_staff(&self) -> Result<Vec<Staff>> {
    let raws: Vec<RawStaff> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM staff ORDER BY full_name COLLATE NOCASE",
          RawStaff::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawStaff::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStaff::into_staff).collect()
  }

  async fn get_staff(&self, id: Uuid) -> Result<Option<Staff>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStaff> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM staff WHERE staff_id = ?1", RawStaff::COLUMNS),
            [id_str],
            RawStaff::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawStaff::into_staff).transpose()
  }

  async fn update_staff(&self, id: Uuid, input: NewStaff) -> Result<Option<Staff>> {
    let id_str  = encode_uuid(id);
    let user_id = input.user_id.map(|u| u.0);
    let dept    = opt_uuid(input.department_id);
    let campus  = opt_uuid(input.campus_id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE staff SET
             user_id = ?2, full_name = ?3, department_id = ?4, campus_id = ?5,
             designation = ?6, mobile = ?7, email = ?8
           WHERE staff_id = ?1",
          rusqlite::params![
            id_str,
            user_id,
            input.full_name,
            dept,
            campus,
            input.designation,
            input.mobile,
            input.email,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_staff(id).await
  }

  async fn delete_staff(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM staff WHERE staff_id = ?1", [id_str])?)
      })
      .await?;

    Ok(changed > 0)
  }
}
