use crate::model::{AssignmentId, NewStaff, ShiftAssignment, ShiftGroup, StaffId, StaffMember};
use crate::roster::REFERENCE_ORDER;
use crate::scheduler::next_shift;
use chrono::{Days, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, TransactionBehavior};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum StoreError {
    /// Échec dans `replace_week` : la semaine est restée dans son état antérieur.
    #[error("week replacement rolled back: {0}")]
    Transaction(#[source] rusqlite::Error),
    #[error("unknown staff id: {0}")]
    UnknownStaff(StaffId),
    #[error("duplicate assignment for {date} {group}")]
    DuplicateSlot { date: NaiveDate, group: ShiftGroup },
    #[error("assignment dated {date} is outside the week starting {start}")]
    OutOfWeek { date: NaiveDate, start: NaiveDate },
    #[error("staff {0} still has assignments; deactivate instead")]
    StaffInUse(StaffId),
    #[error("invalid staff: {0}")]
    InvalidStaff(&'static str),
    #[error("date out of calendar range")]
    DateOverflow,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Contrat de persistance des semaines de permanence.
pub trait AssignmentStore {
    /// Assignations de `[start, start+6]`, triées par date puis groupe.
    fn get_week(&self, start: NaiveDate) -> Result<Vec<ShiftAssignment>, StoreError>;

    fn get_assignment(
        &self,
        date: NaiveDate,
        group: ShiftGroup,
    ) -> Result<Option<ShiftAssignment>, StoreError>;

    /// Remplace atomiquement la semaine : tout ou rien.
    fn replace_week(
        &mut self,
        start: NaiveDate,
        assignments: &[ShiftAssignment],
    ) -> Result<(), StoreError>;

    /// Vide la semaine, retourne le nombre de lignes supprimées.
    fn clear_week(&mut self, start: NaiveDate) -> Result<usize, StoreError>;

    /// Personne qui prend le poste suivant `(date, group)`.
    fn relief_for(
        &self,
        date: NaiveDate,
        group: ShiftGroup,
    ) -> Result<Option<ShiftAssignment>, StoreError> {
        let (next_date, next_group) = next_shift(date, group).ok_or(StoreError::DateOverflow)?;
        self.get_assignment(next_date, next_group)
    }
}

/// Annuaire du personnel (lecture seule côté planification).
pub trait StaffDirectory {
    /// Membres actifs, triés par nom.
    fn list_active(&self) -> Result<Vec<StaffMember>, StoreError>;
}

/// Store SQLite : tables `Staff` et `Assignment`.
pub struct SqliteStore {
    conn: Connection,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Staff (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT NOT NULL,
    position TEXT,
    unit     TEXT,
    phone    TEXT,
    email    TEXT,
    active   INTEGER NOT NULL DEFAULT 1
);
CREATE TABLE IF NOT EXISTS Assignment (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    date     TEXT NOT NULL,
    "group"  TEXT NOT NULL CHECK ("group" IN ('GroupA', 'GroupB')),
    staff_id INTEGER NOT NULL REFERENCES Staff(id)
);
CREATE INDEX IF NOT EXISTS idx_assignment_date_group ON Assignment(date, "group");
"#;

const SELECT_ASSIGNMENT: &str = r#"
SELECT a.id, a.date, a."group", a.staff_id, s.name
FROM Assignment a
LEFT JOIN Staff s ON s.id = a.staff_id
"#;

impl SqliteStore {
    /// Ouvre (ou crée) la base au chemin donné.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        debug!(path = %path.display(), journal = %mode, "opened database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn add_staff(&self, staff: &NewStaff) -> Result<StaffId, StoreError> {
        let name = staff.full_name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidStaff("full name cannot be empty"));
        }
        self.conn.execute(
            "INSERT INTO Staff (name, position, unit, phone, email) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, staff.position, staff.unit, staff.phone, staff.email],
        )?;
        let id = StaffId::new(self.conn.last_insert_rowid());
        debug!(%id, staff = name, "staff added");
        Ok(id)
    }

    /// Active/désactive un membre ; `false` si l'id n'existe pas.
    pub fn set_active(&self, id: StaffId, active: bool) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "UPDATE Staff SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(n > 0)
    }

    /// Renomme un membre ; `false` si l'id n'existe pas. Le nouveau nom
    /// détermine sa place dans l'ordre de référence.
    pub fn rename_staff(&self, id: StaffId, full_name: &str) -> Result<bool, StoreError> {
        let name = full_name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidStaff("full name cannot be empty"));
        }
        let n = self
            .conn
            .execute("UPDATE Staff SET name = ?1 WHERE id = ?2", params![name, id])?;
        debug!(%id, staff = name, renamed = n > 0, "staff renamed");
        Ok(n > 0)
    }

    /// Supprime un membre sans assignation ; `false` si l'id n'existe pas.
    pub fn delete_staff(&self, id: StaffId) -> Result<bool, StoreError> {
        let used: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM Assignment WHERE staff_id = ?1)",
            params![id],
            |r| r.get(0),
        )?;
        if used {
            return Err(StoreError::StaffInUse(id));
        }
        let n = self
            .conn
            .execute("DELETE FROM Staff WHERE id = ?1", params![id])?;
        debug!(%id, deleted = n > 0, "staff deleted");
        Ok(n > 0)
    }

    /// Insère l'équipe de référence si la table est vide. Retourne le nombre
    /// de membres créés.
    pub fn seed_reference_roster(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Staff", [], |r| r.get(0))?;
        if count > 0 {
            return Ok(0);
        }
        for name in REFERENCE_ORDER {
            self.add_staff(&NewStaff::named(name))?;
        }
        info!(count = REFERENCE_ORDER.len(), "seeded reference roster");
        Ok(REFERENCE_ORDER.len())
    }

    /// Tous les membres, actifs ou non.
    pub fn list_staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        self.query_staff("SELECT id, name, active, position, unit, phone, email FROM Staff ORDER BY name")
    }

    fn query_staff(&self, sql: &str) -> Result<Vec<StaffMember>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |r| {
            Ok(StaffMember {
                id: r.get(0)?,
                full_name: r.get(1)?,
                active: r.get(2)?,
                position: r.get(3)?,
                unit: r.get(4)?,
                phone: r.get(5)?,
                email: r.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn week_end(start: NaiveDate) -> Result<NaiveDate, StoreError> {
    start
        .checked_add_days(Days::new(6))
        .ok_or(StoreError::DateOverflow)
}

fn day_key(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

fn parse_day(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn assignment_from_row(r: &Row<'_>) -> rusqlite::Result<ShiftAssignment> {
    let raw: String = r.get(1)?;
    Ok(ShiftAssignment {
        id: Some(AssignmentId::new(r.get(0)?)),
        date: parse_day(1, &raw)?,
        group: r.get(2)?,
        staff_id: r.get(3)?,
        staff_name: r.get(4)?,
    })
}

impl AssignmentStore for SqliteStore {
    fn get_week(&self, start: NaiveDate) -> Result<Vec<ShiftAssignment>, StoreError> {
        let end = week_end(start)?;
        let sql = format!(
            "{SELECT_ASSIGNMENT} WHERE a.date BETWEEN ?1 AND ?2 ORDER BY a.date, a.\"group\""
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![day_key(start), day_key(end)], assignment_from_row)?;
        let week = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(%start, rows = week.len(), "week loaded");
        Ok(week)
    }

    fn get_assignment(
        &self,
        date: NaiveDate,
        group: ShiftGroup,
    ) -> Result<Option<ShiftAssignment>, StoreError> {
        let sql = format!("{SELECT_ASSIGNMENT} WHERE a.date = ?1 AND a.\"group\" = ?2");
        let found = self
            .conn
            .query_row(&sql, params![day_key(date), group], assignment_from_row)
            .optional()?;
        Ok(found)
    }

    fn replace_week(
        &mut self,
        start: NaiveDate,
        assignments: &[ShiftAssignment],
    ) -> Result<(), StoreError> {
        let end = week_end(start)?;

        let mut seen = HashSet::new();
        for a in assignments {
            if a.date < start || a.date > end {
                return Err(StoreError::OutOfWeek {
                    date: a.date,
                    start,
                });
            }
            if !seen.insert((a.date, a.group)) {
                return Err(StoreError::DuplicateSlot {
                    date: a.date,
                    group: a.group,
                });
            }
        }

        // La transaction est annulée au drop si on sort avant le commit.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::Transaction)?;

        let deleted = tx
            .execute(
                "DELETE FROM Assignment WHERE date BETWEEN ?1 AND ?2",
                params![day_key(start), day_key(end)],
            )
            .map_err(StoreError::Transaction)?;

        {
            let mut exists = tx
                .prepare("SELECT EXISTS(SELECT 1 FROM Staff WHERE id = ?1)")
                .map_err(StoreError::Transaction)?;
            let mut insert = tx
                .prepare("INSERT INTO Assignment (date, \"group\", staff_id) VALUES (?1, ?2, ?3)")
                .map_err(StoreError::Transaction)?;

            for a in assignments {
                let known: bool = exists
                    .query_row(params![a.staff_id], |r| r.get(0))
                    .map_err(StoreError::Transaction)?;
                if !known {
                    warn!(%start, staff = %a.staff_id, "unknown staff, rolling back week");
                    return Err(StoreError::UnknownStaff(a.staff_id));
                }
                insert
                    .execute(params![day_key(a.date), a.group, a.staff_id])
                    .map_err(StoreError::Transaction)?;
            }
        }

        tx.commit().map_err(StoreError::Transaction)?;
        info!(%start, deleted, inserted = assignments.len(), "week replaced");
        Ok(())
    }

    fn clear_week(&mut self, start: NaiveDate) -> Result<usize, StoreError> {
        let end = week_end(start)?;
        let n = self.conn.execute(
            "DELETE FROM Assignment WHERE date BETWEEN ?1 AND ?2",
            params![day_key(start), day_key(end)],
        )?;
        info!(%start, deleted = n, "week cleared");
        Ok(n)
    }
}

impl StaffDirectory for SqliteStore {
    fn list_active(&self) -> Result<Vec<StaffMember>, StoreError> {
        self.query_staff(
            "SELECT id, name, active, position, unit, phone, email FROM Staff WHERE active = 1 ORDER BY name",
        )
    }
}

impl ToSql for ShiftGroup {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ShiftGroup {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for StaffId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.get()))
    }
}

impl FromSql for StaffId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(StaffId::new)
    }
}
