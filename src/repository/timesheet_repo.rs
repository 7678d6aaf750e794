// ==========================================
// 排班工时系统 - 工时单仓储
// ==========================================
// 职责:
// - 管理 timesheet_entry 表
// - 去重检查: (slot_id, employee_id, project_id, date) 已存在则不再创建
// - 创建工时单并返回持久化ID
// ==========================================

use crate::domain::timesheet::{TimesheetEntry, TimesheetKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub struct TimesheetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TimesheetRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_tables()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS timesheet_entry (
              timesheet_id TEXT PRIMARY KEY,
              slot_id TEXT NOT NULL,
              employee_id TEXT NOT NULL,
              project_id TEXT NOT NULL,
              partner_id TEXT NOT NULL,
              date TEXT NOT NULL,
              unit_amount REAL NOT NULL,
              name TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_timesheet_entry_dedup
              ON timesheet_entry(slot_id, employee_id, project_id, date);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<TimesheetEntry> {
        Ok(TimesheetEntry {
            timesheet_id: row.get("timesheet_id")?,
            slot_id: row.get("slot_id")?,
            employee_id: row.get("employee_id")?,
            project_id: row.get("project_id")?,
            partner_id: row.get("partner_id")?,
            date: row.get("date")?,
            unit_amount: row.get("unit_amount")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// 去重检查: 该键是否已有工时单
    pub fn exists(&self, key: &TimesheetKey) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM timesheet_entry
            WHERE slot_id = ?1 AND employee_id = ?2 AND project_id = ?3 AND date = ?4
            "#,
            params![key.slot_id, key.employee_id, key.project_id, key.date],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 创建工时单
    ///
    /// # 返回
    /// 持久化的工时单ID
    pub fn create(&self, entry: &TimesheetEntry) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO timesheet_entry (
              timesheet_id, slot_id, employee_id, project_id, partner_id,
              date, unit_amount, name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                entry.timesheet_id,
                entry.slot_id,
                entry.employee_id,
                entry.project_id,
                entry.partner_id,
                entry.date,
                entry.unit_amount,
                entry.name,
                entry.created_at,
            ],
        )?;
        Ok(entry.timesheet_id.clone())
    }

    /// 取槽位×员工×项目下已有工时单的全部日期
    ///
    /// 用途: 引擎侧一次性预取,分摊谓词在内存中查集合,避免逐日回查
    pub fn existing_dates(
        &self,
        slot_id: &str,
        employee_id: &str,
        project_id: &str,
    ) -> RepositoryResult<HashSet<NaiveDate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT date FROM timesheet_entry
            WHERE slot_id = ?1 AND employee_id = ?2 AND project_id = ?3
            "#,
        )?;
        let rows = stmt.query_map(params![slot_id, employee_id, project_id], |row| {
            row.get::<_, NaiveDate>(0)
        })?;
        let mut dates = HashSet::new();
        for row in rows {
            dates.insert(row?);
        }
        Ok(dates)
    }

    /// 按槽位列出工时单(按日期升序)
    pub fn list_by_slot(&self, slot_id: &str) -> RepositoryResult<Vec<TimesheetEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM timesheet_entry WHERE slot_id = ?1 ORDER BY date, timesheet_id",
        )?;
        let rows = stmt.query_map(params![slot_id], Self::map_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// 统计工时单总数(测试/巡检用)
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM timesheet_entry", [], |row| row.get(0))?;
        Ok(count)
    }
}
