// ==========================================
// 排班工时系统 - 排班槽位仓储
// ==========================================
// 职责:
// - 管理 planning_slot 表
// - 提供候选槽位检索(按客户 + 记工时资格 + 工时>0)
// - 发布状态流转(mark_published)
// ==========================================

use crate::domain::slot::PlanningSlot;
use crate::domain::types::SlotState;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct PlanningSlotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlanningSlotRepository {
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
            CREATE TABLE IF NOT EXISTS planning_slot (
              slot_id TEXT PRIMARY KEY,
              name TEXT,
              partner_id TEXT,
              employee_id TEXT NOT NULL,
              project_id TEXT NOT NULL,
              start_datetime TEXT NOT NULL,
              end_datetime TEXT NOT NULL,
              allocated_hours REAL NOT NULL DEFAULT 0,
              effective_hours REAL NOT NULL DEFAULT 0,
              allow_timesheets INTEGER NOT NULL DEFAULT 1,
              state TEXT NOT NULL DEFAULT 'DRAFT',
              created_at TEXT NOT NULL DEFAULT (datetime('now')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_planning_slot_partner
              ON planning_slot(partner_id);
            "#,
        )?;
        Ok(())
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<PlanningSlot> {
        let state_str: String = row.get("state")?;
        Ok(PlanningSlot {
            slot_id: row.get("slot_id")?,
            name: row.get("name")?,
            partner_id: row.get("partner_id")?,
            employee_id: row.get("employee_id")?,
            project_id: row.get("project_id")?,
            start_datetime: row.get("start_datetime")?,
            end_datetime: row.get("end_datetime")?,
            allocated_hours: row.get("allocated_hours")?,
            effective_hours: row.get("effective_hours")?,
            allow_timesheets: row.get("allow_timesheets")?,
            state: SlotState::from_str(&state_str),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// 插入槽位
    pub fn insert(&self, slot: &PlanningSlot) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO planning_slot (
              slot_id, name, partner_id, employee_id, project_id,
              start_datetime, end_datetime, allocated_hours, effective_hours,
              allow_timesheets, state, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                slot.slot_id,
                slot.name,
                slot.partner_id,
                slot.employee_id,
                slot.project_id,
                slot.start_datetime,
                slot.end_datetime,
                slot.allocated_hours,
                slot.effective_hours,
                slot.allow_timesheets,
                slot.state.to_db_str(),
                slot.created_at,
                slot.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按ID查询槽位
    pub fn find_by_id(&self, slot_id: &str) -> RepositoryResult<PlanningSlot> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT * FROM planning_slot WHERE slot_id = ?1",
            params![slot_id],
            Self::map_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "PlanningSlot".to_string(),
                id: slot_id.to_string(),
            },
            other => other.into(),
        })
    }

    /// 检索可生成工时单的候选槽位
    ///
    /// 过滤条件:
    /// - partner_id 匹配(未指派槽位天然排除)
    /// - 项目允许记工时
    /// - effective_hours > 0 或 allocated_hours > 0
    /// - specific_slot_id 给定时,只命中该槽位
    pub fn find_timesheet_candidates(
        &self,
        partner_id: &str,
        specific_slot_id: Option<&str>,
    ) -> RepositoryResult<Vec<PlanningSlot>> {
        let conn = self.get_conn()?;
        let base_sql = r#"
            SELECT * FROM planning_slot
            WHERE partner_id = ?1
              AND allow_timesheets = 1
              AND (effective_hours > 0 OR allocated_hours > 0)
        "#;

        let mut slots = Vec::new();
        if let Some(slot_id) = specific_slot_id {
            let sql = format!("{} AND slot_id = ?2 ORDER BY start_datetime, slot_id", base_sql);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![partner_id, slot_id], Self::map_row)?;
            for row in rows {
                slots.push(row?);
            }
        } else {
            let sql = format!("{} ORDER BY start_datetime, slot_id", base_sql);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![partner_id], Self::map_row)?;
            for row in rows {
                slots.push(row?);
            }
        }
        Ok(slots)
    }

    /// 将槽位置为已发布
    ///
    /// # 返回
    /// 更新后的槽位
    pub fn mark_published(&self, slot_id: &str) -> RepositoryResult<PlanningSlot> {
        {
            let conn = self.get_conn()?;
            let affected = conn.execute(
                "UPDATE planning_slot SET state = 'PUBLISHED', updated_at = datetime('now') WHERE slot_id = ?1",
                params![slot_id],
            )?;
            if affected == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "PlanningSlot".to_string(),
                    id: slot_id.to_string(),
                });
            }
        }
        self.find_by_id(slot_id)
    }
}
