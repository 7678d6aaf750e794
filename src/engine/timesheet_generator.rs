// ==========================================
// 排班工时系统 - 工时单生成引擎
// ==========================================
// 职责: 按客户×日期区间把候选槽位的工时落库为工时单
// ==========================================
// 输入: 客户ID + 日期区间 (+ 可选指定槽位)
// 输出: 已创建工时单ID列表
// 红线: 各槽位独立处理,互不回滚
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::slot::PlanningSlot;
use crate::domain::timesheet::{timesheet_label, TimesheetEntry};
use crate::engine::hour_distributor::HourDistributor;
use crate::repository::error::RepositoryResult;
use crate::repository::slot_repo::PlanningSlotRepository;
use crate::repository::timesheet_repo::TimesheetRepository;

// ==========================================
// GenerateReport - 生成结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    /// 命中的候选槽位数(为 0 时由 API 层转成结构化错误)
    pub slots_matched: usize,
    /// 已创建工时单ID(跨槽位,按处理顺序)
    pub created_timesheet_ids: Vec<String>,
}

// ==========================================
// TimesheetGenerator - 工时单生成引擎
// ==========================================
pub struct TimesheetGenerator {
    slot_repo: Arc<PlanningSlotRepository>,
    timesheet_repo: Arc<TimesheetRepository>,
    distributor: HourDistributor,
}

impl TimesheetGenerator {
    /// 创建新的 TimesheetGenerator 实例(单日上限 8 小时)
    pub fn new(
        slot_repo: Arc<PlanningSlotRepository>,
        timesheet_repo: Arc<TimesheetRepository>,
    ) -> Self {
        Self {
            slot_repo,
            timesheet_repo,
            distributor: HourDistributor::new(),
        }
    }

    /// 指定分摊引擎的构造函数(配置覆写单日上限时用)
    pub fn with_distributor(
        slot_repo: Arc<PlanningSlotRepository>,
        timesheet_repo: Arc<TimesheetRepository>,
        distributor: HourDistributor,
    ) -> Self {
        Self {
            slot_repo,
            timesheet_repo,
            distributor,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 为客户在日期区间内生成工时单
    ///
    /// 流程:
    /// 1) 检索候选槽位(记工时资格 + 工时>0, 可按指定槽位收窄)
    /// 2) 逐槽位取待分摊工时(effective 优先, 回退 allocated)
    /// 3) 预取该槽位已有工时单日期, 作为分摊引擎的去重谓词
    /// 4) 分摊结果逐条落库, 收集已创建ID
    ///
    /// # 前置条件
    /// - start_date <= end_date (由 API 层校验)
    ///
    /// # 返回
    /// GenerateReport; 候选为空时 slots_matched = 0, 不视为仓储错误
    #[instrument(skip(self))]
    pub fn generate_for_customer(
        &self,
        partner_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        specific_slot_id: Option<&str>,
    ) -> RepositoryResult<GenerateReport> {
        let slots = self
            .slot_repo
            .find_timesheet_candidates(partner_id, specific_slot_id)?;

        let mut report = GenerateReport {
            slots_matched: slots.len(),
            created_timesheet_ids: Vec::new(),
        };

        for slot in &slots {
            let created = self.generate_for_slot(slot, partner_id, start_date, end_date)?;
            report.created_timesheet_ids.extend(created);
        }

        tracing::info!(
            slots_matched = report.slots_matched,
            created = report.created_timesheet_ids.len(),
            "工时单生成完成"
        );
        Ok(report)
    }

    /// 单槽位的分摊与落库
    fn generate_for_slot(
        &self,
        slot: &PlanningSlot,
        partner_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> RepositoryResult<Vec<String>> {
        let total_hours = slot.hours_to_distribute();
        if total_hours <= 0.0 {
            // SQL 已过滤零工时槽位,此处兜底
            return Ok(Vec::new());
        }

        let taken_dates = self.timesheet_repo.existing_dates(
            &slot.slot_id,
            &slot.employee_id,
            &slot.project_id,
        )?;

        let allocations = self.distributor.distribute(total_hours, start_date, end_date, |date| {
            taken_dates.contains(&date)
        });

        let mut created_ids = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let entry = TimesheetEntry {
                timesheet_id: Uuid::new_v4().to_string(),
                slot_id: slot.slot_id.clone(),
                employee_id: slot.employee_id.clone(),
                project_id: slot.project_id.clone(),
                partner_id: partner_id.to_string(),
                date: allocation.date,
                unit_amount: allocation.hours,
                name: timesheet_label(slot, allocation.date),
                created_at: Utc::now().naive_utc(),
            };
            let id = self.timesheet_repo.create(&entry)?;
            created_ids.push(id);
        }

        tracing::debug!(
            slot_id = %slot.slot_id,
            total_hours,
            created = created_ids.len(),
            "槽位工时分摊落库"
        );
        Ok(created_ids)
    }
}
