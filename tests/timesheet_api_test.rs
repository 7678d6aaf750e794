// ==========================================
// TimesheetApi 集成测试
// ==========================================
// 测试目标: 验证外部调用边界的完整流程
// 覆盖范围: 日期校验、候选检索、去重、顺延落库、配置覆写
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;

use planning_timesheet::config::{config_keys, ConfigManager};
use planning_timesheet::db;
use planning_timesheet::domain::{PlanningSlot, SlotState, TimesheetEntry, TimesheetKey};
use planning_timesheet::repository::{PlanningSlotRepository, TimesheetRepository};
use planning_timesheet::TimesheetApi;

// ==========================================
// 测试辅助函数
// ==========================================

struct TestContext {
    slot_repo: Arc<PlanningSlotRepository>,
    timesheet_repo: Arc<TimesheetRepository>,
    config_manager: Arc<ConfigManager>,
    api: TimesheetApi,
}

fn setup() -> TestContext {
    let conn = Connection::open_in_memory().unwrap();
    db::configure_sqlite_connection(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let slot_repo = Arc::new(PlanningSlotRepository::from_connection(Arc::clone(&conn)).unwrap());
    let timesheet_repo =
        Arc::new(TimesheetRepository::from_connection(Arc::clone(&conn)).unwrap());
    let config_manager = Arc::new(ConfigManager::from_connection(conn).unwrap());

    let api = TimesheetApi::new(
        Arc::clone(&slot_repo),
        Arc::clone(&timesheet_repo),
        Arc::clone(&config_manager),
    );

    TestContext {
        slot_repo,
        timesheet_repo,
        config_manager,
        api,
    }
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
}

fn make_slot(slot_id: &str, partner_id: &str, effective: f64, allocated: f64) -> PlanningSlot {
    let start = d(16).and_hms_opt(9, 0, 0).unwrap();
    PlanningSlot {
        slot_id: slot_id.to_string(),
        name: None,
        partner_id: Some(partner_id.to_string()),
        employee_id: "E001".to_string(),
        project_id: "PRJ001".to_string(),
        start_datetime: start,
        end_datetime: d(19).and_hms_opt(18, 0, 0).unwrap(),
        allocated_hours: allocated,
        effective_hours: effective,
        allow_timesheets: true,
        state: SlotState::Draft,
        created_at: start,
        updated_at: start,
    }
}

fn make_existing_entry(slot: &PlanningSlot, date: NaiveDate) -> TimesheetEntry {
    TimesheetEntry {
        timesheet_id: format!("PRE-{}", date),
        slot_id: slot.slot_id.clone(),
        employee_id: slot.employee_id.clone(),
        project_id: slot.project_id.clone(),
        partner_id: slot.partner_id.clone().unwrap(),
        date,
        unit_amount: 8.0,
        name: format!("已有工时单 - {}", date),
        created_at: date.and_hms_opt(18, 0, 0).unwrap(),
    }
}

// ==========================================
// 入参校验
// ==========================================

#[test]
fn test_invalid_date_format_returns_structured_error() {
    let ctx = setup();
    let response = ctx
        .api
        .generate_timesheets("P001", "2025/05/16", "2025-05-19", None)
        .unwrap();
    assert_eq!(response.status, "error");
    assert_eq!(response.message, "Invalid date format. Use YYYY-MM-DD.");
    assert!(response.timesheet_ids.is_empty());
}

#[test]
fn test_start_after_end_returns_structured_error() {
    let ctx = setup();
    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-19", "2025-05-16", None)
        .unwrap();
    assert_eq!(response.status, "error");
    assert_eq!(response.message, "Start date cannot be after end date.");
    // 不合法区间未触碰任何写入
    assert_eq!(ctx.timesheet_repo.count_all().unwrap(), 0);
}

#[test]
fn test_no_candidate_slots_returns_structured_error() {
    let ctx = setup();
    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", None)
        .unwrap();
    assert_eq!(response.status, "error");
    assert!(response.message.contains("No planning slots found"));
}

// ==========================================
// 生成流程
// ==========================================

#[test]
fn test_generate_splits_hours_with_spillover() {
    let ctx = setup();
    let slot = make_slot("S001", "P001", 20.0, 0.0);
    ctx.slot_repo.insert(&slot).unwrap();

    // 2 天区间放 20 小时: 8 + 8 + 顺延 4
    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-17", None)
        .unwrap();
    assert!(response.is_success());
    assert_eq!(response.message, "Created 3 timesheet entries.");
    assert_eq!(response.timesheet_ids.len(), 3);

    let entries = ctx.timesheet_repo.list_by_slot("S001").unwrap();
    let by_day: Vec<(NaiveDate, f64)> = entries.iter().map(|e| (e.date, e.unit_amount)).collect();
    assert_eq!(by_day, vec![(d(16), 8.0), (d(17), 8.0), (d(18), 4.0)]);

    // 标签与归属字段
    assert_eq!(entries[0].name, "Timesheet from Planning Slot S001 - 2025-05-16");
    assert_eq!(entries[0].partner_id, "P001");
    assert_eq!(entries[0].employee_id, "E001");
    assert_eq!(entries[0].project_id, "PRJ001");
}

#[test]
fn test_generate_falls_back_to_allocated_hours() {
    let ctx = setup();
    ctx.slot_repo
        .insert(&make_slot("S001", "P001", 0.0, 12.0))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", None)
        .unwrap();
    assert!(response.is_success());

    let entries = ctx.timesheet_repo.list_by_slot("S001").unwrap();
    let total: f64 = entries.iter().map(|e| e.unit_amount).sum();
    assert_eq!(total, 12.0);
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_existing_entry_consumes_share_without_creating() {
    let ctx = setup();
    let slot = make_slot("S001", "P001", 24.0, 0.0);
    ctx.slot_repo.insert(&slot).unwrap();
    // 5-17 已有工时单
    ctx.timesheet_repo
        .create(&make_existing_entry(&slot, d(17)))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", None)
        .unwrap();
    assert!(response.is_success());
    // 5-17 的 8 小时份额被消耗: 只新建 5-16 与 5-18
    assert_eq!(response.timesheet_ids.len(), 2);

    let entries = ctx.timesheet_repo.list_by_slot("S001").unwrap();
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![d(16), d(17), d(18)]);
    assert!(!ctx
        .timesheet_repo
        .exists(&TimesheetKey::for_slot(&slot, d(19)))
        .unwrap());
}

#[test]
fn test_all_dates_taken_still_success_with_zero_created() {
    let ctx = setup();
    let slot = make_slot("S001", "P001", 8.0, 0.0);
    ctx.slot_repo.insert(&slot).unwrap();
    ctx.timesheet_repo
        .create(&make_existing_entry(&slot, d(16)))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-16", None)
        .unwrap();
    // 候选槽位非空即 success, 即使一条都没新建
    assert!(response.is_success());
    assert_eq!(response.message, "Created 0 timesheet entries.");
    assert!(response.timesheet_ids.is_empty());
}

#[test]
fn test_specific_slot_scopes_generation() {
    let ctx = setup();
    ctx.slot_repo
        .insert(&make_slot("S001", "P001", 8.0, 0.0))
        .unwrap();
    ctx.slot_repo
        .insert(&make_slot("S002", "P001", 8.0, 0.0))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", Some("S002"))
        .unwrap();
    assert!(response.is_success());
    assert_eq!(response.timesheet_ids.len(), 1);
    assert!(ctx.timesheet_repo.list_by_slot("S001").unwrap().is_empty());
    assert_eq!(ctx.timesheet_repo.list_by_slot("S002").unwrap().len(), 1);
}

#[test]
fn test_multiple_slots_processed_independently() {
    let ctx = setup();
    ctx.slot_repo
        .insert(&make_slot("S001", "P001", 8.0, 0.0))
        .unwrap();
    ctx.slot_repo
        .insert(&make_slot("S002", "P001", 16.0, 0.0))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", None)
        .unwrap();
    assert!(response.is_success());
    // S001: 1 条; S002: 2 条
    assert_eq!(response.timesheet_ids.len(), 3);
    assert_eq!(ctx.timesheet_repo.count_all().unwrap(), 3);
}

// ==========================================
// 配置覆写
// ==========================================

#[test]
fn test_zero_cap_config_ignored_generation_terminates() {
    let ctx = setup();
    // 上限配置为 0 不可接受: 回退默认 8.0, 生成流程正常收敛
    ctx.config_manager
        .set_global_config_value(config_keys::MAX_HOURS_PER_DAY, "0")
        .unwrap();
    ctx.slot_repo
        .insert(&make_slot("S001", "P001", 20.0, 0.0))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-17", None)
        .unwrap();
    assert!(response.is_success());

    let entries = ctx.timesheet_repo.list_by_slot("S001").unwrap();
    let by_day: Vec<(NaiveDate, f64)> = entries.iter().map(|e| (e.date, e.unit_amount)).collect();
    assert_eq!(by_day, vec![(d(16), 8.0), (d(17), 8.0), (d(18), 4.0)]);
    // 每条工时均为正数
    assert!(entries.iter().all(|e| e.unit_amount > 0.0));
}

#[test]
fn test_daily_cap_config_override() {
    let ctx = setup();
    ctx.config_manager
        .set_global_config_value(config_keys::MAX_HOURS_PER_DAY, "4")
        .unwrap();
    ctx.slot_repo
        .insert(&make_slot("S001", "P001", 10.0, 0.0))
        .unwrap();

    let response = ctx
        .api
        .generate_timesheets("P001", "2025-05-16", "2025-05-19", None)
        .unwrap();
    assert!(response.is_success());

    let entries = ctx.timesheet_repo.list_by_slot("S001").unwrap();
    let by_day: Vec<(NaiveDate, f64)> = entries.iter().map(|e| (e.date, e.unit_amount)).collect();
    assert_eq!(by_day, vec![(d(16), 4.0), (d(17), 4.0), (d(18), 2.0)]);
}
