// ==========================================
// 排班工时系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 排班槽位发布后自动生成每日工时单
// 业务红线: 单日工时不超过 8 小时
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::SlotState;

// 领域实体
pub use domain::{PlanningSlot, TimesheetEntry, TimesheetKey};

// 引擎
pub use engine::{Allocation, HourDistributor, TimesheetGenerator, MAX_HOURS_PER_DAY};

// API
pub use api::{GenerateResponse, SlotApi, TimesheetApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "排班工时系统";

// ==========================================
// 预编译检查
// ==========================================
