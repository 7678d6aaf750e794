// ==========================================
// 排班工时系统 - 日志初始化
// ==========================================
// 基于 tracing / tracing-subscriber
// 级别由 RUST_LOG 控制, 缺省 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// 发布钩子与分摊引擎的关键节点都会打 tracing 事件,
/// 排查分摊结果时建议开启:
/// `RUST_LOG=planning_timesheet=debug`
///
/// # 示例
/// ```no_run
/// planning_timesheet::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 固定 debug 级别并写入测试捕获器; 重复调用安全
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
