//! # study-scheduler - 间隔重复调度核心
//!
//! Decides when a flashcard should be shown again, given how well the learner
//! recalled it.
//!
//! - **Memory model** - per-card stability, difficulty and lifecycle phase
//! - **Forgetting curve** - retrievability from stability and elapsed days,
//!   and its inverse for the next interval
//! - **Legacy migration** - imported cards keep their prior interval
//!
//! The core is pure: no I/O, no global mutable state, identical inputs give
//! identical outputs. Callers own persistence and pass in `now`.
//!
//! ## 模块结构
//!
//! - [`scheduler`] - state machine, review update, batch and preview
//! - [`config`] - configuration sources and validated parameters
//! - [`migration`] - import-time state for legacy cards
//! - [`sanitize`] - input sanitization
//! - [`types`] - ratings, phases, memory state, constants
//! - `logging` - tracing subscriber setup for binaries (feature `cli`)
//!
//! ## 使用示例
//!
//! ```rust
//! use chrono::Utc;
//! use study_scheduler::{schedule, Phase, Rating};
//!
//! let now = Utc::now();
//! let first = schedule(Rating::Good, None, None, now, None);
//! assert_eq!(first.state.phase(), Phase::Learning);
//!
//! let second = schedule(Rating::Easy, Some(&first.state), Some(1.0), now, None);
//! assert!(second.state.stability() > first.state.stability());
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod config;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod migration;
pub mod sanitize;
pub mod scheduler;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出调度器与单次调度入口
pub use scheduler::{schedule, Scheduler};

/// 重新导出配置
pub use config::{ConfigOverride, Parameters, SchedulerConfig};

/// 重新导出旧系统迁移
pub use migration::{migrate_interval, migrate_legacy, LegacyItem};

pub use error::{Result, SchedulerError};
