//! # 二维晶格分析模块
//!
//! 提取面内几何、按方案分类、汇总报告并导出。
//!
//! ## 子模块
//! - `geometry`: 真空方向判定与面内长度/夹角
//! - `scheme`: 阈值判据与两种分类方案
//! - `report`: 报告汇总、分桶与统计
//! - `workbook`: xlsx 工作簿导出
//! - `plot`: 分类散点图
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs`、`batch/collector.rs` 使用
//! - 使用 `models/structure.rs`

pub mod geometry;
pub mod plot;
pub mod report;
pub mod scheme;
pub mod workbook;

pub use geometry::in_plane_geometry;
pub use report::{Report, ReportRow, StructureRecord};
pub use scheme::Scheme;
