//! # 批量处理模块
//!
//! 提供层群目录的批量收集能力。
//!
//! ## 功能
//! - 扫描 `lgnum_<N>` 目录
//! - 收集匹配的结构文件
//! - 读取结构并计算面内几何
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs` 使用
//! - 使用 `walkdir` 遍历目录

pub mod collector;

pub use collector::{read_structure, GroupCollector, LayerGroupDir, GROUP_DIR_PREFIX};
