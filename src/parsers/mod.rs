//! # 解析器模块
//!
//! 结构文件的读取与写出。
//!
//! ## 依赖关系
//! - 被 `commands/`、`batch/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, cif, c2db

pub mod c2db;
pub mod cif;
pub mod poscar;
