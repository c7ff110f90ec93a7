//! # extract 子命令 CLI 定义
//!
//! 将数据库导出表按层群写成 POSCAR / CIF
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/extract.rs`

use clap::Args;
use std::path::PathBuf;

/// extract 子命令参数
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// CSV export of the database (uid, formula, folder, lgnum, cell, symbols, positions)
    pub input: PathBuf,

    /// Root directory in which lgnum_<N>/ folders are created
    #[arg(short, long, env = "LAYERKIT_OUTPUT", default_value = ".")]
    pub output: PathBuf,

    /// Layer group range to export (e.g., '8-48')
    #[arg(long, default_value = "8-48")]
    pub lgnum: String,

    /// Skip writing CIF files
    #[arg(long, default_value_t = false)]
    pub no_cif: bool,
}
