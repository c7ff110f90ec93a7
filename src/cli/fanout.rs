//! # fanout 子命令 CLI 定义
//!
//! 按 行 × 列 网格生成作业目录
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fanout.rs`

use clap::Args;
use std::path::PathBuf;

/// fanout 子命令参数
#[derive(Args, Debug)]
pub struct FanoutArgs {
    /// Directory containing <i><j>.vasp structure files
    #[arg(long, default_value = "poscars")]
    pub poscar_dir: PathBuf,

    /// Directory whose files are copied into every job directory
    #[arg(long, default_value = "inputs")]
    pub inputs_dir: PathBuf,

    /// Root directory for the job folders
    #[arg(short, long, env = "LAYERKIT_OUTPUT", default_value = ".")]
    pub output: PathBuf,

    /// Number of grid rows (i = 1..=rows)
    #[arg(long, default_value_t = 8)]
    pub rows: u32,

    /// Number of grid columns (j = 1..=cols)
    #[arg(long, default_value_t = 5)]
    pub cols: u32,

    /// Name of the structure file inside each job directory
    #[arg(long, default_value = "POSCAR")]
    pub poscar_name: String,
}
