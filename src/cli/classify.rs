//! # classify 子命令 CLI 定义
//!
//! 面内晶格分类、工作簿报告与筛选复制
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/classify.rs`

use crate::lattice2d::Scheme;
use clap::Args;
use std::path::PathBuf;

/// classify 子命令参数
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Root directory containing lgnum_<N>/ folders
    #[arg(env = "LAYERKIT_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output root for filtered folders and the workbook (defaults to the input root)
    #[arg(short, long, env = "LAYERKIT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Classification scheme
    #[arg(short, long, value_enum, default_value = "centering")]
    pub scheme: Scheme,

    /// Glob pattern for structure files inside each lgnum_<N>/ folder
    #[arg(short, long, default_value = "*.vasp")]
    pub pattern: String,

    /// Workbook filename, written under the output root
    #[arg(long, default_value = "vasp_results.xlsx")]
    pub workbook: PathBuf,

    /// Save a |L1-L2| vs. angle scatter plot (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Remove existing filtered folders before copying
    #[arg(long, default_value_t = false)]
    pub clean: bool,

    /// Only write the report, do not copy any files
    #[arg(long, default_value_t = false)]
    pub no_copy: bool,
}
