//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `extract`: 数据库导出表 → 各层群目录下的 POSCAR / CIF
//! - `classify`: 面内晶格分类、工作簿报告与筛选复制
//! - `fanout`: 批量生成作业目录
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: extract, classify, fanout

pub mod classify;
pub mod extract;
pub mod fanout;

use clap::{Parser, Subcommand};

/// layerkit - 二维材料层群晶格工具箱
#[derive(Parser)]
#[command(name = "layerkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Layer-group lattice classification and job preparation for 2D materials", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Export database rows into lgnum_<N>/ folders as POSCAR and CIF files
    Extract(extract::ExtractArgs),

    /// Classify 2D lattices by in-plane geometry and copy the selected structures
    Classify(classify::ClassifyArgs),

    /// Create a grid of job directories seeded with POSCARs and input templates
    Fanout(fanout::FanoutArgs),
}

/// 解析层群范围 (e.g., "8-48" 或 "12")
pub fn parse_lgnum_range(expr: &str) -> Result<std::ops::RangeInclusive<u32>, String> {
    let invalid = || format!("Invalid layer group range '{}', expected e.g. '8-48'", expr);

    let (start, end) = match expr.split_once('-') {
        Some((a, b)) => (
            a.trim().parse::<u32>().map_err(|_| invalid())?,
            b.trim().parse::<u32>().map_err(|_| invalid())?,
        ),
        None => {
            let v = expr.trim().parse::<u32>().map_err(|_| invalid())?;
            (v, v)
        }
    };

    if start < 1 || end < start {
        return Err(invalid());
    }

    Ok(start..=end)
}
