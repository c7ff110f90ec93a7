//! # layerkit - 二维材料层群晶格工具箱
//!
//! 将二维材料高通量筛选中的零散脚本统一成单一可执行文件。
//!
//! ## 子命令
//! - `extract`  - 数据库导出表 → 各层群目录下的 POSCAR / CIF
//! - `classify` - 按面内长度与夹角分类晶格，写出工作簿并复制入选结构
//! - `fanout`   - 按 行 × 列 网格批量生成作业目录
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (层群目录收集)
//!   │     ├── lattice2d/ (几何、分类、报告、工作簿、绘图)
//!   │     ├── parsers/   (POSCAR / CIF / 导出表)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod lattice2d;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
