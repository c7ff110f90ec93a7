//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `batch/`, `lattice2d/`, `utils/`
//! - 子模块: extract, classify, fanout

pub mod classify;
pub mod extract;
pub mod fanout;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Extract(args) => extract::execute(args),
        Commands::Classify(args) => classify::execute(args),
        Commands::Fanout(args) => fanout::execute(args),
    }
}
