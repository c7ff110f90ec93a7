//! # fanout 命令实现
//!
//! 按 行 × 列 网格生成作业目录 `<i><j>/`。
//!
//! ## 功能
//! - 复制 `<poscar_dir>/<i><j>.vasp` 为作业目录中的 POSCAR
//! - 复制输入模板目录中的所有文件
//! - POSCAR 或模板目录缺失时只警告，不中止
//!
//! ## 依赖关系
//! - 使用 `cli/fanout.rs` 定义的参数
//! - 使用 `walkdir` 列出模板文件
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::fanout::FanoutArgs;
use crate::error::{LayerkitError, Result};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// fanout 运行配置
#[derive(Debug, Clone)]
pub struct FanoutConfig {
    pub poscar_dir: PathBuf,
    pub inputs_dir: PathBuf,
    pub output_root: PathBuf,
    pub rows: u32,
    pub cols: u32,
    pub poscar_name: String,
}

impl From<FanoutArgs> for FanoutConfig {
    fn from(args: FanoutArgs) -> Self {
        FanoutConfig {
            poscar_dir: args.poscar_dir,
            inputs_dir: args.inputs_dir,
            output_root: args.output,
            rows: args.rows,
            cols: args.cols,
            poscar_name: args.poscar_name,
        }
    }
}

/// 生成计数
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanoutSummary {
    pub jobs: usize,
    pub poscars: usize,
    pub missing_poscars: usize,
    pub input_files: usize,
}

/// 执行 fanout 命令
pub fn execute(args: FanoutArgs) -> Result<()> {
    let config = FanoutConfig::from(args);

    if config.rows == 0 || config.cols == 0 {
        return Err(LayerkitError::InvalidArgument(format!(
            "Grid must have at least one row and one column, got {} x {}",
            config.rows, config.cols
        )));
    }

    output::print_header(&format!(
        "Creating {} x {} job directories in {}",
        config.rows,
        config.cols,
        config.output_root.display()
    ));

    let summary = run(&config)?;

    output::print_separator();
    output::print_done(&format!(
        "Created {} job(s), seeded {} POSCAR(s), {} missing",
        summary.jobs, summary.poscars, summary.missing_poscars
    ));

    Ok(())
}

/// 作业目录名：行号与列号直接拼接
pub fn job_name(row: u32, col: u32) -> String {
    format!("{}{}", row, col)
}

/// 生成全部作业目录
pub fn run(config: &FanoutConfig) -> Result<FanoutSummary> {
    let templates = list_templates(&config.inputs_dir);
    match &templates {
        Some(files) => output::print_info(&format!(
            "Copying {} input file(s) from {} into every job",
            files.len(),
            config.inputs_dir.display()
        )),
        None => output::print_warning(&format!(
            "Inputs directory {} not found, jobs get POSCAR only",
            config.inputs_dir.display()
        )),
    }

    let total = (config.rows * config.cols) as u64;
    let pb = progress::create_progress_bar(total, "Creating jobs");
    let mut summary = FanoutSummary::default();

    for i in 1..=config.rows {
        for j in 1..=config.cols {
            let name = job_name(i, j);
            let job_dir = config.output_root.join(&name);
            fs::create_dir_all(&job_dir).map_err(|e| LayerkitError::FileWriteError {
                path: job_dir.display().to_string(),
                source: e,
            })?;
            summary.jobs += 1;

            let poscar = config.poscar_dir.join(format!("{}.vasp", name));
            if poscar.is_file() {
                copy_file(&poscar, &job_dir.join(&config.poscar_name))?;
                summary.poscars += 1;
            } else {
                summary.missing_poscars += 1;
                pb.suspend(|| output::print_warning(&format!("{} not found", poscar.display())));
            }

            for file in templates.iter().flatten() {
                if let Some(file_name) = file.file_name() {
                    copy_file(file, &job_dir.join(file_name))?;
                    summary.input_files += 1;
                }
            }

            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    Ok(summary)
}

/// 模板目录中的普通文件（按名称排序），目录不存在时返回 None
fn list_templates(dir: &Path) -> Option<Vec<PathBuf>> {
    if !dir.is_dir() {
        return None;
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    Some(files)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|e| LayerkitError::FileWriteError {
        path: to.display().to_string(),
        source: e,
    })?;
    Ok(())
}
