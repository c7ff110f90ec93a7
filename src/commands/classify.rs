//! # classify 命令实现
//!
//! 对 `lgnum_<N>` 目录中的结构做二维晶格分类。
//!
//! ## 功能
//! - 读取每个 POSCAR 的晶格，计算面内长度与夹角
//! - 按所选方案分类、分桶
//! - 写出 xlsx 报告（全部结构 / 各分桶 / 层群统计）
//! - 将入桶结构的 .vasp 与 .cif 复制到 `filtered_vasp_files/`
//! - 可选绘制分类散点图
//!
//! ## 依赖关系
//! - 使用 `cli/classify.rs` 定义的参数
//! - 使用 `batch/`、`lattice2d/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{read_structure, GroupCollector, LayerGroupDir, GROUP_DIR_PREFIX};
use crate::cli::classify::ClassifyArgs;
use crate::error::{LayerkitError, Result};
use crate::lattice2d::plot::generate_classification_plot;
use crate::lattice2d::workbook::write_workbook;
use crate::lattice2d::{Report, ReportRow, Scheme};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use tabled::builder::Builder;

/// 筛选结果目录名
pub const FILTERED_DIR: &str = "filtered_vasp_files";

/// classify 运行配置
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// 含 `lgnum_<N>` 目录的根目录
    pub source_root: PathBuf,
    /// 筛选目录与工作簿的输出根目录
    pub output_root: PathBuf,
    pub scheme: Scheme,
    pub pattern: String,
    /// 工作簿完整路径
    pub workbook: PathBuf,
    pub plot: Option<(PathBuf, u32, u32)>,
    pub clean: bool,
    pub copy_files: bool,
}

impl ClassifyConfig {
    pub fn from_args(args: ClassifyArgs) -> Self {
        let output_root = args.output.unwrap_or_else(|| args.root.clone());
        let workbook = if args.workbook.is_absolute() {
            args.workbook
        } else {
            output_root.join(&args.workbook)
        };

        ClassifyConfig {
            source_root: args.root,
            output_root,
            scheme: args.scheme,
            pattern: args.pattern,
            workbook,
            plot: args.plot.map(|p| (p, args.width, args.height)),
            clean: args.clean,
            copy_files: !args.no_copy,
        }
    }

    /// 某层群的筛选目录
    pub fn filtered_dir(&self, lgnum: u32) -> PathBuf {
        self.output_root
            .join(format!("{}{}", GROUP_DIR_PREFIX, lgnum))
            .join(FILTERED_DIR)
    }
}

/// 一次运行的计数
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifySummary {
    pub groups: usize,
    pub records: usize,
    pub selected: usize,
    pub copied_structures: usize,
    pub copied_cifs: usize,
    pub missing_cifs: usize,
}

/// 执行 classify 命令
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let config = ClassifyConfig::from_args(args);

    output::print_header(&format!(
        "Classifying 2D lattices ({} scheme, lgnum {}-{})",
        config.scheme,
        config.scheme.layer_groups().start(),
        config.scheme.layer_groups().end()
    ));

    let (report, summary) = run(&config)?;

    if report.is_empty() {
        output::print_warning(&format!(
            "No structures matched '{}' under {}",
            config.pattern,
            config.source_root.display()
        ));
        return Ok(());
    }

    output::print_header("Layer Group Statistics");
    println!("{}", statistics_table(&report));

    output::print_separator();
    output::print_done(&format!(
        "Classified {} structures in {} layer groups, {} selected",
        summary.records, summary.groups, summary.selected
    ));
    if config.copy_files {
        output::print_info(&format!(
            "Copied {} structure file(s) and {} CIF file(s), {} CIF file(s) missing",
            summary.copied_structures, summary.copied_cifs, summary.missing_cifs
        ));
    }

    Ok(())
}

/// 完整流程：收集 → 分类 → 复制 → 写工作簿 → 绘图
pub fn run(config: &ClassifyConfig) -> Result<(Report, ClassifySummary)> {
    let groups = GroupCollector::new(config.source_root.clone())
        .with_pattern(&config.pattern)?
        .with_range(config.scheme.layer_groups())
        .collect()?;

    let total_files: usize = groups.iter().map(|g| g.files.len()).sum();
    output::print_info(&format!(
        "Found {} structure file(s) in {} layer group folder(s)",
        total_files,
        groups.len()
    ));

    let report = build_report(&groups, config.scheme, total_files)?;

    let mut summary = ClassifySummary {
        groups: groups.len(),
        records: report.len(),
        selected: report.selected_rows().count(),
        ..Default::default()
    };

    if config.copy_files && !report.is_empty() {
        prepare_filtered_dirs(config, &groups)?;
        for row in report.selected_rows() {
            copy_selected(config, row, &mut summary)?;
        }
    }

    // 无结构时仍写出空工作簿，覆盖上一次的结果
    fs::create_dir_all(&config.output_root).map_err(|e| LayerkitError::FileWriteError {
        path: config.output_root.display().to_string(),
        source: e,
    })?;
    write_workbook(&report, &config.workbook)?;
    output::print_success(&format!("Results saved to '{}'", config.workbook.display()));

    if let Some((ref path, width, height)) = config.plot {
        generate_classification_plot(&report, path, width, height)?;
        output::print_success(&format!("Classification plot saved to '{}'", path.display()));
    }

    Ok((report, summary))
}

/// 逐个读取结构并分类，任一文件失败即中止
fn build_report(groups: &[LayerGroupDir], scheme: Scheme, total_files: usize) -> Result<Report> {
    let pb = progress::create_progress_bar(total_files as u64, "Reading lattices");
    let mut report = Report::new(scheme);

    for group in groups {
        for file in &group.files {
            match read_structure(file, group.lgnum) {
                Ok(record) => {
                    report.push(record);
                }
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
    report.sort();
    Ok(report)
}

/// 为每个处理过的层群建立筛选目录
fn prepare_filtered_dirs(config: &ClassifyConfig, groups: &[LayerGroupDir]) -> Result<()> {
    for group in groups {
        let dir = config.filtered_dir(group.lgnum);
        if config.clean && dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| LayerkitError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        fs::create_dir_all(&dir).map_err(|e| LayerkitError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// 复制入桶结构：.vasp 必须存在，.cif 缺失时跳过
fn copy_selected(config: &ClassifyConfig, row: &ReportRow, summary: &mut ClassifySummary) -> Result<()> {
    let record = &row.record;
    let dest_dir = config.filtered_dir(record.lgnum);

    let file_name = record
        .source
        .file_name()
        .ok_or_else(|| LayerkitError::FileNotFound {
            path: record.source.display().to_string(),
        })?;
    copy_file(&record.source, &dest_dir.join(file_name))?;
    summary.copied_structures += 1;

    let source_dir = record.source.parent().unwrap_or_else(|| Path::new("."));
    let cif_name = format!("{}.cif", record.formula);
    let cif = source_dir.join(&cif_name);
    if cif.is_file() {
        copy_file(&cif, &dest_dir.join(&cif_name))?;
        summary.copied_cifs += 1;
    } else {
        summary.missing_cifs += 1;
        output::print_skip(&format!("{} not found, skipping", cif.display()));
    }

    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(LayerkitError::FileNotFound {
            path: from.display().to_string(),
        });
    }
    fs::copy(from, to).map_err(|e| LayerkitError::FileWriteError {
        path: to.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 终端统计表（只列出有结构的层群）
fn statistics_table(report: &Report) -> String {
    let buckets = report.scheme().buckets();

    let mut builder = Builder::default();
    let mut header = vec!["lgnum".to_string(), "Total".to_string()];
    header.extend(buckets.iter().map(|b| b.to_string()));
    builder.push_record(header);

    for stats in report.statistics().iter().filter(|s| s.total > 0) {
        let mut record = vec![stats.lgnum.to_string(), stats.total.to_string()];
        record.extend(stats.bucket_counts.iter().map(|c| c.to_string()));
        builder.push_record(record);
    }

    builder.build().to_string()
}
