//! # 层群目录收集器
//!
//! 扫描根目录下的 `lgnum_<N>` 子目录，收集每个层群中的结构文件。
//!
//! ## 功能
//! - 正则匹配 `lgnum_<N>` 目录名，按层群范围过滤
//! - glob 模式匹配结构文件（默认 `*.vasp`）
//! - 目录与文件均按名称排序，保证结果与文件系统顺序无关
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs` 调用
//! - 使用 `walkdir` 遍历目录，`regex` / `glob` 匹配名称

use crate::error::{LayerkitError, Result};
use crate::lattice2d::{in_plane_geometry, StructureRecord};
use crate::parsers::poscar::read_poscar_lattice;

use regex::Regex;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 层群目录名前缀
pub const GROUP_DIR_PREFIX: &str = "lgnum_";

/// 一个层群目录及其结构文件
#[derive(Debug, Clone)]
pub struct LayerGroupDir {
    pub lgnum: u32,
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

/// 层群目录收集器
pub struct GroupCollector {
    /// 根目录
    root: PathBuf,
    /// 文件匹配模式
    pattern: glob::Pattern,
    /// 层群范围
    range: RangeInclusive<u32>,
}

impl GroupCollector {
    /// 创建新的收集器（默认匹配 `*.vasp`，不限层群）
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            pattern: glob::Pattern::new("*.vasp").expect("static pattern"),
            range: 0..=u32::MAX,
        }
    }

    /// 设置结构文件 glob 模式
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = glob::Pattern::new(pattern).map_err(|e| {
            LayerkitError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(self)
    }

    /// 只收集指定范围内的层群
    pub fn with_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.range = range;
        self
    }

    /// 收集所有层群目录，按层群编号升序
    pub fn collect(&self) -> Result<Vec<LayerGroupDir>> {
        if !self.root.is_dir() {
            return Err(LayerkitError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let name_re = Regex::new(r"^lgnum_(\d+)$").expect("static regex");

        let mut groups: Vec<LayerGroupDir> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                let lgnum: u32 = name_re.captures(name)?.get(1)?.as_str().parse().ok()?;
                self.range.contains(&lgnum).then(|| (lgnum, entry.path().to_path_buf()))
            })
            .map(|(lgnum, path)| {
                let files = self.collect_files(&path);
                LayerGroupDir { lgnum, path, files }
            })
            .collect();

        groups.sort_by(|a, b| a.lgnum.cmp(&b.lgnum).then_with(|| a.path.cmp(&b.path)));
        Ok(groups)
    }

    /// 收集目录下（不递归）匹配的文件
    fn collect_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| self.pattern.matches(name))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }
}

/// 化学式：文件名第一个 '.' 之前的部分
pub fn formula_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("unknown")
        .to_string()
}

/// 读取单个结构文件并计算面内几何
pub fn read_structure(path: &Path, lgnum: u32) -> Result<StructureRecord> {
    let lattice = read_poscar_lattice(path)?;
    let geometry = in_plane_geometry(&lattice.matrix).map_err(|e| e.at_path(path))?;

    Ok(StructureRecord {
        formula: formula_from_path(path),
        lgnum,
        source: path.to_path_buf(),
        geometry,
    })
}
