//! # 分类报告汇总
//!
//! 收集所有结构的几何与分类结果，按层群升序排列，
//! 按当前方案分桶并统计每个层群的数量。
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs`、`lattice2d/workbook.rs`、`lattice2d/plot.rs` 使用
//! - 使用 `lattice2d/geometry.rs`、`lattice2d/scheme.rs`

use super::geometry::InPlaneGeometry;
use super::scheme::{Bucket, Classification, Scheme};

use std::collections::BTreeMap;
use std::path::PathBuf;

/// 一个待分类的结构
#[derive(Debug, Clone)]
pub struct StructureRecord {
    /// 化学式（文件名第一个 '.' 之前的部分）
    pub formula: String,
    /// 层群编号
    pub lgnum: u32,
    /// 源 POSCAR 文件
    pub source: PathBuf,
    /// 面内几何
    pub geometry: InPlaneGeometry,
}

/// 报告中的一行
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub record: StructureRecord,
    pub classification: Classification,
}

impl ReportRow {
    pub fn in_bucket(&self, bucket: Bucket) -> bool {
        self.classification.buckets.contains(&bucket)
    }
}

/// 单个层群的统计行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub lgnum: u32,
    pub total: usize,
    /// 与 `Scheme::buckets()` 顺序一致
    pub bucket_counts: Vec<usize>,
}

/// 分类报告
#[derive(Debug, Clone)]
pub struct Report {
    scheme: Scheme,
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(scheme: Scheme) -> Self {
        Report {
            scheme,
            rows: Vec::new(),
        }
    }

    /// 对结构分类并追加到报告
    pub fn push(&mut self, record: StructureRecord) -> &ReportRow {
        let classification = self.scheme.classify(&record.geometry, record.lgnum);
        self.rows.push(ReportRow {
            record,
            classification,
        });
        &self.rows[self.rows.len() - 1]
    }

    /// 按层群升序排列（稳定排序，组内保持读取顺序）
    pub fn sort(&mut self) {
        self.rows.sort_by_key(|row| row.record.lgnum);
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 某个分桶中的所有行
    pub fn bucket_rows(&self, bucket: Bucket) -> Vec<&ReportRow> {
        self.rows.iter().filter(|row| row.in_bucket(bucket)).collect()
    }

    /// 至少进入一个分桶的行
    pub fn selected_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.classification.is_selected())
    }

    /// 方案层群范围内每个层群的统计（无结构的层群计数为 0）
    pub fn statistics(&self) -> Vec<GroupStats> {
        let buckets = self.scheme.buckets();
        let mut by_group: BTreeMap<u32, GroupStats> = self
            .scheme
            .layer_groups()
            .map(|lgnum| {
                (
                    lgnum,
                    GroupStats {
                        lgnum,
                        total: 0,
                        bucket_counts: vec![0; buckets.len()],
                    },
                )
            })
            .collect();

        for row in &self.rows {
            let stats = by_group.entry(row.record.lgnum).or_insert_with(|| GroupStats {
                lgnum: row.record.lgnum,
                total: 0,
                bucket_counts: vec![0; buckets.len()],
            });
            stats.total += 1;
            for (i, bucket) in buckets.iter().enumerate() {
                if row.in_bucket(*bucket) {
                    stats.bucket_counts[i] += 1;
                }
            }
        }

        by_group.into_values().collect()
    }
}
