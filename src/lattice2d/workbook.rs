//! # 工作簿导出
//!
//! 使用 `rust_xlsxwriter` 写出分类报告：
//! - `Sheet1`: 全部结构
//! - 每个分桶一个 sheet
//! - `lgnum Statistics`: 各层群计数
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs` 调用
//! - 使用 `lattice2d/report.rs` 的 Report 结构

use super::report::{Report, ReportRow};
use crate::error::Result;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// 所有 sheet 的统一列宽
pub const COLUMN_WIDTH: f64 = 17.0;

/// 全部结构所在 sheet
pub const ALL_RECORDS_SHEET: &str = "Sheet1";

/// 统计 sheet
pub const STATISTICS_SHEET: &str = "lgnum Statistics";

const RECORD_HEADERS: [&str; 9] = [
    "Chemical Formula",
    "Length1",
    "Length2",
    "Angle (degrees)",
    "lgnum",
    "Label",
    "Equal Lengths",
    "Near 90",
    "Near 120",
];

/// 写出完整工作簿
pub fn write_workbook(report: &Report, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let all: Vec<&ReportRow> = report.rows().iter().collect();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(ALL_RECORDS_SHEET)?;
    write_records(worksheet, &all, &header)?;

    for bucket in report.scheme().buckets() {
        let rows = report.bucket_rows(*bucket);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(bucket.sheet_name())?;
        write_records(worksheet, &rows, &header)?;
    }

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(STATISTICS_SHEET)?;
    write_statistics(worksheet, report, &header)?;

    workbook.save(output_path)?;
    Ok(())
}

fn write_records(worksheet: &mut Worksheet, rows: &[&ReportRow], header: &Format) -> Result<()> {
    for (col, title) in RECORD_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
        worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let geometry = &row.record.geometry;
        let predicates = &row.classification.predicates;

        worksheet.write_string(r, 0, row.record.formula.as_str())?;
        worksheet.write_number(r, 1, geometry.length1)?;
        worksheet.write_number(r, 2, geometry.length2)?;
        worksheet.write_number(r, 3, geometry.angle_degrees)?;
        worksheet.write_number(r, 4, row.record.lgnum)?;
        worksheet.write_string(r, 5, row.classification.label.to_string())?;
        worksheet.write_boolean(r, 6, predicates.lengths_equal)?;
        worksheet.write_boolean(r, 7, predicates.near_right_angle)?;
        worksheet.write_boolean(r, 8, predicates.near_hexagonal_angle)?;
    }

    Ok(())
}

fn write_statistics(worksheet: &mut Worksheet, report: &Report, header: &Format) -> Result<()> {
    let buckets = report.scheme().buckets();

    let mut titles = vec!["lgnum", "Total"];
    titles.extend(buckets.iter().map(|b| b.sheet_name()));

    for (col, title) in titles.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
        worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    for (i, stats) in report.statistics().iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_number(r, 0, stats.lgnum)?;
        worksheet.write_number(r, 1, stats.total as u32)?;
        for (j, count) in stats.bucket_counts.iter().enumerate() {
            worksheet.write_number(r, (j + 2) as u16, *count as u32)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice2d::geometry::InPlaneGeometry;
    use crate::lattice2d::report::StructureRecord;
    use crate::lattice2d::scheme::Scheme;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_workbook_written() {
        let mut report = Report::new(Scheme::Bravais);
        report.push(StructureRecord {
            formula: "BN".to_string(),
            lgnum: 2,
            source: PathBuf::from("lgnum_2/BN.vasp"),
            geometry: InPlaneGeometry {
                vacuum_axis: 2,
                length1: 2.51,
                length2: 2.51,
                angle_degrees: 120.0,
            },
        });

        let dir = std::env::temp_dir().join(format!("layerkit-wb-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vasp_results.xlsx");

        write_workbook(&report, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        // xlsx 是 zip 容器
        assert_eq!(&bytes[..2], b"PK");

        fs::remove_dir_all(&dir).ok();
    }
}
