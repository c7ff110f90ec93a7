//! # extract 命令实现
//!
//! 将数据库导出表按层群拆分，写出 POSCAR / CIF。
//!
//! ## 功能
//! - 读取 CSV 导出表，按层群范围过滤
//! - 每个层群一个 `lgnum_<N>/` 目录，附 `sorted_by_condition.csv` 索引
//! - 每条记录写出 `<formula>.vasp` 与 `<formula>.cif`，组内重名视为错误
//!
//! ## 依赖关系
//! - 使用 `cli/extract.rs` 定义的参数
//! - 使用 `parsers/c2db.rs`, `parsers/poscar.rs`, `parsers/cif.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::GROUP_DIR_PREFIX;
use crate::cli::extract::ExtractArgs;
use crate::cli::parse_lgnum_range;
use crate::error::{LayerkitError, Result};
use crate::parsers::c2db::{read_c2db_export, C2dbRow};
use crate::parsers::cif::to_cif_string;
use crate::parsers::poscar::to_poscar_string;
use crate::utils::{output, progress};

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// 每个层群目录下的索引文件
pub const INDEX_FILE: &str = "sorted_by_condition.csv";

/// 索引文件中的一行
#[derive(Debug, Serialize)]
struct IndexRow<'a> {
    uid: &'a str,
    formula: &'a str,
    folder: &'a str,
    lgnum: u32,
}

/// 导出计数
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub groups: usize,
    pub structures: usize,
    pub cifs: usize,
}

/// 执行 extract 命令
pub fn execute(args: ExtractArgs) -> Result<()> {
    let range = parse_lgnum_range(&args.lgnum).map_err(LayerkitError::InvalidRange)?;

    output::print_header(&format!(
        "Extracting layer groups {}-{} from {}",
        range.start(),
        range.end(),
        args.input.display()
    ));

    let summary = run(&args.input, &args.output, range, !args.no_cif)?;

    if summary.structures == 0 {
        output::print_warning("No records fell inside the requested layer group range");
        return Ok(());
    }

    output::print_separator();
    output::print_done(&format!(
        "Wrote {} structure(s) and {} CIF file(s) into {} layer group folder(s) under {}",
        summary.structures,
        summary.cifs,
        summary.groups,
        args.output.display()
    ));

    Ok(())
}

/// 读取导出表并写出各层群目录
pub fn run(input: &Path, output_root: &Path, range: RangeInclusive<u32>, write_cif: bool) -> Result<ExtractSummary> {
    let rows = read_c2db_export(input)?;
    output::print_info(&format!("Read {} record(s)", rows.len()));

    // 组内保持导出表中的顺序
    let mut groups: BTreeMap<u32, Vec<&C2dbRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| range.contains(&r.lgnum)) {
        groups.entry(row.lgnum).or_default().push(row);
    }

    let total: usize = groups.values().map(|g| g.len()).sum();
    let pb = progress::create_progress_bar(total as u64, "Writing structures");
    let mut summary = ExtractSummary::default();

    for (lgnum, members) in &groups {
        let dir = output_root.join(format!("{}{}", GROUP_DIR_PREFIX, lgnum));
        create_dir(&dir)?;

        let names = unique_names(members)?;
        write_index(&dir.join(INDEX_FILE), members, &names)?;

        for (row, formula) in members.iter().zip(&names) {
            let crystal = match row.to_crystal() {
                Ok(c) => c,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };

            write_text(&dir.join(format!("{}.vasp", formula)), &to_poscar_string(&crystal))?;
            summary.structures += 1;

            if write_cif {
                write_text(&dir.join(format!("{}.cif", formula)), &to_cif_string(&crystal, formula))?;
                summary.cifs += 1;
            }
            pb.inc(1);
        }
        summary.groups += 1;
    }

    pb.finish_and_clear();
    Ok(summary)
}

/// 组内文件名必须唯一，否则后写的结构会覆盖先写的
fn unique_names(rows: &[&C2dbRow]) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut names = Vec::with_capacity(rows.len());

    for row in rows {
        let name = row.formula_name()?;
        if let Some(first) = seen.insert(name.clone(), &row.uid) {
            return Err(LayerkitError::InvalidRecord {
                uid: row.uid.clone(),
                reason: format!(
                    "file name '{}' in layer group {} already used by '{}'",
                    name, row.lgnum, first
                ),
            });
        }
        names.push(name);
    }

    Ok(names)
}

fn write_index(path: &Path, rows: &[&C2dbRow], names: &[String]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (row, formula) in rows.iter().zip(names) {
        writer.serialize(IndexRow {
            uid: &row.uid,
            formula,
            folder: &row.folder,
            lgnum: row.lgnum,
        })?;
    }
    writer.flush().map_err(|e| LayerkitError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| LayerkitError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| LayerkitError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::poscar::read_poscar_lattice;
    use std::path::PathBuf;

    const HEADER: &str = "uid,formula,folder,lgnum,cell,symbols,positions\n";

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("layerkit-extract-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_export(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("systems.csv");
        fs::write(&path, format!("{}{}", HEADER, body)).unwrap();
        path
    }

    #[test]
    fn test_groups_and_files() {
        let dir = scratch("groups");
        let input = write_export(
            &dir,
            "a-1,MoS2,/tree/A/MoS2/,13,3.2 0 0 0 3.2 0 0 0 20,Mo S S,0 0 10 1.6 1.6 11.5 1.6 1.6 8.5\n\
             b-2,,/tree/B/WSe2/1H/,13,3.3 0 0 0 3.3 0 0 0 20,W Se,0 0 10 1.65 1.65 11.6\n\
             c-3,C,/tree/C/C/,80,2.46 0 0 -1.23 2.13 0 0 0 20,C C,0 0 10 1.23 0.71 10\n\
             d-4,BN,/tree/BN/,9,2.5 0 0 0 4.3 0 0 0 20,B N,0 0 10 1.25 2.15 10\n",
        );
        let out = dir.join("out");

        let summary = run(&input, &out, 8..=48, true).unwrap();
        assert_eq!(summary, ExtractSummary { groups: 2, structures: 3, cifs: 3 });

        assert!(out.join("lgnum_13/MoS2.vasp").is_file());
        assert!(out.join("lgnum_13/MoS2.cif").is_file());
        // 空 formula 取 folder 的倒数第二段
        assert!(out.join("lgnum_13/1H.vasp").is_file());
        assert!(out.join("lgnum_9/BN.vasp").is_file());
        assert!(!out.join("lgnum_80").exists());

        let index = fs::read_to_string(out.join("lgnum_13").join(INDEX_FILE)).unwrap();
        let lines: Vec<&str> = index.lines().collect();
        assert_eq!(lines[0], "uid,formula,folder,lgnum");
        assert!(lines[1].starts_with("a-1,MoS2,"));
        assert!(lines[2].starts_with("b-2,1H,"));
        assert_eq!(lines.len(), 3);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_written_poscar_reads_back() {
        let dir = scratch("roundtrip");
        let input = write_export(
            &dir,
            "x-1,MoS2,,10,3.19 0 0 -1.595 2.7626 0 0 0 18.1,Mo S S,0 0 9.05 1.595 0.921 10.6 1.595 0.921 7.5\n",
        );
        let out = dir.join("out");
        run(&input, &out, 8..=48, false).unwrap();

        let poscar = out.join("lgnum_10/MoS2.vasp");
        let lattice = read_poscar_lattice(&poscar).unwrap();
        assert!((lattice.matrix[0][0] - 3.19).abs() < 1e-9);
        assert!((lattice.matrix[1][1] - 2.7626).abs() < 1e-9);
        assert!((lattice.matrix[2][2] - 18.1).abs() < 1e-9);
        assert!(!out.join("lgnum_10/MoS2.cif").exists());

        let text = fs::read_to_string(&poscar).unwrap();
        assert_eq!(text.lines().next(), Some("x-1"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_record_is_fatal() {
        let dir = scratch("bad");
        let input = write_export(&dir, "bad-1,X,,12,1 0 0 0 1 0,X,0 0 0\n");

        match run(&input, &dir.join("out"), 8..=48, true).unwrap_err() {
            LayerkitError::InvalidRecord { uid, .. } => assert_eq!(uid, "bad-1"),
            other => panic!("unexpected error: {other}"),
        }

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_same_formula_named_by_folder() {
        let dir = scratch("samefolder");
        let input = write_export(
            &dir,
            "MoS2-aaa,MoS2,/tree/A/MoS2-2H/,13,3.2 0 0 0 3.2 0 0 0 20,Mo S S,0 0 10 1.6 1.6 11.5 1.6 1.6 8.5\n\
             MoS2-bbb,MoS2,/tree/A/MoS2-1T/,13,3.2 0 0 0 3.2 0 0 0 20,Mo S S,0 0 10 1.6 1.6 11.5 1.6 1.6 8.5\n",
        );
        let out = dir.join("out");

        let summary = run(&input, &out, 8..=48, true).unwrap();
        assert_eq!(summary.structures, 2);

        let first = fs::read_to_string(out.join("lgnum_13/MoS2-2H.vasp")).unwrap();
        let second = fs::read_to_string(out.join("lgnum_13/MoS2-1T.vasp")).unwrap();
        assert_eq!(first.lines().next(), Some("MoS2-aaa"));
        assert_eq!(second.lines().next(), Some("MoS2-bbb"));
        assert!(!out.join("lgnum_13/MoS2.vasp").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_duplicate_file_name_is_fatal() {
        let dir = scratch("duplicate");
        let input = write_export(
            &dir,
            "MoS2-aaa,MoS2,,13,3.2 0 0 0 3.2 0 0 0 20,Mo,0 0 10\n\
             MoS2-bbb,MoS2,,13,3.2 0 0 0 3.2 0 0 0 20,Mo,0 0 10\n",
        );
        let out = dir.join("out");

        match run(&input, &out, 8..=48, true).unwrap_err() {
            LayerkitError::InvalidRecord { uid, reason } => {
                assert_eq!(uid, "MoS2-bbb");
                assert!(reason.contains("MoS2-aaa"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.join("lgnum_13/MoS2.vasp").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_input() {
        let err = run(Path::new("/nonexistent/systems.csv"), Path::new("."), 8..=48, true).unwrap_err();
        assert!(matches!(err, LayerkitError::FileNotFound { .. }));
    }
}
