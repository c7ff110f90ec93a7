//! # VASP POSCAR 格式读写
//!
//! 晶格分析只需要 POSCAR 头部（缩放因子 + 三行晶格向量），
//! 导出时按数据库脚本的固定列宽写出完整 POSCAR。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (uid)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Cartesian              # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`、`commands/extract.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{LayerkitError, Result};
use crate::models::{Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 读取 POSCAR 文件的晶格（已乘缩放因子）
pub fn read_poscar_lattice(path: &Path) -> Result<Lattice> {
    if !path.is_file() {
        return Err(LayerkitError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| LayerkitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_lattice(&content, &path.display().to_string())
}

/// 从字符串内容解析 POSCAR 头部晶格
///
/// 晶格行中任何非数字字段都视为错误，不做静默跳过。
pub fn parse_poscar_lattice(content: &str, source: &str) -> Result<Lattice> {
    let lines: Vec<&str> = content.lines().collect();

    let malformed = |reason: String| LayerkitError::MalformedLattice {
        path: source.to_string(),
        reason,
    };

    if lines.len() < 5 {
        return Err(malformed(format!(
            "expected 3 lattice vectors on lines 3-5, file has {} line(s)",
            lines.len()
        )));
    }

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| malformed(format!("invalid scaling factor '{}'", lines[1].trim())))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let line = lines[2 + i];
        let parts = line
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|_| malformed(format!("non-numeric field at line {}: '{}'", 3 + i, line.trim())))?;

        if parts.len() != 3 {
            return Err(malformed(format!(
                "lattice vector at line {} has {} component(s)",
                3 + i,
                parts.len()
            )));
        }
        *row = [parts[0], parts[1], parts[2]];
    }

    // 负缩放因子表示目标体积
    let factor = if scale < 0.0 {
        let volume = determinant(&matrix).abs();
        if volume < 1e-12 {
            return Err(malformed("zero cell volume with volume scaling".to_string()));
        }
        (scale.abs() / volume).cbrt()
    } else {
        scale
    };

    for row in matrix.iter_mut() {
        for x in row.iter_mut() {
            *x *= factor;
        }
    }

    Ok(Lattice::from_vectors(matrix))
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// 将 Crystal 转换为 POSCAR 字符串（笛卡尔坐标，%21.10f 列宽）
pub fn to_poscar_string(crystal: &Crystal) -> String {
    let mut result = String::new();

    result.push_str(&format!("{}\n", crystal.name));
    result.push_str("1.0\n");

    for row in &crystal.lattice.matrix {
        result.push_str(&float_line(row));
    }

    let species = crystal.species_counts();
    for (element, _) in &species {
        result.push_str(&format!("{}    ", element));
    }
    result.push('\n');
    for (_, count) in &species {
        result.push_str(&format!("{}    ", count));
    }
    result.push('\n');

    result.push_str("Cartesian\n");

    // 与元素行对应：同种元素的原子连续写出
    for (element, _) in &species {
        for atom in crystal.atoms.iter().filter(|a| &a.element == element) {
            result.push_str(&float_line(&crystal.lattice.to_cartesian(atom.position)));
        }
    }

    result
}

fn float_line(values: &[f64; 3]) -> String {
    format!("{:21.10}{:21.10}{:21.10}\n", values[0], values[1], values[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    #[test]
    fn test_parse_lattice_header() {
        let content = r#"c2db-1234
1.0
3.19 0.0 0.0
-1.595 2.7626 0.0
0.0 0.0 18.12
Mo S
1 2
Cartesian
0.0 0.0 9.06
"#;
        let lattice = parse_poscar_lattice(content, "MoS2.vasp").unwrap();
        assert_eq!(lattice.matrix[0], [3.19, 0.0, 0.0]);
        assert_eq!(lattice.matrix[2], [0.0, 0.0, 18.12]);
    }

    #[test]
    fn test_scaling_factor_applied() {
        let content = "Si\n2.0\n2.0 0.0 0.0\n0.0 2.0 0.0\n0.0 0.0 10.0\n";
        let lattice = parse_poscar_lattice(content, "Si.vasp").unwrap();
        assert_eq!(lattice.matrix[0][0], 4.0);
        assert_eq!(lattice.matrix[2][2], 20.0);
    }

    #[test]
    fn test_negative_scale_is_volume() {
        let content = "X\n-8.0\n1.0 0.0 0.0\n0.0 1.0 0.0\n0.0 0.0 1.0\n";
        let lattice = parse_poscar_lattice(content, "X.vasp").unwrap();
        assert!((lattice.matrix[0][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_lattice_lines() {
        let content = "X\n1.0\n1.0 0.0 0.0\n0.0 1.0 0.0\n";
        let err = parse_poscar_lattice(content, "X.vasp").unwrap_err();
        assert!(matches!(err, LayerkitError::MalformedLattice { .. }));
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let content = "X\n1.0\n1.0 0.0 0.0\n0.0 abc 0.0\n0.0 0.0 1.0\n";
        let err = parse_poscar_lattice(content, "X.vasp").unwrap_err();
        match err {
            LayerkitError::MalformedLattice { path, reason } => {
                assert_eq!(path, "X.vasp");
                assert!(reason.contains("line 4"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_vector_rejected() {
        let content = "X\n1.0\n1.0 0.0\n0.0 1.0 0.0\n0.0 0.0 1.0\n";
        assert!(parse_poscar_lattice(content, "X.vasp").is_err());
    }

    #[test]
    fn test_poscar_writer_layout() {
        let lattice = Lattice::from_vectors([[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 15.0]]);
        let atoms = vec![
            Atom::new("S", [0.5, 0.5, 0.55]),
            Atom::new("Mo", [0.0, 0.0, 0.5]),
            Atom::new("S", [0.5, 0.5, 0.45]),
        ];
        let crystal = Crystal::new("c2db-42", lattice.clone(), atoms);

        let text = to_poscar_string(&crystal);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "c2db-42");
        assert_eq!(lines[1], "1.0");
        assert_eq!(lines[2], "         3.0000000000         0.0000000000         0.0000000000");
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), vec!["S", "Mo"]);
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(lines[7], "Cartesian");
        // S 原子在前，且为笛卡尔坐标
        assert!(lines[8].trim_start().starts_with("1.5000000000"));
        assert_eq!(lines.len(), 11);

        let parsed = parse_poscar_lattice(&text, "c2db-42").unwrap();
        assert_eq!(parsed, lattice);
    }
}
