//! # 2D 材料数据库导出表解析
//!
//! 读取数据库 `systems` 表导出的 CSV，每行一个结构。
//!
//! ## CSV 列
//! ```text
//! uid,formula,folder,lgnum,cell,symbols,positions
//! MoS2-b3b4685fb6e1,MoS2,/c2db/tree/A/1MoS2/MoS2/,78,"3.19 0 0 -1.595 2.763 0 0 0 18.1","Mo S S","0 0 9.05 ..."
//! ```
//! - `cell`: 9 个浮点数（a, b, c 三行）
//! - `positions`: 笛卡尔坐标，3 × 原子数
//! - 文件名取 `folder` 按 `/` 切分后的倒数第二段，取不到时用 `formula`
//!
//! ## 依赖关系
//! - 被 `commands/extract.rs` 使用
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{LayerkitError, Result};
use crate::models::{Atom, Crystal, Lattice};

use serde::Deserialize;
use std::path::Path;

/// 数据库导出表中的一行
#[derive(Debug, Clone, Deserialize)]
pub struct C2dbRow {
    pub uid: String,
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub folder: String,
    pub lgnum: u32,
    pub cell: String,
    pub symbols: String,
    pub positions: String,
}

impl C2dbRow {
    /// 文件名使用的化学式
    ///
    /// 优先取 `folder` 按 '/' 切分后的倒数第二段（数据库中每个材料唯一），
    /// 取不到时才用 `formula` 列。
    pub fn formula_name(&self) -> Result<String> {
        let parts: Vec<&str> = self.folder.split('/').collect();
        if parts.len() >= 2 && !parts[parts.len() - 2].is_empty() {
            return Ok(parts[parts.len() - 2].to_string());
        }

        let formula = self.formula.trim();
        if !formula.is_empty() {
            return Ok(formula.to_string());
        }

        Err(self.invalid(format!(
            "no formula and cannot derive one from folder '{}'",
            self.folder
        )))
    }

    /// 构建晶体结构（分数坐标）
    pub fn to_crystal(&self) -> Result<Crystal> {
        let cell = self.floats("cell", &self.cell)?;
        if cell.len() != 9 {
            return Err(self.invalid(format!("cell has {} values, expected 9", cell.len())));
        }
        let lattice = Lattice::from_vectors([
            [cell[0], cell[1], cell[2]],
            [cell[3], cell[4], cell[5]],
            [cell[6], cell[7], cell[8]],
        ]);

        let symbols: Vec<&str> = self.symbols.split_whitespace().collect();
        let positions = self.floats("positions", &self.positions)?;
        if positions.len() != symbols.len() * 3 {
            return Err(self.invalid(format!(
                "{} symbol(s) but {} position value(s)",
                symbols.len(),
                positions.len()
            )));
        }

        let atoms = symbols
            .iter()
            .zip(positions.chunks(3))
            .map(|(symbol, xyz)| {
                lattice
                    .to_fractional([xyz[0], xyz[1], xyz[2]])
                    .map(|frac| Atom::new(*symbol, frac))
                    .ok_or_else(|| self.invalid("singular cell".to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Crystal::new(self.uid.clone(), lattice, atoms))
    }

    fn floats(&self, column: &str, text: &str) -> Result<Vec<f64>> {
        text.split_whitespace()
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| self.invalid(format!("non-numeric value '{}' in {}", s, column)))
            })
            .collect()
    }

    fn invalid(&self, reason: String) -> LayerkitError {
        LayerkitError::InvalidRecord {
            uid: self.uid.clone(),
            reason,
        }
    }
}

/// 读取整张导出表
pub fn read_c2db_export(path: &Path) -> Result<Vec<C2dbRow>> {
    if !path.is_file() {
        return Err(LayerkitError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<C2dbRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> C2dbRow {
        C2dbRow {
            uid: "MoS2-b3b4685fb6e1".to_string(),
            formula: String::new(),
            folder: "/home/niflheim2/cmr/C2DB-ASR/tree/A/1MoS2/MoS2/".to_string(),
            lgnum: 78,
            cell: "3.0 0 0  0 3.0 0  0 0 20.0".to_string(),
            symbols: "Mo S S".to_string(),
            positions: "0 0 10  1.5 1.5 11.5  1.5 1.5 8.5".to_string(),
        }
    }

    #[test]
    fn test_formula_from_folder() {
        assert_eq!(row().formula_name().unwrap(), "MoS2");

        let mut bare = row();
        bare.folder = "tree/A/1MoS2/MoS2".to_string();
        assert_eq!(bare.formula_name().unwrap(), "1MoS2");

        // folder 优先于 formula 列
        let mut named = row();
        named.formula = "MoS2-2H".to_string();
        assert_eq!(named.formula_name().unwrap(), "MoS2");

        named.folder = String::new();
        assert_eq!(named.formula_name().unwrap(), "MoS2-2H");
    }

    #[test]
    fn test_formula_missing_everywhere() {
        let mut r = row();
        r.folder = "flat".to_string();
        assert!(r.formula_name().is_err());
    }

    #[test]
    fn test_to_crystal_fractional_positions() {
        let crystal = row().to_crystal().unwrap();
        assert_eq!(crystal.name, "MoS2-b3b4685fb6e1");
        assert_eq!(crystal.atoms.len(), 3);
        let s = &crystal.atoms[1];
        assert_eq!(s.element, "S");
        assert!((s.position[0] - 0.5).abs() < 1e-12);
        assert!((s.position[2] - 0.575).abs() < 1e-12);
    }

    #[test]
    fn test_position_count_mismatch() {
        let mut r = row();
        r.symbols = "Mo S".to_string();
        match r.to_crystal().unwrap_err() {
            LayerkitError::InvalidRecord { uid, reason } => {
                assert_eq!(uid, "MoS2-b3b4685fb6e1");
                assert!(reason.contains("2 symbol(s)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_cell() {
        let mut r = row();
        r.cell = "3.0 0 0 0 3.0 0 0 0".to_string();
        assert!(r.to_crystal().is_err());

        r.cell = "3.0 0 0 0 x 0 0 0 20".to_string();
        assert!(r.to_crystal().is_err());
    }
}
