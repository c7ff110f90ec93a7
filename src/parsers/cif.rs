//! # CIF 格式写出
//!
//! 以 P1 对称性写出晶胞参数和分数坐标。
//!
//! ## 依赖关系
//! - 被 `commands/extract.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Crystal;

/// 转换为 CIF 格式
pub fn to_cif_string(crystal: &Crystal, formula: &str) -> String {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();

    let mut result = String::new();
    result.push_str(&format!("data_{}\n", formula.replace(' ', "_")));
    result.push_str(&format!("_chemical_formula_sum    '{}'\n", chemical_formula_sum(crystal)));
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n\n");

    result.push_str(&format!("_cell_length_a    {:.6}\n", a));
    result.push_str(&format!("_cell_length_b    {:.6}\n", b));
    result.push_str(&format!("_cell_length_c    {:.6}\n", c));
    result.push_str(&format!("_cell_angle_alpha {:.4}\n", alpha));
    result.push_str(&format!("_cell_angle_beta  {:.4}\n", beta));
    result.push_str(&format!("_cell_angle_gamma {:.4}\n\n", gamma));

    result.push_str("loop_\n");
    result.push_str("_symmetry_equiv_pos_as_xyz\n");
    result.push_str("  'x, y, z'\n\n");

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    // 标签按元素分别计数：Mo1, S1, S2 ...
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for atom in &crystal.atoms {
        let index = match seen.iter_mut().find(|(el, _)| *el == atom.element) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                seen.push((atom.element.as_str(), 1));
                1
            }
        };
        result.push_str(&format!(
            "  {}{} {} {:.10} {:.10} {:.10} 1.0\n",
            atom.element, index, atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    result
}

/// Hill 表示之外的简单求和式，元素按首次出现顺序
fn chemical_formula_sum(crystal: &Crystal) -> String {
    crystal
        .species_counts()
        .into_iter()
        .map(|(el, n)| if n == 1 { el } else { format!("{} {}", el, n) })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn mos2() -> Crystal {
        let lattice = Lattice::from_parameters(3.19, 3.19, 18.0, 90.0, 90.0, 120.0);
        Crystal::new(
            "c2db-1",
            lattice,
            vec![
                Atom::new("Mo", [0.0, 0.0, 0.5]),
                Atom::new("S", [1.0 / 3.0, 2.0 / 3.0, 0.58]),
                Atom::new("S", [1.0 / 3.0, 2.0 / 3.0, 0.42]),
            ],
        )
    }

    #[test]
    fn test_cif_cell_block() {
        let cif = to_cif_string(&mos2(), "MoS2");
        assert!(cif.starts_with("data_MoS2\n"));
        assert!(cif.contains("_cell_length_a    3.190000"));
        assert!(cif.contains("_cell_length_c    18.000000"));
        assert!(cif.contains("_cell_angle_gamma 120.0000"));
        assert!(cif.contains("_chemical_formula_sum    'Mo S 2'"));
    }

    #[test]
    fn test_cif_atom_labels() {
        let cif = to_cif_string(&mos2(), "MoS2");
        let atom_lines: Vec<&str> = cif
            .lines()
            .filter(|l| l.trim_end().ends_with(" 1.0"))
            .collect();

        assert_eq!(atom_lines.len(), 3);
        assert!(atom_lines[0].trim_start().starts_with("Mo1 Mo"));
        assert!(atom_lines[1].trim_start().starts_with("S1 S"));
        assert!(atom_lines[2].trim_start().starts_with("S2 S"));
    }
}
