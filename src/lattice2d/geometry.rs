//! # 面内几何提取
//!
//! 二维材料的 slab 模型中，真空方向的晶格向量最长。
//! 取模长最大的向量为非周期方向，其余两个为面内向量，
//! 计算两者的长度和夹角。
//!
//! ## 依赖关系
//! - 被 `lattice2d/scheme.rs`、`batch/collector.rs` 使用
//! - 使用 `models/structure.rs` 的向量运算

use crate::error::{LayerkitError, Result};
use crate::models::structure::{dot, norm};

use serde::Serialize;

/// 面内几何：两个周期方向的长度及夹角
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InPlaneGeometry {
    /// 非周期（真空）方向的向量序号 0..3
    pub vacuum_axis: usize,
    /// 第一个面内向量长度
    pub length1: f64,
    /// 第二个面内向量长度
    pub length2: f64,
    /// 面内夹角（度），范围 [0, 180]
    pub angle_degrees: f64,
}

impl InPlaneGeometry {
    /// 面内长度差的绝对值
    pub fn length_difference(&self) -> f64 {
        (self.length1 - self.length2).abs()
    }
}

/// 从晶格向量计算面内几何
///
/// 模长相同时取序号最小者为真空方向。
pub fn in_plane_geometry(vectors: &[[f64; 3]]) -> Result<InPlaneGeometry> {
    if vectors.len() != 3 {
        return Err(LayerkitError::MalformedLattice {
            path: String::new(),
            reason: format!("expected 3 lattice vectors, got {}", vectors.len()),
        });
    }

    let lengths: Vec<f64> = vectors.iter().map(norm).collect();

    if let Some(i) = lengths.iter().position(|l| !l.is_finite() || *l == 0.0) {
        return Err(LayerkitError::DegenerateGeometry {
            path: String::new(),
            reason: format!("lattice vector {} has zero length", i + 1),
        });
    }

    let mut vacuum_axis = 0;
    for (i, length) in lengths.iter().enumerate().skip(1) {
        if *length > lengths[vacuum_axis] {
            vacuum_axis = i;
        }
    }

    let periodic: Vec<usize> = (0..3).filter(|i| *i != vacuum_axis).collect();
    let (i, j) = (periodic[0], periodic[1]);

    let cos_angle = dot(&vectors[i], &vectors[j]) / (lengths[i] * lengths[j]);
    let angle_degrees = cos_angle.clamp(-1.0, 1.0).acos().to_degrees();

    Ok(InPlaneGeometry {
        vacuum_axis,
        length1: lengths[i],
        length2: lengths[j],
        angle_degrees,
    })
}
