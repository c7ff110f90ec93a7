//! # 二维布拉维格子分类
//!
//! 按面内长度差与夹角阈值对结构分类。两种分类方案并存，
//! 分别对应不同的层群编号范围，由配置选择，不混用：
//!
//! - `Bravais`（层群 1–7）：按几何分为正方、六角、简单矩形、有心矩形
//! - `Centering`（层群 8–48）：先要求等长且夹角落在窗口内，
//!   再按层群是否属于有心集合 × 角度窗口分入四个桶
//!
//! ## 依赖关系
//! - 被 `lattice2d/report.rs`、`commands/classify.rs` 使用
//! - 使用 `lattice2d/geometry.rs`

use super::geometry::InPlaneGeometry;

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// 面内长度相等的绝对容差（Å），严格小于
pub const LENGTH_TOLERANCE: f64 = 0.2;

/// 90° 窗口（闭区间）
pub const RIGHT_ANGLE_WINDOW: RangeInclusive<f64> = 85.0..=95.0;

/// 120° 窗口（闭区间）
pub const HEXAGONAL_ANGLE_WINDOW: RangeInclusive<f64> = 115.0..=125.0;

/// 有心格子对应的层群编号
pub const CENTERED_LAYER_GROUPS: [u32; 9] = [10, 13, 18, 22, 26, 35, 36, 47, 48];

/// 层群是否属于有心格子
pub fn is_centered_layer_group(lgnum: u32) -> bool {
    CENTERED_LAYER_GROUPS.contains(&lgnum)
}

/// 长度 / 角度判据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Predicates {
    pub lengths_equal: bool,
    pub near_right_angle: bool,
    pub near_hexagonal_angle: bool,
}

impl Predicates {
    pub fn evaluate(geometry: &InPlaneGeometry) -> Self {
        Predicates {
            lengths_equal: geometry.length_difference() < LENGTH_TOLERANCE,
            near_right_angle: RIGHT_ANGLE_WINDOW.contains(&geometry.angle_degrees),
            near_hexagonal_angle: HEXAGONAL_ANGLE_WINDOW.contains(&geometry.angle_degrees),
        }
    }

    /// 夹角是否落在任一窗口内
    pub fn in_any_window(&self) -> bool {
        self.near_right_angle || self.near_hexagonal_angle
    }
}

/// 分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Square,
    Hexagonal,
    SimpleRectangular,
    CenteredRectangular,
    Oblique,
    Unclassified,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Square => write!(f, "square"),
            Label::Hexagonal => write!(f, "hexagonal"),
            Label::SimpleRectangular => write!(f, "simple rectangular"),
            Label::CenteredRectangular => write!(f, "centered rectangular"),
            Label::Oblique => write!(f, "oblique"),
            Label::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// 输出分桶，名称即工作簿 sheet 名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Bucket {
    Square,
    Hexagonal,
    SimpleRectangular,
    CenteredRectangular,
    SimpleRightAngle,
    SimpleHexagonalAngle,
    CenteredRightAngle,
    CenteredHexagonalAngle,
}

impl Bucket {
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Bucket::Square => "square",
            Bucket::Hexagonal => "hexagonal",
            Bucket::SimpleRectangular => "simple rectangular",
            Bucket::CenteredRectangular => "centered rectangular",
            Bucket::SimpleRightAngle => "simple lattice (85-95)",
            Bucket::SimpleHexagonalAngle => "simple lattice (115-125)",
            Bucket::CenteredRightAngle => "centered lattice (85-95)",
            Bucket::CenteredHexagonalAngle => "centered lattice (115-125)",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// 单个结构的分类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: Label,
    pub predicates: Predicates,
    pub buckets: Vec<Bucket>,
}

impl Classification {
    pub fn is_selected(&self) -> bool {
        !self.buckets.is_empty()
    }
}

/// 分类方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scheme {
    /// Square / hexagonal / simple / centered rectangular by geometry (layer groups 1-7)
    Bravais,
    /// Simple vs centered lattice by layer group, split by angle window (layer groups 8-48)
    Centering,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Bravais => write!(f, "bravais"),
            Scheme::Centering => write!(f, "centering"),
        }
    }
}

impl Scheme {
    /// 方案适用的层群范围
    pub fn layer_groups(&self) -> RangeInclusive<u32> {
        match self {
            Scheme::Bravais => 1..=7,
            Scheme::Centering => 8..=48,
        }
    }

    /// 方案输出的所有分桶（即 sheet 顺序）
    pub fn buckets(&self) -> &'static [Bucket] {
        match self {
            Scheme::Bravais => &[
                Bucket::Square,
                Bucket::Hexagonal,
                Bucket::SimpleRectangular,
                Bucket::CenteredRectangular,
            ],
            Scheme::Centering => &[
                Bucket::SimpleRightAngle,
                Bucket::SimpleHexagonalAngle,
                Bucket::CenteredRightAngle,
                Bucket::CenteredHexagonalAngle,
            ],
        }
    }

    /// 对单个结构分类
    pub fn classify(&self, geometry: &InPlaneGeometry, lgnum: u32) -> Classification {
        let predicates = Predicates::evaluate(geometry);
        let (label, buckets) = match self {
            Scheme::Bravais => classify_bravais(&predicates),
            Scheme::Centering => classify_centering(&predicates, is_centered_layer_group(lgnum)),
        };

        Classification {
            label,
            predicates,
            buckets,
        }
    }
}

fn classify_bravais(p: &Predicates) -> (Label, Vec<Bucket>) {
    match (p.lengths_equal, p.near_right_angle, p.near_hexagonal_angle) {
        (true, true, _) => (Label::Square, vec![Bucket::Square]),
        (true, false, true) => (Label::Hexagonal, vec![Bucket::Hexagonal]),
        (false, true, _) => (Label::SimpleRectangular, vec![Bucket::SimpleRectangular]),
        (true, false, false) => (Label::CenteredRectangular, vec![Bucket::CenteredRectangular]),
        (false, false, _) => (Label::Oblique, Vec::new()),
    }
}

// 两个窗口都不命中的结构不进入任何桶，只计入 Total
fn classify_centering(p: &Predicates, centered: bool) -> (Label, Vec<Bucket>) {
    if !p.lengths_equal || !p.in_any_window() {
        return (Label::Unclassified, Vec::new());
    }

    let mut buckets = Vec::new();
    match centered {
        false => {
            if p.near_right_angle {
                buckets.push(Bucket::SimpleRightAngle);
            }
            if p.near_hexagonal_angle {
                buckets.push(Bucket::SimpleHexagonalAngle);
            }
            (Label::SimpleRectangular, buckets)
        }
        true => {
            if p.near_right_angle {
                buckets.push(Bucket::CenteredRightAngle);
            }
            if p.near_hexagonal_angle {
                buckets.push(Bucket::CenteredHexagonalAngle);
            }
            (Label::CenteredRectangular, buckets)
        }
    }
}
