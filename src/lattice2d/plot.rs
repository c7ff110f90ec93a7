//! # 分类散点图
//!
//! 使用 `plotters` 绘制 |L1 − L2| 与面内夹角的散点图，
//! 每个分桶一个系列，未入桶的结构单独一个灰色系列，
//! 并画出长度容差和两个角度窗口的参考线。
//!
//! ## 依赖关系
//! - 被 `commands/classify.rs` 调用
//! - 使用 `lattice2d/report.rs`、`lattice2d/scheme.rs` 的阈值

use super::report::Report;
use super::scheme::{HEXAGONAL_ANGLE_WINDOW, LENGTH_TOLERANCE, RIGHT_ANGLE_WINDOW};
use crate::error::{LayerkitError, Result};

use plotters::prelude::*;
use std::path::Path;

const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(0, 102, 204),
    RGBColor(220, 50, 47),
    RGBColor(38, 139, 34),
    RGBColor(203, 75, 22),
];

/// 生成分类散点图，扩展名为 .svg 时输出 SVG，否则 PNG
pub fn generate_classification_plot(
    report: &Report,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    let title = format!("In-plane lattice classification ({})", report.scheme());

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, report, &title)?;
        root.present()
            .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_chart(&root, report, &title)?;
        root.present()
            .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    report: &Report,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;

    let x_max = report
        .rows()
        .iter()
        .map(|r| r.record.geometry.length_difference())
        .fold(LENGTH_TOLERANCE * 2.5, f64::max)
        * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..180.0)
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("|L1 - L2| (Å)")
        .y_desc("In-plane angle (°)")
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;

    // 参考线：长度容差与角度窗口边界
    let guide = BLACK.mix(0.35);
    chart
        .draw_series(LineSeries::new(
            vec![(LENGTH_TOLERANCE, 0.0), (LENGTH_TOLERANCE, 180.0)],
            guide.stroke_width(1),
        ))
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;

    let bounds = [
        *RIGHT_ANGLE_WINDOW.start(),
        *RIGHT_ANGLE_WINDOW.end(),
        *HEXAGONAL_ANGLE_WINDOW.start(),
        *HEXAGONAL_ANGLE_WINDOW.end(),
    ];
    for y in bounds {
        chart
            .draw_series(LineSeries::new(
                vec![(0.0, y), (x_max, y)],
                guide.stroke_width(1),
            ))
            .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;
    }

    // 未入桶的结构
    let unselected: Vec<(f64, f64)> = report
        .rows()
        .iter()
        .filter(|r| !r.classification.is_selected())
        .map(|r| (r.record.geometry.length_difference(), r.record.geometry.angle_degrees))
        .collect();

    let grey = RGBColor(150, 150, 150);
    chart
        .draw_series(unselected.iter().map(|p| Circle::new(*p, 3, grey.filled())))
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?
        .label(format!("unselected ({})", unselected.len()))
        .legend(move |(x, y)| Circle::new((x + 10, y), 4, grey.filled()));

    for (i, bucket) in report.scheme().buckets().iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let points: Vec<(f64, f64)> = report
            .bucket_rows(*bucket)
            .iter()
            .map(|r| (r.record.geometry.length_difference(), r.record.geometry.angle_degrees))
            .collect();

        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))
            .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?
            .label(format!("{} ({})", bucket, points.len()))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| LayerkitError::PlotError(format!("{:?}", e)))?;

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

    fn sample_report() -> Report {
        let mut report = Report::new(Scheme::Bravais);
        for (formula, l1, l2, angle) in [("Sq", 4.0, 4.05, 90.0), ("Hex", 3.19, 3.19, 120.0), ("Obl", 3.0, 4.5, 101.0)] {
            report.push(StructureRecord {
                formula: formula.to_string(),
                lgnum: 2,
                source: PathBuf::from(format!("lgnum_2/{}.vasp", formula)),
                geometry: InPlaneGeometry {
                    vacuum_axis: 2,
                    length1: l1,
                    length2: l2,
                    angle_degrees: angle,
                },
            });
        }
        report
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("layerkit-plot-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_svg_plot() {
        let dir = scratch("svg");
        let path = dir.join("classification.svg");

        generate_classification_plot(&sample_report(), &path, 800, 600).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("unselected (1)"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_png_plot() {
        let dir = scratch("png");
        let path = dir.join("classification.png");

        // 位图后端的文字渲染依赖系统字体，缺字体时只允许返回 PlotError
        match generate_classification_plot(&sample_report(), &path, 640, 480) {
            Ok(()) => assert!(fs::metadata(&path).unwrap().len() > 0),
            Err(e) => assert!(matches!(e, LayerkitError::PlotError(_))),
        }

        fs::remove_dir_all(&dir).ok();
    }
}
