//! # 统一错误处理模块
//!
//! 定义 layerkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// layerkit 统一错误类型
#[derive(Error, Debug)]
pub enum LayerkitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 晶格错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed lattice in {path}\nReason: {reason}")]
    MalformedLattice { path: String, reason: String },

    #[error("Degenerate lattice geometry in {path}\nReason: {reason}")]
    DegenerateGeometry { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 数据导出错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid structure record '{uid}'\nReason: {reason}")]
    InvalidRecord { uid: String, reason: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    WorkbookError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),
}

impl LayerkitError {
    /// 附加文件路径：几何计算本身不知道来源文件
    pub fn at_path(self, path: &std::path::Path) -> Self {
        let path = path.display().to_string();
        match self {
            LayerkitError::MalformedLattice { reason, .. } => {
                LayerkitError::MalformedLattice { path, reason }
            }
            LayerkitError::DegenerateGeometry { reason, .. } => {
                LayerkitError::DegenerateGeometry { path, reason }
            }
            other => other,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LayerkitError>;
