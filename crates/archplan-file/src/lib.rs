//! ArchPlan 导出
//!
//! 支持：
//! - 平面图 `.svg` / `.dxf` 导出（DXF 也可读回）
//! - 体块模型 JSON 网格格式
//! - gmsh `.geo` 几何脚本

pub mod dxf_io;
pub mod error;
pub mod export;
pub mod geo;
pub mod mesh_json;

pub use error::ExportError;
pub use export::{export_plan, LayerOptions, PlanFormat, SvgExporter, SvgOptions};
pub use mesh_json::{MeshDocument, MeshMetadata};
