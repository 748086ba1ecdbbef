//! ArchPlan 主程序入口
//!
//! 生成全部设计并写出到输出目录（默认 `out/`，可由第一个命令行参数指定）：
//! - `4251hunter.svg` / `4251hunter.dxf`：公寓平面图
//! - `dream.svg`：黄金比例平面草图，`outline` 图层画虚线
//! - `dream.json` / `dream.geo`：3D住宅体块的网格与 gmsh 脚本

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use archplan_designs::{dream, hunter};
use archplan_file::{dxf_io, geo, LayerOptions, MeshDocument, SvgExporter, SvgOptions};

fn write_hunter(out: &Path) -> Result<()> {
    let apartment = hunter::apartment().context("failed to build 4251 Hunter plan")?;

    let svg = out.join("4251hunter.svg");
    SvgExporter::new(SvgOptions::default())
        .export_to_file(&apartment, &svg)
        .with_context(|| format!("failed to write {}", svg.display()))?;

    let dxf = out.join("4251hunter.dxf");
    dxf_io::export(&apartment, &dxf).with_context(|| format!("failed to write {}", dxf.display()))?;
    Ok(())
}

fn write_dream(out: &Path) -> Result<()> {
    let plan = dream::plan().context("failed to build dream plan")?;
    let options =
        SvgOptions::default().with_layer("outline", LayerOptions::css("stroke-dasharray: 5;"));
    let svg = out.join("dream.svg");
    SvgExporter::new(options)
        .export_to_file(&plan, &svg)
        .with_context(|| format!("failed to write {}", svg.display()))?;

    let house = dream::house(&dream::HouseParams::default()).context("failed to build dream house")?;
    let document = MeshDocument::from_solid("dream", &house.to_solid());

    let json = out.join("dream.json");
    document
        .save(&json)
        .with_context(|| format!("failed to write {}", json.display()))?;

    let script = out.join("dream.geo");
    geo::save_geo(&document.polygons, &script)
        .with_context(|| format!("failed to write {}", script.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish(),
    )?;

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out"));
    std::fs::create_dir_all(&out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;

    info!(out = %out.display(), "Generating designs...");
    write_hunter(&out)?;
    write_dream(&out)?;
    info!("Done");
    Ok(())
}
