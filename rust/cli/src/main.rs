// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Render the walls and openings of a floorplan (OBJ output)
//!
//! Usage:
//!   floorplan-walls <plan.json> [options]

mod obj;

use anyhow::{bail, Context, Result};
use floorplan_core::FloorPlan;
use floorplan_geometry::{EngineConfig, FloorPlanner};
use obj::ObjWriter;
use std::env;
use std::fs;
use std::io::BufWriter;
use tracing_subscriber::EnvFilter;

struct Options {
    plan_path: String,
    output_path: String,
    floor: Option<String>,
    no_csg: bool,
    holes_only: bool,
}

fn parse_args(args: &[String]) -> Result<Option<Options>> {
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        return Ok(None);
    }

    let mut options = Options {
        plan_path: args[1].clone(),
        output_path: String::from("walls.obj"),
        floor: None,
        no_csg: false,
        holes_only: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                options.output_path = args.get(i).context("--output needs a path")?.clone();
            }
            "--floor" => {
                i += 1;
                options.floor = Some(args.get(i).context("--floor needs a name")?.clone());
            }
            "--no-csg" => options.no_csg = true,
            "--holes" => options.holes_only = true,
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }
    Ok(Some(options))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,floorplan_geometry=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args)? {
        Some(options) => options,
        None => {
            print_usage();
            return Ok(());
        }
    };

    let plan = FloorPlan::from_path(&options.plan_path)
        .with_context(|| format!("Cannot load floorplan '{}'", options.plan_path))?;

    let floors = match &options.floor {
        Some(name) => vec![plan.floor(name)?.clone()],
        None => plan.floors.clone(),
    };
    tracing::info!(
        plan = %options.plan_path,
        floors = floors.len(),
        rooms = plan.room_count(),
        "Loaded floorplan"
    );

    let mut planner = FloorPlanner::from_plan(&plan);
    if options.no_csg {
        planner = planner.with_config(&EngineConfig::from_env().with_csg(false));
    }

    if options.holes_only {
        for floor in &floors {
            println!("{} ({} connections)", floor.name, plan.connections_for(floor).count());
            for hole in planner.holes(floor) {
                println!(
                    "  {}/{} {:<11} center={:.3} width={:.3} height={:.3} bottom={:.3}",
                    hole.room,
                    hole.wall,
                    hole.kind.as_str(),
                    hole.center(),
                    hole.width,
                    hole.height,
                    hole.bottom
                );
            }
        }
        return Ok(());
    }

    let geometry = planner.render_floors(&floors);

    let file = fs::File::create(&options.output_path)
        .with_context(|| format!("Cannot create output file '{}'", options.output_path))?;
    let mut writer = ObjWriter::new(BufWriter::new(file), geometry.len())?;
    for floor in &geometry {
        writer.write_floor(floor)?;
    }
    let objects = writer.object_count();
    writer.finish()?;

    for floor in &geometry {
        println!(
            "{}: {} walls, {} segments, {} openings, {} triangles ({} backend, {} fallbacks)",
            floor.floor,
            floor.walls.len(),
            floor.segment_count(),
            floor.openings.len(),
            floor.triangle_count(),
            floor.backend,
            floor.fallback_segments
        );
    }
    println!("Wrote {} objects to {}", objects, options.output_path);
    Ok(())
}

fn print_usage() {
    println!(
        r#"Floorplan Wall Renderer
=======================

Renders the walls and openings of a floorplan JSON document to OBJ.

USAGE:
  floorplan-walls <plan.json> [OPTIONS]

OPTIONS:
  -o, --output <path>   Output OBJ file path (default: walls.obj)
  --floor <name>        Render only this floor
  --no-csg              Keep walls whole and draw opening overlays
  --holes               Print the resolved hole rectangles instead of writing OBJ
  -h, --help            Show this help message

ENVIRONMENT:
  RUST_LOG                  Log filter (default: info,floorplan_geometry=debug)
  FLOORPLAN_CSG             off/0/false disables hole subtraction
  FLOORPLAN_CUTTER_MARGIN   Extra cutter thickness per side (default: 0.05)"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_args(&args(&["floorplan-walls", "plan.json", "-o", "out.obj", "--no-csg"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.plan_path, "plan.json");
        assert_eq!(options.output_path, "out.obj");
        assert!(options.no_csg);
        assert!(!options.holes_only);
        assert!(options.floor.is_none());
    }

    #[test]
    fn test_help_and_errors() {
        assert!(parse_args(&args(&["floorplan-walls"])).unwrap().is_none());
        assert!(parse_args(&args(&["floorplan-walls", "--help"])).unwrap().is_none());
        assert!(parse_args(&args(&["floorplan-walls", "plan.json", "--bogus"])).is_err());
        assert!(parse_args(&args(&["floorplan-walls", "plan.json", "--floor"])).is_err());
    }
}
