mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use log::info;
use nasadem::Tile;
use options::{Cli, Command as CliCmd};
use panorama::Panorama;
use std::{
    io::{BufWriter, Write},
    path::Path,
};
use terrain::{EarthShape, TileMode, Tiles};

fn main() -> Result<(), AnyError> {
    env_logger::init();

    let Cli {
        tile_dir,
        earth_radius,
        refraction,
        resolution,
        memmap,
        cmd,
    } = Cli::parse();

    let tile_mode = if memmap {
        TileMode::MemMap
    } else {
        TileMode::InMem
    };

    match cmd {
        CliCmd::Render {
            observer,
            bearing,
            distance,
            height,
            span,
            oceanfront,
            out,
        } => {
            let earth = EarthShape::from_miles(earth_radius.0, refraction)?;
            info!("rendering against {:?} earth", earth.model());
            let tiles = Tiles::new(tile_dir, tile_mode, resolution)?;
            let panorama = Panorama::builder()
                .observer(observer.0)
                .bearing(bearing)
                .distance_km(distance)
                .eye_height(height)
                .span(span)
                .oceanfront(oceanfront)
                .build(&tiles, &earth)?;
            panorama.to_image().save(&out)?;
            info!("wrote {} columns to {out:?}", panorama.width());
            Ok(())
        }
        CliCmd::Height { location } => {
            let tiles = Tiles::new(tile_dir, tile_mode, resolution)?;
            let elevation = tiles.elevation(location.0)?;
            println!("{elevation}");
            Ok(())
        }
        CliCmd::Dump { tile } => dump(&tile, tile_mode),
    }
}

fn dump(path: &Path, tile_mode: TileMode) -> Result<(), AnyError> {
    let tile = match tile_mode {
        TileMode::InMem => Tile::load(path)?,
        TileMode::MemMap => Tile::memmap(path)?,
    };
    let mut stdout = BufWriter::new(std::io::stdout().lock());
    for sample in tile.iter() {
        let (x, y) = sample.xy();
        writeln!(
            stdout,
            "{y:4} {x:4} {} {} {}",
            sample.lat(),
            sample.lon(),
            sample.elevation()
        )?;
    }
    stdout.flush()?;
    Ok(())
}
