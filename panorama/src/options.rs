use anyhow::{anyhow, Error as AnyError};
use clap::{builder::FalseyValueParser, Parser, Subcommand};
use geo::geometry::Coord;
use std::{path::PathBuf, str::FromStr};
use terrain::GLOBE_MILES;

/// Render horizon panoramas from SRTM terrain.
#[derive(Parser, Debug)]
pub struct Cli {
    /// Directory containing SRTM hgt tiles, possibly two levels deep.
    #[arg(
        short,
        long,
        env = "DEM_DATA",
        default_value = "/usr/local/share/gis/hgt"
    )]
    pub tile_dir: PathBuf,

    /// Earth radius in miles: a number, "inf", "-inf", "globe" or
    /// "-globe". Zero is a flat disk, infinite a flat plane, negative
    /// a hollow earth. Defaults to the ordinary globe; pass "inf" for
    /// the flat plane.
    #[arg(
        long,
        env = "EARTH_RADIUS_MILES",
        default_value = "globe",
        allow_hyphen_values = true
    )]
    pub earth_radius: RadiusMiles,

    /// Coefficient of refraction, only used with a positive radius.
    #[arg(
        long,
        env = "COEFFICIENT_OF_REFRACTION",
        default_value_t = 0.0,
        allow_hyphen_values = true
    )]
    pub refraction: f64,

    /// Arc-seconds between tile samples (3 or 1).
    #[arg(long, default_value_t = 3)]
    pub resolution: u8,

    /// Memory map tiles instead of reading them into memory.
    #[arg(long)]
    pub memmap: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a panorama to an image file.
    Render {
        /// Observer "lat,lon".
        #[arg(long, allow_hyphen_values = true)]
        observer: LatLon,

        /// Compass bearing of the image center (degrees).
        #[arg(long, allow_hyphen_values = true)]
        bearing: f64,

        /// Maximum scan distance (km).
        #[arg(long, default_value_t = 500.0)]
        distance: f64,

        /// Eye height above ground (meters).
        #[arg(long, default_value_t = 1.8)]
        height: f64,

        /// Horizontal field of view (degrees).
        #[arg(long, default_value_t = 60.0)]
        span: f64,

        /// Paint sea-level samples as water.
        #[arg(
            long,
            env = "OCEANFRONT",
            value_parser = FalseyValueParser::new()
        )]
        oceanfront: bool,

        /// Output image path.
        #[arg(short, long, default_value = "panorama.png")]
        out: PathBuf,
    },

    /// Print the elevation sample nearest "lat,lon".
    Height {
        #[arg(allow_hyphen_values = true)]
        location: LatLon,
    },

    /// Print every sample of a tile with its coordinates.
    Dump {
        /// Path to an hgt file.
        tile: PathBuf,
    },
}

#[derive(Clone, Debug)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let idx = s.find(',').ok_or(anyhow!("not a valid lat,lon pair"))?;
        let (lat_str, lon_str) = {
            let (lat_str, lon_str) = s.split_at(idx);
            (lat_str.trim(), lon_str[1..].trim())
        };
        let lat = f64::from_str(lat_str)?;
        let lon = f64::from_str(lon_str)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("{s} is out of range"));
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusMiles(pub f64);

impl FromStr for RadiusMiles {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "globe" => Ok(Self(GLOBE_MILES)),
            "-globe" => Ok(Self(-GLOBE_MILES)),
            other => {
                let miles = f64::from_str(other)?;
                if miles.is_nan() {
                    Err(anyhow!("earth radius is not a number"))
                } else {
                    Ok(Self(miles))
                }
            }
        }
    }
}
