use clap::Parser;
use maidenhead_rs::{DEFAULT_PRECISION, GridCell, Precision, encode_locator};
use std::error::Error;
use std::io::{self, Write};
use tracing::{Level, debug, warn};

const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[derive(Debug, Parser)]
#[clap(name = "maidenhead", version = clap::crate_version!())]
struct MaidenheadApplication {
    /// Latitude in decimal degrees, positive north
    #[clap(allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude in decimal degrees, positive east
    #[clap(allow_negative_numbers = true)]
    longitude: f64,

    /// Locator length: 2, 4 or 6 characters. Other values fall back to the
    /// next length up, capped at 6.
    #[clap(default_value_t = DEFAULT_PRECISION)]
    precision: u8,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,
}

/// Prints the locator, then the cell it names when the position is on the
/// globe. Off-globe input still gets the clamped locator.
fn report(out: &mut impl Write, lat: f64, lon: f64, chars: u8) -> io::Result<()> {
    let locator = encode_locator(lat, lon, chars);
    debug!(lat, lon, chars, %locator, "encoded");

    writeln!(out, "Locator: {}", locator)?;
    writeln!(out, "Position: {:.4}, {:.4}", lat, lon)?;

    let cell = match GridCell::from_lat_lon(lat, lon, Precision::from_chars(chars)) {
        Ok(cell) => cell,
        Err(e) => {
            warn!(lat, lon, error = %e, "position is off the globe, locator was clamped");
            return Ok(());
        }
    };

    let bounds = cell.bounds();
    writeln!(out, "Cell centre: ({:.4}, {:.4})", cell.lat(), cell.lon())?;
    writeln!(
        out,
        "Cell bounds: lat {:.4}..{:.4}, lon {:.4}..{:.4}",
        bounds.min().y,
        bounds.max().y,
        bounds.min().x,
        bounds.max().x
    )
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = MaidenheadApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .with_writer(io::stderr)
            .finish(),
    )?;

    let stdout = io::stdout();
    report(
        &mut stdout.lock(),
        opts.latitude,
        opts.longitude,
        opts.precision,
    )?;
    Ok(())
}
