//! Sample data generator binary.
//!
//! Writes the deterministic campus CSV files used by the populate step.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin studymap-seedgen -- --seed 1 \
//!     --rooms-out data/rooms.csv --timetable-out data/timetable.csv
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use studymap_rust::seed::write_sample_data;

struct Args {
    seed: u64,
    rooms_out: PathBuf,
    timetable_out: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        seed: 1,
        rooms_out: PathBuf::from("data/rooms.csv"),
        timetable_out: PathBuf::from("data/timetable.csv"),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| anyhow::anyhow!("missing value for {}", flag))
        };
        match flag.as_str() {
            "--seed" => args.seed = value()?.parse()?,
            "--rooms-out" => args.rooms_out = PathBuf::from(value()?),
            "--timetable-out" => args.timetable_out = PathBuf::from(value()?),
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let args = parse_args()?;
    let (rooms, entries) = write_sample_data(&args.rooms_out, &args.timetable_out, args.seed)?;
    info!(
        rooms,
        entries,
        seed = args.seed,
        rooms_out = %args.rooms_out.display(),
        timetable_out = %args.timetable_out.display(),
        "Sample data written"
    );
    Ok(())
}
