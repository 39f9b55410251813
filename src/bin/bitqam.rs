use anyhow::Result;
use bitqam::{BitStream, Modulator};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use num_complex::Complex;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "bitqam", version, about = "Bit stream and square QAM demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-chunk words from one bit width to another.
    Bitstream {
        /// Bit width of the input words.
        #[arg(long, default_value_t = 8)]
        in_width: usize,
        /// Bit width of the output words.
        #[arg(long, default_value_t = 4)]
        out_width: usize,
        #[arg(default_values_t = [0u64, 1, 2, 4, 24])]
        values: Vec<u64>,
    },
    /// Modulate and demodulate bytes, unrotated and then rotated.
    Qam {
        /// Square QAM order.
        #[arg(long, default_value_t = 4)]
        order: usize,
        /// Constellation rotation in degrees for the second pass.
        #[arg(long, default_value_t = 22.5, allow_hyphen_values = true)]
        rotation_deg: f64,
        #[arg(default_values_t = [1u8, 2, 3, 5, 129])]
        data: Vec<u8>,
    },
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_LEVEL));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn format_samples(samples: &[Complex<f64>]) -> String {
    format!(
        "[{}]",
        samples.iter().map(|sample| format!("{sample:.4}")).join(", ")
    )
}

fn bitstream_demo(in_width: usize, out_width: usize, values: &[u64]) -> Result<()> {
    let mut stream = BitStream::new();
    if let Some((first, rest)) = values.split_first() {
        stream.write(*first, in_width);
        stream.writeall(rest.iter().copied(), in_width);
    }

    let first = stream.read(out_width)?;
    let out: Vec<u64> = first
        .into_iter()
        .chain(stream.readall(out_width)?)
        .collect();

    println!("for input bits len equal {in_width}");
    println!("output bits len equal {out_width}");
    println!("and input data equal {values:?}");
    println!("output is {out:?}");
    if !stream.is_empty() {
        tracing::warn!(leftover_bits = stream.len(), "bits left unread");
    }
    Ok(())
}

fn qam_demo(order: usize, rotation_deg: f64, data: &[u8]) -> Result<()> {
    let mut modulator = Modulator::new(order)?;
    tracing::info!(
        order,
        dim = modulator.dim(),
        symbol_bits = modulator.symbol_bits(),
        "modulator ready"
    );

    let mod_data = modulator.modulate(data.iter().copied())?;
    let dem_data = modulator.demodulate(mod_data.iter().copied())?;

    modulator.rotation = rotation_deg.to_radians();
    let mod_rot_data = modulator.modulate(data.iter().copied())?;
    let dem_rot_data = modulator.demodulate(mod_rot_data.iter().copied())?;

    println!("input data: {data:?}");
    println!("mod_data: {}", format_samples(&mod_data));
    println!("dem_data: {dem_data:?}");
    println!();
    println!("rotate constellation: {}", modulator.rotation);
    println!("mod_rot_data: {}", format_samples(&mod_rot_data));
    println!("dem_rot_data: {dem_rot_data:?}");

    if dem_data != data || dem_rot_data != data {
        tracing::warn!("round trip did not reproduce the input");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Bitstream {
            in_width,
            out_width,
            values,
        } => bitstream_demo(in_width, out_width, &values),
        Command::Qam {
            order,
            rotation_deg,
            data,
        } => qam_demo(order, rotation_deg, &data),
    }
}
