//! Propagate a Gaussian wave packet through a potential and report how much
//! of it is reflected and transmitted.
//!
//! Usage: `packet [config.json] [duration (fs)]`. Without a config file the
//! default single barrier and packet are used.

use anyhow::Context;
use qtunnel::{
    config::{ PacketConfig, SimulationConfig },
    model::TunnelingModel,
};

const DEFAULT_DURATION: f64 = 40.0; // fs
const FRAMES: usize = 20;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => {
            SimulationConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        },
        None => SimulationConfig::default(),
    };
    let duration: f64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("bad duration {s:?}"))?,
        None => DEFAULT_DURATION,
    };
    config.packet.get_or_insert_with(PacketConfig::default);

    let mut model = TunnelingModel::from_config(&config)?;
    let dt = duration / FRAMES as f64;
    println!("# t (fs)\t<x> (nm)\tP_refl\tP_trans\tnorm");
    for frame in 0..=FRAMES {
        if frame > 0 { model.tick(dt)?; }
        let packet = model.packet().context("no wave packet configured")?;
        println!(
            "{:.3}\t{:.4}\t{:.6}\t{:.6}\t{:.9}",
            model.time(),
            packet.mean_position(),
            packet.reflected_probability(),
            packet.transmitted_probability(),
            packet.total_probability(),
        );
    }
    println!(
        "# plane-wave T = {:.6}, R = {:.6} at E = {} eV",
        model.solver().transmission(),
        model.solver().reflection(),
        model.total_energy().energy(),
    );
    Ok(())
}
