//! Print the transmission spectrum of a potential and its resonances.
//!
//! Usage: `transmission [config.json]`. Without a config file the default
//! single barrier is used.

use anyhow::Context;
use qtunnel::{
    config::SimulationConfig,
    spectrum::{ find_resonances, reflection_spectrum, transmission_spectrum },
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            SimulationConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {path}"))?
        },
        None => SimulationConfig::default(),
    };
    let potential = config.build_potential()?;
    let energies = config.spectrum.energies()?;
    let t = transmission_spectrum(&potential, &energies, config.direction)?;
    let r = reflection_spectrum(&potential, &energies, config.direction)?;

    println!("# E (eV)\tT\tR");
    energies.iter().zip(&t).zip(&r)
        .for_each(|((e, tk), rk)| println!("{e:.6}\t{tk:.6e}\t{rk:.6e}"));

    let resonances = find_resonances(&energies, &t)?;
    println!("# {} resonance(s)", resonances.len());
    resonances.iter()
        .for_each(|e| println!("# resonance at E = {e:.6} eV"));
    Ok(())
}
