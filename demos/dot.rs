use std::path::PathBuf;

use clap::Parser;
use log::info;

use dfa_rs::dfa::Dfa;
use dfa_rs::dot::{to_dot_with_config, DotConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Modulus of the counter.
    #[arg(value_name = "INT", default_value = "4")]
    modulus: u32,

    /// Residue accepted by the counter.
    #[clap(long, value_name = "INT", default_value = "3")]
    accept: u32,

    /// Draw the minimized automaton instead.
    #[clap(long)]
    minimize: bool,

    /// Output file (stdout if omitted).
    #[clap(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    info!("args = {:?}", args);

    let (modulus, accept) = (args.modulus, args.accept);
    let counter = Dfa::builder(0u32, move |s: &u32, c: &u32| (s + c) % modulus, move |s: &u32| *s == accept)
        .inputs([0, 1])
        .build();

    let dot = if args.minimize {
        to_dot_with_config(&counter.minimize()?, &DotConfig::default())?
    } else {
        to_dot_with_config(&counter, &DotConfig::default())?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, dot)?;
            info!("DOT written to {}", path.display());
            info!("Render with: dot -Tpng {} -o output.png", path.display());
        }
        None => print!("{}", dot),
    }

    Ok(())
}
