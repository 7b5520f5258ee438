use clap::Parser;
use log::info;

use dfa_rs::alphabet::Alphabet;
use dfa_rs::enumerate::enumerate_dfas;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of input letters (letters are `0..INT`).
    #[arg(value_name = "INT", default_value = "2")]
    letters: u8,

    /// Largest number of states to enumerate.
    #[clap(long, value_name = "INT", default_value = "2")]
    max_states: usize,

    /// Print the encoding of every automaton.
    #[clap(long)]
    codes: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let inputs: Alphabet<u8> = (0..args.letters).collect();
    println!("inputs = {}", inputs);

    let mut counts = vec![0usize; args.max_states + 1];
    for dfa in enumerate_dfas(inputs, Alphabet::boolean())?.max_states(args.max_states) {
        let n = dfa.states()?.len();
        counts[n] += 1;
        if args.codes {
            println!("{} states: {}", n, dfa.to_int()?);
        }
    }

    for (n, count) in counts.iter().enumerate().skip(1) {
        println!("{} minimal automata with {} states", count, n);
    }
    info!("Done in {:.3} s", time_total.elapsed().as_secs_f64());

    Ok(())
}
