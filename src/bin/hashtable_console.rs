use std::error::Error;
use std::io::{self, Write};

use clap::Parser;
use chained_table::console::Console;
use chained_table::logger::{initialize_logger, level_for_verbosity};
use chained_table::{ChainedTableBuilder, GrowTrigger};

/// Interactive shell over a chained string-to-integer hash table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial number of buckets (rounded up to a power of two, at least 8).
    #[arg(short, long, default_value_t = 8)]
    capacity: usize,

    /// Only check the grow threshold when a new key is added.
    #[arg(long)]
    grow_on_new_key: bool,

    /// Don't print the command menu on start-up.
    #[arg(long)]
    no_menu: bool,

    /// Log more (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    initialize_logger(level_for_verbosity(args.verbose));

    let trigger = if args.grow_on_new_key {
        GrowTrigger::NewKeyOnly
    } else {
        GrowTrigger::EveryInsert
    };
    let table = ChainedTableBuilder::new()
        .with_capacity(args.capacity)
        .with_grow_trigger(trigger)
        .build()?;

    let stdout = io::stdout();
    let mut console = Console::new(table, stdout.lock());
    if !args.no_menu {
        console.print_menu()?;
    }
    console.run(io::stdin().lock())?;
    console.into_output().flush()?;
    Ok(())
}
