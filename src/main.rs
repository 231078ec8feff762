use kgramgen::error::*;
use kgramgen::opts::{Mode, Opts, Settings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use slog::{Drain, Logger};
use std::io::{self, BufWriter};
use std::time::{SystemTime, UNIX_EPOCH};
use structopt::StructOpt;

fn main() {
    let exit_code = run();

    std::process::exit(exit_code)
}

// This separate method is needed for slog_async to flush properly
fn run() -> i32 {
    let settings = Settings::from_env();
    let level = settings
        .as_ref()
        .map_or(slog::Level::Warning, |settings| settings.log_level);

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();

    let log = slog::Logger::root(drain, slog::o!());

    let result = settings.and_then(|settings| {
        let opts = Opts::from_iter_safe(std::env::args_os()).context(
            ErrorKind::Usage,
            "Wrong number of command-line arguments (expected 3)",
        )?;
        try_run(&log, opts, settings)
    });

    if let Err(err) = result {
        slog::error!(log, "Encountered error"; "description" => %err);

        for cause in err.iter().skip(1) {
            slog::error!(log, "Underlying error"; "description" => %cause);
        }

        return err.exit_code();
    }

    0
}

fn try_run(log: &Logger, opts: Opts, settings: Settings) -> Result<()> {
    let text = kgramgen::read_text(log, &opts.path)?;
    let max_k = opts.order(text.len())?;
    let mode = opts.mode(max_k)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match mode {
        Mode::Dump => {
            let model = kgramgen::Model::build(&text, max_k);
            slog::debug!(log, "Built model"; "order" => max_k, "kgrams" => model.len());
            kgramgen::write_dump(&model, &mut out)?;
        }
        Mode::Generate { length } => {
            let seed = settings.seed.unwrap_or_else(time_seed);
            slog::info!(log, "Seeded random source"; "seed" => seed);

            let mut rng = StdRng::seed_from_u64(seed);
            kgramgen::sweep(log, &text, max_k, length, &mut rng, &mut out)?;
        }
    }

    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
        .unwrap_or(0)
}
