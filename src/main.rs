mod cli;
mod clock;
mod error;
mod input;
mod logging;
mod scheduler;
mod sensor;
mod sorter;
mod task_queue;
mod types;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::clock::SystemClock;
use crate::scheduler::Scheduler;
use crate::sensor::{SystemCoreCounter, SystemLoadSensor};

// Exit statuses: input validation failures vs. bad flags (clap also uses 2).
const EXIT_INPUT: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    let config = args.scheduler_config();
    if let Err(err) = config.validate() {
        eprintln!("{err}");
        return ExitCode::from(EXIT_USAGE);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut queue = match input::read_tasks(&mut input, &mut out) {
        Ok(queue) => queue,
        Err(err) => {
            let _ = writeln!(out);
            eprintln!("Invalid input! {err}");
            return ExitCode::from(EXIT_INPUT);
        }
    };
    queue.sort_by_priority();
    let order: Vec<_> = queue.tasks().iter().map(|task| task.id).collect();
    info!(tasks = queue.len(), ?order, "task queue sorted");

    let cores = SystemCoreCounter;
    let sensor = SystemLoadSensor::new(&cores);
    let clock = SystemClock::new();
    let scheduler = Scheduler::new(config, &sensor, &cores, &clock);

    match scheduler.run(queue, &mut out) {
        Ok(summary) => {
            let _ = writeln!(
                out,
                "Run complete: tasks={} throttled={:?} sensor_failures={}",
                summary.reports.len(),
                summary.throttled_ids(),
                summary.sensor_failures
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "scheduling run aborted");
            ExitCode::from(EXIT_INPUT)
        }
    }
}
