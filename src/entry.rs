use clap::{ArgMatches, CommandFactory, FromArgMatches};

use stagger::app::{self, RunPlan};
use stagger::args::StaggerArgs;
use stagger::config::{apply_config, load_config};
use stagger::error::{AppError, AppResult};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }
    let plan = RunPlan::from_args(&args)?;

    // Every slot shares one thread; they interleave at network I/O and sleeps.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run(plan)).map(drop)
}

fn parse_args() -> AppResult<(StaggerArgs, ArgMatches)> {
    let matches = StaggerArgs::command().get_matches();
    let args = StaggerArgs::from_arg_matches(&matches).map_err(AppError::from)?;
    Ok((args, matches))
}
