use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use rand::thread_rng;

use crdp_stress::args::StressArgs;
use crdp_stress::client::ProtectionClient;
use crdp_stress::config::DEFAULT_CONFIG_FILES;
use crdp_stress::error::{AppError, AppResult, ValidationError};
use crdp_stress::harness::{self, RunMode, RunPlan, export_json, input_lines, print_report};
use crdp_stress::workload::{Workload, WorkloadSpec};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(StressArgs, ArgMatches)>> {
    let mut cmd = StressArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = StressArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config() && !has_env_endpoint()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

fn has_env_endpoint() -> bool {
    std::env::var_os("CRDP_ENDPOINT").is_some()
}

async fn run_async(mut args: StressArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crdp_stress::config::load_config(args.config.as_deref())? {
        crdp_stress::config::apply_config(&mut args, matches, &config)?;
    }

    let plan = build_plan(&args)?;
    let spec = WorkloadSpec::from_args(&args);

    for line in input_lines(&plan, &spec) {
        println!("{}", line);
    }

    let workload = Workload::build(&spec, &mut thread_rng())?;
    tracing::debug!(
        "Built {} record(s), {} bytes",
        workload.record_count(),
        workload.byte_count
    );

    let client = ProtectionClient::new(&plan.endpoint)?;
    let report = harness::run(&client, &plan, &workload).await?;
    print_report(&report);

    if let Some(path) = args.export_json.as_deref() {
        let path = PathBuf::from(path);
        export_json(&path, &report).await?;
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

fn build_plan(args: &StressArgs) -> AppResult<RunPlan> {
    let endpoint = required(args.endpoint.as_deref(), ValidationError::MissingEndpoint)?;
    let policy = required(args.policy.as_deref(), ValidationError::MissingPolicy)?;
    let username = required(args.username.as_deref(), ValidationError::MissingUsername)?;

    Ok(RunPlan {
        endpoint,
        policy,
        username,
        mode: RunMode::from_bulk_flag(args.bulk_effective()),
    })
}

fn required(value: Option<&str>, missing: ValidationError) -> AppResult<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::validation(missing))
}
