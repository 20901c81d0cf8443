use binshim::{
    SPAWN_FAILED_EXIT_CODE, config::ShimConfig, delegate::ProcessDelegator,
    platform::PlatformKey, runtime::RealRuntime,
};
use std::ffi::OsString;

/// Runs the installed binary with this process's arguments and exits with its
/// exit code. Takes no flags of its own; settings come from `BINSHIM_*`
/// environment variables.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let runtime = RealRuntime;
    let config = ShimConfig::from_env(&runtime);

    let binary = match config.binary_path(&runtime, &PlatformKey::detect()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to locate installed binary: {:#}", e);
            std::process::exit(SPAWN_FAILED_EXIT_CODE);
        }
    };

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let code = ProcessDelegator::new(&runtime, binary).run_to_exit_code(&args);
    std::process::exit(code);
}
