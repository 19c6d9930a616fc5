use ec_agent::error::BootstrapError;
use ec_agent::resolver::Sources;

fn main() {
  let Err(e) = ec_agent::run(Sources::from_process()) else {
    return;
  };

  // clap renders its own usage errors; --help lands here too and is not a failure.
  if let Some(BootstrapError::Flags(clap_err)) = e.downcast_ref::<BootstrapError>() {
    let _ = clap_err.print();
    std::process::exit(if clap_err.use_stderr() { 1 } else { 0 });
  }

  if ec_agent::logging::init().is_err() {
    eprintln!("ec-agent fatal error: {e:#}");
  } else {
    tracing::error!(error = %format!("{e:#}"), "ec-agent bootstrap failed");
  }
  std::process::exit(1);
}
