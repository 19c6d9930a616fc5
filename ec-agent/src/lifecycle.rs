use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use anyhow::Context;

use crate::dispatch::AgentHandle;
use crate::error::{BootstrapError, StartupFailure};

/// Spawns the agent's startup on its own thread. An error or a panic inside
/// `start` is caught at the thread boundary and handed to `on_failure`.
pub fn launch_startup<F>(handle: &AgentHandle, on_failure: F) -> anyhow::Result<JoinHandle<()>>
where
  F: FnOnce(StartupFailure) + Send + 'static,
{
  let agent = Arc::clone(handle.agent());
  let mode = handle.mode();

  thread::Builder::new()
    .name(format!("{mode}-startup"))
    .spawn(move || {
      let reason = match panic::catch_unwind(AssertUnwindSafe(|| agent.start())) {
        Ok(Ok(())) => {
          tracing::info!(%mode, "agent startup complete");
          return;
        }
        Ok(Err(e)) => format!("{e:#}"),
        Err(payload) => format!("panicked: {}", panic_message(&*payload)),
      };
      on_failure(StartupFailure { mode, reason });
    })
    .context("spawn agent startup thread")
}

/// Launches startup, then runs the operation loop on the calling thread.
pub fn run<F>(handle: AgentHandle, stop: mpsc::Receiver<()>, on_failure: F) -> anyhow::Result<()>
where
  F: FnOnce(StartupFailure) + Send + 'static,
{
  launch_startup(&handle, on_failure)?;
  handle
    .agent()
    .run_blocking(stop)
    .with_context(|| format!("{} agent operation loop failed", handle.mode()))
}

/// Production failure hook: log and terminate.
pub fn exit_on_failure(failure: StartupFailure) {
  let mode = failure.mode;
  let err = BootstrapError::from(failure);
  tracing::error!(%mode, error = %err, "exiting");
  std::process::exit(1);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic payload".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::agent::Agent;
  use crate::modes::Mode;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::time::Duration;

  enum Startup {
    Ok,
    Fail,
    Panic,
  }

  struct Scripted {
    startup: Startup,
    started: AtomicBool,
  }

  impl Scripted {
    fn handle(startup: Startup) -> (AgentHandle, Arc<Scripted>) {
      let agent = Arc::new(Scripted {
        startup,
        started: AtomicBool::new(false),
      });
      (AgentHandle::new(Mode::Server, agent.clone()), agent)
    }
  }

  impl Agent for Scripted {
    fn start(&self) -> anyhow::Result<()> {
      self.started.store(true, Ordering::SeqCst);
      match self.startup {
        Startup::Ok => Ok(()),
        Startup::Fail => Err(anyhow::anyhow!("registration refused")).context("register with gateway"),
        Startup::Panic => panic!("startup exploded"),
      }
    }

    fn run_blocking(&self, stop: mpsc::Receiver<()>) -> anyhow::Result<()> {
      stop.recv_timeout(Duration::from_secs(5)).ok();
      Ok(())
    }
  }

  fn startup_outcome(startup: Startup) -> Option<StartupFailure> {
    let (handle, agent) = Scripted::handle(startup);
    let (tx, rx) = mpsc::channel();
    launch_startup(&handle, move |f| {
      let _ = tx.send(f);
    })
    .unwrap()
    .join()
    .unwrap();
    assert!(agent.started.load(Ordering::SeqCst));
    rx.try_recv().ok()
  }

  #[test]
  fn successful_startup_does_not_report() {
    assert_eq!(startup_outcome(Startup::Ok), None);
  }

  #[test]
  fn startup_error_is_reported_with_context() {
    let failure = startup_outcome(Startup::Fail).unwrap();
    assert_eq!(failure.mode, Mode::Server);
    assert_eq!(failure.reason, "register with gateway: registration refused");
  }

  #[test]
  fn startup_panic_is_contained() {
    let failure = startup_outcome(Startup::Panic).unwrap();
    assert_eq!(failure.reason, "panicked: startup exploded");
  }

  #[test]
  fn run_returns_after_stop() {
    let (handle, agent) = Scripted::handle(Startup::Ok);
    let (stop_tx, stop_rx) = mpsc::channel();
    stop_tx.send(()).unwrap();
    run(handle, stop_rx, |f| panic!("unexpected failure: {f}")).unwrap();
    // Startup runs on its own thread; give it a moment to be observed.
    for _ in 0..100 {
      if agent.started.load(Ordering::SeqCst) {
        return;
      }
      thread::sleep(Duration::from_millis(10));
    }
    panic!("startup never ran");
  }
}
