use std::io;

use log::{debug, trace};
use sd_notify::NotifyState;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::error::{ServiceError, ServiceResult};
use crate::service::{Program, Service};

/// Signals that end the run loop: `systemctl stop` and Ctrl+C.
pub const TERM_SIGNALS: [i32; 2] = [SIGTERM, SIGINT];

/// A source of termination notifications.
pub trait TerminationSignals {
    /// Blocks until a termination signal arrives and returns its number.
    fn wait(&mut self) -> io::Result<i32>;
}

/// Process-wide interest in [`TERM_SIGNALS`].
///
/// The handlers are registered on creation and unregistered when the
/// subscription is dropped, so nested or repeated run loops don't pile up
/// handlers. Delivery goes through a self-pipe: the signal handler never
/// blocks, and a signal arriving while nobody waits stays pending.
///
/// The process-level handler itself stays installed after the drop and the
/// default disposition is not restored: once a subscription has existed,
/// SIGTERM and SIGINT no longer terminate the process. Callers that keep
/// running after [`run_loop`] returns must handle or restore them.
pub struct SignalSubscription {
    signals: Signals,
}

impl SignalSubscription {
    pub fn register() -> io::Result<Self> {
        let signals = Signals::new(TERM_SIGNALS)?;
        trace!("registered termination signal handlers");
        Ok(SignalSubscription { signals })
    }
}

impl TerminationSignals for SignalSubscription {
    fn wait(&mut self) -> io::Result<i32> {
        self.signals.forever().next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "signal delivery was closed")
        })
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        self.signals.handle().close();
        trace!("termination signal handlers released");
    }
}

/// Foreground run loop.
///
/// Calls `program.start`, then subscribes to termination signals, blocks for
/// one, and returns the result of `program.stop`. A failed start is returned
/// straight away: no subscription is made and `stop` is never called.
pub fn run_loop<S, F>(program: &dyn Program, service: &dyn Service, subscribe: F) -> ServiceResult<()>
where
    S: TerminationSignals,
    F: FnOnce() -> io::Result<S>,
{
    program.start(service).map_err(ServiceError::Program)?;

    let mut signals = subscribe()?;
    // Outside of systemd there is no notify socket and this does nothing.
    let _ = sd_notify::notify(false, &[NotifyState::Ready]);

    let signal = signals.wait()?;
    debug!("received signal {}, stopping {}", signal, service);
    let _ = sd_notify::notify(false, &[NotifyState::Stopping]);

    program.stop(service).map_err(ServiceError::Program)
}
