use std::io;
#[cfg(unix)]
use std::thread;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Termination signals caught on behalf of the engine child.
///
/// Registered before the child is spawned: a signal arriving in between is
/// queued by the handler and relayed once [`forward_to`](Self::forward_to)
/// knows the pid, instead of killing the launcher and orphaning the engine.
pub struct SignalForwarder {
    #[cfg(unix)]
    signals: Signals,
}

/// Running relay thread. Call [`stop`](Self::stop) once the child has exited.
pub struct Forwarding {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    #[cfg(unix)]
    thread: thread::JoinHandle<()>,
}

impl SignalForwarder {
    pub fn register() -> io::Result<Self> {
        #[cfg(unix)]
        {
            let signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGQUIT])?;
            return Ok(Self { signals });
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Start relaying queued and future signals to `child_pid`.
    pub fn forward_to(self, child_pid: u32) -> Forwarding {
        #[cfg(unix)]
        {
            let mut signals = self.signals;
            let handle = signals.handle();
            let pid = child_pid as libc::pid_t;
            let thread = thread::spawn(move || {
                for signal in signals.forever() {
                    tracing::debug!(signal, pid, "forwarding signal to engine");
                    // SAFETY: kill(2) has no memory-safety preconditions.
                    unsafe {
                        libc::kill(pid, signal);
                    }
                }
            });
            return Forwarding { handle, thread };
        }

        #[cfg(not(unix))]
        {
            let _ = child_pid;
            Forwarding {}
        }
    }
}

impl Forwarding {
    pub fn stop(self) {
        #[cfg(unix)]
        {
            self.handle.close();
            let _ = self.thread.join();
        }
    }
}
