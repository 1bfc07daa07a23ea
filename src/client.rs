//! Client Module
//!
//! The public command facade: one method per protocol command, built on the
//! codec, the status dispatcher and the tube state tracker.
//!
//! ## Concurrency Model
//!
//! The protocol is strictly request/response with no pipelining. The
//! connection and tube state live behind one `parking_lot::Mutex`, so every
//! method takes `&self`, exactly one command is in flight per client, and a
//! client can be shared across threads with `Arc`. A blocking `reserve`
//! holds the lock until the server answers.

use std::time::Duration;

use parking_lot::Mutex;

use crate::body::Body;
use crate::config::Config;
use crate::error::{Result, TubeError};
use crate::job::{Job, JobId};
use crate::network::{Connection, Stream};
use crate::protocol::{parse_list, parse_stats, Command, Reply, Stats};
use crate::state::{TubeState, DEFAULT_TUBE};

/// Mutable per-connection state, guarded as one unit
struct Inner {
    /// `None` once closed
    conn: Option<Connection>,

    state: TubeState,
}

/// A client connected to one beanstalkd server
///
/// ```no_run
/// use tubewire::{Client, Config};
///
/// # fn demo() -> tubewire::Result<()> {
/// let client = Client::connect(Config::default())?;
/// let id = client.put("hello")?;
/// let job = client.reserve()?;
/// assert_eq!(job.id, id);
/// client.delete(job.id)?;
/// # Ok(()) }
/// ```
pub struct Client {
    config: Config,
    inner: Mutex<Inner>,
}

impl Client {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect to the configured address and set up the used and watched tubes
    pub fn connect(config: Config) -> Result<Self> {
        config.validate()?;
        let conn = Connection::open(&config.address)?;
        Self::with_connection(conn, config)
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: Stream, config: Config) -> Result<Self> {
        config.validate()?;
        let conn = Connection::from_stream(stream, config.address.to_string())?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: Config) -> Result<Self> {
        let client = Self {
            config,
            inner: Mutex::new(Inner {
                conn: Some(conn),
                state: TubeState::new(),
            }),
        };
        client.init_tubes()?;
        Ok(client)
    }

    /// Apply the configured `use` tube and watch list
    fn init_tubes(&self) -> Result<()> {
        let use_tube = self.config.use_tube.clone();
        let watch = self.config.watch.clone();

        if use_tube != DEFAULT_TUBE {
            self.use_tube(&use_tube)?;
        }
        for tube in &watch {
            if !self.inner.lock().state.is_watching(tube) {
                self.watch(tube)?;
            }
        }
        if !watch.iter().any(|t| t == DEFAULT_TUBE) {
            self.ignore(DEFAULT_TUBE)?;
        }

        tracing::debug!(using = %use_tube, watching = ?watch, "Tubes initialized");
        Ok(())
    }

    /// Close the connection. Further commands fail with [`TubeError::Closed`].
    ///
    /// Idempotent; also runs on drop.
    pub fn close(&self) -> Result<()> {
        match self.inner.lock().conn.take() {
            Some(conn) => conn.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().conn.is_none()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Producer Commands
    // =========================================================================

    /// Insert a job into the used tube with the configured defaults
    pub fn put(&self, body: impl Into<Body>) -> Result<JobId> {
        self.put_with(
            body,
            self.config.default_priority,
            self.config.default_delay,
            self.config.default_ttr,
        )
    }

    /// Insert a job into the used tube and return its id
    ///
    /// Fails with [`TubeError::BuriedWithJobId`] if the server created the job
    /// but had to bury it.
    pub fn put_with(
        &self,
        body: impl Into<Body>,
        priority: u32,
        delay: Duration,
        ttr: Duration,
    ) -> Result<JobId> {
        let body = self.config.codec.encode(body.into())?;
        let command = Command::Put {
            priority,
            delay: delay.as_secs(),
            ttr: ttr.as_secs(),
            body,
        };
        self.execute(&command).and_then(into_count)
    }

    /// Change the tube new jobs are inserted into
    pub fn use_tube(&self, tube: &str) -> Result<String> {
        let mut inner = self.inner.lock();
        let reply = self.execute_locked(
            &mut inner,
            &Command::Use {
                tube: tube.to_string(),
            },
        )?;
        let name = into_name(reply)?;
        inner.state.record_use(&name);
        Ok(name)
    }

    // =========================================================================
    // Consumer Commands
    // =========================================================================

    /// Reserve a job from any watched tube, blocking until one is ready
    pub fn reserve(&self) -> Result<Job> {
        self.job_command(&Command::Reserve)
    }

    /// Reserve a job, waiting at most `timeout`
    ///
    /// A zero timeout polls without blocking. Fails with
    /// [`TubeError::TimedOut`] when no job became ready in time.
    pub fn reserve_with_timeout(&self, timeout: Duration) -> Result<Job> {
        self.job_command(&Command::ReserveWithTimeout {
            timeout: timeout.as_secs(),
        })
    }

    /// Like [`Client::reserve_with_timeout`], mapping a timeout to `None`
    pub fn try_reserve(&self, timeout: Duration) -> Result<Option<Job>> {
        match self.reserve_with_timeout(timeout) {
            Ok(job) => Ok(Some(job)),
            Err(TubeError::TimedOut) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Reserve a specific job by id
    pub fn reserve_job(&self, id: JobId) -> Result<Job> {
        self.job_command(&Command::ReserveJob { id })
    }

    pub fn delete(&self, id: JobId) -> Result<()> {
        self.execute(&Command::Delete { id }).map(drop)
    }

    /// Release a reserved job back to ready with the configured defaults
    pub fn release(&self, id: JobId) -> Result<()> {
        self.release_with(id, self.config.default_priority, self.config.default_delay)
    }

    pub fn release_with(&self, id: JobId, priority: u32, delay: Duration) -> Result<()> {
        self.execute(&Command::Release {
            id,
            priority,
            delay: delay.as_secs(),
        })
        .map(drop)
    }

    /// Bury a reserved job with the configured default priority
    pub fn bury(&self, id: JobId) -> Result<()> {
        self.bury_with(id, self.config.default_priority)
    }

    pub fn bury_with(&self, id: JobId, priority: u32) -> Result<()> {
        self.execute(&Command::Bury { id, priority }).map(drop)
    }

    /// Refresh the TTR of a reserved job
    pub fn touch(&self, id: JobId) -> Result<()> {
        self.execute(&Command::Touch { id }).map(drop)
    }

    /// Add a tube to the watch list; returns the server's watched count
    pub fn watch(&self, tube: &str) -> Result<u64> {
        let mut inner = self.inner.lock();
        let reply = self.execute_locked(
            &mut inner,
            &Command::Watch {
                tube: tube.to_string(),
            },
        )?;
        let count = into_count(reply)?;
        inner.state.record_watch(tube);
        Ok(count)
    }

    /// Remove a tube from the watch list; returns the server's watched count
    ///
    /// Ignoring the last watched tube fails with [`TubeError::NotIgnored`]
    /// and leaves the watch list unchanged.
    pub fn ignore(&self, tube: &str) -> Result<u64> {
        let mut inner = self.inner.lock();
        let reply = self.execute_locked(
            &mut inner,
            &Command::Ignore {
                tube: tube.to_string(),
            },
        )?;
        let count = into_count(reply)?;
        inner.state.record_ignore(tube);
        Ok(count)
    }

    // =========================================================================
    // Inspection Commands
    // =========================================================================

    pub fn peek(&self, id: JobId) -> Result<Job> {
        self.job_command(&Command::Peek { id })
    }

    /// Next ready job in the used tube
    pub fn peek_ready(&self) -> Result<Job> {
        self.job_command(&Command::PeekReady)
    }

    /// Delayed job with the shortest delay left in the used tube
    pub fn peek_delayed(&self) -> Result<Job> {
        self.job_command(&Command::PeekDelayed)
    }

    /// Oldest buried job in the used tube
    pub fn peek_buried(&self) -> Result<Job> {
        self.job_command(&Command::PeekBuried)
    }

    /// Move up to `bound` buried (or, if none, delayed) jobs in the used tube
    /// to ready; returns how many moved
    pub fn kick(&self, bound: u64) -> Result<u64> {
        self.execute(&Command::Kick { bound }).and_then(into_count)
    }

    /// Move one buried or delayed job to ready
    pub fn kick_job(&self, id: JobId) -> Result<()> {
        self.execute(&Command::KickJob { id }).map(drop)
    }

    pub fn stats_job(&self, id: JobId) -> Result<Stats> {
        self.stats_command(&Command::StatsJob { id })
    }

    pub fn stats_tube(&self, tube: &str) -> Result<Stats> {
        self.stats_command(&Command::StatsTube {
            tube: tube.to_string(),
        })
    }

    /// Server-wide statistics
    pub fn stats(&self) -> Result<Stats> {
        self.stats_command(&Command::Stats)
    }

    /// All tubes that exist on the server
    pub fn tubes(&self) -> Result<Vec<String>> {
        self.list_command(&Command::ListTubes)
    }

    /// The used tube as reported by the server
    pub fn using(&self) -> Result<String> {
        self.execute(&Command::ListTubeUsed).and_then(into_name)
    }

    /// The watched tubes as reported by the server
    pub fn watching(&self) -> Result<Vec<String>> {
        self.list_command(&Command::ListTubesWatched)
    }

    /// Stop reservations from `tube` for `delay`
    pub fn pause_tube(&self, tube: &str, delay: Duration) -> Result<()> {
        self.execute(&Command::PauseTube {
            tube: tube.to_string(),
            delay: delay.as_secs(),
        })
        .map(drop)
    }

    // =========================================================================
    // Local Tube State
    // =========================================================================

    /// The used tube, as last confirmed by the server
    pub fn current_tube(&self) -> String {
        self.inner.lock().state.using().to_string()
    }

    /// The watch list, as last confirmed by the server
    pub fn watched_tubes(&self) -> Vec<String> {
        self.inner.lock().state.watched().iter().cloned().collect()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn execute(&self, command: &Command) -> Result<Reply> {
        let mut inner = self.inner.lock();
        self.execute_locked(&mut inner, command)
    }

    fn execute_locked(&self, inner: &mut Inner, command: &Command) -> Result<Reply> {
        let conn = inner.conn.as_mut().ok_or(TubeError::Closed)?;
        conn.set_deadline(self.deadline_for(command))?;

        let result = conn.execute(command);
        if let Err(e) = &result {
            if e.is_fatal() {
                // The stream may still hold a late reply; never read it as ours
                if let Some(conn) = inner.conn.take() {
                    tracing::warn!(
                        "{} on {} failed, dropping connection: {}",
                        command.name(),
                        conn.peer_addr(),
                        e
                    );
                    if let Err(close_err) = conn.close() {
                        tracing::debug!("Error closing broken connection: {}", close_err);
                    }
                }
            }
        }
        result
    }

    /// Blocking reserves wait on the server; everything else gets `io_timeout`
    fn deadline_for(&self, command: &Command) -> Option<Duration> {
        match command {
            Command::Reserve => None,
            Command::ReserveWithTimeout { timeout } => self
                .config
                .io_timeout
                .and_then(|slack| Duration::from_secs(*timeout).checked_add(slack)),
            _ => self.config.io_timeout,
        }
    }

    fn job_command(&self, command: &Command) -> Result<Job> {
        match self.execute(command)? {
            Reply::Job { id, body } => Ok(Job::new(id, self.config.codec.decode(body)?)),
            other => Err(unexpected(other)),
        }
    }

    fn stats_command(&self, command: &Command) -> Result<Stats> {
        match self.execute(command)? {
            Reply::Data(data) => parse_stats(&data),
            other => Err(unexpected(other)),
        }
    }

    fn list_command(&self, command: &Command) -> Result<Vec<String>> {
        match self.execute(command)? {
            Reply::Data(data) => parse_list(&data),
            other => Err(unexpected(other)),
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Some(conn) = self.inner.get_mut().conn.take() {
            if let Err(e) = conn.close() {
                tracing::debug!("Error closing connection on drop: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("address", &self.config.address.to_string())
            .finish_non_exhaustive()
    }
}

fn into_count(reply: Reply) -> Result<u64> {
    match reply {
        Reply::Count(n) => Ok(n),
        other => Err(unexpected(other)),
    }
}

fn into_name(reply: Reply) -> Result<String> {
    match reply {
        Reply::Name(name) => Ok(name),
        other => Err(unexpected(other)),
    }
}

fn unexpected(reply: Reply) -> TubeError {
    TubeError::Framing(format!("unexpected reply shape: {:?}", reply))
}
