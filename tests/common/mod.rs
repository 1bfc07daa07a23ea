//! Scripted in-process server for client tests
//!
//! Accepts a single connection, reads each expected request byte-for-byte
//! and answers with the canned reply. Returns the bytes it received so tests
//! can assert on the exact wire format.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
#[cfg(unix)]
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tubewire::{Address, Client, Config};

/// One request/reply exchange
pub struct Step {
    pub request: Vec<u8>,
    pub reply: Vec<u8>,
    pub delay: Duration,
}

pub fn step(request: &[u8], reply: &[u8]) -> Step {
    late_step(request, reply, Duration::ZERO)
}

/// Like `step`, but the reply is held back for `delay`
pub fn late_step(request: &[u8], reply: &[u8], delay: Duration) -> Step {
    Step {
        request: request.to_vec(),
        reply: reply.to_vec(),
        delay,
    }
}

/// Handle to a running scripted server
pub struct MockServer {
    pub address: Address,
    handle: JoinHandle<Vec<Vec<u8>>>,
}

impl MockServer {
    /// Serve `script` on an ephemeral TCP port
    pub fn tcp(script: Vec<Step>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            serve(&mut stream, script)
        });

        Self {
            address: Address::tcp("127.0.0.1", port),
            handle,
        }
    }

    /// Serve `script` on a Unix socket at `path`
    #[cfg(unix)]
    pub fn unix(path: &Path, script: Vec<Step>) -> Self {
        let listener = UnixListener::bind(path).unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            serve(&mut stream, script)
        });

        Self {
            address: Address::unix(path),
            handle,
        }
    }

    /// Config pointing at this server
    pub fn config(&self) -> Config {
        Config::builder()
            .address(self.address.clone())
            .io_timeout(Duration::from_secs(5))
            .build()
    }

    /// Connect a client with the default config
    pub fn client(&self) -> Client {
        Client::connect(self.config()).unwrap()
    }

    /// Wait for the script to finish and return the received requests
    pub fn finish(self) -> Vec<Vec<u8>> {
        self.handle.join().unwrap()
    }
}

fn serve<S: Read + Write>(stream: &mut S, script: Vec<Step>) -> Vec<Vec<u8>> {
    let mut received = Vec::with_capacity(script.len());
    for step in script {
        let mut buf = vec![0u8; step.request.len()];
        if stream.read_exact(&mut buf).is_err() {
            break;
        }
        received.push(buf);
        if !step.delay.is_zero() {
            thread::sleep(step.delay);
        }
        // The client may have hung up while the reply was held back
        if stream.write_all(&step.reply).and_then(|_| stream.flush()).is_err() {
            break;
        }
    }
    received
}

/// Assert the server saw exactly `expected`, in order
pub fn assert_requests(received: &[Vec<u8>], expected: &[&[u8]]) {
    let received: Vec<String> = received
        .iter()
        .map(|r| String::from_utf8_lossy(r).into_owned())
        .collect();
    let expected: Vec<String> = expected
        .iter()
        .map(|r| String::from_utf8_lossy(r).into_owned())
        .collect();
    assert_eq!(received, expected);
}
