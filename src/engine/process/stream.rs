//! Relays engine output to the parent's stdout and stderr while the child
//! runs.

use std::io::{self, Read, Write};
use std::process::{Child, ExitStatus};
use std::thread;
use tracing::{debug, warn};

const CHUNK: usize = 8 * 1024;

/// What happened to one of the child's output streams.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct Relayed {
    /// Bytes read from the child.
    pub(super) bytes: u64,
    /// The parent stream stopped accepting output; later bytes were dropped.
    pub(super) truncated: bool,
}

/// Copy `source` into `sink` until end of stream.
///
/// After `sink` fails the rest of `source` is still read and discarded, so the
/// child never blocks on a full pipe.
pub(super) fn relay<R: Read, W: Write>(mut source: R, mut sink: W) -> io::Result<Relayed> {
    let mut buf = [0_u8; CHUNK];
    let mut relayed = Relayed::default();
    loop {
        let count = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        relayed.bytes = relayed
            .bytes
            .saturating_add(u64::try_from(count).unwrap_or(u64::MAX));
        if relayed.truncated {
            continue;
        }
        let chunk = buf.get(..count).unwrap_or_default();
        if sink.write_all(chunk).is_err() {
            relayed.truncated = true;
        }
    }
    if !relayed.truncated && sink.flush().is_err() {
        relayed.truncated = true;
    }
    Ok(relayed)
}

/// Wait for `child`, relaying its piped stdout and stderr on two threads that
/// are joined before the status is returned.
pub(super) fn wait_relaying(mut child: Child) -> io::Result<ExitStatus> {
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        reap(&mut child);
        return Err(io::Error::other(
            "engine process started without output pipes",
        ));
    };
    let out = thread::spawn(move || relay(stdout, io::stdout().lock()));
    let err = thread::spawn(move || relay(stderr, io::stderr().lock()));
    let status = child.wait()?;
    report("stdout", out.join());
    report("stderr", err.join());
    Ok(status)
}

fn report(stream: &str, outcome: thread::Result<io::Result<Relayed>>) {
    match outcome {
        Ok(Ok(relayed)) => debug!(
            stream,
            bytes = relayed.bytes,
            truncated = relayed.truncated,
            "engine output relayed"
        ),
        Ok(Err(err)) => warn!(stream, error = %err, "reading engine output failed"),
        Err(_) => warn!(stream, "engine output relay panicked"),
    }
}

fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(error = %err, "could not kill engine process");
    }
    if let Err(err) = child.wait() {
        debug!(error = %err, "could not reap engine process");
    }
}
