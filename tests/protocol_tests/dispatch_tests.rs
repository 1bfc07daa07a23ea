//! Dispatch Tests
//!
//! Tests for mapping status words to replies and error kinds.

use bytes::Bytes;
use tubewire::protocol::{dispatch, expect, Command, Frame, Reply, Shape};
use tubewire::TubeError;

// =============================================================================
// Helper Functions
// =============================================================================

fn line(status: &str, fields: &[&str]) -> Frame {
    Frame::line(status, fields.iter().map(|f| f.to_string()).collect())
}

fn put() -> Command {
    Command::Put {
        priority: 0,
        delay: 0,
        ttr: 60,
        body: Bytes::from_static(b"x"),
    }
}

// =============================================================================
// Success Table Tests
// =============================================================================

#[test]
fn test_inserted_yields_id() {
    let reply = dispatch(&put(), line("INSERTED", &["17"])).unwrap();
    assert_eq!(reply, Reply::Count(17));
}

#[test]
fn test_reserved_yields_job() {
    let frame = Frame {
        status: "RESERVED".into(),
        fields: vec!["1".into(), "5".into()],
        body: Some(Bytes::from_static(b"hello")),
    };
    let reply = dispatch(&Command::Reserve, frame).unwrap();
    assert_eq!(
        reply,
        Reply::Job {
            id: 1,
            body: Bytes::from_static(b"hello")
        }
    );
}

#[test]
fn test_bury_accepts_bare_buried() {
    let reply = dispatch(&Command::Bury { id: 1, priority: 0 }, line("BURIED", &[])).unwrap();
    assert_eq!(reply, Reply::Empty);
}

#[test]
fn test_kick_and_kick_job_shapes() {
    assert_eq!(
        dispatch(&Command::Kick { bound: 5 }, line("KICKED", &["3"])).unwrap(),
        Reply::Count(3)
    );
    assert_eq!(
        dispatch(&Command::KickJob { id: 5 }, line("KICKED", &[])).unwrap(),
        Reply::Empty
    );
}

#[test]
fn test_using_yields_name() {
    let reply = dispatch(&Command::ListTubeUsed, line("USING", &["emails"])).unwrap();
    assert_eq!(reply, Reply::Name("emails".into()));
}

#[test]
fn test_body_bearing_statuses() {
    assert!(expect(&Command::Reserve).bears_body("RESERVED"));
    assert!(expect(&Command::PeekDelayed).bears_body("FOUND"));
    assert!(expect(&Command::StatsTube { tube: "t".into() }).bears_body("OK"));
    assert!(!expect(&Command::Reserve).bears_body("TIMED_OUT"));
    assert!(!expect(&Command::Delete { id: 1 }).bears_body("DELETED"));
    assert_eq!(expect(&Command::ListTubes).shape, Shape::Data);
}

#[test]
fn test_missing_id_field_is_framing_error() {
    let err = dispatch(&put(), line("INSERTED", &[])).unwrap_err();
    assert!(matches!(err, TubeError::Framing(_)));

    let err = dispatch(&put(), line("INSERTED", &["-1"])).unwrap_err();
    assert!(matches!(err, TubeError::Framing(_)));
}

// =============================================================================
// Error Vocabulary Tests
// =============================================================================

#[test]
fn test_error_vocabulary() {
    let cases = [
        ("BAD_FORMAT", "BadFormat"),
        ("DEADLINE_SOON", "DeadlineSoon"),
        ("DRAINING", "Draining"),
        ("EXPECTED_CRLF", "ExpectedCrlf"),
        ("INTERNAL_ERROR", "Internal"),
        ("JOB_TOO_BIG", "JobTooBig"),
        ("NOT_FOUND", "NotFound"),
        ("NOT_IGNORED", "NotIgnored"),
        ("OUT_OF_MEMORY", "OutOfMemory"),
        ("TIMED_OUT", "TimedOut"),
        ("UNKNOWN_COMMAND", "UnknownCommand"),
    ];

    for (status, kind) in cases {
        let err = dispatch(&Command::Reserve, line(status, &[])).unwrap_err();
        assert_eq!(format!("{:?}", err), kind, "{} mapped wrongly", status);
        assert!(!err.is_fatal(), "{} should not be fatal", status);
    }
}

#[test]
fn test_put_buried_carries_id() {
    let err = dispatch(&put(), line("BURIED", &["12"])).unwrap_err();
    assert!(matches!(err, TubeError::BuriedWithJobId(12)));
}

#[test]
fn test_put_buried_with_invalid_id_is_framing_error() {
    let err = dispatch(&put(), line("BURIED", &["abc"])).unwrap_err();
    assert!(matches!(err, TubeError::Framing(_)), "{:?}", err);
    assert!(err.is_fatal());
}

#[test]
fn test_release_buried_has_no_id() {
    let cmd = Command::Release {
        id: 1,
        priority: 0,
        delay: 0,
    };
    let err = dispatch(&cmd, line("BURIED", &[])).unwrap_err();
    assert!(matches!(err, TubeError::Buried));
}

#[test]
fn test_timed_out_is_distinguishable() {
    let err = dispatch(
        &Command::ReserveWithTimeout { timeout: 0 },
        line("TIMED_OUT", &[]),
    )
    .unwrap_err();
    assert!(err.is_timed_out());
    assert!(!err.is_fatal());
}

#[test]
fn test_unknown_status_carries_word() {
    let err = dispatch(&Command::Delete { id: 1 }, line("SOME_ERROR", &["1", "2"])).unwrap_err();
    match &err {
        TubeError::UnknownResponse { status, values } => {
            assert_eq!(status, "SOME_ERROR");
            assert_eq!(values, &["1", "2"]);
        }
        other => panic!("Expected UnknownResponse, got {:?}", other),
    }
    assert!(err.is_fatal());
}

#[test]
fn test_success_word_of_other_command_is_unknown() {
    // DELETED is valid protocol, but not a reply to touch
    let err = dispatch(&Command::Touch { id: 1 }, line("DELETED", &[])).unwrap_err();
    assert!(matches!(err, TubeError::UnknownResponse { .. }));
}
