use super::*;
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct Broken(&'static str);

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "broken: {}", self.0)
    }
}

impl Error for Broken {}

#[test]
fn display_starts_with_marker_and_cause() {
    let err = bailout(Broken("scope"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("[compiler panic] broken: scope"), "{rendered}");
}

#[test]
fn clues_accumulate_in_order() {
    let result: Result<(), FatalError> = Err(bailout("boom"));
    let err = result
        .clue(|| "while naming x")
        .clue(|| format!("in function {}", "main"))
        .unwrap_err();
    assert_eq!(err.clues(), "while naming x\nin function main\n");
    assert!(err.to_string().contains("while naming x\nin function main"));
}

#[test]
fn cause_is_downcastable() {
    let err = FatalError::new(Broken("kind"));
    assert_eq!(err.cause_as::<Broken>().map(|b| b.0), Some("kind"));
    assert!(err.source().is_some());
}

#[test]
fn fatal_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FatalError>();
}
