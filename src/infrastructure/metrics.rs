//! Prometheus metrics for the registration flow.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
  pub static ref REGISTRY: Registry = Registry::new_custom(Some("shp".to_string()), None)
    .expect("metric namespace is a valid prometheus identifier");
  pub static ref ACCOUNTS_REGISTERED: IntCounter = {
    let counter = IntCounter::new("accounts_registered_total", "Accounts created by sign-up")
      .expect("valid counter definition");
    REGISTRY
      .register(Box::new(counter.clone()))
      .expect("counter registered once");
    counter
  };
  pub static ref REGISTRATION_FAILURES: IntCounterVec = {
    let counter = IntCounterVec::new(
      Opts::new(
        "registration_failures_total",
        "Sign-up attempts that ended in an error, by reason",
      ),
      &["reason"],
    )
    .expect("valid counter definition");
    REGISTRY
      .register(Box::new(counter.clone()))
      .expect("counter registered once");
    counter
  };
}

/// Records the outcome of one registration attempt
pub fn record_registration(outcome: Result<(), &'static str>) {
  match outcome {
    Ok(()) => ACCOUNTS_REGISTERED.inc(),
    Err(reason) => REGISTRATION_FAILURES.with_label_values(&[reason]).inc(),
  }
}

/// Renders every registered metric in the Prometheus text format
pub fn render() -> Result<String, prometheus::Error> {
  // Touch the lazies so an idle process still exports zeroed series
  lazy_static::initialize(&ACCOUNTS_REGISTERED);
  lazy_static::initialize(&REGISTRATION_FAILURES);

  let mut buffer = Vec::new();
  TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;

  String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
