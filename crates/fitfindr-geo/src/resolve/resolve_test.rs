use std::time::Duration;

use uuid::Uuid;

use super::*;
use crate::fake::FakeProvider;

fn austin_gym() -> AddressRecord {
    AddressRecord {
        line1: "1800 E 6th Street".to_string(),
        line2: Some("Suite 100".to_string()),
        city: "Austin".to_string(),
        state: "TX".to_string(),
        postal_code: "78702".to_string(),
        country: "USA".to_string(),
    }
}

const FULL: &str = "1800 E 6th Street, Suite 100, Austin, TX, 78702, USA";
const NO_LINE2: &str = "1800 E 6th Street, Austin, TX, 78702, USA";
const CITY_STATE_POSTAL: &str = "Austin, TX, 78702";
const CITY_STATE: &str = "Austin, TX";

fn instant_policy() -> ResolvePolicy {
    ResolvePolicy {
        formats: AddressFormat::ALL.to_vec(),
        pacing: Pacing::none(),
    }
}

#[derive(Default)]
struct RecordingSink {
    saved: Vec<(Uuid, Coordinates)>,
    reject: Option<Uuid>,
}

impl CoordinateSink for RecordingSink {
    type Error = String;

    fn save_coordinates(&mut self, id: Uuid, coordinates: Coordinates) -> Result<(), String> {
        if self.reject == Some(id) {
            return Err("disk full".to_string());
        }
        self.saved.push((id, coordinates));
        Ok(())
    }
}

#[tokio::test]
async fn falls_back_to_city_state_after_three_misses() {
    let geocoder = Geocoder::new(FakeProvider::new().hit(CITY_STATE, 30.2672, -97.7431));
    let resolver = Resolver::new(&geocoder, instant_policy());

    let outcome = resolver.resolve_one(&austin_gym()).await;

    match outcome {
        GeocodeOutcome::Success { address_used, .. } => assert_eq!(address_used, CITY_STATE),
        GeocodeOutcome::Failure { reason } => panic!("expected success, got {reason}"),
    }
    assert_eq!(
        geocoder.provider().queries(),
        vec![FULL, NO_LINE2, CITY_STATE_POSTAL, CITY_STATE]
    );
}

#[tokio::test]
async fn first_matching_format_short_circuits() {
    let geocoder = Geocoder::new(FakeProvider::new().hit(FULL, 30.262, -97.72));
    let resolver = Resolver::new(&geocoder, instant_policy());

    let outcome = resolver.resolve_one(&austin_gym()).await;

    assert!(outcome.is_success());
    assert_eq!(geocoder.provider().queries(), vec![FULL]);
}

#[tokio::test]
async fn every_format_failing_tries_each_once_in_order() {
    let geocoder = Geocoder::new(FakeProvider::new().fail(NO_LINE2));
    let resolver = Resolver::new(&geocoder, instant_policy());

    let outcome = resolver.resolve_one(&austin_gym()).await;

    assert_eq!(
        outcome,
        GeocodeOutcome::Failure {
            reason: FailureReason::AllFormatsExhausted { attempts: 4 }
        }
    );
    assert_eq!(
        geocoder.provider().queries(),
        vec![FULL, NO_LINE2, CITY_STATE_POSTAL, CITY_STATE]
    );
}

#[tokio::test]
async fn blank_formats_are_skipped() {
    let address = AddressRecord {
        city: "Austin".to_string(),
        state: "TX".to_string(),
        ..AddressRecord::default()
    };
    let geocoder = Geocoder::new(FakeProvider::new());
    let resolver = Resolver::new(&geocoder, instant_policy());

    let outcome = resolver.resolve_one(&address).await;

    // Three formats collapse to the same "Austin, TX" string; each is still tried.
    assert_eq!(
        outcome,
        GeocodeOutcome::Failure {
            reason: FailureReason::AllFormatsExhausted { attempts: 4 }
        }
    );
    assert_eq!(geocoder.provider().queries(), vec![CITY_STATE; 4]);
}

#[tokio::test]
async fn empty_address_fails_without_network() {
    let geocoder = Geocoder::new(FakeProvider::new());
    let resolver = Resolver::new(&geocoder, instant_policy());

    let outcome = resolver.resolve_one(&AddressRecord::default()).await;

    assert_eq!(
        outcome,
        GeocodeOutcome::Failure {
            reason: FailureReason::NoUsableAddress
        }
    );
    assert!(geocoder.provider().queries().is_empty());
}

#[tokio::test]
async fn custom_format_list_is_respected() {
    let geocoder = Geocoder::new(FakeProvider::new());
    let policy = ResolvePolicy {
        formats: vec![AddressFormat::CityState],
        pacing: Pacing::none(),
    };
    let resolver = Resolver::new(&geocoder, policy);

    resolver.resolve_one(&austin_gym()).await;

    assert_eq!(geocoder.provider().queries(), vec![CITY_STATE]);
}

#[tokio::test(start_paused = true)]
async fn attempts_are_paced_but_not_after_the_last() {
    let geocoder = Geocoder::new(FakeProvider::new());
    let resolver = Resolver::new(&geocoder, ResolvePolicy::default());
    let start = tokio::time::Instant::now();

    resolver.resolve_one(&austin_gym()).await;

    let gaps: Vec<Duration> = geocoder
        .provider()
        .call_times()
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    assert_eq!(gaps.len(), 3);
    assert!(gaps.iter().all(|gap| *gap >= Duration::from_millis(500)));
    assert!(start.elapsed() < Duration::from_millis(1600));
}

#[tokio::test(start_paused = true)]
async fn resolve_many_paces_entities_and_keeps_order() {
    let dallas = AddressRecord {
        city: "Dallas".to_string(),
        state: "TX".to_string(),
        ..AddressRecord::default()
    };
    let geocoder = Geocoder::new(
        FakeProvider::new()
            .hit(FULL, 30.262, -97.72)
            .hit("Dallas, TX", 32.7767, -96.797),
    );
    let policy = ResolvePolicy {
        formats: AddressFormat::ALL.to_vec(),
        pacing: Pacing::from_millis(0, 1000),
    };
    let resolver = Resolver::new(&geocoder, policy);

    let outcomes = resolver
        .resolve_many(&[austin_gym(), AddressRecord::default(), dallas])
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_success());
    assert!(!outcomes[1].is_success());
    assert!((outcomes[2].coordinates().unwrap().latitude() - 32.7767).abs() < 1e-9);

    let times = geocoder.provider().call_times();
    assert_eq!(times.len(), 2);
    // Two entity gaps separate the first and last calls, including the
    // blank address that made no call of its own.
    assert!(times[1] - times[0] >= Duration::from_millis(2000));
}

#[tokio::test]
async fn run_batch_saves_successes_and_reports_failures() {
    let geocoder = Geocoder::new(FakeProvider::new().hit(CITY_STATE, 30.2672, -97.7431));
    let resolver = Resolver::new(&geocoder, instant_policy());
    let targets = vec![
        GeocodeTarget {
            id: Uuid::new_v4(),
            name: "Eastside Strength Lab".to_string(),
            address: austin_gym(),
        },
        GeocodeTarget {
            id: Uuid::new_v4(),
            name: "Nowhere".to_string(),
            address: AddressRecord::default(),
        },
    ];
    let mut sink = RecordingSink::default();

    let report = resolver.run_batch(&targets, &mut sink).await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(sink.saved.len(), 1);
    assert_eq!(sink.saved[0].0, targets[0].id);
    assert_eq!(report.entries[0].name, "Eastside Strength Lab");
    assert_eq!(report.entries[1].id, targets[1].id);
}

#[tokio::test]
async fn run_batch_records_sink_failures_and_continues() {
    let geocoder = Geocoder::new(FakeProvider::new().hit(CITY_STATE, 30.2672, -97.7431));
    let resolver = Resolver::new(&geocoder, instant_policy());
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let targets: Vec<_> = [first, second]
        .into_iter()
        .map(|id| GeocodeTarget {
            id,
            name: "gym".to_string(),
            address: austin_gym(),
        })
        .collect();
    let mut sink = RecordingSink {
        reject: Some(first),
        ..RecordingSink::default()
    };

    let report = resolver.run_batch(&targets, &mut sink).await;

    assert_eq!(report.entries[0].persist_error.as_deref(), Some("disk full"));
    assert!(report.entries[0].outcome.is_success());
    assert!(report.entries[1].is_success());
    assert_eq!(report.succeeded(), 1);
    assert_eq!(sink.saved, vec![(second, report.entries[1].outcome.coordinates().unwrap())]);
}

#[tokio::test(start_paused = true)]
async fn run_batch_paces_entities_like_resolve_many() {
    let geocoder = Geocoder::new(
        FakeProvider::new()
            .hit(FULL, 30.262, -97.72)
            .hit("Dallas, TX", 32.7767, -96.797),
    );
    let policy = ResolvePolicy {
        formats: AddressFormat::ALL.to_vec(),
        pacing: Pacing::from_millis(0, 1000),
    };
    let resolver = Resolver::new(&geocoder, policy);
    let targets: Vec<_> = [
        austin_gym(),
        AddressRecord::default(),
        AddressRecord {
            city: "Dallas".to_string(),
            state: "TX".to_string(),
            ..AddressRecord::default()
        },
    ]
    .into_iter()
    .map(|address| GeocodeTarget {
        id: Uuid::new_v4(),
        name: address.city.clone(),
        address,
    })
    .collect();
    let mut sink = RecordingSink::default();
    let start = tokio::time::Instant::now();

    let report = resolver.run_batch(&targets, &mut sink).await;

    assert_eq!(report.succeeded(), 2);
    let times = geocoder.provider().call_times();
    assert_eq!(times.len(), 2);
    assert!(times[1] - times[0] >= Duration::from_millis(2000));
    // No pause after the last target.
    assert!(start.elapsed() < Duration::from_millis(3000));
}

#[test]
fn outcome_serializes_with_status_tag() {
    let failure = GeocodeOutcome::Failure {
        reason: FailureReason::AllFormatsExhausted { attempts: 2 },
    };
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["status"], "failure");
    assert_eq!(json["reason"]["kind"], "all_formats_exhausted");
    assert_eq!(json["reason"]["attempts"], 2);
}
