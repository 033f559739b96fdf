mod common;

use common::{drive, harness};
use dropin::domain::event::{ChannelKey, CheckoutEvent};
use dropin::domain::lifecycle::HostState;
use dropin::domain::outcome::{CheckoutOutcome, Disposition, ErrorCategory};
use dropin::domain::redirect::RedirectResponse;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
enum Op {
    Resume,
    Pause,
    Analytics(String),
    Publish(CheckoutOutcome),
    StageRedirect(RedirectResponse),
}

fn random_outcome(rng: &mut StdRng) -> CheckoutOutcome {
    match rng.gen_range(0..3) {
        0 => CheckoutOutcome::success(format!("nonce-{}", rng.gen_range(0..1000)), None),
        1 => CheckoutOutcome::UserCanceled,
        _ => CheckoutOutcome::failure(ErrorCategory::Server, "bad gateway"),
    }
}

fn random_ops(rng: &mut StdRng) -> Vec<Op> {
    let mut ops: Vec<Op> = (0..rng.gen_range(1..20))
        .map(|i| match rng.gen_range(0..4) {
            0 => Op::Resume,
            1 => Op::Pause,
            2 => Op::Analytics(format!("event-{i}")),
            _ => Op::Publish(random_outcome(rng)),
        })
        .collect();

    if rng.gen_bool(0.5) {
        let redirect = if rng.gen_bool(0.5) {
            RedirectResponse::canceled()
        } else {
            RedirectResponse::success(r#"{"nonce":"redirected"}"#)
        };
        ops.push(Op::StageRedirect(redirect));
    }
    ops.shuffle(rng);
    ops
}

/// Replays `ops` against a host and against a simple model, then compares.
async fn check(ops: Vec<Op>) {
    let h = harness();
    drive(&h.host, &[HostState::Created, HostState::Started]).await;

    let mut resumed = false;
    let mut staged: Option<Disposition> = None;
    let mut expected: Option<Disposition> = None;
    let mut expected_analytics = Vec::new();

    for op in ops.clone() {
        match op {
            Op::Resume => {
                h.host.on_state_changed(HostState::Resumed).await;
                if !resumed {
                    resumed = true;
                    if let Some(disposition) = staged.take() {
                        expected.get_or_insert(disposition);
                    }
                }
            }
            Op::Pause => {
                h.host.on_state_changed(HostState::Paused).await;
                resumed = false;
            }
            Op::Analytics(name) => {
                h.channel
                    .publish(ChannelKey::DROP_IN_EVENT, CheckoutEvent::analytics(&name));
                if resumed {
                    expected_analytics.push(name);
                }
            }
            Op::Publish(outcome) => {
                let disposition = outcome.disposition();
                h.channel
                    .publish(ChannelKey::DROP_IN_EVENT, CheckoutEvent::outcome(outcome));
                if resumed {
                    expected.get_or_insert(disposition);
                }
            }
            Op::StageRedirect(response) => {
                staged = Some(response.clone().into_outcome().unwrap().disposition());
                h.client.stage_redirect(response).await;
            }
        }
    }

    let results = h.completion.results();
    assert!(results.len() <= 1, "finalized more than once for {ops:?}");
    assert_eq!(
        results.first().map(|r| r.disposition),
        expected,
        "wrong disposition for {ops:?}"
    );

    let sent: Vec<String> = h
        .client
        .analytics_events()
        .into_iter()
        .filter(|name| name.starts_with("event-"))
        .collect();
    assert_eq!(sent, expected_analytics, "analytics mismatch for {ops:?}");
}

#[tokio::test]
async fn test_random_interleavings_finalize_at_most_once() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let ops = random_ops(&mut rng);
        check(ops).await;
    }
}

#[tokio::test]
async fn test_both_orders_of_two_sources() {
    let redirect = RedirectResponse::success(r#"{"nonce":"redirected"}"#);
    let channel = CheckoutOutcome::UserCanceled;

    // Redirect resolved on resume, child reports afterwards.
    check(vec![
        Op::StageRedirect(redirect.clone()),
        Op::Resume,
        Op::Publish(channel.clone()),
    ])
    .await;

    // Child reports first, redirect resolved on the next resume.
    check(vec![
        Op::Resume,
        Op::Publish(channel),
        Op::StageRedirect(redirect),
        Op::Pause,
        Op::Resume,
    ])
    .await;
}
