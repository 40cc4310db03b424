//! Integration tests for the pigeon crate
//!
//! These tests drive the full bootstrap and sign-in sequences against fake
//! backend and platform providers.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pigeon::api::{Api, ApiError, TokenPair};
use pigeon::models::{MembershipTier, MessageId, User, UserId};
use pigeon::platform::{
    BiometricPrompt, InMemorySecureStore, PurchaseProvider, SecureStore, keys,
};
use pigeon::session::{
    AppState, BootstrapOutcome, Services, bootstrap_with_timeout, complete_sign_in,
    set_biometric_unlock, sign_out, verify_pin,
};

fn make_user(has_pin: bool, auto_check_in: bool) -> User {
    User {
        id: UserId::new("u1"),
        email: "pat@example.com".to_string(),
        display_name: Some("Pat".to_string()),
        notifications_enabled: true,
        timezone: "America/New_York".to_string(),
        has_pin,
        auto_check_in,
        tier: MembershipTier {
            id: "free".to_string(),
            name: "Free".to_string(),
            daily_message_limit: Some(10),
            thread_history_days: Some(30),
        },
    }
}

/// How the fake backend answers the profile fetch
#[derive(Clone)]
enum MeBehavior {
    Ok(User),
    Unauthorized,
    Slow(Duration),
}

struct FakeApi {
    me: MeBehavior,
    fail_unread: bool,
    fail_check_in: bool,
    check_ins: Mutex<u32>,
    sign_outs: Mutex<u32>,
}

impl FakeApi {
    fn with_user(user: User) -> Self {
        Self {
            me: MeBehavior::Ok(user),
            fail_unread: false,
            fail_check_in: false,
            check_ins: Mutex::new(0),
            sign_outs: Mutex::new(0),
        }
    }

    fn unauthorized() -> Self {
        Self {
            me: MeBehavior::Unauthorized,
            ..Self::with_user(make_user(false, false))
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            me: MeBehavior::Slow(delay),
            ..Self::with_user(make_user(false, false))
        }
    }
}

impl Api for FakeApi {
    fn fetch_me(&self) -> Result<User, ApiError> {
        match &self.me {
            MeBehavior::Ok(user) => Ok(user.clone()),
            MeBehavior::Unauthorized => Err(ApiError::Unauthorized),
            MeBehavior::Slow(delay) => {
                thread::sleep(*delay);
                Ok(make_user(false, false))
            }
        }
    }

    fn sign_out(&self) -> Result<(), ApiError> {
        *self.sign_outs.lock().unwrap() += 1;
        Ok(())
    }

    fn verify_pin(&self, pin: &str) -> Result<(), ApiError> {
        if pin == "1234" {
            Ok(())
        } else {
            Err(ApiError::Api {
                status: 403,
                code: Some("invalid_pin".to_string()),
                message: "wrong pin".to_string(),
            })
        }
    }

    fn check_in(&self) -> Result<(), ApiError> {
        if self.fail_check_in {
            return Err(ApiError::Network {
                message: "offline".to_string(),
            });
        }
        *self.check_ins.lock().unwrap() += 1;
        Ok(())
    }

    fn unread_count(&self) -> Result<u32, ApiError> {
        if self.fail_unread {
            return Err(ApiError::Network {
                message: "offline".to_string(),
            });
        }
        Ok(7)
    }

    fn delete_message(&self, _id: &MessageId) -> Result<(), ApiError> {
        Ok(())
    }

    fn mark_read(&self, _id: &MessageId) -> Result<(), ApiError> {
        Ok(())
    }

    fn register_push_token(&self, _token: &str) -> Result<(), ApiError> {
        Ok(())
    }

    fn unregister_push_token(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

struct FakePurchases {
    entitlements: Vec<String>,
    fail_log_in: bool,
    log_outs: Mutex<u32>,
}

impl FakePurchases {
    fn premium() -> Self {
        Self {
            entitlements: vec!["premium".to_string()],
            fail_log_in: false,
            log_outs: Mutex::new(0),
        }
    }

    fn none() -> Self {
        Self {
            entitlements: Vec::new(),
            fail_log_in: false,
            log_outs: Mutex::new(0),
        }
    }
}

impl PurchaseProvider for FakePurchases {
    fn log_in(&self, _user_id: &UserId) -> anyhow::Result<()> {
        if self.fail_log_in {
            anyhow::bail!("sdk unavailable");
        }
        Ok(())
    }

    fn log_out(&self) -> anyhow::Result<()> {
        *self.log_outs.lock().unwrap() += 1;
        Ok(())
    }

    fn active_entitlements(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.entitlements.clone())
    }
}

struct FakeBiometrics {
    available: bool,
    passes: bool,
    challenges: Mutex<u32>,
}

impl FakeBiometrics {
    fn unavailable() -> Self {
        Self {
            available: false,
            passes: false,
            challenges: Mutex::new(0),
        }
    }

    fn passing() -> Self {
        Self {
            available: true,
            passes: true,
            challenges: Mutex::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            available: true,
            passes: false,
            challenges: Mutex::new(0),
        }
    }
}

impl BiometricPrompt for FakeBiometrics {
    fn is_available(&self) -> bool {
        self.available
    }

    fn challenge(&self, _reason: &str) -> anyhow::Result<bool> {
        *self.challenges.lock().unwrap() += 1;
        Ok(self.passes)
    }
}

struct Harness {
    state: Arc<AppState>,
    services: Services,
    api: Arc<FakeApi>,
    secure: Arc<InMemorySecureStore>,
    purchases: Arc<FakePurchases>,
    biometrics: Arc<FakeBiometrics>,
}

fn harness(api: FakeApi, purchases: FakePurchases, biometrics: FakeBiometrics) -> Harness {
    let api = Arc::new(api);
    let secure = Arc::new(InMemorySecureStore::new());
    let purchases = Arc::new(purchases);
    let biometrics = Arc::new(biometrics);
    let services = Services {
        api: api.clone(),
        secure: secure.clone(),
        purchases: purchases.clone(),
        biometrics: biometrics.clone(),
    };
    Harness {
        state: Arc::new(AppState::new()),
        services,
        api,
        secure,
        purchases,
        biometrics,
    }
}

fn store_tokens(secure: &InMemorySecureStore) {
    secure.set(keys::ACCESS_TOKEN, "at_stored").unwrap();
    secure.set(keys::REFRESH_TOKEN, "rt_stored").unwrap();
}

const DEADLINE: Duration = Duration::from_secs(5);

#[test]
fn test_bootstrap_without_stored_token_starts_signed_out() {
    let h = harness(
        FakeApi::with_user(make_user(false, false)),
        FakePurchases::none(),
        FakeBiometrics::unavailable(),
    );

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::SignedOut);
    assert_eq!(h.state.is_authenticated(), Some(false));
    assert!(!h.state.is_locked());
}

#[test]
fn test_bootstrap_with_rejected_token_signs_out_and_clears_tokens() {
    let h = harness(
        FakeApi::unauthorized(),
        FakePurchases::none(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::SignedOut);
    assert_eq!(h.state.is_authenticated(), Some(false));
    assert!(!h.state.is_locked());
    assert_eq!(h.secure.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(h.secure.get(keys::REFRESH_TOKEN).unwrap(), None);
}

#[test]
fn test_bootstrap_deadline_forces_sign_out() {
    let h = harness(
        FakeApi::slow(Duration::from_millis(500)),
        FakePurchases::none(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, Duration::from_millis(50));

    assert_eq!(outcome, BootstrapOutcome::SignedOut);
    assert_eq!(h.state.is_authenticated(), Some(false));
    assert_eq!(h.secure.get(keys::ACCESS_TOKEN).unwrap(), None);
}

#[test]
fn test_late_worker_cannot_repopulate_signed_out_state() {
    let h = harness(
        FakeApi::slow(Duration::from_millis(300)),
        FakePurchases::premium(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, Duration::from_millis(50));
    assert_eq!(outcome, BootstrapOutcome::SignedOut);

    // Let the abandoned worker run its reconciliation to completion; its
    // late writes must all land as no-ops against the cleared session
    thread::sleep(Duration::from_millis(500));

    assert_eq!(h.state.is_authenticated(), Some(false));
    assert!(h.state.current_user().is_none());
    assert!(!h.state.is_premium());
    assert_eq!(h.state.unread().count(), 0);
    assert!(!h.state.is_locked());
}

#[test]
fn test_bootstrap_happy_path_without_pin() {
    let h = harness(
        FakeApi::with_user(make_user(false, true)),
        FakePurchases::premium(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: false });
    assert_eq!(h.state.is_authenticated(), Some(true));
    assert!(h.state.is_premium());
    assert_eq!(h.state.unread().count(), 7);
    // auto_check_in was requested by the account
    assert_eq!(*h.api.check_ins.lock().unwrap(), 1);
}

#[test]
fn test_pin_user_without_opt_in_lands_on_pin_prompt() {
    let h = harness(
        FakeApi::with_user(make_user(true, false)),
        FakePurchases::none(),
        FakeBiometrics::passing(),
    );
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: true });
    assert!(h.state.is_locked());
    // Without the opt-in the challenge must never be presented
    assert_eq!(*h.biometrics.challenges.lock().unwrap(), 0);
}

#[test]
fn test_biometric_opt_in_with_passing_challenge_unlocks() {
    let h = harness(
        FakeApi::with_user(make_user(true, false)),
        FakePurchases::none(),
        FakeBiometrics::passing(),
    );
    store_tokens(&h.secure);
    set_biometric_unlock(h.secure.as_ref(), &UserId::new("u1"), true).unwrap();

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: false });
    assert!(!h.state.is_locked());
    assert_eq!(*h.biometrics.challenges.lock().unwrap(), 1);
}

#[test]
fn test_failed_biometric_challenge_falls_back_to_pin() {
    let h = harness(
        FakeApi::with_user(make_user(true, false)),
        FakePurchases::none(),
        FakeBiometrics::failing(),
    );
    store_tokens(&h.secure);
    set_biometric_unlock(h.secure.as_ref(), &UserId::new("u1"), true).unwrap();

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: true });
    assert!(h.state.is_locked());
}

#[test]
fn test_best_effort_failures_do_not_block_bootstrap() {
    let mut api = FakeApi::with_user(make_user(false, true));
    api.fail_unread = true;
    api.fail_check_in = true;
    let mut purchases = FakePurchases::none();
    purchases.fail_log_in = true;

    let h = harness(api, purchases, FakeBiometrics::unavailable());
    store_tokens(&h.secure);

    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: false });
    assert_eq!(h.state.is_authenticated(), Some(true));
    // The unread store recorded the failure without clobbering its value
    assert_eq!(h.state.unread().count(), 0);
    assert!(h.state.unread().last_error().is_some());
}

#[test]
fn test_complete_sign_in_persists_tokens_and_reconciles() {
    let h = harness(
        FakeApi::with_user(make_user(false, false)),
        FakePurchases::premium(),
        FakeBiometrics::unavailable(),
    );

    let tokens = TokenPair {
        access_token: "at_fresh".to_string(),
        refresh_token: "rt_fresh".to_string(),
    };
    let outcome = complete_sign_in(&h.state, &h.services, tokens).unwrap();

    assert_eq!(outcome, BootstrapOutcome::Ready { locked: false });
    assert_eq!(
        h.secure.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
        Some("at_fresh")
    );
    assert_eq!(
        h.secure.get(keys::REFRESH_TOKEN).unwrap().as_deref(),
        Some("rt_fresh")
    );
    assert!(h.state.is_premium());
}

#[test]
fn test_failed_sign_in_reconciliation_reverts_to_signed_out() {
    let h = harness(
        FakeApi::unauthorized(),
        FakePurchases::none(),
        FakeBiometrics::unavailable(),
    );

    let tokens = TokenPair {
        access_token: "at_fresh".to_string(),
        refresh_token: "rt_fresh".to_string(),
    };
    let result = complete_sign_in(&h.state, &h.services, tokens);

    assert!(result.is_err());
    assert_eq!(h.state.is_authenticated(), Some(false));
    assert_eq!(h.secure.get(keys::ACCESS_TOKEN).unwrap(), None);
}

#[test]
fn test_sign_out_clears_everything_and_notifies_collaborators() {
    let h = harness(
        FakeApi::with_user(make_user(false, false)),
        FakePurchases::premium(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);
    bootstrap_with_timeout(&h.state, &h.services, DEADLINE);
    assert_eq!(h.state.is_authenticated(), Some(true));

    sign_out(&h.state, &h.services);

    assert_eq!(h.state.is_authenticated(), Some(false));
    assert!(h.state.current_user().is_none());
    assert!(!h.state.is_premium());
    assert_eq!(h.secure.get(keys::ACCESS_TOKEN).unwrap(), None);
    assert_eq!(*h.api.sign_outs.lock().unwrap(), 1);
    assert_eq!(*h.purchases.log_outs.lock().unwrap(), 1);
}

#[test]
fn test_verify_pin_releases_the_lock() {
    let h = harness(
        FakeApi::with_user(make_user(true, false)),
        FakePurchases::none(),
        FakeBiometrics::unavailable(),
    );
    store_tokens(&h.secure);
    let outcome = bootstrap_with_timeout(&h.state, &h.services, DEADLINE);
    assert_eq!(outcome, BootstrapOutcome::Ready { locked: true });

    // A wrong PIN keeps the lock engaged
    assert!(verify_pin(&h.state, h.services.api.as_ref(), "0000").is_err());
    assert!(h.state.is_locked());

    verify_pin(&h.state, h.services.api.as_ref(), "1234").unwrap();
    assert!(!h.state.is_locked());
}
