//! Per-scan session state machine.
//!
//! One session tracks one operator's scanner screen. Every network call is
//! tagged with the sequence number current when it was issued; a reply whose
//! sequence no longer matches is discarded, so a slow validation for a
//! previous scan can never overwrite the state of the current one.

use chrono::NaiveDate;
use tracing::debug;

use domain::models::{EventSummary, GuestDetails};

use crate::error::ScannerError;
use crate::outcome::{AdmissionApi, CheckinOutcome, ValidateOutcome};

/// State of the scanner screen. Exhaustive; the UI renders exactly one.
#[derive(Debug, Clone)]
pub enum ScanState {
    /// Waiting for a scan.
    Idle,
    /// A validation call is in flight.
    Validating,
    /// Token validated; operator may confirm admission unless the guest is
    /// already inside.
    Valid {
        guest: GuestDetails,
        event: EventSummary,
        already_checked_in: bool,
    },
    /// The server does not recognize the token.
    Invalid { message: String },
    /// Right token, wrong calendar day.
    DateBlocked {
        event_date: NaiveDate,
        current_date: NaiveDate,
        message: String,
    },
    /// Validation could not be completed (transport fault); rescan.
    ValidationFailed { message: String },
    /// A commit call is in flight.
    Committing,
    /// Admission recorded. `already_checked_in` distinguishes "just admitted"
    /// from "was admitted earlier" for the terminal display; both are done.
    Committed {
        message: String,
        already_checked_in: bool,
    },
    /// Commit could not be completed (transport fault); retry re-submits the
    /// same token through the full commit path.
    CommitFailed { message: String },
}

/// Drives one scanner screen against an [`AdmissionApi`].
pub struct ScanSession<A> {
    api: A,
    seq: u64,
    token: Option<String>,
    state: ScanState,
}

impl<A: AdmissionApi> ScanSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            seq: 0,
            token: None,
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Back to idle. Bumps the sequence so any in-flight reply is stale.
    pub fn reset(&mut self) {
        self.seq += 1;
        self.token = None;
        self.state = ScanState::Idle;
    }

    /// Record a new scan and return the sequence tag for its validation call.
    pub fn begin_scan(&mut self, token: impl Into<String>) -> u64 {
        self.seq += 1;
        self.token = Some(token.into());
        self.state = ScanState::Validating;
        self.seq
    }

    /// Apply a validation reply. Ignored when `seq` is no longer current.
    pub fn apply_validation(&mut self, seq: u64, result: Result<ValidateOutcome, ScannerError>) {
        if seq != self.seq {
            debug!(seq, current = self.seq, "Discarding stale validation reply");
            return;
        }

        self.state = match result {
            Ok(ValidateOutcome::Valid {
                guest,
                event,
                qr_code,
            }) => ScanState::Valid {
                guest,
                event,
                already_checked_in: qr_code.is_used,
            },
            Ok(ValidateOutcome::Invalid { message }) => ScanState::Invalid { message },
            Ok(ValidateOutcome::WrongDay {
                event_date,
                current_date,
                message,
            }) => ScanState::DateBlocked {
                event_date,
                current_date,
                message,
            },
            Err(e) => ScanState::ValidationFailed {
                message: e.to_string(),
            },
        };
    }

    /// Start the commit for the current token.
    ///
    /// Permitted from `Valid { already_checked_in: false }` (operator
    /// confirm) and from `CommitFailed` (retry). Returns the sequence tag,
    /// or `None` when the current state does not allow committing.
    pub fn begin_commit(&mut self) -> Option<u64> {
        let allowed = matches!(
            self.state,
            ScanState::Valid {
                already_checked_in: false,
                ..
            } | ScanState::CommitFailed { .. }
        );
        if !allowed || self.token.is_none() {
            return None;
        }

        self.seq += 1;
        self.state = ScanState::Committing;
        Some(self.seq)
    }

    /// Apply a commit reply. Ignored when `seq` is no longer current.
    pub fn apply_commit(&mut self, seq: u64, result: Result<CheckinOutcome, ScannerError>) {
        if seq != self.seq {
            debug!(seq, current = self.seq, "Discarding stale commit reply");
            return;
        }

        self.state = match result {
            Ok(CheckinOutcome::CheckedIn { message, .. }) => ScanState::Committed {
                message,
                already_checked_in: false,
            },
            // A racing scanner got there first; the guest is inside either
            // way, so this renders as done rather than as a failure.
            Ok(CheckinOutcome::AlreadyCheckedIn { message, .. }) => ScanState::Committed {
                message,
                already_checked_in: true,
            },
            Ok(CheckinOutcome::Invalid { message }) => ScanState::Invalid { message },
            Ok(CheckinOutcome::WrongDay {
                event_date,
                current_date,
                message,
            }) => ScanState::DateBlocked {
                event_date,
                current_date,
                message,
            },
            Err(e) => ScanState::CommitFailed {
                message: e.to_string(),
            },
        };
    }

    /// Scan a token and wait for its validation.
    pub async fn scan(&mut self, token: impl Into<String>) -> &ScanState {
        let token = token.into();
        let seq = self.begin_scan(token.clone());
        let result = self.api.validate_token(&token).await;
        self.apply_validation(seq, result);
        &self.state
    }

    /// Confirm the current scan, committing the admission.
    pub async fn confirm(&mut self) -> &ScanState {
        let Some(seq) = self.begin_commit() else {
            return &self.state;
        };
        // begin_commit only returns a tag when a token is held.
        let token = self.token.clone().unwrap_or_default();
        let result = self.api.commit_token(&token).await;
        self.apply_commit(seq, result);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CheckedInGuest;
    use chrono::Utc;
    use domain::models::{CheckInMethod, CheckInRecord, TokenState};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FakeApi {
        validations: Mutex<VecDeque<Result<ValidateOutcome, ScannerError>>>,
        commits: Mutex<VecDeque<Result<CheckinOutcome, ScannerError>>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                validations: Mutex::new(VecDeque::new()),
                commits: Mutex::new(VecDeque::new()),
            }
        }

        fn queue_validation(&self, result: Result<ValidateOutcome, ScannerError>) {
            self.validations.lock().unwrap().push_back(result);
        }

        fn queue_commit(&self, result: Result<CheckinOutcome, ScannerError>) {
            self.commits.lock().unwrap().push_back(result);
        }
    }

    #[async_trait::async_trait]
    impl AdmissionApi for FakeApi {
        async fn validate_token(&self, _token: &str) -> Result<ValidateOutcome, ScannerError> {
            self.validations
                .lock()
                .unwrap()
                .pop_front()
                .expect("no queued validation")
        }

        async fn commit_token(&self, _token: &str) -> Result<CheckinOutcome, ScannerError> {
            self.commits
                .lock()
                .unwrap()
                .pop_front()
                .expect("no queued commit")
        }
    }

    fn guest_details(already: bool) -> GuestDetails {
        GuestDetails {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone_number: None,
            company: None,
            has_checked_in: already,
            checked_in_at: already.then(Utc::now),
        }
    }

    fn event_summary() -> EventSummary {
        EventSummary {
            id: Uuid::new_v4(),
            title: "Launch Party".to_string(),
            event_date: Utc::now(),
            location: "Berlin".to_string(),
            venue_name: None,
        }
    }

    fn valid_outcome(already: bool) -> ValidateOutcome {
        ValidateOutcome::Valid {
            guest: guest_details(already),
            event: event_summary(),
            qr_code: TokenState {
                is_used: already,
                used_at: already.then(Utc::now),
            },
        }
    }

    fn checked_in_outcome() -> CheckinOutcome {
        let guest_id = Uuid::new_v4();
        CheckinOutcome::CheckedIn {
            message: "Jane Doe checked in successfully".to_string(),
            guest: CheckedInGuest {
                id: guest_id,
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                checked_in_at: Some(Utc::now()),
            },
            checkin: CheckInRecord {
                id: Uuid::new_v4(),
                guest_id,
                checked_in_by: Uuid::new_v4(),
                method: CheckInMethod::QrScan,
                notes: None,
                created_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_happy_path_transitions() {
        let api = FakeApi::new();
        api.queue_validation(Ok(valid_outcome(false)));
        api.queue_commit(Ok(checked_in_outcome()));

        let mut session = ScanSession::new(api);
        assert!(matches!(session.state(), ScanState::Idle));

        let state = session.scan("adm_abc").await;
        assert!(matches!(
            state,
            ScanState::Valid {
                already_checked_in: false,
                ..
            }
        ));

        let state = session.confirm().await;
        match state {
            ScanState::Committed {
                message,
                already_checked_in,
            } => {
                assert_eq!(message, "Jane Doe checked in successfully");
                assert!(!already_checked_in);
            }
            other => panic!("Expected Committed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_validation_reply_discarded() {
        let api = FakeApi::new();
        let mut session = ScanSession::new(api);

        let first_seq = session.begin_scan("adm_first");
        let second_seq = session.begin_scan("adm_second");

        // The reply for the first scan arrives late; it must not clobber
        // the state of the second scan.
        session.apply_validation(first_seq, Ok(valid_outcome(false)));
        assert!(matches!(session.state(), ScanState::Validating));

        session.apply_validation(
            second_seq,
            Ok(ValidateOutcome::Invalid {
                message: "Invalid QR code".to_string(),
            }),
        );
        assert!(matches!(session.state(), ScanState::Invalid { .. }));
    }

    #[tokio::test]
    async fn test_reset_makes_inflight_reply_stale() {
        let api = FakeApi::new();
        let mut session = ScanSession::new(api);

        let seq = session.begin_scan("adm_abc");
        session.reset();

        session.apply_validation(seq, Ok(valid_outcome(false)));
        assert!(matches!(session.state(), ScanState::Idle));
    }

    #[tokio::test]
    async fn test_commit_transport_failure_then_retry() {
        let api = FakeApi::new();
        api.queue_validation(Ok(valid_outcome(false)));
        api.queue_commit(Err(ScannerError::UnexpectedStatus(502)));
        api.queue_commit(Ok(checked_in_outcome()));

        let mut session = ScanSession::new(api);
        session.scan("adm_abc").await;

        let state = session.confirm().await;
        assert!(matches!(state, ScanState::CommitFailed { .. }));

        // Retry goes through the full commit path again.
        let state = session.confirm().await;
        assert!(matches!(
            state,
            ScanState::Committed {
                already_checked_in: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_already_checked_in_commit_is_terminal_not_failure() {
        let api = FakeApi::new();
        api.queue_validation(Ok(valid_outcome(false)));
        api.queue_commit(Ok(CheckinOutcome::AlreadyCheckedIn {
            message: "This QR code has already been used".to_string(),
            guest: guest_details(true),
            checked_in_at: Some(Utc::now()),
        }));

        let mut session = ScanSession::new(api);
        session.scan("adm_abc").await;

        let state = session.confirm().await;
        assert!(matches!(
            state,
            ScanState::Committed {
                already_checked_in: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_confirm_refused_for_already_admitted_guest() {
        let api = FakeApi::new();
        api.queue_validation(Ok(valid_outcome(true)));

        let mut session = ScanSession::new(api);
        let state = session.scan("adm_abc").await;
        assert!(matches!(
            state,
            ScanState::Valid {
                already_checked_in: true,
                ..
            }
        ));

        // No commit is queued; confirm must not reach the API.
        let state = session.confirm().await;
        assert!(matches!(
            state,
            ScanState::Valid {
                already_checked_in: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_wrong_day_scan_blocks() {
        let api = FakeApi::new();
        api.queue_validation(Ok(ValidateOutcome::WrongDay {
            event_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            current_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            message: "Check-in is only allowed on the event date".to_string(),
        }));

        let mut session = ScanSession::new(api);
        let state = session.scan("adm_abc").await;
        match state {
            ScanState::DateBlocked {
                event_date,
                current_date,
                ..
            } => {
                assert_eq!(event_date.to_string(), "2024-02-15");
                assert_eq!(current_date.to_string(), "2024-02-14");
            }
            other => panic!("Expected DateBlocked, got {:?}", other),
        }

        // A blocked scan has nothing to confirm.
        assert!(session.begin_commit().is_none());
    }

    #[tokio::test]
    async fn test_validation_transport_failure() {
        let api = FakeApi::new();
        api.queue_validation(Err(ScannerError::SessionExpired));

        let mut session = ScanSession::new(api);
        let state = session.scan("adm_abc").await;
        assert!(matches!(state, ScanState::ValidationFailed { .. }));
    }
}
