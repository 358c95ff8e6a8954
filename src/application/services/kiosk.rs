//! Kiosk scan processor
//!
//! Entry point for every physical scan: turns whatever the scanner sent
//! into a token string, then hands it to the transactional scan gateway.

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainResult, RepositoryProvider, ScanOutcome};

/// Label recorded when the kiosk does not identify itself.
pub const DEFAULT_KIOSK_LABEL: &str = "Tablet Kiosk";

pub struct KioskService {
    repos: Arc<dyn RepositoryProvider>,
    default_label: String,
}

impl KioskService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self::with_default_label(repos, DEFAULT_KIOSK_LABEL)
    }

    pub fn with_default_label(
        repos: Arc<dyn RepositoryProvider>,
        default_label: impl Into<String>,
    ) -> Self {
        Self {
            repos,
            default_label: default_label.into(),
        }
    }

    /// Process one scan. Never mutates state for rejected tokens; the
    /// accepted path commits booking + token + usage log together.
    pub async fn scan(
        &self,
        raw_input: &str,
        kiosk_label: Option<&str>,
    ) -> DomainResult<ScanOutcome> {
        let token = resolve_token(raw_input);
        let label = kiosk_label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_label);

        info!(raw = raw_input, token = %token, kiosk_label = label, "Kiosk scan attempt");

        let outcome = self.repos.scans().commit_scan(&token, label).await?;

        match &outcome {
            ScanOutcome::Completed(transition) => {
                info!(
                    booking_id = transition.booking.id,
                    action = transition.action.label(),
                    "Kiosk scan committed"
                );
                metrics::counter!("kiosk_scans_total", "result" => transition.action.label())
                    .increment(1);
            }
            ScanOutcome::Rejected(rejection) => {
                info!(token = %token, reason = rejection.tag(), "Kiosk scan rejected");
                metrics::counter!("kiosk_scans_total", "result" => rejection.tag()).increment(1);
            }
        }

        Ok(outcome)
    }
}

/// Extract a token from raw scanner input.
///
/// Scanners may deliver a bare token, a full URL, or the token buried in
/// prefix/suffix noise. Resolution order: `token=` query parameter, then
/// the first embedded UUID, then the trimmed input as-is.
pub fn resolve_token(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(token) = token_query_param(raw) {
        return token;
    }

    if let Some(uuid) = embedded_uuid(raw) {
        return uuid;
    }

    raw.to_string()
}

fn token_query_param(raw: &str) -> Option<String> {
    let rest = &raw[raw.find("token=")? + "token=".len()..];
    let end = rest.find(['&', '#']).unwrap_or(rest.len());
    let value = percent_decode(&rest[..end]);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// First version-1-5 UUID found anywhere in the input.
fn embedded_uuid(raw: &str) -> Option<String> {
    const LEN: usize = 36;
    let bytes = raw.as_bytes();
    if bytes.len() < LEN {
        return None;
    }
    (0..=bytes.len() - LEN)
        .map(|i| &bytes[i..i + LEN])
        .find(|w| is_uuid(w))
        .map(|w| String::from_utf8_lossy(w).into_owned())
}

fn is_uuid(w: &[u8]) -> bool {
    debug_assert_eq!(w.len(), 36);
    for (i, &b) in w.iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if b != b'-' {
                    return false;
                }
            }
            // version nibble: 1-5
            14 => {
                if !(b'1'..=b'5').contains(&b) {
                    return false;
                }
            }
            // variant nibble: 8, 9, a or b
            19 => {
                if !matches!(b, b'8' | b'9' | b'a' | b'b' | b'A' | b'B') {
                    return false;
                }
            }
            _ => {
                if !b.is_ascii_hexdigit() {
                    return false;
                }
            }
        }
    }
    true
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::application::authorization::{Actor, RoleSet};
    use crate::application::services::booking::{BookingService, NewBooking};
    use crate::application::services::qr::QrService;
    use crate::application::services::test_support::{seed_catalog, setup_repos, Seed};
    use crate::domain::{BookingStatus, QrToken, ScanAction, ScanRejection};

    // -- token resolution ------------------------------------------------

    #[test]
    fn resolves_token_query_parameter() {
        let raw = "https://labs.example.edu/kiosk/scan?token=ABCD-1234-ef56&x=1";
        assert_eq!(resolve_token(raw), "ABCD-1234-ef56");
    }

    #[test]
    fn resolves_percent_encoded_token_parameter() {
        assert_eq!(
            resolve_token("https://h/scan?token=ab%2Dcd%20ef"),
            "ab-cd ef"
        );
    }

    #[test]
    fn extracts_uuid_from_surrounding_noise() {
        let raw = "SCAN:>> 7f9c24e8-3b12-4b9f-a1d4-0f2c66c1a2b3 <<END";
        assert_eq!(resolve_token(raw), "7f9c24e8-3b12-4b9f-a1d4-0f2c66c1a2b3");
    }

    #[test]
    fn uuid_with_wrong_version_is_not_extracted() {
        // version nibble 7 is outside 1-5
        let raw = "xx 7f9c24e8-3b12-7b9f-a1d4-0f2c66c1a2b3 yy";
        assert_eq!(resolve_token(raw), raw.trim());
    }

    #[test]
    fn passes_through_bare_input_trimmed() {
        assert_eq!(resolve_token("  some-opaque-token  "), "some-opaque-token");
    }

    #[test]
    fn empty_token_parameter_falls_back() {
        let raw = "https://h/scan?token=&uuid=7f9c24e8-3b12-4b9f-a1d4-0f2c66c1a2b3";
        assert_eq!(resolve_token(raw), "7f9c24e8-3b12-4b9f-a1d4-0f2c66c1a2b3");
    }

    // -- scan transitions ------------------------------------------------

    struct Fixture {
        repos: std::sync::Arc<dyn crate::domain::RepositoryProvider>,
        seed: Seed,
        student: Actor,
        staff: Actor,
    }

    async fn fixture() -> Fixture {
        let repos = setup_repos().await;
        let seed = seed_catalog(repos.as_ref()).await;
        let student = Actor::new(seed.student_id, "Sam", RoleSet::from_names(["Student"]));
        let staff = Actor::new(seed.staff_id, "Dana", RoleSet::from_names(["LabStaff"]));
        Fixture {
            repos,
            seed,
            student,
            staff,
        }
    }

    async fn confirmed_booking(fx: &Fixture) -> i64 {
        let bookings = BookingService::new(fx.repos.clone());
        let booking = bookings
            .create(
                &fx.student,
                NewBooking {
                    lab_id: fx.seed.lab_id,
                    equipment_id: Some(fx.seed.microscope_id),
                    title: None,
                    starts_at: Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap(),
                    ends_at: Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap(),
                    notes: None,
                },
            )
            .await
            .unwrap();
        bookings.approve(&fx.staff, booking.id).await.unwrap();
        booking.id
    }

    #[tokio::test]
    async fn full_checkout_and_return_cycle() {
        let fx = fixture().await;
        let booking_id = confirmed_booking(&fx).await;
        let qr = QrService::new(fx.repos.clone());
        let kiosk = KioskService::new(fx.repos.clone());

        // first scan: equipment leaves the lab
        let token = qr.issue(&fx.student, booking_id, Some(15)).await.unwrap();
        let outcome = kiosk.scan(&token.token, None).await.unwrap();
        let transition = match outcome {
            ScanOutcome::Completed(t) => t,
            ScanOutcome::Rejected(r) => panic!("scan rejected: {:?}", r),
        };
        assert_eq!(transition.action, ScanAction::CheckIn);
        assert_eq!(transition.booking.status, BookingStatus::CheckedOut);
        assert_eq!(transition.summary.student.as_deref(), Some("Sam Student"));
        assert_eq!(transition.summary.equipment.as_deref(), Some("Microscope"));

        let open = fx
            .repos
            .usage_logs()
            .find_open_for_booking(booking_id)
            .await
            .unwrap();
        assert!(open.is_some(), "check-in must leave one open usage log");
        assert_eq!(open.unwrap().kiosk_label.as_deref(), Some(DEFAULT_KIOSK_LABEL));

        // second scan with a fresh token: equipment comes back
        let token = qr.issue(&fx.student, booking_id, Some(15)).await.unwrap();
        let outcome = kiosk.scan(&token.token, Some("Front Desk")).await.unwrap();
        let transition = match outcome {
            ScanOutcome::Completed(t) => t,
            ScanOutcome::Rejected(r) => panic!("scan rejected: {:?}", r),
        };
        assert_eq!(transition.action, ScanAction::CheckOut);
        assert_eq!(transition.booking.status, BookingStatus::Returned);

        assert!(fx
            .repos
            .usage_logs()
            .find_open_for_booking(booking_id)
            .await
            .unwrap()
            .is_none());
        let logs = fx.repos.usage_logs().list_for_booking(booking_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].checked_out_at.is_some());
    }

    #[tokio::test]
    async fn token_is_single_use() {
        let fx = fixture().await;
        let booking_id = confirmed_booking(&fx).await;
        let qr = QrService::new(fx.repos.clone());
        let kiosk = KioskService::new(fx.repos.clone());

        let token = qr.issue(&fx.student, booking_id, Some(15)).await.unwrap();
        assert!(matches!(
            kiosk.scan(&token.token, None).await.unwrap(),
            ScanOutcome::Completed(_)
        ));

        // replaying the consumed token is refused and changes nothing
        let outcome = kiosk.scan(&token.token, None).await.unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Rejected(ScanRejection::ExpiredOrUsed)
        ));
        let booking = fx.repos.bookings().find_by_id(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::CheckedOut);
        let logs = fx.repos.usage_logs().list_for_booking(booking_id).await.unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn token_lookup_is_case_insensitive() {
        let fx = fixture().await;
        let booking_id = confirmed_booking(&fx).await;
        let qr = QrService::new(fx.repos.clone());
        let kiosk = KioskService::new(fx.repos.clone());

        let token = qr.issue(&fx.student, booking_id, Some(15)).await.unwrap();
        let shouted = token.token.to_uppercase();
        assert!(matches!(
            kiosk.scan(&shouted, None).await.unwrap(),
            ScanOutcome::Completed(_)
        ));
    }

    #[tokio::test]
    async fn expired_token_mutates_nothing() {
        let fx = fixture().await;
        let booking_id = confirmed_booking(&fx).await;
        let qr = QrService::new(fx.repos.clone());
        let kiosk = KioskService::new(fx.repos.clone());

        let token = qr.issue(&fx.student, booking_id, Some(0)).await.unwrap();
        let outcome = kiosk.scan(&token.token, None).await.unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Rejected(ScanRejection::ExpiredOrUsed)
        ));

        let booking = fx.repos.bookings().find_by_id(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(fx
            .repos
            .usage_logs()
            .list_for_booking(booking_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_token_is_reported_distinctly() {
        let fx = fixture().await;
        let kiosk = KioskService::new(fx.repos.clone());

        let outcome = kiosk.scan("no-such-token", None).await.unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Rejected(ScanRejection::UnknownToken)
        ));
    }

    #[tokio::test]
    async fn pending_booking_is_not_eligible() {
        let fx = fixture().await;
        let bookings = BookingService::new(fx.repos.clone());
        let booking = bookings
            .create(
                &fx.student,
                NewBooking {
                    lab_id: fx.seed.lab_id,
                    equipment_id: Some(fx.seed.microscope_id),
                    title: None,
                    starts_at: Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap(),
                    ends_at: Utc.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).unwrap(),
                    notes: None,
                },
            )
            .await
            .unwrap();

        // token planted directly so the issuance gate is not what rejects
        let token = fx
            .repos
            .qr_tokens()
            .save(QrToken::issue(booking.id, 15))
            .await
            .unwrap();

        let kiosk = KioskService::new(fx.repos.clone());
        let outcome = kiosk.scan(&token.token, None).await.unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Rejected(ScanRejection::NotEligible)
        ));
        let reloaded = fx.repos.bookings().find_by_id(booking.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn scan_accepts_full_url_input() {
        let fx = fixture().await;
        let booking_id = confirmed_booking(&fx).await;
        let qr = QrService::new(fx.repos.clone());
        let kiosk = KioskService::new(fx.repos.clone());

        let token = qr.issue(&fx.student, booking_id, Some(15)).await.unwrap();
        let url = format!("https://labs.example.edu/kiosk/scan-url/x?token={}", token.token);
        assert!(matches!(
            kiosk.scan(&url, None).await.unwrap(),
            ScanOutcome::Completed(_)
        ));
    }
}
