use serde::{Deserialize, Serialize};

use super::domain::OfferStatus;
use super::events::{OnboardingEvent, Topic};

/// Where a candidate sits in the pipeline. Exactly one stage at a time;
/// `OfferDeclined` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    IntakeReceived,
    OfferSent,
    OfferDeclined,
    OfferAccepted,
    DocumentsRequested,
    DocumentsSubmitted,
    AwaitingResubmission,
    FilesChecked,
    ContentVerified,
    DetailsRequested,
    DetailsSubmitted,
    KitOrdered,
    KitReceived,
    CredentialsIssued,
    Completed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::OfferDeclined | Stage::Completed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::IntakeReceived => "INTAKE_RECEIVED",
            Stage::OfferSent => "OFFER_SENT",
            Stage::OfferDeclined => "OFFER_DECLINED",
            Stage::OfferAccepted => "OFFER_ACCEPTED",
            Stage::DocumentsRequested => "DOCUMENTS_REQUESTED",
            Stage::DocumentsSubmitted => "DOCUMENTS_SUBMITTED",
            Stage::AwaitingResubmission => "AWAITING_RESUBMISSION",
            Stage::FilesChecked => "FILES_CHECKED",
            Stage::ContentVerified => "CONTENT_VERIFIED",
            Stage::DetailsRequested => "DETAILS_REQUESTED",
            Stage::DetailsSubmitted => "DETAILS_SUBMITTED",
            Stage::KitOrdered => "KIT_ORDERED",
            Stage::KitReceived => "KIT_RECEIVED",
            Stage::CredentialsIssued => "CREDENTIALS_ISSUED",
            Stage::Completed => "COMPLETED",
        }
    }
}

/// Raised when an event arrives in a stage where it has no defined effect.
#[derive(Debug, Clone, thiserror::Error)]
#[error("event '{topic}' is not valid in stage {stage:?}")]
pub struct TransitionRejected {
    pub stage: Stage,
    pub topic: Topic,
}

/// The single transition table for the pipeline. Mail-confirmation events
/// (`step1.success.sent` and friends) are identity transitions in their home
/// stage; everything not listed here is rejected.
pub fn apply(stage: Stage, event: &OnboardingEvent) -> Result<Stage, TransitionRejected> {
    use OnboardingEvent as E;
    use Stage as S;

    let next = match (stage, event) {
        (S::IntakeReceived, E::EmployeeDataReceived { .. }) => S::OfferSent,
        (S::OfferSent, E::OfferResponseReceived { status, .. }) => match status {
            OfferStatus::Accepted => S::OfferAccepted,
            OfferStatus::Rejected => S::OfferDeclined,
            OfferStatus::Pending => {
                return Err(TransitionRejected {
                    stage,
                    topic: event.topic(),
                })
            }
        },
        (S::OfferAccepted, E::OfferAccepted { .. }) => S::OfferAccepted,
        (S::OfferAccepted, E::DocumentRequestSent { .. }) => S::DocumentsRequested,
        (
            S::DocumentsRequested | S::DocumentsSubmitted | S::AwaitingResubmission,
            E::DocumentsReceived { .. },
        ) => S::DocumentsSubmitted,
        (S::DocumentsSubmitted, E::FilesFetched { .. }) => S::FilesChecked,
        (S::DocumentsSubmitted, E::DocumentsRetry { .. }) => S::AwaitingResubmission,
        (S::FilesChecked, E::FileCheckMailSent { .. }) => S::FilesChecked,
        (S::FilesChecked, E::VerificationPassed { .. }) => S::ContentVerified,
        (S::FilesChecked, E::VerificationFailed { .. }) => S::AwaitingResubmission,
        (S::ContentVerified, E::VerificationPassedMailSent { .. }) => S::ContentVerified,
        (S::ContentVerified, E::DetailsFormSent { .. }) => S::DetailsRequested,
        (S::DetailsRequested | S::DetailsSubmitted, E::DetailsReceived { .. }) => {
            S::DetailsSubmitted
        }
        (S::DetailsSubmitted, E::KitOrdered { .. }) => S::KitOrdered,
        (S::KitOrdered, E::KitDispatchedMailSent { .. }) => S::KitOrdered,
        (S::KitOrdered, E::KitReceived { .. }) => S::KitReceived,
        (S::KitReceived, E::CredentialsGenerated { .. }) => S::CredentialsIssued,
        (S::CredentialsIssued, E::JoiningLetterSent { .. }) => S::Completed,
        _ => {
            return Err(TransitionRejected {
                stage,
                topic: event.topic(),
            })
        }
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::onboarding::domain::OnboardingToken;
    use std::collections::BTreeMap;

    fn token() -> OnboardingToken {
        OnboardingToken("t-1".to_string())
    }

    #[test]
    fn happy_path_walks_every_stage() {
        let t = token();
        let steps: Vec<(OnboardingEvent, Stage)> = vec![
            (
                OnboardingEvent::EmployeeDataReceived { token: t.clone() },
                Stage::OfferSent,
            ),
            (
                OnboardingEvent::OfferResponseReceived {
                    token: t.clone(),
                    status: OfferStatus::Accepted,
                },
                Stage::OfferAccepted,
            ),
            (
                OnboardingEvent::DocumentRequestSent { token: t.clone() },
                Stage::DocumentsRequested,
            ),
            (
                OnboardingEvent::DocumentsReceived {
                    token: t.clone(),
                    documents: BTreeMap::new(),
                },
                Stage::DocumentsSubmitted,
            ),
            (
                OnboardingEvent::FilesFetched {
                    token: t.clone(),
                    folder_id: "f1".to_string(),
                    files: Vec::new(),
                },
                Stage::FilesChecked,
            ),
            (
                OnboardingEvent::VerificationPassed {
                    token: t.clone(),
                    report: passing_report(),
                },
                Stage::ContentVerified,
            ),
            (
                OnboardingEvent::DetailsFormSent { token: t.clone() },
                Stage::DetailsRequested,
            ),
            (
                OnboardingEvent::DetailsReceived {
                    token: t.clone(),
                    details: BTreeMap::new(),
                },
                Stage::DetailsSubmitted,
            ),
            (
                OnboardingEvent::KitOrdered {
                    token: t.clone(),
                    tracking_number: "TRK1".to_string(),
                    label_url: None,
                },
                Stage::KitOrdered,
            ),
            (
                OnboardingEvent::KitReceived { token: t.clone() },
                Stage::KitReceived,
            ),
            (
                OnboardingEvent::CredentialsGenerated {
                    token: t.clone(),
                    full_name: "Asha Rao".to_string(),
                    personal_email: "asha@example.com".to_string(),
                    work_email: "asha.rao@unity.com".to_string(),
                },
                Stage::CredentialsIssued,
            ),
            (
                OnboardingEvent::JoiningLetterSent { token: t.clone() },
                Stage::Completed,
            ),
        ];

        let mut stage = Stage::IntakeReceived;
        for (event, expected) in steps {
            stage = apply(stage, &event).expect("transition defined");
            assert_eq!(stage, expected);
        }
        assert!(stage.is_terminal());
    }

    fn passing_report() -> crate::workflows::onboarding::verifier::VerificationReport {
        crate::workflows::onboarding::verifier::VerificationReport {
            status: crate::workflows::onboarding::domain::CheckOutcome::Pass,
            extracted_name: None,
            aadhaar_number: None,
            pan_number: None,
            date_of_birth: None,
            is_aadhaar_present: true,
            is_pan_present: true,
            is_name_consistent: true,
            is_dob_consistent: true,
            consistency_notes: String::new(),
        }
    }

    #[test]
    fn decline_is_terminal() {
        let stage = apply(
            Stage::OfferSent,
            &OnboardingEvent::OfferResponseReceived {
                token: token(),
                status: OfferStatus::Rejected,
            },
        )
        .expect("decline defined");
        assert_eq!(stage, Stage::OfferDeclined);
        assert!(stage.is_terminal());

        let rejected = apply(
            stage,
            &OnboardingEvent::DocumentRequestSent { token: token() },
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn resubmission_loops_back_through_documents() {
        let stage = apply(
            Stage::DocumentsSubmitted,
            &OnboardingEvent::DocumentsRetry {
                token: token(),
                missing_files: vec!["pan.pdf".to_string()],
            },
        )
        .expect("retry defined");
        assert_eq!(stage, Stage::AwaitingResubmission);

        let stage = apply(
            stage,
            &OnboardingEvent::DocumentsReceived {
                token: token(),
                documents: BTreeMap::new(),
            },
        )
        .expect("resubmission accepted");
        assert_eq!(stage, Stage::DocumentsSubmitted);
    }

    #[test]
    fn verification_failure_reopens_submission() {
        let mut report = passing_report();
        report.status = crate::workflows::onboarding::domain::CheckOutcome::Fail;
        report.is_name_consistent = false;
        let stage = apply(
            Stage::FilesChecked,
            &OnboardingEvent::VerificationFailed {
                token: token(),
                report,
            },
        )
        .expect("failure defined");
        assert_eq!(stage, Stage::AwaitingResubmission);
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let rejected = apply(
            Stage::IntakeReceived,
            &OnboardingEvent::KitReceived { token: token() },
        );
        match rejected {
            Err(err) => {
                assert_eq!(err.stage, Stage::IntakeReceived);
                assert_eq!(err.topic, Topic::KitReceived);
            }
            Ok(stage) => panic!("expected rejection, got {stage:?}"),
        }
    }

    #[test]
    fn mail_confirmations_do_not_move_the_stage() {
        let stage = apply(
            Stage::FilesChecked,
            &OnboardingEvent::FileCheckMailSent { token: token() },
        )
        .expect("identity transition");
        assert_eq!(stage, Stage::FilesChecked);
    }
}
