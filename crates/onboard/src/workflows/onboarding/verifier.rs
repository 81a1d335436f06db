use serde::{Deserialize, Serialize};

use super::documents::StoredFile;
use super::domain::{CheckOutcome, OnboardingToken};

/// Everything the content check needs: the files that passed the level-one
/// listing check plus the name the candidate registered with.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub token: OnboardingToken,
    pub candidate_name: String,
    pub files: Vec<StoredFile>,
}

/// Structured result of the level-two content check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub status: CheckOutcome,
    pub extracted_name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub pan_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub is_aadhaar_present: bool,
    pub is_pan_present: bool,
    pub is_name_consistent: bool,
    pub is_dob_consistent: bool,
    #[serde(default)]
    pub consistency_notes: String,
}

impl VerificationReport {
    /// Human-readable problems, in the order candidates see them in the
    /// resubmission mail.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.is_aadhaar_present {
            issues.push("Aadhaar card could not be read from the uploaded documents".to_string());
        }
        if !self.is_pan_present {
            issues.push("PAN card could not be read from the uploaded documents".to_string());
        }
        if !self.is_name_consistent {
            issues.push("Name differs between your documents".to_string());
        }
        if !self.is_dob_consistent {
            issues.push("Date of birth differs between your documents".to_string());
        }
        if issues.is_empty() && self.status == CheckOutcome::Fail {
            let note = self.consistency_notes.trim();
            if note.is_empty() {
                issues.push("Document contents could not be verified".to_string());
            } else {
                issues.push(note.to_string());
            }
        }
        issues
    }
}

/// Content-verification boundary (OCR provider in production, a canned
/// implementation everywhere else).
pub trait ContentVerifier: Send + Sync {
    fn verify(&self, request: &VerificationRequest) -> Result<VerificationReport, VerifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verifier unavailable: {0}")]
    Transport(String),
    #[error("verifier returned an unusable response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_report() -> VerificationReport {
        VerificationReport {
            status: CheckOutcome::Pass,
            extracted_name: Some("Asha Rao".to_string()),
            aadhaar_number: Some("1234-5678-9012".to_string()),
            pan_number: Some("ABCDE1234F".to_string()),
            date_of_birth: Some("1998-02-14".to_string()),
            is_aadhaar_present: true,
            is_pan_present: true,
            is_name_consistent: true,
            is_dob_consistent: true,
            consistency_notes: String::new(),
        }
    }

    #[test]
    fn passing_report_has_no_issues() {
        assert!(passing_report().issues().is_empty());
    }

    #[test]
    fn issues_name_each_failed_check() {
        let report = VerificationReport {
            status: CheckOutcome::Fail,
            is_pan_present: false,
            is_name_consistent: false,
            ..passing_report()
        };
        let issues = report.issues();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("PAN"));
        assert!(issues[1].contains("Name"));
    }

    #[test]
    fn failed_report_without_flags_falls_back_to_notes() {
        let report = VerificationReport {
            status: CheckOutcome::Fail,
            consistency_notes: "Scan quality too low to extract text".to_string(),
            ..passing_report()
        };
        assert_eq!(
            report.issues(),
            vec!["Scan quality too low to extract text".to_string()]
        );
    }
}
