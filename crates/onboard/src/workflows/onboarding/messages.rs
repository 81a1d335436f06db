//! Plain-text bodies for every mail the pipeline sends. Links point at the
//! candidate portal configured in `OnboardingConfig::frontend_url`.

use chrono::NaiveDate;

use crate::config::OnboardingConfig;

use super::domain::OnboardingToken;
use super::notify::OutboundMessage;

fn base(config: &OnboardingConfig) -> &str {
    config.frontend_url.trim_end_matches('/')
}

pub fn respond_link(config: &OnboardingConfig, token: &OnboardingToken, action: &str) -> String {
    format!(
        "{}/respond?token={}&action={}",
        base(config),
        token.as_str(),
        action
    )
}

pub fn upload_link(config: &OnboardingConfig, token: &OnboardingToken) -> String {
    format!("{}/upload?token={}", base(config), token.as_str())
}

pub fn details_link(config: &OnboardingConfig, token: &OnboardingToken) -> String {
    format!("{}/details?token={}", base(config), token.as_str())
}

pub fn kit_confirm_link(config: &OnboardingConfig, token: &OnboardingToken) -> String {
    format!("{}/kit-received?token={}", base(config), token.as_str())
}

pub fn offer_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    role: &str,
    package: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    let body = format!(
        "Dear {name},\n\n\
         We are delighted to offer you the position of {role} with an annual \
         package of {package}.\n\n\
         To accept the offer: {accept}\n\
         To decline the offer: {decline}\n\n\
         We look forward to hearing from you.\n\nHR Team",
        accept = respond_link(config, token, "yes"),
        decline = respond_link(config, token, "no"),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: format!("Offer of employment: {role}"),
        body,
        token: token.clone(),
    }
}

pub fn acceptance_mail(
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: email.to_string(),
        subject: "Welcome aboard!".to_string(),
        body: format!(
            "Dear {name},\n\n\
             Thank you for accepting our offer. We are thrilled to have you \
             join us. You will shortly receive a request for your onboarding \
             documents.\n\nHR Team"
        ),
        token: token.clone(),
    }
}

pub fn decline_acknowledgment_mail(
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: email.to_string(),
        subject: "Offer declined".to_string(),
        body: format!(
            "Dear {name},\n\n\
             We have recorded that you declined our offer. We are sorry it \
             did not work out this time and wish you all the best.\n\nHR Team"
        ),
        token: token.clone(),
    }
}

pub fn decline_hr_notice(
    config: &OnboardingConfig,
    name: &str,
    candidate_email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: config.hr_email.clone(),
        subject: format!("Offer declined: {name}"),
        body: format!(
            "{name} <{candidate_email}> has declined the offer.\n\
             Reference: {token}\n\
             No further onboarding steps will run for this candidate."
        ),
        token: token.clone(),
    }
}

pub fn document_request_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    let body = format!(
        "Dear {name},\n\n\
         To continue your onboarding, please upload the following documents \
         to a shared folder and submit the folder link:\n\n\
         - aadhaar.pdf\n- pan.pdf\n- 10thmarksheet.pdf\n- 12thmarksheet.pdf\n\
         - photo.jpg (jpeg/png also accepted)\n\n\
         Submit here: {link}\n\nHR Team",
        link = upload_link(config, token),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "Onboarding documents required".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn file_check_success_mail(
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: email.to_string(),
        subject: "Documents received".to_string(),
        body: format!(
            "Dear {name},\n\n\
             All required documents were found in your folder. They are now \
             being verified; we will contact you if anything else is \
             needed.\n\nHR Team"
        ),
        token: token.clone(),
    }
}

pub fn resubmission_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    missing: &[String],
    token: &OnboardingToken,
) -> OutboundMessage {
    let listing: String = missing
        .iter()
        .map(|file| format!("- {file}\n"))
        .collect();
    let body = format!(
        "Dear {name},\n\n\
         The following documents were missing from your folder:\n\n{listing}\n\
         Please add them and submit the folder link again: {link}\n\nHR Team",
        link = upload_link(config, token),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "Action needed: missing documents".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn verification_passed_mail(
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: email.to_string(),
        subject: "Document verification complete".to_string(),
        body: format!(
            "Dear {name},\n\n\
             Your documents have been verified successfully. The next step \
             of your onboarding is on its way.\n\nHR Team"
        ),
        token: token.clone(),
    }
}

pub fn verification_failed_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    issues: &[String],
    token: &OnboardingToken,
) -> OutboundMessage {
    let listing: String = issues.iter().map(|issue| format!("- {issue}\n")).collect();
    let body = format!(
        "Dear {name},\n\n\
         We could not verify your documents:\n\n{listing}\n\
         Please correct the documents and submit the folder link again: \
         {link}\n\nHR Team",
        link = upload_link(config, token),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "Action needed: document verification failed".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn details_form_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    let body = format!(
        "Dear {name},\n\n\
         Please share your contact details so we can dispatch your welcome \
         kit: {link}\n\nHR Team",
        link = details_link(config, token),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "A few more details".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn kit_dispatched_mail(
    config: &OnboardingConfig,
    name: &str,
    email: &str,
    tracking_number: &str,
    label_url: Option<&str>,
    token: &OnboardingToken,
) -> OutboundMessage {
    let label_line = match label_url {
        Some(url) => format!("Shipping label: {url}\n"),
        None => String::new(),
    };
    let body = format!(
        "Dear {name},\n\n\
         Your welcome kit is on its way!\n\
         Tracking number: {tracking_number}\n{label_line}\n\
         Once it arrives, confirm here: {link}\n\nHR Team",
        link = kit_confirm_link(config, token),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "Your welcome kit has shipped".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn credentials_mail(
    name: &str,
    email: &str,
    work_email: &str,
    initial_password: &str,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: email.to_string(),
        subject: "Your work account credentials".to_string(),
        body: format!(
            "Dear {name},\n\n\
             Your work account has been created.\n\
             Work email: {work_email}\n\
             Initial password: {initial_password}\n\n\
             Please sign in and change the password before your first \
             day.\n\nHR Team"
        ),
        token: token.clone(),
    }
}

pub fn joining_letter_mail(
    name: &str,
    email: &str,
    work_email: &str,
    joining_date: NaiveDate,
    token: &OnboardingToken,
) -> OutboundMessage {
    let body = format!(
        "Dear {name},\n\n\
         Congratulations on completing your onboarding! Your joining date is \
         {date}.\n\n\
         Your work account is ready: {work_email}\n\
         The initial password was sent to you in a separate email.\n\n\
         See you soon!\n\nHR Team",
        date = joining_date.format("%B %d, %Y"),
    );
    OutboundMessage {
        to: email.to_string(),
        subject: "Your joining letter".to_string(),
        body,
        token: token.clone(),
    }
}

pub fn onboarding_complete_hr_notice(
    config: &OnboardingConfig,
    name: &str,
    work_email: &str,
    joining_date: NaiveDate,
    token: &OnboardingToken,
) -> OutboundMessage {
    OutboundMessage {
        to: config.hr_email.clone(),
        subject: format!("Onboarding complete: {name}"),
        body: format!(
            "{name} has completed onboarding.\n\
             Work email: {work_email}\n\
             Joining date: {date}\n\
             Reference: {token}",
            date = joining_date.format("%B %d, %Y"),
        ),
        token: token.clone(),
    }
}
