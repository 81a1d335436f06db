use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;

use crate::infra::in_memory_stack;
use onboard::config::AppConfig;
use onboard::error::AppError;
use onboard::workflows::onboarding::documents::StoredFile;
use onboard::workflows::onboarding::ledger::LedgerColumn;
use onboard::workflows::onboarding::OnboardingService;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Candidate name
    #[arg(long, default_value = "Asha Rao")]
    pub(crate) name: String,
    /// Candidate personal email
    #[arg(long, default_value = "asha.rao@example.com")]
    pub(crate) email: String,
    /// Role the candidate is hired for
    #[arg(long, default_value = "Software Engineer")]
    pub(crate) role: String,
    /// Compensation package label
    #[arg(long, default_value = "12 LPA")]
    pub(crate) package: String,
}

const DEMO_FOLDER: &str = "demo-folder";

/// Walks one candidate through the whole pipeline against the in-memory
/// stack and prints the trail it leaves behind.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let stack = in_memory_stack(config.onboarding);

    let required = [
        "aadhaar.pdf",
        "pan.pdf",
        "10thmarksheet.pdf",
        "12thmarksheet.pdf",
        "photo.jpg",
    ];
    stack.folders.seed(
        DEMO_FOLDER,
        required
            .into_iter()
            .map(|name| StoredFile {
                id: format!("demo-{name}"),
                name: name.to_string(),
                mime_type: None,
            })
            .collect(),
    );

    let service = Arc::new(OnboardingService::new(stack.collaborators));

    println!("Employee onboarding demo");
    println!(
        "Candidate: {} <{}> ({}, {})",
        args.name, args.email, args.role, args.package
    );

    let record = service.intake(onboard::workflows::onboarding::domain::NewEmployee {
        name: args.name,
        email: args.email,
        role: args.role,
        package: args.package,
    })?;
    let token = record.token.clone();
    println!("\n1. Intake recorded, token {token}");
    println!("   Stage: {}", record.stage.label());

    let status = service.respond(Some(token.0.clone()), Some("yes".to_string()))?;
    println!("\n2. Offer response: {}", status.label());

    let mut documents = BTreeMap::new();
    documents.insert(
        "folder".to_string(),
        format!("https://drive.example.com/drive/folders/{DEMO_FOLDER}?usp=sharing"),
    );
    let accepted = service.submit_documents(Some(token.0.clone()), documents)?;
    println!("\n3. Document links received: {accepted}");

    let mut details = BTreeMap::new();
    details.insert("fullName".to_string(), "Asha R. Rao".to_string());
    details.insert("mobile".to_string(), "+91 98765 43210".to_string());
    details.insert(
        "presentAddress".to_string(),
        "14 Lakeview Road, Bengaluru".to_string(),
    );
    let fields = service.submit_details(Some(token.0.clone()), details)?;
    println!("\n4. Details form received: {fields} fields");

    service.confirm_kit_received(Some(token.0.clone()))?;
    println!("\n5. Kit delivery confirmed");

    let record = service
        .record(&token)?
        .ok_or(onboard::workflows::onboarding::ServiceError::NotFound)?;
    println!("\nFinal record");
    println!("- Stage: {}", record.stage.label());
    println!("- Offer: {}", record.offer_status.label());
    println!("- Verification: {}", record.verification_status.label());
    if let Some(kit) = &record.welcome_kit {
        println!("- Kit: {} (tracking {})", kit.status.label(), kit.tracking_number);
    }
    if let Some(credentials) = &record.work_credentials {
        println!("- Work email: {}", credentials.work_email);
    }

    println!("\nLedger row for {}", stack.ledger.row_name(&token).unwrap_or_default());
    for column in [
        LedgerColumn::OfferStatus,
        LedgerColumn::FileCheck,
        LedgerColumn::ContentCheck,
        LedgerColumn::KitStatus,
        LedgerColumn::KitReceived,
        LedgerColumn::JoiningLetter,
        LedgerColumn::JoiningDate,
    ] {
        if let Some(value) = stack.ledger.cell(&token, column) {
            println!("- {}: {}", column.heading(), value);
        }
    }

    let sent = stack.notifier.sent();
    println!("\nMail sent ({})", sent.len());
    for message in &sent {
        println!("- to {} | {}", message.to, message.subject);
    }

    Ok(())
}
