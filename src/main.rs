use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use kyc_onboard::api::{ComplianceApi, HttpComplianceClient, ip};
use kyc_onboard::config::OnboardConfig;
use kyc_onboard::documents;
use kyc_onboard::models::workflow::PATRIOT_ACT_NOTICE;
use kyc_onboard::resolver::{NavigationTarget, StepResolver};
use kyc_onboard::session::OnboardingSession;
use kyc_onboard::validation::{self, PiiForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = OnboardConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export ONBOARD_API_TOKEN=...");
        std::process::exit(1);
    });

    eprintln!("KYC Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Poll interval: {}s\n", config.poll_interval.as_secs());

    let api: Arc<dyn ComplianceApi> = Arc::new(HttpComplianceClient::new(&config)?);
    let resolver = StepResolver::new(Arc::clone(&api));
    let mut session = OnboardingSession::new();

    let stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt = Prompt { lines: stdin };

    let email = loop {
        let input = prompt.ask("Email").await?;
        match validation::validate_email(&input) {
            Ok(()) => break input.trim().to_string(),
            Err(e) => eprintln!("  {e}"),
        }
    };

    let mut target = match resolver.submit_email(&email, &mut session).await {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Walk acknowledgement steps until a terminal state is reached.
    loop {
        match target {
            NavigationTarget::Disclosures => {
                eprintln!("\n-- Disclosures --");
                let answer = prompt.ask("Accept all pending disclosures? [y/N]").await?;
                if !answer.eq_ignore_ascii_case("y") {
                    eprintln!("Stopping; disclosures not accepted.");
                    return Ok(());
                }
                target = acknowledge_step(&api, &resolver, &mut session, &email, None).await?;
            }
            NavigationTarget::PatriotAct => {
                eprintln!("\n-- USA Patriot Act Notice --");
                eprintln!(
                    "Federal law requires all financial institutions to obtain, verify, and \
                     record information that identifies each person who opens an account."
                );
                let answer = prompt.ask("I Agree [y/N]").await?;
                if !answer.eq_ignore_ascii_case("y") {
                    eprintln!("Stopping; Patriot Act notice not acknowledged.");
                    return Ok(());
                }
                target = acknowledge_step(
                    &api,
                    &resolver,
                    &mut session,
                    &email,
                    Some(PATRIOT_ACT_NOTICE),
                )
                .await?;
            }
            NavigationTarget::Pii => {
                eprintln!("\n-- Personal Information --");
                // Refetch on focus: details submitted in an earlier session
                // may already be on file.
                session.refresh_customer(&api).await?;
                let form = collect_pii(&mut prompt).await?;
                let Some(customer) = session.customer() else {
                    bail!("no customer in session");
                };
                let updated = api.update_customer(&customer.uid, &form.to_details()).await?;
                session.set_customer(updated);
                target = resolver.submit_email(&email, &mut session).await?;
            }
            NavigationTarget::BankingDisclosures => {
                eprintln!("\n-- Banking Disclosures --");
                let answer = prompt.ask("Accept banking disclosures? [y/N]").await?;
                if !answer.eq_ignore_ascii_case("y") {
                    eprintln!("Stopping; banking disclosures not accepted.");
                    return Ok(());
                }
                target = acknowledge_step(&api, &resolver, &mut session, &email, None).await?;
            }
            NavigationTarget::ProcessingApplication => {
                eprintln!("\nYour application is being processed. Check back soon.");
                return Ok(());
            }
            NavigationTarget::ApplicationUnapproved(status) => {
                eprintln!("\nYour application could not be approved (status: {status}).");
                return Ok(());
            }
            NavigationTarget::Home => {
                eprintln!("\nOnboarding complete. Waiting for account provisioning...");
                wait_for_accounts(&api, &mut session, &config).await?;
                return Ok(());
            }
        }
    }
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    async fn ask(&mut self, label: &str) -> std::io::Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(format!("{label}: ").as_bytes()).await?;
        stderr.flush().await?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )),
        }
    }
}

/// Prompt for every PII field until the form validates.
async fn collect_pii(prompt: &mut Prompt) -> std::io::Result<PiiForm> {
    loop {
        let mut form = PiiForm {
            first_name: prompt.ask("First Name").await?,
            middle_name: prompt.ask("Middle Name (optional)").await?,
            last_name: prompt.ask("Last Name").await?,
            suffix: prompt.ask("Suffix (optional)").await?,
            address1: prompt.ask("Physical Address").await?,
            address2: prompt.ask("Apt, Unit, etc. (optional)").await?,
            city: prompt.ask("City").await?,
            state: prompt.ask("State").await?,
            zip: prompt.ask("Zip Code").await?,
            ..Default::default()
        };

        let dob_raw = prompt.ask("Date of Birth (YYYY-MM-DD)").await?;
        form.dob = NaiveDate::parse_from_str(dob_raw.trim(), "%Y-%m-%d").ok();
        form.phone = validation::format_phone(&prompt.ask("Phone Number").await?);
        form.ssn = Some(SecretString::from(validation::format_ssn(
            &prompt.ask("Social Security Number").await?,
        )));

        match form.validate() {
            Ok(()) => return Ok(form),
            Err(e) => {
                for field in &e.fields {
                    eprintln!("  {}", field.message);
                }
            }
        }
    }
}

/// Acknowledge the given document (or all pending ones), then re-resolve the
/// next step from fresh server state.
async fn acknowledge_step(
    api: &Arc<dyn ComplianceApi>,
    resolver: &StepResolver,
    session: &mut OnboardingSession,
    email: &str,
    document: Option<&str>,
) -> anyhow::Result<NavigationTarget> {
    let Some(workflow) = session.workflow().cloned() else {
        bail!("no compliance workflow in session");
    };

    let ip_address = ip::device_ip()
        .await
        .context("device IP lookup for acknowledgement audit")?
        .to_string();
    let updated = match document {
        Some(name) => {
            documents::acknowledge_document(api, &workflow, name, &ip_address, email).await?
        }
        None => documents::acknowledge_all_pending(api, &workflow, &ip_address, email).await?,
    };
    session.set_workflow(updated)?;

    Ok(resolver.submit_email(email, session).await?)
}

/// Poll until a liability account appears, printing each snapshot.
async fn wait_for_accounts(
    api: &Arc<dyn ComplianceApi>,
    session: &mut OnboardingSession,
    config: &OnboardConfig,
) -> anyhow::Result<()> {
    // Seed the cache once before handing off to the poller.
    session.refresh_accounts(api).await?;
    let Some(customer) = session.customer() else {
        bail!("no customer in session");
    };

    let (handle, _shutdown, mut rx) = kyc_onboard::poller::spawn_account_poller(
        Arc::clone(api),
        customer.uid.clone(),
        config.poll_interval,
    );

    while rx.changed().await.is_ok() {
        let accounts = rx.borrow_and_update().clone();
        for account in accounts.iter().filter(|a| a.is_ready()) {
            let balance = account
                .net_usd_available_balance
                .map(|b| format!("${b}"))
                .unwrap_or_else(|| "-".to_string());
            eprintln!("   {} ({balance})", account.name);
        }
    }
    handle.await?;
    Ok(())
}
