//! Interactive terminal client for the devis form. Drives the form state
//! machine against a live server, mapping real elapsed time onto its timers.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;

use batirenov::form::{
    DevisClient, DevisForm, Phase, Route, Session, AVAILABLE_TASKS, DEFAULT_TIMEOUT,
};

fn ask(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let line = lines.next().unwrap_or(Ok(String::new()))?;
    Ok(line.trim().to_string())
}

fn ask_with_default(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
    default: &str,
) -> anyhow::Result<String> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let line = lines.next().unwrap_or(Ok(String::new()))?;
    let line = line.trim();
    Ok(if line.is_empty() {
        default.to_string()
    } else {
        line.to_string()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();
    let base_url =
        std::env::var("DEVIS_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    let timeout = std::env::var("DEVIS_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT);

    // An existing session token makes the submission non-anonymous
    let session = match std::env::var("DEVIS_TOKEN") {
        Ok(token) if !token.is_empty() => Session {
            user: None,
            token: Some(token),
        },
        _ => Session::anonymous(),
    };

    let client = DevisClient::new(&base_url, timeout).context("Failed to build HTTP client")?;
    let mut form = DevisForm::new(session);
    let opened = Instant::now();

    println!("=== Demande de devis ({}) ===", base_url);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    form.data.client_name = ask_with_default(&mut lines, "Nom", &form.data.client_name)?;
    form.data.client_email = ask_with_default(&mut lines, "Email", &form.data.client_email)?;
    form.data.client_phone = ask_with_default(&mut lines, "Téléphone", &form.data.client_phone)?;
    form.data.project_address = ask(&mut lines, "Adresse du projet")?;
    form.data.project_type =
        ask_with_default(&mut lines, "Type de projet", &form.data.project_type)?;
    form.data.surface = ask_with_default(&mut lines, "Surface (m²)", &form.data.surface)?;
    form.data.budget = ask(&mut lines, "Budget")?;
    form.data.description = ask(&mut lines, "Description du projet")?;

    println!("Travaux disponibles:");
    for (i, task) in AVAILABLE_TASKS.iter().enumerate() {
        println!("  {:2}. {}", i + 1, task);
    }
    let picks = ask(&mut lines, "Numéros des travaux (ex: 1,4,7)")?;
    for pick in picks.split(',') {
        if let Ok(n) = pick.trim().parse::<usize>() {
            if (1..=AVAILABLE_TASKS.len()).contains(&n) {
                form.toggle_task(AVAILABLE_TASKS[n - 1]);
            }
        }
    }

    form.data.additional_tasks = ask(&mut lines, "Autres travaux")?;
    form.data.deadline = ask(&mut lines, "Date limite (AAAA-MM-JJ, vide si aucune)")?;
    form.data.style = ask(&mut lines, "Style souhaité")?;

    let Some(payload) = form.start_submit() else {
        if let Some(message) = form.error_message() {
            eprintln!("✗ {}", message);
        }
        std::process::exit(1);
    };

    println!("Envoi en cours...");
    let outcome = client.submit(&payload, form.token()).await;
    form.resolve(outcome, opened.elapsed());

    if let Some(message) = form.error_message() {
        eprintln!("✗ {}", message);
    }
    if let Some(message) = form.success_message() {
        println!("✓ {}", message);
    }
    if form.phase() == Phase::Demo {
        tracing::info!("Submission kept locally only (demo mode)");
    }

    // Let the machine's reset/navigate timers play out in real time
    loop {
        tokio::time::sleep(Duration::from_millis(250)).await;

        if let Some(route) = form.tick(opened.elapsed()) {
            match route {
                Route::Dashboard => println!("→ Redirection vers le tableau de bord"),
                Route::Landing => println!("→ Retour à l'accueil"),
            }
            break;
        }

        if form.settled() {
            break;
        }
    }

    Ok(())
}
