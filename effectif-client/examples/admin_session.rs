//! Admin session example
//!
//! Logs in, lists employees, and logs out against a running backend.
//! Credentials persist in a redb file, so a second run within the token
//! lifetime starts already authenticated.
//!
//! Run: cargo run --example admin_session -- http://localhost:8081/api/v1 admin admin123

use effectif_client::{ClientConfig, EffectifClient, LoginRequest, RedbStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8081/api/v1".to_string());
    let username = args.next().unwrap_or_else(|| "admin".to_string());
    let password = args.next().unwrap_or_else(|| "admin123".to_string());

    let store = Arc::new(RedbStore::open(
        std::env::temp_dir().join("effectif-credentials.redb"),
    )?);

    let client = EffectifClient::with_session_hook(
        ClientConfig::new(base_url),
        store,
        Box::new(|| println!("Session invalidée, reconnexion nécessaire")),
    )?;

    if !client.is_authenticated() {
        println!("Connexion en tant que {username}...");
        let result = client
            .auth
            .login(&LoginRequest {
                username,
                password,
            })
            .await;
        if let Some(error) = result.error {
            anyhow::bail!("login failed: {error} (code {})", result.code);
        }
    }

    if let Some(profile) = client.profile() {
        println!("Connecté: {} ({})", profile.full_name, profile.role);
    }

    let employees = client.employees.get_all().await;
    match (employees.error, employees.data) {
        (None, Some(list)) => {
            println!("{} employé(s):", list.len());
            for employee in list {
                println!(
                    "  #{} {} {} - {} [{}]",
                    employee.id,
                    employee.first_name,
                    employee.last_name,
                    employee.poste,
                    if employee.enabled { "actif" } else { "inactif" }
                );
            }
        }
        (error, _) => {
            println!(
                "Échec de la récupération: {}",
                error.unwrap_or_else(|| "erreur inconnue".to_string())
            );
        }
    }

    client.auth.logout();
    println!("Déconnecté.");
    Ok(())
}
