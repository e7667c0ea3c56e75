//! Push one invoice through the middleware sandbox.
//!
//! Needs `PEPPOL_EDI_TEST_URL`, `PEPPOL_API_KEY`, `PEPPOL_COMPANY_UEN` and
//! `PEPPOL_COMPANY_EMAIL` in the environment.

use chrono::NaiveDate;
use peppol_edi::client::*;
use peppol_edi::core::*;
use peppol_edi::sync::EdiService;
use rust_decimal_macros::dec;

fn env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("{key} is not set"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EdiConfig::from_env().expect("invalid configuration");
    let transport = ReqwestTransport::new(config.timeout).expect("HTTP client");
    let company = CompanyBuilder::new("Demo Pte Ltd")
        .email(env("PEPPOL_COMPANY_EMAIL"))
        .unique_entity_number(env("PEPPOL_COMPANY_UEN"))
        .api_key(env("PEPPOL_API_KEY"), Mode::Test)
        .build();
    let mut svc = EdiService::new(ApiClient::new(transport, config), MemoryStore::new(company));

    println!("=== Verifying API key ===\n");
    if let Err(e) = svc.validate_company().await {
        println!("  verification failed: {e}");
        return;
    }
    println!("  PEPPOL enabled: {}", svc.is_peppol_enabled());

    let invoice = svc.store_mut().insert_move(
        MoveBuilder::new("DEMO/2024/0001")
            .invoice_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .due_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
            .add_line(MoveLineBuilder::new(1, "Consulting", dec!(2), dec!(100)).tax(dec!(18)).build())
            .build(),
    );

    println!("\n=== Creating invoice ===\n");
    match svc.create_invoice(invoice).await {
        Ok(()) => {
            let mv = svc.store().get_move(invoice).unwrap();
            println!(
                "  id={} uuid={} status={}",
                mv.external_invoice_id.as_deref().unwrap_or("-"),
                mv.external_invoice_uuid.as_deref().unwrap_or("-"),
                mv.edi_status.map(|s| s.label()).unwrap_or("-"),
            );
        }
        Err(e) => println!("  rejected: {e}"),
    }

    println!("\n=== Sending ===\n");
    match svc.send_invoice(invoice).await {
        Ok(true) => println!("  accepted for delivery"),
        Ok(false) => println!("  not confirmed yet"),
        Err(e) => println!("  failed: {e}"),
    }
}
